pub mod types;
pub mod entities;
pub mod client;
pub mod loader;
pub mod validator;
pub mod resolved;

pub use types::*;
pub use client::ClientConfig;
pub use entities::ENTITIES;
pub use loader::*;
pub use validator::*;
pub use resolved::*;

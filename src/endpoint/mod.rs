//! Endpoint paths and typed call parameters: path segments come from the
//! entity table, caller values only ever land in single segments or query values.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;

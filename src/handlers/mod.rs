//! HTTP handlers for the method surface.

pub mod methods;
pub use methods::*;

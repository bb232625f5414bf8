//! Operations over the platform: base calls, scope variants and bulk dispatch.

mod bulk;
mod crud;
mod scoped;
mod validation;
pub use bulk::BulkDispatcher;
pub use crud::{version_of, CrudService};
pub use scoped::ScopedService;
pub use validation::RequestValidator;

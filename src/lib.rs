//! Commerce agent SDK: named methods (`create_cart`, `read_inventory`,
//! `bulk_create`, ...) mapped onto commerce platform REST calls, with the
//! endpoint chosen by the caller's context.

pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod extractors;
pub mod facade;
pub mod handlers;
pub mod methods;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod transport;

pub use config::{load, load_from_path, Catalog, ClientConfig, Entity, Verb};
pub use context::{Context, Scope, ScopeKind};
pub use error::{ApiError, AppError, BulkKind, ConfigError};
pub use facade::CommerceApi;
pub use methods::{MethodId, MethodRegistry};
pub use routes::{app, common_routes, method_routes, method_routes_with_limit};
pub use service::{BulkDispatcher, CrudService, ScopedService};
pub use state::AppState;
pub use transport::{ApiRequest, HttpTransport, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use transport::MockTransport;

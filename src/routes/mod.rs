mod common;
mod methods;

pub use common::common_routes;
pub use methods::{method_routes, method_routes_with_limit, DEFAULT_BODY_LIMIT};

use crate::state::AppState;
use axum::Router;

/// Common routes at the root, methods under `/api/v1`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .nest("/api/v1", method_routes(state))
}

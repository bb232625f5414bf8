//! Method routes: `GET /methods` and `POST /methods/:method`.

use crate::handlers::{invoke, list_methods};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Bulk payloads cap at 100 items; 2 MiB leaves room for large drafts.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

pub fn method_routes(state: AppState) -> Router {
    method_routes_with_limit(state, DEFAULT_BODY_LIMIT)
}

pub fn method_routes_with_limit(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/methods", get(list_methods))
        .route("/methods/:method", post(invoke))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

//! Shared application state for all routes.

use crate::config::Catalog;
use crate::context::Context;
use crate::facade::CommerceApi;
use crate::transport::Transport;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<dyn Transport>,
    pub catalog: Arc<Catalog>,
    pub project_key: Arc<str>,
    /// Context for requests that carry no context headers.
    pub default_context: Context,
}

impl AppState {
    pub fn new(
        transport: Arc<dyn Transport>,
        catalog: Arc<Catalog>,
        project_key: impl Into<Arc<str>>,
        default_context: Context,
    ) -> Self {
        AppState {
            transport,
            catalog,
            project_key: project_key.into(),
            default_context,
        }
    }

    /// A facade bound to `context` (or the default when `None`).
    pub fn api(&self, context: Option<Context>) -> CommerceApi {
        CommerceApi::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.catalog),
            Arc::clone(&self.project_key),
            context.unwrap_or_else(|| self.default_context.clone()),
        )
    }
}

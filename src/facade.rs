//! `CommerceApi`: the method-name call surface for one session context.

use crate::config::{Catalog, Verb};
use crate::context::Context;
use crate::endpoint::{ReadParams, UpdateParams};
use crate::error::AppError;
use crate::methods::{Handler, MethodRegistry};
use crate::service::{BulkDispatcher, RequestValidator, ScopedService};
use crate::transport::Transport;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct CommerceApi {
    transport: Arc<dyn Transport>,
    catalog: Arc<Catalog>,
    project_key: Arc<str>,
    context: Context,
    registry: MethodRegistry,
}

impl CommerceApi {
    pub fn new(
        transport: Arc<dyn Transport>,
        catalog: Arc<Catalog>,
        project_key: impl Into<Arc<str>>,
        context: Context,
    ) -> Self {
        let registry = MethodRegistry::for_context(&catalog, &context);
        CommerceApi {
            transport,
            catalog,
            project_key: project_key.into(),
            context,
            registry,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Method names callable with this context.
    pub fn methods(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Validates `params`, runs the method and returns the platform's JSON.
    pub async fn execute(&self, method: &str, params: Value) -> Result<Value, AppError> {
        let (id, handler) = self.registry.resolve(method)?;
        let params = if params.is_null() { json!({}) } else { params };
        tracing::debug!(method = %id, "dispatch");

        match handler {
            Handler::Entity { config, verb, scope } => {
                let service = ScopedService::new(
                    &*self.transport,
                    &self.catalog,
                    &self.project_key,
                    *config,
                    scope.clone(),
                );
                match verb {
                    Verb::Read => {
                        RequestValidator::validate(&params, self.catalog.read_rules())?;
                        let read = ReadParams::from_params(&params, config.key_lookup)?;
                        service.read(&read).await
                    }
                    Verb::Create => {
                        let draft_rules = self
                            .catalog
                            .entity(config.entity)
                            .map(|r| &r.draft)
                            .ok_or_else(|| AppError::InvalidMethod(method.to_string()))?;
                        RequestValidator::validate(&params, draft_rules)?;
                        service.create(params).await
                    }
                    Verb::Update => {
                        RequestValidator::validate(&params, self.catalog.update_rules())?;
                        let update = UpdateParams::from_params(&params, config.key_lookup)?;
                        RequestValidator::validate_actions(&update.actions)?;
                        service.update(update).await
                    }
                }
            }
            Handler::Bulk(kind) => {
                BulkDispatcher::new(
                    Arc::clone(&self.transport),
                    Arc::clone(&self.catalog),
                    Arc::clone(&self.project_key),
                )
                .run(*kind, &params)
                .await
            }
        }
    }

    /// Like [`execute`](Self::execute), serialised to a JSON string.
    pub async fn run(&self, method: &str, params: Value) -> Result<String, AppError> {
        let value = self.execute(method, params).await?;
        Ok(serde_json::to_string(&value)?)
    }
}

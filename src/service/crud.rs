//! Base operations against one entity endpoint: one remote call each,
//! except update which reads the current version first.

use crate::config::EntityConfig;
use crate::endpoint::{apply_expand, Endpoint, Identifier, QueryParams};
use crate::error::{ApiError, AppError};
use crate::transport::{ApiRequest, Transport};
use serde_json::{json, Value};

pub struct CrudService<'a> {
    transport: &'a dyn Transport,
    config: &'static EntityConfig,
    endpoint: Endpoint,
}

impl<'a> CrudService<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'static EntityConfig, endpoint: Endpoint) -> Self {
        CrudService {
            transport,
            config,
            endpoint,
        }
    }

    pub fn config(&self) -> &'static EntityConfig {
        self.config
    }

    /// Single page fetch; the page body (results, count, total, offset) is returned unchanged.
    pub async fn query(&self, query: &QueryParams) -> Result<Value, AppError> {
        let request = query.apply(ApiRequest::get(self.endpoint.collection()), self.config.default_limit);
        tracing::debug!(entity = %self.config.entity, path = %request.path(), "query");
        self.transport
            .execute(request)
            .await
            .map_err(|e| AppError::remote(format!("Failed to query {}", self.config.plural), e))
    }

    pub async fn read_by_id(&self, id: &str, expand: &[String]) -> Result<Value, AppError> {
        self.read(&Identifier::Id(id.to_string()), expand).await
    }

    pub async fn read_by_key(&self, key: &str, expand: &[String]) -> Result<Value, AppError> {
        self.read(&Identifier::Key(key.to_string()), expand).await
    }

    pub async fn read(&self, identifier: &Identifier, expand: &[String]) -> Result<Value, AppError> {
        let request = apply_expand(ApiRequest::get(self.endpoint.by(identifier)), expand);
        tracing::debug!(entity = %self.config.entity, path = %request.path(), "read");
        self.transport.execute(request).await.map_err(|e| {
            AppError::remote(
                format!("Failed to read {} {}", self.config.label, identifier.describe()),
                e,
            )
        })
    }

    pub async fn create(&self, draft: Value) -> Result<Value, AppError> {
        let request = ApiRequest::post(self.endpoint.collection(), draft);
        tracing::debug!(entity = %self.config.entity, path = %request.path(), "create");
        self.transport
            .execute(request)
            .await
            .map_err(|e| AppError::remote(format!("Failed to create {}", self.config.label), e))
    }

    pub async fn update_by_id(&self, id: &str, version: Option<u64>, actions: Vec<Value>) -> Result<Value, AppError> {
        self.update(&Identifier::Id(id.to_string()), version, actions).await
    }

    pub async fn update_by_key(&self, key: &str, version: Option<u64>, actions: Vec<Value>) -> Result<Value, AppError> {
        self.update(&Identifier::Key(key.to_string()), version, actions).await
    }

    /// Posts `{version, actions}`. Without a known version the resource is read
    /// first; a failed read means no write is sent.
    pub async fn update(
        &self,
        identifier: &Identifier,
        version: Option<u64>,
        actions: Vec<Value>,
    ) -> Result<Value, AppError> {
        let context = format!("Failed to update {} {}", self.config.label, identifier.describe());
        let version = match version {
            Some(v) => v,
            None => {
                let current = self
                    .read(identifier, &[])
                    .await
                    .map_err(|e| e.within(context.clone()))?;
                version_of(&current).map_err(|e| AppError::remote(context.clone(), e))?
            }
        };
        let request = ApiRequest::post(
            self.endpoint.by(identifier),
            json!({ "version": version, "actions": actions }),
        );
        tracing::debug!(entity = %self.config.entity, path = %request.path(), version, "update");
        self.transport
            .execute(request)
            .await
            .map_err(|e| AppError::remote(context, e))
    }
}

/// The optimistic-concurrency version carried by every platform resource.
pub fn version_of(resource: &Value) -> Result<u64, ApiError> {
    resource
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| ApiError::InvalidResponse("resource has no version".into()))
}

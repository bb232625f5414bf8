//! Scope variants over the base operations: guard checks, field injection
//! and sourced creates for one resolved (entity, scope) pair.

use crate::config::{Catalog, CreateShape, EntityConfig, OwnerField, SourceRef, StoreBinding, StoreField};
use crate::config::types::quote_predicate_value;
use crate::context::Scope;
use crate::endpoint::{Endpoint, Identifier, ReadParams, UpdateParams};
use crate::error::{AppError, ApiError};
use crate::service::crud::{version_of, CrudService};
use crate::transport::Transport;
use serde_json::{json, Map, Value};

pub struct ScopedService<'a> {
    transport: &'a dyn Transport,
    catalog: &'a Catalog,
    project_key: &'a str,
    config: &'static EntityConfig,
    scope: Scope,
    crud: CrudService<'a>,
}

impl<'a> ScopedService<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        catalog: &'a Catalog,
        project_key: &'a str,
        config: &'static EntityConfig,
        scope: Scope,
    ) -> Self {
        let endpoint = Endpoint::for_scope(project_key, config, &scope);
        ScopedService {
            transport,
            catalog,
            project_key,
            config,
            scope,
            crud: CrudService::new(transport, config, endpoint),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// One resource when an identifier is given, otherwise a query page.
    pub async fn read(&self, params: &ReadParams) -> Result<Value, AppError> {
        let result = match &params.identifier {
            Some(identifier) => self.read_one(identifier, &params.query.expand).await,
            None => {
                let mut query = params.query.clone();
                if let Some(predicate) = self.scope_predicate() {
                    query = query.and_where(predicate);
                }
                self.crud.query(&query).await
            }
        };
        result.map_err(|e| self.prefixed("read", e))
    }

    pub async fn create(&self, draft: Value) -> Result<Value, AppError> {
        self.create_inner(draft).await.map_err(|e| self.prefixed("create", e))
    }

    pub async fn update(&self, params: UpdateParams) -> Result<Value, AppError> {
        self.update_inner(params).await.map_err(|e| self.prefixed("update", e))
    }

    /// Errors from the base operations already name the failed call; only
    /// scope-level failures get the `Failed to <verb> <label>` prefix here.
    fn prefixed(&self, verb: &str, err: AppError) -> AppError {
        match err {
            AppError::Remote { .. } | AppError::Operation { .. } => err,
            other => other.within(format!("Failed to {} {}", verb, self.config.label)),
        }
    }

    /// Reads one resource and checks it is visible to this scope.
    pub async fn read_one(&self, identifier: &Identifier, expand: &[String]) -> Result<Value, AppError> {
        let resource = self.crud.read(identifier, expand).await?;
        self.check_access(&resource)?;
        Ok(resource)
    }

    fn guards_reads(&self) -> bool {
        match self.scope {
            Scope::Customer(_) => true,
            Scope::Store(_) => self.config.store == Some(StoreBinding::Field),
            _ => false,
        }
    }

    fn scope_predicate(&self) -> Option<String> {
        match &self.scope {
            Scope::Customer(customer_id) => self.config.customer.map(|c| c.owner.predicate(customer_id)),
            Scope::Store(store_key) if self.config.store == Some(StoreBinding::Field) => {
                Some(format!("stores(key={})", quote_predicate_value(store_key)))
            }
            _ => None,
        }
    }

    fn check_access(&self, resource: &Value) -> Result<(), AppError> {
        match &self.scope {
            Scope::Customer(customer_id) => {
                let owner = self.config.customer.map(|c| c.owner).unwrap_or(OwnerField::CustomerId);
                let actual = resource.pointer(owner.pointer()).and_then(Value::as_str);
                if actual != Some(customer_id.as_str()) {
                    tracing::warn!(
                        entity = %self.config.entity,
                        customer_id = %customer_id,
                        "ownership check failed"
                    );
                    return Err(AppError::Ownership {
                        label: capitalize(self.config.label),
                        customer_id: customer_id.clone(),
                    });
                }
            }
            Scope::Store(store_key) if self.config.store == Some(StoreBinding::Field) => {
                if !lists_store(resource, store_key) {
                    return Err(AppError::ScopeMismatch {
                        label: capitalize(self.config.label),
                        store_key: store_key.clone(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Guarded scopes reuse the version from their access-check read.
    async fn update_inner(&self, params: UpdateParams) -> Result<Value, AppError> {
        if !self.guards_reads() {
            return self.crud.update(&params.identifier, None, params.actions).await;
        }
        let context = format!("Failed to update {} {}", self.config.label, params.identifier.describe());
        let current = self
            .read_one(&params.identifier, &[])
            .await
            .map_err(|e| e.within(context.clone()))?;
        let version = version_of(&current).map_err(|e| AppError::remote(context, e))?;
        self.crud
            .update(&params.identifier, Some(version), params.actions)
            .await
    }

    async fn create_inner(&self, draft: Value) -> Result<Value, AppError> {
        let Value::Object(mut draft) = draft else {
            return Err(AppError::Validation("draft must be an object".into()));
        };
        self.inject_scope_fields(&mut draft)?;
        if let CreateShape::FromSource(source) = self.config.create {
            self.fill_source(&mut draft, source).await?;
        }
        self.crud.create(Value::Object(draft)).await
    }

    fn inject_scope_fields(&self, draft: &mut Map<String, Value>) -> Result<(), AppError> {
        match &self.scope {
            Scope::Store(store_key) => {
                let store_ref = json!({ "typeId": "store", "key": store_key });
                match self.config.store {
                    Some(StoreBinding::InStore(StoreField::Single)) => {
                        draft.entry("store").or_insert(store_ref);
                    }
                    Some(StoreBinding::Field) => {
                        let stores = draft.entry("stores").or_insert_with(|| json!([]));
                        let Some(list) = stores.as_array_mut() else {
                            return Err(AppError::Validation("stores must be an array".into()));
                        };
                        if !list.iter().any(|s| s.get("key").and_then(Value::as_str) == Some(store_key.as_str())) {
                            list.push(store_ref);
                        }
                    }
                    _ => {}
                }
            }
            Scope::Customer(customer_id) => {
                let Some(binding) = self.config.customer else {
                    return Ok(());
                };
                let (field, value) = match binding.owner {
                    OwnerField::CustomerId => ("customerId", json!(customer_id)),
                    OwnerField::CustomerReference => ("customer", json!({ "typeId": "customer", "id": customer_id })),
                    OwnerField::SelfId => return Ok(()),
                };
                if let Some(existing) = draft.get(field) {
                    let existing_id = match binding.owner {
                        OwnerField::CustomerReference => existing.get("id").and_then(Value::as_str),
                        _ => existing.as_str(),
                    };
                    if existing_id.is_some() && existing_id != Some(customer_id.as_str()) {
                        return Err(AppError::Ownership {
                            label: capitalize(self.config.label),
                            customer_id: customer_id.clone(),
                        });
                    }
                }
                draft.insert(field.to_string(), value);
            }
            _ => {}
        }
        Ok(())
    }

    /// Completes the source reference and fetches its version through this scope.
    async fn fill_source(&self, draft: &mut Map<String, Value>, source: SourceRef) -> Result<(), AppError> {
        let source_config = self
            .catalog
            .entity(source.source)
            .map(|r| r.config)
            .ok_or_else(|| AppError::UnsupportedEntityType(source.source.to_string()))?;
        let reference = draft
            .get_mut(source.reference_field)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| AppError::Validation(format!("{} is required", source.reference_field)))?;
        reference
            .entry("typeId")
            .or_insert_with(|| json!(source_config.type_id));
        let identifier = match (
            reference.get("id").and_then(Value::as_str),
            reference.get("key").and_then(Value::as_str),
        ) {
            (Some(id), _) => Identifier::Id(id.to_string()),
            (None, Some(key)) => Identifier::Key(key.to_string()),
            (None, None) => {
                return Err(AppError::Validation(format!(
                    "{} must reference an id or key",
                    source.reference_field
                )))
            }
        };
        if draft.contains_key(source.version_field) {
            return Ok(());
        }
        let source_service = ScopedService::new(
            self.transport,
            self.catalog,
            self.project_key,
            source_config,
            self.scope.clone(),
        );
        let context = format!("Failed to create {}", self.config.label);
        let current = source_service
            .read_one(&identifier, &[])
            .await
            .map_err(|e| e.within(context.clone()))?;
        let version = version_of(&current).map_err(|e: ApiError| {
            AppError::remote(
                format!("Failed to read {} {}", source_config.label, identifier.describe()),
                e,
            )
            .within(context)
        })?;
        tracing::debug!(
            entity = %self.config.entity,
            source = %source.source,
            version,
            "resolved source version"
        );
        draft.insert(source.version_field.to_string(), json!(version));
        Ok(())
    }
}

fn lists_store(resource: &Value, store_key: &str) -> bool {
    resource
        .get("stores")
        .and_then(Value::as_array)
        .map(|stores| {
            stores
                .iter()
                .any(|s| s.get("key").and_then(Value::as_str) == Some(store_key))
        })
        .unwrap_or(false)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

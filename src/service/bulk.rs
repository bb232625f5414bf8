//! Concurrent create/update over heterogeneous `{entityType, data}` items.
//!
//! Every item is checked before anything is sent. Items then run as
//! independent tasks; the first failure fails the call, and tasks already
//! in flight are left to finish on their own.

use crate::config::{Catalog, EntityConfig};
use crate::context::Scope;
use crate::endpoint::UpdateParams;
use crate::error::{AppError, BulkKind};
use crate::service::scoped::ScopedService;
use crate::service::validation::RequestValidator;
use crate::transport::Transport;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkItem {
    entity_type: String,
    #[serde(default)]
    data: Value,
}

enum ItemOp {
    Create(Value),
    Update(UpdateParams),
}

struct Prepared {
    config: &'static EntityConfig,
    op: ItemOp,
}

#[derive(Clone)]
pub struct BulkDispatcher {
    transport: Arc<dyn Transport>,
    catalog: Arc<Catalog>,
    project_key: Arc<str>,
}

impl BulkDispatcher {
    pub fn new(transport: Arc<dyn Transport>, catalog: Arc<Catalog>, project_key: impl Into<Arc<str>>) -> Self {
        BulkDispatcher {
            transport,
            catalog,
            project_key: project_key.into(),
        }
    }

    /// Returns `{success: true, results}` with results in input order.
    pub async fn run(&self, kind: BulkKind, params: &Value) -> Result<Value, AppError> {
        RequestValidator::validate(params, self.catalog.bulk_rules())?;
        let items: Vec<BulkItem> = serde_json::from_value(params.get("items").cloned().unwrap_or_default())
            .map_err(|e| AppError::Validation(format!("items: {}", e)))?;

        let prepared = items
            .into_iter()
            .map(|item| self.prepare(kind, item))
            .collect::<Result<Vec<_>, AppError>>()
            .map_err(|e| AppError::Bulk {
                kind,
                message: e.to_string(),
            })?;

        let count = prepared.len();
        tracing::debug!(kind = ?kind, items = count, "bulk dispatch");
        let (sender, mut receiver) = mpsc::channel::<(usize, Result<Value, AppError>)>(count.max(1));
        for (index, item) in prepared.into_iter().enumerate() {
            let sender = sender.clone();
            let transport = Arc::clone(&self.transport);
            let catalog = Arc::clone(&self.catalog);
            let project_key = Arc::clone(&self.project_key);
            tokio::spawn(async move {
                let service = ScopedService::new(&*transport, &catalog, &project_key, item.config, Scope::Admin);
                let result = match item.op {
                    ItemOp::Create(draft) => service.create(draft).await,
                    ItemOp::Update(update) => service.update(update).await,
                };
                // the receiver is gone once another item failed
                let _ = sender.send((index, result)).await;
            });
        }
        drop(sender);

        let mut results: Vec<Option<Value>> = vec![None; count];
        for _ in 0..count {
            let Some((index, result)) = receiver.recv().await else {
                return Err(AppError::Bulk {
                    kind,
                    message: "item task ended without a result".into(),
                });
            };
            match result {
                Ok(value) => results[index] = Some(value),
                Err(e) => {
                    tracing::warn!(kind = ?kind, index, error = %e, "bulk item failed");
                    return Err(AppError::Bulk {
                        kind,
                        message: e.to_string(),
                    });
                }
            }
        }
        let results: Vec<Value> = results.into_iter().map(Option::unwrap_or_default).collect();
        Ok(json!({ "success": true, "results": results }))
    }

    fn prepare(&self, kind: BulkKind, item: BulkItem) -> Result<Prepared, AppError> {
        let resolved = self
            .catalog
            .bulk_entity(&item.entity_type)
            .ok_or_else(|| AppError::UnsupportedEntityType(item.entity_type.clone()))?;
        let op = match kind {
            BulkKind::Create => {
                RequestValidator::validate(&item.data, &resolved.draft)?;
                ItemOp::Create(item.data)
            }
            BulkKind::Update => {
                RequestValidator::validate(&item.data, self.catalog.update_rules())?;
                let update = UpdateParams::from_params(&item.data, resolved.config.key_lookup)?;
                RequestValidator::validate_actions(&update.actions)?;
                ItemOp::Update(update)
            }
        };
        Ok(Prepared {
            config: resolved.config,
            op,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load;
    use crate::transport::MockTransport;
    use std::time::Duration;

    fn dispatcher(mock: Arc<MockTransport>) -> BulkDispatcher {
        BulkDispatcher::new(mock, Arc::new(load().unwrap()), "shop")
    }

    #[tokio::test]
    async fn results_keep_input_order() {
        let mock = Arc::new(MockTransport::new());
        mock.on_post_delayed("/shop/zones", json!({"id": "zone-1"}), Duration::from_millis(40));
        mock.on_post("/shop/states", json!({"id": "state-1"}));
        let params = json!({"items": [
            {"entityType": "zone", "data": {"name": "Europe"}},
            {"entityType": "state", "data": {"key": "open", "type": "OrderState"}}
        ]});
        let out = dispatcher(mock).run(BulkKind::Create, &params).await.unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(out["results"][0]["id"], "zone-1");
        assert_eq!(out["results"][1]["id"], "state-1");
    }

    #[tokio::test]
    async fn unsupported_type_fails_before_dispatch() {
        let mock = Arc::new(MockTransport::new());
        let params = json!({"items": [
            {"entityType": "zone", "data": {"id": "z", "actions": [{"action": "setKey", "key": "eu"}]}},
            {"entityType": "widget", "data": {}}
        ]});
        let err = dispatcher(mock.clone()).run(BulkKind::Update, &params).await.unwrap_err();
        assert_eq!(err.to_string(), "Bulk update failed: Unsupported entity type: widget");
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn over_one_hundred_items_is_a_validation_error() {
        let mock = Arc::new(MockTransport::new());
        let items: Vec<Value> = (0..101)
            .map(|i| json!({"entityType": "zone", "data": {"name": format!("z{}", i)}}))
            .collect();
        let err = dispatcher(mock).run(BulkKind::Create, &json!({ "items": items })).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_items_need_identifier() {
        let mock = Arc::new(MockTransport::new());
        let params = json!({"items": [{"entityType": "zone", "data": {"actions": [{"action": "setKey"}]}}]});
        let err = dispatcher(mock).run(BulkKind::Update, &params).await.unwrap_err();
        assert_eq!(err.to_string(), "Bulk update failed: Either id or key must be provided");
    }
}

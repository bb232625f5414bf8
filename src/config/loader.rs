//! Load the catalog from the embedded JSON or from a file override.

use crate::config::entities::ENTITIES;
use crate::config::resolved::{Catalog, ResolvedEntity, RuleSet};
use crate::config::types::CatalogFile;
use crate::config::validate;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Draft and parameter rules compiled into the binary.
pub const EMBEDDED_CATALOG: &str = include_str!("catalog.json");

/// Load and resolve the embedded catalog.
pub fn load() -> Result<Catalog, ConfigError> {
    load_from_str(EMBEDDED_CATALOG)
}

pub fn load_from_str(json: &str) -> Result<Catalog, ConfigError> {
    let file: CatalogFile = serde_json::from_str(json).map_err(|e| ConfigError::Catalog(e.to_string()))?;
    resolve(&file)
}

/// Load a catalog file from disk, e.g. to tighten draft rules per deployment.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Catalog, ConfigError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Catalog(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loading catalog override");
    load_from_str(&json)
}

/// Build the resolved catalog (validates first).
pub fn resolve(file: &CatalogFile) -> Result<Catalog, ConfigError> {
    validate(file)?;

    let mut entities = HashMap::with_capacity(ENTITIES.len());
    for config in ENTITIES {
        let name = config.entity.as_str();
        let rules = file
            .drafts
            .get(name)
            .ok_or_else(|| ConfigError::Catalog(format!("no draft rules for {}", name)))?;
        entities.insert(
            config.entity,
            ResolvedEntity {
                config,
                draft: RuleSet::compile(name, rules)?,
            },
        );
    }

    let catalog = Catalog {
        entities,
        read: RuleSet::compile("read", &file.params.read)?,
        update: RuleSet::compile("update", &file.params.update)?,
        bulk: RuleSet::compile("bulk", &file.params.bulk)?,
    };
    tracing::debug!(entities = catalog.entities.len(), "catalog resolved");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Entity;

    #[test]
    fn embedded_catalog_resolves_every_entity() {
        let catalog = load().unwrap();
        assert_eq!(catalog.entities().count(), Entity::ALL.len());
        let cart = catalog.entity(Entity::Cart).unwrap();
        assert!(cart.draft.get("currency").unwrap().pattern.is_some());
    }

    #[test]
    fn malformed_json_is_a_catalog_error() {
        let err = load_from_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Catalog(_)));
    }

    #[tokio::test]
    async fn missing_override_file_reports_path() {
        let err = load_from_path("/nonexistent/catalog.json").await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}

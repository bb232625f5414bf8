//! Catalog validation: entity table coverage and draft rule consistency.

use crate::config::entities::ENTITIES;
use crate::config::types::*;
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

pub fn validate(file: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for config in ENTITIES {
        if !seen.insert(config.entity) {
            return Err(ConfigError::DuplicateEntity(config.entity.to_string()));
        }
    }
    for entity in Entity::ALL {
        if !seen.contains(entity) {
            return Err(ConfigError::Catalog(format!("no descriptor for entity {}", entity)));
        }
    }

    for name in file.drafts.keys() {
        name.parse::<Entity>()?;
    }
    for config in ENTITIES {
        let drafts = file
            .drafts
            .get(config.entity.as_str())
            .ok_or_else(|| ConfigError::Catalog(format!("no draft rules for {}", config.entity)))?;
        if let CreateShape::FromSource(src) = config.create {
            if !drafts.contains_key(src.reference_field) {
                return Err(ConfigError::Catalog(format!(
                    "{} drafts must declare the {} reference",
                    config.entity, src.reference_field
                )));
            }
        }
        check_rules(config.entity.as_str(), drafts)?;
    }

    for (owner, rules) in [
        ("read", &file.params.read),
        ("update", &file.params.update),
        ("bulk", &file.params.bulk),
    ] {
        check_rules(owner, rules)?;
    }
    if !file.params.update.contains_key("actions") {
        return Err(ConfigError::Catalog("update params must declare actions".into()));
    }
    if !file.params.bulk.contains_key("items") {
        return Err(ConfigError::Catalog("bulk params must declare items".into()));
    }
    Ok(())
}

fn check_rules(owner: &str, rules: &HashMap<String, ValidationRule>) -> Result<(), ConfigError> {
    for (field, rule) in rules {
        let invalid = |message: &str| ConfigError::InvalidValue {
            name: format!("{}.{}", owner, field),
            message: message.to_string(),
        };
        if let (Some(min), Some(max)) = (rule.min_length, rule.max_length) {
            if min > max {
                return Err(invalid("minLength exceeds maxLength"));
            }
        }
        if let (Some(min), Some(max)) = (rule.minimum, rule.maximum) {
            if min > max {
                return Err(invalid("minimum exceeds maximum"));
            }
        }
        if let (Some(min), Some(max)) = (rule.min_items, rule.max_items) {
            if min > max {
                return Err(invalid("minItems exceeds maxItems"));
            }
        }
        if matches!(&rule.allowed, Some(a) if a.is_empty()) {
            return Err(invalid("allowed list is empty"));
        }
        if rule.kind.is_some() && rule.any_of.is_some() {
            return Err(invalid("type and anyOf are exclusive"));
        }
        if let Some(format) = &rule.format {
            if !matches!(format.to_lowercase().as_str(), "email" | "uuid") {
                return Err(invalid("unknown format"));
            }
        }
    }
    Ok(())
}

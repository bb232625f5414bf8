//! Request validation from catalog rules.

use crate::config::{CompiledRule, FieldKind, RuleSet};
use crate::error::AppError;
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a parameter object against field rules. All required fields must be present.
    pub fn validate(params: &Value, rules: &RuleSet) -> Result<(), AppError> {
        let body = as_object(params)?;
        for compiled in rules.iter() {
            let field = compiled.field.as_str();
            let val = body.get(field);
            if compiled.rule.required == Some(true) && (val.is_none() || val == Some(&Value::Null)) {
                return Err(AppError::Validation(format!("{} is required", field)));
            }
            if let Some(v) = val {
                validate_field(field, v, compiled)?;
            }
        }
        Ok(())
    }

    /// Each update action must be an object carrying a string `action`.
    pub fn validate_actions(actions: &[Value]) -> Result<(), AppError> {
        for (i, action) in actions.iter().enumerate() {
            match action.get("action").and_then(Value::as_str) {
                Some(name) if !name.is_empty() => {}
                _ => {
                    return Err(AppError::Validation(format!(
                        "actions[{}] must be an object with a string action",
                        i
                    )))
                }
            }
        }
        Ok(())
    }
}

fn as_object(params: &Value) -> Result<&Map<String, Value>, AppError> {
    params
        .as_object()
        .ok_or_else(|| AppError::Validation("parameters must be an object".into()))
}

fn validate_field(col: &str, v: &Value, compiled: &CompiledRule) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    let rule = &compiled.rule;
    if let Some(kind) = rule.kind {
        if !kind.matches(v) {
            return Err(AppError::Validation(format!("{} must be of type {}", col, kind_name(kind))));
        }
    }
    if let Some(kinds) = &rule.any_of {
        if !kinds.iter().any(|k| k.matches(v)) {
            let names: Vec<&str> = kinds.iter().map(|k| kind_name(*k)).collect();
            return Err(AppError::Validation(format!(
                "{} must be one of types: {}",
                col,
                names.join(", ")
            )));
        }
    }
    if let Some(format) = &rule.format {
        validate_format(col, v, format)?;
    }
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    col, max
                )));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min as usize {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    col, min
                )));
            }
        }
        if let Some(re) = &compiled.pattern {
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
    }
    if let Some(ref allowed) = rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            return Err(AppError::Validation(format!(
                "{} must be one of: {:?}",
                col,
                allowed.iter().take(5).collect::<Vec<_>>()
            )));
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
    }
    if let Some(items) = v.as_array() {
        if let Some(min) = rule.min_items {
            if items.len() < min as usize {
                return Err(AppError::Validation(format!(
                    "{} must contain at least {} items",
                    col, min
                )));
            }
        }
        if let Some(max) = rule.max_items {
            if items.len() > max as usize {
                return Err(AppError::Validation(format!(
                    "{} must contain at most {} items",
                    col, max
                )));
            }
        }
    }
    Ok(())
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "string",
        FieldKind::Integer => "integer",
        FieldKind::Number => "number",
        FieldKind::Boolean => "boolean",
        FieldKind::Object => "object",
        FieldKind::Array => "array",
    }
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::String(t)) => s == t,
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn validate_format(col: &str, v: &Value, format: &str) -> Result<(), AppError> {
    match format.to_lowercase().as_str() {
        "email" => {
            if let Some(s) = v.as_str() {
                if !s.contains('@') || s.len() < 3 {
                    return Err(AppError::Validation(format!("{} must be a valid email", col)));
                }
            }
        }
        "uuid" => {
            if let Some(s) = v.as_str() {
                if uuid::Uuid::parse_str(s).is_err() {
                    return Err(AppError::Validation(format!("{} must be a valid UUID", col)));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load, Entity};
    use serde_json::json;

    #[test]
    fn required_fields_are_enforced() {
        let catalog = load().unwrap();
        let rules = &catalog.entity(Entity::Inventory).unwrap().draft;
        let err = RequestValidator::validate(&json!({"quantityOnStock": 5}), rules).unwrap_err();
        assert_eq!(err.to_string(), "validation: sku is required");
        RequestValidator::validate(&json!({"sku": "SKU-1", "quantityOnStock": 5}), rules).unwrap();
    }

    #[test]
    fn read_limit_is_bounded() {
        let catalog = load().unwrap();
        let rules = catalog.read_rules();
        assert!(RequestValidator::validate(&json!({"limit": 500}), rules).is_ok());
        let err = RequestValidator::validate(&json!({"limit": 501}), rules).unwrap_err();
        assert_eq!(err.to_string(), "validation: limit must be at most 500");
        assert!(RequestValidator::validate(&json!({"limit": "ten"}), rules).is_err());
        assert!(RequestValidator::validate(&json!({"offset": 10001}), rules).is_err());
    }

    #[test]
    fn where_accepts_string_or_list() {
        let catalog = load().unwrap();
        let rules = catalog.read_rules();
        assert!(RequestValidator::validate(&json!({"where": "sku=\"a\""}), rules).is_ok());
        assert!(RequestValidator::validate(&json!({"where": ["a", "b"]}), rules).is_ok());
        assert!(RequestValidator::validate(&json!({"where": 3}), rules).is_err());
    }

    #[test]
    fn patterns_and_allowed_values() {
        let catalog = load().unwrap();
        let cart = &catalog.entity(Entity::Cart).unwrap().draft;
        let err = RequestValidator::validate(&json!({"currency": "eur"}), cart).unwrap_err();
        assert_eq!(err.to_string(), "validation: currency does not match required pattern");
        let bu = &catalog.entity(Entity::BusinessUnit).unwrap().draft;
        let err = RequestValidator::validate(
            &json!({"key": "acme", "name": "Acme", "unitType": "Team"}),
            bu,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("validation: unitType must be one of"));
    }

    #[test]
    fn update_actions_need_a_discriminator() {
        assert!(RequestValidator::validate_actions(&[json!({"action": "changeName"})]).is_ok());
        let err = RequestValidator::validate_actions(&[json!({"action": "setKey"}), json!({"key": "x"})]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation: actions[1] must be an object with a string action"
        );
    }

    #[test]
    fn empty_actions_fail_min_items() {
        let catalog = load().unwrap();
        let err = RequestValidator::validate(&json!({"id": "x", "actions": []}), catalog.update_rules()).unwrap_err();
        assert_eq!(err.to_string(), "validation: actions must contain at least 1 items");
    }

    #[test]
    fn non_object_params_are_rejected() {
        let err = RequestValidator::validate(&json!([1, 2]), &RuleSet::default()).unwrap_err();
        assert_eq!(err.to_string(), "validation: parameters must be an object");
    }
}

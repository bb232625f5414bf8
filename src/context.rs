//! Per-session actor context and the scope it resolves to.

use crate::error::{AppError, ConfigError};
use serde::{Deserialize, Serialize};
use std::env;

/// Actor flags supplied once per session. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub store_key: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub business_unit_key: Option<String>,
}

impl Context {
    pub fn admin() -> Self {
        Context {
            is_admin: true,
            ..Default::default()
        }
    }

    pub fn with_store(mut self, store_key: impl Into<String>) -> Self {
        self.store_key = Some(store_key.into());
        self
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_business_unit(mut self, business_unit_key: impl Into<String>) -> Self {
        self.business_unit_key = Some(business_unit_key.into());
        self
    }

    /// Reads `COMMERCE_IS_ADMIN`, `COMMERCE_STORE_KEY`, `COMMERCE_CUSTOMER_ID`
    /// and `COMMERCE_BUSINESS_UNIT_KEY`. Empty values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let is_admin = match non_empty_env("COMMERCE_IS_ADMIN") {
            None => false,
            Some(v) => parse_flag(&v).ok_or_else(|| ConfigError::InvalidValue {
                name: "COMMERCE_IS_ADMIN".into(),
                message: format!("expected true or false, got '{}'", v),
            })?,
        };
        Ok(Context {
            is_admin,
            store_key: non_empty_env("COMMERCE_STORE_KEY"),
            customer_id: non_empty_env("COMMERCE_CUSTOMER_ID"),
            business_unit_key: non_empty_env("COMMERCE_BUSINESS_UNIT_KEY"),
        })
    }

    fn store(&self) -> Option<&str> {
        self.store_key.as_deref().filter(|s| !s.is_empty())
    }

    fn customer(&self) -> Option<&str> {
        self.customer_id.as_deref().filter(|s| !s.is_empty())
    }

    fn business_unit(&self) -> Option<&str> {
        self.business_unit_key.as_deref().filter(|s| !s.is_empty())
    }
}

pub(crate) fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Which family of endpoints services a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Admin,
    Store,
    Customer,
    Associate,
    Public,
}

/// A context reduced to the one access pattern an entity uses for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    Admin,
    Store(String),
    Customer(String),
    Associate {
        associate_id: String,
        business_unit_key: String,
    },
    /// Read-only, customer-facing data needing no actor flags.
    Public,
}

impl Scope {
    pub fn admin(context: &Context) -> Result<Scope, AppError> {
        if !context.is_admin {
            return Err(AppError::MissingScope {
                field: "isAdmin",
                scope: "admin",
            });
        }
        Ok(Scope::Admin)
    }

    pub fn store(context: &Context) -> Result<Scope, AppError> {
        context
            .store()
            .map(|k| Scope::Store(k.to_string()))
            .ok_or(AppError::MissingScope {
                field: "storeKey",
                scope: "store",
            })
    }

    pub fn customer(context: &Context) -> Result<Scope, AppError> {
        context
            .customer()
            .map(|c| Scope::Customer(c.to_string()))
            .ok_or(AppError::MissingScope {
                field: "customerId",
                scope: "customer",
            })
    }

    pub fn associate(context: &Context) -> Result<Scope, AppError> {
        let associate_id = context.customer().ok_or(AppError::MissingScope {
            field: "customerId",
            scope: "associate",
        })?;
        let business_unit_key = context.business_unit().ok_or(AppError::MissingScope {
            field: "businessUnitKey",
            scope: "associate",
        })?;
        Ok(Scope::Associate {
            associate_id: associate_id.to_string(),
            business_unit_key: business_unit_key.to_string(),
        })
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Admin => ScopeKind::Admin,
            Scope::Store(_) => ScopeKind::Store,
            Scope::Customer(_) => ScopeKind::Customer,
            Scope::Associate { .. } => ScopeKind::Associate,
            Scope::Public => ScopeKind::Public,
        }
    }

    /// Picks the first supported scope in precedence order:
    /// associate, customer, store, admin, then public read.
    pub fn resolve(context: &Context, supports: impl Fn(ScopeKind) -> bool) -> Option<Scope> {
        if supports(ScopeKind::Associate) {
            if let Ok(scope) = Scope::associate(context) {
                return Some(scope);
            }
        }
        if supports(ScopeKind::Customer) {
            if let Ok(scope) = Scope::customer(context) {
                return Some(scope);
            }
        }
        if supports(ScopeKind::Store) {
            if let Ok(scope) = Scope::store(context) {
                return Some(scope);
            }
        }
        if supports(ScopeKind::Admin) && context.is_admin {
            return Some(Scope::Admin);
        }
        if supports(ScopeKind::Public) {
            return Some(Scope::Public);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(_: ScopeKind) -> bool {
        true
    }

    #[test]
    fn associate_beats_everything_else() {
        let ctx = Context::admin()
            .with_store("eu")
            .with_customer("c-1")
            .with_business_unit("acme");
        assert_eq!(
            Scope::resolve(&ctx, all),
            Some(Scope::Associate {
                associate_id: "c-1".into(),
                business_unit_key: "acme".into()
            })
        );
    }

    #[test]
    fn customer_beats_store_and_admin() {
        let ctx = Context::admin().with_store("eu").with_customer("c-1");
        assert_eq!(Scope::resolve(&ctx, all), Some(Scope::Customer("c-1".into())));
    }

    #[test]
    fn unsupported_scopes_are_skipped() {
        let ctx = Context::admin().with_customer("c-1").with_business_unit("acme");
        let scope = Scope::resolve(&ctx, |k| k == ScopeKind::Admin);
        assert_eq!(scope, Some(Scope::Admin));
    }

    #[test]
    fn empty_context_resolves_to_nothing_without_public_read() {
        let ctx = Context::default();
        assert_eq!(Scope::resolve(&ctx, |k| k != ScopeKind::Public), None);
        assert_eq!(Scope::resolve(&ctx, all), Some(Scope::Public));
    }

    #[test]
    fn empty_strings_count_as_unset() {
        let ctx = Context::default().with_store("");
        assert!(matches!(
            Scope::store(&ctx),
            Err(AppError::MissingScope { field: "storeKey", .. })
        ));
    }

    #[test]
    fn associate_requires_business_unit() {
        let ctx = Context::default().with_customer("c-1");
        let err = Scope::associate(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "businessUnitKey is required for associate scope");
    }

    #[test]
    fn context_deserializes_camel_case() {
        let ctx: Context = serde_json::from_str(r#"{"isAdmin":true,"storeKey":"eu"}"#).unwrap();
        assert!(ctx.is_admin);
        assert_eq!(ctx.store_key.as_deref(), Some("eu"));
        assert_eq!(ctx.customer_id, None);
    }
}

//! Builds path segments for an entity under a resolved scope.

use crate::config::{AssociateBinding, EntityConfig, KeyLookup, StoreBinding};
use crate::context::Scope;
use crate::endpoint::Identifier;

/// Base path plus resource for one (entity, scope) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    base: Vec<String>,
    resource: &'static str,
    key_lookup: KeyLookup,
}

impl Endpoint {
    pub fn for_scope(project_key: &str, config: &EntityConfig, scope: &Scope) -> Self {
        let mut base = vec![project_key.to_string()];
        let mut resource = config.resource;
        match scope {
            Scope::Admin | Scope::Customer(_) => {}
            Scope::Store(store_key) => {
                if let Some(StoreBinding::InStore(_)) = config.store {
                    base.push("in-store".into());
                    base.push(format!("key={}", store_key));
                }
            }
            Scope::Associate {
                associate_id,
                business_unit_key,
            } => {
                base.push("as-associate".into());
                base.push(associate_id.clone());
                if config.associate != Some(AssociateBinding::AssociateOnly) {
                    base.push("in-business-unit".into());
                    base.push(format!("key={}", business_unit_key));
                }
            }
            Scope::Public => {
                resource = config.public_read.unwrap_or(config.resource);
            }
        }
        Endpoint {
            base,
            resource,
            key_lookup: config.key_lookup,
        }
    }

    pub fn collection(&self) -> Vec<String> {
        let mut segments = self.base.clone();
        segments.push(self.resource.to_string());
        segments
    }

    pub fn by_id(&self, id: &str) -> Vec<String> {
        let mut segments = self.collection();
        segments.push(id.to_string());
        segments
    }

    /// `key=...`, or `order-number=...` for orders.
    pub fn by_key(&self, key: &str) -> Vec<String> {
        let mut segments = self.collection();
        segments.push(format!("{}={}", self.key_lookup.segment, key));
        segments
    }

    pub fn by(&self, identifier: &Identifier) -> Vec<String> {
        match identifier {
            Identifier::Id(id) => self.by_id(id),
            Identifier::Key(key) => self.by_key(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Entity, ENTITIES};

    fn config(e: Entity) -> &'static EntityConfig {
        ENTITIES.iter().find(|c| c.entity == e).unwrap()
    }

    fn path(segments: Vec<String>) -> String {
        format!("/{}", segments.join("/"))
    }

    #[test]
    fn admin_paths_are_project_wide() {
        let ep = Endpoint::for_scope("shop", config(Entity::Inventory), &Scope::Admin);
        assert_eq!(path(ep.collection()), "/shop/inventory");
        assert_eq!(path(ep.by_id("x")), "/shop/inventory/x");
        assert_eq!(path(ep.by_key("sku-1")), "/shop/inventory/key=sku-1");
    }

    #[test]
    fn in_store_entities_route_through_store() {
        let ep = Endpoint::for_scope("shop", config(Entity::Cart), &Scope::Store("eu".into()));
        assert_eq!(path(ep.by_id("c-1")), "/shop/in-store/key=eu/carts/c-1");
    }

    #[test]
    fn store_field_entities_stay_on_project_endpoints() {
        let ep = Endpoint::for_scope("shop", config(Entity::CartDiscount), &Scope::Store("eu".into()));
        assert_eq!(path(ep.collection()), "/shop/cart-discounts");
        assert_eq!(ep, Endpoint::for_scope("shop", config(Entity::CartDiscount), &Scope::Admin));
        assert_ne!(ep, Endpoint::for_scope("shop", config(Entity::Cart), &Scope::Admin));
    }

    #[test]
    fn associate_paths() {
        let scope = Scope::Associate {
            associate_id: "a-1".into(),
            business_unit_key: "acme".into(),
        };
        let ep = Endpoint::for_scope("shop", config(Entity::QuoteRequest), &scope);
        assert_eq!(
            path(ep.collection()),
            "/shop/as-associate/a-1/in-business-unit/key=acme/quote-requests"
        );
        let ep = Endpoint::for_scope("shop", config(Entity::BusinessUnit), &scope);
        assert_eq!(path(ep.by_key("acme")), "/shop/as-associate/a-1/business-units/key=acme");
    }

    #[test]
    fn orders_use_order_number_segment() {
        let ep = Endpoint::for_scope("shop", config(Entity::Order), &Scope::Admin);
        assert_eq!(path(ep.by_key("10001")), "/shop/orders/order-number=10001");
    }

    #[test]
    fn public_reads_use_projection_resource() {
        let ep = Endpoint::for_scope("shop", config(Entity::Product), &Scope::Public);
        assert_eq!(path(ep.collection()), "/shop/product-projections");
    }
}

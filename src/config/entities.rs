//! Built-in entity table: endpoints, identifier lookups and scope bindings.

use crate::config::types::*;

const DEFAULT_LIMIT: u32 = 10;

const fn entity(
    entity: Entity,
    label: &'static str,
    plural: &'static str,
    resource: &'static str,
    type_id: &'static str,
) -> EntityConfig {
    EntityConfig {
        entity,
        label,
        plural,
        resource,
        type_id,
        key_lookup: BY_KEY,
        default_limit: DEFAULT_LIMIT,
        create: CreateShape::Draft,
        store: None,
        customer: None,
        associate: None,
        public_read: None,
        bulk: false,
    }
}

const fn bulk(mut config: EntityConfig) -> EntityConfig {
    config.bulk = true;
    config
}

pub static ENTITIES: &[EntityConfig] = &[
    entity(Entity::AttributeGroup, "attribute group", "attribute groups", "attribute-groups", "attribute-group"),
    EntityConfig {
        store: Some(StoreBinding::Field),
        associate: Some(AssociateBinding::AssociateOnly),
        ..entity(Entity::BusinessUnit, "business unit", "business units", "business-units", "business-unit")
    },
    EntityConfig {
        store: Some(StoreBinding::InStore(StoreField::Single)),
        customer: Some(CustomerBinding {
            owner: OwnerField::CustomerId,
            can_create: true,
        }),
        associate: Some(AssociateBinding::InBusinessUnit),
        ..entity(Entity::Cart, "cart", "carts", "carts", "cart")
    },
    bulk(EntityConfig {
        store: Some(StoreBinding::Field),
        ..entity(Entity::CartDiscount, "cart discount", "cart discounts", "cart-discounts", "cart-discount")
    }),
    bulk(EntityConfig {
        public_read: Some("categories"),
        ..entity(Entity::Category, "category", "categories", "categories", "category")
    }),
    bulk(EntityConfig {
        default_limit: 20,
        ..entity(Entity::Channel, "channel", "channels", "channels", "channel")
    }),
    bulk(EntityConfig {
        store: Some(StoreBinding::InStore(StoreField::None)),
        customer: Some(CustomerBinding {
            owner: OwnerField::SelfId,
            can_create: false,
        }),
        ..entity(Entity::Customer, "customer", "customers", "customers", "customer")
    }),
    bulk(entity(Entity::CustomerGroup, "customer group", "customer groups", "customer-groups", "customer-group")),
    bulk(entity(Entity::DiscountCode, "discount code", "discount codes", "discount-codes", "discount-code")),
    bulk(entity(Entity::Inventory, "inventory entry", "inventory entries", "inventory", "inventory-entry")),
    EntityConfig {
        key_lookup: KeyLookup {
            param: "orderNumber",
            segment: "order-number",
        },
        create: CreateShape::FromSource(SourceRef {
            source: Entity::Cart,
            reference_field: "cart",
            version_field: "version",
        }),
        store: Some(StoreBinding::InStore(StoreField::None)),
        customer: Some(CustomerBinding {
            owner: OwnerField::CustomerId,
            can_create: true,
        }),
        associate: Some(AssociateBinding::InBusinessUnit),
        ..entity(Entity::Order, "order", "orders", "orders", "order")
    },
    EntityConfig {
        customer: Some(CustomerBinding {
            owner: OwnerField::CustomerReference,
            can_create: true,
        }),
        ..entity(Entity::Payment, "payment", "payments", "payments", "payment")
    },
    bulk(EntityConfig {
        public_read: Some("product-projections"),
        ..entity(Entity::Product, "product", "products", "products", "product")
    }),
    bulk(entity(Entity::ProductDiscount, "product discount", "product discounts", "product-discounts", "product-discount")),
    entity(Entity::ProductSelection, "product selection", "product selections", "product-selections", "product-selection"),
    bulk(entity(Entity::ProductType, "product type", "product types", "product-types", "product-type")),
    EntityConfig {
        create: CreateShape::FromSource(SourceRef {
            source: Entity::StagedQuote,
            reference_field: "stagedQuote",
            version_field: "stagedQuoteVersion",
        }),
        store: Some(StoreBinding::InStore(StoreField::None)),
        customer: Some(CustomerBinding {
            owner: OwnerField::CustomerReference,
            can_create: false,
        }),
        associate: Some(AssociateBinding::InBusinessUnit),
        ..entity(Entity::Quote, "quote", "quotes", "quotes", "quote")
    },
    EntityConfig {
        create: CreateShape::FromSource(SourceRef {
            source: Entity::Cart,
            reference_field: "cart",
            version_field: "cartVersion",
        }),
        store: Some(StoreBinding::InStore(StoreField::None)),
        customer: Some(CustomerBinding {
            owner: OwnerField::CustomerReference,
            can_create: true,
        }),
        associate: Some(AssociateBinding::InBusinessUnit),
        ..entity(Entity::QuoteRequest, "quote request", "quote requests", "quote-requests", "quote-request")
    },
    entity(Entity::Review, "review", "reviews", "reviews", "review"),
    entity(Entity::ShippingMethod, "shipping method", "shipping methods", "shipping-methods", "shipping-method"),
    EntityConfig {
        store: Some(StoreBinding::InStore(StoreField::Single)),
        customer: Some(CustomerBinding {
            owner: OwnerField::CustomerReference,
            can_create: true,
        }),
        associate: Some(AssociateBinding::InBusinessUnit),
        ..entity(Entity::ShoppingList, "shopping list", "shopping lists", "shopping-lists", "shopping-list")
    },
    EntityConfig {
        create: CreateShape::FromSource(SourceRef {
            source: Entity::QuoteRequest,
            reference_field: "quoteRequest",
            version_field: "quoteRequestVersion",
        }),
        store: Some(StoreBinding::InStore(StoreField::None)),
        ..entity(Entity::StagedQuote, "staged quote", "staged quotes", "staged-quotes", "staged-quote")
    },
    bulk(entity(Entity::StandalonePrice, "standalone price", "standalone prices", "standalone-prices", "standalone-price")),
    bulk(entity(Entity::State, "state", "states", "states", "state")),
    bulk(entity(Entity::Store, "store", "stores", "stores", "store")),
    entity(Entity::Subscription, "subscription", "subscriptions", "subscriptions", "subscription"),
    bulk(entity(Entity::TaxCategory, "tax category", "tax categories", "tax-categories", "tax-category")),
    bulk(entity(Entity::Type, "type", "types", "types", "type")),
    bulk(entity(Entity::Zone, "zone", "zones", "zones", "zone")),
];

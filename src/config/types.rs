//! Entity descriptors and the declarative rule types loaded from the catalog.

use crate::context::ScopeKind;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

macro_rules! entities {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Remote resource types exposed through the method surface.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Entity {
            $($variant),*
        }

        impl Entity {
            pub const ALL: &'static [Entity] = &[$(Entity::$variant),*];

            /// Snake-case token used in method names and bulk item types.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Entity::$variant => $name),*
                }
            }
        }

        impl FromStr for Entity {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Entity::$variant),)*
                    _ => Err(ConfigError::UnknownEntity(s.to_string())),
                }
            }
        }
    };
}

entities! {
    AttributeGroup => "attribute_group",
    BusinessUnit => "business_unit",
    Cart => "cart",
    CartDiscount => "cart_discount",
    Category => "category",
    Channel => "channel",
    Customer => "customer",
    CustomerGroup => "customer_group",
    DiscountCode => "discount_code",
    Inventory => "inventory",
    Order => "order",
    Payment => "payment",
    Product => "product",
    ProductDiscount => "product_discount",
    ProductSelection => "product_selection",
    ProductType => "product_type",
    Quote => "quote",
    QuoteRequest => "quote_request",
    Review => "review",
    ShippingMethod => "shipping_method",
    ShoppingList => "shopping_list",
    StagedQuote => "staged_quote",
    StandalonePrice => "standalone_price",
    State => "state",
    Store => "store",
    Subscription => "subscription",
    TaxCategory => "tax_category",
    Type => "type",
    Zone => "zone",
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation family a method name starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Read,
    Create,
    Update,
}

impl Verb {
    pub const ALL: &'static [Verb] = &[Verb::Read, Verb::Create, Verb::Update];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Read => "read",
            Verb::Create => "create",
            Verb::Update => "update",
        }
    }
}

/// Path segment used for lookups by the secondary identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyLookup {
    /// Parameter name callers use (`key`, `orderNumber`).
    pub param: &'static str,
    /// Path prefix before `=` (`key`, `order-number`).
    pub segment: &'static str,
}

pub const BY_KEY: KeyLookup = KeyLookup {
    param: "key",
    segment: "key",
};

/// What a store-scoped create adds to the draft when the caller left it out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreField {
    None,
    /// `store: {typeId: "store", key}`
    Single,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBinding {
    /// Calls go through `/in-store/key={storeKey}/...`.
    InStore(StoreField),
    /// Project endpoints; membership is carried in the resource's `stores` list.
    Field,
}

/// Where a resource records the customer that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerField {
    /// `customerId: "..."`
    CustomerId,
    /// `customer: {typeId: "customer", id: "..."}`
    CustomerReference,
    /// The resource is the customer.
    SelfId,
}

impl OwnerField {
    pub fn pointer(&self) -> &'static str {
        match self {
            OwnerField::CustomerId => "/customerId",
            OwnerField::CustomerReference => "/customer/id",
            OwnerField::SelfId => "/id",
        }
    }

    pub fn predicate(&self, customer_id: &str) -> String {
        let quoted = quote_predicate_value(customer_id);
        match self {
            OwnerField::CustomerId => format!("customerId={}", quoted),
            OwnerField::CustomerReference => format!("customer(id={})", quoted),
            OwnerField::SelfId => format!("id={}", quoted),
        }
    }
}

/// Quotes a value for a query predicate.
pub fn quote_predicate_value(v: &str) -> String {
    format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\""))
}

#[derive(Clone, Copy, Debug)]
pub struct CustomerBinding {
    pub owner: OwnerField,
    pub can_create: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssociateBinding {
    /// `/as-associate/{id}/in-business-unit/key={bu}/...`
    InBusinessUnit,
    /// `/as-associate/{id}/...`
    AssociateOnly,
}

/// A create that materialises another resource (order from cart, ...).
#[derive(Clone, Copy, Debug)]
pub struct SourceRef {
    pub source: Entity,
    /// Draft field holding the source reference (`cart`, `quoteRequest`).
    pub reference_field: &'static str,
    /// Draft field receiving the source version (`version`, `cartVersion`).
    pub version_field: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub enum CreateShape {
    Draft,
    FromSource(SourceRef),
}

#[derive(Clone, Copy, Debug)]
pub struct EntityConfig {
    pub entity: Entity,
    pub label: &'static str,
    pub plural: &'static str,
    pub resource: &'static str,
    pub type_id: &'static str,
    pub key_lookup: KeyLookup,
    pub default_limit: u32,
    pub create: CreateShape,
    pub store: Option<StoreBinding>,
    pub customer: Option<CustomerBinding>,
    pub associate: Option<AssociateBinding>,
    /// Resource serving anonymous reads when no actor flag matches.
    pub public_read: Option<&'static str>,
    pub bulk: bool,
}

impl EntityConfig {
    pub fn supports(&self, kind: ScopeKind) -> bool {
        match kind {
            ScopeKind::Admin => true,
            ScopeKind::Store => self.store.is_some(),
            ScopeKind::Customer => self.customer.is_some(),
            ScopeKind::Associate => self.associate.is_some(),
            ScopeKind::Public => self.public_read.is_some(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldKind {
    pub fn matches(&self, v: &serde_json::Value) -> bool {
        match self {
            FieldKind::String => v.is_string(),
            FieldKind::Integer => v.is_i64() || v.is_u64(),
            FieldKind::Number => v.is_number(),
            FieldKind::Boolean => v.is_boolean(),
            FieldKind::Object => v.is_object(),
            FieldKind::Array => v.is_array(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<FieldKind>,
    /// Alternative kinds, e.g. `where` may be a string or a list.
    #[serde(default)]
    pub any_of: Option<Vec<FieldKind>>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub allowed: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub min_items: Option<u32>,
    #[serde(default)]
    pub max_items: Option<u32>,
}

/// Raw catalog file: shared parameter rules plus per-entity draft rules.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub params: ParamRulesFile,
    #[serde(default)]
    pub drafts: HashMap<String, HashMap<String, ValidationRule>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParamRulesFile {
    pub read: HashMap<String, ValidationRule>,
    pub update: HashMap<String, ValidationRule>,
    pub bulk: HashMap<String, ValidationRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_tokens_round_trip_through_from_str() {
        for e in Entity::ALL {
            assert_eq!(e.as_str().parse::<Entity>().unwrap(), *e);
        }
        assert!("widget".parse::<Entity>().is_err());
    }

    #[test]
    fn owner_predicates() {
        assert_eq!(OwnerField::CustomerId.predicate("c-1"), r#"customerId="c-1""#);
        assert_eq!(OwnerField::CustomerReference.predicate("c-1"), r#"customer(id="c-1")"#);
        assert_eq!(quote_predicate_value(r#"a"b"#), r#""a\"b""#);
    }

    #[test]
    fn rule_deserializes_camel_case_keys() {
        let rule: ValidationRule =
            serde_json::from_str(r#"{"required":true,"type":"string","minLength":2,"anyOf":["string","array"]}"#).unwrap();
        assert_eq!(rule.required, Some(true));
        assert_eq!(rule.kind, Some(FieldKind::String));
        assert_eq!(rule.min_length, Some(2));
        assert_eq!(rule.any_of.as_deref(), Some(&[FieldKind::String, FieldKind::Array][..]));
    }
}

//! Typed method identifiers and the per-context registry behind the
//! `<verb>_<entity>` call surface.

use crate::config::{Catalog, Entity, EntityConfig, Verb};
use crate::context::{Context, Scope};
use crate::error::{AppError, BulkKind};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodId {
    Entity { verb: Verb, entity: Entity },
    BulkCreate,
    BulkUpdate,
}

impl MethodId {
    pub fn entity(verb: Verb, entity: Entity) -> Self {
        MethodId::Entity { verb, entity }
    }
}

impl FromStr for MethodId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidMethod(s.to_string());
        match s {
            "bulk_create" => return Ok(MethodId::BulkCreate),
            "bulk_update" => return Ok(MethodId::BulkUpdate),
            _ => {}
        }
        let (verb, entity) = s.split_once('_').ok_or_else(invalid)?;
        let verb = match verb {
            "read" => Verb::Read,
            "create" => Verb::Create,
            "update" => Verb::Update,
            _ => return Err(invalid()),
        };
        let entity = entity.parse::<Entity>().map_err(|_| invalid())?;
        Ok(MethodId::Entity { verb, entity })
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodId::Entity { verb, entity } => write!(f, "{}_{}", verb.as_str(), entity),
            MethodId::BulkCreate => f.write_str("bulk_create"),
            MethodId::BulkUpdate => f.write_str("bulk_update"),
        }
    }
}

/// What a method resolves to for the session's context.
#[derive(Clone, Debug)]
pub enum Handler {
    Entity {
        config: &'static EntityConfig,
        verb: Verb,
        scope: Scope,
    },
    Bulk(BulkKind),
}

/// Methods available to one context, with the scope each is served through.
#[derive(Clone, Debug, Default)]
pub struct MethodRegistry {
    handlers: BTreeMap<MethodId, Handler>,
}

impl MethodRegistry {
    /// Resolves every entity's scope once; verbs the scope cannot serve are left out.
    pub fn for_context(catalog: &Catalog, context: &Context) -> Self {
        let mut handlers = BTreeMap::new();
        for resolved in catalog.entities() {
            let config = resolved.config;
            let Some(scope) = Scope::resolve(context, |kind| config.supports(kind)) else {
                continue;
            };
            for verb in Verb::ALL {
                if catalog.allows(config.entity, *verb, scope.kind()) {
                    handlers.insert(
                        MethodId::entity(*verb, config.entity),
                        Handler::Entity {
                            config,
                            verb: *verb,
                            scope: scope.clone(),
                        },
                    );
                }
            }
        }
        if context.is_admin {
            handlers.insert(MethodId::BulkCreate, Handler::Bulk(BulkKind::Create));
            handlers.insert(MethodId::BulkUpdate, Handler::Bulk(BulkKind::Update));
        }
        tracing::debug!(methods = handlers.len(), "method registry built");
        MethodRegistry { handlers }
    }

    pub fn get(&self, id: &MethodId) -> Option<&Handler> {
        self.handlers.get(id)
    }

    /// Unknown names and methods unavailable to this context both yield `InvalidMethod`.
    pub fn resolve(&self, name: &str) -> Result<(MethodId, &Handler), AppError> {
        let id: MethodId = name.parse()?;
        self.get(&id)
            .map(|handler| (id, handler))
            .ok_or_else(|| AppError::InvalidMethod(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        self.handlers.keys().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

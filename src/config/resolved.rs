//! Resolved catalog: entity descriptors joined with compiled rule sets.

use crate::config::types::*;
use crate::context::ScopeKind;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashMap;

/// One field rule with its pattern compiled.
#[derive(Clone, Debug)]
pub struct CompiledRule {
    pub field: String,
    pub rule: ValidationRule,
    pub pattern: Option<Regex>,
}

/// Field rules sorted by name so validation errors are deterministic.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compiles `rules`; `owner` names the rule set in pattern errors.
    pub fn compile(owner: &str, rules: &HashMap<String, ValidationRule>) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (field, rule) in rules {
            let pattern = match &rule.pattern {
                Some(p) => Some(Regex::new(p).map_err(|e| ConfigError::InvalidPattern {
                    entity: owner.to_string(),
                    field: field.clone(),
                    message: e.to_string(),
                })?),
                None => None,
            };
            compiled.push(CompiledRule {
                field: field.clone(),
                rule: rule.clone(),
                pattern,
            });
        }
        compiled.sort_by(|a, b| a.field.cmp(&b.field));
        Ok(RuleSet { rules: compiled })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    pub fn get(&self, field: &str) -> Option<&CompiledRule> {
        self.rules
            .binary_search_by(|r| r.field.as_str().cmp(field))
            .ok()
            .map(|i| &self.rules[i])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedEntity {
    pub config: &'static EntityConfig,
    pub draft: RuleSet,
}

impl ResolvedEntity {
    pub fn entity(&self) -> Entity {
        self.config.entity
    }
}

/// Everything the method layer needs, checked once at startup.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub(crate) entities: HashMap<Entity, ResolvedEntity>,
    pub(crate) read: RuleSet,
    pub(crate) update: RuleSet,
    pub(crate) bulk: RuleSet,
}

impl Catalog {
    pub fn entity(&self, entity: Entity) -> Option<&ResolvedEntity> {
        self.entities.get(&entity)
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &ResolvedEntity> {
        Entity::ALL.iter().filter_map(|e| self.entities.get(e))
    }

    pub fn read_rules(&self) -> &RuleSet {
        &self.read
    }

    pub fn update_rules(&self) -> &RuleSet {
        &self.update
    }

    pub fn bulk_rules(&self) -> &RuleSet {
        &self.bulk
    }

    /// Looks up a bulk item type; only bulk-capable entities qualify.
    pub fn bulk_entity(&self, entity_type: &str) -> Option<&ResolvedEntity> {
        let entity: Entity = entity_type.parse().ok()?;
        self.entity(entity).filter(|r| r.config.bulk)
    }

    /// Whether `verb` exists for `entity` when served through a `kind` scope.
    pub fn allows(&self, entity: Entity, verb: Verb, kind: ScopeKind) -> bool {
        let Some(resolved) = self.entity(entity) else {
            return false;
        };
        let config = resolved.config;
        if !config.supports(kind) {
            return false;
        }
        match (verb, kind) {
            (Verb::Read, _) => true,
            (_, ScopeKind::Public) => false,
            (Verb::Update, _) => true,
            (Verb::Create, ScopeKind::Customer) => {
                let can_create = config.customer.map(|c| c.can_create).unwrap_or(false);
                can_create && self.source_supports(config, kind)
            }
            (Verb::Create, _) => self.source_supports(config, kind),
        }
    }

    fn source_supports(&self, config: &EntityConfig, kind: ScopeKind) -> bool {
        match config.create {
            CreateShape::Draft => true,
            CreateShape::FromSource(src) => self
                .entity(src.source)
                .map(|s| s.config.supports(kind))
                .unwrap_or(false),
        }
    }
}

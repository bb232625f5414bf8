//! Typed views over validated parameter objects.

use crate::config::KeyLookup;
use crate::error::AppError;
use crate::transport::ApiRequest;
use serde_json::Value;

/// How a single resource is addressed. An `id` wins over a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identifier {
    Id(String),
    Key(String),
}

impl Identifier {
    pub fn from_params(params: &Value, lookup: KeyLookup) -> Option<Self> {
        if let Some(id) = non_empty_str(params, "id") {
            return Some(Identifier::Id(id));
        }
        non_empty_str(params, lookup.param).map(Identifier::Key)
    }

    /// Suffix for error prefixes: "by ID" or "by key".
    pub fn describe(&self) -> &'static str {
        match self {
            Identifier::Id(_) => "by ID",
            Identifier::Key(_) => "by key",
        }
    }
}

fn non_empty_str(params: &Value, name: &str) -> Option<String> {
    params
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts a string or a list of strings.
fn string_list(params: &Value, name: &str) -> Vec<String> {
    match params.get(name) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn integer(params: &Value, name: &str) -> Result<Option<u32>, AppError> {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).map_err(|_| AppError::Validation(format!("{} is out of range", name))))
        .transpose()
}

/// Paging, filtering and expansion for a collection fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub predicates: Vec<String>,
    pub sort: Vec<String>,
    pub expand: Vec<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl QueryParams {
    pub fn from_params(params: &Value) -> Result<Self, AppError> {
        Ok(QueryParams {
            predicates: string_list(params, "where"),
            sort: string_list(params, "sort"),
            expand: string_list(params, "expand"),
            limit: integer(params, "limit")?,
            offset: integer(params, "offset")?,
        })
    }

    /// Adds a predicate ANDed with the caller's (each `where` is combined by the platform).
    pub fn and_where(mut self, predicate: impl Into<String>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    /// Query string for a list fetch; the default limit comes from the entity table.
    pub fn apply(&self, mut request: ApiRequest, default_limit: u32) -> ApiRequest {
        request = request
            .with_query("limit", self.limit.unwrap_or(default_limit).to_string())
            .with_query("offset", self.offset.unwrap_or(0).to_string());
        for p in &self.predicates {
            request = request.with_query("where", p.clone());
        }
        for s in &self.sort {
            request = request.with_query("sort", s.clone());
        }
        apply_expand(request, &self.expand)
    }
}

pub fn apply_expand(mut request: ApiRequest, expand: &[String]) -> ApiRequest {
    for e in expand {
        request = request.with_query("expand", e.clone());
    }
    request
}

/// Read params: a single resource when an identifier is present, else a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadParams {
    pub identifier: Option<Identifier>,
    pub query: QueryParams,
}

impl ReadParams {
    pub fn from_params(params: &Value, lookup: KeyLookup) -> Result<Self, AppError> {
        Ok(ReadParams {
            identifier: Identifier::from_params(params, lookup),
            query: QueryParams::from_params(params)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateParams {
    pub identifier: Identifier,
    pub actions: Vec<Value>,
}

impl UpdateParams {
    pub fn from_params(params: &Value, lookup: KeyLookup) -> Result<Self, AppError> {
        let identifier = Identifier::from_params(params, lookup).ok_or(AppError::MissingIdentifier {
            key_param: lookup.param,
        })?;
        let actions = params
            .get("actions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(UpdateParams { identifier, actions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BY_KEY;
    use serde_json::json;

    #[test]
    fn id_wins_over_key() {
        let ident = Identifier::from_params(&json!({"id": "a", "key": "b"}), BY_KEY);
        assert_eq!(ident, Some(Identifier::Id("a".into())));
        let ident = Identifier::from_params(&json!({"id": "", "key": "b"}), BY_KEY);
        assert_eq!(ident, Some(Identifier::Key("b".into())));
    }

    #[test]
    fn query_defaults_and_repeated_where() {
        let q = QueryParams::from_params(&json!({"where": ["a=1", "b=2"], "sort": "name asc"})).unwrap();
        let req = q.apply(ApiRequest::get(vec!["p".into(), "carts".into()]), 10);
        assert_eq!(req.query_values("limit"), vec!["10"]);
        assert_eq!(req.query_values("offset"), vec!["0"]);
        assert_eq!(req.query_values("where"), vec!["a=1", "b=2"]);
        assert_eq!(req.query_values("sort"), vec!["name asc"]);
    }

    #[test]
    fn explicit_paging_overrides_default() {
        let q = QueryParams::from_params(&json!({"limit": 50, "offset": 100})).unwrap();
        let req = q.apply(ApiRequest::get(vec!["p".into()]), 10);
        assert_eq!(req.query_values("limit"), vec!["50"]);
        assert_eq!(req.query_values("offset"), vec!["100"]);
    }

    #[test]
    fn paging_beyond_u32_is_rejected() {
        let err = QueryParams::from_params(&json!({"limit": 4_294_967_296u64})).unwrap_err();
        assert_eq!(err.to_string(), "validation: limit is out of range");
        let q = QueryParams::from_params(&json!({"offset": 4_294_967_295u64})).unwrap();
        assert_eq!(q.offset, Some(u32::MAX));
    }

    #[test]
    fn update_without_identifier_names_lookup_param() {
        let lookup = KeyLookup {
            param: "orderNumber",
            segment: "order-number",
        };
        let err = UpdateParams::from_params(&json!({"actions": []}), lookup).unwrap_err();
        assert_eq!(err.to_string(), "Either id or orderNumber must be provided");
    }
}

//! Outbound request model and the transport seam every operation goes through.

mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use http::HttpTransport;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;

use crate::error::ApiResult;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// One call against the platform: path segments are joined and
/// percent-encoded by the transport.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(segments: Vec<String>) -> Self {
        ApiRequest {
            method: Method::GET,
            segments,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(segments: Vec<String>, body: Value) -> Self {
        ApiRequest {
            method: Method::POST,
            segments,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    /// `/`-joined path, unencoded. Used for logs and test matching.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Executes a single request and returns the parsed JSON body.
/// Implementations hold no per-call state and are shared across tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_query_helpers() {
        let req = ApiRequest::get(vec!["shop".into(), "carts".into(), "key=c 1".into()])
            .with_query("where", "a=1")
            .with_query("where", "b=2")
            .with_query("limit", "10");
        assert_eq!(req.path(), "/shop/carts/key=c 1");
        assert_eq!(req.query_values("where"), vec!["a=1", "b=2"]);
        assert_eq!(req.query_values("offset"), Vec::<&str>::new());
    }
}

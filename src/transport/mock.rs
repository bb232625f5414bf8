//! # Mock transport
//!
//! Records every request and answers from canned responses keyed by
//! method and path. Unmatched requests fail with a 404 so a missing
//! expectation shows up as a remote error rather than a panic.
//!
//! ```ignore
//! let mock = Arc::new(MockTransport::new());
//! mock.on_get("/shop/carts/c-1", json!({"id": "c-1", "version": 3}));
//! // ... run operations against `mock.clone()` ...
//! assert_eq!(mock.requests().len(), 1);
//! ```

use super::{ApiRequest, Transport};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
enum Reply {
    Ok(Value),
    Fail { status: u16, message: String },
}

struct Route {
    method: Method,
    path: String,
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(&self, path: &str, body: Value) -> &Self {
        self.push(Method::GET, path, Reply::Ok(body), None)
    }

    pub fn on_post(&self, path: &str, body: Value) -> &Self {
        self.push(Method::POST, path, Reply::Ok(body), None)
    }

    /// Answers after `delay`; lets tests order concurrent completions.
    pub fn on_post_delayed(&self, path: &str, body: Value, delay: Duration) -> &Self {
        self.push(Method::POST, path, Reply::Ok(body), Some(delay))
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, message: &str) -> &Self {
        self.push(
            method,
            path,
            Reply::Fail {
                status,
                message: message.to_string(),
            },
            None,
        )
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path() == path)
            .collect()
    }

    fn push(&self, method: Method, path: &str, reply: Reply, delay: Option<Duration>) -> &Self {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            reply,
            delay,
        });
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let path = request.path();
        let matched = {
            let routes = self.routes.lock().unwrap();
            routes
                .iter()
                .find(|r| r.method == request.method && r.path == path)
                .map(|r| (r.reply.clone(), r.delay))
        };
        let method = request.method.clone();
        self.requests.lock().unwrap().push(request);

        let Some((reply, delay)) = matched else {
            return Err(ApiError::api_response(
                404,
                format!("no mock response for {} {}", method, path),
            ));
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Ok(body) => Ok(body),
            Reply::Fail { status, message } => Err(ApiError::api_response(status, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn answers_registered_routes_and_records_requests() {
        let mock = MockTransport::new();
        mock.on_get("/shop/carts/c-1", json!({"id": "c-1"}));
        let body = mock
            .execute(ApiRequest::get(vec!["shop".into(), "carts".into(), "c-1".into()]))
            .await
            .unwrap();
        assert_eq!(body["id"], "c-1");
        assert_eq!(mock.requests_to(Method::GET, "/shop/carts/c-1").len(), 1);
    }

    #[tokio::test]
    async fn unmatched_requests_fail_with_not_found() {
        let mock = MockTransport::new();
        let err = mock
            .execute(ApiRequest::get(vec!["shop".into(), "orders".into()]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(mock.requests().len(), 1);
    }
}

//! reqwest-backed transport with bearer auth and request correlation ids.

use super::{ApiRequest, Transport};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ConfigError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

const X_CORRELATION_ID: &str = "X-Correlation-ID";

#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
    base: Url,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base = Url::parse(&config.api_url).map_err(|e| ConfigError::InvalidValue {
            name: "api_url".into(),
            message: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("commerce-agent-sdk/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &config.access_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| ConfigError::InvalidValue {
                name: "access_token".into(),
                message: "not a valid header value".into(),
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                name: "http client".into(),
                message: e.to_string(),
            })?;

        Ok(HttpTransport {
            inner,
            base,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url_for(&self, request: &ApiRequest) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.url_for(&request)?;
        let correlation_id = Uuid::new_v4().to_string();
        tracing::debug!(
            method = %request.method,
            path = %request.path(),
            query = ?request.query,
            correlation_id = %correlation_id,
            "request"
        );

        let mut builder = self
            .inner
            .request(request.method.clone(), url)
            .header(X_CORRELATION_ID, &correlation_id);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = builder.send().await?;
        let result = handle_response(response).await;
        match &result {
            Ok(_) => tracing::debug!(
                correlation_id = %correlation_id,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "response"
            ),
            Err(e) => tracing::warn!(
                correlation_id = %correlation_id,
                path = %request.path(),
                error = %e,
                "request failed"
            ),
        }
        result
    }
}

async fn handle_response(response: Response) -> ApiResult<Value> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&text)?);
    }
    Err(ApiError::api_response(status.as_u16(), error_message(&text)))
}

/// Platform error bodies look like `{"statusCode":404,"message":"...","errors":[...]}`.
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if text.is_empty() {
                "empty error response".to_string()
            } else {
                text.to_string()
            }
        })
}

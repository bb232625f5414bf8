//! Connection settings for the commerce platform, from env or builder calls.

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.europe-west1.gcp.commercetools.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Platform API root; the project key is appended per request.
    pub api_url: String,
    pub project_key: String,
    /// Bearer token. Acquisition and refresh happen outside this crate.
    pub access_token: Option<String>,
    /// Whole request timeout; the only cancellation this layer applies.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(project_key: impl Into<String>) -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            project_key: project_key.into(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `COMMERCE_PROJECT_KEY` (required), `COMMERCE_API_URL`,
    /// `COMMERCE_ACCESS_TOKEN` and `COMMERCE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_key = env::var("COMMERCE_PROJECT_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("COMMERCE_PROJECT_KEY".into()))?;
        let api_url = env::var("COMMERCE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let access_token = env::var("COMMERCE_ACCESS_TOKEN").ok().filter(|s| !s.is_empty());
        let timeout = match env::var("COMMERCE_TIMEOUT_SECS") {
            Ok(s) => Duration::from_secs(s.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "COMMERCE_TIMEOUT_SECS".into(),
                message: format!("not a number of seconds: {}", s),
            })?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let config = ClientConfig {
            api_url,
            project_key,
            access_token,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: "api_url".into(),
                message: "must start with http:// or https://".into(),
            });
        }
        if self.project_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "project_key".into(),
                message: "cannot be empty".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "timeout".into(),
                message: "cannot be zero".into(),
            });
        }
        Ok(())
    }
}

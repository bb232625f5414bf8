//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result alias for transport calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("catalog load: {0}")]
    Catalog(String),
    #[error("unknown entity in catalog: {0}")]
    UnknownEntity(String),
    #[error("duplicate catalog entry: {0}")]
    DuplicateEntity(String),
    #[error("invalid pattern for {entity}.{field}: {message}")]
    InvalidPattern {
        entity: String,
        field: String,
        message: String,
    },
}

/// Failure of a single outbound call to the commerce platform.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error ({status}): {message}")]
    ApiResponse { status: u16, message: String },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        ApiError::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// HTTP status reported by the platform, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ApiResponse { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkKind {
    Create,
    Update,
}

impl BulkKind {
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            BulkKind::Create => "Bulk creation failed",
            BulkKind::Update => "Bulk update failed",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("Either id or {key_param} must be provided")]
    MissingIdentifier { key_param: &'static str },
    #[error("{field} is required for {scope} scope")]
    MissingScope {
        field: &'static str,
        scope: &'static str,
    },
    #[error("{label} does not belong to customer {customer_id}")]
    Ownership { label: String, customer_id: String },
    #[error("{label} does not belong to store {store_key}")]
    ScopeMismatch { label: String, store_key: String },
    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ApiError,
    },
    #[error("{context}: {source}")]
    Operation {
        context: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("Unsupported entity type: {0}")]
    UnsupportedEntityType(String),
    #[error("Invalid method {0}")]
    InvalidMethod(String),
    #[error("{}: {message}", .kind.failure_prefix())]
    Bulk { kind: BulkKind, message: String },
    #[error("serialization: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AppError {
    pub fn remote(context: impl Into<String>, source: ApiError) -> Self {
        AppError::Remote {
            context: context.into(),
            source,
        }
    }

    /// Wraps `self` under a human-readable operation prefix.
    pub fn within(self, context: impl Into<String>) -> Self {
        AppError::Operation {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Platform status code at the bottom of the wrap chain, if any.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            AppError::Remote { source, .. } => source.status(),
            AppError::Operation { source, .. } => source.remote_status(),
            _ => None,
        }
    }

    /// Innermost error, skipping operation prefixes.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Operation { source, .. } => source.root(),
            other => other,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match self.root() {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::MissingIdentifier { .. } => (StatusCode::BAD_REQUEST, "missing_identifier"),
            AppError::MissingScope { .. } => (StatusCode::FORBIDDEN, "missing_scope"),
            AppError::Ownership { .. } | AppError::ScopeMismatch { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::Remote { .. } => match self.remote_status() {
                Some(404) => (StatusCode::NOT_FOUND, "not_found"),
                Some(409) => (StatusCode::CONFLICT, "conflict"),
                Some(400) => (StatusCode::BAD_REQUEST, "remote_rejected"),
                _ => (StatusCode::BAD_GATEWAY, "remote_error"),
            },
            AppError::UnsupportedEntityType(_) => (StatusCode::BAD_REQUEST, "unsupported_entity_type"),
            AppError::InvalidMethod(_) => (StatusCode::NOT_FOUND, "invalid_method"),
            AppError::Bulk { .. } => (StatusCode::BAD_GATEWAY, "bulk_failed"),
            AppError::Serialize(_) => (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error"),
            AppError::Operation { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_prefixes_chain_into_message() {
        let err = AppError::remote(
            "Failed to read cart by ID",
            ApiError::api_response(404, "The Resource with ID 'x' was not found."),
        )
        .within("Failed to update cart by ID");
        assert_eq!(
            err.to_string(),
            "Failed to update cart by ID: Failed to read cart by ID: API error (404): The Resource with ID 'x' was not found."
        );
        assert_eq!(err.remote_status(), Some(404));
    }

    #[test]
    fn bulk_message_uses_kind_prefix() {
        let err = AppError::Bulk {
            kind: BulkKind::Update,
            message: "Unsupported entity type: widget".into(),
        };
        assert_eq!(err.to_string(), "Bulk update failed: Unsupported entity type: widget");
    }

    #[test]
    fn missing_identifier_names_key_param() {
        let err = AppError::MissingIdentifier { key_param: "key" };
        assert_eq!(err.to_string(), "Either id or key must be provided");
    }

    #[test]
    fn root_skips_prefixes() {
        let err = AppError::Ownership {
            label: "Cart".into(),
            customer_id: "c-1".into(),
        }
        .within("Failed to read cart");
        assert!(matches!(err.root(), AppError::Ownership { .. }));
        assert_eq!(err.to_string(), "Failed to read cart: Cart does not belong to customer c-1");
    }
}

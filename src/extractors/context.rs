//! Extract the session context from request headers.

use crate::context::{parse_flag, Context};
use crate::error::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const ADMIN_HEADER: &str = "X-Admin";
pub const STORE_KEY_HEADER: &str = "X-Store-Key";
pub const CUSTOMER_ID_HEADER: &str = "X-Customer-Id";
pub const BUSINESS_UNIT_KEY_HEADER: &str = "X-Business-Unit-Key";

/// `None` when the request sets none of the context headers.
#[derive(Clone, Debug)]
pub struct RequestContext(pub Option<Context>);

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v: &axum::http::HeaderValue| v.to_str().ok())
        .map(|s: &str| s.trim().to_string())
        .filter(|s: &String| !s.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = header(parts, ADMIN_HEADER);
        let store_key = header(parts, STORE_KEY_HEADER);
        let customer_id = header(parts, CUSTOMER_ID_HEADER);
        let business_unit_key = header(parts, BUSINESS_UNIT_KEY_HEADER);
        if admin.is_none() && store_key.is_none() && customer_id.is_none() && business_unit_key.is_none() {
            return Ok(RequestContext(None));
        }
        let is_admin = match admin {
            Some(v) => parse_flag(&v)
                .ok_or_else(|| AppError::Validation(format!("{} must be true or false", ADMIN_HEADER)))?,
            None => false,
        };
        Ok(RequestContext(Some(Context {
            is_admin,
            store_key,
            customer_id,
            business_unit_key,
        })))
    }
}

//! Method handlers: list the methods a context can call, and invoke one.

use crate::config::Verb;
use crate::error::AppError;
use crate::extractors::RequestContext;
use crate::methods::MethodId;
use crate::response::{success_many, success_method, SuccessMany, SuccessOne};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

pub async fn list_methods(
    State(state): State<AppState>,
    RequestContext(context): RequestContext,
) -> (StatusCode, Json<SuccessMany<String>>) {
    success_many(state.api(context).methods())
}

/// Body is the parameter object; an empty body means `{}`. Creates answer 201.
pub async fn invoke(
    State(state): State<AppState>,
    RequestContext(context): RequestContext,
    Path(method): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessOne<Value>>), AppError> {
    let params = parse_params(&body)?;
    let data = state.api(context).execute(&method, params).await?;
    let status = match method.parse::<MethodId>() {
        Ok(MethodId::Entity {
            verb: Verb::Create, ..
        })
        | Ok(MethodId::BulkCreate) => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    Ok(success_method(status, &method, data))
}

fn parse_params(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("request body is not valid JSON: {}", e)))
}

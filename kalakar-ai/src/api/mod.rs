//! HTTP API handlers for kalakar-ai

pub mod ai;
pub mod auth;
pub mod health;
pub mod voice;

pub use ai::ai_routes;
pub use auth::AuthLayer;
pub use health::health_routes;
pub use voice::voice_routes;

use crate::error::{ApiError, ApiResult};
use axum::{extract::rejection::JsonRejection, Json};

/// Language used when a request names none
pub const DEFAULT_LANGUAGE: &str = "en";

/// Unwrap a JSON body, reporting rejections in the API error format
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Require a non-blank string field
pub(crate) fn required_field(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("'{}' is required", name)))
}

pub(crate) fn language_or_default(language: Option<String>) -> String {
    language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

//! Error types for kalakar-ai
//!
//! Pipeline-critical failures (`ListingError`, `VoiceError`) abort the request.
//! Supplementary steps never fail a request; they record a `Degradation`
//! and substitute a fallback value instead.
//!
//! User-visible messages are generic. Provider detail is logged, never echoed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Listing pipeline error
#[derive(Debug, Error)]
pub enum ListingError {
    /// No usable image signal (no images, vision unreachable, or no labels)
    #[error("Image analysis failed: {0}")]
    Analysis(String),

    /// Generative output could not be parsed into a structured draft
    #[error("Draft synthesis failed: {0}")]
    Synthesis(String),

    /// Voice description contained no recognizable speech
    #[error("Transcription failed: {0}")]
    Transcription(String),
}

/// Voice assistant error
#[derive(Debug, Error)]
pub enum VoiceError {
    /// No speech detected, or speech-to-text unreachable
    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// Text-to-speech failed on an explicit synthesis request
    #[error("Speech synthesis failed: {0}")]
    Speech(String),
}

/// Non-fatal fallback taken during a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// Cultural story replaced by the fixed fallback text
    CulturalStory,
    /// Intent interpretation replaced by a canned response
    Interpretation,
    /// Command-to-action mapping replaced by an empty action list
    CommandMapping,
    /// Spoken response omitted, text returned alone
    SpeechSynthesis,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Degradation::CulturalStory => "cultural_story",
            Degradation::Interpretation => "interpretation",
            Degradation::CommandMapping => "command_mapping",
            Degradation::SpeechSynthesis => "speech_synthesis",
        };
        f.write_str(name)
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (500), message is safe to show to users
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Log the underlying error and return a generic 500
    pub fn internal(user_message: &str, cause: impl fmt::Display) -> Self {
        tracing::error!(error = %cause, "{}", user_message);
        ApiError::Internal(user_message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_hides_cause() {
        let err = ApiError::internal(
            "Failed to generate AI listing",
            "Gemini API returned 403: API key not valid",
        );
        match err {
            ApiError::Internal(msg) => {
                assert_eq!(msg, "Failed to generate AI listing");
                assert!(!msg.contains("403"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_degradation_display() {
        assert_eq!(Degradation::CulturalStory.to_string(), "cultural_story");
        assert_eq!(Degradation::CommandMapping.to_string(), "command_mapping");
        assert_eq!(Degradation::SpeechSynthesis.to_string(), "speech_synthesis");
    }
}

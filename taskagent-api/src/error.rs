//! Error types for the TaskAgent API
//!
//! Upstream model failures keep their own status codes (auth 401, rate
//! limit 429, API failure 502) so callers can distinguish "our fault" from
//! "the model's fault". A model response that fails validation is 422: the
//! request was fine, the extraction was not, and nothing was persisted.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::LlmError;
use crate::validators::ParseError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream language-model failure (401/429/502)
    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    /// Model response failed validation (422)
    #[error("Response validation failed: {0}")]
    Validation(#[from] ParseError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// taskagent-common error
    #[error("Common error: {0}")]
    Common(#[from] taskagent_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Llm(ref err) => {
                let (status, code) = match err {
                    LlmError::Auth(_) => (StatusCode::UNAUTHORIZED, "LLM_AUTH_ERROR"),
                    LlmError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "LLM_RATE_LIMITED"),
                    _ => (StatusCode::BAD_GATEWAY, "LLM_API_ERROR"),
                };
                (status, code, err.to_string())
            }
            ApiError::Validation(ref err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.code(), err.to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
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

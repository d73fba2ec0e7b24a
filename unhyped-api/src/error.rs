//! Error types for unhyped-api
//!
//! The wire envelope is `{"error": message}` for client errors and
//! `{"error": summary, "detail": message}` for server-side failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::PipelineError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Upload exceeds the configured limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Pipeline failed, usually an upstream model error (500)
    #[error("Analyze failed: {0}")]
    AnalyzeFailed(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::AnalyzeFailed(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg }))
            }
            ApiError::AnalyzeFailed(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Analyze failed", "detail": detail }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

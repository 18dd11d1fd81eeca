//! Error types for the webhook
//!
//! Only transport-level problems surface as HTTP errors; domain-level
//! rejections (wrong kind, undecodable object) are admission denials and
//! never reach this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced as HTTP status codes by the request dispatcher
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The HTTP request did not carry a usable admission review
    /// (wrong method, wrong content type, malformed or empty body,
    /// missing request field)
    #[error("invalid admission review: {0}")]
    InvalidReview(String),

    /// The outbound response envelope could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebhookError::InvalidReview(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            WebhookError::Serialization(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

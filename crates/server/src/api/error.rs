//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use wavswap_core::ConversionServiceError;

pub const NOT_FOUND_MESSAGE: &str = "Not found";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error returned by a handler, rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn payload_too_large(limit_label: &str) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("File too large. Maximum size is {}", limit_label),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ConversionServiceError> for ApiError {
    fn from(err: ConversionServiceError) -> Self {
        let status = match &err {
            ConversionServiceError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ConversionServiceError::BadRequest(_) | ConversionServiceError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ConversionServiceError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ConversionServiceError::Internal(_) => {
                // storage errors carry server paths; keep them in the log only
                error!(error = %err, "Internal error while handling upload");
                return Self::internal(SERVER_ERROR_MESSAGE);
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found(NOT_FOUND_MESSAGE)
}

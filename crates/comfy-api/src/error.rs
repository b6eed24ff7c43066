//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use comfy_core::{BackendError, Operation};
use serde::Serialize;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 422 Unprocessable Entity (request body failed shape validation)
    Validation(Vec<FieldViolation>),
    /// 500 Internal Server Error
    Internal(String),
    /// 504 Gateway Timeout
    GatewayTimeout(String),
}

/// One offending field in a rejected request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Path to the field, starting with `"body"`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldViolation {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Error response format: `{"detail": ...}`
#[derive(Serialize)]
struct ErrorResponse<T> {
    detail: T,
}

impl ApiError {
    /// Translate a failed backend call for `operation` into a client-facing error.
    ///
    /// Timeouts become 504 with the operation's timeout detail; every other
    /// failure becomes 500 carrying the underlying message.
    pub fn from_backend(operation: Operation, err: BackendError) -> Self {
        match err {
            BackendError::Timeout => ApiError::GatewayTimeout(operation.timeout_detail().to_string()),
            other => ApiError::Internal(format!("ComfyUI service error: {}", other)),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            ApiError::Validation(violations) => {
                tracing::debug!(?violations, "API client error");
                (status, Json(ErrorResponse { detail: violations })).into_response()
            }
            ApiError::Internal(message) | ApiError::GatewayTimeout(message) => {
                // Handlers log the failing operation at error level
                tracing::debug!(status = status.as_u16(), %message, "API error");
                (status, Json(ErrorResponse { detail: message })).into_response()
            }
        }
    }
}

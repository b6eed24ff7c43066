//! Common error types for workflow backends

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur while talking to the workflow backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// The call did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection failure or other transport error
    #[error("{0}")]
    Unavailable(String),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code returned by the backend
        status: u16,
        /// Raw response body (may be empty)
        body: String,
    },

    /// Backend answered with success but the body was not valid JSON
    #[error("Invalid JSON in response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Whether this error represents an expired timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout)
    }
}

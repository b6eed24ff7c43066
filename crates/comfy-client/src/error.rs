//! Error types for ComfyUI client operations

use thiserror::Error;

/// Result type alias for ComfyUI client operations
pub type Result<T> = std::result::Result<T, ComfyClientError>;

/// Errors that can occur during ComfyUI client operations
#[derive(Error, Debug)]
pub enum ComfyClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Base URL cannot carry path segments (e.g. `mailto:`)
    #[error("Base URL cannot be used as a base: {0}")]
    CannotBeABase(String),

    /// Backend returned a non-success status
    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl ComfyClientError {
    /// Create a server error from status code and body
    pub fn server_error(status: u16, body: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            body: body.into(),
        }
    }

    /// Classify a transport error so timeouts and refused connections stay distinct
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::HttpError(err)
        }
    }
}

//! Error types for the owner service adapters

use thiserror::Error;

/// Errors from the theme persistence endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the connection failed
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with an unexpected status
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The response body could not be read or parsed
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Request(e.to_string())
    }
}

/// Result type alias for persistence adapter operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the push channel
#[derive(Debug, Error)]
pub enum PushError {
    /// The underlying HTTP client could not be constructed
    #[error("failed to build push client: {0}")]
    ClientBuild(String),

    /// The transport only supports a single subscription at a time
    #[error("subscription already open")]
    AlreadyOpen,
}

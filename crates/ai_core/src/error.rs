//! Engine errors

use std::time::Duration;

use thiserror::Error;

/// Longest backend error body kept in [`EngineError::Status`]
const MAX_BODY_CHARS: usize = 512;

/// Errors that can occur while generating
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to connect to the backend
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Backend did not answer within the configured timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Request could not be built or sent
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Streaming body broke off or reported a failure
    #[error("Stream error: {0}")]
    StreamError(String),
}

impl EngineError {
    /// Classify a transport error, reporting `timeout` for timeouts
    pub fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::StreamError(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }

    /// Build a status error, truncating long bodies
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(MAX_BODY_CHARS).collect(),
        }
    }
}

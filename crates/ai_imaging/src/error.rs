//! Image generation errors

use thiserror::Error;

/// Errors that can occur while producing card images
#[derive(Debug, Error)]
pub enum ImageGenerationError {
    /// Failed to connect to the generation service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent or completed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Timeout waiting for the generation service
    #[error("Generation timeout after {0}ms")]
    Timeout(u64),

    /// Service answered with a non-success status
    #[error("Server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Provider message, if one could be extracted
        message: String,
    },

    /// Response body did not match any known shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local rendering failed
    #[error("Rendering failed: {0}")]
    Rendering(String),
}

impl ImageGenerationError {
    /// Map a transport error, using `timeout_ms` for timeouts
    pub fn from_reqwest(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

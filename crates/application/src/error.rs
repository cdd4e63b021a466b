//! Application-level errors
//!
//! Mirrors the pipeline's failure taxonomy: validation problems block an
//! action, network/upstream/decode failures trigger fallbacks where one exists,
//! and `GenerationUnavailable` is reserved for the case where both the remote
//! and the local card generator failed.

use domain::{DomainError, ValidationKind};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// Domain-level error (including input validation)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Timeout, connectivity or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("Upstream error (status {status:?}): {message}")]
    Upstream {
        /// HTTP or provider status code, if known
        status: Option<u16>,
        /// Message reported by the provider
        message: String,
    },

    /// Provider payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Both remote generation and the local fallback failed
    #[error("Card generation unavailable: remote failed ({remote}), local fallback failed ({local})")]
    GenerationUnavailable {
        /// Remote failure description
        remote: String,
        /// Local failure description
        local: String,
    },

    /// Referenced item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persisted state could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Audio output rejected a playback request
    #[error("Playback error: {0}")]
    Playback(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Create an upstream error
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Check if this failure should route to a local fallback
    pub const fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Upstream { .. } | Self::Decode(_)
        )
    }

    /// Check if this error is an input validation failure
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(DomainError::Validation { .. }))
    }

    /// The validation kind, if this is a validation failure
    pub const fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            Self::Domain(err) => err.validation_kind(),
            _ => None,
        }
    }
}

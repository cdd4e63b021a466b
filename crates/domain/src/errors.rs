//! Domain-level errors

use std::fmt;

use thiserror::Error;

/// What kind of input was rejected by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// The file's MIME type is not on the allow-list
    BadType,
    /// The file is at or above the configured size limit
    TooLarge,
    /// The vocabulary word is empty, too long or contains non-letters
    MalformedWord,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadType => write!(f, "bad-type"),
            Self::TooLarge => write!(f, "too-large"),
            Self::MalformedWord => write!(f, "malformed-word"),
        }
    }
}

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Input rejected before any work was started
    #[error("Validation failed ({kind}): {message}")]
    Validation {
        /// Category of the rejected input
        kind: ValidationKind,
        /// Human readable reason
        message: String,
    },

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// A result that must contain at least one item was empty
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Lifecycle transition not allowed from the current state
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// The validation kind, if this is a validation error
    pub const fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            Self::Validation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error_message_is_correct() {
        let err = DomainError::not_found("UploadItem", "123");
        assert_eq!(err.to_string(), "UploadItem not found: 123");
    }

    #[test]
    fn validation_error_message_includes_kind() {
        let err = DomainError::validation(ValidationKind::TooLarge, "3 MB exceeds 2 MB");
        assert_eq!(
            err.to_string(),
            "Validation failed (too-large): 3 MB exceeds 2 MB"
        );
    }

    #[test]
    fn validation_kind_is_exposed() {
        let err = DomainError::validation(ValidationKind::BadType, "text/plain");
        assert_eq!(err.validation_kind(), Some(ValidationKind::BadType));
        assert_eq!(DomainError::not_found("x", "y").validation_kind(), None);
    }

    #[test]
    fn empty_result_error_message() {
        let err = DomainError::EmptyResult("no images".to_string());
        assert_eq!(err.to_string(), "Empty result: no images");
    }
}

//! Vocabulary word value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, ValidationKind};

/// Longest accepted word (the longest English dictionary word has 45 letters)
pub const MAX_WORD_LEN: usize = 45;

/// A single English vocabulary word
///
/// Always lower-case ASCII letters, between 1 and [`MAX_WORD_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Parse user input into a word
    ///
    /// # Errors
    /// Returns `DomainError::Validation` with `MalformedWord` when the input is
    /// empty, contains anything other than ASCII letters, or is too long.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::MalformedWord,
                "Please enter a word",
            ));
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(
                ValidationKind::MalformedWord,
                format!("'{trimmed}' must be a single English word without spaces or symbols"),
            ));
        }

        if trimmed.len() > MAX_WORD_LEN {
            return Err(DomainError::validation(
                ValidationKind::MalformedWord,
                format!(
                    "Word is {} letters long, maximum is {MAX_WORD_LEN}",
                    trimmed.len()
                ),
            ));
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Borrow the word
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Word {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_lowercases() {
        let word = Word::parse("  Apple ").unwrap();
        assert_eq!(word.as_str(), "apple");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = Word::parse("   ").unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::MalformedWord));
    }

    #[test]
    fn phrases_are_rejected() {
        assert!(Word::parse("ice cream").is_err());
    }

    #[test]
    fn symbols_and_digits_are_rejected() {
        assert!(Word::parse("don't").is_err());
        assert!(Word::parse("r2d2").is_err());
    }

    #[test]
    fn length_limit_is_inclusive() {
        assert!(Word::parse(&"a".repeat(MAX_WORD_LEN)).is_ok());
        assert!(Word::parse(&"a".repeat(MAX_WORD_LEN + 1)).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<Word, _> = serde_json::from_str("\"Flower\"");
        assert_eq!(ok.unwrap().as_str(), "flower");

        let bad: Result<Word, _> = serde_json::from_str("\"two words\"");
        assert!(bad.is_err());
    }
}

//! Word validation service - Checks vocabulary input before generation

use std::{fmt, sync::Arc};

use domain::{DomainError, ValidationKind, Word};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{DictionaryPort, WordDefinition},
};

/// A word that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWord {
    /// Normalized word
    pub word: Word,
    /// Dictionary data, when the lookup succeeded
    pub definition: Option<WordDefinition>,
}

impl ValidatedWord {
    /// Whether a dictionary confirmed the word
    pub const fn is_verified(&self) -> bool {
        self.definition.is_some()
    }
}

/// Validates words syntactically and, optionally, against a dictionary
///
/// Dictionary outages fail open: only a positive "no such word" answer
/// rejects input that is well formed.
#[derive(Default)]
pub struct WordValidationService {
    dictionary: Option<Arc<dyn DictionaryPort>>,
}

impl fmt::Debug for WordValidationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordValidationService")
            .field("dictionary", &self.dictionary.is_some())
            .finish()
    }
}

impl WordValidationService {
    /// Syntax checks only
    pub fn new() -> Self {
        Self::default()
    }

    /// Syntax checks plus dictionary lookup
    pub fn with_dictionary(dictionary: Arc<dyn DictionaryPort>) -> Self {
        Self {
            dictionary: Some(dictionary),
        }
    }

    /// Validate raw user input
    ///
    /// # Errors
    /// `MalformedWord` for input that is not a single English word or that
    /// the dictionary does not know.
    #[instrument(skip(self))]
    pub async fn validate(&self, input: &str) -> Result<ValidatedWord, ApplicationError> {
        let word = Word::parse(input)?;

        let Some(dictionary) = &self.dictionary else {
            return Ok(ValidatedWord {
                word,
                definition: None,
            });
        };

        match dictionary.lookup(&word).await {
            Ok(Some(definition)) => {
                debug!(word = %word, "Dictionary confirmed word");
                Ok(ValidatedWord {
                    word,
                    definition: Some(definition),
                })
            },
            Ok(None) => Err(DomainError::validation(
                ValidationKind::MalformedWord,
                format!("'{word}' is not a known English word"),
            )
            .into()),
            Err(error) => {
                warn!(word = %word, error = %error, "Dictionary unavailable, skipping lookup");
                Ok(ValidatedWord {
                    word,
                    definition: None,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockDictionaryPort;

    fn definition(word: &str) -> WordDefinition {
        WordDefinition {
            word: word.to_string(),
            phonetic: Some("/ˈæp.əl/".to_string()),
            definition: Some("A round fruit.".to_string()),
        }
    }

    #[tokio::test]
    async fn syntax_only_accepts_and_normalizes() {
        let validated = WordValidationService::new().validate("  Apple ").await.unwrap();
        assert_eq!(validated.word.as_str(), "apple");
        assert!(!validated.is_verified());
    }

    #[tokio::test]
    async fn malformed_input_never_reaches_dictionary() {
        let mut dictionary = MockDictionaryPort::new();
        dictionary.expect_lookup().never();
        let service = WordValidationService::with_dictionary(Arc::new(dictionary));

        for input in ["", "two words", "abc1", "x".repeat(46).as_str()] {
            let err = service.validate(input).await.unwrap_err();
            assert_eq!(err.validation_kind(), Some(ValidationKind::MalformedWord));
        }
    }

    #[tokio::test]
    async fn dictionary_hit_attaches_definition() {
        let mut dictionary = MockDictionaryPort::new();
        dictionary
            .expect_lookup()
            .returning(|w| Ok(Some(definition(w.as_str()))));
        let service = WordValidationService::with_dictionary(Arc::new(dictionary));

        let validated = service.validate("apple").await.unwrap();
        assert!(validated.is_verified());
        assert_eq!(validated.definition.unwrap().word, "apple");
    }

    #[tokio::test]
    async fn unknown_word_is_rejected() {
        let mut dictionary = MockDictionaryPort::new();
        dictionary.expect_lookup().returning(|_| Ok(None));
        let service = WordValidationService::with_dictionary(Arc::new(dictionary));

        let err = service.validate("qwzx").await.unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::MalformedWord));
    }

    #[tokio::test]
    async fn dictionary_outage_fails_open() {
        let mut dictionary = MockDictionaryPort::new();
        dictionary
            .expect_lookup()
            .returning(|_| Err(ApplicationError::Network("timed out".into())));
        let service = WordValidationService::with_dictionary(Arc::new(dictionary));

        let validated = service.validate("banana").await.unwrap();
        assert!(!validated.is_verified());
    }
}

//! Dictionary port - Looks up vocabulary words

use async_trait::async_trait;
use domain::Word;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Dictionary information about a word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDefinition {
    /// Headword as returned by the dictionary
    pub word: String,
    /// IPA transcription, if known
    pub phonetic: Option<String>,
    /// First listed definition, if any
    pub definition: Option<String>,
}

/// Port for dictionary lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DictionaryPort: Send + Sync {
    /// Look up a word
    ///
    /// Returns `Ok(None)` when the dictionary positively reports that the
    /// word does not exist.
    async fn lookup(&self, word: &Word) -> Result<Option<WordDefinition>, ApplicationError>;
}

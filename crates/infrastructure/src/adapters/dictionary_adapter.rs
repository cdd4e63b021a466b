//! Dictionary adapter - Implements DictionaryPort against the free dictionary API
//!
//! A 404 means the word does not exist; every other failure is reported as a
//! network or upstream error so word validation can fail open.

use std::time::Duration;

use application::{
    error::ApplicationError,
    ports::{DictionaryPort, WordDefinition},
};
use async_trait::async_trait;
use domain::Word;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{map_reqwest_error, upstream_message};
use crate::config::DictionaryConfig;

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

impl From<DictionaryEntry> for WordDefinition {
    fn from(entry: DictionaryEntry) -> Self {
        let phonetic = entry
            .phonetic
            .filter(|p| !p.trim().is_empty())
            .or_else(|| entry.phonetics.into_iter().next().and_then(|p| p.text));
        let definition = entry
            .meanings
            .into_iter()
            .next()
            .and_then(|m| m.definitions.into_iter().next())
            .map(|d| d.definition);

        Self {
            word: entry.word,
            phonetic,
            definition,
        }
    }
}

/// Word lookups via `dictionaryapi.dev`
pub struct DictionaryAdapter {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for DictionaryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryAdapter")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DictionaryAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: &DictionaryConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn entry_url(&self, word: &Word) -> String {
        format!("{}/api/v2/entries/en/{}", self.base_url, word.as_str())
    }
}

#[async_trait]
impl DictionaryPort for DictionaryAdapter {
    #[instrument(skip(self), fields(word = %word.as_str()))]
    async fn lookup(&self, word: &Word) -> Result<Option<WordDefinition>, ApplicationError> {
        let response = self
            .client
            .get(self.entry_url(word))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Dictionary has no entry");
            return Ok(None);
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ApplicationError::upstream(
                Some(status.as_u16()),
                upstream_message(&body, status),
            ));
        }

        let entries: Vec<DictionaryEntry> = serde_json::from_str(&body)
            .map_err(|e| ApplicationError::Decode(format!("Dictionary response: {e}")))?;

        Ok(entries.into_iter().next().map(WordDefinition::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phonetic_falls_back_to_first_phonetics_entry() {
        let entry: DictionaryEntry = serde_json::from_str(
            r#"{
                "word": "apple",
                "phonetics": [{"text": "/ˈæp.əl/"}, {"text": "/other/"}],
                "meanings": [{"definitions": [{"definition": "A fruit."}, {"definition": "A tree."}]}]
            }"#,
        )
        .unwrap();

        let def = WordDefinition::from(entry);
        assert_eq!(def.word, "apple");
        assert_eq!(def.phonetic.as_deref(), Some("/ˈæp.əl/"));
        assert_eq!(def.definition.as_deref(), Some("A fruit."));
    }

    #[test]
    fn top_level_phonetic_wins() {
        let entry: DictionaryEntry = serde_json::from_str(
            r#"{"word": "cat", "phonetic": "/kæt/", "phonetics": [{"text": "/x/"}], "meanings": []}"#,
        )
        .unwrap();

        let def = WordDefinition::from(entry);
        assert_eq!(def.phonetic.as_deref(), Some("/kæt/"));
        assert!(def.definition.is_none());
    }

    #[test]
    fn entry_url_uses_english_endpoint() {
        let adapter = DictionaryAdapter::new(&DictionaryConfig {
            base_url: "http://dict.test/".to_string(),
            ..DictionaryConfig::default()
        })
        .unwrap();
        assert_eq!(
            adapter.entry_url(&Word::parse("Apple").unwrap()),
            "http://dict.test/api/v2/entries/en/apple"
        );
    }
}

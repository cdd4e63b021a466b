//! Dictionary lookup configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Free dictionary API settings used for word validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Look words up before generating (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// API base URL; words are looked up at `{base_url}/api/v2/entries/en/{word}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Lookup timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.dictionaryapi.dev".to_string()
}

const fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl DictionaryConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "dictionary.base_url must be an http(s) URL, got '{}'",
                self.base_url
            ));
        }
        if self.timeout_ms == 0 {
            return Err("dictionary.timeout_ms must be positive".to_string());
        }
        Ok(())
    }
}

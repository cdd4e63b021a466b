//! Application configuration
//!
//! Split into focused sub-modules:
//! - `upload`: durable asset store and acceptance rules
//! - `database`: SQLite settings and the upload history record
//! - `cache`: pronunciation audio cache budget
//! - `dictionary`: word lookup service
//!
//! Generation, placeholder and speech settings come from the `ai_imaging`
//! and `ai_speech` crates; logging settings from [`crate::telemetry`].
//!
//! Values are layered: built-in defaults, then an optional `config.toml`, then
//! `FLASHCARD_*` environment variables where `__` separates nesting levels
//! (e.g. `FLASHCARD_IMAGE_GENERATION__API_KEY`).

mod cache;
mod database;
mod dictionary;
mod upload;

use std::path::Path;

use ai_imaging::{ImageGenerationConfig, PlaceholderConfig};
use ai_speech::SpeechConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cache::AudioCacheConfig;
pub use database::{DatabaseConfig, HistoryConfig};
pub use dictionary::DictionaryConfig;
pub use upload::UploadConfig;

use crate::telemetry::TelemetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FLASHCARD";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Durable asset store
    #[serde(default)]
    pub upload: UploadConfig,

    /// Remote card generation
    #[serde(default)]
    pub image_generation: ImageGenerationConfig,

    /// Local placeholder cards
    #[serde(default)]
    pub placeholder: PlaceholderConfig,

    /// Speech synthesis (optional; pronunciation is disabled without it)
    #[serde(default)]
    pub speech: Option<SpeechConfig>,

    /// SQLite database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Upload history
    #[serde(default)]
    pub history: HistoryConfig,

    /// Pronunciation audio cache
    #[serde(default)]
    pub audio_cache: AudioCacheConfig,

    /// Word lookup
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("upload.allowed_mime_types")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(
            config::File::with_name("config").required(false),
            environment(),
        )
    }

    /// Load configuration from an explicit file, still honouring the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(
            config::File::from(path.as_ref()).required(true),
            environment(),
        )
    }

    fn build<S>(file: S, env: config::Environment) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;
        let app: Self = config.try_deserialize()?;
        debug!(
            speech = app.speech.is_some(),
            dictionary = app.dictionary.enabled,
            "Configuration loaded"
        );
        Ok(app)
    }

    /// Validate every component, reporting all problems at once
    ///
    /// # Errors
    ///
    /// Returns the collected problems joined by `"; "`.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if let Err(e) = self.upload.validate() {
            problems.push(e);
        }
        if let Err(e) = self.image_generation.validate() {
            problems.push(format!("image_generation: {e}"));
        }
        if self.placeholder.width == 0 || self.placeholder.height == 0 {
            problems.push("placeholder dimensions must be positive".to_string());
        }
        if let Some(speech) = &self.speech {
            if let Err(e) = speech.validate() {
                problems.push(format!("speech: {e}"));
            }
        }
        if let Err(e) = self.history.validate() {
            problems.push(e);
        }
        if let Err(e) = self.audio_cache.validate() {
            problems.push(e);
        }
        if let Err(e) = self.dictionary.validate() {
            problems.push(e);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use config::{File, FileFormat};

    use super::*;

    fn from_toml(toml: &str, env: &[(&str, &str)]) -> AppConfig {
        let vars = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::build(
            File::from_str(toml, FileFormat::Toml),
            environment().source(Some(vars)),
        )
        .unwrap()
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = from_toml("", &[]);

        assert_eq!(config.upload.max_file_size_bytes, 2 * 1024 * 1024);
        assert_eq!(config.upload.allowed_mime_types.len(), 4);
        assert!(config.upload.inline_fallback);
        assert_eq!(config.upload.timeout_ms, 30_000);
        assert_eq!(config.image_generation.timeout_ms, 60_000);
        assert_eq!(config.image_generation.size, "2k");
        assert!(config.speech.is_none());
        assert_eq!(config.history.namespace, "upload_history");
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.audio_cache.max_bytes, 64 * 1024 * 1024);
        assert_eq!(config.dictionary.timeout_ms, 5_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = from_toml(
            r#"
            [upload]
            max_file_size_bytes = 1024
            inline_fallback = false

            [history]
            capacity = 3

            [speech]
            appid = "app"
            token = "tok"
            "#,
            &[],
        );

        assert_eq!(config.upload.max_file_size_bytes, 1024);
        assert!(!config.upload.policy().inline_fallback);
        assert_eq!(config.history.capacity, 3);
        let speech = config.speech.unwrap();
        assert_eq!(speech.appid, "app");
        assert_eq!(speech.encoding, "mp3");
    }

    #[test]
    fn environment_overrides_file() {
        let config = from_toml(
            "[image_generation]\nmodel = \"from-file\"\n",
            &[
                ("FLASHCARD_IMAGE_GENERATION__MODEL", "from-env"),
                ("FLASHCARD_IMAGE_GENERATION__API_KEY", "secret"),
                ("FLASHCARD_DICTIONARY__ENABLED", "false"),
                ("FLASHCARD_UPLOAD__ALLOWED_MIME_TYPES", "image/png,image/gif"),
            ],
        );

        assert_eq!(config.image_generation.model, "from-env");
        assert_eq!(config.image_generation.api_key.as_deref(), Some("secret"));
        assert!(!config.dictionary.enabled);
        assert_eq!(
            config.upload.allowed_mime_types,
            vec!["image/png".to_string(), "image/gif".to_string()]
        );
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = AppConfig::default();
        config.upload.endpoint = "ftp://nope".to_string();
        config.history.capacity = 0;
        config.audio_cache.max_bytes = 0;

        let err = config.validate().unwrap_err();
        assert!(err.contains("upload.endpoint"));
        assert!(err.contains("history.capacity"));
        assert!(err.contains("audio_cache.max_bytes"));
    }

    #[test]
    fn incomplete_speech_section_fails_validation() {
        let config = from_toml("[speech]\nappid = \"app\"\n", &[]);
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("speech:"));
    }

    #[test]
    fn disabled_dictionary_skips_url_check() {
        let mut config = AppConfig::default();
        config.dictionary.enabled = false;
        config.dictionary.base_url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_reads_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[database]\npath = \"cards.db\"\nmax_connections = 2").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.database.path, "cards.db");
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn load_from_missing_file_fails() {
        assert!(AppConfig::load_from("/definitely/not/here.toml").is_err());
    }
}

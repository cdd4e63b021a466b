//! Configuration for speech synthesis

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration for the speech synthesis provider
#[derive(Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Full URL of the synthesis endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Application id
    #[serde(default)]
    pub appid: String,

    /// Access token
    #[serde(default)]
    pub token: String,

    /// Provider cluster
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// User id sent with every request
    #[serde(default = "default_uid")]
    pub uid: String,

    /// Voice used when the caller does not pick one
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Short voice names ("us", "uk") mapped to provider voice ids
    #[serde(default = "default_voice_aliases")]
    pub voice_aliases: HashMap<String, String>,

    /// Requested audio encoding ("mp3", "wav", "ogg_opus", "pcm")
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Sample rate in Hz
    #[serde(default = "default_rate")]
    pub rate: u32,

    /// Speaking speed (0.2 to 3.0)
    #[serde(default = "default_ratio")]
    pub speed_ratio: f32,

    /// Volume (0.1 to 3.0)
    #[serde(default = "default_ratio")]
    pub volume_ratio: f32,

    /// Pitch (0.1 to 3.0)
    #[serde(default = "default_ratio")]
    pub pitch_ratio: f32,

    /// Language of the text
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("endpoint", &self.endpoint)
            .field("appid", &self.appid)
            .field("token", &"[REDACTED]")
            .field("cluster", &self.cluster)
            .field("default_voice", &self.default_voice)
            .field("encoding", &self.encoding)
            .field("rate", &self.rate)
            .field("language", &self.language)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

fn default_endpoint() -> String {
    "https://openspeech.bytedance.com/api/v1/tts".to_string()
}

fn default_cluster() -> String {
    "volcano_tts".to_string()
}

fn default_uid() -> String {
    "wordcardforge".to_string()
}

fn default_voice() -> String {
    "BV503_streaming".to_string()
}

fn default_voice_aliases() -> HashMap<String, String> {
    HashMap::from([
        ("us".to_string(), "BV503_streaming".to_string()),
        ("uk".to_string(), "BV040_streaming".to_string()),
    ])
}

fn default_encoding() -> String {
    "mp3".to_string()
}

const fn default_rate() -> u32 {
    24000
}

const fn default_ratio() -> f32 {
    1.0
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            appid: String::new(),
            token: String::new(),
            cluster: default_cluster(),
            uid: default_uid(),
            default_voice: default_voice(),
            voice_aliases: default_voice_aliases(),
            encoding: default_encoding(),
            rate: default_rate(),
            speed_ratio: default_ratio(),
            volume_ratio: default_ratio(),
            pitch_ratio: default_ratio(),
            language: default_language(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            appid: "test-app".to_string(),
            token: "test-token".to_string(),
            ..Default::default()
        }
    }

    /// Resolve a voice name through the alias table
    ///
    /// Unknown names are passed through unchanged; `None` selects the default.
    pub fn resolve_voice<'a>(&'a self, voice: Option<&'a str>) -> &'a str {
        let name = voice.map_or(self.default_voice.as_str(), str::trim);
        self.voice_aliases
            .get(name)
            .map_or(name, String::as_str)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.appid.trim().is_empty() {
            return Err("Speech appid is required".to_string());
        }

        if self.token.trim().is_empty() {
            return Err("Speech token is required".to_string());
        }

        if domain::AudioFormat::from_encoding(&self.encoding).is_none() {
            return Err(format!("Unsupported encoding '{}'", self.encoding));
        }

        if !(0.2..=3.0).contains(&self.speed_ratio) {
            return Err(format!(
                "Speed ratio must be between 0.2 and 3.0, got {}",
                self.speed_ratio
            ));
        }

        for (name, ratio) in [("Volume", self.volume_ratio), ("Pitch", self.pitch_ratio)] {
            if !(0.1..=3.0).contains(&ratio) {
                return Err(format!("{name} ratio must be between 0.1 and 3.0, got {ratio}"));
            }
        }

        if self.rate == 0 {
            return Err("Sample rate must be greater than 0".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

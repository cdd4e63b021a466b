//! Configuration for card image generation

use serde::{Deserialize, Serialize};

use crate::error::ImageGenerationError;

/// Configuration for the remote image generation client
#[derive(Clone, Serialize, Deserialize)]
pub struct ImageGenerationConfig {
    /// Full URL of the generations endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token, if the endpoint needs one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model or endpoint id
    #[serde(default = "default_model")]
    pub model: String,

    /// Requested image size
    #[serde(default = "default_size")]
    pub size: String,

    /// Number of images requested
    #[serde(default = "default_count")]
    pub count: u8,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ImageGenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerationConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("size", &self.size)
            .field("count", &self.count)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_endpoint() -> String {
    "http://localhost:8080/api/generations".to_string()
}

fn default_model() -> String {
    "doubao-seedream-4-0".to_string()
}

fn default_size() -> String {
    "2k".to_string()
}

const fn default_count() -> u8 {
    1
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            size: default_size(),
            count: default_count(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ImageGenerationConfig {
    /// Check the configuration
    ///
    /// # Errors
    /// Returns `Configuration` for an empty endpoint or model, a zero count or
    /// a zero timeout.
    pub fn validate(&self) -> Result<(), ImageGenerationError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ImageGenerationError::Configuration(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ImageGenerationError::Configuration(
                "model must not be empty".to_string(),
            ));
        }
        if self.count == 0 {
            return Err(ImageGenerationError::Configuration(
                "count must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ImageGenerationError::Configuration(
                "timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Appearance of locally rendered placeholder cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Card width in pixels
    #[serde(default = "default_dimension")]
    pub width: u32,

    /// Card height in pixels
    #[serde(default = "default_dimension")]
    pub height: u32,

    /// Front card background color
    #[serde(default = "default_accent")]
    pub accent_color: String,
}

const fn default_dimension() -> u32 {
    1024
}

fn default_accent() -> String {
    "#4f7cff".to_string()
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            accent_color: default_accent(),
        }
    }
}

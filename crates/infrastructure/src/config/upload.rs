//! Asset upload configuration.

use application::{DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Durable asset store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Multipart upload endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Host prefix joined with the relative path the store returns
    #[serde(default = "default_asset_host")]
    pub asset_host: String,

    /// Files must be strictly smaller than this many bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Accepted MIME types
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,

    /// Embed the file as a `data:` reference when the store fails
    #[serde(default = "default_true")]
    pub inline_fallback: bool,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_endpoint() -> String {
    "https://upload.gaodun.com/upload-demo/upload.php".to_string()
}

fn default_asset_host() -> String {
    "https://simg01.gaodunwangxiao.com/".to_string()
}

const fn default_max_file_size() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_allowed_mime_types() -> Vec<String> {
    DEFAULT_ALLOWED_MIME_TYPES
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            asset_host: default_asset_host(),
            max_file_size_bytes: default_max_file_size(),
            allowed_mime_types: default_allowed_mime_types(),
            inline_fallback: true,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl UploadConfig {
    /// Acceptance policy for the upload coordinator
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_size_bytes: self.max_file_size_bytes,
            allowed_mime_types: self.allowed_mime_types.clone(),
            inline_fallback: self.inline_fallback,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!(
                "upload.endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            ));
        }
        if self.max_file_size_bytes == 0 {
            return Err("upload.max_file_size_bytes must be positive".to_string());
        }
        if self.allowed_mime_types.is_empty() {
            return Err("upload.allowed_mime_types must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("upload.timeout_ms must be positive".to_string());
        }
        Ok(())
    }
}

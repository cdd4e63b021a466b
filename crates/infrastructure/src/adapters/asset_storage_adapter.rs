//! Asset storage adapter - Implements AssetStoragePort with a multipart upload
//!
//! The store answers with a path relative to the asset host; the adapter
//! joins the two into the absolute URL the rest of the pipeline uses.

use std::time::Duration;

use application::{error::ApplicationError, ports::AssetStoragePort};
use async_trait::async_trait;
use domain::AssetFile;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{map_reqwest_error, upstream_message};
use crate::config::UploadConfig;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Uploads assets to the durable image store
pub struct HttpAssetStorageAdapter {
    client: Client,
    config: UploadConfig,
}

impl std::fmt::Debug for HttpAssetStorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAssetStorageAdapter")
            .field("endpoint", &self.config.endpoint)
            .field("asset_host", &self.config.asset_host)
            .finish_non_exhaustive()
    }
}

impl HttpAssetStorageAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: UploadConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Absolute URL for a path returned by the store
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.asset_host.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn form(file: &AssetFile) -> Result<Form, ApplicationError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| ApplicationError::Internal(format!("Invalid MIME type: {e}")))?;

        Ok(Form::new()
            .text("file_type", "img")
            .text("is_cut", "0")
            .text("thumb", "")
            .part("file", part)
            .text("source", "js"))
    }
}

#[async_trait]
impl AssetStoragePort for HttpAssetStorageAdapter {
    #[instrument(skip(self, file), fields(name = %file.name, size = file.size_bytes()))]
    async fn upload(&self, file: &AssetFile) -> Result<String, ApplicationError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(Self::form(file)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(ApplicationError::upstream(
                Some(status.as_u16()),
                upstream_message(&body, status),
            ));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ApplicationError::Decode(format!("Upload response: {e}")))?;

        match parsed.url.filter(|url| !url.trim().is_empty()) {
            Some(path) => {
                let url = self.absolute_url(path.trim());
                debug!(url = %url, "Asset uploaded");
                Ok(url)
            },
            None => Err(ApplicationError::upstream(
                Some(status.as_u16()),
                parsed
                    .error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "Upload failed".to_string()),
            )),
        }
    }
}

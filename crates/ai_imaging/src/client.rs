//! HTTP client for the image generation endpoint

use std::time::Duration;

use async_trait::async_trait;
use domain::{CardImage, GenerationRequest};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::ImageGenerationConfig,
    error::ImageGenerationError,
    ports::ImageGenerator,
    wire::{ErrorEnvelope, GenerationsRequest, GenerationsResponse},
};

/// Remote card image generator
#[derive(Debug)]
pub struct ImageGenerationClient {
    client: Client,
    config: ImageGenerationConfig,
}

impl ImageGenerationClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns `Configuration` for invalid settings or if the HTTP client
    /// cannot be built.
    pub fn new(config: ImageGenerationConfig) -> Result<Self, ImageGenerationError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ImageGenerationError::Configuration(e.to_string()))?;

        info!(
            endpoint = %config.endpoint,
            model = %config.model,
            "Initialized image generation client"
        );

        Ok(Self { client, config })
    }

    /// Active configuration
    pub const fn config(&self) -> &ImageGenerationConfig {
        &self.config
    }
}

#[async_trait]
impl ImageGenerator for ImageGenerationClient {
    #[instrument(skip(self, request), fields(model = %self.config.model, has_image))]
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<CardImage>, ImageGenerationError> {
        let image = request.resolvable_source();
        tracing::Span::current().record("has_image", image.is_some());

        let body = GenerationsRequest {
            model: &self.config.model,
            prompt: &request.prompt,
            n: self.config.count,
            size: &self.config.size,
            response_format: "url",
            image,
        };

        debug!("Sending generation request");

        let mut builder = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ImageGenerationError::from_reqwest(&e, self.config.timeout_ms))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ImageGenerationError::from_reqwest(&e, self.config.timeout_ms))?;

        if !status.is_success() {
            let message = ErrorEnvelope::message_from(&text);
            warn!(status = %status, message = %message, "Generation request failed");
            return Err(ImageGenerationError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let images = GenerationsResponse::parse(&text)?.into_images()?;
        debug!(count = images.len(), "Generation completed");
        Ok(images)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

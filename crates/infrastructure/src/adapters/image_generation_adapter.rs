//! Image generation adapters - Implement the generation ports using ai_imaging

use std::sync::Arc;

use ai_imaging::{
    CardRenderer, ImageGenerationClient, ImageGenerationConfig, ImageGenerationError,
    ImageGenerator, PlaceholderCardRenderer, PlaceholderConfig,
};
use application::{
    error::ApplicationError,
    ports::{ImageGenerationPort, LocalCardRendererPort},
};
use async_trait::async_trait;
use domain::{CardImage, GenerationRequest};
use tracing::{debug, instrument};

/// Map an imaging error into the application taxonomy
pub fn map_imaging_error(err: ImageGenerationError) -> ApplicationError {
    match err {
        ImageGenerationError::ConnectionFailed(e) | ImageGenerationError::RequestFailed(e) => {
            ApplicationError::Network(e)
        },
        ImageGenerationError::Timeout(ms) => {
            ApplicationError::Network(format!("Generation timed out after {ms}ms"))
        },
        ImageGenerationError::ServerError { status, message } => {
            ApplicationError::upstream(Some(status), message)
        },
        ImageGenerationError::InvalidResponse(e) => ApplicationError::Decode(e),
        ImageGenerationError::Configuration(e) => ApplicationError::Configuration(e),
        ImageGenerationError::Rendering(e) => ApplicationError::Internal(e),
    }
}

/// Remote card generation
pub struct ImageGenerationAdapter {
    generator: Arc<dyn ImageGenerator>,
}

impl std::fmt::Debug for ImageGenerationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerationAdapter")
            .field("model", &self.generator.model())
            .finish()
    }
}

impl ImageGenerationAdapter {
    /// Create an adapter backed by the HTTP client
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the client cannot be built.
    pub fn new(config: ImageGenerationConfig) -> Result<Self, ApplicationError> {
        let client = ImageGenerationClient::new(config).map_err(map_imaging_error)?;
        Ok(Self::with_generator(Arc::new(client)))
    }

    /// Create an adapter around any generator
    pub fn with_generator(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ImageGenerationPort for ImageGenerationAdapter {
    #[instrument(skip(self, request), fields(model = %self.generator.model()))]
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<CardImage>, ApplicationError> {
        let images = self
            .generator
            .generate(request)
            .await
            .map_err(map_imaging_error)?;
        debug!(count = images.len(), "Remote generation returned images");
        Ok(images)
    }
}

/// Local placeholder cards
#[derive(Debug)]
pub struct PlaceholderCardAdapter {
    renderer: PlaceholderCardRenderer,
}

impl PlaceholderCardAdapter {
    /// Create an adapter with the given appearance
    pub const fn new(config: PlaceholderConfig) -> Self {
        Self {
            renderer: PlaceholderCardRenderer::new(config),
        }
    }
}

#[async_trait]
impl LocalCardRendererPort for PlaceholderCardAdapter {
    #[instrument(skip(self, request))]
    async fn render(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<CardImage>, ApplicationError> {
        self.renderer.render(request).map_err(map_imaging_error)
    }
}

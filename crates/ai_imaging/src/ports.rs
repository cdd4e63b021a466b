//! Image generation traits

use async_trait::async_trait;
use domain::{CardImage, GenerationRequest};

use crate::error::ImageGenerationError;

/// Remote card image generator
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate card images for the request
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<CardImage>, ImageGenerationError>;

    /// Model used for generation
    fn model(&self) -> &str;
}

/// Local, non-network card renderer
pub trait CardRenderer: Send + Sync {
    /// Render placeholder cards for the request
    fn render(&self, request: &GenerationRequest) -> Result<Vec<CardImage>, ImageGenerationError>;
}

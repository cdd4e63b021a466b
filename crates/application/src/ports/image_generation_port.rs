//! Image generation ports - Remote generator and local placeholder renderer

use async_trait::async_trait;
use domain::{CardImage, GenerationRequest};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the remote image generation service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageGenerationPort: Send + Sync {
    /// Issue one generation request
    ///
    /// Implementations normalize the provider response into an ordered list
    /// of card images; an unrecognized response shape is a `Decode` error.
    async fn generate(&self, request: &GenerationRequest)
    -> Result<Vec<CardImage>, ApplicationError>;
}

/// Port for the non-network placeholder card generator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocalCardRendererPort: Send + Sync {
    /// Render placeholder cards for the request without touching the network
    async fn render(&self, request: &GenerationRequest)
    -> Result<Vec<CardImage>, ApplicationError>;
}

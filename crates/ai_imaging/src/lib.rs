//! AI Imaging - Card image generation
//!
//! Talks to an OpenAI-style image generation endpoint and normalizes its
//! response shapes into card images. Also provides a placeholder renderer
//! that draws cards locally as inline SVG when the remote service is down.

pub mod client;
pub mod config;
pub mod error;
pub mod placeholder;
pub mod ports;
mod wire;

pub use client::ImageGenerationClient;
pub use config::{ImageGenerationConfig, PlaceholderConfig};
pub use error::ImageGenerationError;
pub use placeholder::PlaceholderCardRenderer;
pub use ports::{CardRenderer, ImageGenerator};

//! Application layer - Use cases and orchestration
//!
//! Coordinates the flashcard media pipeline: asset uploads, upload history,
//! card generation with local fallback, cached pronunciation audio and
//! per-slot playback. Defines the ports that infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod asset_storage_port;
mod audio_output_port;
mod cache_port;
mod dictionary_port;
mod history_repository_port;
mod image_generation_port;
mod speech_port;

#[cfg(test)]
pub use asset_storage_port::MockAssetStoragePort;
pub use asset_storage_port::AssetStoragePort;
#[cfg(test)]
pub use audio_output_port::MockAudioOutputPort;
pub use audio_output_port::{AudioOutputPort, PlaybackTicket, SlotIndex};
pub use cache_port::AudioCachePort;
#[cfg(test)]
pub use dictionary_port::MockDictionaryPort;
pub use dictionary_port::{DictionaryPort, WordDefinition};
#[cfg(test)]
pub use history_repository_port::MockHistoryRepositoryPort;
pub use history_repository_port::HistoryRepositoryPort;
#[cfg(test)]
pub use image_generation_port::{MockImageGenerationPort, MockLocalCardRendererPort};
pub use image_generation_port::{ImageGenerationPort, LocalCardRendererPort};
#[cfg(test)]
pub use speech_port::MockSpeechSynthesisPort;
pub use speech_port::SpeechSynthesisPort;

//! Application services - Use case implementations

mod card_generation_service;
mod flashcard_pipeline;
mod history_store;
mod playback_controller;
mod preview_registry;
mod speech_cache;
mod upload_coordinator;
mod word_validation_service;

#[cfg(test)]
mod test_support;

pub use card_generation_service::CardGenerationService;
pub use flashcard_pipeline::{Flashcard, FlashcardPipeline};
pub use history_store::{
    DEFAULT_HISTORY_CAPACITY, HistoryInvalidated, HistoryMirror, HistoryStore,
};
pub use playback_controller::{PlaybackController, PlaybackEvent, PlaybackState};
pub use preview_registry::{LocalPreviewRegistry, PREVIEW_SCHEME};
pub use speech_cache::{CacheStats, SpeechCache};
pub use upload_coordinator::{
    AssetUploadCoordinator, CommitOutcome, DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_MAX_UPLOAD_BYTES,
    UploadPolicy, inline_data_ref,
};
pub use word_validation_service::{ValidatedWord, WordValidationService};

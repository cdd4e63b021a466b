//! Runtime wiring
//!
//! Builds every adapter from an [`AppConfig`] and assembles the application
//! services around them.

use std::sync::Arc;

use application::{
    AssetUploadCoordinator, CardGenerationService, FlashcardPipeline, HistoryStore,
    LocalPreviewRegistry, PlaybackController, SpeechCache, WordValidationService,
    error::ApplicationError,
    ports::AudioOutputPort,
};
use tracing::{info, instrument};

use crate::{
    adapters::{
        DictionaryAdapter, HeadlessAudioOutput, HttpAssetStorageAdapter, ImageGenerationAdapter,
        PlaceholderCardAdapter, SpeechAdapter,
    },
    cache::MokaAudioCache,
    config::AppConfig,
    persistence::{SqliteHistoryRepository, create_pool},
};

/// Fully wired application services
#[derive(Debug)]
pub struct AppContext {
    /// Configuration the context was built from
    pub config: AppConfig,
    /// Upload acceptance and durable storage
    pub uploads: Arc<AssetUploadCoordinator>,
    /// Persisted upload history
    pub history: Arc<HistoryStore>,
    /// Card generation with local fallback
    pub cards: Arc<CardGenerationService>,
    /// Word validation
    pub words: Arc<WordValidationService>,
    /// End-to-end card creation
    pub pipeline: FlashcardPipeline,
    /// Pronunciation cache, when speech is configured
    pub speech: Option<Arc<SpeechCache>>,
    /// Per-slot playback, when speech is configured
    pub playback: Option<PlaybackController>,
}

impl AppContext {
    /// Build the context with a headless audio output
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if validation fails or an adapter cannot be
    /// created, `Persistence` if the database cannot be opened.
    pub fn build(config: AppConfig) -> Result<Self, ApplicationError> {
        Self::with_audio_output(config, Arc::new(HeadlessAudioOutput::new()))
    }

    /// Build the context with a caller-provided audio output
    ///
    /// # Errors
    ///
    /// See [`AppContext::build`].
    #[instrument(skip_all)]
    pub fn with_audio_output(
        config: AppConfig,
        output: Arc<dyn AudioOutputPort>,
    ) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;

        let pool = create_pool(&config.database)
            .map_err(|e| ApplicationError::Persistence(e.to_string()))?;
        let repository = SqliteHistoryRepository::new(Arc::new(pool), &config.history.namespace);
        let history = Arc::new(HistoryStore::with_capacity(
            Arc::new(repository),
            config.history.capacity,
        ));

        let storage = HttpAssetStorageAdapter::new(config.upload.clone())?;
        let uploads = Arc::new(AssetUploadCoordinator::with_policy(
            Arc::new(storage),
            Arc::new(LocalPreviewRegistry::new()),
            config.upload.policy(),
        ));

        let remote = ImageGenerationAdapter::new(config.image_generation.clone())?;
        let local = PlaceholderCardAdapter::new(config.placeholder.clone());
        let cards = Arc::new(CardGenerationService::new(Arc::new(remote), Arc::new(local)));

        let words = Arc::new(if config.dictionary.enabled {
            WordValidationService::with_dictionary(Arc::new(DictionaryAdapter::new(
                &config.dictionary,
            )?))
        } else {
            WordValidationService::new()
        });

        let (speech, playback) = match &config.speech {
            Some(speech_config) => {
                let synthesizer = SpeechAdapter::new(speech_config.clone())?;
                let cache = Arc::new(SpeechCache::new(
                    Arc::new(synthesizer),
                    Arc::new(MokaAudioCache::new(&config.audio_cache)),
                ));
                let playback = PlaybackController::new(Arc::clone(&cache), output);
                (Some(cache), Some(playback))
            },
            None => (None, None),
        };

        let pipeline = FlashcardPipeline::new(
            Arc::clone(&words),
            Arc::clone(&uploads),
            Arc::clone(&cards),
            Arc::clone(&history),
        );

        info!(
            dictionary = config.dictionary.enabled,
            speech = speech.is_some(),
            history_capacity = config.history.capacity,
            "Application context ready"
        );

        Ok(Self {
            config,
            uploads,
            history,
            cards,
            words,
            pipeline,
            speech,
            playback,
        })
    }
}

//! Flashcard pipeline - word + photo in, card images out
//!
//! Orchestrates the services in the order a card is produced:
//! 1. Validate the word
//! 2. Commit the upload if it is still pending, then resolve its URL
//! 3. Without an upload, reuse the most recent history asset
//! 4. Generate (remote or local fallback)
//! 5. Record the asset in history and drop the tracked upload

use std::{fmt, sync::Arc};

use domain::{GenerationResult, HistoryEntry, UploadId, UploadStatus};
use tracing::{debug, info, instrument, warn};

use super::{
    AssetUploadCoordinator, CardGenerationService, HistoryStore, LocalPreviewRegistry,
    ValidatedWord, WordValidationService,
};
use crate::error::ApplicationError;

/// A produced flashcard
#[derive(Debug, Clone)]
pub struct Flashcard {
    /// The validated word
    pub word: ValidatedWord,
    /// Asset the card was grounded on, if any
    pub source_asset_url: Option<String>,
    /// Generated images
    pub result: GenerationResult,
}

/// End-to-end card creation
pub struct FlashcardPipeline {
    words: Arc<WordValidationService>,
    uploads: Arc<AssetUploadCoordinator>,
    cards: Arc<CardGenerationService>,
    history: Arc<HistoryStore>,
}

impl fmt::Debug for FlashcardPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardPipeline")
            .field("uploads", &self.uploads)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl FlashcardPipeline {
    /// Create a pipeline
    pub fn new(
        words: Arc<WordValidationService>,
        uploads: Arc<AssetUploadCoordinator>,
        cards: Arc<CardGenerationService>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            words,
            uploads,
            cards,
            history,
        }
    }

    /// Create a card for `input`, optionally grounded on an accepted upload
    ///
    /// # Errors
    /// Validation errors for the word, `NotFound` for an unknown upload and
    /// `GenerationUnavailable` when no artifact could be produced. Upload
    /// and history failures only degrade the result.
    #[instrument(skip(self))]
    pub async fn create_card(
        &self,
        input: &str,
        upload: Option<UploadId>,
    ) -> Result<Flashcard, ApplicationError> {
        let word = self.words.validate(input).await?;

        let (source_asset_url, history_entry) = match upload {
            Some(id) => self.resolve_upload(id).await?,
            None => (self.last_history_url().await, None),
        };

        let result = self
            .cards
            .generate_word_card(&word.word, source_asset_url.as_deref())
            .await?;
        info!(
            word = %word.word,
            images = result.len(),
            fallback = result.is_fallback(),
            "Flashcard created"
        );

        if let (Some(id), Some(entry)) = (upload, history_entry) {
            match self.history.append(entry).await {
                // The history record now owns the asset reference
                Ok(_) => {
                    self.uploads.discard(id);
                },
                Err(error) => warn!(error = %error, "Failed to record upload in history"),
            }
        }

        Ok(Flashcard {
            word,
            source_asset_url,
            result,
        })
    }

    async fn resolve_upload(
        &self,
        id: UploadId,
    ) -> Result<(Option<String>, Option<HistoryEntry>), ApplicationError> {
        let item = self
            .uploads
            .get(id)
            .ok_or_else(|| ApplicationError::NotFound(format!("upload {id}")))?;

        if item.status == UploadStatus::Pending {
            let outcome = self.uploads.commit(id).await?;
            debug!(uploaded = outcome.is_uploaded(), "Committed pending upload");
        }

        let Some(item) = self.uploads.get(id) else {
            return Err(ApplicationError::NotFound(format!("upload {id}")));
        };
        let url = item.resolve().map(str::to_string);
        let entry = url
            .as_deref()
            .filter(|url| !LocalPreviewRegistry::is_preview_ref(url))
            .map(|url| HistoryEntry::from_upload(&item, url));
        Ok((url, entry))
    }

    async fn last_history_url(&self) -> Option<String> {
        match self.history.most_recent().await {
            Ok(entry) => entry.map(|e| e.url),
            Err(error) => {
                warn!(error = %error, "History unavailable, generating without a photo");
                None
            },
        }
    }
}

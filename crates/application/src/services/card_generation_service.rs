//! Card generation service
//!
//! Builds the generation prompt for a word, asks the remote generator for
//! card images and falls back to the local placeholder renderer when the
//! remote side fails. Only if both fail does the caller see an error.

use std::{fmt, sync::Arc};

use domain::{ArtifactOrigin, GenerationRequest, GenerationResult, Word, is_resolvable_asset_url};
use tracing::{info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ImageGenerationPort, LocalCardRendererPort},
};

const PHOTO_GROUNDED_TEMPLATE: &str = "\
You are an English vocabulary card designer. Using the photo I uploaded, make a word card \
for the word \"{word}\". The card is two images stacked vertically with an overall 9:16 ratio.

Step 1 - edit the photo:
- Identify the person, animal or object in the photo. If there is none, invent a character \
or a personified object (a talking flower pot, a dancing pencil).
- Change it so that it acts out the word \"{word}\" (for \"swim\", show it swimming; for \
\"flower\", show it admiring flowers in a garden).
- Keep the scene natural and the style consistent. This becomes the background of image one.

Step 2 - image one, word information:
- Overlay the word \"{word}\" centered in a clear, high-contrast font.
- Below it list the main parts of speech, US and UK pronunciation in standard IPA between \
slashes, and up to five short meanings.
- Use a standard font and avoid overlapping or blurry text.

Step 3 - image two, examples and tip:
- Plain white background.
- Two simple everyday example sentences, each with a translation.
- One memory tip on a highlighted (light green) background.
- Cut the character out of image one and place it at the bottom, acting out an example.

Step 4 - compose:
- Stack image one above image two, each taking half of the height (for example 1080x1920).
- Make sure no text is cropped and the character is fully visible.

Produce three variants internally and return only the clearest, best looking one.";

const GENERIC_TEMPLATE: &str = "\
Create an English vocabulary learning card for the word: {word}

Requirements:
1. Front: show the word, part of speech, meaning and pronunciation with a clean design
2. Back: two simple example sentences with translations and a memory tip on a white background
3. Size: 1024x1024 pixels
4. Style: modern and minimal, suited for studying

Generate two images: the front card and the back card.";

/// Generates card images with a local fallback
pub struct CardGenerationService {
    remote: Arc<dyn ImageGenerationPort>,
    local: Arc<dyn LocalCardRendererPort>,
}

impl fmt::Debug for CardGenerationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardGenerationService").finish_non_exhaustive()
    }
}

impl CardGenerationService {
    /// Create a new card generation service
    pub fn new(remote: Arc<dyn ImageGenerationPort>, local: Arc<dyn LocalCardRendererPort>) -> Self {
        Self { remote, local }
    }

    /// Build the prompt for a word
    ///
    /// The photo-grounded template is used only when the source URL is one a
    /// remote service can read.
    pub fn build_prompt(word: &Word, source_asset_url: Option<&str>) -> String {
        let template = if source_asset_url.is_some_and(is_resolvable_asset_url) {
            PHOTO_GROUNDED_TEMPLATE
        } else {
            GENERIC_TEMPLATE
        };
        template.replace("{word}", word.as_str())
    }

    /// Build a complete request for a word
    pub fn request_for(word: &Word, source_asset_url: Option<&str>) -> GenerationRequest {
        let mut request =
            GenerationRequest::new(Self::build_prompt(word, source_asset_url)).with_word(word.clone());
        if let Some(url) = source_asset_url {
            request = request.with_source(url);
        }
        request
    }

    /// Generate card images, falling back to the local renderer
    ///
    /// # Errors
    /// `GenerationUnavailable` if both the remote and the local generator fail.
    #[instrument(skip(self, request), fields(prompt_len = request.prompt.len(), has_source = request.source_asset_url.is_some()))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ApplicationError> {
        let remote_error = match self.remote.generate(request).await {
            Ok(images) => match GenerationResult::new(images, ArtifactOrigin::Remote) {
                Ok(result) => {
                    info!(count = result.len(), "Remote generation succeeded");
                    return Ok(result);
                },
                Err(e) => ApplicationError::Decode(e.to_string()),
            },
            Err(e) => e,
        };

        warn!(error = %remote_error, "Remote generation failed, using local renderer");
        self.generate_locally(request)
            .await
            .map_err(|local_error| ApplicationError::GenerationUnavailable {
                remote: remote_error.to_string(),
                local: local_error.to_string(),
            })
    }

    /// Generate placeholder cards without the network
    pub async fn generate_locally(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ApplicationError> {
        let images = self.local.render(request).await?;
        Ok(GenerationResult::new(images, ArtifactOrigin::LocalFallback)?)
    }

    /// Build the prompt for `word` and generate
    pub async fn generate_word_card(
        &self,
        word: &Word,
        source_asset_url: Option<&str>,
    ) -> Result<GenerationResult, ApplicationError> {
        self.generate(&Self::request_for(word, source_asset_url)).await
    }
}

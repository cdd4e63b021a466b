//! Generated learning card artifacts

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::Word;

/// Whether a URL can be handed to the remote generator as a source image
///
/// Only absolute http(s) URLs and inline `data:` references qualify; local
/// preview references are process-local and unreachable for remote services.
pub fn is_resolvable_asset_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:")
}

/// A single generated card image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImage {
    /// Image location (remote URL or inline data reference)
    pub url: String,
    /// Prompt as rewritten by the generator, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl CardImage {
    /// Create a card image without a revised prompt
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            revised_prompt: None,
        }
    }

    /// Attach the generator's revised prompt
    #[must_use]
    pub fn with_revised_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.revised_prompt = Some(prompt.into());
        self
    }
}

/// Request to produce card images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Full generation prompt
    pub prompt: String,
    /// Optional photo the card should be grounded on
    pub source_asset_url: Option<String>,
    /// The word being illustrated, used as a label by the local renderer
    pub word: Option<Word>,
}

impl GenerationRequest {
    /// Create a request from a prompt alone
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            source_asset_url: None,
            word: None,
        }
    }

    /// Attach a source asset URL
    #[must_use]
    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_asset_url = Some(url.into());
        self
    }

    /// Attach the word being illustrated
    #[must_use]
    pub fn with_word(mut self, word: Word) -> Self {
        self.word = Some(word);
        self
    }

    /// Source URL only if a remote service can read it
    pub fn resolvable_source(&self) -> Option<&str> {
        self.source_asset_url
            .as_deref()
            .filter(|url| is_resolvable_asset_url(url))
    }
}

/// Which generator produced the artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactOrigin {
    /// The remote generation service
    Remote,
    /// The local placeholder renderer
    LocalFallback,
}

/// Ordered, non-empty sequence of generated card images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    images: Vec<CardImage>,
    origin: ArtifactOrigin,
}

impl GenerationResult {
    /// Create a result
    ///
    /// # Errors
    /// Returns `DomainError::EmptyResult` if `images` is empty.
    pub fn new(images: Vec<CardImage>, origin: ArtifactOrigin) -> Result<Self, DomainError> {
        if images.is_empty() {
            return Err(DomainError::EmptyResult(
                "generation produced no images".to_string(),
            ));
        }
        Ok(Self { images, origin })
    }

    /// Images in generator order
    pub fn images(&self) -> &[CardImage] {
        &self.images
    }

    /// Consume and return the images
    pub fn into_images(self) -> Vec<CardImage> {
        self.images
    }

    /// Which generator produced the images
    pub const fn origin(&self) -> ArtifactOrigin {
        self.origin
    }

    /// Whether the local fallback renderer was used
    pub fn is_fallback(&self) -> bool {
        self.origin == ArtifactOrigin::LocalFallback
    }

    /// The first image (always present)
    pub fn primary(&self) -> &CardImage {
        &self.images[0]
    }

    /// Number of images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolvable_urls() {
        assert!(is_resolvable_asset_url("https://cdn.example/a.jpg"));
        assert!(is_resolvable_asset_url("http://cdn.example/a.jpg"));
        assert!(is_resolvable_asset_url("data:image/png;base64,AAAA"));
        assert!(!is_resolvable_asset_url("preview://123"));
        assert!(!is_resolvable_asset_url("blob:http://localhost/123"));
        assert!(!is_resolvable_asset_url(""));
    }

    #[test]
    fn request_filters_unresolvable_source() {
        let req = GenerationRequest::new("prompt").with_source("preview://abc");
        assert!(req.resolvable_source().is_none());

        let req = GenerationRequest::new("prompt").with_source("https://cdn.example/a.jpg");
        assert_eq!(req.resolvable_source(), Some("https://cdn.example/a.jpg"));
    }

    #[test]
    fn empty_result_is_rejected() {
        let err = GenerationResult::new(vec![], ArtifactOrigin::Remote).unwrap_err();
        assert!(matches!(err, DomainError::EmptyResult(_)));
    }

    #[test]
    fn result_preserves_order_and_origin() {
        let result = GenerationResult::new(
            vec![CardImage::new("a"), CardImage::new("b")],
            ArtifactOrigin::LocalFallback,
        )
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.primary().url, "a");
        assert_eq!(result.images()[1].url, "b");
        assert!(result.is_fallback());
    }

    #[test]
    fn card_image_omits_missing_revised_prompt() {
        let json = serde_json::to_value(CardImage::new("u")).unwrap();
        assert!(json.get("revised_prompt").is_none());

        let json = serde_json::to_value(CardImage::new("u").with_revised_prompt("p")).unwrap();
        assert_eq!(json["revised_prompt"], "p");
    }
}

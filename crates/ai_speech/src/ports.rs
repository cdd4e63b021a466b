//! Port definitions for speech synthesis
//!
//! Defines the trait (port) that speech synthesis adapters must implement.

use async_trait::async_trait;
use domain::{AudioFormat, SynthesizedAudio};

use crate::error::SpeechError;

/// Port for Text-to-Speech (TTS) implementations
///
/// Implementations of this trait convert text to audio speech.
///
/// # Example
///
/// ```ignore
/// use ai_speech::TextToSpeech;
///
/// async fn pronounce(tts: &impl TextToSpeech, word: &str) -> Result<Vec<u8>, SpeechError> {
///     let audio = tts.synthesize(word, Some("us")).await?;
///     Ok(audio.data().to_vec())
/// }
/// ```
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// # Arguments
    ///
    /// * `text` - Text to synthesize
    /// * `voice` - Optional voice name or alias (uses default if None)
    ///
    /// # Returns
    ///
    /// Returns decoded audio, whatever the transport encoding was.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SynthesizedAudio, SpeechError>;

    /// Get the default voice id
    fn default_voice(&self) -> &str;

    /// Format of the produced audio
    fn output_format(&self) -> AudioFormat;
}

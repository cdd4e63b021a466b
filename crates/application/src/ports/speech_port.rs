//! Speech port - Interface for remote text-to-speech synthesis

use async_trait::async_trait;
use domain::{AudioFormat, SynthesizedAudio, VoiceType};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for speech synthesis
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// Synthesize speech for `text` with the given voice
    ///
    /// # Arguments
    /// * `text` - Text to speak
    /// * `voice` - Voice selection
    ///
    /// # Returns
    /// Decoded audio, regardless of the provider's transport encoding
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceType,
    ) -> Result<SynthesizedAudio, ApplicationError>;

    /// Format of the audio this provider produces
    fn output_format(&self) -> AudioFormat;
}

//! Speech adapter - Implements SpeechSynthesisPort using the ai_speech crate

use std::sync::Arc;

use ai_speech::{SpeechConfig, SpeechError, TextToSpeech, VolcengineSpeechProvider};
use application::{error::ApplicationError, ports::SpeechSynthesisPort};
use async_trait::async_trait;
use domain::{AudioFormat, SynthesizedAudio, VoiceType};
use tracing::instrument;

/// Adapter for pronunciation audio
pub struct SpeechAdapter {
    provider: Arc<dyn TextToSpeech>,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("default_voice", &self.provider.default_voice())
            .field("format", &self.provider.output_format())
            .finish()
    }
}

impl SpeechAdapter {
    /// Create a new speech adapter backed by the Volcengine provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to initialize.
    pub fn new(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let provider = VolcengineSpeechProvider::new(config).map_err(Self::map_error)?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    /// Create an adapter around any provider
    pub fn with_provider(provider: Arc<dyn TextToSpeech>) -> Self {
        Self { provider }
    }

    /// Map speech error to application error
    ///
    /// Provider rejections (non-success envelope codes, rate limits, unknown
    /// voices) are upstream errors; undecodable payloads are decode errors.
    pub fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            SpeechError::ConnectionFailed(e) | SpeechError::RequestFailed(e) => {
                ApplicationError::Network(e)
            },
            SpeechError::Timeout(ms) => {
                ApplicationError::Network(format!("Speech service timeout after {ms}ms"))
            },
            SpeechError::ServerError { status, message } => {
                ApplicationError::upstream(Some(status), message)
            },
            SpeechError::SynthesisFailed { code, message } => {
                ApplicationError::upstream(None, format!("code {code}: {message}"))
            },
            SpeechError::RateLimited => {
                ApplicationError::upstream(Some(429), "Speech rate limit exceeded")
            },
            SpeechError::VoiceNotFound(voice) => {
                ApplicationError::upstream(None, format!("Voice not found: {voice}"))
            },
            SpeechError::InvalidAudio(e) | SpeechError::InvalidResponse(e) => {
                ApplicationError::Decode(e)
            },
        }
    }
}

#[async_trait]
impl SpeechSynthesisPort for SpeechAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %voice.as_str()))]
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceType,
    ) -> Result<SynthesizedAudio, ApplicationError> {
        self.provider
            .synthesize(text, Some(voice.as_str()))
            .await
            .map_err(Self::map_error)
    }

    fn output_format(&self) -> AudioFormat {
        self.provider.output_format()
    }
}

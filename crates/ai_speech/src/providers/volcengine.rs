//! Volcengine OpenSpeech provider
//!
//! Implements `TextToSpeech` against the non-streaming `/api/v1/tts` endpoint.
//!
//! # Response handling
//!
//! - `application/json`: envelope with `code == 3000` and base64 `data`
//! - `audio/*` or `application/octet-stream`: the audio itself

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use domain::{AudioFormat, SynthesizedAudio};
use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{TtsEnvelope, TtsResponse};

/// Volcengine speech provider
#[derive(Debug, Clone)]
pub struct VolcengineSpeechProvider {
    client: Client,
    config: SpeechConfig,
    format: AudioFormat,
}

impl VolcengineSpeechProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        let format = AudioFormat::from_encoding(&config.encoding).ok_or_else(|| {
            SpeechError::Configuration(format!("Unsupported encoding '{}'", config.encoding))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            format,
        })
    }

    /// The provider expects this exact (non-standard) header layout
    fn authorization(&self) -> String {
        format!("Bearer; {}", self.config.token)
    }

    fn decode_envelope(&self, body: &[u8]) -> Result<SynthesizedAudio, SpeechError> {
        let response: TtsResponse = serde_json::from_slice(body)
            .map_err(|e| SpeechError::InvalidResponse(format!("Malformed envelope: {e}")))?;

        if response.is_rate_limited() {
            return Err(SpeechError::RateLimited);
        }
        if response.is_unknown_voice() {
            return Err(SpeechError::VoiceNotFound(response.message));
        }
        if !response.is_success() {
            return Err(SpeechError::SynthesisFailed {
                code: response.code,
                message: response.message,
            });
        }

        let data = response
            .data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| SpeechError::InvalidResponse("Success without audio data".to_string()))?;
        let bytes = STANDARD
            .decode(data.as_bytes())
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid base64 audio: {e}")))?;

        Ok(SynthesizedAudio::new(bytes, self.format))
    }

    fn decode_stream(&self, body: Bytes, content_type: &str) -> Result<SynthesizedAudio, SpeechError> {
        if body.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio stream is empty".to_string()));
        }
        let format = AudioFormat::from_mime_type(content_type).unwrap_or(self.format);
        Ok(SynthesizedAudio::new(body, format))
    }
}

fn is_json(content_type: &str, body: &[u8]) -> bool {
    content_type.contains("json")
        || body
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b'{')
}

#[async_trait]
impl TextToSpeech for VolcengineSpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice))]
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SynthesizedAudio, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::RequestFailed("Text is empty".to_string()));
        }

        let voice_type = self.config.resolve_voice(voice);
        tracing::Span::current().record("voice", voice_type);

        let reqid = Uuid::new_v4().to_string();
        let envelope = TtsEnvelope::new(&self.config, reqid.clone(), text, voice_type);

        debug!(%reqid, "Synthesizing speech");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&envelope)
            .send()
            .await
            .map_err(|e| SpeechError::from_reqwest(&e, self.config.timeout_ms))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| SpeechError::from_reqwest(&e, self.config.timeout_ms))?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(SpeechError::RateLimited);
            }
            let message = serde_json::from_slice::<TtsResponse>(&body)
                .map(|r| r.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_string());
            warn!(status = %status, message = %message, "Synthesis request failed");
            return Err(SpeechError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let audio = if is_json(&content_type, &body) {
            self.decode_envelope(&body)?
        } else {
            self.decode_stream(body, &content_type)?
        };

        debug!(bytes = audio.size_bytes(), format = %audio.format(), "Synthesis completed");
        Ok(audio)
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }

    fn output_format(&self) -> AudioFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> VolcengineSpeechProvider {
        VolcengineSpeechProvider::new(SpeechConfig::test()).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let result = VolcengineSpeechProvider::new(SpeechConfig::default());
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[test]
    fn authorization_uses_semicolon_layout() {
        assert_eq!(provider().authorization(), "Bearer; test-token");
    }

    #[test]
    fn envelope_with_base64_audio_is_decoded() {
        let body = br#"{"reqid":"r","code":3000,"message":"Success","data":"AQID"}"#;
        let audio = provider().decode_envelope(body).unwrap();
        assert_eq!(audio.data().as_ref(), &[1u8, 2, 3]);
        assert_eq!(audio.format(), AudioFormat::Mp3);
    }

    #[test]
    fn envelope_error_codes_are_mapped() {
        let p = provider();
        assert!(matches!(
            p.decode_envelope(br#"{"code":3003,"message":"busy"}"#),
            Err(SpeechError::RateLimited)
        ));
        assert!(matches!(
            p.decode_envelope(br#"{"code":3050,"message":"no voice"}"#),
            Err(SpeechError::VoiceNotFound(_))
        ));
        assert!(matches!(
            p.decode_envelope(br#"{"code":3011,"message":"bad text"}"#),
            Err(SpeechError::SynthesisFailed { code: 3011, .. })
        ));
    }

    #[test]
    fn success_without_data_is_invalid() {
        assert!(matches!(
            provider().decode_envelope(br#"{"code":3000,"message":"Success"}"#),
            Err(SpeechError::InvalidResponse(_))
        ));
    }

    #[test]
    fn bad_base64_is_invalid_audio() {
        assert!(matches!(
            provider().decode_envelope(br#"{"code":3000,"data":"***"}"#),
            Err(SpeechError::InvalidAudio(_))
        ));
    }

    #[test]
    fn raw_stream_uses_content_type() {
        let audio = provider()
            .decode_stream(Bytes::from_static(&[9, 9]), "audio/wav")
            .unwrap();
        assert_eq!(audio.format(), AudioFormat::Wav);

        let audio = provider()
            .decode_stream(Bytes::from_static(&[9]), "application/octet-stream")
            .unwrap();
        assert_eq!(audio.format(), AudioFormat::Mp3);
    }

    #[test]
    fn json_detection() {
        assert!(is_json("application/json; charset=utf-8", b""));
        assert!(is_json("", b"  {\"code\":1}"));
        assert!(!is_json("audio/mpeg", &[0xFF, 0xFB]));
    }
}

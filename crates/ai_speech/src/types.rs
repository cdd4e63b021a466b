//! Wire types for the synthesis API

use serde::{Deserialize, Serialize};

use crate::config::SpeechConfig;

/// Result code of a successful synthesis
pub const SUCCESS_CODE: i64 = 3000;

/// Provider code for exceeded concurrency quota
const CODE_RATE_LIMITED: i64 = 3003;

/// Provider code for an unknown voice
const CODE_VOICE_NOT_FOUND: i64 = 3050;

/// Full request envelope
#[derive(Debug, Clone, Serialize)]
pub struct TtsEnvelope {
    /// Application credentials
    pub app: AppSection,
    /// Caller identity
    pub user: UserSection,
    /// Voice parameters
    pub audio: AudioSection,
    /// Request payload
    pub request: RequestSection,
}

/// Application credentials
#[derive(Debug, Clone, Serialize)]
pub struct AppSection {
    /// Application id
    pub appid: String,
    /// Access token
    pub token: String,
    /// Provider cluster
    pub cluster: String,
}

/// Caller identity
#[derive(Debug, Clone, Serialize)]
pub struct UserSection {
    /// User id
    pub uid: String,
}

/// Voice parameters
#[derive(Debug, Clone, Serialize)]
pub struct AudioSection {
    /// Provider voice id
    pub voice_type: String,
    /// Audio encoding
    pub encoding: String,
    /// Sample rate in Hz
    pub rate: u32,
    /// Speaking speed
    pub speed_ratio: f32,
    /// Volume
    pub volume_ratio: f32,
    /// Pitch
    pub pitch_ratio: f32,
    /// Text language
    pub language: String,
}

/// Request payload
#[derive(Debug, Clone, Serialize)]
pub struct RequestSection {
    /// Unique request id
    pub reqid: String,
    /// Text to speak
    pub text: String,
    /// Always "plain"
    pub text_type: &'static str,
    /// Always "query" (non-streaming)
    pub operation: &'static str,
}

impl TtsEnvelope {
    /// Build an envelope for `text` spoken by `voice_type`
    pub fn new(config: &SpeechConfig, reqid: String, text: &str, voice_type: &str) -> Self {
        Self {
            app: AppSection {
                appid: config.appid.clone(),
                token: config.token.clone(),
                cluster: config.cluster.clone(),
            },
            user: UserSection {
                uid: config.uid.clone(),
            },
            audio: AudioSection {
                voice_type: voice_type.to_string(),
                encoding: config.encoding.clone(),
                rate: config.rate,
                speed_ratio: config.speed_ratio,
                volume_ratio: config.volume_ratio,
                pitch_ratio: config.pitch_ratio,
                language: config.language.clone(),
            },
            request: RequestSection {
                reqid,
                text: text.to_string(),
                text_type: "plain",
                operation: "query",
            },
        }
    }
}

/// JSON response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct TtsResponse {
    /// Echoed request id
    #[serde(default)]
    pub reqid: Option<String>,
    /// Result code; [`SUCCESS_CODE`] on success
    pub code: i64,
    /// Result message
    #[serde(default)]
    pub message: String,
    /// Base64 audio
    #[serde(default)]
    pub data: Option<String>,
}

impl TtsResponse {
    /// Whether the provider reported success
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Whether the provider rejected the request for quota reasons
    pub const fn is_rate_limited(&self) -> bool {
        self.code == CODE_RATE_LIMITED
    }

    /// Whether the provider does not know the requested voice
    pub const fn is_unknown_voice(&self) -> bool {
        self.code == CODE_VOICE_NOT_FOUND
    }
}

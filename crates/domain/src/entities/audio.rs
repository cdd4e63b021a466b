//! Synthesized pronunciation audio

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Format of the audio data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 format
    Mp3,
    /// WAV format
    Wav,
    /// OGG container (Opus codec)
    Ogg,
    /// Raw PCM samples
    Pcm,
}

impl AudioFormat {
    /// Get the MIME type for this format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Pcm => "audio/pcm",
        }
    }

    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Pcm => "pcm",
        }
    }

    /// Parse from MIME type
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let base = mime.split(';').next().unwrap_or(mime).trim();
        match base {
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/ogg" | "audio/opus" => Some(Self::Ogg),
            "audio/pcm" | "audio/l16" => Some(Self::Pcm),
            _ => None,
        }
    }

    /// Parse a provider encoding name ("mp3", "wav", "ogg_opus", "pcm")
    #[must_use]
    pub fn from_encoding(encoding: &str) -> Option<Self> {
        match encoding.trim().to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "ogg" | "ogg_opus" | "opus" => Some(Self::Ogg),
            "pcm" => Some(Self::Pcm),
            _ => None,
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Decoded audio ready for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    data: Bytes,
    format: AudioFormat,
}

impl SynthesizedAudio {
    /// Wrap decoded audio bytes
    pub fn new(data: impl Into<Bytes>, format: AudioFormat) -> Self {
        Self {
            data: data.into(),
            format,
        }
    }

    /// Raw audio bytes
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Audio format
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Whether there is no audio
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

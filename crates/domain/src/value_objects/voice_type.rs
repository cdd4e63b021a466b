//! Voice selection for speech synthesis

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a synthesis voice (e.g. "us", "uk" or a provider voice id)
///
/// Stored verbatim; the speech adapter decides how aliases map to provider voices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceType(String);

impl VoiceType {
    /// Create a voice type, trimming surrounding whitespace
    pub fn new(voice: impl AsRef<str>) -> Self {
        Self(voice.as_ref().trim().to_string())
    }

    /// American English pronunciation
    pub fn us() -> Self {
        Self::new("us")
    }

    /// British English pronunciation
    pub fn uk() -> Self {
        Self::new("uk")
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VoiceType {
    fn default() -> Self {
        Self::us()
    }
}

impl fmt::Display for VoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoiceType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_type_is_trimmed() {
        assert_eq!(VoiceType::new("  us ").as_str(), "us");
    }

    #[test]
    fn default_voice_is_us() {
        assert_eq!(VoiceType::default(), VoiceType::us());
    }

    #[test]
    fn voice_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&VoiceType::uk()).unwrap();
        assert_eq!(json, "\"uk\"");
    }
}

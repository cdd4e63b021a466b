//! Cache key for synthesized speech

use std::fmt;

use super::VoiceType;

/// Stable lookup key for a `(text, voice)` pair
///
/// The text is trimmed and lower-cased before it is joined with the voice
/// identifier, so `"Apple"` and `" apple "` share one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpeechCacheKey(String);

impl SpeechCacheKey {
    /// Build the key for `text` spoken with `voice`
    pub fn new(text: &str, voice: &VoiceType) -> Self {
        Self(format!("{}_{}", Self::normalize(text), voice.as_str()))
    }

    /// Trim and case-fold text the same way the key does
    pub fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeechCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_normalized_text_and_voice() {
        let key = SpeechCacheKey::new("Apple", &VoiceType::us());
        assert_eq!(key.as_str(), "apple_us");
    }

    #[test]
    fn case_and_whitespace_do_not_change_key() {
        let a = SpeechCacheKey::new("Apple", &VoiceType::us());
        let b = SpeechCacheKey::new("  aPPLE \n", &VoiceType::us());
        assert_eq!(a, b);
    }

    #[test]
    fn different_voices_produce_different_keys() {
        let a = SpeechCacheKey::new("apple", &VoiceType::us());
        let b = SpeechCacheKey::new("apple", &VoiceType::uk());
        assert_ne!(a, b);
    }

    #[test]
    fn inner_whitespace_is_preserved() {
        let key = SpeechCacheKey::new(" Good  Morning ", &VoiceType::uk());
        assert_eq!(key.as_str(), "good  morning_uk");
    }
}

//! Cache port definition
//!
//! Storage behind `SpeechCache`. Entries are immutable once written: the
//! first value stored under a key wins and later writers receive it back.

use async_trait::async_trait;
use domain::SynthesizedAudio;

use crate::error::ApplicationError;

/// Cache port for synthesized audio
#[async_trait]
pub trait AudioCachePort: Send + Sync + std::fmt::Debug {
    /// Get cached audio by key
    async fn get(&self, key: &str) -> Result<Option<SynthesizedAudio>, ApplicationError>;

    /// Store audio unless the key is already present
    ///
    /// Returns the value that is cached under the key after the call.
    async fn insert_if_absent(
        &self,
        key: &str,
        audio: SynthesizedAudio,
    ) -> Result<SynthesizedAudio, ApplicationError>;

    /// Drop every entry
    async fn clear(&self) -> Result<(), ApplicationError>;

    /// Current number of entries
    fn entry_count(&self) -> u64;
}

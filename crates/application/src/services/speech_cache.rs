//! Speech cache
//!
//! Serves pronunciation audio keyed by normalized text and voice. Misses go
//! to the remote synthesizer; the decoded audio is stored once and reused.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use domain::{SpeechCacheKey, SynthesizedAudio, VoiceType};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::ApplicationError,
    ports::{AudioCachePort, SpeechSynthesisPort},
};

/// Snapshot of the cache counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that went to the synthesizer
    pub misses: u64,
    /// Bytes fetched from the synthesizer
    pub total_bytes: u64,
    /// `hits / (hits + misses)`, zero before the first lookup
    pub hit_rate: f64,
}

/// Cache-fronted speech synthesis
pub struct SpeechCache {
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    store: Arc<dyn AudioCachePort>,
    hits: AtomicU64,
    misses: AtomicU64,
    total_bytes: AtomicU64,
}

impl fmt::Debug for SpeechCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechCache")
            .field("store", &self.store)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl SpeechCache {
    /// Create a cache in front of a synthesizer
    pub fn new(synthesizer: Arc<dyn SpeechSynthesisPort>, store: Arc<dyn AudioCachePort>) -> Self {
        Self {
            synthesizer,
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
        }
    }

    /// Audio for `text` spoken with `voice`
    ///
    /// # Errors
    /// Synthesis failures are returned as-is; there is no local fallback
    /// for audio.
    #[instrument(skip(self), fields(voice = %voice))]
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceType,
    ) -> Result<SynthesizedAudio, ApplicationError> {
        let key = SpeechCacheKey::new(text, voice);

        if let Some(audio) = self.store.get(key.as_str()).await? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Speech cache hit");
            return Ok(audio);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "Speech cache miss");

        let audio = self.synthesizer.synthesize(text.trim(), voice).await?;
        if audio.is_empty() {
            return Err(ApplicationError::Decode(
                "synthesizer returned empty audio".to_string(),
            ));
        }
        self.total_bytes
            .fetch_add(audio.size_bytes() as u64, Ordering::Relaxed);

        self.store.insert_if_absent(key.as_str(), audio).await
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };
        CacheStats {
            hits,
            misses,
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            hit_rate,
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> u64 {
        self.store.entry_count()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries and reset the counters
    pub async fn clear(&self) -> Result<(), ApplicationError> {
        self.store.clear().await?;
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.total_bytes.store(0, Ordering::Relaxed);
        Ok(())
    }
}

//! Moka in-memory audio cache
//!
//! Entries are weighted by their audio size so the configured byte budget is
//! what bounds memory, not the entry count. Eviction follows moka's TinyLFU
//! admission with LRU replacement.

use std::time::Duration;

use application::{error::ApplicationError, ports::AudioCachePort};
use async_trait::async_trait;
use domain::SynthesizedAudio;
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::config::AudioCacheConfig;

/// Moka-based store for synthesized audio
pub struct MokaAudioCache {
    cache: Cache<String, SynthesizedAudio>,
    max_bytes: u64,
}

impl std::fmt::Debug for MokaAudioCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaAudioCache")
            .field("entries", &self.cache.entry_count())
            .field("weighted_bytes", &self.cache.weighted_size())
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

impl MokaAudioCache {
    /// Create a cache with the given budget
    #[must_use]
    pub fn new(config: &AudioCacheConfig) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_bytes)
            .weigher(|_key: &String, audio: &SynthesizedAudio| -> u32 {
                audio.size_bytes().try_into().unwrap_or(u32::MAX)
            });

        if let Some(idle) = config.time_to_idle_secs {
            builder = builder.time_to_idle(Duration::from_secs(idle));
        }

        Self {
            cache: builder.build(),
            max_bytes: config.max_bytes,
        }
    }

    /// Bytes currently held, after pending maintenance has run
    pub async fn weighted_size(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.weighted_size()
    }
}

impl Default for MokaAudioCache {
    fn default() -> Self {
        Self::new(&AudioCacheConfig::default())
    }
}

#[async_trait]
impl AudioCachePort for MokaAudioCache {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<SynthesizedAudio>, ApplicationError> {
        Ok(self.cache.get(key).await)
    }

    #[instrument(skip(self, audio), level = "debug", fields(bytes = audio.size_bytes()))]
    async fn insert_if_absent(
        &self,
        key: &str,
        audio: SynthesizedAudio,
    ) -> Result<SynthesizedAudio, ApplicationError> {
        let entry = self.cache.entry(key.to_string()).or_insert(audio).await;
        if !entry.is_fresh() {
            debug!(key = %key, "Cache already held audio, keeping first entry");
        }
        Ok(entry.into_value())
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear(&self) -> Result<(), ApplicationError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        debug!("Audio cache cleared");
        Ok(())
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use domain::AudioFormat;

    use super::*;

    fn audio(bytes: &[u8]) -> SynthesizedAudio {
        SynthesizedAudio::new(bytes.to_vec(), AudioFormat::Mp3)
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let cache = MokaAudioCache::default();
        assert!(cache.get("apple_us").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_then_get() {
        let cache = MokaAudioCache::default();
        cache
            .insert_if_absent("apple_us", audio(&[1, 2, 3]))
            .await
            .unwrap();

        let stored = cache.get("apple_us").await.unwrap().unwrap();
        assert_eq!(stored.data().as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn first_writer_wins() {
        let cache = MokaAudioCache::default();
        let first = cache
            .insert_if_absent("apple_us", audio(&[1]))
            .await
            .unwrap();
        let second = cache
            .insert_if_absent("apple_us", audio(&[2, 2]))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.data().as_ref(), &[1]);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let cache = MokaAudioCache::default();
        cache.insert_if_absent("a_us", audio(&[1])).await.unwrap();
        cache.insert_if_absent("b_uk", audio(&[2])).await.unwrap();

        cache.clear().await.unwrap();

        assert_eq!(cache.entry_count(), 0);
        assert!(cache.get("a_us").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn entries_are_weighted_by_size() {
        let cache = MokaAudioCache::default();
        cache
            .insert_if_absent("a_us", audio(&[0; 100]))
            .await
            .unwrap();
        cache
            .insert_if_absent("b_us", audio(&[0; 50]))
            .await
            .unwrap();

        assert_eq!(cache.weighted_size().await, 150);
        assert_eq!(cache.entry_count(), 2);
    }

    #[tokio::test]
    async fn budget_bounds_retained_bytes() {
        let cache = MokaAudioCache::new(&AudioCacheConfig {
            max_bytes: 1_000,
            time_to_idle_secs: None,
        });
        for i in 0..20 {
            cache
                .insert_if_absent(&format!("word{i}_us"), audio(&[0; 200]))
                .await
                .unwrap();
        }

        assert!(cache.weighted_size().await <= 1_000);
    }

    #[test]
    fn debug_shows_budget() {
        let debug = format!("{:?}", MokaAudioCache::default());
        assert!(debug.contains("MokaAudioCache"));
        assert!(debug.contains("max_bytes"));
    }
}

//! Pronunciation audio cache configuration.

use serde::{Deserialize, Serialize};

/// In-memory audio cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioCacheConfig {
    /// Total audio bytes retained before eviction (default: 64 MiB)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Evict entries not read for this many seconds (unset keeps them until
    /// the byte budget forces eviction)
    #[serde(default)]
    pub time_to_idle_secs: Option<u64>,
}

const fn default_max_bytes() -> u64 {
    64 * 1024 * 1024
}

impl Default for AudioCacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            time_to_idle_secs: None,
        }
    }
}

impl AudioCacheConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_bytes == 0 {
            return Err("audio_cache.max_bytes must be positive".to_string());
        }
        if self.time_to_idle_secs == Some(0) {
            return Err("audio_cache.time_to_idle_secs must be positive when set".to_string());
        }
        Ok(())
    }
}

//! In-memory port doubles shared by service tests

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use domain::{HistoryEntry, SynthesizedAudio};
use parking_lot::Mutex;

use crate::{
    error::ApplicationError,
    ports::{AudioCachePort, HistoryRepositoryPort},
};

/// Audio cache backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryAudioStore {
    entries: Mutex<HashMap<String, SynthesizedAudio>>,
}

#[async_trait]
impl AudioCachePort for MemoryAudioStore {
    async fn get(&self, key: &str) -> Result<Option<SynthesizedAudio>, ApplicationError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn insert_if_absent(
        &self,
        key: &str,
        audio: SynthesizedAudio,
    ) -> Result<SynthesizedAudio, ApplicationError> {
        Ok(self
            .entries
            .lock()
            .entry(key.to_string())
            .or_insert(audio)
            .clone())
    }

    async fn clear(&self) -> Result<(), ApplicationError> {
        self.entries.lock().clear();
        Ok(())
    }

    fn entry_count(&self) -> u64 {
        self.entries.lock().len() as u64
    }
}

/// History record held in memory
#[derive(Debug, Default)]
pub struct MemoryHistoryRepository {
    record: Mutex<Vec<HistoryEntry>>,
    saves: AtomicU64,
}

impl MemoryHistoryRepository {
    /// Number of `save` calls so far
    pub fn saves(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryRepositoryPort for MemoryHistoryRepository {
    async fn load(&self) -> Result<Vec<HistoryEntry>, ApplicationError> {
        Ok(self.record.lock().clone())
    }

    async fn save(&self, entries: &[HistoryEntry]) -> Result<(), ApplicationError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.record.lock() = entries.to_vec();
        Ok(())
    }
}

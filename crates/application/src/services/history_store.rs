//! Upload history store
//!
//! A small, deduplicated, capacity-bounded list of assets that were used for
//! a successful generation. The persisted record is the source of truth;
//! every mutation is published so that in-memory readers can resync.
//!
//! Invalidations are published by the store instance that made the change.
//! Share one `Arc<HistoryStore>` per persisted record; writes made through a
//! second store over the same repository reach mirrors only on `resync`.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use domain::HistoryEntry;
use parking_lot::RwLock;
use tokio::sync::{Mutex, broadcast, broadcast::error::TryRecvError};
use tracing::{debug, instrument, warn};

use crate::{error::ApplicationError, ports::HistoryRepositoryPort};

/// Default number of entries kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

const EVENT_BUFFER: usize = 16;

/// Published after every persisted mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryInvalidated {
    /// Monotonic mutation counter of the publishing store
    pub revision: u64,
}

/// Persisted upload history with invalidation broadcast
///
/// Cloning the `Arc` is the way to hand the store to more writers; every
/// clone publishes to the same subscribers.
pub struct HistoryStore {
    repository: Arc<dyn HistoryRepositoryPort>,
    capacity: usize,
    revision: AtomicU64,
    events: broadcast::Sender<HistoryInvalidated>,
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("capacity", &self.capacity)
            .field("revision", &self.revision.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl HistoryStore {
    /// Create a store with the default capacity
    pub fn new(repository: Arc<dyn HistoryRepositoryPort>) -> Self {
        Self::with_capacity(repository, DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a store keeping at most `capacity` entries
    pub fn with_capacity(repository: Arc<dyn HistoryRepositoryPort>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            repository,
            capacity: capacity.max(1),
            revision: AtomicU64::new(0),
            events,
        }
    }

    /// Maximum number of entries
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Subscribe to invalidation events
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryInvalidated> {
        self.events.subscribe()
    }

    /// Persisted entries, most recent first
    pub async fn list(&self) -> Result<Vec<HistoryEntry>, ApplicationError> {
        self.repository.load().await
    }

    /// The most recently added entry
    pub async fn most_recent(&self) -> Result<Option<HistoryEntry>, ApplicationError> {
        Ok(self.list().await?.into_iter().next())
    }

    /// Prepend an entry unless its URL is already present
    ///
    /// Returns `false` (and leaves the record untouched) for a duplicate URL.
    #[instrument(skip(self, entry), fields(url = %entry.url))]
    pub async fn append(&self, entry: HistoryEntry) -> Result<bool, ApplicationError> {
        let mut entries = self.repository.load().await?;
        if entries.iter().any(|existing| existing.url == entry.url) {
            debug!("Entry already in history");
            return Ok(false);
        }

        entries.insert(0, entry);
        entries.truncate(self.capacity);
        self.repository.save(&entries).await?;
        self.publish();
        Ok(true)
    }

    /// Remove every entry with the given URL
    ///
    /// Always persists and publishes; returns how many entries were removed.
    #[instrument(skip(self))]
    pub async fn remove(&self, url: &str) -> Result<usize, ApplicationError> {
        let mut entries = self.repository.load().await?;
        let before = entries.len();
        entries.retain(|entry| entry.url != url);
        let removed = before - entries.len();

        self.repository.save(&entries).await?;
        self.publish();
        debug!(removed, "Removed history entries");
        Ok(removed)
    }

    /// Drop all entries
    pub async fn clear(&self) -> Result<(), ApplicationError> {
        self.repository.save(&[]).await?;
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        // No subscribers is fine
        let _ = self.events.send(HistoryInvalidated { revision });
    }
}

/// In-memory copy of the history that resyncs on invalidation
pub struct HistoryMirror {
    store: Arc<HistoryStore>,
    receiver: Mutex<broadcast::Receiver<HistoryInvalidated>>,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl fmt::Debug for HistoryMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryMirror")
            .field("entries", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}

impl HistoryMirror {
    /// Subscribe to the store and take an initial snapshot
    pub async fn new(store: Arc<HistoryStore>) -> Result<Self, ApplicationError> {
        let receiver = store.subscribe();
        let entries = store.list().await?;
        Ok(Self {
            store,
            receiver: Mutex::new(receiver),
            entries: RwLock::new(entries),
        })
    }

    /// Current in-memory copy
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    /// Reload from the store
    pub async fn resync(&self) -> Result<(), ApplicationError> {
        let entries = self.store.list().await?;
        *self.entries.write() = entries;
        Ok(())
    }

    /// Apply pending invalidations without waiting
    ///
    /// Returns whether a resync happened.
    pub async fn catch_up(&self) -> Result<bool, ApplicationError> {
        let mut stale = false;
        {
            let mut receiver = self.receiver.lock().await;
            loop {
                match receiver.try_recv() {
                    Ok(_) | Err(TryRecvError::Lagged(_)) => stale = true,
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
        if stale {
            self.resync().await?;
        }
        Ok(stale)
    }

    /// Resync on every invalidation until the store is dropped
    pub async fn watch(&self) -> Result<(), ApplicationError> {
        let mut receiver = self.receiver.lock().await;
        loop {
            match receiver.recv().await {
                Ok(_) => self.resync().await?,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "History mirror lagged, resyncing");
                    self.resync().await?;
                },
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::MemoryHistoryRepository as MemoryRepository;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry::new(format!("https://cdn.example/{n}.png"), format!("{n}.png"), 10, "image/png")
    }

    fn store() -> (Arc<MemoryRepository>, HistoryStore) {
        let repo = Arc::new(MemoryRepository::default());
        let store = HistoryStore::new(repo.clone());
        (repo, store)
    }

    #[tokio::test]
    async fn append_prepends_and_caps_at_capacity() {
        let (_, store) = store();
        for n in 0..15 {
            assert!(store.append(entry(n)).await.unwrap());
        }

        let list = store.list().await.unwrap();
        assert_eq!(list.len(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(list[0].url, "https://cdn.example/14.png");
        assert_eq!(list[9].url, "https://cdn.example/5.png");
    }

    #[tokio::test]
    async fn re_appending_is_a_no_op() {
        let (repo, store) = store();
        let mut rx = store.subscribe();
        store.append(entry(1)).await.unwrap();
        store.append(entry(2)).await.unwrap();
        let before = store.list().await.unwrap();

        assert!(!store.append(entry(1)).await.unwrap());
        assert_eq!(store.list().await.unwrap(), before);
        assert_eq!(repo.saves(), 2);

        assert_eq!(rx.try_recv().unwrap().revision, 1);
        assert_eq!(rx.try_recv().unwrap().revision, 2);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_shrinks_by_one_and_broadcasts_once() {
        let (_, store) = store();
        store.append(entry(1)).await.unwrap();
        store.append(entry(2)).await.unwrap();
        let mut rx = store.subscribe();

        let removed = store.remove("https://cdn.example/1.png").await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_missing_url_still_broadcasts() {
        let (_, store) = store();
        let mut rx = store.subscribe();
        assert_eq!(store.remove("https://nope").await.unwrap(), 0);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn most_recent_is_first_entry() {
        let (_, store) = store();
        assert!(store.most_recent().await.unwrap().is_none());
        store.append(entry(1)).await.unwrap();
        store.append(entry(2)).await.unwrap();
        assert_eq!(
            store.most_recent().await.unwrap().unwrap().url,
            "https://cdn.example/2.png"
        );
    }

    #[tokio::test]
    async fn mirror_resyncs_after_invalidation() {
        let (_, store) = store();
        let store = Arc::new(store);
        store.append(entry(1)).await.unwrap();

        let mirror = HistoryMirror::new(store.clone()).await.unwrap();
        assert_eq!(mirror.entries().len(), 1);

        store.append(entry(2)).await.unwrap();
        assert_eq!(mirror.entries().len(), 1);
        assert!(mirror.catch_up().await.unwrap());
        assert_eq!(mirror.entries().len(), 2);
        assert!(!mirror.catch_up().await.unwrap());
    }

    #[tokio::test]
    async fn writers_sharing_the_store_notify_every_mirror() {
        let (_, store) = store();
        let store = Arc::new(store);
        let writer = Arc::clone(&store);
        let first = HistoryMirror::new(Arc::clone(&store)).await.unwrap();
        let second = HistoryMirror::new(store).await.unwrap();

        writer.append(entry(3)).await.unwrap();

        assert!(first.catch_up().await.unwrap());
        assert!(second.catch_up().await.unwrap());
        assert_eq!(first.entries()[0].url, "https://cdn.example/3.png");
        assert_eq!(second.entries().len(), 1);
    }

    #[tokio::test]
    async fn writes_from_another_store_are_seen_after_resync() {
        let repo = Arc::new(MemoryRepository::default());
        let writer = HistoryStore::new(repo.clone());
        let reader = Arc::new(HistoryStore::new(repo));
        let mirror = HistoryMirror::new(reader).await.unwrap();

        writer.append(entry(7)).await.unwrap();
        mirror.resync().await.unwrap();
        assert_eq!(mirror.entries()[0].url, "https://cdn.example/7.png");
    }

    #[tokio::test]
    async fn clear_empties_history() {
        let (_, store) = store();
        store.append(entry(1)).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}

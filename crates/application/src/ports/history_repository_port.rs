//! History repository port - Persists the upload history record

use async_trait::async_trait;
use domain::HistoryEntry;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the single namespaced record holding the upload history
///
/// The record is the source of truth; `save` replaces it wholesale
/// (last writer wins).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HistoryRepositoryPort: Send + Sync {
    /// Load the stored list, most recent first; empty if nothing is stored
    async fn load(&self) -> Result<Vec<HistoryEntry>, ApplicationError>;

    /// Replace the stored list
    async fn save(&self, entries: &[HistoryEntry]) -> Result<(), ApplicationError>;
}

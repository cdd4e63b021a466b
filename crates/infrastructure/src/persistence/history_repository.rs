//! SQLite upload history record
//!
//! Implements `HistoryRepositoryPort` by storing the whole ordered list as one
//! JSON document under a namespace key in `kv_records`.

use std::sync::Arc;

use application::{error::ApplicationError, ports::HistoryRepositoryPort};
use async_trait::async_trait;
use chrono::Utc;
use domain::HistoryEntry;
use rusqlite::{OptionalExtension, params};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::ConnectionPool;

/// SQLite-based history record
#[derive(Debug, Clone)]
pub struct SqliteHistoryRepository {
    pool: Arc<ConnectionPool>,
    namespace: String,
}

impl SqliteHistoryRepository {
    /// Create a repository storing under `namespace`
    #[must_use]
    pub fn new(pool: Arc<ConnectionPool>, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }

    /// Key the record is stored under
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

fn persistence_error(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Persistence(e.to_string())
}

#[async_trait]
impl HistoryRepositoryPort for SqliteHistoryRepository {
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn load(&self) -> Result<Vec<HistoryEntry>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let namespace = self.namespace.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(persistence_error)?;

            let raw: Option<String> = conn
                .query_row(
                    "SELECT value FROM kv_records WHERE namespace = ?1",
                    [&namespace],
                    |row| row.get(0),
                )
                .optional()
                .map_err(persistence_error)?;

            let Some(raw) = raw else {
                return Ok(Vec::new());
            };

            match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => {
                    debug!(count = entries.len(), "Loaded history record");
                    Ok(entries)
                },
                Err(e) => {
                    warn!(error = %e, "History record is unreadable, treating it as empty");
                    Ok(Vec::new())
                },
            }
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, entries), fields(namespace = %self.namespace, count = entries.len()))]
    async fn save(&self, entries: &[HistoryEntry]) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let namespace = self.namespace.clone();
        let json = serde_json::to_string(entries).map_err(persistence_error)?;

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(persistence_error)?;

            conn.execute(
                "INSERT INTO kv_records (namespace, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(namespace) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![namespace, json, Utc::now().to_rfc3339()],
            )
            .map_err(persistence_error)?;

            debug!("Saved history record");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DatabaseConfig, persistence::create_pool};

    fn repository(namespace: &str) -> SqliteHistoryRepository {
        let pool = create_pool(&DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        })
        .unwrap();
        SqliteHistoryRepository::new(Arc::new(pool), namespace)
    }

    #[tokio::test]
    async fn empty_record_loads_as_empty_list() {
        let repo = repository("upload_history");
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_preserves_order() {
        let repo = repository("upload_history");
        let entries = vec![
            HistoryEntry::new("https://cdn.example/b.png", "b.png", 2, "image/png"),
            HistoryEntry::new("https://cdn.example/a.png", "a.png", 1, "image/png"),
        ];

        repo.save(&entries).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].url, "https://cdn.example/b.png");
        assert_eq!(loaded[1].url, "https://cdn.example/a.png");
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let repo = repository("upload_history");
        repo.save(&[HistoryEntry::new("https://x/1", "1", 1, "image/png")])
            .await
            .unwrap();
        repo.save(&[]).await.unwrap();

        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_record_loads_as_empty() {
        let repo = repository("upload_history");
        {
            let conn = repo.pool.get().unwrap();
            conn.execute(
                "INSERT INTO kv_records (namespace, value, updated_at) VALUES (?1, ?2, ?3)",
                params!["upload_history", "{not json", "now"],
            )
            .unwrap();
        }

        assert!(repo.load().await.unwrap().is_empty());
    }
}

//! Database connection management
//!
//! Provides SQLite connection pooling via r2d2.

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// SQLite connection pool type alias
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Pooled connection type alias
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create a new connection pool
///
/// In-memory databases are private to each connection, so `:memory:` pools
/// are capped at one connection to keep every caller on the same data.
pub fn create_pool(config: &DatabaseConfig) -> Result<ConnectionPool, DatabaseError> {
    info!(path = %config.path, max_connections = config.max_connections, "Creating database connection pool");

    let (manager, max_size) = if config.path == ":memory:" {
        (SqliteConnectionManager::memory(), 1)
    } else {
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::Migration(format!("Failed to create database directory: {e}"))
                })?;
            }
        }
        (
            SqliteConnectionManager::file(&config.path),
            config.max_connections.max(1),
        )
    };

    let pool = Pool::builder().max_size(max_size).build(manager)?;

    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
        if config.run_migrations {
            crate::persistence::migrations::run_migrations(&conn)?;
        }
    }

    debug!("Database connection pool created successfully");
    Ok(pool)
}

fn initialize_database(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 4,
            run_migrations: true,
        }
    }

    #[test]
    fn create_in_memory_pool() {
        let pool = create_pool(&memory_config()).unwrap();
        assert_eq!(pool.max_size(), 1);
        assert!(pool.get().is_ok());
    }

    #[test]
    fn file_pool_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/cards.db");
        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            max_connections: 2,
            run_migrations: true,
        };

        let pool = create_pool(&config).unwrap();
        assert_eq!(pool.max_size(), 2);
        assert!(path.exists());
    }

    #[test]
    fn database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, "wordcardforge.db");
        assert_eq!(config.max_connections, 4);
        assert!(config.run_migrations);
    }

    #[test]
    fn database_error_display() {
        let err = DatabaseError::Migration("bad schema".to_string());
        assert!(err.to_string().contains("bad schema"));
    }
}

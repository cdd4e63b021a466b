//! Database (SQLite) and history record configuration.

use application::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};

use super::default_true;

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of concurrent database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run pending migrations on startup (default: true)
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> String {
    "wordcardforge.db".to_string()
}

const fn default_max_connections() -> u32 {
    4
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: true,
        }
    }
}

/// Upload history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Key under which the history record is stored
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Maximum number of retained entries
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_namespace() -> String {
    "upload_history".to_string()
}

const fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            capacity: default_capacity(),
        }
    }
}

impl HistoryConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.namespace.trim().is_empty() {
            return Err("history.namespace must not be empty".to_string());
        }
        if self.capacity == 0 {
            return Err("history.capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

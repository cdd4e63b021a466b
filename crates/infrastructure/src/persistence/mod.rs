//! Persistence module
//!
//! SQLite-backed key/value records. The upload history lives under a single
//! namespace key as one JSON document.

pub mod connection;
pub mod history_repository;
pub mod migrations;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use history_repository::SqliteHistoryRepository;

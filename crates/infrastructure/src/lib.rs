//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the durable asset
//! store, remote card generation, speech synthesis, dictionary lookups, the
//! audio cache and the SQLite history record. Also owns configuration
//! loading, logging setup and runtime wiring.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod persistence;
pub mod runtime;
pub mod telemetry;

pub use adapters::*;
pub use cache::MokaAudioCache;
pub use config::{
    AppConfig, AudioCacheConfig, DatabaseConfig, DictionaryConfig, HistoryConfig, UploadConfig,
};
pub use persistence::{ConnectionPool, DatabaseError, SqliteHistoryRepository, create_pool};
pub use runtime::AppContext;
pub use telemetry::{
    LogFormat, TelemetryConfig, TelemetryError, TelemetryGuard, init_scoped_telemetry,
    init_telemetry,
};

//! Database migrations
//!
//! Schema versions are tracked in `schema_version`; each migration is applied
//! once, in order.

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    if current_version < 1 {
        if let Err(e) = migrate_v1(conn) {
            error!(version = 1, error = %e, "Migration V001 (kv records) failed");
            return Err(e);
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// Current schema version of the database, 0 for a fresh file
pub fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: namespaced JSON records
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: kv records");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_records (
            namespace TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}

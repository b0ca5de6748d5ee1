//! SQLite persistence
//!
//! One module per table. Every function takes a borrowed connection so the
//! caller decides how the connection is shared.

pub mod checks;
pub mod pets;
pub mod shares;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Corrupt value in column {column}: {reason}")]
    Corrupt { column: &'static str, reason: String },
}

impl DatabaseError {
    fn corrupt(column: &'static str, reason: impl ToString) -> Self {
        DatabaseError::Corrupt {
            column,
            reason: reason.to_string(),
        }
    }
}

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = current_version(conn);

    let migrations: [(i64, &str); 1] = [(1, include_str!("../../migrations/001_initial.sql"))];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Current schema version (0 if no schema exists yet)
fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

/// Fixed-width UTC timestamp, so text order matches time order
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::corrupt(column, e))
}

pub(crate) fn to_json_list<T: serde::Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn from_json_list<T: serde::de::DeserializeOwned>(
    column: &'static str,
    value: &str,
) -> Result<Vec<T>, DatabaseError> {
    serde_json::from_str(value).map_err(|e| DatabaseError::corrupt(column, e))
}

pub(crate) fn parse_uuid(column: &'static str, value: &str) -> Result<uuid::Uuid, DatabaseError> {
    uuid::Uuid::parse_str(value).map_err(|e| DatabaseError::corrupt(column, e))
}

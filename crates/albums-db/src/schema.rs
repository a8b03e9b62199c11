//! One-time schema bootstrap.
//!
//! The service owns a single table. It is created on startup when absent and
//! left untouched otherwise; there is no version tracking.

use rusqlite::Connection;
use thiserror::Error;

const CREATE_ALBUMS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS albums (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        price NUMERIC(10, 2) NOT NULL
    );";

/// Errors that can occur while bootstrapping the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The `CREATE TABLE` statement failed.
    #[error("failed to create albums table: {0}")]
    CreateTable(#[from] rusqlite::Error),
}

/// Creates the `albums` table if it does not exist yet.
///
/// Safe to call on every startup.
///
/// # Errors
///
/// Returns `SchemaError::CreateTable` if the statement cannot be executed.
pub fn bootstrap_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(CREATE_ALBUMS_TABLE)?;
    tracing::debug!(table = "albums", "schema bootstrap complete");
    Ok(())
}

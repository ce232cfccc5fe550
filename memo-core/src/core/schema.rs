//! Database file ownership and table creation for Memo.
//!
//! [`SchemaManager`] is bound to one database path for its whole life. Every
//! connection it hands out has already run the idempotent `CREATE TABLE IF NOT
//! EXISTS` batch in `schema.sql`, checked that the `memo` table has every column
//! the store reads and writes, and checked the stored schema version, so callers
//! never see a database without a usable `memo` table.

use crate::{MemoError, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Schema version written to `PRAGMA user_version` on a fresh database.
pub const SCHEMA_VERSION: i64 = 1;

/// Columns of the `memo` table, as created by `schema.sql`.
const REQUIRED_COLUMNS: [&str; 5] = ["id", "title", "content", "created_at", "updated_at"];

/// How long a connection waits on another connection's file lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens connections to one database file, creating the file and table on demand.
///
/// The manager holds no connection of its own; the only state is the path.
#[derive(Debug, Clone)]
pub struct SchemaManager {
    path: PathBuf,
}

impl SchemaManager {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The database file this manager opens.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a connection that may mutate the database.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::StorageUnavailable`] if the file cannot be opened or
    /// created, or the table cannot be created. Returns
    /// [`MemoError::IncompatibleTable`] if an existing `memo` table lacks a
    /// required column, and [`MemoError::UnsupportedSchemaVersion`] if the file
    /// was written by a newer schema.
    pub fn open_for_write(&self) -> Result<Connection> {
        self.open()
    }

    /// Returns a connection for queries only.
    ///
    /// The schema is still ensured first, so reading a brand-new path yields an
    /// empty table rather than an error. After that the handle is switched to
    /// `query_only`, and any write through it is rejected by SQLite.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaManager::open_for_write`].
    pub fn open_for_read(&self) -> Result<Connection> {
        let conn = self.open()?;
        conn.pragma_update(None, "query_only", true)
            .map_err(|e| self.unavailable(e))?;
        Ok(conn)
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).map_err(|e| self.unavailable(e))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| self.unavailable(e))?;
        self.ensure_schema(&conn)?;
        Ok(conn)
    }

    fn ensure_schema(&self, conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(|e| self.unavailable(e))?;

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(|e| self.unavailable(e))?;

        if version > SCHEMA_VERSION {
            return Err(MemoError::UnsupportedSchemaVersion {
                found: version,
                supported: SCHEMA_VERSION,
            });
        }

        // CREATE TABLE IF NOT EXISTS leaves a foreign `memo` table untouched.
        self.check_columns(conn)?;

        if version == 0 {
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)
                .map_err(|e| self.unavailable(e))?;
            log::debug!(
                "Initialised memo schema v{} at {}",
                SCHEMA_VERSION,
                self.path.display()
            );
        }

        Ok(())
    }

    fn check_columns(&self, conn: &Connection) -> Result<()> {
        let present: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('memo')")
            .and_then(|mut stmt| {
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<_>>>();
                names
            })
            .map_err(|e| self.unavailable(e))?;

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !present.iter().any(|p| p == *column))
            .map(|column| column.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(MemoError::IncompatibleTable {
                path: self.path.clone(),
                missing,
            });
        }
        Ok(())
    }

    fn unavailable(&self, source: rusqlite::Error) -> MemoError {
        MemoError::StorageUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

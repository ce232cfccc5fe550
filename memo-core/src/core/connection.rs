//! How [`NoteStore`](super::store::NoteStore) gets hold of a SQLite connection.
//!
//! Two strategies share one trait:
//!
//! - [`SchemaManager`] opens a fresh connection for every call and closes it
//!   before returning. Nothing is held between calls; concurrent writers rely on
//!   SQLite's own file locking.
//! - [`SharedConnection`] opens one connection up front and serialises every call
//!   through a `Mutex`. This is stronger than the per-call pattern: writers in
//!   the same process never contend for the file lock.

use crate::{Result, SchemaManager};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Runs one storage operation against a connection and releases it afterwards.
pub trait ConnectionProvider {
    /// Runs `op` on a connection that permits mutation.
    ///
    /// # Errors
    ///
    /// Returns whatever opening the connection or `op` itself returns.
    fn with_write<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>;

    /// Runs `op` on a connection sufficient for queries.
    ///
    /// # Errors
    ///
    /// Returns whatever opening the connection or `op` itself returns.
    fn with_read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>;
}

impl ConnectionProvider for SchemaManager {
    fn with_write<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.open_for_write()?;
        let result = op(&conn);
        close(conn);
        result
    }

    fn with_read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.open_for_read()?;
        let result = op(&conn);
        close(conn);
        result
    }
}

/// Closes `conn` explicitly so a failed close is logged instead of dropped.
fn close(conn: Connection) {
    if let Err((_, e)) = conn.close() {
        log::warn!("Failed to close database connection: {e}");
    }
}

/// A single long-lived connection guarded by a mutex.
pub struct SharedConnection {
    schema: SchemaManager,
    conn: Mutex<Connection>,
}

impl SharedConnection {
    /// Opens the database at `path` once and keeps the connection.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaManager::open_for_write`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let schema = SchemaManager::new(path);
        let conn = schema.open_for_write()?;
        Ok(Self {
            schema,
            conn: Mutex::new(conn),
        })
    }

    pub fn schema(&self) -> &SchemaManager {
        &self.schema
    }

    fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        // A panic mid-statement leaves SQLite itself consistent, so the lock is reusable.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        op(&conn)
    }
}

impl ConnectionProvider for SharedConnection {
    fn with_write<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        self.run(op)
    }

    fn with_read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        self.run(op)
    }
}

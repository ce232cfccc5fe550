//! Create, read, update and delete operations over the `memo` table.
//!
//! Each operation is exactly one SQL statement on one connection obtained from a
//! [`ConnectionProvider`]. Failures are logged here, at the operation boundary,
//! and then returned to the caller; nothing is retried.
//!
//! `update` and `delete` treat "no row has this id" as success. SQLite reports
//! zero changed rows for such statements rather than an error, and callers of
//! this store cannot tell the two cases apart.

use crate::core::note::format_update_time;
use crate::{ConnectionProvider, Note, Result, SchemaManager, SharedConnection};
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT id, title, content, created_at, updated_at FROM memo";

/// The data-access object for notes.
pub struct NoteStore<P = SchemaManager> {
    provider: P,
}

impl NoteStore<SchemaManager> {
    /// A store that opens and closes a connection on every call.
    pub fn open<Q: AsRef<Path>>(path: Q) -> Self {
        Self::new(SchemaManager::new(path))
    }
}

impl NoteStore<SharedConnection> {
    /// A store that keeps one mutex-guarded connection for its whole life.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::StorageUnavailable`] if the database cannot
    /// be opened.
    pub fn open_shared<Q: AsRef<Path>>(path: Q) -> Result<Self> {
        Ok(Self::new(SharedConnection::open(path)?))
    }
}

impl<P: ConnectionProvider> NoteStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Inserts a note and returns its newly assigned id.
    ///
    /// `created_at` is left to the column default; `updated_at` is set to now.
    /// Titles and contents are stored exactly as given, empty strings included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::StorageUnavailable`] if no connection could be
    /// opened, or [`crate::MemoError::StatementFailed`] if SQLite rejected the
    /// insert. No row is written in either case.
    pub fn insert(&self, title: &str, content: &str) -> Result<i64> {
        let now = chrono::Utc::now().timestamp_millis();
        self.provider
            .with_write(|conn| {
                conn.execute(
                    "INSERT INTO memo (title, content, updated_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params![title, content, now],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .inspect_err(|e| log::error!("Failed to insert note: {e}"))
    }

    /// Returns every note, newest `created_at` first.
    ///
    /// Notes created in the same millisecond come back highest id first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::StorageUnavailable`] or
    /// [`crate::MemoError::StatementFailed`]. An empty table is `Ok(vec![])`.
    pub fn list(&self) -> Result<Vec<Note>> {
        self.provider
            .with_read(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"
                ))?;
                let notes = stmt
                    .query_map([], map_note_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(notes)
            })
            .inspect_err(|e| log::error!("Failed to list notes: {e}"))
    }

    /// Like [`NoteStore::list`], but a failed read yields an empty list.
    ///
    /// The error is still logged. Use this where a stale-looking screen is
    /// preferable to an error path.
    pub fn list_best_effort(&self) -> Vec<Note> {
        self.list().unwrap_or_default()
    }

    /// Fetches one note by id, or `None` if no row has that id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::StorageUnavailable`] or
    /// [`crate::MemoError::StatementFailed`].
    pub fn get(&self, id: i64) -> Result<Option<Note>> {
        self.provider
            .with_read(|conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
                let mut rows = stmt.query_map([id], map_note_row)?;
                Ok(rows.next().transpose()?)
            })
            .inspect_err(|e| log::error!("Failed to fetch note {id}: {e}"))
    }

    /// Overwrites the title and content of `id` and refreshes `updated_at`.
    ///
    /// `id` and `created_at` are never touched. An unknown `id` is a successful
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::StorageUnavailable`] or
    /// [`crate::MemoError::StatementFailed`].
    pub fn update(&self, id: i64, title: &str, content: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        self.provider
            .with_write(|conn| {
                let changed = conn.execute(
                    "UPDATE memo SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
                    rusqlite::params![title, content, now, id],
                )?;
                if changed == 0 {
                    log::debug!("Update matched no note with id {id}");
                }
                Ok(())
            })
            .inspect_err(|e| log::error!("Failed to update note {id}: {e}"))
    }

    /// Permanently removes `id`. An unknown `id` is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::StorageUnavailable`] or
    /// [`crate::MemoError::StatementFailed`].
    pub fn delete(&self, id: i64) -> Result<()> {
        self.provider
            .with_write(|conn| {
                let changed = conn.execute("DELETE FROM memo WHERE id = ?1", [id])?;
                if changed == 0 {
                    log::debug!("Delete matched no note with id {id}");
                }
                Ok(())
            })
            .inspect_err(|e| log::error!("Failed to delete note {id}: {e}"))
    }
}

/// Maps one `SELECT_COLUMNS` row into a [`Note`].
///
/// NULL cells (possible for rows written by other tools) read as empty strings.
fn map_note_row(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    let updated_at = row
        .get::<_, Option<i64>>(4)?
        .map(format_update_time)
        .unwrap_or_default();

    Ok(Note {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        updated_at,
    })
}

//! Error types for the Memo core library.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur within the Memo core library.
#[derive(Debug, Error)]
pub enum MemoError {
    /// The database file could not be opened, created, or given its schema.
    #[error("Storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// SQLite rejected a single statement.
    #[error("Statement failed: {0}")]
    StatementFailed(#[from] rusqlite::Error),

    /// An existing `memo` table lacks columns the store needs.
    #[error("Table memo in {} is missing columns: {}", .path.display(), .missing.join(", "))]
    IncompatibleTable { path: PathBuf, missing: Vec<String> },

    /// The file was written by a newer schema than this build understands.
    #[error("Unsupported schema version {found} (this build supports up to {supported})")]
    UnsupportedSchemaVersion { found: i64, supported: i64 },

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be serialized or deserialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`MemoError`].
pub type Result<T> = std::result::Result<T, MemoError>;

impl MemoError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::StorageUnavailable { path, .. } => {
                format!("Could not open note database at {}", path.display())
            }
            Self::StatementFailed(e) => format!("Failed to save: {e}"),
            Self::IncompatibleTable { path, .. } => {
                format!("{} is not a Memo note database", path.display())
            }
            Self::UnsupportedSchemaVersion { .. } => {
                "This note database was created by a newer version of Memo".to_string()
            }
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}

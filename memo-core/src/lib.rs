//! Core library for Memo, a local SQLite store for short text notes.
//!
//! The primary entry point is [`NoteStore`], which inserts, lists, updates and
//! deletes notes in one database file. [`SchemaManager`] owns that file and its
//! single table; [`ConnectionProvider`] decides whether each call gets its own
//! connection or shares one.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    connection::{ConnectionProvider, SharedConnection},
    error::{MemoError, Result},
    note::{format_update_time, format_update_time_in, Note, NoteView, UPDATE_TIME_FORMAT},
    schema::{SchemaManager, SCHEMA_VERSION},
    store::NoteStore,
};

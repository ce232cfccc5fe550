//! Internal domain modules for the Memo core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod connection;
pub mod error;
pub mod note;
pub mod schema;
pub mod store;

//! Post storage for Postboard.
//!
//! A single [`PostStore`] trait fronts whichever backing store the process
//! is configured with. Exactly one backend is opened per process by
//! [`open_store`]. Only `sqlite` is built by default; build with
//! `--no-default-features --features document` for the document store.
//!
//! # Storage Backends
//!
//! - [`InMemoryPostStore`] -- `BTreeMap`-based store for tests and demos
//! - [`SqlitePostStore`] -- relational store over `sqlx` (feature `sqlite`)
//! - [`DocumentPostStore`] -- one JSON document per post (feature `document`)
//!
//! # Design Rules
//!
//! 1. `update` is a merge-patch: unset fields are left untouched.
//! 2. Identifiers and provenance never change after creation.
//! 3. Deletion is permanent; there are no tombstones.
//! 4. Failure to reach the backing store is reported as
//!    [`StoreError::Unavailable`], never swallowed.

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "document")]
pub mod document;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{open_store, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryPostStore;
pub use traits::{parse_numeric_id, Backend, PostStore};

#[cfg(feature = "document")]
pub use document::DocumentPostStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePostStore;

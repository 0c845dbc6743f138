//! # Storage Layer
//!
//! This module defines the generic record store that the catalog is built on.
//! It knows nothing about books: it keeps an ordered collection of records that
//! each carry a unique id, and maps that collection to a single file.
//!
//! ## Pieces
//!
//! - [`Record`]: what a storable type must provide (an id, how to build it from
//!   a draft, how to merge a partial update).
//! - [`StorageBackend`]: raw whole-file I/O. "Not found" is `Ok(None)`, every
//!   other failure is an error.
//!   - [`fs::FsBackend`]: production backend writing a JSON file atomically.
//!   - [`memory::MemBackend`]: in-memory backend for tests, can simulate write
//!     failures.
//! - [`Layout`]: how the collection is shaped inside the file. [`PlainArray`]
//!   writes a bare JSON array; the catalog supplies its own envelope layout.
//! - [`RecordStore`]: the in-memory collection plus CRUD primitives. Loaded once
//!   through an explicit [`RecordStore::load`] call, flushed after every
//!   mutation.
//!
//! ## Storage Format
//!
//! With [`PlainArray`]:
//! ```text
//! [
//!   { "id": "…", … },
//!   { "id": "…", … }
//! ]
//! ```

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

pub mod fs;
pub mod memory;
mod record_store;

pub use record_store::RecordStore;

/// Core trait that any storable record must implement.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Every field except the id.
    type Draft;

    /// A shallow partial update.
    type Patch;

    fn id(&self) -> Uuid;

    fn from_draft(id: Uuid, draft: Self::Draft) -> Self;

    /// Merge `patch` onto the record. Fields present in the patch always win.
    fn apply(&mut self, patch: Self::Patch);
}

/// Abstract interface for raw storage I/O of one file.
pub trait StorageBackend {
    /// Read the whole file. `Ok(None)` means it does not exist yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the whole file with `content`.
    fn write(&self, content: &str) -> Result<()>;

    /// Where the data lives, for messages. Virtual for non-file backends.
    fn location(&self) -> PathBuf;
}

/// Shape of the collection inside the backing file.
///
/// `decode` and `encode` are the hooks a domain layer uses to wrap records in
/// its own envelope.
pub trait Layout<T> {
    fn decode(&mut self, raw: &str) -> serde_json::Result<Vec<T>>;

    fn encode(&mut self, records: &[T]) -> serde_json::Result<String>;

    /// Forget whatever the last decode picked up. Called before every load.
    fn reset(&mut self) {}
}

/// Records stored as a bare, pretty-printed JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainArray;

impl<T: Serialize + DeserializeOwned> Layout<T> for PlainArray {
    fn decode(&mut self, raw: &str) -> serde_json::Result<Vec<T>> {
        serde_json::from_str(raw)
    }

    fn encode(&mut self, records: &[T]) -> serde_json::Result<String> {
        serde_json::to_string_pretty(records)
    }
}

/// Result of the explicit initialization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No backing file yet. The collection starts empty.
    Fresh,
    /// An existing file was read; holds the number of records loaded.
    Loaded(usize),
}

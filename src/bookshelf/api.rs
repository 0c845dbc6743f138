//! # API Facade
//!
//! The API layer is a **thin facade** over the repository. It is the single
//! entry point for every catalog operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** each domain intent to the matching repository call
//! - **Fills in defaults** (a newly added book is always `available`)
//! - **Returns owned values** so callers never borrow into the store
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: uniqueness and transition rules live in
//!   [`crate::repository`]
//! - **I/O assumptions**: no stdout, stderr or prompts
//!
//! ## Generic Over StorageBackend
//!
//! `CatalogApi<B: StorageBackend>` is generic over where the file lives:
//! - Production: `CatalogApi<FsBackend>`
//! - Testing: `CatalogApi<MemBackend>`

use crate::error::Result;
use crate::model::{Book, BookDraft, BookPatch, BookStatus, NewBook};
use crate::repository::{BookRepository, CatalogMetadata, Statistics, Transition};
use crate::sample;
use crate::store::{LoadStatus, StorageBackend};
use std::path::PathBuf;
use uuid::Uuid;

/// The main API facade for catalog operations.
pub struct CatalogApi<B: StorageBackend> {
    repo: BookRepository<B>,
}

impl<B: StorageBackend> CatalogApi<B> {
    /// Wrap a backend. Call [`CatalogApi::init`] before anything else.
    pub fn new(backend: B) -> Self {
        Self {
            repo: BookRepository::new(backend),
        }
    }

    /// Construct and initialize in one step.
    pub fn open(backend: B) -> Result<(Self, LoadStatus)> {
        let mut api = Self::new(backend);
        let status = api.init()?;
        Ok((api, status))
    }

    /// Load the catalog file. Distinguishes a fresh catalog from an existing
    /// one; a corrupt file is an error.
    pub fn init(&mut self) -> Result<LoadStatus> {
        self.repo.load()
    }

    pub fn add_book(&mut self, book: NewBook) -> Result<Book> {
        self.repo.create(book.into_draft(BookStatus::Available))
    }

    pub fn list_books(&self) -> Vec<Book> {
        self.repo.all().to_vec()
    }

    pub fn get_book(&self, id: &Uuid) -> Option<Book> {
        self.repo.get(id).cloned()
    }

    pub fn search_by_title(&self, term: &str) -> Vec<Book> {
        owned(self.repo.search_by_title(term))
    }

    pub fn search_by_author(&self, term: &str) -> Vec<Book> {
        owned(self.repo.search_by_author(term))
    }

    pub fn search_by_genre(&self, genre: &str) -> Vec<Book> {
        owned(self.repo.search_by_genre(genre))
    }

    pub fn search_by_status(&self, status: BookStatus) -> Vec<Book> {
        owned(self.repo.search_by_status(status))
    }

    pub fn update_book(&mut self, id: &Uuid, patch: BookPatch) -> Result<Option<Book>> {
        self.repo.update(id, patch)
    }

    pub fn lend_book(&mut self, id: &Uuid) -> Result<Transition> {
        self.repo.lend(id)
    }

    pub fn return_book(&mut self, id: &Uuid) -> Result<Transition> {
        self.repo.return_book(id)
    }

    pub fn mark_maintenance(&mut self, id: &Uuid) -> Result<Transition> {
        self.repo.mark_maintenance(id)
    }

    pub fn delete_book(&mut self, id: &Uuid) -> Result<bool> {
        self.repo.delete(id)
    }

    pub fn statistics(&self) -> Statistics {
        self.repo.statistics()
    }

    /// Bulk-load books that already carry their status, with one save.
    pub fn bulk_load(&mut self, books: Vec<BookDraft>) -> Result<Vec<Book>> {
        self.repo.create_many(books)
    }

    /// Bulk-load the bundled sample books.
    pub fn load_samples(&mut self) -> Result<Vec<Book>> {
        self.bulk_load(sample::sample_books())
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        self.repo.metadata()
    }

    pub fn location(&self) -> PathBuf {
        self.repo.location()
    }
}

fn owned(books: Vec<&Book>) -> Vec<Book> {
    books.into_iter().cloned().collect()
}

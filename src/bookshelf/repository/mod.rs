//! # Book Repository
//!
//! Specializes the generic [`RecordStore`] for books. The repository holds a
//! store whose layout is the [`CatalogEnvelope`], and wraps the store's
//! primitives with the catalog's business rules:
//!
//! - required fields (`title`, `author`, `isbn`) must be non-blank on creation
//! - an ISBN may belong to at most one book, on creation and on update
//! - status changes through [`BookRepository::lend`],
//!   [`BookRepository::return_book`] and [`BookRepository::mark_maintenance`]
//!   are guarded (see [`transitions`])
//!
//! The raw [`BookRepository::update`] does not enforce the status state
//! machine; it is the only way out of maintenance.

use crate::error::{CatalogError, Result};
use crate::model::{Book, BookDraft, BookPatch};
use crate::store::{LoadStatus, RecordStore, StorageBackend};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

pub mod envelope;
pub mod search;
pub mod stats;
pub mod transitions;

pub use envelope::{CatalogEnvelope, CatalogMetadata};
pub use stats::{Statistics, NO_GENRE};
pub use transitions::Transition;

pub struct BookRepository<B: StorageBackend> {
    store: RecordStore<Book, B, CatalogEnvelope>,
}

impl<B: StorageBackend> BookRepository<B> {
    pub fn new(backend: B) -> Self {
        Self {
            store: RecordStore::with_layout(backend, CatalogEnvelope::default()),
        }
    }

    /// Explicit initialization. See [`RecordStore::load`].
    pub fn load(&mut self) -> Result<LoadStatus> {
        self.store.load()
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        self.store.layout().metadata()
    }

    pub fn location(&self) -> PathBuf {
        self.store.backend().location()
    }

    pub fn create(&mut self, draft: BookDraft) -> Result<Book> {
        validate_draft(&draft)?;
        if self.isbn_owner(&draft.isbn).is_some() {
            return Err(CatalogError::DuplicateIsbn(draft.isbn));
        }

        let book = self.store.create(draft)?;
        info!(id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Create all drafts or none of them, with a single save.
    pub fn create_many(&mut self, drafts: Vec<BookDraft>) -> Result<Vec<Book>> {
        {
            let mut batch = HashSet::new();
            for draft in &drafts {
                validate_draft(draft)?;
                if self.isbn_owner(&draft.isbn).is_some() || !batch.insert(draft.isbn.as_str()) {
                    return Err(CatalogError::DuplicateIsbn(draft.isbn.clone()));
                }
            }
        }

        let books = self.store.create_many(drafts)?;
        info!(count = books.len(), "books created");
        Ok(books)
    }

    pub fn all(&self) -> &[Book] {
        self.store.all()
    }

    pub fn get(&self, id: &Uuid) -> Option<&Book> {
        self.store.get(id)
    }

    pub fn find_where<P>(&self, predicate: P) -> Vec<&Book>
    where
        P: FnMut(&Book) -> bool,
    {
        self.store.find_where(predicate)
    }

    /// Shallow update. Rejects an ISBN that already belongs to another book.
    pub fn update(&mut self, id: &Uuid, patch: BookPatch) -> Result<Option<Book>> {
        if self.get(id).is_none() {
            return Ok(None);
        }
        if let Some(isbn) = &patch.isbn {
            if self.isbn_owner(isbn).is_some_and(|owner| owner != *id) {
                return Err(CatalogError::DuplicateIsbn(isbn.clone()));
            }
        }
        self.store.update(id, patch)
    }

    pub fn delete(&mut self, id: &Uuid) -> Result<bool> {
        let deleted = self.store.delete(id)?;
        if deleted {
            info!(%id, "book deleted");
        }
        Ok(deleted)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_books(self.store.all())
    }

    fn isbn_owner(&self, isbn: &str) -> Option<Uuid> {
        self.store
            .all()
            .iter()
            .find(|b| b.isbn == isbn)
            .map(|b| b.id)
    }
}

fn validate_draft(draft: &BookDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(CatalogError::MissingField("title"));
    }
    if draft.author.trim().is_empty() {
        return Err(CatalogError::MissingField("author"));
    }
    if draft.isbn.trim().is_empty() {
        return Err(CatalogError::MissingField("isbn"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookStatus;
    use crate::store::fs::FsBackend;
    use crate::store::memory::MemBackend;
    use crate::store::Record;
    use crate::store::StorageBackend;

    fn empty_repo() -> (BookRepository<MemBackend>, MemBackend) {
        let backend = MemBackend::new();
        let mut repo = BookRepository::new(backend.clone());
        assert_eq!(repo.load().unwrap(), LoadStatus::Fresh);
        (repo, backend)
    }

    #[test]
    fn create_then_get_returns_the_input_plus_id() {
        let (mut repo, _) = empty_repo();
        let mut draft = BookDraft::new("Dune", "Frank Herbert", "978-0441172719")
            .with_genre("Science fiction");
        draft.publication_year = Some(1965);
        draft.location = Some("Shelf B2".into());

        let created = repo.create(draft.clone()).unwrap();
        let fetched = repo.get(&created.id).unwrap();

        assert_eq!(fetched, &Book::from_draft(created.id, draft));
        assert_eq!(fetched.status, BookStatus::Available);
    }

    #[test]
    fn duplicate_isbn_is_rejected_and_nothing_changes() {
        let (mut repo, backend) = empty_repo();
        repo.create(BookDraft::new("A", "X", "111")).unwrap();
        let writes = backend.write_count();

        let err = repo.create(BookDraft::new("C", "Z", "111")).unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateIsbn(ref isbn) if isbn == "111"));
        assert!(err.is_validation());
        assert_eq!(repo.all().len(), 1);
        assert_eq!(backend.write_count(), writes);
    }

    #[test]
    fn isbn_comparison_is_case_sensitive() {
        let (mut repo, _) = empty_repo();
        repo.create(BookDraft::new("A", "X", "isbn-x")).unwrap();
        assert!(repo.create(BookDraft::new("B", "Y", "ISBN-X")).is_ok());
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let (mut repo, _) = empty_repo();
        assert!(matches!(
            repo.create(BookDraft::new("  ", "X", "1")),
            Err(CatalogError::MissingField("title"))
        ));
        assert!(matches!(
            repo.create(BookDraft::new("T", "", "1")),
            Err(CatalogError::MissingField("author"))
        ));
        assert!(matches!(
            repo.create(BookDraft::new("T", "X", "")),
            Err(CatalogError::MissingField("isbn"))
        ));
        assert!(repo.all().is_empty());
    }

    #[test]
    fn create_many_is_all_or_nothing() {
        let (mut repo, backend) = empty_repo();
        repo.create(BookDraft::new("A", "X", "111")).unwrap();

        let clash_with_existing = repo.create_many(vec![
            BookDraft::new("B", "Y", "222"),
            BookDraft::new("C", "Z", "111"),
        ]);
        assert!(clash_with_existing.is_err());

        let clash_within_batch = repo.create_many(vec![
            BookDraft::new("B", "Y", "333"),
            BookDraft::new("C", "Z", "333"),
        ]);
        assert!(clash_within_batch.is_err());

        assert_eq!(repo.all().len(), 1);
        assert_eq!(backend.write_count(), 1);

        let created = repo
            .create_many(vec![
                BookDraft::new("B", "Y", "222"),
                BookDraft::new("C", "Z", "333"),
            ])
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn update_rejects_isbn_of_another_book() {
        let (mut repo, _) = empty_repo();
        let a = repo.create(BookDraft::new("A", "X", "111")).unwrap();
        let b = repo.create(BookDraft::new("B", "Y", "222")).unwrap();

        let err = repo
            .update(
                &b.id,
                BookPatch {
                    isbn: Some("111".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateIsbn(_)));
        assert_eq!(repo.get(&b.id).unwrap().isbn, "222");

        // Keeping its own ISBN is fine.
        let same = repo
            .update(
                &a.id,
                BookPatch {
                    isbn: Some("111".into()),
                    title: Some("A2".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(same.title, "A2");
    }

    #[test]
    fn update_bypasses_the_state_machine() {
        let (mut repo, _) = empty_repo();
        let book = repo.create(BookDraft::new("A", "X", "111")).unwrap();
        repo.mark_maintenance(&book.id).unwrap();

        let updated = repo
            .update(&book.id, BookPatch::status(BookStatus::Borrowed))
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookStatus::Borrowed);
    }

    #[test]
    fn update_missing_is_none() {
        let (mut repo, _) = empty_repo();
        assert!(repo
            .update(&Uuid::new_v4(), BookPatch::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn delete_updates_statistics() {
        let (mut repo, _) = empty_repo();
        let a = repo.create(BookDraft::new("A", "X", "111")).unwrap();
        repo.create(BookDraft::new("B", "Y", "222")).unwrap();

        assert!(repo.delete(&a.id).unwrap());
        assert!(repo.get(&a.id).is_none());
        assert_eq!(repo.statistics().total, 1);

        assert!(!repo.delete(&a.id).unwrap());
        assert_eq!(repo.statistics().total, 1);
    }

    #[test]
    fn catalog_scenario() {
        let (mut repo, _) = empty_repo();
        let a = repo.create(BookDraft::new("A", "Author A", "111")).unwrap();
        repo.create(BookDraft::new("B", "Author B", "222")).unwrap();

        assert!(repo.create(BookDraft::new("A again", "Author A", "111")).is_err());
        assert_eq!(repo.all().len(), 2);

        assert!(repo.lend(&a.id).unwrap().is_applied());
        assert_eq!(repo.get(&a.id).unwrap().status, BookStatus::Borrowed);
        assert!(!repo.lend(&a.id).unwrap().is_applied());
        assert!(repo.return_book(&a.id).unwrap().is_applied());
        assert_eq!(repo.get(&a.id).unwrap().status, BookStatus::Available);

        let stats = repo.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.available, 2);
        assert_eq!(stats.borrowed, 0);
        assert_eq!(stats.maintenance, 0);
    }

    #[test]
    fn save_writes_the_envelope() {
        let (mut repo, backend) = empty_repo();
        repo.create(BookDraft::new("A", "X", "111")).unwrap();
        repo.create(BookDraft::new("B", "Y", "222")).unwrap();

        let json: serde_json::Value = serde_json::from_str(&backend.content().unwrap()).unwrap();
        assert_eq!(json["metadata"]["version"], "1.0");
        assert_eq!(json["metadata"]["totalRecords"], 2);
        assert!(json["metadata"]["lastUpdated"].is_string());
        assert_eq!(json["records"][1]["isbn"], "222");
        assert_eq!(repo.metadata().total_records, 2);
    }

    #[test]
    fn failed_save_keeps_metadata() {
        let (mut repo, backend) = empty_repo();
        repo.create(BookDraft::new("A", "X", "111")).unwrap();
        let before = repo.metadata().clone();

        backend.set_simulate_write_error(true);
        assert!(repo.create(BookDraft::new("B", "Y", "222")).is_err());

        assert_eq!(repo.metadata(), &before);
        assert_eq!(repo.all().len(), 1);
    }

    #[test]
    fn restart_reproduces_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        let mut repo = BookRepository::new(FsBackend::new(&path));
        assert_eq!(repo.load().unwrap(), LoadStatus::Fresh);
        repo.create_many(vec![
            BookDraft::new("A", "X", "111").with_genre("Novel"),
            BookDraft::new("B", "Y", "222"),
            BookDraft::new("C", "Z", "333").with_status(BookStatus::Maintenance),
        ])
        .unwrap();
        let a = repo.all()[0].id;
        repo.lend(&a).unwrap();

        let mut reopened = BookRepository::new(FsBackend::new(&path));
        assert_eq!(reopened.load().unwrap(), LoadStatus::Loaded(3));
        assert_eq!(reopened.all(), repo.all());
        assert_eq!(reopened.metadata(), repo.metadata());
    }

    #[test]
    fn corrupt_file_is_detected() {
        let backend = MemBackend::with_content("{\"records\": [{\"title\": 3}]}");
        let mut repo = BookRepository::new(backend);
        assert!(matches!(repo.load(), Err(CatalogError::Corrupt { .. })));
        assert!(repo.all().is_empty());
    }

    #[test]
    fn array_shaped_files_are_corrupt_and_kept() {
        let book = format!(
            r#"[{{"id": "{}", "title": "T", "author": "A", "isbn": "1", "status": "available"}}]"#,
            Uuid::new_v4()
        );

        for raw in [book.as_str(), "[]"] {
            let backend = MemBackend::with_content(raw);
            let mut repo = BookRepository::new(backend.clone());

            assert!(matches!(repo.load(), Err(CatalogError::Corrupt { .. })));
            assert!(repo.all().is_empty());
            assert_eq!(backend.content().as_deref(), Some(raw));
            assert_eq!(backend.write_count(), 0);
        }
    }

    #[test]
    fn failed_reload_drops_previous_metadata() {
        let (mut repo, backend) = empty_repo();
        repo.create(BookDraft::new("A", "X", "111")).unwrap();
        repo.create(BookDraft::new("B", "Y", "222")).unwrap();
        assert_eq!(repo.metadata().total_records, 2);

        backend.write("{ not json").unwrap();

        assert!(matches!(repo.load(), Err(CatalogError::Corrupt { .. })));
        assert!(repo.all().is_empty());
        assert_eq!(repo.metadata().total_records, 0);
    }

    #[test]
    fn file_without_metadata_loads_with_defaults() {
        let id = Uuid::new_v4();
        let raw = format!(
            r#"{{"records": [{{"id": "{}", "title": "T", "author": "A", "isbn": "1", "status": "borrowed"}}]}}"#,
            id
        );
        let mut repo = BookRepository::new(MemBackend::with_content(raw));

        assert_eq!(repo.load().unwrap(), LoadStatus::Loaded(1));
        assert_eq!(repo.metadata().version, "1.0");
        assert_eq!(repo.get(&id).unwrap().status, BookStatus::Borrowed);
    }
}

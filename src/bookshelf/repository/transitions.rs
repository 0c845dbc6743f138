use super::BookRepository;
use crate::error::Result;
use crate::model::{Book, BookPatch, BookStatus};
use crate::store::StorageBackend;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of a guarded status change. Only persistence problems are errors;
/// a missing book or a failed precondition is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied(Book),
    NotFound(Uuid),
    Rejected { book: Book, expected: BookStatus },
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }
}

impl<B: StorageBackend> BookRepository<B> {
    /// Set the status of a book, optionally requiring its current status to
    /// be `expected`. Only the `status` field is touched.
    pub fn change_status(
        &mut self,
        id: &Uuid,
        new_status: BookStatus,
        expected: Option<BookStatus>,
    ) -> Result<Transition> {
        let Some(book) = self.get(id) else {
            warn!(%id, "book not found");
            return Ok(Transition::NotFound(*id));
        };

        if let Some(expected) = expected {
            if book.status != expected {
                warn!(
                    title = %book.title,
                    %expected,
                    actual = %book.status,
                    "status transition rejected"
                );
                return Ok(Transition::Rejected {
                    book: book.clone(),
                    expected,
                });
            }
        }

        match self.store.update(id, BookPatch::status(new_status))? {
            Some(updated) => {
                info!(title = %updated.title, status = %new_status, "status changed");
                Ok(Transition::Applied(updated))
            }
            None => Ok(Transition::NotFound(*id)),
        }
    }

    /// A book can only be lent while available.
    pub fn lend(&mut self, id: &Uuid) -> Result<Transition> {
        self.change_status(id, BookStatus::Borrowed, Some(BookStatus::Available))
    }

    /// A book can only be returned while borrowed.
    pub fn return_book(&mut self, id: &Uuid) -> Result<Transition> {
        self.change_status(id, BookStatus::Available, Some(BookStatus::Borrowed))
    }

    /// Any book may enter maintenance, whatever its current status.
    pub fn mark_maintenance(&mut self, id: &Uuid) -> Result<Transition> {
        self.change_status(id, BookStatus::Maintenance, None)
    }
}

use crate::model::{Book, BookStatus};
use std::collections::BTreeMap;

/// Bucket for books that have no genre.
pub const NO_GENRE: &str = "No genre";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub available: usize,
    pub borrowed: usize,
    pub maintenance: usize,
    pub by_genre: BTreeMap<String, usize>,
}

impl Statistics {
    /// Aggregate in a single pass.
    pub fn from_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> Self {
        let mut stats = Statistics::default();

        for book in books {
            stats.total += 1;
            match book.status {
                BookStatus::Available => stats.available += 1,
                BookStatus::Borrowed => stats.borrowed += 1,
                BookStatus::Maintenance => stats.maintenance += 1,
            }

            let genre = match book.genre.as_deref() {
                Some(g) if !g.is_empty() => g,
                _ => NO_GENRE,
            };
            *stats.by_genre.entry(genre.to_string()).or_insert(0) += 1;
        }

        stats
    }

    pub fn count(&self, status: BookStatus) -> usize {
        match status {
            BookStatus::Available => self.available,
            BookStatus::Borrowed => self.borrowed,
            BookStatus::Maintenance => self.maintenance,
        }
    }
}

use super::BookRepository;
use crate::model::{Book, BookStatus};
use crate::store::StorageBackend;

impl<B: StorageBackend> BookRepository<B> {
    /// Case-insensitive substring match on the title.
    pub fn search_by_title(&self, term: &str) -> Vec<&Book> {
        let term = term.to_lowercase();
        self.find_where(|b| b.title.to_lowercase().contains(&term))
    }

    /// Case-insensitive substring match on the author.
    pub fn search_by_author(&self, term: &str) -> Vec<&Book> {
        let term = term.to_lowercase();
        self.find_where(|b| b.author.to_lowercase().contains(&term))
    }

    /// Case-insensitive exact match on the genre. Books without one never match.
    pub fn search_by_genre(&self, genre: &str) -> Vec<&Book> {
        let genre = genre.to_lowercase();
        self.find_where(|b| {
            b.genre
                .as_deref()
                .is_some_and(|g| g.to_lowercase() == genre)
        })
    }

    pub fn search_by_status(&self, status: BookStatus) -> Vec<&Book> {
        self.find_where(|b| b.status == status)
    }
}

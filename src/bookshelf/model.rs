use crate::store::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lending state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Available,
    Borrowed,
    Maintenance,
}

impl BookStatus {
    pub fn all() -> &'static [BookStatus] {
        &[
            BookStatus::Available,
            BookStatus::Borrowed,
            BookStatus::Maintenance,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
            BookStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(BookStatus::Available),
            "borrowed" => Ok(BookStatus::Borrowed),
            "maintenance" => Ok(BookStatus::Maintenance),
            other => Err(format!(
                "unknown status '{}' (expected available, borrowed or maintenance)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub status: BookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Every field of a book except its id. This is what the repository stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default)]
    pub acquisition_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            ..Default::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.status = status;
        self
    }
}

/// A book as submitted by a user: no id and no status. The service fills in
/// the status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub publisher: Option<String>,
    pub acquisition_date: Option<String>,
    pub location: Option<String>,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            ..Default::default()
        }
    }

    pub fn into_draft(self, status: BookStatus) -> BookDraft {
        BookDraft {
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            genre: self.genre,
            publication_year: self.publication_year,
            publisher: self.publisher,
            status,
            acquisition_date: self.acquisition_date,
            location: self.location,
        }
    }
}

/// Partial update of a book. `None` leaves a field untouched; for optional
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<Option<String>>,
    pub publication_year: Option<Option<i32>>,
    pub publisher: Option<Option<String>>,
    pub status: Option<BookStatus>,
    pub acquisition_date: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

impl BookPatch {
    pub fn status(status: BookStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Record for Book {
    type Draft = BookDraft;
    type Patch = BookPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            isbn: draft.isbn,
            genre: draft.genre,
            publication_year: draft.publication_year,
            publisher: draft.publisher,
            status: draft.status,
            acquisition_date: draft.acquisition_date,
            location: draft.location,
        }
    }

    fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(isbn) = patch.isbn {
            self.isbn = isbn;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(year) = patch.publication_year {
            self.publication_year = year;
        }
        if let Some(publisher) = patch.publisher {
            self.publisher = publisher;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date) = patch.acquisition_date {
            self.acquisition_date = date;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
    }
}

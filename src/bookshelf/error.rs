use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("ISBN '{0}' already exists in the catalog")]
    DuplicateIsbn(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Catalog file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl CatalogError {
    /// Validation failures are recoverable; everything else means memory and
    /// disk may have drifted apart.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateIsbn(_) | CatalogError::MissingField(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

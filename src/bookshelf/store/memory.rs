use super::StorageBackend;
use crate::error::{CatalogError, Result};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Default)]
struct MemFile {
    content: Option<String>,
    writes: usize,
    simulate_write_error: bool,
}

/// In-memory storage backend for testing.
///
/// Clones share the same underlying "file", so a test can hand one clone to a
/// store and keep another to inspect what was written or to reopen the data
/// as if the process had restarted.
#[derive(Clone, Default)]
pub struct MemBackend {
    file: Rc<RefCell<MemFile>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose file already holds `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.file.borrow_mut().content = Some(content.into());
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.file.borrow_mut().simulate_write_error = simulate;
    }

    /// Current file content, if anything was written.
    pub fn content(&self) -> Option<String> {
        self.file.borrow().content.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.file.borrow().writes
    }
}

impl StorageBackend for MemBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.file.borrow().content.clone())
    }

    fn write(&self, content: &str) -> Result<()> {
        let mut file = self.file.borrow_mut();
        if file.simulate_write_error {
            return Err(CatalogError::Store("Simulated write error".to_string()));
        }
        file.content = Some(content.to_string());
        file.writes += 1;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://catalog.json")
    }
}

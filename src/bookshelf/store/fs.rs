use super::StorageBackend;
use crate::error::{CatalogError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use uuid::Uuid;

/// Stores the collection in a single file on disk.
pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(CatalogError::Io)?;
            }
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::Io(e)),
        }
    }

    fn write(&self, content: &str) -> Result<()> {
        self.ensure_parent()?;

        let file_name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("catalog");
        let tmp_path = self
            .path
            .with_file_name(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));

        // Atomic write
        fs::write(&tmp_path, content).map_err(CatalogError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CatalogError::Io(e));
        }
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

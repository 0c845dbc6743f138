//! # Configuration
//!
//! Settings live in `config.json` inside the bookshelf home directory.
//!
//! ## Home Resolution
//!
//! In priority order:
//! 1. `--home <dir>` on the command line
//! 2. `BOOKSHELF_HOME` environment variable
//! 3. The OS data directory (via the `directories` crate)
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data-file` | `library.json` | Catalog file, relative to the home directory unless absolute |

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILE: &str = "library.json";

pub const HOME_ENV: &str = "BOOKSHELF_HOME";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl CatalogConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(CatalogError::Io)?;
        let config: CatalogConfig =
            serde_json::from_str(&content).map_err(CatalogError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(CatalogError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(CatalogError::Serialization)?;
        fs::write(config_path, content).map_err(CatalogError::Io)?;
        Ok(())
    }

    /// Full path of the catalog file for a given home directory.
    pub fn data_path(&self, home: &Path) -> PathBuf {
        let file = Path::new(&self.data_file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            home.join(file)
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data-file" => Some(self.data_file.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data-file" => {
                if value.trim().is_empty() {
                    return Err(CatalogError::Api("data-file cannot be empty".into()));
                }
                self.data_file = value.to_string();
                Ok(())
            }
            other => Err(CatalogError::Api(format!("Unknown config key: {}", other))),
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["data-file"]
    }
}

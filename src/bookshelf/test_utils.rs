use crate::api::CatalogApi;
use crate::store::fs::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

/// A catalog backed by a real file in a throwaway directory.
pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
    pub data_file: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let data_file = root.join("library.json");
        Self {
            _temp_dir: temp_dir,
            root,
            data_file,
        }
    }

    /// Open (and load) the catalog, as a fresh process would.
    pub fn open(&self) -> CatalogApi<FsBackend> {
        let (api, _) =
            CatalogApi::open(FsBackend::new(&self.data_file)).expect("failed to open catalog");
        api
    }
}

//! In-memory runtime for tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use path_clean::PathClean;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Runtime, RuntimeError, RuntimeResult};

/// Runtime backed by an in-memory file map.
///
/// Relative paths are resolved against the runtime's cwd. Directories exist
/// implicitly as ancestors of stored files.
#[derive(Debug, Clone)]
pub struct TestRuntime {
    files: Arc<RwLock<FxHashMap<PathBuf, Vec<u8>>>>,
    cwd: PathBuf,
}

impl TestRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            files: Arc::new(RwLock::new(FxHashMap::default())),
            cwd: cwd.into(),
        }
    }

    /// Builder-style variant of [`TestRuntime::add_file`].
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = self.normalize(path.as_ref());
        self.files.write().insert(path, content.into());
    }

    fn normalize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf().clean()
        } else {
            self.cwd.join(path).clean()
        }
    }
}

#[async_trait]
impl Runtime for TestRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = self.normalize(path);
        self.files
            .read()
            .get(&path)
            .cloned()
            .ok_or(RuntimeError::FileNotFound(path))
    }

    fn exists(&self, path: &Path) -> bool {
        let path = self.normalize(path);
        self.files
            .read()
            .keys()
            .any(|file| file == &path || file.starts_with(&path))
    }

    fn is_file(&self, path: &Path) -> bool {
        let path = self.normalize(path);
        self.files.read().contains_key(&path)
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}

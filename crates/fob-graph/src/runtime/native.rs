//! Filesystem-backed runtime.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{Runtime, RuntimeError, RuntimeResult};

/// Runtime that reads from the local filesystem through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuntimeError::FileNotFound(path.to_path_buf())
            } else {
                RuntimeError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir()
            .map_err(|e| RuntimeError::Io(format!("Failed to get current directory: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_existing_and_missing() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        let runtime = NativeRuntime;
        assert!(runtime.is_file(&file));
        assert!(runtime.exists(temp.path()));
        assert!(!runtime.is_file(temp.path()));
        assert_eq!(runtime.read_to_string(&file).await.unwrap(), "hello");

        let missing = runtime.read_file(&temp.path().join("b.txt")).await;
        assert!(matches!(missing, Err(RuntimeError::FileNotFound(_))));
    }
}

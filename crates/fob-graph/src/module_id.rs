//! Module identity: the `(path, namespace)` pair that keys every graph node.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Namespace of ordinary filesystem modules.
///
/// Loader filters without an explicit namespace only match this namespace,
/// and resolver results that omit a namespace land in it.
pub const FILE_NAMESPACE: &str = "file";

/// Error returned when constructing an invalid [`ModuleId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleIdError {
    #[error("module path cannot be empty")]
    EmptyPath,

    #[error("module namespace cannot be empty (path: {path})")]
    EmptyNamespace { path: String },
}

/// Unique identity of a module node.
///
/// Two requests that produce equal `ModuleId`s denote the same module; the
/// build resolves and loads each identity at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    path: String,
    namespace: String,
}

impl ModuleId {
    /// Create an identity in an arbitrary namespace.
    pub fn new(path: impl Into<String>, namespace: impl Into<String>) -> Result<Self, ModuleIdError> {
        let path = path.into();
        let namespace = namespace.into();

        if path.is_empty() {
            return Err(ModuleIdError::EmptyPath);
        }
        if namespace.is_empty() {
            return Err(ModuleIdError::EmptyNamespace { path });
        }

        Ok(Self { path, namespace })
    }

    /// Create an identity in the [`FILE_NAMESPACE`].
    pub fn file(path: impl AsRef<Path>) -> Result<Self, ModuleIdError> {
        Self::new(path.as_ref().to_string_lossy().into_owned(), FILE_NAMESPACE)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// True when the module lives in the [`FILE_NAMESPACE`].
    pub fn is_file(&self) -> bool {
        self.namespace == FILE_NAMESPACE
    }

    /// Path as a filesystem path. Only meaningful for file modules.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Lower-cased extension of the path, without the dot.
    pub fn extension(&self) -> Option<String> {
        self.as_path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

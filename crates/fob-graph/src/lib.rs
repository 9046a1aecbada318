//! # fob-graph
//!
//! Module identities and the module graph produced by a build.
//!
//! This crate holds the data the plugin pipeline in `fob-build` produces and
//! consumes, without any plugin or dispatch logic of its own:
//!
//! - **Identity**: [`ModuleId`], the `(path, namespace)` key of every node
//! - **Content**: [`ContentKind`], how loaded contents are interpreted
//! - **Graph**: [`ModuleGraph`] of [`Module`] nodes and [`Dependency`] edges
//! - **Scanning**: [`scan::scan_imports`] discovers import specifiers
//! - **Runtime**: the [`Runtime`] I/O trait behind the default resolver and loader
//!
//! ## Quick Start
//!
//! ```rust
//! use fob_graph::{ContentKind, Module, ModuleGraph, ModuleId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ModuleGraph::new();
//!
//! let id = ModuleId::new("fib(10)", "fib")?;
//! graph.add_module(
//!     Module::builder(id.clone(), ContentKind::Js)
//!         .contents("export default 55")
//!         .build(),
//! )?;
//!
//! assert!(graph.contains(&id));
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! `ModuleGraph` uses `Arc` internally; clones share storage and may be read
//! from any thread.

pub mod content_kind;
pub mod graph;
pub mod import;
pub mod module;
pub mod module_id;
pub mod runtime;
pub mod scan;

pub use content_kind::ContentKind;
pub use graph::{GraphStatistics, ModuleGraph};
pub use import::{Dependency, ImportKind, ImportRecord};
pub use module::{Module, ModuleBuilder};
pub use module_id::{FILE_NAMESPACE, ModuleId, ModuleIdError};
pub use scan::ScanError;

// Re-export runtime types
pub use runtime::native::NativeRuntime;
pub use runtime::{Runtime, RuntimeError, RuntimeResult};

#[cfg(any(test, feature = "test-utils"))]
pub use runtime::test_utils::TestRuntime;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    pub use super::runtime::test_utils::*;
}

/// Error types for graph operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid module identity.
    #[error("Invalid module id: {0}")]
    ModuleId(#[from] ModuleIdError),

    /// Graph operation error.
    #[error("Operation error: {0}")]
    Operation(String),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

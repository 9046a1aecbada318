//! Hook argument and outcome types, and the two dispatch chains.
//!
//! Plugin callbacks are opaque async functions. Each one receives owned
//! arguments and answers with an explicit `Matched` / `NoMatch` outcome; the
//! chains in [`resolve`] and [`load`] walk them in registration order.

pub mod load;
pub mod resolve;

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use fob_graph::{ContentKind, FILE_NAMESPACE, ImportKind, ModuleId};
use serde_json::Value;

pub use load::{LoadedModule, LoaderChain};
pub use resolve::{Resolution, ResolverChain};

/// Result returned by plugin callbacks.
pub type HookResult<T> = anyhow::Result<T>;

/// Boxed future returned by a stored callback.
pub type HookFuture<T> = Pin<Box<dyn Future<Output = HookResult<T>> + Send>>;

pub(crate) type ResolveCallback =
    Arc<dyn Fn(ResolveArgs) -> HookFuture<ResolveOutcome> + Send + Sync>;
pub(crate) type LoadCallback = Arc<dyn Fn(LoadArgs) -> HookFuture<LoadOutcome> + Send + Sync>;

/// Which hook a plugin callback was registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Resolve,
    Load,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Resolve => write!(f, "resolve"),
            HookKind::Load => write!(f, "load"),
        }
    }
}

/// Arguments passed to resolver callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveArgs {
    /// The raw specifier as written in the importing module.
    pub path: String,
    /// Module containing the import; `None` for entry points.
    pub importer: Option<ModuleId>,
    /// Namespace of the importer (`file` for entry points).
    pub namespace: String,
    /// Directory relative specifiers resolve against, if any.
    pub resolve_dir: Option<PathBuf>,
    pub kind: ImportKind,
    /// Data the importer's loader attached for its imports.
    pub plugin_data: Option<Value>,
}

impl ResolveArgs {
    /// Arguments for resolving a build entry point from `cwd`.
    pub fn entry(specifier: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            path: specifier.into(),
            importer: None,
            namespace: FILE_NAMESPACE.to_string(),
            resolve_dir: Some(cwd.into()),
            kind: ImportKind::EntryPoint,
            plugin_data: None,
        }
    }
}

/// A concrete resolver answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub path: String,
    /// Namespace of the resolved module; `file` when omitted.
    pub namespace: Option<String>,
    /// External modules are kept out of the build and never loaded.
    pub external: bool,
    /// Opaque data handed to the loader of the resolved module.
    pub plugin_data: Option<Value>,
}

impl ResolvedPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: None,
            external: false,
            plugin_data: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn plugin_data(mut self, data: Value) -> Self {
        self.plugin_data = Some(data);
        self
    }
}

/// What a resolver callback decided.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// Resolved; no later resolver runs for this request.
    Matched(ResolvedPath),
    /// Not handled here; the walk continues with the next resolver.
    NoMatch,
}

impl ResolveOutcome {
    /// Shorthand for a match on `path` in the `file` namespace.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Matched(ResolvedPath::new(path))
    }
}

impl From<ResolvedPath> for ResolveOutcome {
    fn from(resolved: ResolvedPath) -> Self {
        Self::Matched(resolved)
    }
}

/// Arguments passed to loader callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadArgs {
    pub path: String,
    pub namespace: String,
    /// Data the resolver attached to this module.
    pub plugin_data: Option<Value>,
}

impl LoadArgs {
    pub fn new(id: &ModuleId, plugin_data: Option<Value>) -> Self {
        Self {
            path: id.path().to_string(),
            namespace: id.namespace().to_string(),
            plugin_data,
        }
    }
}

/// A concrete loader answer.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContent {
    pub contents: String,
    /// How `contents` is parsed; JavaScript when omitted.
    pub kind: Option<ContentKind>,
    /// Directory this module's own relative imports resolve against.
    pub resolve_dir: Option<PathBuf>,
    /// Opaque data handed to resolvers of this module's imports.
    pub plugin_data: Option<Value>,
}

impl LoadedContent {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            kind: None,
            resolve_dir: None,
            plugin_data: None,
        }
    }

    pub fn kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn resolve_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resolve_dir = Some(dir.into());
        self
    }

    pub fn plugin_data(mut self, data: Value) -> Self {
        self.plugin_data = Some(data);
        self
    }
}

/// What a loader callback decided.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Loaded; no later loader runs for this module.
    Matched(LoadedContent),
    /// Not handled here; the walk continues with the next loader.
    NoMatch,
}

impl LoadOutcome {
    /// Shorthand for JavaScript contents.
    pub fn js(contents: impl Into<String>) -> Self {
        Self::Matched(LoadedContent::new(contents))
    }

    /// Shorthand for contents of an explicit kind.
    pub fn with_kind(contents: impl Into<String>, kind: ContentKind) -> Self {
        Self::Matched(LoadedContent::new(contents).kind(kind))
    }
}

impl From<LoadedContent> for LoadOutcome {
    fn from(content: LoadedContent) -> Self {
        Self::Matched(content)
    }
}

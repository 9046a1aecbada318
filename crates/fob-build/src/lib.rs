#![cfg_attr(docsrs, feature(doc_cfg))]

//! # fob-build
//!
//! Plugin hook dispatch and module graph construction.
//!
//! Plugins register resolvers and loaders, each guarded by a regex filter and
//! an optional namespace. A build resolves its entries, then loads every
//! reachable module exactly once, walking the handlers in registration order
//! and falling back to the filesystem when no plugin matched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fob_build::{BuildOptions, HookOptions, LoadOutcome, ResolveOutcome, ResolvedPath};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let result = BuildOptions::new("fib(10)")
//!     .plugin(|build| {
//!         build.set_name("fib")?;
//!         build.add_resolver(HookOptions::new(r"^fib\((\d+)\)$"), |args| async move {
//!             Ok(ResolveOutcome::from(ResolvedPath::new(args.path).namespace("fib")))
//!         })?;
//!         build.add_loader(HookOptions::new(".*").namespace("fib"), |args| async move {
//!             let n: u32 = args.path[4..args.path.len() - 1].parse()?;
//!             Ok(LoadOutcome::js(if n < 2 {
//!                 format!("export default {}", n)
//!             } else {
//!                 format!(
//!                     "import a from 'fib({})'\nimport b from 'fib({})'\nexport default a + b",
//!                     n - 1,
//!                     n - 2
//!                 )
//!             }))
//!         })?;
//!         Ok(())
//!     })
//!     .build()
//!     .await?;
//!
//! assert_eq!(result.stats.loads, 11);
//! # Ok(()) }
//! ```
//!
//! ## Logging
//!
//! The library only emits `tracing` events. Enable the `logging` feature for
//! `init_logging` helpers that install a subscriber.

pub mod builders;
pub mod fallback;
pub mod hooks;
pub mod plugins;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use builders::{BuildOptions, BuildResult, BuildStats, OutputSettings, build};
pub use fallback::{DefaultLoader, DefaultResolver, FsLoader, FsResolver};
pub use hooks::{
    HookFuture, HookKind, HookResult, LoadArgs, LoadOutcome, LoadedContent, LoadedModule,
    LoaderChain, ResolveArgs, ResolveOutcome, ResolvedPath, Resolution, ResolverChain,
};
pub use plugins::{Filter, HookOptions, Plugin, PluginBuild, PluginRegistry, PluginSetup};

pub use fob_config::{BuildSettings, ConfigError, OutputFormat, Platform};
pub use fob_graph::{
    ContentKind, Dependency, FILE_NAMESPACE, ImportKind, Module, ModuleGraph, ModuleId,
    NativeRuntime, Runtime, RuntimeError,
};

/// Error types for fob-build operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A plugin misused its setup handle.
    #[error("Plugin configuration error in {plugin}: {message}")]
    PluginConfig { plugin: String, message: String },

    /// A handler filter is not a valid regular expression.
    #[error("Invalid filter '{pattern}' in plugin {plugin}: {message}")]
    InvalidFilter {
        plugin: String,
        pattern: String,
        message: String,
    },

    /// No resolver, plugin or default, could resolve a specifier.
    #[error("Could not resolve '{specifier}'{}", importer_suffix(.importer))]
    Unresolved {
        specifier: String,
        importer: Option<String>,
    },

    /// No loader recognized a module.
    #[error("No loader is configured for {id}")]
    UnrecognizedContent { id: ModuleId },

    /// A module could not be loaded or scanned.
    #[error("Failed to load {id}: {message}")]
    Load { id: ModuleId, message: String },

    /// A plugin callback returned an error.
    #[error("[{plugin}] {hook} hook failed: {source}")]
    Plugin {
        plugin: String,
        hook: HookKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Runtime I/O error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Invalid build options.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The graph grew past `max_modules`.
    #[error("Too many modules: the build exceeds the limit of {max}")]
    TooManyModules { max: usize },

    /// Error from the graph crate.
    #[error("Graph error: {0}")]
    Foundation(#[from] fob_graph::Error),

    /// Error loading settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A build task panicked or was cancelled.
    #[error("Build task failed: {0}")]
    Task(String),
}

/// Result type alias for fob-build operations.
pub type Result<T> = std::result::Result<T, Error>;

fn importer_suffix(importer: &Option<String>) -> String {
    importer
        .as_ref()
        .map(|importer| format!(" (imported by {})", importer))
        .unwrap_or_default()
}

impl Error {
    /// Wrap an error returned by a plugin callback.
    pub fn plugin(plugin: &str, hook: HookKind, source: anyhow::Error) -> Self {
        Error::Plugin {
            plugin: plugin.to_string(),
            hook,
            source: source.into(),
        }
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::PluginConfig { .. } => "CONFIG_ERROR",
            Error::InvalidFilter { .. } => "INVALID_FILTER",
            Error::Unresolved { .. } => "UNRESOLVED_IMPORT",
            Error::UnrecognizedContent { .. } => "UNRECOGNIZED_CONTENT",
            Error::Load { .. } => "LOAD_FAILED",
            Error::Plugin { .. } => "PLUGIN_ERROR",
            Error::Runtime(_) => "RUNTIME_ERROR",
            Error::InvalidConfig(_) | Error::Config(_) => "INVALID_CONFIG",
            Error::TooManyModules { .. } => "TOO_MANY_MODULES",
            Error::Foundation(_) => "FOUNDATION_ERROR",
            Error::Task(_) => "TASK_FAILED",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::PluginConfig { .. } => Some(Box::new(
                "Call set_name exactly once, before add_resolver or add_loader.",
            )),
            Error::InvalidFilter { .. } => Some(Box::new(
                "Filters use Rust regex syntax; look-around and backreferences are not supported.",
            )),
            Error::Unresolved { specifier, .. } => Some(Box::new(format!(
                "Add a resolver plugin for '{}', list it in `external`, or check that the file exists.",
                specifier
            ))),
            Error::UnrecognizedContent { id } if id.is_file() => Some(Box::new(format!(
                "Add a loader plugin or map the extension with `loaders` to load {}.",
                id.path()
            ))),
            Error::UnrecognizedContent { id } => Some(Box::new(format!(
                "Register a loader with namespace '{}' to load modules in that namespace.",
                id.namespace()
            ))),
            Error::TooManyModules { .. } => {
                Some(Box::new("Raise `max_modules` if the graph is expected to be this large."))
            }
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check your configuration file for syntax errors.\nError: {}",
                msg
            ))),
            _ => None,
        }
    }
}

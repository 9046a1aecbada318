//! Plugin system for fob-build.
//!
//! - [`registry`] - ordered plugin list and handler records
//! - [`build`] - the setup handle (`set_name`, `add_resolver`, `add_loader`)
//! - [`filter`] - pattern and namespace matching

pub mod build;
pub mod filter;
pub mod registry;

pub use build::PluginBuild;
pub use filter::{Filter, HookOptions};
pub use registry::{LoaderHandler, Plugin, PluginRegistry, PluginSetup, ResolverHandler};

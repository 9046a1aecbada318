//! # fob-config
//!
//! Build settings for the fob plugin pipeline, loadable from `fob.toml` and
//! `FOB_*` environment variables.

pub mod discovery;
pub mod error;
pub mod settings;
pub mod validation;

pub use discovery::{CONFIG_FILE, ConfigDiscovery, ENV_PREFIX, discover};
pub use error::{ConfigError, Result};
pub use settings::{BuildSettings, DEFAULT_MAX_MODULES, OutputFormat, Platform};
pub use validation::validate;

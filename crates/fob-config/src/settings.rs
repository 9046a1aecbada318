//! Serializable build settings.
//!
//! `BuildSettings` is the file/env facing half of a build: everything except
//! the plugin setup callbacks, which only exist in code.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default cap on distinct module identities per build.
pub const DEFAULT_MAX_MODULES: usize = 100_000;

/// Output module format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ES modules (default)
    #[default]
    Esm,
    /// CommonJS
    Cjs,
    /// Immediately-invoked function expression
    Iife,
}

/// Target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Browser environment (default)
    #[default]
    Browser,
    /// Node.js
    Node,
    /// No platform assumptions
    Neutral,
}

fn default_true() -> bool {
    true
}

fn default_max_modules() -> usize {
    DEFAULT_MAX_MODULES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Entry specifiers, resolved like any other import
    #[serde(default)]
    pub entries: Vec<String>,

    /// Bundle dependencies into the output
    #[serde(default = "default_true")]
    pub bundle: bool,

    /// Single output file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfile: Option<PathBuf>,

    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<PathBuf>,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub platform: Platform,

    /// Specifiers the default resolver marks external
    #[serde(default)]
    pub external: Vec<String>,

    /// Extra extension to content-kind mappings for the default loader
    /// (e.g. `custom = "text"`)
    #[serde(default)]
    pub loaders: BTreeMap<String, String>,

    /// Working directory entries resolve against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    /// Upper bound on distinct module identities
    #[serde(default = "default_max_modules")]
    pub max_modules: usize,

    /// Log level for `init_logging` (silent, error, warn, info, debug)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            bundle: true,
            outfile: None,
            outdir: None,
            format: OutputFormat::default(),
            platform: Platform::default(),
            external: Vec::new(),
            loaders: BTreeMap::new(),
            cwd: None,
            max_modules: DEFAULT_MAX_MODULES,
            log_level: None,
        }
    }
}

impl BuildSettings {
    /// Loader map with leading dots stripped and extensions lower-cased.
    pub fn normalized_loaders(&self) -> BTreeMap<String, String> {
        self.loaders
            .iter()
            .map(|(ext, kind)| {
                (
                    ext.trim_start_matches('.').to_ascii_lowercase(),
                    kind.clone(),
                )
            })
            .collect()
    }
}

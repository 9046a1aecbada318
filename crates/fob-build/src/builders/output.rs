use std::path::PathBuf;

use fob_config::{OutputFormat, Platform};
use fob_graph::{Module, ModuleGraph, ModuleId};

use super::graph_builder::BuildStats;

/// Output settings echoed from the build options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub bundle: bool,
    pub outfile: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub format: OutputFormat,
    pub platform: Platform,
}

/// Result of a build operation.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Every resolved module, keyed by identity.
    pub graph: ModuleGraph,

    /// Entry identities, in declaration order.
    pub entry_points: Vec<ModuleId>,

    pub output: OutputSettings,

    pub stats: BuildStats,
}

impl BuildResult {
    /// Access the module graph.
    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    /// Get entry point module IDs.
    pub fn entry_points(&self) -> &[ModuleId] {
        &self.entry_points
    }

    /// Access build statistics.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Look up a module by identity.
    pub fn module(&self, id: &ModuleId) -> Option<Module> {
        self.graph.module(id)
    }

    /// The module of the first entry point.
    pub fn entry_module(&self) -> Option<Module> {
        self.entry_points.first().and_then(|id| self.graph.module(id))
    }
}

//! In-memory module graph.
//!
//! `ModuleGraph` is `Arc`-backed: clones share the same storage, and reads
//! may happen from any thread. The graph builder is its only writer.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::{Error, Module, ModuleId, Result};

#[derive(Debug, Default)]
struct GraphInner {
    modules: FxHashMap<ModuleId, Module>,
    entry_points: Vec<ModuleId>,
}

/// Deduplicated set of resolved and loaded modules for one build.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    inner: Arc<RwLock<GraphInner>>,
}

/// Summary counts for a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub module_count: usize,
    pub external_count: usize,
    pub entry_count: usize,
    pub edge_count: usize,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module. Fails if its identity is already present.
    pub fn add_module(&self, module: Module) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.modules.contains_key(&module.id) {
            return Err(Error::Operation(format!(
                "module {} is already in the graph",
                module.id
            )));
        }
        if module.is_entry && !inner.entry_points.contains(&module.id) {
            inner.entry_points.push(module.id.clone());
        }
        inner.modules.insert(module.id.clone(), module);
        Ok(())
    }

    /// Record an identity as a build entry point.
    ///
    /// Entry order follows the order entries were declared, regardless of
    /// which entry finished loading first.
    pub fn set_entry_points(&self, entries: Vec<ModuleId>) -> Result<()> {
        let mut inner = self.inner.write();
        for id in &entries {
            let module = inner
                .modules
                .get_mut(id)
                .ok_or_else(|| Error::Operation(format!("entry {} is not in the graph", id)))?;
            module.mark_entry();
        }
        let mut seen = FxHashSet::default();
        inner.entry_points = entries.into_iter().filter(|id| seen.insert(id.clone())).collect();
        Ok(())
    }

    pub fn module(&self, id: &ModuleId) -> Option<Module> {
        self.inner.read().modules.get(id).cloned()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.inner.read().modules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().modules.is_empty()
    }

    pub fn entry_points(&self) -> Vec<ModuleId> {
        self.inner.read().entry_points.clone()
    }

    /// All modules, sorted by identity for stable output.
    pub fn modules(&self) -> Vec<Module> {
        let mut modules: Vec<Module> = self.inner.read().modules.values().cloned().collect();
        modules.sort_by(|a, b| a.id.cmp(&b.id));
        modules
    }

    /// Identities `id` depends on, in discovery order.
    pub fn dependencies(&self, id: &ModuleId) -> Result<Vec<ModuleId>> {
        let inner = self.inner.read();
        let module = inner
            .modules
            .get(id)
            .ok_or_else(|| Error::Operation(format!("module {} not found", id)))?;
        Ok(module.dependency_ids().cloned().collect())
    }

    /// Identities that import `id`.
    pub fn dependents(&self, id: &ModuleId) -> Vec<ModuleId> {
        let inner = self.inner.read();
        let mut dependents: Vec<ModuleId> = inner
            .modules
            .values()
            .filter(|module| module.dependency_ids().any(|dep| dep == id))
            .map(|module| module.id.clone())
            .collect();
        dependents.sort();
        dependents
    }

    pub fn statistics(&self) -> GraphStatistics {
        let inner = self.inner.read();
        GraphStatistics {
            module_count: inner.modules.len(),
            external_count: inner.modules.values().filter(|m| m.is_external).count(),
            entry_count: inner.entry_points.len(),
            edge_count: inner.modules.values().map(|m| m.dependencies.len()).sum(),
        }
    }
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ContentKind, Dependency, ModuleId};

/// A node of the module graph.
///
/// Contents and dependency lists are wrapped in `Arc` so cloning a module out
/// of the graph stays cheap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    /// Loaded contents. Empty for external modules.
    pub contents: Arc<str>,
    pub kind: ContentKind,
    pub dependencies: Arc<Vec<Dependency>>,
    pub is_entry: bool,
    /// External modules are resolved but never loaded.
    pub is_external: bool,
    /// Name of the plugin whose loader produced the contents, if any.
    pub loaded_by: Option<String>,
    /// Opaque data a plugin attached while resolving or loading this module.
    pub plugin_data: Option<Value>,
}

impl Module {
    /// Create a new module builder with sensible defaults.
    pub fn builder(id: ModuleId, kind: ContentKind) -> ModuleBuilder {
        ModuleBuilder {
            module: Self {
                id,
                contents: Arc::from(""),
                kind,
                dependencies: Arc::new(Vec::new()),
                is_entry: false,
                is_external: false,
                loaded_by: None,
                plugin_data: None,
            },
        }
    }

    /// External placeholder node.
    pub fn external(id: ModuleId) -> Self {
        Self::builder(id, ContentKind::Js).external(true).build()
    }

    /// Mark the module as an entry module.
    pub fn mark_entry(&mut self) {
        self.is_entry = true;
    }

    /// Resolved identities of this module's dependencies, in discovery order.
    pub fn dependency_ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.dependencies.iter().map(|dep| &dep.resolved)
    }

    /// Find the dependency a given specifier resolved to.
    pub fn dependency(&self, specifier: &str) -> Option<&Dependency> {
        self.dependencies
            .iter()
            .find(|dep| dep.specifier == specifier)
    }
}

/// Builder for [`Module`].
#[derive(Debug)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    pub fn contents(mut self, contents: impl Into<Arc<str>>) -> Self {
        self.module.contents = contents.into();
        self
    }

    pub fn dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.module.dependencies = Arc::new(dependencies);
        self
    }

    pub fn entry(mut self, is_entry: bool) -> Self {
        self.module.is_entry = is_entry;
        self
    }

    pub fn external(mut self, is_external: bool) -> Self {
        self.module.is_external = is_external;
        self
    }

    pub fn loaded_by(mut self, plugin: Option<String>) -> Self {
        self.module.loaded_by = plugin;
        self
    }

    pub fn plugin_data(mut self, data: Option<Value>) -> Self {
        self.module.plugin_data = data;
        self
    }

    pub fn build(self) -> Module {
        self.module
    }
}

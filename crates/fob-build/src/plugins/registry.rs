//! Plugin registry.
//!
//! Plugins are kept in registration order. That order, followed by each
//! plugin's own handler order, is the order every resolve and load walk
//! visits handlers in.

use std::sync::Arc;

use super::build::PluginBuild;
use super::filter::Filter;
use crate::Result;
use crate::hooks::{LoadCallback, ResolveCallback};

/// Setup callback that configures one plugin.
pub type PluginSetup = Arc<dyn Fn(&mut PluginBuild) -> Result<()> + Send + Sync>;

/// A registered resolver: filter plus opaque callback.
#[derive(Clone)]
pub struct ResolverHandler {
    pub(crate) filter: Filter,
    pub(crate) callback: ResolveCallback,
}

/// A registered loader: filter plus opaque callback.
#[derive(Clone)]
pub struct LoaderHandler {
    pub(crate) filter: Filter,
    pub(crate) callback: LoadCallback,
}

impl ResolverHandler {
    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

impl LoaderHandler {
    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

impl std::fmt::Debug for ResolverHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverHandler")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for LoaderHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderHandler")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// A named plugin with its handlers, immutable after setup.
#[derive(Debug, Clone)]
pub struct Plugin {
    pub(crate) name: String,
    pub(crate) resolvers: Vec<ResolverHandler>,
    pub(crate) loaders: Vec<LoaderHandler>,
}

impl Plugin {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolvers(&self) -> &[ResolverHandler] {
        &self.resolvers
    }

    pub fn loaders(&self) -> &[LoaderHandler] {
        &self.loaders
    }
}

/// Ordered list of plugins for one build.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `setup` against a fresh plugin handle and append the result.
    ///
    /// Fails if `setup` fails or leaves the plugin unnamed. Duplicate names are
    /// accepted; the name is only used in diagnostics.
    pub fn register<F>(&mut self, setup: F) -> Result<()>
    where
        F: FnOnce(&mut PluginBuild) -> Result<()>,
    {
        let mut build = PluginBuild::new(self.plugins.len());
        setup(&mut build)?;
        let plugin = build.finish()?;

        tracing::debug!(
            plugin = %plugin.name,
            resolvers = plugin.resolvers.len(),
            loaders = plugin.loaders.len(),
            "registered plugin"
        );
        self.plugins.push(plugin);
        Ok(())
    }

    /// Build a registry from setup callbacks, in order.
    pub fn from_setups(setups: &[PluginSetup]) -> Result<Self> {
        let mut registry = Self::new();
        for setup in setups {
            registry.register(|build| setup(build))?;
        }
        Ok(registry)
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Get the number of plugins in the registry
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Resolvers across all plugins, in dispatch order.
    pub(crate) fn resolvers(&self) -> impl Iterator<Item = (&str, &ResolverHandler)> {
        self.plugins.iter().flat_map(|plugin| {
            plugin
                .resolvers
                .iter()
                .map(move |handler| (plugin.name.as_str(), handler))
        })
    }

    /// Loaders across all plugins, in dispatch order.
    pub(crate) fn loaders(&self) -> impl Iterator<Item = (&str, &LoaderHandler)> {
        self.plugins.iter().flat_map(|plugin| {
            plugin
                .loaders
                .iter()
                .map(move |handler| (plugin.name.as_str(), handler))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{LoadOutcome, ResolveOutcome};
    use crate::{Error, HookOptions};

    #[test]
    fn test_register_keeps_order() {
        let mut registry = PluginRegistry::new();
        for name in ["plugin1", "plugin2", "plugin3"] {
            registry
                .register(|build| {
                    build.set_name(name)?;
                    build.add_resolver(HookOptions::new(".*"), |_| async {
                        Ok(ResolveOutcome::NoMatch)
                    })?;
                    Ok(())
                })
                .unwrap();
        }

        let names: Vec<&str> = registry.plugins().iter().map(Plugin::name).collect();
        assert_eq!(names, vec!["plugin1", "plugin2", "plugin3"]);
        assert_eq!(registry.resolvers().count(), 3);
        assert_eq!(registry.loaders().count(), 0);
    }

    #[test]
    fn test_handler_before_name_fails() {
        let mut registry = PluginRegistry::new();
        let err = registry
            .register(|build| {
                build.add_loader(HookOptions::new(".*"), |_| async { Ok(LoadOutcome::NoMatch) })?;
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, Error::PluginConfig { .. }));
        assert!(err.to_string().contains("#0"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_setting_name_twice_fails() {
        let mut registry = PluginRegistry::new();
        let err = registry
            .register(|build| {
                build.set_name("first")?;
                build.set_name("second")?;
                Ok(())
            })
            .unwrap_err();

        assert!(err.to_string().contains("first"));
    }

    #[test]
    fn test_unnamed_plugin_fails() {
        let mut registry = PluginRegistry::new();
        registry.register(|b| b.set_name("ok").map(|_| ())).unwrap();
        let err = registry.register(|_build| Ok(())).unwrap_err();
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_malformed_filter_fails() {
        let mut registry = PluginRegistry::new();
        let err = registry
            .register(|build| {
                build.set_name("broken")?;
                build.add_resolver(HookOptions::new("fib(("), |_| async {
                    Ok(ResolveOutcome::NoMatch)
                })?;
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, Error::InvalidFilter { ref plugin, .. } if plugin == "broken"));
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let mut registry = PluginRegistry::new();
        registry.register(|b| b.set_name("same").map(|_| ())).unwrap();
        registry.register(|b| b.set_name("same").map(|_| ())).unwrap();
        assert_eq!(registry.len(), 2);
    }
}

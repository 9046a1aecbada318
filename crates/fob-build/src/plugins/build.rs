//! The handle a plugin setup callback configures its plugin through.

use std::future::Future;
use std::sync::Arc;

use super::filter::{Filter, HookOptions};
use super::registry::{LoaderHandler, Plugin, ResolverHandler};
use crate::hooks::{
    HookFuture, HookResult, LoadArgs, LoadCallback, LoadOutcome, ResolveArgs, ResolveCallback,
    ResolveOutcome,
};
use crate::{Error, Result};

/// Setup-time handle for one plugin.
///
/// The name must be set exactly once, before any handler is added.
///
/// # Example
///
/// ```
/// use fob_build::{ContentKind, HookOptions, LoadOutcome, PluginBuild};
///
/// fn custom_text(build: &mut PluginBuild) -> fob_build::Result<()> {
///     build.set_name("custom-text")?;
///     build.add_loader(HookOptions::new(r"\.custom$"), |_args| async move {
///         Ok(LoadOutcome::with_kind("this is custom", ContentKind::Text))
///     })?;
///     Ok(())
/// }
/// ```
pub struct PluginBuild {
    index: usize,
    name: Option<String>,
    resolvers: Vec<ResolverHandler>,
    loaders: Vec<LoaderHandler>,
}

impl PluginBuild {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            name: None,
            resolvers: Vec::new(),
            loaders: Vec::new(),
        }
    }

    /// Name shown in diagnostics: the plugin name, or its registration slot.
    pub(crate) fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{} (unnamed)", self.index),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name the plugin. Must be called once, before adding handlers.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if let Some(existing) = &self.name {
            return Err(Error::PluginConfig {
                plugin: existing.clone(),
                message: format!("name is already set; cannot rename to '{}'", name),
            });
        }
        if name.trim().is_empty() {
            return Err(Error::PluginConfig {
                plugin: self.label(),
                message: "plugin name cannot be empty".to_string(),
            });
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Register a resolver. Resolvers run in the order they are added.
    pub fn add_resolver<F, Fut>(&mut self, options: HookOptions, callback: F) -> Result<&mut Self>
    where
        F: Fn(ResolveArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<ResolveOutcome>> + Send + 'static,
    {
        let filter = self.compile_filter("add_resolver", &options)?;
        let callback: ResolveCallback =
            Arc::new(move |args: ResolveArgs| -> HookFuture<ResolveOutcome> {
                Box::pin(callback(args))
            });
        self.resolvers.push(ResolverHandler { filter, callback });
        Ok(self)
    }

    /// Register a loader. Loaders run in the order they are added.
    pub fn add_loader<F, Fut>(&mut self, options: HookOptions, callback: F) -> Result<&mut Self>
    where
        F: Fn(LoadArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<LoadOutcome>> + Send + 'static,
    {
        let filter = self.compile_filter("add_loader", &options)?;
        let callback: LoadCallback = Arc::new(move |args: LoadArgs| -> HookFuture<LoadOutcome> {
            Box::pin(callback(args))
        });
        self.loaders.push(LoaderHandler { filter, callback });
        Ok(self)
    }

    fn compile_filter(&self, method: &str, options: &HookOptions) -> Result<Filter> {
        let Some(name) = &self.name else {
            return Err(Error::PluginConfig {
                plugin: self.label(),
                message: format!("set_name must be called before {}", method),
            });
        };

        Filter::compile(options).map_err(|e| Error::InvalidFilter {
            plugin: name.clone(),
            pattern: options.filter.clone(),
            message: e.to_string(),
        })
    }

    /// Finish setup, producing the immutable plugin.
    pub(crate) fn finish(self) -> Result<Plugin> {
        let Some(name) = self.name else {
            return Err(Error::PluginConfig {
                plugin: format!("#{} (unnamed)", self.index),
                message: "setup finished without calling set_name".to_string(),
            });
        };

        Ok(Plugin {
            name,
            resolvers: self.resolvers,
            loaders: self.loaders,
        })
    }
}

impl std::fmt::Debug for PluginBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginBuild")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("resolvers", &self.resolvers.len())
            .field("loaders", &self.loaders.len())
            .finish()
    }
}

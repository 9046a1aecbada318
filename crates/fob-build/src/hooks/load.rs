//! Loader chain: plugin loaders in registration order, then the default
//! loader.

use std::path::PathBuf;
use std::sync::Arc;

use fob_graph::{ContentKind, FILE_NAMESPACE, ModuleId};
use serde_json::Value;

use super::{HookKind, LoadArgs, LoadOutcome, LoadedContent};
use crate::fallback::DefaultLoader;
use crate::plugins::PluginRegistry;
use crate::{Error, Result};

/// Contents produced for one module identity.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    pub contents: String,
    pub kind: ContentKind,
    /// Directory the module's own relative imports resolve against.
    pub resolve_dir: Option<PathBuf>,
    /// Data for the resolvers of this module's imports.
    pub plugin_data: Option<Value>,
    /// Plugin whose loader matched; `None` for the default loader.
    pub loaded_by: Option<String>,
}

impl LoadedModule {
    fn new(id: &ModuleId, content: LoadedContent, loaded_by: Option<String>) -> Self {
        // File modules import relative to their own directory unless told otherwise.
        let resolve_dir = content.resolve_dir.or_else(|| {
            id.is_file()
                .then(|| id.as_path().parent().map(PathBuf::from))
                .flatten()
        });

        Self {
            contents: content.contents,
            kind: content.kind.unwrap_or_default(),
            resolve_dir,
            plugin_data: content.plugin_data,
            loaded_by,
        }
    }
}

/// Walks loaders for a single module.
#[derive(Debug, Clone)]
pub struct LoaderChain {
    registry: Arc<PluginRegistry>,
    fallback: Arc<dyn DefaultLoader>,
}

impl LoaderChain {
    pub fn new(registry: Arc<PluginRegistry>, fallback: Arc<dyn DefaultLoader>) -> Self {
        Self { registry, fallback }
    }

    /// Load `id`, handing `plugin_data` from its resolver to each loader.
    pub async fn load(&self, id: &ModuleId, plugin_data: Option<Value>) -> Result<LoadedModule> {
        let args = LoadArgs::new(id, plugin_data);

        for (plugin, handler) in self.registry.loaders() {
            if !handler
                .filter
                .matches(id.path(), id.namespace(), Some(FILE_NAMESPACE))
            {
                tracing::trace!(plugin, filter = handler.filter.pattern(), module = %id, "loader skipped");
                continue;
            }

            let outcome = (handler.callback)(args.clone())
                .await
                .map_err(|err| Error::plugin(plugin, HookKind::Load, err))?;

            if let LoadOutcome::Matched(content) = outcome {
                tracing::debug!(plugin, module = %id, "loader matched");
                return Ok(LoadedModule::new(id, content, Some(plugin.to_string())));
            }
        }

        match self.fallback.load(id).await? {
            Some(content) => {
                tracing::debug!(module = %id, "default loader used");
                Ok(LoadedModule::new(id, content, None))
            }
            None => Err(Error::UnrecognizedContent { id: id.clone() }),
        }
    }
}

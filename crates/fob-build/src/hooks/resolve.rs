//! Resolver chain: plugin resolvers in registration order, then the default
//! resolver.

use std::sync::Arc;

use fob_graph::{FILE_NAMESPACE, ModuleId};
use serde_json::Value;

use super::{HookKind, ResolveArgs, ResolveOutcome, ResolvedPath};
use crate::fallback::DefaultResolver;
use crate::plugins::PluginRegistry;
use crate::{Error, Result};

/// Final answer for one resolve request.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub id: ModuleId,
    pub external: bool,
    /// Data for the loader of `id`.
    pub plugin_data: Option<Value>,
    /// Plugin whose resolver matched; `None` for the default resolver.
    pub resolved_by: Option<String>,
}

/// Walks resolvers for a single request.
#[derive(Debug, Clone)]
pub struct ResolverChain {
    registry: Arc<PluginRegistry>,
    fallback: Arc<dyn DefaultResolver>,
}

impl ResolverChain {
    pub fn new(registry: Arc<PluginRegistry>, fallback: Arc<dyn DefaultResolver>) -> Self {
        Self { registry, fallback }
    }

    /// Resolve one request.
    ///
    /// Handlers are awaited one at a time. The first `Matched` ends the walk;
    /// a handler error ends the walk and the build.
    pub async fn resolve(&self, args: ResolveArgs) -> Result<Resolution> {
        for (plugin, handler) in self.registry.resolvers() {
            if !handler.filter.matches(&args.path, &args.namespace, None) {
                tracing::trace!(
                    plugin,
                    filter = handler.filter.pattern(),
                    specifier = %args.path,
                    "resolver skipped"
                );
                continue;
            }

            let outcome = (handler.callback)(args.clone())
                .await
                .map_err(|err| Error::plugin(plugin, HookKind::Resolve, err))?;

            match outcome {
                ResolveOutcome::NoMatch => continue,
                ResolveOutcome::Matched(resolved) => {
                    let resolution = from_plugin(plugin, resolved)?;
                    tracing::debug!(
                        plugin,
                        specifier = %args.path,
                        resolved = %resolution.id,
                        "resolver matched"
                    );
                    return Ok(resolution);
                }
            }
        }

        match self.fallback.resolve(&args).await? {
            Some(resolved) => {
                let namespace = resolved
                    .namespace
                    .unwrap_or_else(|| FILE_NAMESPACE.to_string());
                let id = ModuleId::new(resolved.path, namespace).map_err(fob_graph::Error::from)?;
                tracing::debug!(specifier = %args.path, resolved = %id, "default resolver used");
                Ok(Resolution {
                    id,
                    external: resolved.external,
                    plugin_data: resolved.plugin_data,
                    resolved_by: None,
                })
            }
            None => Err(Error::Unresolved {
                specifier: args.path,
                importer: args.importer.map(|importer| importer.to_string()),
            }),
        }
    }
}

fn from_plugin(plugin: &str, resolved: ResolvedPath) -> Result<Resolution> {
    if resolved.path.is_empty() {
        return Err(Error::plugin(
            plugin,
            HookKind::Resolve,
            anyhow::anyhow!("resolver matched with an empty path"),
        ));
    }

    let namespace = resolved
        .namespace
        .unwrap_or_else(|| FILE_NAMESPACE.to_string());
    let id = ModuleId::new(resolved.path, namespace)
        .map_err(|err| Error::plugin(plugin, HookKind::Resolve, err.into()))?;

    Ok(Resolution {
        id,
        external: resolved.external,
        plugin_data: resolved.plugin_data,
        resolved_by: Some(plugin.to_string()),
    })
}

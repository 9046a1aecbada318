//! Concurrent module graph construction.
//!
//! The driver loop owns the set of claimed identities and a `JoinSet` with one
//! task per claimed module. Each task loads its module, scans it and resolves
//! its imports; the resolutions come back to the driver, which claims and
//! spawns whatever is new. Resolve requests are memoized in a shared
//! `DashMap` of `OnceCell` slots, so concurrent identical requests share a
//! single chain walk.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use fob_graph::scan::scan_imports;
use fob_graph::{Dependency, Module, ModuleGraph, ModuleId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tokio::task::JoinSet;

use crate::hooks::{LoaderChain, Resolution, ResolveArgs, ResolverChain};
use crate::{Error, Result};

/// Counters collected while building the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Distinct module identities in the graph.
    pub modules: usize,
    /// Resolve requests issued, memoized or not.
    pub resolve_requests: usize,
    /// Resolver chain walks actually performed.
    pub resolves: usize,
    /// Loader chain walks performed.
    pub loads: usize,
}

impl BuildStats {
    /// Resolve requests answered from the memo.
    pub fn cache_hits(&self) -> usize {
        self.resolve_requests.saturating_sub(self.resolves)
    }
}

/// Memo key: identical keys share one resolution regardless of import kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolveKey {
    specifier: String,
    namespace: String,
    resolve_dir: Option<PathBuf>,
}

impl ResolveKey {
    fn new(args: &ResolveArgs) -> Self {
        Self {
            specifier: args.path.clone(),
            namespace: args.namespace.clone(),
            resolve_dir: args.resolve_dir.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    resolve_requests: AtomicUsize,
    resolves: AtomicUsize,
    loads: AtomicUsize,
}

/// Shared state of one graph build.
#[derive(Debug)]
pub(crate) struct GraphBuilder {
    resolver: ResolverChain,
    loader: LoaderChain,
    resolved: DashMap<ResolveKey, Arc<OnceCell<Resolution>>>,
    counters: Counters,
    graph: ModuleGraph,
    /// When false, entries are loaded but their imports are not followed.
    follow_imports: bool,
    max_modules: usize,
}

impl GraphBuilder {
    pub(crate) fn new(
        resolver: ResolverChain,
        loader: LoaderChain,
        follow_imports: bool,
        max_modules: usize,
    ) -> Self {
        Self {
            resolver,
            loader,
            resolved: DashMap::new(),
            counters: Counters::default(),
            graph: ModuleGraph::new(),
            follow_imports,
            max_modules,
        }
    }

    /// Build the graph reachable from `entries`, resolved against `cwd`.
    pub(crate) async fn build(
        self: Arc<Self>,
        entries: &[String],
        cwd: PathBuf,
    ) -> Result<(ModuleGraph, Vec<ModuleId>, BuildStats)> {
        let mut claimed: FxHashSet<ModuleId> = FxHashSet::default();
        let mut tasks: JoinSet<Result<Vec<Resolution>>> = JoinSet::new();
        let mut entry_ids = Vec::with_capacity(entries.len());

        for entry in entries {
            let resolution = self.resolve(ResolveArgs::entry(entry.as_str(), cwd.clone())).await?;
            entry_ids.push(resolution.id.clone());
            self.claim(&mut claimed, &mut tasks, resolution)?;
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(err) => Err(Error::Task(err.to_string())),
            };

            match outcome {
                Ok(children) => {
                    for child in children {
                        if let Err(err) = self.claim(&mut claimed, &mut tasks, child) {
                            tasks.abort_all();
                            return Err(err);
                        }
                    }
                }
                Err(err) => {
                    tasks.abort_all();
                    return Err(err);
                }
            }
        }

        self.graph.set_entry_points(entry_ids)?;

        let stats = BuildStats {
            modules: self.graph.len(),
            resolve_requests: self.counters.resolve_requests.load(Ordering::Relaxed),
            resolves: self.counters.resolves.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
        };
        Ok((self.graph.clone(), self.graph.entry_points(), stats))
    }

    /// Spawn a task for `resolution` unless its identity is already claimed.
    fn claim(
        self: &Arc<Self>,
        claimed: &mut FxHashSet<ModuleId>,
        tasks: &mut JoinSet<Result<Vec<Resolution>>>,
        resolution: Resolution,
    ) -> Result<()> {
        if claimed.contains(&resolution.id) {
            return Ok(());
        }
        if claimed.len() >= self.max_modules {
            return Err(Error::TooManyModules {
                max: self.max_modules,
            });
        }

        claimed.insert(resolution.id.clone());
        let builder = Arc::clone(self);
        tasks.spawn(async move { builder.process(resolution).await });
        Ok(())
    }

    /// Resolve through the memo. Concurrent identical requests wait on the
    /// same slot.
    async fn resolve(&self, args: ResolveArgs) -> Result<Resolution> {
        self.counters.resolve_requests.fetch_add(1, Ordering::Relaxed);

        let slot = Arc::clone(self.resolved.entry(ResolveKey::new(&args)).or_default().value());
        let resolution = slot
            .get_or_try_init(|| async {
                self.counters.resolves.fetch_add(1, Ordering::Relaxed);
                self.resolver.resolve(args).await
            })
            .await?;

        Ok(resolution.clone())
    }

    /// Load, scan and resolve one module, then insert it into the graph.
    async fn process(&self, resolution: Resolution) -> Result<Vec<Resolution>> {
        let id = resolution.id;

        if resolution.external {
            tracing::debug!(module = %id, "external module");
            let mut module = Module::external(id);
            module.plugin_data = resolution.plugin_data;
            self.graph.add_module(module)?;
            return Ok(Vec::new());
        }

        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        let loaded = self.loader.load(&id, resolution.plugin_data.clone()).await?;

        let records = if self.follow_imports {
            scan_imports(&loaded.contents, loaded.kind, id.path()).map_err(|err| Error::Load {
                id: id.clone(),
                message: err.to_string(),
            })?
        } else {
            Vec::new()
        };

        let mut dependencies = Vec::with_capacity(records.len());
        let mut children = Vec::with_capacity(records.len());
        for record in records {
            let child = self
                .resolve(ResolveArgs {
                    path: record.specifier.clone(),
                    importer: Some(id.clone()),
                    namespace: id.namespace().to_string(),
                    resolve_dir: loaded.resolve_dir.clone(),
                    kind: record.kind,
                    plugin_data: loaded.plugin_data.clone(),
                })
                .await?;

            dependencies.push(Dependency {
                specifier: record.specifier,
                kind: record.kind,
                resolved: child.id.clone(),
            });
            children.push(child);
        }

        tracing::trace!(module = %id, dependencies = dependencies.len(), "module processed");

        let module = Module::builder(id, loaded.kind)
            .contents(loaded.contents)
            .dependencies(dependencies)
            .loaded_by(loaded.loaded_by)
            .plugin_data(loaded.plugin_data.or(resolution.plugin_data))
            .build();
        self.graph.add_module(module)?;

        Ok(children)
    }
}

//! Build API: options, the graph builder and its result.
//!
//! # Examples
//!
//! ```no_run
//! use fob_build::{BuildOptions, ContentKind, HookOptions, LoadOutcome};
//!
//! # async fn example() -> fob_build::Result<()> {
//! let result = BuildOptions::new("./src/index.js")
//!     .plugin(|build| {
//!         build.set_name("custom-text")?;
//!         build.add_loader(HookOptions::new(r"\.custom$"), |_| async {
//!             Ok(LoadOutcome::with_kind("this is custom", ContentKind::Text))
//!         })?;
//!         Ok(())
//!     })
//!     .build()
//!     .await?;
//!
//! println!("{} modules", result.stats.modules);
//! # Ok(())
//! # }
//! ```

pub(crate) mod graph_builder;
mod options;
mod output;

use std::sync::Arc;

use fob_graph::{NativeRuntime, Runtime};

use crate::Result;
use crate::fallback::{FsLoader, FsResolver};
use crate::hooks::{LoaderChain, ResolverChain};
use crate::plugins::PluginRegistry;
use graph_builder::GraphBuilder;

pub use graph_builder::BuildStats;
pub use options::BuildOptions;
pub use output::{BuildResult, OutputSettings};

/// Execute a build with the given options.
///
/// Plugins are set up in order, entries are resolved from `cwd`, and every
/// reachable module is resolved and loaded once. The first error from any
/// resolver, loader or plugin aborts the whole build.
pub async fn build(options: BuildOptions) -> Result<BuildResult> {
    options.validate()?;

    let registry = Arc::new(PluginRegistry::from_setups(&options.plugins)?);

    let runtime: Arc<dyn Runtime> = match options.runtime {
        Some(runtime) => runtime,
        None => Arc::new(NativeRuntime),
    };
    let cwd = match options.cwd {
        Some(cwd) => cwd,
        None => runtime.get_cwd()?,
    };

    tracing::info!(
        entries = options.entries.len(),
        plugins = registry.len(),
        bundle = options.bundle,
        "starting build"
    );

    let resolver = ResolverChain::new(
        Arc::clone(&registry),
        Arc::new(FsResolver::new(Arc::clone(&runtime), options.external)),
    );
    let loader = LoaderChain::new(
        Arc::clone(&registry),
        Arc::new(FsLoader::new(runtime, options.loaders)),
    );

    let builder = Arc::new(GraphBuilder::new(
        resolver,
        loader,
        options.bundle,
        options.max_modules,
    ));
    let (graph, entry_points, stats) = builder.build(&options.entries, cwd).await?;

    tracing::info!(
        modules = stats.modules,
        resolves = stats.resolves,
        loads = stats.loads,
        "build finished"
    );

    Ok(BuildResult {
        graph,
        entry_points,
        output: OutputSettings {
            bundle: options.bundle,
            outfile: options.outfile,
            outdir: options.outdir,
            format: options.format,
            platform: options.platform,
        },
        stats,
    })
}

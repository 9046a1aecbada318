use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use fob_config::{BuildSettings, DEFAULT_MAX_MODULES, OutputFormat, Platform};
use fob_graph::{ContentKind, Runtime};

use crate::plugins::{PluginBuild, PluginSetup};
use crate::{Error, Result};

/// Configuration options for a build operation.
///
/// Use the builder methods for ergonomic configuration, or
/// [`BuildOptions::from_settings`] to start from a `fob.toml`.
#[derive(Clone)]
pub struct BuildOptions {
    /// Entry specifiers, resolved from `cwd` through the plugin chain.
    pub entries: Vec<String>,

    /// Follow imports from the entries (default: true).
    ///
    /// With `false` only the entries themselves are resolved and loaded.
    pub bundle: bool,

    /// Output file path for single-entry builds.
    pub outfile: Option<PathBuf>,

    /// Output directory. Cannot be used with `outfile`.
    pub outdir: Option<PathBuf>,

    /// Output module format (default: ESM).
    pub format: OutputFormat,

    /// Target runtime platform (default: Browser).
    pub platform: Platform,

    /// Specifiers the default resolver marks external instead of failing.
    pub external: Vec<String>,

    /// Extra extension → content kind mappings for the default loader.
    pub loaders: BTreeMap<String, ContentKind>,

    /// Plugin setup callbacks, in registration order.
    pub plugins: Vec<PluginSetup>,

    /// Working directory entries resolve from (default: the runtime's cwd).
    pub cwd: Option<PathBuf>,

    /// Runtime for filesystem operations (default: `NativeRuntime`).
    pub runtime: Option<Arc<dyn Runtime>>,

    /// Upper bound on distinct module identities.
    pub max_modules: usize,
}

impl BuildOptions {
    /// Create options with a single entry point.
    ///
    /// ```
    /// use fob_build::BuildOptions;
    ///
    /// let options = BuildOptions::new("./src/index.js").bundle(false);
    /// assert_eq!(options.entries, vec!["./src/index.js"]);
    /// ```
    pub fn new(entry: impl Into<String>) -> Self {
        Self::new_multiple([entry])
    }

    /// Create options with multiple entry points.
    pub fn new_multiple<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            bundle: true,
            outfile: None,
            outdir: None,
            format: OutputFormat::Esm,
            platform: Platform::Browser,
            external: Vec::new(),
            loaders: BTreeMap::new(),
            plugins: Vec::new(),
            cwd: None,
            runtime: None,
            max_modules: DEFAULT_MAX_MODULES,
        }
    }

    /// Build options from layered file/env settings.
    ///
    /// Settings are validated first; loader names must be known content kinds.
    pub fn from_settings(settings: BuildSettings) -> Result<Self> {
        fob_config::validate(&settings)?;

        let mut loaders = BTreeMap::new();
        for (ext, kind) in settings.normalized_loaders() {
            let kind = ContentKind::from_str(&kind).map_err(|_| {
                Error::InvalidConfig(format!(
                    "unknown loader '{}' for extension '.{}' (expected one of: {})",
                    kind,
                    ext,
                    ContentKind::ALL.map(|k| k.as_str()).join(", ")
                ))
            })?;
            loaders.insert(ext, kind);
        }

        Ok(Self {
            entries: settings.entries,
            bundle: settings.bundle,
            outfile: settings.outfile,
            outdir: settings.outdir,
            format: settings.format,
            platform: settings.platform,
            external: settings.external,
            loaders,
            plugins: Vec::new(),
            cwd: settings.cwd,
            runtime: None,
            max_modules: settings.max_modules,
        })
    }

    /// Set whether to follow imports.
    pub fn bundle(mut self, enabled: bool) -> Self {
        self.bundle = enabled;
        self
    }

    /// Add specifiers that should stay external.
    pub fn external<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pkg in packages {
            let value = pkg.into();
            if !self.external.contains(&value) {
                self.external.push(value);
            }
        }
        self
    }

    /// Map a file extension to a content kind for the default loader.
    pub fn loader(mut self, extension: &str, kind: ContentKind) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        self.loaders.insert(ext, kind);
        self
    }

    /// Set the output directory.
    pub fn outdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outdir = Some(dir.into());
        self
    }

    /// Set the output file (single entry only).
    pub fn outfile(mut self, file: impl Into<PathBuf>) -> Self {
        self.outfile = Some(file.into());
        self
    }

    /// Set the target platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Append a plugin. Plugins are registered in the order they are added.
    pub fn plugin<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut PluginBuild) -> Result<()> + Send + Sync + 'static,
    {
        self.plugins.push(Arc::new(setup));
        self
    }

    /// Set the working directory entries resolve from.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set the runtime for filesystem operations.
    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Set the module limit.
    pub fn max_modules(mut self, max: usize) -> Self {
        self.max_modules = max;
        self
    }

    /// Validate the build options for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no entry is given, or an entry is empty
    /// - both `outdir` and `outfile` are set
    /// - `outfile` is used with multiple entries
    /// - `max_modules` is zero
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::InvalidConfig(
                "At least one entry point is required".into(),
            ));
        }

        if self.entries.iter().any(|entry| entry.trim().is_empty()) {
            return Err(Error::InvalidConfig("entry specifiers cannot be empty".into()));
        }

        if self.outdir.is_some() && self.outfile.is_some() {
            return Err(Error::InvalidConfig(
                "outdir and outfile cannot both be specified".into(),
            ));
        }

        if self.outfile.is_some() && self.entries.len() > 1 {
            return Err(Error::InvalidConfig(
                "outfile can only be used with a single entry point".into(),
            ));
        }

        if self.max_modules == 0 {
            return Err(Error::InvalidConfig(
                "max_modules must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Execute the build with these options.
    ///
    /// This is a convenience method that calls `build(self)`.
    pub async fn build(self) -> Result<super::BuildResult> {
        super::build(self).await
    }
}

impl std::fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOptions")
            .field("entries", &self.entries)
            .field("bundle", &self.bundle)
            .field("outfile", &self.outfile)
            .field("outdir", &self.outdir)
            .field("format", &self.format)
            .field("platform", &self.platform)
            .field("external", &self.external)
            .field("loaders", &self.loaders)
            .field("plugins", &self.plugins.len())
            .field("cwd", &self.cwd)
            .field("runtime", &self.runtime)
            .field("max_modules", &self.max_modules)
            .finish()
    }
}

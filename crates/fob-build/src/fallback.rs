//! Default resolver and loader.
//!
//! These run after every plugin handler declined a request. Both go through
//! the [`Runtime`] trait, so builds work the same on disk and in memory.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fob_graph::{ContentKind, ModuleId, Runtime, RuntimeError};
use path_clean::PathClean;

use crate::hooks::{LoadedContent, ResolveArgs, ResolvedPath};
use crate::{Error, Result};

/// Extensions tried, in order, for extensionless specifiers.
pub const RESOLVE_EXTENSIONS: [&str; 8] = ["tsx", "ts", "jsx", "js", "mjs", "cjs", "css", "json"];

/// Resolver consulted when no plugin resolver matched.
///
/// `Ok(None)` means the specifier is unresolvable; the chain turns that into
/// an unresolved-import error.
#[async_trait]
pub trait DefaultResolver: Send + Sync + Debug {
    async fn resolve(&self, args: &ResolveArgs) -> Result<Option<ResolvedPath>>;
}

/// Loader consulted when no plugin loader matched.
///
/// `Ok(None)` means the contents are not recognized.
#[async_trait]
pub trait DefaultLoader: Send + Sync + Debug {
    async fn load(&self, id: &ModuleId) -> Result<Option<LoadedContent>>;
}

/// Check if a specifier is explicitly marked as external.
///
/// `react` marks both `react` and `react/jsx-runtime`.
pub fn is_external(specifier: &str, external: &[String]) -> bool {
    external.iter().any(|ext| {
        specifier == ext
            || specifier
                .strip_prefix(ext.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Filesystem resolver for relative and absolute specifiers.
///
/// Bare specifiers are only resolvable when listed as external.
#[derive(Debug, Clone)]
pub struct FsResolver {
    runtime: Arc<dyn Runtime>,
    external: Vec<String>,
}

impl FsResolver {
    pub fn new(runtime: Arc<dyn Runtime>, external: Vec<String>) -> Self {
        Self { runtime, external }
    }

    /// Try `candidate` as a file, then with each extension appended, then as
    /// a directory containing an `index` file.
    fn probe(&self, candidate: &Path) -> Option<PathBuf> {
        if self.runtime.is_file(candidate) {
            return Some(candidate.to_path_buf());
        }

        let file_name = candidate.file_name()?.to_string_lossy().into_owned();
        for ext in RESOLVE_EXTENSIONS {
            let with_ext = candidate.with_file_name(format!("{}.{}", file_name, ext));
            if self.runtime.is_file(&with_ext) {
                return Some(with_ext);
            }
        }

        if self.runtime.exists(candidate) {
            for ext in RESOLVE_EXTENSIONS {
                let index = candidate.join(format!("index.{}", ext));
                if self.runtime.is_file(&index) {
                    return Some(index);
                }
            }
        }

        None
    }
}

#[async_trait]
impl DefaultResolver for FsResolver {
    async fn resolve(&self, args: &ResolveArgs) -> Result<Option<ResolvedPath>> {
        if is_external(&args.path, &self.external) {
            return Ok(Some(ResolvedPath::new(args.path.clone()).external()));
        }

        let specifier = Path::new(&args.path);
        let candidate = if specifier.is_absolute() {
            specifier.clean()
        } else if is_relative(&args.path) {
            let Some(dir) = &args.resolve_dir else {
                tracing::trace!(specifier = %args.path, "no resolve dir for relative specifier");
                return Ok(None);
            };
            dir.join(specifier).clean()
        } else {
            return Ok(None);
        };

        Ok(self
            .probe(&candidate)
            .map(|path| ResolvedPath::new(path.to_string_lossy().into_owned())))
    }
}

/// Filesystem loader for `file`-namespace modules.
///
/// The content kind comes from the user's extension map first, then from
/// [`ContentKind::from_extension`].
#[derive(Debug, Clone)]
pub struct FsLoader {
    runtime: Arc<dyn Runtime>,
    loaders: BTreeMap<String, ContentKind>,
}

impl FsLoader {
    /// `loaders` maps extensions (without the dot) to content kinds.
    pub fn new(runtime: Arc<dyn Runtime>, loaders: BTreeMap<String, ContentKind>) -> Self {
        Self { runtime, loaders }
    }

    fn kind_for(&self, id: &ModuleId) -> Option<ContentKind> {
        let ext = id.extension()?;
        self.loaders
            .get(&ext)
            .copied()
            .or_else(|| ContentKind::from_extension(&ext))
    }
}

#[async_trait]
impl DefaultLoader for FsLoader {
    async fn load(&self, id: &ModuleId) -> Result<Option<LoadedContent>> {
        if !id.is_file() {
            return Ok(None);
        }
        let Some(kind) = self.kind_for(id) else {
            return Ok(None);
        };

        let contents = self
            .runtime
            .read_to_string(id.as_path())
            .await
            .map_err(|err| match err {
                RuntimeError::FileNotFound(_) => Error::Load {
                    id: id.clone(),
                    message: "file does not exist".to_string(),
                },
                other => Error::Runtime(other),
            })?;

        let mut content = LoadedContent::new(contents).kind(kind);
        if let Some(parent) = id.as_path().parent() {
            content = content.resolve_dir(parent);
        }
        Ok(Some(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fob_graph::{ImportKind, TestRuntime};

    fn runtime() -> Arc<dyn Runtime> {
        Arc::new(
            TestRuntime::new("/project")
                .with_file("/project/src/index.js", "import './util'")
                .with_file("/project/src/util.ts", "export default 1")
                .with_file("/project/src/components/index.tsx", "export default 2")
                .with_file("/project/src/data.json", "{}")
                .with_file("/project/src/readme.md", "# hi"),
        )
    }

    fn args(specifier: &str, dir: Option<&str>) -> ResolveArgs {
        ResolveArgs {
            path: specifier.to_string(),
            importer: None,
            namespace: "file".to_string(),
            resolve_dir: dir.map(PathBuf::from),
            kind: ImportKind::Static,
            plugin_data: None,
        }
    }

    #[test]
    fn test_is_external() {
        let external = vec!["react".to_string()];
        assert!(is_external("react", &external));
        assert!(is_external("react/jsx-runtime", &external));
        assert!(!is_external("react-dom", &external));
    }

    #[tokio::test]
    async fn test_resolves_relative_with_extension_probe() {
        let resolver = FsResolver::new(runtime(), Vec::new());
        let resolved = resolver
            .resolve(&args("./util", Some("/project/src")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.path, "/project/src/util.ts");
        assert!(resolved.namespace.is_none());
    }

    #[tokio::test]
    async fn test_resolves_directory_index() {
        let resolver = FsResolver::new(runtime(), Vec::new());
        let resolved = resolver
            .resolve(&args("../src/./components", Some("/project/src")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.path, "/project/src/components/index.tsx");
    }

    #[tokio::test]
    async fn test_bare_and_dirless_specifiers_are_unresolvable() {
        let resolver = FsResolver::new(runtime(), Vec::new());
        assert!(resolver.resolve(&args("lodash", Some("/project"))).await.unwrap().is_none());
        assert!(resolver.resolve(&args("./util", None)).await.unwrap().is_none());
        assert!(resolver.resolve(&args("./missing", Some("/project/src"))).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_external_list_wins() {
        let resolver = FsResolver::new(runtime(), vec!["lodash".to_string()]);
        let resolved = resolver
            .resolve(&args("lodash/fp", Some("/project")))
            .await
            .unwrap()
            .unwrap();
        assert!(resolved.external);
        assert_eq!(resolved.path, "lodash/fp");
    }

    #[tokio::test]
    async fn test_loader_picks_kind_and_resolve_dir() {
        let loader = FsLoader::new(runtime(), BTreeMap::new());
        let loaded = loader
            .load(&ModuleId::file("/project/src/util.ts").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.kind, Some(ContentKind::Ts));
        assert_eq!(loaded.resolve_dir, Some(PathBuf::from("/project/src")));
        assert_eq!(loaded.contents, "export default 1");
    }

    #[tokio::test]
    async fn test_loader_extension_map_overrides() {
        let mut loaders = BTreeMap::new();
        loaders.insert("md".to_string(), ContentKind::Text);
        let loader = FsLoader::new(runtime(), loaders);
        let loaded = loader
            .load(&ModuleId::file("/project/src/readme.md").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.kind, Some(ContentKind::Text));
    }

    #[tokio::test]
    async fn test_loader_declines_unknown_and_foreign_namespaces() {
        let loader = FsLoader::new(runtime(), BTreeMap::new());
        let md = ModuleId::file("/project/src/readme.md").unwrap();
        assert!(loader.load(&md).await.unwrap().is_none());

        let virtual_id = ModuleId::new("/project/src/util.ts", "virtual").unwrap();
        assert!(loader.load(&virtual_id).await.unwrap().is_none());
    }
}

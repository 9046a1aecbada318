use serde::{Deserialize, Serialize};

use super::ModuleId;

/// How a specifier was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// Build entry point.
    EntryPoint,
    /// `import x from "..."` or side-effect `import "..."`.
    Static,
    /// `import("...")` with a literal argument.
    Dynamic,
    /// `require("...")` with a literal argument.
    Require,
    /// `export { x } from "..."` / `export * from "..."`.
    ReExport,
    /// CSS `@import`.
    CssImport,
}

/// An import specifier discovered in a module's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub specifier: String,
    pub kind: ImportKind,
}

impl ImportRecord {
    pub fn new(specifier: impl Into<String>, kind: ImportKind) -> Self {
        Self {
            specifier: specifier.into(),
            kind,
        }
    }
}

/// Edge from a module to the identity one of its specifiers resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub specifier: String,
    pub kind: ImportKind,
    pub resolved: ModuleId,
}

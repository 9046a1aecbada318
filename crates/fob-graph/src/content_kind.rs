//! Content kinds: how loaded module contents are interpreted downstream.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the contents of a loaded module are parsed.
///
/// Mirrors the loader names a plugin may return from a load hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// JavaScript (ESM or CommonJS). Used when a loader omits the kind.
    #[default]
    Js,
    Jsx,
    Ts,
    Tsx,
    /// JSON document; its value is the module's default export.
    Json,
    Css,
    /// Plain text; the string itself is the module's default export.
    Text,
    Base64,
    #[serde(rename = "dataurl")]
    DataUrl,
    Binary,
    /// Copied asset; the module exports its path.
    File,
}

impl ContentKind {
    pub const ALL: [ContentKind; 11] = [
        ContentKind::Js,
        ContentKind::Jsx,
        ContentKind::Ts,
        ContentKind::Tsx,
        ContentKind::Json,
        ContentKind::Css,
        ContentKind::Text,
        ContentKind::Base64,
        ContentKind::DataUrl,
        ContentKind::Binary,
        ContentKind::File,
    ];

    /// Default kind for a file extension (without the dot).
    ///
    /// Returns `None` for extensions no built-in loader understands.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::Js),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::Ts),
            "tsx" => Some(Self::Tsx),
            "json" => Some(Self::Json),
            "css" => Some(Self::Css),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    /// Whether contents of this kind are scripts that can import other modules.
    pub fn is_script(&self) -> bool {
        matches!(self, Self::Js | Self::Jsx | Self::Ts | Self::Tsx)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Jsx => "jsx",
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Json => "json",
            Self::Css => "css",
            Self::Text => "text",
            Self::Base64 => "base64",
            Self::DataUrl => "dataurl",
            Self::Binary => "binary",
            Self::File => "file",
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid content kind: {}", s))
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Handler filters: which requests a resolver or loader applies to.

use regex::Regex;

/// Options a handler is registered with.
///
/// `filter` is a regular expression matched against the specifier (resolvers)
/// or the module path (loaders).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOptions {
    pub filter: String,
    pub namespace: Option<String>,
}

impl HookOptions {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            namespace: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Compiled form of [`HookOptions`].
#[derive(Debug, Clone)]
pub struct Filter {
    pattern: Regex,
    namespace: Option<String>,
}

impl Filter {
    pub(crate) fn compile(options: &HookOptions) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&options.filter)?,
            namespace: options.namespace.clone(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether the handler applies to `path` in `namespace`.
    ///
    /// An absent namespace constraint becomes `default_namespace`; when that is
    /// `None` too, every namespace matches. Resolvers pass `None`, loaders pass
    /// the `file` namespace.
    pub fn matches(&self, path: &str, namespace: &str, default_namespace: Option<&str>) -> bool {
        let namespace_ok = match self.namespace.as_deref().or(default_namespace) {
            Some(required) => required == namespace,
            None => true,
        };
        namespace_ok && self.pattern.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fob_graph::FILE_NAMESPACE;

    fn filter(pattern: &str, namespace: Option<&str>) -> Filter {
        let mut options = HookOptions::new(pattern);
        if let Some(ns) = namespace {
            options = options.namespace(ns);
        }
        Filter::compile(&options).unwrap()
    }

    #[test]
    fn test_resolver_without_namespace_matches_any_namespace() {
        let f = filter(r"^fib\((\d+)\)$", None);
        assert!(f.matches("fib(10)", "file", None));
        assert!(f.matches("fib(10)", "fib", None));
        assert!(!f.matches("fib(10) extra", "fib", None));
    }

    #[test]
    fn test_loader_without_namespace_defaults_to_file() {
        let f = filter("^.*$", None);
        assert!(f.matches("/src/nested.js", "file", Some(FILE_NAMESPACE)));
        assert!(!f.matches("fib(3)", "fib", Some(FILE_NAMESPACE)));
    }

    #[test]
    fn test_explicit_namespace_must_equal() {
        let f = filter("^.*$", Some("ignore-me"));
        assert!(!f.matches("/src/nested.js", "file", Some(FILE_NAMESPACE)));
        assert!(!f.matches("/src/nested.js", "file", None));
        assert!(f.matches("anything", "ignore-me", None));
    }

    #[test]
    fn test_unanchored_pattern_matches_prefix() {
        let f = filter(r"^fib\((\d+)\)", Some("fib"));
        assert!(f.matches("fib(3) fib(4) fib(5)", "fib", Some(FILE_NAMESPACE)));
    }

    #[test]
    fn test_malformed_pattern_fails_to_compile() {
        assert!(Filter::compile(&HookOptions::new("(unclosed")).is_err());
    }
}

//! Shared test utilities for fob-build tests
//!
//! In-memory runtimes, and a tiny evaluator that computes the default export
//! of a module from the built graph. The evaluator understands just enough:
//! `import name from "spec"` bindings and `export default a + "b" + 1`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use fob_build::{BuildOptions, BuildResult, ContentKind, Module, ModuleId};
use fob_graph::TestRuntime;
use regex::Regex;
use serde_json::Value;

pub const CWD: &str = "/app";

static IMPORT_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+(\w+)\s+from\s+['"]([^'"]+)['"]"#).unwrap()
});

static DEFAULT_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s+default\s+([^;\n]+)").unwrap());

/// In-memory runtime rooted at [`CWD`] holding `files` (path, contents).
pub fn runtime(files: &[(&str, &str)]) -> Arc<TestRuntime> {
    let runtime = TestRuntime::new(CWD);
    for (path, contents) in files {
        runtime.add_file(path, *contents);
    }
    Arc::new(runtime)
}

/// Options for `entry` against an in-memory runtime with `files`.
pub fn options(entry: &str, files: &[(&str, &str)]) -> BuildOptions {
    BuildOptions::new(entry).cwd(CWD).runtime(runtime(files))
}

pub fn file_id(path: &str) -> ModuleId {
    ModuleId::file(path).unwrap()
}

/// Default export of the first entry point.
pub fn entry_value(result: &BuildResult) -> Value {
    let entry = result.entry_points().first().expect("build has an entry").clone();
    module_value(result, &entry)
}

/// Default export of `id`.
pub fn module_value(result: &BuildResult, id: &ModuleId) -> Value {
    Evaluator::new(result).value(id)
}

struct Evaluator<'a> {
    result: &'a BuildResult,
    memo: HashMap<ModuleId, Value>,
}

impl<'a> Evaluator<'a> {
    fn new(result: &'a BuildResult) -> Self {
        Self {
            result,
            memo: HashMap::new(),
        }
    }

    fn value(&mut self, id: &ModuleId) -> Value {
        if let Some(value) = self.memo.get(id) {
            return value.clone();
        }

        let module = self
            .result
            .module(id)
            .unwrap_or_else(|| panic!("{} is not in the graph", id));
        let value = self.evaluate(&module);
        self.memo.insert(id.clone(), value.clone());
        value
    }

    fn evaluate(&mut self, module: &Module) -> Value {
        if module.is_external {
            return Value::Null;
        }

        match module.kind {
            ContentKind::Text => Value::String(module.contents.to_string()),
            ContentKind::Json => serde_json::from_str(&module.contents).unwrap(),
            kind if kind.is_script() => self.evaluate_script(module),
            other => panic!("cannot evaluate {} content", other),
        }
    }

    fn evaluate_script(&mut self, module: &Module) -> Value {
        let mut bindings = HashMap::new();
        for caps in IMPORT_BINDING.captures_iter(&module.contents) {
            let dependency = module
                .dependency(&caps[2])
                .unwrap_or_else(|| panic!("{} has no dependency {}", module.id, &caps[2]));
            let resolved = dependency.resolved.clone();
            bindings.insert(caps[1].to_string(), self.value(&resolved));
        }

        let Some(caps) = DEFAULT_EXPORT.captures(&module.contents) else {
            return Value::Null;
        };

        caps[1]
            .split('+')
            .map(|term| term_value(term.trim(), &bindings))
            .reduce(add)
            .unwrap_or(Value::Null)
    }
}

fn term_value(term: &str, bindings: &HashMap<String, Value>) -> Value {
    let quoted = term.len() >= 2
        && ((term.starts_with('"') && term.ends_with('"'))
            || (term.starts_with('\'') && term.ends_with('\'')));
    if quoted {
        return Value::String(term[1..term.len() - 1].to_string());
    }
    if let Ok(n) = term.parse::<f64>() {
        return number(n);
    }
    bindings
        .get(term)
        .cloned()
        .unwrap_or_else(|| panic!("unbound identifier {}", term))
}

/// JavaScript `+`: numeric addition, otherwise string concatenation.
fn add(left: Value, right: Value) -> Value {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => number(a + b),
        _ => Value::String(format!("{}{}", display(&left), display(&right))),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

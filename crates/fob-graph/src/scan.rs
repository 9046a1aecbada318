//! Import specifier discovery.
//!
//! Scripts are parsed with Oxc and walked for static imports, re-exports,
//! literal dynamic imports and literal `require()` calls. CSS is scanned for
//! `@import` rules. Other content kinds never import anything.

use std::sync::LazyLock;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, CallExpression, ExportAllDeclaration, ExportNamedDeclaration, Expression,
    ImportDeclaration, ImportExpression,
};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use rustc_hash::FxHashSet;

use super::{ContentKind, ImportKind, ImportRecord};

static CSS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?["']([^"']+)["']"#).expect("valid css import regex")
});

/// Error produced while scanning a module for imports.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to parse '{filename}': {message}")]
    Parse { filename: String, message: String },
}

/// Discover the import specifiers of a module, in source order.
///
/// A specifier that appears several times is reported once, with the kind of
/// its first occurrence.
pub fn scan_imports(
    contents: &str,
    kind: ContentKind,
    filename: &str,
) -> Result<Vec<ImportRecord>, ScanError> {
    let records = match kind {
        ContentKind::Js | ContentKind::Jsx | ContentKind::Ts | ContentKind::Tsx => {
            scan_script(contents, kind, filename)?
        }
        ContentKind::Css => scan_css(contents),
        _ => Vec::new(),
    };

    let mut seen = FxHashSet::default();
    Ok(records
        .into_iter()
        .filter(|record| seen.insert(record.specifier.clone()))
        .collect())
}

fn source_type(kind: ContentKind) -> SourceType {
    match kind {
        ContentKind::Jsx => SourceType::jsx(),
        ContentKind::Ts => SourceType::ts(),
        ContentKind::Tsx => SourceType::tsx(),
        _ => SourceType::mjs(),
    }
}

fn scan_script(
    contents: &str,
    kind: ContentKind,
    filename: &str,
) -> Result<Vec<ImportRecord>, ScanError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, contents, source_type(kind)).parse();

    if !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .iter()
            .map(|e| format!("{:?}", e))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ScanError::Parse {
            filename: filename.to_string(),
            message,
        });
    }

    let mut collector = SpecifierCollector::default();
    walk::walk_program(&mut collector, &parsed.program);
    Ok(collector.records)
}

fn scan_css(contents: &str) -> Vec<ImportRecord> {
    CSS_IMPORT
        .captures_iter(contents)
        .map(|caps| ImportRecord::new(&caps[1], ImportKind::CssImport))
        .collect()
}

#[derive(Default)]
struct SpecifierCollector {
    records: Vec<ImportRecord>,
}

impl SpecifierCollector {
    fn push(&mut self, specifier: &str, kind: ImportKind) {
        self.records.push(ImportRecord::new(specifier, kind));
    }
}

impl<'a> Visit<'a> for SpecifierCollector {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        // Type-only imports are erased before bundling
        if decl.import_kind.is_type() {
            return;
        }
        self.push(decl.source.value.as_str(), ImportKind::Static);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &decl.source {
            if !decl.export_kind.is_type() {
                self.push(source.value.as_str(), ImportKind::ReExport);
            }
        }
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.push(decl.source.value.as_str(), ImportKind::ReExport);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Expression::StringLiteral(lit) = &expr.source {
            self.push(lit.value.as_str(), ImportKind::Dynamic);
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(ident) = &call.callee {
            if ident.name.as_str() == "require" && call.arguments.len() == 1 {
                if let Some(Argument::StringLiteral(lit)) = call.arguments.first() {
                    self.push(lit.value.as_str(), ImportKind::Require);
                }
            }
        }
        walk::walk_call_expression(self, call);
    }
}

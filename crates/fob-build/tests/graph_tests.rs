//! Module graph shape tests
//!
//! Externals, `bundle: false`, limits, import kinds and config-driven builds.

mod helpers;

use std::sync::Arc;

use fob_build::{
    BuildOptions, ContentKind, Error, HookOptions, ImportKind, NativeRuntime, OutputFormat,
    ResolveOutcome, ResolvedPath,
};
use fob_config::ConfigDiscovery;
use helpers::*;
use serde_json::json;

#[tokio::test]
async fn test_external_specifiers_are_not_loaded() {
    let result = options(
        "./in.js",
        &[("/app/in.js", "import React from 'react'\nimport jsx from 'react/jsx-runtime'")],
    )
    .external(["react"])
    .build()
    .await
    .unwrap();

    let react = result.module(&file_id("react")).unwrap();
    assert!(react.is_external);
    assert!(react.contents.is_empty());
    assert!(result.module(&file_id("react/jsx-runtime")).unwrap().is_external);

    assert_eq!(result.stats.loads, 1);
    assert_eq!(result.stats.modules, 3);
    assert_eq!(result.graph.statistics().external_count, 2);
}

#[tokio::test]
async fn test_plugin_can_mark_external() {
    let result = options("./in.js", &[("/app/in.js", "import fs from 'node:fs'")])
        .plugin(|build| {
            build.set_name("node-builtins")?;
            build.add_resolver(HookOptions::new("^node:"), |args| async move {
                Ok(ResolveOutcome::from(
                    ResolvedPath::new(args.path).namespace("node").external(),
                ))
            })?;
            Ok(())
        })
        .build()
        .await
        .unwrap();

    let id = fob_build::ModuleId::new("node:fs", "node").unwrap();
    assert!(result.module(&id).unwrap().is_external);
    assert_eq!(result.stats.loads, 1);
}

#[tokio::test]
async fn test_bundle_false_does_not_follow_imports() {
    let result = options(
        "./in.js",
        &[
            ("/app/in.js", "import dep from './dep.js'\nexport default dep"),
            ("/app/dep.js", "export default 1"),
        ],
    )
    .bundle(false)
    .build()
    .await
    .unwrap();

    assert_eq!(result.stats.modules, 1);
    assert_eq!(result.stats.resolve_requests, 1);
    assert!(result.entry_module().unwrap().dependencies.is_empty());
    assert!(!result.output.bundle);
}

#[tokio::test]
async fn test_max_modules() {
    let err = options(
        "./in.js",
        &[
            ("/app/in.js", "import './a.js'\nimport './b.js'"),
            ("/app/a.js", ""),
            ("/app/b.js", ""),
        ],
    )
    .max_modules(2)
    .build()
    .await
    .unwrap_err();

    assert!(matches!(err, Error::TooManyModules { max: 2 }));
}

#[tokio::test]
async fn test_multiple_entries_keep_declaration_order() {
    let files = [
        ("/app/b.js", "import s from './shared.js'\nexport default s"),
        ("/app/a.js", "import s from './shared.js'\nexport default s"),
        ("/app/shared.js", "export default 'shared'"),
    ];
    let result = BuildOptions::new_multiple(["./b.js", "./a.js", "./b.js"])
        .cwd(CWD)
        .runtime(runtime(&files))
        .build()
        .await
        .unwrap();

    assert_eq!(
        result.entry_points(),
        &[file_id("/app/b.js"), file_id("/app/a.js")]
    );
    assert!(result.module(&file_id("/app/a.js")).unwrap().is_entry);
    assert!(!result.module(&file_id("/app/shared.js")).unwrap().is_entry);
    assert_eq!(result.stats.loads, 3);
}

#[tokio::test]
async fn test_import_kinds_and_content_kinds() {
    let result = options(
        "./in.ts",
        &[
            (
                "/app/in.ts",
                "import type { T } from './types'\n\
                 import data from './data.json'\n\
                 export { helper } from './helper'\n\
                 const lazy = () => import('./lazy.js')\n\
                 const legacy = require('./legacy.cjs')\n\
                 export default data.answer",
            ),
            ("/app/data.json", r#"{ "answer": 42 }"#),
            ("/app/helper.tsx", "export const helper = 1"),
            ("/app/lazy.js", "export default 'lazy'"),
            ("/app/legacy.cjs", "module.exports = 1"),
            ("/app/style.css", "@import './base.css';"),
        ],
    )
    .build()
    .await
    .unwrap();

    let entry = result.entry_module().unwrap();
    assert_eq!(entry.kind, ContentKind::Ts);

    let kinds: Vec<(&str, ImportKind)> = entry
        .dependencies
        .iter()
        .map(|dep| (dep.specifier.as_str(), dep.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("./data.json", ImportKind::Static),
            ("./helper", ImportKind::ReExport),
            ("./lazy.js", ImportKind::Dynamic),
            ("./legacy.cjs", ImportKind::Require),
        ]
    );

    let data = file_id("/app/data.json");
    assert_eq!(result.module(&data).unwrap().kind, ContentKind::Json);
    assert_eq!(module_value(&result, &data), json!({ "answer": 42 }));
    assert_eq!(
        result.module(&file_id("/app/helper.tsx")).unwrap().kind,
        ContentKind::Tsx
    );
}

#[tokio::test]
async fn test_css_imports_are_followed() {
    let result = options(
        "./style.css",
        &[
            ("/app/style.css", "@import './base.css';\nbody { color: red }"),
            ("/app/base.css", "html { margin: 0 }"),
        ],
    )
    .build()
    .await
    .unwrap();

    let entry = result.entry_module().unwrap();
    assert_eq!(entry.kind, ContentKind::Css);
    assert_eq!(entry.dependencies[0].kind, ImportKind::CssImport);
    assert!(result.graph.contains(&file_id("/app/base.css")));
}

#[tokio::test]
async fn test_custom_extension_loader() {
    let result = options(
        "./in.js",
        &[
            ("/app/in.js", "import notes from './notes.md'\nexport default notes"),
            ("/app/notes.md", "# Notes"),
        ],
    )
    .loader(".md", ContentKind::Text)
    .build()
    .await
    .unwrap();

    assert_eq!(entry_value(&result), json!("# Notes"));
}

#[tokio::test]
async fn test_build_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("fob.toml"),
        r#"
entries = ["./main.js"]
format = "cjs"
external = ["lodash"]

[loaders]
".note" = "text"
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("main.js"),
        "import note from './todo.note'\nimport _ from 'lodash'\nexport default note",
    )
    .unwrap();
    std::fs::write(dir.path().join("todo.note"), "buy milk").unwrap();

    let settings = ConfigDiscovery::new(dir.path()).load().unwrap();
    let result = BuildOptions::from_settings(settings)
        .unwrap()
        .cwd(dir.path())
        .runtime(Arc::new(NativeRuntime))
        .build()
        .await
        .unwrap();

    assert_eq!(entry_value(&result), json!("buy milk"));
    assert_eq!(result.output.format, OutputFormat::Cjs);
    assert_eq!(result.stats.loads, 2);
}

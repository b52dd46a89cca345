//! TypeScript / JavaScript (ES modules and CommonJS).

use crate::ingest::extract::{scan, Pattern, ReferenceExtractor, Specifier};
use crate::models::graph::EdgeKind;

/// `import x from "..."`, `import { a, b } from "..."`, `import type ...`.
const IMPORT_FROM: &str =
    r#"\bimport\s+(?:type\s+)?[\w*{}\s,$]+?\s+from\s*['"]([^'"\n]+)['"]"#;
/// Side-effect import: `import "./styles.css"`.
const IMPORT_BARE: &str = r#"\bimport\s*['"]([^'"\n]+)['"]"#;
/// Re-export: `export * from "..."`, `export { a } from "..."`.
const EXPORT_FROM: &str =
    r#"\bexport\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"]([^'"\n]+)['"]"#;
/// Dynamic `import("...")`.
const DYNAMIC_IMPORT: &str = r#"\bimport\s*\(\s*['"`]([^'"`\n]+)['"`]\s*\)"#;
/// CommonJS `require("...")`.
const REQUIRE: &str = r#"\brequire\s*\(\s*['"`]([^'"`\n]+)['"`]\s*\)"#;

pub struct EcmaScriptExtractor {
    patterns: Vec<Pattern>,
}

impl Default for EcmaScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EcmaScriptExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Pattern::new(IMPORT_FROM, EdgeKind::Import),
                Pattern::new(IMPORT_BARE, EdgeKind::Import),
                Pattern::new(EXPORT_FROM, EdgeKind::Export),
                Pattern::new(DYNAMIC_IMPORT, EdgeKind::Require),
                Pattern::new(REQUIRE, EdgeKind::Require),
            ],
        }
    }
}

impl ReferenceExtractor for EcmaScriptExtractor {
    fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
        scan(source, &self.patterns)
            .into_iter()
            .map(|(_, spec)| spec)
            .collect()
    }
}

//! Ruby `require`, `require_relative` and `load`.

use crate::ingest::extract::{as_relative, scan, Pattern, ReferenceExtractor, Specifier};
use crate::models::graph::EdgeKind;

const REQUIRE: &str = r#"\brequire\s*\(?\s*['"]([^'"\n]+)['"]"#;
const LOAD: &str = r#"\bload\s*\(?\s*['"]([^'"\n]+)['"]"#;
const REQUIRE_RELATIVE: &str = r#"\brequire_relative\s*\(?\s*['"]([^'"\n]+)['"]"#;

pub struct RubyExtractor {
    patterns: Vec<Pattern>,
    relative: Pattern,
}

impl Default for RubyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RubyExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Pattern::new(REQUIRE, EdgeKind::Require),
                Pattern::new(LOAD, EdgeKind::Require),
            ],
            relative: Pattern::new(REQUIRE_RELATIVE, EdgeKind::Require),
        }
    }
}

impl ReferenceExtractor for RubyExtractor {
    fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
        let mut hits = scan(source, &self.patterns);
        for (offset, mut spec) in scan(source, std::slice::from_ref(&self.relative)) {
            spec.raw = as_relative(&spec.raw);
            hits.push((offset, spec));
        }
        hits.sort_by_key(|(offset, _)| *offset);
        hits.into_iter().map(|(_, spec)| spec).collect()
    }
}

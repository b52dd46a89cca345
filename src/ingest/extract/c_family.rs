//! C / C++ `#include`. Quoted includes are relative to the including file;
//! angle-bracket includes are system headers.

use crate::ingest::extract::{as_relative, scan, Pattern, ReferenceExtractor, Specifier};
use crate::models::graph::EdgeKind;

const QUOTED: &str = r#"(?m)^[ \t]*#[ \t]*include[ \t]*"([^"\n]+)""#;
const ANGLED: &str = r"(?m)^[ \t]*#[ \t]*include[ \t]*<([^>\n]+)>";

pub struct CFamilyExtractor {
    quoted: Pattern,
    angled: Pattern,
}

impl Default for CFamilyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CFamilyExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quoted: Pattern::new(QUOTED, EdgeKind::Import),
            angled: Pattern::new(ANGLED, EdgeKind::Import),
        }
    }
}

impl ReferenceExtractor for CFamilyExtractor {
    fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
        let mut hits = scan(source, std::slice::from_ref(&self.angled));
        for (offset, mut spec) in scan(source, std::slice::from_ref(&self.quoted)) {
            spec.raw = as_relative(&spec.raw);
            hits.push((offset, spec));
        }
        hits.sort_by_key(|(offset, _)| *offset);
        hits.into_iter().map(|(_, spec)| spec).collect()
    }
}

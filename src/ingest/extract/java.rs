//! Java `import` declarations. Package imports never carry a relative
//! marker, so they are always classified as external by the resolver.

use crate::ingest::extract::{scan, Pattern, ReferenceExtractor, Specifier};
use crate::models::graph::EdgeKind;

const IMPORT: &str = r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?([\w.]+(?:\.\*)?)[ \t]*;";

pub struct JavaExtractor {
    import: Pattern,
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            import: Pattern::new(IMPORT, EdgeKind::Import),
        }
    }
}

impl ReferenceExtractor for JavaExtractor {
    fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
        scan(source, std::slice::from_ref(&self.import))
            .into_iter()
            .map(|(_, spec)| spec)
            .collect()
    }
}

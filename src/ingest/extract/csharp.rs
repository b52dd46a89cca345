//! C# `using` directives (namespaces, always external).

use crate::ingest::extract::{scan, Pattern, ReferenceExtractor, Specifier};
use crate::models::graph::EdgeKind;

const USING: &str = r"(?m)^[ \t]*(?:global[ \t]+)?using[ \t]+(?:static[ \t]+)?(?:\w+[ \t]*=[ \t]*)?([\w.]+)[ \t]*;";

pub struct CSharpExtractor {
    using: Pattern,
}

impl Default for CSharpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CSharpExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            using: Pattern::new(USING, EdgeKind::Import),
        }
    }
}

impl ReferenceExtractor for CSharpExtractor {
    fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
        scan(source, std::slice::from_ref(&self.using))
            .into_iter()
            .map(|(_, spec)| spec)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn using_forms() {
        let source = "using System;\nglobal using System.Linq;\nusing Json = Newtonsoft.Json;\nusing (var x = Open()) { }\n";
        let raws: Vec<String> = CSharpExtractor::new()
            .extract(source, "Program.cs")
            .into_iter()
            .map(|s| s.raw)
            .collect();
        assert_eq!(raws, vec!["System", "System.Linq", "Newtonsoft.Json"]);
    }
}

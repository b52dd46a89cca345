//! Reference extraction: raw import/reference specifiers from file text.
//!
//! Extraction is pattern based, one extractor per language family. It does
//! not understand comments or string literals, so a commented-out import
//! still yields a specifier and unusual syntax may be missed. Callers rely on
//! that behaviour being stable; it is an approximation, not a parser.

pub mod c_family;
pub mod csharp;
pub mod ecmascript;
pub mod go;
pub mod java;
pub mod python;
pub mod ruby;
pub mod rust;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::ingest::language::detect_language;
use crate::models::graph::EdgeKind;

/// A raw reference found in a file, tagged with the syntax it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub raw: String,
    pub kind: EdgeKind,
}

impl Specifier {
    #[must_use]
    pub fn new(raw: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            raw: raw.into(),
            kind,
        }
    }
}

/// Capability: pull specifiers out of one language family's source text.
///
/// Implementations return matches in source order. Deduplication and URL
/// filtering happen in [`ExtractorRegistry::extract`].
pub trait ReferenceExtractor: Send + Sync {
    fn extract(&self, source: &str, path: &str) -> Vec<Specifier>;
}

/// A compiled pattern whose first capture group is the specifier.
pub(crate) struct Pattern {
    re: Regex,
    kind: EdgeKind,
}

impl Pattern {
    pub(crate) fn new(src: &str, kind: EdgeKind) -> Self {
        let re = Regex::new(src).expect("reference pattern must compile");
        Self { re, kind }
    }
}

/// Run every pattern and return `(offset, specifier)` pairs sorted by offset.
pub(crate) fn scan(source: &str, patterns: &[Pattern]) -> Vec<(usize, Specifier)> {
    let mut hits = Vec::new();
    for pattern in patterns {
        for caps in pattern.re.captures_iter(source) {
            if let Some(m) = caps.get(1) {
                hits.push((m.start(), Specifier::new(m.as_str().trim(), pattern.kind)));
            }
        }
    }
    hits.sort_by_key(|(offset, _)| *offset);
    hits
}

/// Prefix a bare relative name with `./` so the resolver treats it as relative.
pub(crate) fn as_relative(raw: &str) -> String {
    if raw.starts_with('.') {
        raw.to_string()
    } else {
        format!("./{raw}")
    }
}

fn url_scheme() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("url pattern must compile"))
}

/// Whether a specifier is a full network URL.
#[must_use]
pub fn is_url(raw: &str) -> bool {
    url_scheme().is_match(raw)
}

/// Routes files to the extractor registered for their language.
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, Box<dyn ReferenceExtractor>>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorRegistry {
    /// Registry with every built-in language family.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for lang in ["typescript", "tsx", "javascript"] {
            registry.register(lang, Box::new(ecmascript::EcmaScriptExtractor::new()));
        }
        registry.register("python", Box::new(python::PythonExtractor::new()));
        registry.register("go", Box::new(go::GoExtractor::new()));
        registry.register("rust", Box::new(rust::RustExtractor::new()));
        registry.register("ruby", Box::new(ruby::RubyExtractor::new()));
        registry.register("java", Box::new(java::JavaExtractor::new()));
        registry.register("csharp", Box::new(csharp::CSharpExtractor::new()));
        for lang in ["c", "cpp"] {
            registry.register(lang, Box::new(c_family::CFamilyExtractor::new()));
        }
        registry
    }

    /// Registry with no extractors.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Register (or replace) the extractor for a language.
    pub fn register(&mut self, lang: &'static str, extractor: Box<dyn ReferenceExtractor>) {
        self.extractors.insert(lang, extractor);
    }

    #[must_use]
    pub fn supports(&self, lang: &str) -> bool {
        self.extractors.contains_key(lang)
    }

    /// Specifiers of one file, deduplicated (first occurrence wins) with
    /// URLs dropped. Unknown language or no content gives an empty list.
    #[must_use]
    pub fn extract(&self, path: &str, content: Option<&str>) -> Vec<Specifier> {
        let Some(source) = content else {
            return Vec::new();
        };
        let Some(extractor) = detect_language(path).and_then(|lang| self.extractors.get(lang))
        else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        extractor
            .extract(source, path)
            .into_iter()
            .filter(|s| !s.raw.is_empty() && !is_url(&s.raw))
            .filter(|s| seen.insert(s.raw.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(specs: &[Specifier]) -> Vec<&str> {
        specs.iter().map(|s| s.raw.as_str()).collect()
    }

    #[test]
    fn url_detection() {
        assert!(is_url("https://cdn.example.com/lib.js"));
        assert!(is_url("git+ssh://host/repo"));
        assert!(!is_url("./local"));
        assert!(!is_url("@/lib/db"));
        assert!(!is_url("react"));
    }

    #[test]
    fn registry_dedups_and_drops_urls() {
        let registry = ExtractorRegistry::new();
        let source = r#"
import a from "./a";
import "https://esm.sh/preact";
const again = require("./a");
export * from "./b";
"#;
        let specs = registry.extract("src/index.ts", Some(source));
        assert_eq!(raws(&specs), vec!["./a", "./b"]);
        assert_eq!(specs[0].kind, EdgeKind::Import);
        assert_eq!(specs[1].kind, EdgeKind::Export);
    }

    #[test]
    fn no_content_or_unknown_language_is_empty() {
        let registry = ExtractorRegistry::new();
        assert!(registry.extract("src/index.ts", None).is_empty());
        assert!(registry
            .extract("README.md", Some("import x from './x'"))
            .is_empty());
    }

    #[test]
    fn custom_extractor_can_be_registered() {
        struct Lines;
        impl ReferenceExtractor for Lines {
            fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
                source
                    .lines()
                    .map(|l| Specifier::new(l, EdgeKind::Import))
                    .collect()
            }
        }

        let mut registry = ExtractorRegistry::empty();
        assert!(!registry.supports("go"));
        registry.register("go", Box::new(Lines));
        let specs = registry.extract("main.go", Some("./x\n./y\n./x"));
        assert_eq!(raws(&specs), vec!["./x", "./y"]);
    }

    #[test]
    fn as_relative_keeps_existing_prefix() {
        assert_eq!(as_relative("../up.h"), "../up.h");
        assert_eq!(as_relative("helper"), "./helper");
    }
}

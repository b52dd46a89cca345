//! Rust `mod name;` declarations.
//!
//! Only out-of-line modules are references; `use` paths name items, not
//! files. A module declared in `lib.rs`, `main.rs` or `mod.rs` lives next to
//! the declaring file; anywhere else it lives in a directory named after the
//! declaring file's stem.

use regex::Regex;

use crate::ingest::extract::{ReferenceExtractor, Specifier};
use crate::models::file::file_name;
use crate::models::graph::EdgeKind;

const MOD_DECL: &str = r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?mod[ \t]+([A-Za-z_]\w*)[ \t]*;";

pub struct RustExtractor {
    mod_decl: Regex,
}

impl Default for RustExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RustExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mod_decl: Regex::new(MOD_DECL).expect("rust mod pattern must compile"),
        }
    }
}

impl ReferenceExtractor for RustExtractor {
    fn extract(&self, source: &str, path: &str) -> Vec<Specifier> {
        let name = file_name(path);
        let prefix = match name {
            "lib.rs" | "main.rs" | "mod.rs" => "./".to_string(),
            other => format!("./{}/", other.trim_end_matches(".rs")),
        };
        self.mod_decl
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| Specifier::new(format!("{prefix}{}", m.as_str()), EdgeKind::Import))
            .collect()
    }
}

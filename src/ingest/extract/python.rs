//! Python `import` / `from ... import` statements.
//!
//! Relative modules are rewritten to path form so the resolver can follow
//! them: `.models` becomes `./models`, `..core.db` becomes `../core/db`.

use regex::Regex;

use crate::ingest::extract::{ReferenceExtractor, Specifier};
use crate::models::graph::EdgeKind;

const FROM_IMPORT: &str = r"(?m)^[ \t]*from[ \t]+(\.+[\w.]*|[A-Za-z_][\w.]*)[ \t]+import[ \t]+(\([^)]*\)|[^\n#]+)";
const IMPORT: &str = r"(?m)^[ \t]*import[ \t]+([A-Za-z_][\w.]*(?:[ \t]+as[ \t]+\w+)?(?:[ \t]*,[ \t]*[A-Za-z_][\w.]*(?:[ \t]+as[ \t]+\w+)?)*)";

pub struct PythonExtractor {
    from_import: Regex,
    import: Regex,
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            from_import: Regex::new(FROM_IMPORT).expect("python from-import pattern must compile"),
            import: Regex::new(IMPORT).expect("python import pattern must compile"),
        }
    }
}

impl ReferenceExtractor for PythonExtractor {
    fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
        let mut hits: Vec<(usize, String)> = Vec::new();

        for caps in self.from_import.captures_iter(source) {
            let (Some(module), Some(names)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let module_str = module.as_str();
            if module_str.chars().all(|c| c == '.') {
                // `from . import a, b` names sibling modules.
                for name in imported_names(names.as_str()) {
                    hits.push((module.start(), to_path(&format!("{module_str}{name}"))));
                }
            } else {
                hits.push((module.start(), to_path(module_str)));
            }
        }

        for caps in self.import.captures_iter(source) {
            let Some(list) = caps.get(1) else { continue };
            for item in list.as_str().split(',') {
                // `numpy as np` keeps the module name only.
                if let Some(name) = item.split_whitespace().next() {
                    hits.push((list.start(), name.to_string()));
                }
            }
        }

        hits.sort_by_key(|(offset, _)| *offset);
        hits.into_iter()
            .map(|(_, raw)| Specifier::new(raw, EdgeKind::Import))
            .collect()
    }
}

/// Names from an import list, without parentheses or `as` aliases.
fn imported_names(list: &str) -> Vec<&str> {
    list.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .filter_map(|item| item.split_whitespace().next())
        .filter(|name| *name != "*")
        .collect()
}

/// Rewrite a dotted module into a path specifier. Absolute modules are left
/// untouched and stay external.
fn to_path(module: &str) -> String {
    let dots = module.chars().take_while(|c| *c == '.').count();
    if dots == 0 {
        return module.to_string();
    }
    let rest = module[dots..].replace('.', "/");
    let prefix = if dots == 1 {
        "./".to_string()
    } else {
        "../".repeat(dots - 1)
    };
    format!("{prefix}{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(source: &str) -> Vec<String> {
        PythonExtractor::new()
            .extract(source, "pkg/app.py")
            .into_iter()
            .map(|s| s.raw)
            .collect()
    }

    #[test]
    fn relative_modules_become_paths() {
        let got = raws("from .models import User\nfrom ..core.db import session\n");
        assert_eq!(got, vec!["./models", "../core/db"]);
    }

    #[test]
    fn bare_dot_import_names_siblings() {
        let got = raws("from . import views, utils as u\nfrom .. import (settings)\n");
        assert_eq!(got, vec!["./views", "./utils", "../settings"]);
    }

    #[test]
    fn absolute_imports_stay_dotted() {
        let got = raws("import os, sys\nimport numpy.linalg\nfrom django.db import models\n");
        assert_eq!(got, vec!["os", "sys", "numpy.linalg", "django.db"]);
    }

    #[test]
    fn aliased_imports_keep_the_whole_list() {
        let got = raws("import a.b as c, d\nimport numpy as np\n");
        assert_eq!(got, vec!["a.b", "d", "numpy"]);
    }

    #[test]
    fn to_path_depths() {
        assert_eq!(to_path(".a.b"), "./a/b");
        assert_eq!(to_path("...x"), "../../x");
        assert_eq!(to_path("os.path"), "os.path");
    }
}

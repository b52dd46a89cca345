//! Specifier resolution against the set of snapshot paths.
//!
//! This approximates module resolution: relative and root-alias specifiers
//! are joined to a stem and probed against a fixed candidate list. It does
//! not read tsconfig paths, package.json exports or any build tool config.

use std::collections::HashSet;

/// Extensions appended to a stem, in probe order.
pub const CANDIDATE_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".py", ".go", ".rs", ".rb", ".java", ".cs",
    ".cpp", ".c", ".h",
];

/// Extensions probed for `stem/index.*`, in order.
pub const INDEX_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

/// Package-root files probed after the index files.
pub const PACKAGE_ROOT_FILES: &[&str] = &["/__init__.py", "/mod.rs"];

/// Root alias prefixes. Both map to the snapshot root.
const ROOT_ALIASES: &[&str] = &["@/", "~/"];

/// Resolve `specifier`, written in the file at `from_path`, to a known path.
///
/// Returns `None` for external dependencies (no relative or alias marker),
/// for stems escaping the snapshot root, and when no candidate exists.
#[must_use]
pub fn resolve(specifier: &str, from_path: &str, known: &HashSet<String>) -> Option<String> {
    let stem = if let Some(rest) = ROOT_ALIASES.iter().find_map(|a| specifier.strip_prefix(*a)) {
        normalize(rest)?
    } else if specifier.starts_with('.') {
        normalize(&format!("{}/{specifier}", parent_dir(from_path)))?
    } else {
        return None;
    };

    candidates(&stem).into_iter().find(|c| known.contains(c))
}

/// Candidate paths for a stem, in priority order.
#[must_use]
pub fn candidates(stem: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(
        1 + CANDIDATE_EXTENSIONS.len() + INDEX_EXTENSIONS.len() + PACKAGE_ROOT_FILES.len(),
    );
    if !stem.is_empty() {
        out.push(stem.to_string());
        out.extend(CANDIDATE_EXTENSIONS.iter().map(|ext| format!("{stem}{ext}")));
    }
    let base = if stem.is_empty() {
        String::new()
    } else {
        format!("{stem}/")
    };
    out.extend(INDEX_EXTENSIONS.iter().map(|ext| format!("{base}index{ext}")));
    out.extend(
        PACKAGE_ROOT_FILES
            .iter()
            .map(|f| format!("{base}{}", f.trim_start_matches('/'))),
    );
    out
}

/// Directory part of a path (empty for top-level files).
fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Collapse `.` and empty segments and apply `..`.
/// Returns `None` when `..` climbs above the root.
fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

//! Snapshot selection and content eligibility.
//!
//! Three gates run in order before any content is fetched: directory
//! exclusion, the per-job file cap, and the content filter.

use std::collections::BTreeMap;

use crate::fetch::RemoteEntry;
use crate::ingest::language::extension;

/// Files larger than this are never downloaded.
pub const MAX_CONTENT_BYTES: u64 = 100_000;

/// Extensions whose content is fetched for reference extraction.
pub const CONTENT_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "py", "go", "rs", "rb", "java", "cs", "cpp", "c",
];

/// Directory names never considered, wherever they appear in a path.
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    ".next",
    "vendor",
    "__pycache__",
];

/// Content filter: whether a file's text should be fetched.
#[must_use]
pub fn should_fetch_content(path: &str, size: Option<u64>) -> bool {
    if size.is_some_and(|s| s > MAX_CONTENT_BYTES) {
        return false;
    }
    extension(path).is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether any directory segment of the path is excluded.
#[must_use]
pub fn is_excluded(path: &str) -> bool {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    // The last segment is the file itself.
    segments.pop();
    segments.iter().any(|s| EXCLUDED_DIRS.contains(s))
}

/// Result of narrowing a raw listing down to the files a job considers.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Kept entries, sorted by path.
    pub entries: Vec<RemoteEntry>,
    /// Entries dropped by directory exclusion.
    pub excluded: usize,
    /// Entries dropped by the cap.
    pub truncated: usize,
}

/// Drop excluded and duplicate paths, sort, then keep the first `max_files`.
#[must_use]
pub fn select_snapshot(listing: Vec<RemoteEntry>, max_files: usize) -> Selection {
    let mut excluded = 0;
    let mut by_path: BTreeMap<String, RemoteEntry> = BTreeMap::new();
    for entry in listing {
        let path = normalize_path(&entry.path);
        if path.is_empty() {
            continue;
        }
        if is_excluded(&path) {
            excluded += 1;
            continue;
        }
        by_path.entry(path.clone()).or_insert(RemoteEntry {
            path,
            size: entry.size,
        });
    }

    let total = by_path.len();
    let entries: Vec<RemoteEntry> = by_path.into_values().take(max_files).collect();
    Selection {
        truncated: total - entries.len(),
        entries,
        excluded,
    }
}

/// Canonical snapshot path: forward slashes, no empty or `.` segments.
/// `a//b.ts`, `./a/b.ts` and `/a/b.ts` all become `a/b.ts`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::error::{GraphError, Result};
use crate::fetch::{RemoteEntry, SnapshotFetcher};

/// Directories the local walk never descends into. Everything else is
/// listed and left to the snapshot exclusion rules.
const SKIP_WALK: &[&str] = &[".git", ".repograph"];

/// Serves snapshots of directories on the local filesystem. The repository
/// identifier is a directory path, absolute or relative to `base`.
#[derive(Debug, Clone, Default)]
pub struct LocalFetcher {
    base: Option<PathBuf>,
}

impl LocalFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative repository identifiers against `base`.
    #[must_use]
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn root(&self, repo: &str) -> PathBuf {
        match &self.base {
            Some(base) => base.join(repo),
            None => PathBuf::from(repo),
        }
    }
}

#[async_trait]
impl SnapshotFetcher for LocalFetcher {
    async fn list_files(&self, repo: &str) -> Result<Vec<RemoteEntry>> {
        let root = self.root(repo);
        if !root.is_dir() {
            return Err(GraphError::Fetch {
                repo: repo.to_string(),
                detail: format!("{} is not a directory", root.display()),
            });
        }
        tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(|e| GraphError::Fetch {
                repo: repo.to_string(),
                detail: format!("listing task failed: {e}"),
            })
    }

    async fn fetch_content(&self, repo: &str, path: &str) -> Result<String> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(GraphError::ContentFetch {
                path: path.to_string(),
                detail: "path escapes the repository".into(),
            });
        }
        let bytes = tokio::fs::read(self.root(repo).join(relative))
            .await
            .map_err(|e| GraphError::ContentFetch {
                path: path.to_string(),
                detail: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|_| GraphError::ContentFetch {
            path: path.to_string(),
            detail: "content is not valid UTF-8".into(),
        })
    }
}

/// List every file under `root`. Ignore files are not consulted; the
/// snapshot exclusion rules decide what is dropped.
fn walk(root: &Path) -> Vec<RemoteEntry> {
    let entries: Vec<PathBuf> = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !SKIP_WALK.contains(&name.as_ref())
        })
        .build()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .collect();

    let mut files: Vec<RemoteEntry> = entries
        .par_iter()
        .map(|path| {
            let size = path.metadata().ok().map(|m| m.len());
            let relative = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            RemoteEntry {
                path: relative,
                size,
            }
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src/lib")).unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        fs::write(tmp.path().join("src/index.ts"), "import './lib/db';").unwrap();
        fs::write(tmp.path().join("src/lib/db.ts"), "export {}").unwrap();
        fs::write(tmp.path().join(".env"), "KEY=1").unwrap();
        tmp
    }

    #[tokio::test]
    async fn lists_files_with_sizes() {
        let tmp = project();
        let fetcher = LocalFetcher::new();
        let repo = tmp.path().to_string_lossy().to_string();
        let files = fetcher.list_files(&repo).await.unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![".env", "src/index.ts", "src/lib/db.ts"]);
        assert_eq!(files[2].size, Some(9));
    }

    #[tokio::test]
    async fn ignore_files_are_not_consulted() {
        let tmp = project();
        fs::write(tmp.path().join(".gitignore"), "generated.ts\n").unwrap();
        fs::write(tmp.path().join("generated.ts"), "").unwrap();
        let fetcher = LocalFetcher::with_base(tmp.path());
        let files = fetcher.list_files(".").await.unwrap();
        assert!(files.iter().any(|f| f.path == "generated.ts"));
        assert!(files.iter().any(|f| f.path == ".gitignore"));
        assert!(!files.iter().any(|f| f.path.starts_with(".git/")));
    }

    #[tokio::test]
    async fn missing_directory_is_a_fetch_error() {
        let tmp = TempDir::new().unwrap();
        let fetcher = LocalFetcher::with_base(tmp.path());
        let err = fetcher.list_files("nope").await.unwrap_err();
        assert!(matches!(err, GraphError::Fetch { .. }));
    }

    #[tokio::test]
    async fn reads_content_and_rejects_escapes() {
        let tmp = project();
        let fetcher = LocalFetcher::with_base(tmp.path());
        let text = fetcher.fetch_content(".", "src/lib/db.ts").await.unwrap();
        assert_eq!(text, "export {}");

        let err = fetcher.fetch_content(".", "../etc/passwd").await.unwrap_err();
        assert!(matches!(err, GraphError::ContentFetch { .. }));
        let err = fetcher.fetch_content(".", "src/missing.ts").await.unwrap_err();
        assert!(matches!(err, GraphError::ContentFetch { .. }));
    }

    #[tokio::test]
    async fn non_utf8_content_is_an_error() {
        let tmp = project();
        fs::write(tmp.path().join("bin.js"), [0xFF, 0xFE, 0x00]).unwrap();
        let fetcher = LocalFetcher::with_base(tmp.path());
        let err = fetcher.fetch_content(".", "bin.js").await.unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }
}

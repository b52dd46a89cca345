//! Snapshot retrieval: the fetcher seam and the bounded content fan-out.

pub mod fanout;
pub mod local;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

pub use fanout::{fetch_contents, ContentOutcome, ContentReport};
pub use local::LocalFetcher;

/// One entry of a repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Source of repository snapshots.
///
/// `list_files` failing is fatal for a job; `fetch_content` failing only
/// costs that file its content.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Every file path of the repository, with sizes when known.
    async fn list_files(&self, repo: &str) -> Result<Vec<RemoteEntry>>;

    /// Text content of one file.
    async fn fetch_content(&self, repo: &str, path: &str) -> Result<String>;
}

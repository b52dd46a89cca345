use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::GraphError;
use crate::fetch::{RemoteEntry, SnapshotFetcher};
use crate::ingest::filter::{should_fetch_content, MAX_CONTENT_BYTES};
use crate::models::file::FileRecord;

/// Per-file result of the content fan-out.
#[derive(Debug)]
pub enum ContentOutcome {
    Fetched(String),
    /// Filtered out before or after download.
    Skipped,
    Failed(GraphError),
}

/// Snapshot records plus fan-out counters.
#[derive(Debug, Default)]
pub struct ContentReport {
    /// One record per entry, in entry order.
    pub records: Vec<FileRecord>,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Fetch content for every eligible entry with at most `concurrency`
/// requests in flight.
///
/// Each file's outcome is captured on its own; a failed or panicking fetch
/// leaves that file without content and never affects its siblings.
pub async fn fetch_contents(
    fetcher: Arc<dyn SnapshotFetcher>,
    repo: &str,
    entries: Vec<RemoteEntry>,
    concurrency: usize,
) -> ContentReport {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut outcomes: BTreeMap<String, ContentOutcome> = BTreeMap::new();

    for entry in &entries {
        if !should_fetch_content(&entry.path, entry.size) {
            outcomes.insert(entry.path.clone(), ContentOutcome::Skipped);
            continue;
        }
        let fetcher = Arc::clone(&fetcher);
        let permits = Arc::clone(&permits);
        let repo = repo.to_string();
        let path = entry.path.clone();
        tasks.spawn(async move {
            let outcome = fetch_one(fetcher.as_ref(), &permits, &repo, &path).await;
            (path, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, outcome)) => {
                outcomes.insert(path, outcome);
            }
            Err(e) => tracing::warn!(error = %e, "content task aborted"),
        }
    }

    let mut report = ContentReport::default();
    for entry in entries {
        let mut record = FileRecord {
            path: entry.path,
            content: None,
            size: entry.size,
        };
        match outcomes.remove(&record.path) {
            Some(ContentOutcome::Fetched(text)) => {
                report.fetched += 1;
                record.content = Some(text);
            }
            Some(ContentOutcome::Skipped) => report.skipped += 1,
            Some(ContentOutcome::Failed(e)) => {
                report.failed += 1;
                tracing::warn!(path = %record.path, error = %e, "content unavailable, keeping file without content");
            }
            None => {
                report.failed += 1;
                tracing::warn!(path = %record.path, "content task lost, keeping file without content");
            }
        }
        report.records.push(record);
    }
    report
}

async fn fetch_one(
    fetcher: &dyn SnapshotFetcher,
    permits: &Semaphore,
    repo: &str,
    path: &str,
) -> ContentOutcome {
    let _permit = match permits.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            return ContentOutcome::Failed(GraphError::ContentFetch {
                path: path.to_string(),
                detail: e.to_string(),
            })
        }
    };
    match fetcher.fetch_content(repo, path).await {
        Ok(text) if text.len() as u64 > MAX_CONTENT_BYTES => {
            tracing::debug!(path, bytes = text.len(), "content over size ceiling, dropped");
            ContentOutcome::Skipped
        }
        Ok(text) => ContentOutcome::Fetched(text),
        Err(e) => ContentOutcome::Failed(e),
    }
}

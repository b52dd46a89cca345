use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::{Config, DEFAULT_MAX_FILES};
use crate::error::{GraphError, Result};
use crate::fetch::{fetch_contents, SnapshotFetcher};
use crate::graph::Analyzer;
use crate::ingest::select_snapshot;
use crate::jobs::store::JobStore;
use crate::models::graph::Artifact;
use crate::models::job::{Job, JobStatus};

const DEFAULT_CONCURRENCY: usize = 16;

/// Counters gathered while processing one job.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Entries returned by the listing.
    pub listed: usize,
    /// Entries dropped by directory exclusions.
    pub excluded: usize,
    /// Entries dropped by the per-job file cap.
    pub truncated: usize,
    /// Files that made it into the snapshot.
    pub considered: usize,
    pub content_fetched: usize,
    pub content_skipped: usize,
    pub content_failed: usize,
    pub nodes: usize,
    pub edges: usize,
    pub digest: String,
    pub elapsed_ms: u64,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub id: i64,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RunStats>,
}

/// Runs claimed jobs: list, select, fetch content, analyze, persist.
pub struct Pipeline {
    store: JobStore,
    fetcher: Arc<dyn SnapshotFetcher>,
    analyzer: Arc<Analyzer>,
    max_files: usize,
    concurrency: usize,
}

impl Pipeline {
    #[must_use]
    pub fn new(store: JobStore, fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        Self {
            store,
            fetcher,
            analyzer: Arc::new(Analyzer::new()),
            max_files: DEFAULT_MAX_FILES,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Pipeline over the config's job database and analysis limits.
    #[must_use]
    pub fn from_config(config: &Config, fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        Self::new(JobStore::new(&config.db_path), fetcher)
            .with_max_files(config.max_files())
            .with_concurrency(config.fetch_concurrency())
    }

    #[must_use]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Claim job `id` and process it.
    pub async fn run(&self, id: i64) -> Result<JobReport> {
        let job = self.store.claim(id)?;
        self.process(job).await
    }

    /// Process an already claimed job through to a terminal state.
    ///
    /// A listing failure is a normal outcome (FAILED report). Errors are
    /// returned only when the result could not be persisted; in that case
    /// the job has been marked FAILED, or [`GraphError::FailureUnrecorded`]
    /// reports that even that was impossible.
    pub async fn process(&self, job: Job) -> Result<JobReport> {
        let started = Instant::now();
        let id = job.id;
        tracing::info!(job = id, repo = %job.repo, "processing job");

        let snapshot = analyze_repo(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.analyzer),
            &job.repo,
            self.max_files,
            self.concurrency,
        )
        .await;
        let (artifact, mut stats) = match snapshot {
            Ok(done) => done,
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(job = id, error = %message, "snapshot analysis failed");
                self.fail(id, &message)?;
                return Ok(JobReport {
                    id,
                    status: JobStatus::Failed,
                    error: Some(message),
                    stats: None,
                });
            }
        };

        match self.store.complete(id, &artifact) {
            Ok(digest) => {
                stats.digest = digest;
                stats.elapsed_ms = started.elapsed().as_millis() as u64;
                tracing::info!(
                    job = id,
                    nodes = stats.nodes,
                    edges = stats.edges,
                    elapsed_ms = stats.elapsed_ms,
                    "job completed"
                );
                Ok(JobReport {
                    id,
                    status: JobStatus::Completed,
                    error: None,
                    stats: Some(stats),
                })
            }
            Err(e) => {
                let detail = e.to_string();
                tracing::error!(job = id, error = %detail, "persisting artifact failed");
                self.fail(id, &format!("persisting artifact failed: {detail}"))?;
                Err(GraphError::Persistence { id, detail })
            }
        }
    }

    /// Record FAILED. If that write fails too, raise the alarm and return
    /// [`GraphError::FailureUnrecorded`]; the row stays PROCESSING.
    fn fail(&self, id: i64, cause: &str) -> Result<()> {
        match self.store.fail(id, cause) {
            Ok(true) => {
                tracing::info!(job = id, "job failed");
                Ok(())
            }
            Ok(false) => {
                tracing::warn!(job = id, "job already terminal, failure not recorded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    job = id,
                    cause,
                    record_error = %e,
                    "could not record job failure; job left in PROCESSING"
                );
                Err(GraphError::FailureUnrecorded {
                    id,
                    cause: cause.to_string(),
                    record_error: e.to_string(),
                })
            }
        }
    }
}

/// List, select, fetch and analyze one repository without touching the job
/// store. Fails only when the listing itself cannot be obtained.
pub async fn analyze_repo(
    fetcher: Arc<dyn SnapshotFetcher>,
    analyzer: Arc<Analyzer>,
    repo: &str,
    max_files: usize,
    concurrency: usize,
) -> Result<(Artifact, RunStats)> {
    let started = Instant::now();
    let listing = fetcher.list_files(repo).await?;
    let listed = listing.len();
    let selection = select_snapshot(listing, max_files);
    if selection.truncated > 0 {
        tracing::info!(
            repo,
            kept = selection.entries.len(),
            dropped = selection.truncated,
            "snapshot capped"
        );
    }
    let mut stats = RunStats {
        listed,
        excluded: selection.excluded,
        truncated: selection.truncated,
        considered: selection.entries.len(),
        ..RunStats::default()
    };

    let content = fetch_contents(fetcher, repo, selection.entries, concurrency).await;
    stats.content_fetched = content.fetched;
    stats.content_skipped = content.skipped;
    stats.content_failed = content.failed;

    let records = content.records;
    let artifact = tokio::task::spawn_blocking(move || analyzer.analyze(&records))
        .await
        .map_err(|e| GraphError::Other(format!("analysis task failed: {e}")))?;
    stats.nodes = artifact.nodes.len();
    stats.edges = artifact.edges.len();
    stats.elapsed_ms = started.elapsed().as_millis() as u64;
    Ok((artifact, stats))
}

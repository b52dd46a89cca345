use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{GraphError, Result};
use crate::jobs::pipeline::{JobReport, Pipeline};
use crate::models::job::JobView;

/// Result of an inline analysis.
#[derive(Debug)]
pub enum InlineOutcome {
    /// The job reached COMPLETED or FAILED within the budget.
    Finished(JobView),
    /// The budget ran out first. The pipeline keeps running on `handle`;
    /// the caller decides whether to await it.
    Pending {
        view: JobView,
        handle: JoinHandle<Result<JobReport>>,
    },
}

/// Process pending jobs oldest first, sleeping `interval` when the queue is
/// empty. With `once`, return as soon as the queue is drained.
///
/// Errors from a claimed job are logged and the loop continues, except
/// [`GraphError::FailureUnrecorded`], which means the store is unusable.
/// A failed claim is returned with `once`; otherwise the worker waits
/// `interval` and retries. Returns the number of jobs processed.
pub async fn run_worker(pipeline: &Pipeline, interval: Duration, once: bool) -> Result<usize> {
    let mut processed = 0usize;
    tracing::info!(db = %pipeline.store().db_path().display(), once, "worker started");
    loop {
        let job = match pipeline.store().claim_next() {
            Ok(Some(job)) => job,
            Ok(None) => {
                if once {
                    break;
                }
                tokio::time::sleep(interval).await;
                continue;
            }
            Err(e) => {
                if once {
                    return Err(e);
                }
                tracing::warn!(error = %e, "claiming next job failed");
                tokio::time::sleep(interval).await;
                continue;
            }
        };

        processed += 1;
        match pipeline.process(job).await {
            Ok(report) => {
                tracing::debug!(job = report.id, status = %report.status, "job done");
            }
            Err(e @ GraphError::FailureUnrecorded { .. }) => return Err(e),
            Err(e) => tracing::warn!(error = %e, "job ended with error"),
        }
    }
    tracing::info!(processed, "worker stopped");
    Ok(processed)
}

/// Submit `repo`, run it on a background task and poll every `interval`
/// until it finishes or `budget` elapses.
pub async fn analyze_inline(
    pipeline: Arc<Pipeline>,
    repo: &str,
    budget: Duration,
    interval: Duration,
) -> Result<InlineOutcome> {
    let id = pipeline.store().submit(repo)?.id;
    let runner = Arc::clone(&pipeline);
    let mut handle = Some(tokio::spawn(async move { runner.run(id).await }));
    let deadline = Instant::now() + budget;

    loop {
        let view = pipeline.store().poll(id)?;
        if view.status.is_terminal() {
            if let Some(handle) = handle.take() {
                join(handle).await?;
            }
            return Ok(InlineOutcome::Finished(view));
        }

        // The pipeline can return without reaching a terminal state, e.g.
        // when the failure itself could not be written.
        if handle.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = handle.take() {
                join(handle).await?;
            }
            continue;
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::info!(job = id, status = %view.status, "inline budget exhausted");
            return match handle {
                Some(handle) => Ok(InlineOutcome::Pending { view, handle }),
                None => Err(GraphError::Other(format!(
                    "job {id} stopped in state {}",
                    view.status
                ))),
            };
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

async fn join(handle: JoinHandle<Result<JobReport>>) -> Result<JobReport> {
    handle
        .await
        .map_err(|e| GraphError::Other(format!("pipeline task failed: {e}")))?
}

use std::path::{Path, PathBuf};

use crate::db::{Database, StoredArtifact};
use crate::error::{GraphError, Result};
use crate::graph::digest;
use crate::models::graph::Artifact;
use crate::models::job::{Job, JobStatus, JobView};

/// Job persistence. The database is opened on demand for each operation so
/// the store can be shared across tasks without holding a connection.
#[derive(Debug, Clone)]
pub struct JobStore {
    db_path: PathBuf,
}

impl JobStore {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Database> {
        Database::open(&self.db_path)
    }

    /// Create a PENDING job for `repo`.
    pub fn submit(&self, repo: &str) -> Result<JobView> {
        let job = self.open()?.insert_job(repo)?;
        tracing::info!(job = job.id, repo, "job submitted");
        Ok(JobView {
            id: job.id,
            status: job.status,
            artifact: None,
            error: None,
        })
    }

    pub fn get(&self, id: i64) -> Result<Job> {
        self.open()?
            .get_job(id)?
            .ok_or(GraphError::JobNotFound { id })
    }

    /// Current view of a job. The artifact is attached only once COMPLETED
    /// and the error only once FAILED.
    pub fn poll(&self, id: i64) -> Result<JobView> {
        let db = self.open()?;
        let job = db.get_job(id)?.ok_or(GraphError::JobNotFound { id })?;
        let mut view = JobView {
            id,
            status: job.status,
            artifact: None,
            error: None,
        };
        match job.status {
            JobStatus::Completed => {
                let stored = db.get_artifact(id)?.ok_or_else(|| {
                    GraphError::Other(format!("job {id} is COMPLETED but has no artifact"))
                })?;
                view.artifact = Some(serde_json::from_str(&stored.body)?);
            }
            JobStatus::Failed => view.error = job.error,
            JobStatus::Pending | JobStatus::Processing => {}
        }
        Ok(view)
    }

    /// Claim a specific PENDING job for processing.
    pub fn claim(&self, id: i64) -> Result<Job> {
        let db = self.open()?;
        if !db.claim_job(id)? {
            let job = db.get_job(id)?.ok_or(GraphError::JobNotFound { id })?;
            return Err(GraphError::JobNotPending {
                id,
                status: job.status.to_string(),
            });
        }
        let job = db.get_job(id)?.ok_or(GraphError::JobNotFound { id })?;
        tracing::info!(job = id, "job claimed");
        Ok(job)
    }

    /// Claim the oldest PENDING job, if any.
    pub fn claim_next(&self) -> Result<Option<Job>> {
        let job = self.open()?.claim_next()?;
        if let Some(job) = &job {
            tracing::info!(job = job.id, repo = %job.repo, "job claimed");
        }
        Ok(job)
    }

    /// Persist the artifact and mark the job COMPLETED. Returns the digest.
    pub fn complete(&self, id: i64, artifact: &Artifact) -> Result<String> {
        let (body, hash) = digest(artifact)?;
        let stored = StoredArtifact {
            job_id: id,
            digest: hash.clone(),
            node_count: artifact.nodes.len() as u64,
            edge_count: artifact.edges.len() as u64,
            body,
        };
        let mut db = self.open()?;
        if !db.complete_job(&stored)? {
            let status = db
                .get_job(id)?
                .map_or_else(|| "missing".to_string(), |j| j.status.to_string());
            return Err(GraphError::Persistence {
                id,
                detail: format!("job is {status}, expected PROCESSING"),
            });
        }
        Ok(hash)
    }

    /// Mark the job FAILED. Returns `false` if it was already terminal.
    pub fn fail(&self, id: i64, error: &str) -> Result<bool> {
        self.open()?.fail_job(id, error)
    }

    /// Jobs newest first, optionally filtered by status.
    pub fn list(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>> {
        self.open()?.list_jobs(status, limit)
    }

    /// Stored digest of a completed job.
    pub fn artifact_digest(&self, id: i64) -> Result<Option<String>> {
        Ok(self.open()?.get_artifact(id)?.map(|a| a.digest))
    }
}

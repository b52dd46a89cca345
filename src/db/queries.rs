use rusqlite::{params, OptionalExtension, Row};

use crate::db::schema::NOW;
use crate::error::Result;
use crate::models::job::{Job, JobStatus};

use super::Database;

const JOB_COLUMNS: &str = "id, repo, status, error, created_at, started_at, finished_at";

/// A persisted artifact row.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub job_id: i64,
    pub digest: String,
    pub node_count: u64,
    pub edge_count: u64,
    /// Serialized artifact JSON.
    pub body: String,
}

impl Database {
    // ─── Job operations ───

    /// Insert a PENDING job. Returns the stored row.
    pub fn insert_job(&self, repo: &str) -> Result<Job> {
        self.conn()
            .execute("INSERT INTO jobs (repo) VALUES (?1)", params![repo])?;
        let id = self.conn().last_insert_rowid();
        let job = self.conn().query_row(
            &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"),
            params![id],
            map_job,
        )?;
        Ok(job)
    }

    /// Get a job by ID.
    pub fn get_job(&self, id: i64) -> Result<Option<Job>> {
        let job = self
            .conn()
            .query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"),
                params![id],
                map_job,
            )
            .optional()?;
        Ok(job)
    }

    /// List jobs, newest first, optionally filtered by status.
    pub fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY created_at DESC, id DESC
             LIMIT ?2"
        ))?;
        let rows = stmt.query_map(
            params![status.map(|s| s.as_str()), limit as i64],
            map_job,
        )?;
        let mut jobs = Vec::new();
        for r in rows {
            jobs.push(r?);
        }
        Ok(jobs)
    }

    /// Move a specific job from PENDING to PROCESSING.
    ///
    /// The update is conditional on the row still being PENDING, so of any
    /// number of concurrent claimants exactly one sees `true`.
    pub fn claim_job(&self, id: i64) -> Result<bool> {
        let changed = self.conn().execute(
            &format!(
                "UPDATE jobs SET status = 'PROCESSING', started_at = {NOW}
                 WHERE id = ?1 AND status = 'PENDING'"
            ),
            params![id],
        )?;
        Ok(changed == 1)
    }

    /// Claim the oldest PENDING job (by `created_at`, then id), if any.
    pub fn claim_next(&self) -> Result<Option<Job>> {
        let job = self
            .conn()
            .query_row(
                &format!(
                    "UPDATE jobs SET status = 'PROCESSING', started_at = {NOW}
                     WHERE id = (
                         SELECT id FROM jobs WHERE status = 'PENDING'
                         ORDER BY created_at, id LIMIT 1
                     ) AND status = 'PENDING'
                     RETURNING {JOB_COLUMNS}"
                ),
                [],
                map_job,
            )
            .optional()?;
        Ok(job)
    }

    /// Store the artifact and mark the job COMPLETED in one transaction.
    ///
    /// Rewriting a COMPLETED job's artifact replaces it. Returns `false`
    /// (and writes nothing) when the job is neither PROCESSING nor COMPLETED.
    pub fn complete_job(&mut self, artifact: &StoredArtifact) -> Result<bool> {
        let tx = self.conn_mut().transaction()?;
        let changed = tx.execute(
            &format!(
                "UPDATE jobs SET status = 'COMPLETED', error = NULL, finished_at = {NOW}
                 WHERE id = ?1 AND status IN ('PROCESSING', 'COMPLETED')"
            ),
            params![artifact.job_id],
        )?;
        if changed == 0 {
            // dropping the transaction rolls it back
            return Ok(false);
        }
        tx.execute(
            &format!(
                "INSERT INTO artifacts (job_id, digest, node_count, edge_count, body)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(job_id) DO UPDATE SET
                     digest = ?2, node_count = ?3, edge_count = ?4, body = ?5, written_at = {NOW}"
            ),
            params![
                artifact.job_id,
                artifact.digest,
                artifact.node_count as i64,
                artifact.edge_count as i64,
                artifact.body,
            ],
        )?;
        tx.commit()?;
        Ok(true)
    }

    /// Mark a PENDING or PROCESSING job FAILED with a message.
    /// Returns `false` when the job is already terminal or missing.
    pub fn fail_job(&self, id: i64, error: &str) -> Result<bool> {
        let changed = self.conn().execute(
            &format!(
                "UPDATE jobs SET status = 'FAILED', error = ?2, finished_at = {NOW}
                 WHERE id = ?1 AND status IN ('PENDING', 'PROCESSING')"
            ),
            params![id, error],
        )?;
        Ok(changed == 1)
    }

    // ─── Artifact operations ───

    /// Get the stored artifact of a job.
    pub fn get_artifact(&self, job_id: i64) -> Result<Option<StoredArtifact>> {
        let artifact = self
            .conn()
            .query_row(
                "SELECT job_id, digest, node_count, edge_count, body
                 FROM artifacts WHERE job_id = ?1",
                params![job_id],
                |row| {
                    Ok(StoredArtifact {
                        job_id: row.get(0)?,
                        digest: row.get(1)?,
                        node_count: row.get::<_, i64>(2)? as u64,
                        edge_count: row.get::<_, i64>(3)? as u64,
                        body: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(artifact)
    }
}

fn parse_status(row: &Row<'_>, idx: usize) -> rusqlite::Result<JobStatus> {
    let raw: String = row.get(idx)?;
    JobStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown job status: {raw}").into(),
        )
    })
}

fn map_job(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        repo: row.get(1)?,
        status: parse_status(row, 2)?,
        error: row.get(3)?,
        created_at: row.get(4)?,
        started_at: row.get(5)?,
        finished_at: row.get(6)?,
    })
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    /// The top-level file listing could not be obtained. Fatal for a job.
    #[error("snapshot fetch failed for {repo}: {detail}")]
    Fetch { repo: String, detail: String },

    /// A single file's content could not be obtained. Never fatal.
    #[error("content fetch failed for {path}: {detail}")]
    ContentFetch { path: String, detail: String },

    #[error("job not found: {id}")]
    JobNotFound { id: i64 },

    #[error("job {id} is not pending (status: {status})")]
    JobNotPending { id: i64, status: String },

    #[error("failed to persist result of job {id}: {detail}")]
    Persistence { id: i64, detail: String },

    /// Processing failed and writing the FAILED state failed as well.
    /// The job row is left in PROCESSING.
    #[error("job {id} failed ({cause}) and the failure could not be recorded: {record_error}")]
    FailureUnrecorded {
        id: i64,
        cause: String,
        record_error: String,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

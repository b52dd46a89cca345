/// SQL statements for creating the job store schema.
///
/// Timestamps are ISO 8601 UTC with millisecond precision so that
/// `created_at` orders submissions made within the same second.
pub const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY,
    repo TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'PENDING'
        CHECK (status IN ('PENDING', 'PROCESSING', 'COMPLETED', 'FAILED')),
    error TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    started_at TEXT,
    finished_at TEXT
);

CREATE TABLE IF NOT EXISTS artifacts (
    job_id INTEGER PRIMARY KEY REFERENCES jobs(id) ON DELETE CASCADE,
    digest TEXT NOT NULL,
    node_count INTEGER NOT NULL,
    edge_count INTEGER NOT NULL,
    body TEXT NOT NULL,
    written_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- claim_next scans pending jobs oldest first
CREATE INDEX IF NOT EXISTS idx_jobs_status_created ON jobs(status, created_at, id);
";

/// Expression for the current time, matching the column defaults.
pub const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

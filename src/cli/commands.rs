use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "repograph",
    version,
    about = "Dependency graphs for repository snapshots",
    after_help = "Jobs are stored in .repograph/jobs.db under the current directory. \
                  Settings are read from .repograph/config.toml when present."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Queue an analysis job for a repository and print its id.
    ///
    /// The job stays PENDING until `run` or a `worker` picks it up.
    Submit {
        /// Repository directory
        repo: String,
    },

    /// Claim a PENDING job and process it in the foreground
    Run {
        /// Job id
        id: i64,
    },

    /// Submit a job and wait for it, up to a time budget.
    ///
    /// When the budget runs out the current (non-terminal) status is
    /// printed and the analysis still runs to completion before exit.
    Analyze {
        /// Repository directory
        repo: String,
        /// Seconds to wait for a terminal status (default from config)
        #[arg(long)]
        budget_secs: Option<u64>,
    },

    /// Process PENDING jobs oldest first
    Worker {
        /// Exit once the queue is empty
        #[arg(long)]
        once: bool,
        /// Idle poll interval in milliseconds (default from config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Show a job's status, with its artifact once COMPLETED
    Poll {
        /// Job id
        id: i64,
    },

    /// List jobs, newest first
    Jobs {
        /// Only jobs in this status (pending, processing, completed, failed)
        #[arg(short, long)]
        status: Option<String>,
        /// Maximum number of jobs
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Build the artifact for a directory and print it, without queuing a job
    Build {
        /// Repository directory (default: current directory)
        #[arg(default_value = ".")]
        path: String,
        /// Print run counters instead of the artifact
        #[arg(long)]
        stats: bool,
    },

    /// Print the file tree of a directory snapshot
    Tree {
        /// Repository directory (default: current directory)
        #[arg(default_value = ".")]
        path: String,
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
}

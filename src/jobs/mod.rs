pub mod pipeline;
pub mod store;
pub mod worker;

pub use pipeline::{analyze_repo, JobReport, Pipeline, RunStats};
pub use store::JobStore;
pub use worker::{analyze_inline, run_worker, InlineOutcome};

// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::needless_pass_by_value
)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use repograph::cli::commands::{Cli, Command};
use repograph::cli::output;
use repograph::config::Config;
use repograph::fetch::{LocalFetcher, SnapshotFetcher};
use repograph::graph::{build_tree, format_tree, Analyzer};
use repograph::ingest::select_snapshot;
use repograph::jobs::{analyze_inline, analyze_repo, run_worker, InlineOutcome, JobStore, Pipeline};
use repograph::models::job::JobStatus;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> CmdResult {
    match cli.command {
        Command::Submit { repo } => cmd_submit(&repo),
        Command::Run { id } => cmd_run(id),
        Command::Analyze { repo, budget_secs } => cmd_analyze(&repo, budget_secs),
        Command::Worker { once, interval_ms } => cmd_worker(once, interval_ms),
        Command::Poll { id } => cmd_poll(id),
        Command::Jobs { status, limit } => cmd_jobs(status.as_deref(), limit),
        Command::Build { path, stats } => cmd_build(&path, stats),
        Command::Tree { path, json } => cmd_tree(&path, json),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config() -> Result<Config, Box<dyn std::fmt::Display>> {
    let config = Config::from_cwd().map_err(map_err)?;
    config.ensure_data_dir().map_err(map_err)?;
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::fmt::Display>> {
    tokio::runtime::Runtime::new().map_err(map_err)
}

fn pipeline(config: &Config) -> Pipeline {
    let fetcher: Arc<dyn SnapshotFetcher> = Arc::new(LocalFetcher::new());
    Pipeline::from_config(config, fetcher)
}

/// Store local repositories by absolute path so a worker started elsewhere
/// finds them.
fn repo_id(repo: &str) -> Result<String, Box<dyn std::fmt::Display>> {
    let path = Path::new(repo);
    if !path.is_dir() {
        return Err(map_err(format!("not a directory: {repo}")));
    }
    let canonical = path.canonicalize().map_err(map_err)?;
    Ok(canonical.to_string_lossy().into_owned())
}

fn cmd_submit(repo: &str) -> CmdResult {
    let config = get_config()?;
    let store = JobStore::new(&config.db_path);
    let view = store.submit(&repo_id(repo)?).map_err(map_err)?;
    println!("{}", output::format_json(&view));
    Ok(())
}

fn cmd_run(id: i64) -> CmdResult {
    let config = get_config()?;
    let pipeline = pipeline(&config);
    let report = runtime()?
        .block_on(pipeline.run(id))
        .map_err(map_err)?;
    println!("{}", output::format_json(&report));
    Ok(())
}

fn cmd_analyze(repo: &str, budget_secs: Option<u64>) -> CmdResult {
    let config = get_config()?;
    let repo = repo_id(repo)?;
    let budget = budget_secs.map_or_else(|| config.settings.jobs.inline_budget(), Duration::from_secs);
    let interval = config.settings.jobs.poll_interval();
    let pipeline = Arc::new(pipeline(&config));

    runtime()?.block_on(async {
        match analyze_inline(pipeline, &repo, budget, interval)
            .await
            .map_err(map_err)?
        {
            InlineOutcome::Finished(view) => {
                println!("{}", output::format_json(&view));
            }
            InlineOutcome::Pending { view, handle } => {
                println!("{}", output::format_json(&view));
                // The caller stopped waiting; the job still runs to the end.
                match handle.await {
                    Ok(Ok(report)) => {
                        tracing::info!(job = report.id, status = %report.status, "background job finished");
                    }
                    Ok(Err(e)) => tracing::error!(job = view.id, error = %e, "background job failed"),
                    Err(e) => tracing::error!(job = view.id, error = %e, "background task aborted"),
                }
            }
        }
        Ok::<(), Box<dyn std::fmt::Display>>(())
    })
}

fn cmd_worker(once: bool, interval_ms: Option<u64>) -> CmdResult {
    let config = get_config()?;
    let interval = interval_ms.map_or_else(|| config.settings.jobs.poll_interval(), Duration::from_millis);
    let pipeline = pipeline(&config);
    let processed = runtime()?
        .block_on(run_worker(&pipeline, interval, once))
        .map_err(map_err)?;
    println!("{}", output::format_json(&serde_json::json!({ "processed": processed })));
    Ok(())
}

fn cmd_poll(id: i64) -> CmdResult {
    let config = get_config()?;
    let view = JobStore::new(&config.db_path).poll(id).map_err(map_err)?;
    println!("{}", output::format_json(&view));
    Ok(())
}

fn cmd_jobs(status: Option<&str>, limit: usize) -> CmdResult {
    let status = match status {
        Some(s) => Some(JobStatus::parse(s).ok_or_else(|| map_err(format!("unknown status: {s}")))?),
        None => None,
    };
    let config = get_config()?;
    let jobs = JobStore::new(&config.db_path)
        .list(status, limit)
        .map_err(map_err)?;
    println!("{}", output::format_json(&jobs));
    Ok(())
}

fn cmd_build(path: &str, stats: bool) -> CmdResult {
    let config = Config::from_cwd().map_err(map_err)?;
    let fetcher: Arc<dyn SnapshotFetcher> = Arc::new(LocalFetcher::new());
    let (artifact, run_stats) = runtime()?
        .block_on(analyze_repo(
            fetcher,
            Arc::new(Analyzer::new()),
            path,
            config.max_files(),
            config.fetch_concurrency(),
        ))
        .map_err(map_err)?;
    if stats {
        println!("{}", output::format_json(&run_stats));
    } else {
        println!("{}", output::format_json(&artifact));
    }
    Ok(())
}

fn cmd_tree(path: &str, json: bool) -> CmdResult {
    let config = Config::from_cwd().map_err(map_err)?;
    let listing = runtime()?
        .block_on(LocalFetcher::new().list_files(path))
        .map_err(map_err)?;
    let selection = select_snapshot(listing, config.max_files());
    let paths: Vec<&str> = selection.entries.iter().map(|e| e.path.as_str()).collect();
    let tree = build_tree(&paths);
    if json {
        println!("{}", output::format_json(&tree));
    } else {
        print!("{}", format_tree(&tree));
    }
    Ok(())
}

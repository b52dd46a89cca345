use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Default directory name for repograph state.
const DATA_DIR: &str = ".repograph";
/// Job database filename.
const DB_FILE: &str = "jobs.db";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Default cap on files considered per job.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Runtime configuration resolved from a working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the `.repograph/` folder lives in.
    pub root: PathBuf,
    /// Path to the `.repograph/` directory.
    pub data_dir: PathBuf,
    /// Path to the `SQLite` job database.
    pub db_path: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from .repograph/config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Snapshot and fan-out limits.
    pub analysis: AnalysisSettings,
    /// Job polling behaviour.
    pub jobs: JobSettings,
}

/// Analysis-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Maximum files considered per job, applied after exclusion filtering.
    pub max_files: usize,
    /// Maximum number of content fetches in flight at once.
    pub fetch_concurrency: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            fetch_concurrency: 16,
        }
    }
}

/// Job polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Delay between polls (inline `analyze`) and between idle worker scans.
    pub poll_interval_ms: u64,
    /// Wall-clock budget after which inline callers stop polling.
    pub inline_budget_secs: u64,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            inline_budget_secs: 25,
        }
    }
}

impl JobSettings {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    #[must_use]
    pub fn inline_budget(&self) -> Duration {
        Duration::from_secs(self.inline_budget_secs)
    }
}

impl Config {
    /// Create config rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join(DATA_DIR);
        let db_path = data_dir.join(DB_FILE);
        let config_path = data_dir.join(CONFIG_FILE);

        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            root,
            data_dir,
            db_path,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| GraphError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Load settings from config.toml if it exists.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Save current settings to config.toml.
    pub fn save_settings(&self) -> Result<()> {
        self.ensure_data_dir()?;
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| GraphError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Ensure the `.repograph/` directory exists.
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Effective per-job file cap. Zero in the config file means "use the default".
    #[must_use]
    pub fn max_files(&self) -> usize {
        match self.settings.analysis.max_files {
            0 => DEFAULT_MAX_FILES,
            n => n,
        }
    }

    /// Effective fan-out width (at least one).
    #[must_use]
    pub fn fetch_concurrency(&self) -> usize {
        self.settings.analysis.fetch_concurrency.max(1)
    }
}

//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export LISTEN="0.0.0.0:8080"
//! export STATE_PATH="data/state.json"
//! export MAX_WORKERS="5"
//! export PROBE_TIMEOUT_SECS="5"
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `STATE_PATH` - Batch store file (default: `data/state.json`)
//! - `MAX_WORKERS` - Probes running at once per batch (default: 5, max: 256)
//! - `PROBE_TIMEOUT_SECS` - Per-request probe timeout (default: 5)
//! - `BATCH_DEADLINE_SECS` - Overall limit for checking one batch (default: none)
//! - `REPORT_TITLE` - Title printed at the top of reports (default: `Links check report`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::checker::DEFAULT_MAX_WORKERS;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub state_path: PathBuf,
    pub log_level: String,
    pub log_format: String,
    /// Worker budget for one batch check.
    pub max_workers: usize,
    pub probe_timeout_secs: u64,
    /// When set, a batch still checking after this many seconds is cancelled
    /// and ends `failed`.
    pub batch_deadline_secs: Option<u64>,
    pub report_title: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a number.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let state_path = env::var("STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/state.json"));
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        // Non-positive budgets fall back to the default.
        let max_workers = match parse_var::<i64>("MAX_WORKERS")? {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_MAX_WORKERS,
        };

        let probe_timeout_secs = parse_var("PROBE_TIMEOUT_SECS")?.unwrap_or(5);
        let batch_deadline_secs = parse_var("BATCH_DEADLINE_SECS")?;

        let report_title =
            env::var("REPORT_TITLE").unwrap_or_else(|_| "Links check report".to_string());

        Ok(Self {
            listen_addr,
            state_path,
            log_level,
            log_format,
            max_workers,
            probe_timeout_secs,
            batch_deadline_secs,
            report_title,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_workers` is above 256
    /// - `probe_timeout_secs` or `batch_deadline_secs` is zero
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `state_path` is empty
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 || self.max_workers > 256 {
            anyhow::bail!(
                "MAX_WORKERS must be between 1 and 256, got {}",
                self.max_workers
            );
        }

        if self.probe_timeout_secs == 0 {
            anyhow::bail!("PROBE_TIMEOUT_SECS must be greater than 0");
        }

        if self.batch_deadline_secs == Some(0) {
            anyhow::bail!("BATCH_DEADLINE_SECS must be greater than 0 when set");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.state_path.as_os_str().is_empty() {
            anyhow::bail!("STATE_PATH must not be empty");
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn batch_deadline(&self) -> Option<Duration> {
        self.batch_deadline_secs.map(Duration::from_secs)
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  State file: {}", self.state_path.display());
        tracing::info!("  Max workers: {}", self.max_workers);
        tracing::info!("  Probe timeout: {}s", self.probe_timeout_secs);
        match self.batch_deadline_secs {
            Some(secs) => tracing::info!("  Batch deadline: {}s", secs),
            None => tracing::info!("  Batch deadline: none"),
        }
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Reads and parses an optional variable; unset or empty yields `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        _ => Ok(None),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

//! Settings file (`config.toml`) with named sections and defaults.
//!
//! ```toml
//! [database]
//! path = "data/catalog.db"
//! busy_timeout_ms = 5000
//!
//! [logging]
//! level = "info"
//! console = true
//! file = "ingest.log"
//! dir = "logs"
//! file_max_bytes = 10485760
//! file_backup_count = 5
//! buffer_capacity = 1000
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::CliError;

/// Settings file read when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct DatabaseSettings {
    /// Catalog database file; a leading `~` is the home directory.
    pub path: PathBuf,
    /// How long to wait on a database locked by another process.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/catalog.db"),
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseSettings {
    pub fn resolved_path(&self) -> PathBuf {
        expand_home(&self.path)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingSettings {
    /// One of off, error, warn, info, debug, trace.
    pub level: String,
    pub console: bool,
    /// Log file name inside `dir`; no file sink when unset.
    pub file: Option<String>,
    pub dir: PathBuf,
    /// Size at which the log file rolls over; 0 disables rollover.
    pub file_max_bytes: u64,
    /// Rolled-over files kept as `<file>.1` .. `<file>.N`.
    pub file_backup_count: usize,
    /// Number of recent log lines kept in memory.
    pub buffer_capacity: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: None,
            dir: PathBuf::from("logs"),
            file_max_bytes: 10 * 1024 * 1024,
            file_backup_count: 5,
            buffer_capacity: 1000,
        }
    }
}

impl LoggingSettings {
    pub fn level_filter(&self) -> Result<LevelFilter, CliError> {
        self.level
            .parse()
            .map_err(|_| CliError::config(format!("Unknown log level '{}'", self.level)))
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A missing file is only an error when the path was given explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, CliError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CliError::config(format!(
                    "Cannot read settings file {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Self::parse(&contents)
            .map_err(|e| CliError::config(format!("Invalid settings file {}: {}", path.display(), e)))
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

//! Configuration management

use crate::domain::dates::TITLE_FORMAT;
use crate::error::{JournalError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Name of the marker directory holding config and store
pub const JOURNAL_DIR: &str = ".mindjournal";

/// Seconds between draft checkpoints unless configured otherwise
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
    #[serde(default = "default_title_format")]
    pub title_format: String,
    pub created: DateTime<Utc>,
}

fn default_autosave_interval_secs() -> u64 {
    DEFAULT_AUTOSAVE_INTERVAL_SECS
}

fn default_title_format() -> String {
    TITLE_FORMAT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Config {
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            title_format: TITLE_FORMAT.to_string(),
            created: Utc::now(),
        }
    }

    /// Load config from .mindjournal/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(JOURNAL_DIR).join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                JournalError::NotJournalDirectory(path.to_path_buf())
            } else {
                JournalError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| JournalError::Config(format!("Failed to parse config.toml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to .mindjournal/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let journal_dir = path.join(JOURNAL_DIR);
        let config_path = journal_dir.join("config.toml");

        if !journal_dir.exists() {
            fs::create_dir(&journal_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| JournalError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    /// Reject values the session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.autosave_interval_secs == 0 {
            return Err(JournalError::Config(
                "Invalid autosave_interval_secs: 0 (must be at least 1)".to_string(),
            ));
        }
        validate_title_format(&self.title_format)
    }
}

/// Check that a strftime pattern is usable for default titles
pub fn validate_title_format(format: &str) -> Result<()> {
    if format.trim().is_empty() {
        return Err(JournalError::Config(
            "Invalid title_format: pattern is empty".to_string(),
        ));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(JournalError::Config(format!(
            "Invalid title_format: '{}'",
            format
        )));
    }
    Ok(())
}

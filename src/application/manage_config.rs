//! Config management use case

use crate::error::{JournalError, Result};
use crate::infrastructure::config::validate_title_format;
use crate::infrastructure::{Config, JournalRoot};

const VALID_KEYS: &str = "autosave_interval_secs, title_format, created";

/// Service for managing journal configuration
pub struct ConfigService {
    root: JournalRoot,
}

impl ConfigService {
    pub fn new(root: JournalRoot) -> Self {
        ConfigService { root }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.root.load_config()?;

        match key {
            "autosave_interval_secs" => Ok(config.autosave_interval_secs.to_string()),
            "title_format" => Ok(config.title_format),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(JournalError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: {}",
                key, VALID_KEYS
            ))),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.root.load_config()?;

        match key {
            "autosave_interval_secs" => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    JournalError::Config(format!("Invalid autosave_interval_secs: {}", value))
                })?;
                config.autosave_interval_secs = secs;
            }
            "title_format" => {
                validate_title_format(value)?;
                config.title_format = value.to_string();
            }
            "created" => {
                return Err(JournalError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => {
                return Err(JournalError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: autosave_interval_secs, title_format",
                    key
                )));
            }
        }

        config.validate()?;
        self.root.save_config(&config)?;
        tracing::info!("Config {} set to {}", key, value);
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.root.load_config()
    }
}

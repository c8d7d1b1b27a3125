//! Initialize journal use case

use crate::error::Result;
use crate::infrastructure::{Config, JournalRoot};
use std::fs;
use std::path::Path;

/// Initialize a new journal at the specified path.
pub fn init(path: &Path) -> Result<Config> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let root = JournalRoot::new(path.to_path_buf());
    root.initialize()?;

    let config = Config::new();
    root.save_config(&config)?;

    tracing::info!("Initialized journal at {}", path.display());
    Ok(config)
}

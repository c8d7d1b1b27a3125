//! Journal root directory discovery and layout

use crate::error::{JournalError, Result};
use crate::infrastructure::config::{Config, JOURNAL_DIR};
use crate::infrastructure::storage::FileSystemStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding root discovery
pub const ROOT_ENV: &str = "MINDJOURNAL_ROOT";

/// A directory containing a `.mindjournal/` marker directory
#[derive(Debug, Clone)]
pub struct JournalRoot {
    pub root: PathBuf,
}

impl JournalRoot {
    pub fn new(root: PathBuf) -> Self {
        JournalRoot { root }
    }

    /// Locate the journal root.
    /// Checks MINDJOURNAL_ROOT first, then walks up from the current directory.
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var(ROOT_ENV) {
            let path = PathBuf::from(root_path);
            if Self::has_journal_dir(&path) {
                return Ok(JournalRoot::new(path));
            } else {
                return Err(JournalError::Config(format!(
                    "{} is set to '{}' but no {} directory found. \
                    Run 'mindjournal init' in that directory or unset {}.",
                    ROOT_ENV,
                    path.display(),
                    JOURNAL_DIR,
                    ROOT_ENV
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Walk up from `start` until a directory with `.mindjournal/` is found
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_journal_dir(&current) {
                return Ok(JournalRoot::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => {
                    return Err(JournalError::NotJournalDirectory(start.to_path_buf()));
                }
            }
        }
    }

    fn has_journal_dir(path: &Path) -> bool {
        path.join(JOURNAL_DIR).is_dir()
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_journal_dir(&self.root)
    }

    /// Create the `.mindjournal/` directory. Fails if it already exists.
    pub fn initialize(&self) -> Result<()> {
        let journal_dir = self.root.join(JOURNAL_DIR);

        if journal_dir.exists() {
            return Err(JournalError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&journal_dir)?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    /// Key-value store backing this journal
    pub fn store(&self) -> FileSystemStore {
        FileSystemStore::new(self.root.join(JOURNAL_DIR).join("store"))
    }
}

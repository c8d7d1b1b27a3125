//! Error types for mindjournal

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mindjournal
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Operation already in progress for {0}")]
    InProgress(String),

    #[error("Not a mindjournal directory: {0}")]
    NotJournalDirectory(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Coarse classification of a [`JournalError`], as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Persistence,
    Export,
    Usage,
}

impl JournalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JournalError::Validation(_) => ErrorKind::Validation,
            JournalError::Persistence(_) | JournalError::Io(_) => ErrorKind::Persistence,
            JournalError::Export(_) => ErrorKind::Export,
            _ => ErrorKind::Usage,
        }
    }

    /// Whether repeating the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Persistence | ErrorKind::Export)
            || matches!(self, JournalError::InProgress(_))
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            JournalError::NotJournalDirectory(_) => 2,
            JournalError::Validation(_) => 3,
            JournalError::NotFound(_) => 4,
            JournalError::Persistence(_) => 5,
            JournalError::Export(_) => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            JournalError::NotJournalDirectory(path) => {
                format!(
                    "Not a mindjournal directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'mindjournal init' in this directory to create a new journal\n\
                    • Navigate to an existing journal directory\n\
                    • Set MINDJOURNAL_ROOT environment variable to your journal path",
                    path.display()
                )
            }
            JournalError::Validation(msg) => {
                format!(
                    "{}\n\n\
                    Journal entries need some content before they can be saved.\n\
                    Example: mindjournal write --title 'Morning' --content 'Slept well'",
                    msg
                )
            }
            JournalError::NotFound(id) => {
                format!(
                    "No entry with id '{}'\n\n\
                    Suggestions:\n\
                    • Use 'mindjournal list' to see entry ids",
                    id
                )
            }
            JournalError::Persistence(msg) => {
                format!(
                    "Failed to save your journal: {}\n\n\
                    Your changes are kept for this session. Please try again.",
                    msg
                )
            }
            JournalError::Export(msg) => {
                format!("Could not export your journal entries: {}", msg)
            }
            JournalError::Config(msg) => {
                if msg.contains("autosave_interval_secs") {
                    format!(
                        "{}\n\n\
                        The autosave interval is a whole number of seconds (at least 1).\n\
                        Example: mindjournal config autosave_interval_secs 5",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Persistence(err.to_string())
    }
}

/// Result type using JournalError
pub type Result<T> = std::result::Result<T, JournalError>;

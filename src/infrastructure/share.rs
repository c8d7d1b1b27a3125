//! Destinations for exported journal text

use crate::error::{JournalError, Result};
use crate::infrastructure::storage::rename_with_fallback;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Result of handing text to a share destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user closed the share sheet without picking a target
    Dismissed,
}

/// Receives the exported text in one piece
#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, title: &str, text: &str) -> Result<ShareOutcome>;
}

/// Writes the export to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutShare;

#[async_trait]
impl ShareTarget for StdoutShare {
    async fn share(&self, title: &str, text: &str) -> Result<ShareOutcome> {
        let mut stdout = tokio::io::stdout();
        let mut payload = text.to_string();
        payload.push('\n');
        stdout
            .write_all(payload.as_bytes())
            .await
            .map_err(|e| JournalError::Export(format!("{}: {}", title, e)))?;
        stdout
            .flush()
            .await
            .map_err(|e| JournalError::Export(format!("{}: {}", title, e)))?;
        Ok(ShareOutcome::Shared)
    }
}

/// Writes the export to a file, replacing it atomically
#[derive(Debug, Clone)]
pub struct FileShare {
    path: PathBuf,
}

impl FileShare {
    pub fn new(path: PathBuf) -> Self {
        FileShare { path }
    }
}

#[async_trait]
impl ShareTarget for FileShare {
    async fn share(&self, title: &str, text: &str) -> Result<ShareOutcome> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                JournalError::Export(format!("Not a file path: {}", self.path.display()))
            })?;
        let temp_path = self.path.with_file_name(format!(".{}.tmp", file_name));

        tokio::fs::write(&temp_path, text)
            .await
            .map_err(|e| JournalError::Export(format!("{}: {}", title, e)))?;
        rename_with_fallback(&temp_path, &self.path)
            .await
            .map_err(|e| JournalError::Export(format!("{}: {}", title, e)))?;

        tracing::info!("Exported journal to {}", self.path.display());
        Ok(ShareOutcome::Shared)
    }
}

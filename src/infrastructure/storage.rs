//! Key-value persistence for entries and the draft checkpoint

use crate::error::{JournalError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::fs;

/// Key holding the JSON array of saved entries
pub const ENTRIES_KEY: &str = "journalEntries";

/// Key holding the draft checkpoint
pub const DRAFT_KEY: &str = "journalDraft";

/// Asynchronous string store. Each call is independently fallible.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never set or has been removed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Store keeping one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    dir: PathBuf,
}

impl FileSystemStore {
    pub fn new(dir: PathBuf) -> Self {
        FileSystemStore { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileSystemStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(JournalError::Persistence(format!(
                "Failed to read '{}': {}",
                key, e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = self.dir.join(format!(".{}.json.tmp", key));

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            JournalError::Persistence(format!(
                "Failed to create store directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        fs::write(&temp_path, value)
            .await
            .map_err(|e| JournalError::Persistence(format!("Failed to write '{}': {}", key, e)))?;
        rename_with_fallback(&temp_path, &path)
            .await
            .map_err(|e| JournalError::Persistence(format!("Failed to write '{}': {}", key, e)))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(JournalError::Persistence(format!(
                "Failed to remove '{}': {}",
                key, e
            ))),
        }
    }
}

/// Rename `temp_path` over `destination`, retrying after removing the
/// destination on platforms where rename refuses to replace.
pub(crate) async fn rename_with_fallback(temp_path: &Path, destination: &Path) -> std::io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination).await {
        let _ = fs::remove_file(destination).await;
        if let Err(retry_err) = fs::rename(temp_path, destination).await {
            let _ = fs::remove_file(temp_path).await;
            return Err(std::io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            ));
        }
    }
    Ok(())
}

/// In-process store with failure injection and write accounting
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<HashMap<String, usize>>,
    latency: Mutex<Option<Duration>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before it takes effect
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = Some(latency);
        self
    }

    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = latency;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `set` and `remove` fail until switched off
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current value without going through the async interface
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Seed a value without counting it as a write
    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    /// Number of successful `set` calls for `key`
    pub fn write_count(&self, key: &str) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    async fn delay(&self) {
        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(JournalError::Persistence(format!(
                "Write to '{}' rejected",
                key
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.delay().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(JournalError::Persistence(format!(
                "Read of '{}' rejected",
                key
            )));
        }
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.delay().await;
        self.check_writable(key)?;
        self.insert(key, value);
        *self
            .writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.delay().await;
        self.check_writable(key)?;
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp.path().join("store"));

        assert_eq!(store.get(ENTRIES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_set_get_remove() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp.path().join("store"));

        store.set(DRAFT_KEY, "{\"title\":\"x\"}").await.unwrap();
        assert!(temp.path().join("store/journalDraft.json").exists());
        assert_eq!(
            store.get(DRAFT_KEY).await.unwrap().as_deref(),
            Some("{\"title\":\"x\"}")
        );

        store.remove(DRAFT_KEY).await.unwrap();
        assert_eq!(store.get(DRAFT_KEY).await.unwrap(), None);
        // Removing twice is fine
        store.remove(DRAFT_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_overwrites_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("store");
        let store = FileSystemStore::new(dir.clone());

        store.set(ENTRIES_KEY, "[]").await.unwrap();
        store.set(ENTRIES_KEY, "[1]").await.unwrap();

        assert_eq!(store.get(ENTRIES_KEY).await.unwrap().as_deref(), Some("[1]"));
        assert!(!dir.join(".journalEntries.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_read_error_is_persistence() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("store");
        std::fs::create_dir_all(dir.join("journalEntries.json")).unwrap();
        let store = FileSystemStore::new(dir);

        let result = store.get(ENTRIES_KEY).await;
        assert!(matches!(result, Err(JournalError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        store.insert(ENTRIES_KEY, "[]");
        assert_eq!(store.write_count(ENTRIES_KEY), 0);

        store.set(ENTRIES_KEY, "[]").await.unwrap();
        store.set(ENTRIES_KEY, "[]").await.unwrap();
        assert_eq!(store.write_count(ENTRIES_KEY), 2);
        assert_eq!(store.write_count(DRAFT_KEY), 0);
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        assert!(store.set(DRAFT_KEY, "{}").await.is_err());
        assert!(store.remove(DRAFT_KEY).await.is_err());
        assert_eq!(store.peek(DRAFT_KEY), None);

        store.fail_writes(false);
        store.fail_reads(true);
        store.set(DRAFT_KEY, "{}").await.unwrap();
        assert!(store.get(DRAFT_KEY).await.is_err());
    }
}

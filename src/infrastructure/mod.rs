//! Infrastructure layer - Storage, configuration and external collaborators

pub mod confirm;
pub mod config;
pub mod root;
pub mod share;
pub mod storage;

pub use config::Config;
pub use confirm::{AutoConfirm, Confirmer, TerminalConfirm};
pub use root::JournalRoot;
pub use share::{FileShare, ShareOutcome, ShareTarget, StdoutShare};
pub use storage::{FileSystemStore, KeyValueStore, MemoryStore, DRAFT_KEY, ENTRIES_KEY};

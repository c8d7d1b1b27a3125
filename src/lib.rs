//! mindjournal - Personal journal with draft recovery
//!
//! Keeps a list of journal entries and a single in-progress draft that is
//! checkpointed in the background, so unsaved text survives a restart.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::JournalError;

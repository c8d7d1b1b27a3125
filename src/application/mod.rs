//! Application layer - Use cases and orchestration

pub mod init;
pub mod manage_config;
pub mod outcome;
pub mod session;

pub use manage_config::ConfigService;
pub use outcome::{
    Checkpoint, DeleteOutcome, DiscardOutcome, LoadReport, Persistence, SaveOutcome,
};
pub use session::{Collaborators, JournalSession};

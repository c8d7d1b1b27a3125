//! Results of session operations
//!
//! In-memory changes and their persistence are reported separately: an
//! operation can succeed in memory while the write behind it failed.

use crate::domain::Entry;
use crate::error::{JournalError, Result};

/// Whether the storage write behind an operation went through
#[derive(Debug)]
pub enum Persistence {
    Durable,
    Failed(JournalError),
}

impl Persistence {
    pub fn is_durable(&self) -> bool {
        matches!(self, Persistence::Durable)
    }

    pub fn error(&self) -> Option<&JournalError> {
        match self {
            Persistence::Durable => None,
            Persistence::Failed(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Persistence::Durable => Ok(()),
            Persistence::Failed(e) => Err(e),
        }
    }

    /// Keep the first failure of two consecutive writes
    pub(crate) fn and(self, next: Result<()>) -> Persistence {
        match (self, next) {
            (Persistence::Durable, Ok(())) => Persistence::Durable,
            (Persistence::Durable, Err(e)) => Persistence::Failed(e),
            (failed, _) => failed,
        }
    }
}

/// What `initialize` found in storage
#[derive(Debug)]
pub struct LoadReport {
    pub entries: usize,
    pub draft_restored: bool,
    /// Set when entries could not be loaded and the session started empty
    pub warning: Option<JournalError>,
}

/// Result of one checkpoint attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Written,
    /// Title and content match the last persisted checkpoint
    Unchanged,
    /// Nothing worth keeping yet
    EmptyContent,
    /// The draft was discarded or committed while the write was pending
    Superseded,
    /// The write failed; logged only
    Failed,
}

#[derive(Debug)]
pub struct SaveOutcome {
    pub entry: Entry,
    /// True for a new entry, false when an existing one was replaced
    pub created: bool,
    pub persistence: Persistence,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted {
        entry: Entry,
        /// The deleted entry was being edited, so the draft went with it
        cleared_draft: bool,
        /// The deleted entry was open in the detail view
        closed_view: bool,
        persistence: Persistence,
    },
}

#[derive(Debug)]
pub enum DiscardOutcome {
    Cancelled,
    Discarded { persistence: Persistence },
}

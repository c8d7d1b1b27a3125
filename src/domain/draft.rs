//! In-progress, unsaved journal text

use super::Entry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Checkpointed form of the draft, as stored under the draft key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub editing_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Text currently being composed, plus the entry it edits (if any)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFields {
    pub title: String,
    pub content: String,
    pub editing_id: Option<String>,
}

impl DraftFields {
    /// Seed fields from an existing entry for editing
    pub fn from_entry(entry: &Entry) -> Self {
        DraftFields {
            title: entry.title.clone(),
            content: entry.content.clone(),
            editing_id: Some(entry.id.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.editing_id.is_none()
    }

    pub fn to_draft(&self, timestamp: DateTime<Utc>) -> Draft {
        Draft {
            title: self.title.clone(),
            content: self.content.clone(),
            editing_id: self.editing_id.clone(),
            timestamp,
        }
    }
}

impl From<Draft> for DraftFields {
    fn from(draft: Draft) -> Self {
        DraftFields {
            title: draft.title,
            content: draft.content,
            editing_id: draft.editing_id,
        }
    }
}

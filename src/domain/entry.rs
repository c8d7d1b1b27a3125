//! Saved journal entries

use crate::error::{JournalError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved, durable journal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Create a new entry with a fresh id. Both timestamps are set to `now`.
    pub fn new(title: String, content: String, now: DateTime<Utc>) -> Self {
        Entry {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace title and content, keeping id and creation time
    pub fn revise(&mut self, title: String, content: String, now: DateTime<Utc>) {
        self.title = title;
        self.content = content;
        self.updated_at = now;
    }
}

/// Reject content that is empty or only whitespace
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(JournalError::Validation(
            "Journal entry cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_entry_has_matching_timestamps() {
        let entry = Entry::new("Title".to_string(), "Body".to_string(), at(9));
        assert_eq!(entry.created_at, entry.updated_at);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_new_entries_get_distinct_ids() {
        let a = Entry::new("a".to_string(), "a".to_string(), at(9));
        let b = Entry::new("b".to_string(), "b".to_string(), at(9));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_revise_keeps_identity() {
        let mut entry = Entry::new("Old".to_string(), "old body".to_string(), at(9));
        let id = entry.id.clone();

        entry.revise("New".to_string(), "new body".to_string(), at(11));

        assert_eq!(entry.id, id);
        assert_eq!(entry.created_at, at(9));
        assert_eq!(entry.updated_at, at(11));
        assert_eq!(entry.content, "new body");
    }

    #[test]
    fn test_serializes_camel_case_fields() {
        let entry = Entry::new("T".to_string(), "C".to_string(), at(9));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("hello").is_ok());
        assert!(matches!(
            validate_content(""),
            Err(JournalError::Validation(_))
        ));
        assert!(matches!(
            validate_content("  \n\t "),
            Err(JournalError::Validation(_))
        ));
    }
}

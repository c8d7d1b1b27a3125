//! Output formatting utilities

use crate::domain::dates::{format_card_date, format_detail_date};
use crate::domain::{DraftFields, Entry};

/// Format entries for display, one per line, newest first
pub fn format_entry_list(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No entries found".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{}  {}  {}\n",
            entry.id,
            format_card_date(&entry.created_at),
            entry.title
        ));
    }
    output
}

/// Format a single entry for the detail view
pub fn format_entry_detail(entry: &Entry) -> String {
    let mut output = format!("# {}\n", entry.title);
    output.push_str(&format!("Created: {}\n", format_detail_date(&entry.created_at)));
    if entry.updated_at != entry.created_at {
        output.push_str(&format!("Updated: {}\n", format_detail_date(&entry.updated_at)));
    }
    output.push('\n');
    output.push_str(&entry.content);
    output.push('\n');
    output
}

/// Format the current draft, if any
pub fn format_draft(draft: &DraftFields) -> String {
    if draft.is_empty() {
        return "No draft".to_string();
    }

    let mut output = String::new();
    match &draft.editing_id {
        Some(id) => output.push_str(&format!("Draft (editing {})\n", id)),
        None => output.push_str("Draft (new entry)\n"),
    }
    if !draft.title.is_empty() {
        output.push_str(&format!("Title: {}\n", draft.title));
    }
    output.push('\n');
    output.push_str(&draft.content);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, TimeZone, Utc};

    fn entry(id: &str, title: &str) -> Entry {
        let created = Local
            .with_ymd_and_hms(2025, 1, 17, 9, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        Entry {
            id: id.to_string(),
            title: title.to_string(),
            content: "Went for a run".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_entry_list(&[]), "No entries found");
    }

    #[test]
    fn test_format_entry_list() {
        let entries = vec![entry("2", "Second"), entry("1", "First")];

        let output = format_entry_list(&entries);
        assert_eq!(
            output,
            "2  Jan 17, 2025  Second\n1  Jan 17, 2025  First\n"
        );
    }

    #[test]
    fn test_format_detail_without_update() {
        let output = format_entry_detail(&entry("1", "Morning"));
        assert!(output.starts_with("# Morning\n"));
        assert!(output.contains("Created: Jan 17, 2025 9:30 AM"));
        assert!(!output.contains("Updated:"));
        assert!(output.ends_with("Went for a run\n"));
    }

    #[test]
    fn test_format_detail_with_update() {
        let mut e = entry("1", "Morning");
        e.updated_at = e.created_at + Duration::hours(5);

        let output = format_entry_detail(&e);
        assert!(output.contains("Updated: Jan 17, 2025 2:30 PM"));
    }

    #[test]
    fn test_format_draft() {
        assert_eq!(format_draft(&DraftFields::default()), "No draft");

        let draft = DraftFields {
            title: String::new(),
            content: "half a thought".to_string(),
            editing_id: Some("42".to_string()),
        };
        let output = format_draft(&draft);
        assert!(output.contains("editing 42"));
        assert!(!output.contains("Title:"));
        assert!(output.contains("half a thought"));
    }
}

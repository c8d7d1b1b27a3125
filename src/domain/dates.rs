//! Clock and date formatting for titles and listings

use chrono::{DateTime, Duration, Local, Utc};
use std::sync::Mutex;

/// Default title format, e.g. "Mar 07, 2024"
pub const TITLE_FORMAT: &str = "%b %d, %Y";

/// Detail view format, e.g. "Mar 07, 2024 4:05 PM"
pub const DETAIL_FORMAT: &str = "%b %d, %Y %-I:%M %p";

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        FixedClock {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Use `title` unless it is blank, otherwise the date of `now` in `format`
pub fn resolve_title(title: &str, now: &DateTime<Local>, format: &str) -> String {
    if title.trim().is_empty() {
        now.format(format).to_string()
    } else {
        title.to_string()
    }
}

/// Compact date for list rows
pub fn format_card_date(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format(TITLE_FORMAT)
        .to_string()
}

/// Date and time for the detail view
pub fn format_detail_date(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format(DETAIL_FORMAT)
        .to_string()
}

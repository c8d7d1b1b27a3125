//! Domain layer - Journal records and pure rules

pub mod dates;
pub mod draft;
pub mod entry;

pub use dates::{Clock, FixedClock, SystemClock};
pub use draft::{Draft, DraftFields};
pub use entry::{validate_content, Entry};

//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, DraftAction};
pub use output::{format_draft, format_entry_detail, format_entry_list};

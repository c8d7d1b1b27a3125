//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mindjournal")]
#[command(about = "Personal journal with draft recovery", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new journal
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List entries, newest first
    List,

    /// Show a single entry
    Show {
        /// Entry id
        id: String,
    },

    /// Write a new entry (content is read from stdin when omitted)
    Write {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        /// Only checkpoint the text as a draft, do not save it
        #[arg(long)]
        keep_draft: bool,
    },

    /// Compose an entry line by line from stdin, autosaving the draft
    Compose {
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Edit an existing entry
    Edit {
        /// Entry id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Inspect, save or discard the recovered draft
    Draft {
        #[command(subcommand)]
        action: Option<DraftAction>,
    },

    /// Export all entries as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DraftAction {
    /// Show the draft (default)
    Show,

    /// Save the draft as an entry
    Save,

    /// Discard the draft
    Discard {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

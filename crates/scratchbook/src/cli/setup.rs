use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scratchbook",
    bin_name = "scratchbook",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Plain text note library with a scratch pad", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Library directory (overrides SCRATCHBOOK_LIBRARY and config)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub library: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes in the library
    #[command(alias = "ls")]
    List,

    /// Print a note
    #[command(alias = "cat")]
    Show {
        /// Note path, relative to the library
        path: String,
    },

    /// Store a new note without opening it
    Create {
        /// Note path, relative to the library
        path: String,

        /// Display name (defaults to the file name)
        #[arg(long, short)]
        name: Option<String>,

        /// Initial text of the note
        #[arg(long, short)]
        content: Option<String>,
    },

    /// Create a note through the editor, optionally moving the last block of another note into it
    New {
        /// Note path, relative to the library
        path: String,

        /// Display name (defaults to the file name)
        #[arg(long, short)]
        name: Option<String>,

        /// Move the last block of this note into the new one
        #[arg(long, value_name = "PATH")]
        from: Option<String>,
    },

    /// Rename a note, optionally moving it to a new path
    #[command(alias = "mv")]
    Rename {
        /// Note path, relative to the library
        path: String,

        /// New display name
        name: String,

        /// New note path
        #[arg(long, value_name = "PATH")]
        to: Option<String>,
    },

    /// Delete a note (the scratch note can't be deleted)
    #[command(alias = "rm")]
    Delete {
        /// Note path, relative to the library
        path: String,
    },

    /// Show the library session state
    Status {
        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },
}

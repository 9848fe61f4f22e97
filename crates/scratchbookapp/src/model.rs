//! # Domain Model: Notes, Paths and the Index
//!
//! A library is a flat namespace of notes addressed by **path**: a `/`-separated
//! string relative to the library root (e.g. `scratch.txt`, `work/todo.txt`).
//! The path is the identity of a note. Renaming a note's display name never
//! changes its path; moving a note changes its path and nothing else.
//!
//! ## The Scratch Note
//!
//! Every library has a scratch note at [`SCRATCH_PATH`]. It is the default open
//! note, the fallback after a delete or reload, and it can never be deleted.
//! The index always contains it, even when the backing store has not written
//! the file yet.
//!
//! ## The Index
//!
//! [`NoteIndex`] maps path to [`NoteMetadata`]. It is a read model: it is
//! rebuilt wholesale from the repository after every mutation and never edited
//! entry by entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{LibraryError, Result};

/// Path of the always-present scratch note.
pub const SCRATCH_PATH: &str = "scratch.txt";

/// Display name used for the scratch note when its file carries no name.
pub const SCRATCH_NAME: &str = "Scratch";

/// Upper bound on the recent notes list.
pub const MAX_RECENT_NOTES: usize = 100;

/// Extension used for note files.
pub const NOTE_EXT: &str = ".txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl NoteMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modified: None,
        }
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn scratch() -> Self {
        Self::new(SCRATCH_NAME)
    }
}

/// Path → metadata for every note in the library, ordered by path.
pub type NoteIndex = BTreeMap<String, NoteMetadata>;

/// Name shown for a note whose stored metadata has no name: the file stem.
pub fn fallback_name(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(NOTE_EXT).unwrap_or(file).to_string()
}

/// Checks that `path` is a relative, `/`-separated note path that stays inside
/// the library root.
pub fn validate_note_path(path: &str) -> Result<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.contains('\0')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(LibraryError::InvalidPath(path.to_string()));
    }
    Ok(())
}

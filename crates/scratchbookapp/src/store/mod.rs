//! # Storage Layer
//!
//! The library never touches storage directly. Everything goes through the
//! [`NoteRepository`] trait, which deals in note paths and serialized note
//! text (see [`crate::format`]).
//!
//! ## Contract
//!
//! - `list` returns the whole library. There are no per-entry change
//!   notifications; callers rebuild their index from the full listing.
//! - `create` refuses to overwrite: an existing path is `NoteExists`.
//! - `delete` and `move_note` fail with `NoteNotFound` for unknown paths, and
//!   `move_note` refuses to overwrite an existing destination.
//! - `on_root_changed` registers a callback fired whenever the storage root
//!   identity changes (the whole library was swapped out underneath us).
//!   Callbacks run synchronously on the notifying thread and must not block.
//!
//! ## Implementations
//!
//! - [`fs::FsRepository`]: a directory of note files.
//! - [`memory::InMemoryRepository`]: for testing logic without filesystem I/O.

use async_trait::async_trait;

use crate::error::Result;
use crate::format::NoteFormat;
use crate::model::{fallback_name, NoteIndex, NoteMetadata};

pub mod fs;
pub mod memory;

/// Notification fired when the repository's root changes.
pub type RootChangedCallback = Box<dyn Fn() + Send + Sync>;

/// Index metadata for a stored note. An unreadable metadata header does not
/// hide the note from the listing; it is listed under its file stem.
pub(crate) fn metadata_from_note(path: &str, text: &str) -> NoteMetadata {
    match NoteFormat::parse(text) {
        Ok(note) => match note.name() {
            Some(name) if !name.is_empty() => NoteMetadata::new(name),
            _ => NoteMetadata::new(fallback_name(path)),
        },
        Err(e) => {
            tracing::warn!(path, error = %e, "unreadable note metadata");
            NoteMetadata::new(fallback_name(path))
        }
    }
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List every note with its metadata
    async fn list(&self) -> Result<NoteIndex>;

    /// Read the serialized note at `path`
    async fn load(&self, path: &str) -> Result<String>;

    /// Overwrite the serialized note at `path`, creating it if missing
    async fn save(&self, path: &str, content: &str) -> Result<()>;

    /// Create a new note; fails if `path` is taken
    async fn create(&self, path: &str, content: &str) -> Result<()>;

    /// Delete the note at `path`
    async fn delete(&self, path: &str) -> Result<()>;

    /// Move the note at `old_path` to `new_path`
    async fn move_note(&self, old_path: &str, new_path: &str) -> Result<()>;

    /// Register a callback for storage root changes
    fn on_root_changed(&self, callback: RootChangedCallback);
}

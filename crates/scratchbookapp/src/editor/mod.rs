//! # Editor Integration
//!
//! The library does not edit text. It delegates content-level work to the
//! **active editor**: whatever editing surface the host has bound to the open
//! note. The controller only needs the narrow capability set in
//! [`ActiveEditor`]; cursor handling, selection and highlighting live on the
//! other side of that trait.
//!
//! The controller holds the active editor as an optional [`EditorHandle`]. It
//! does not own the editor's lifetime: the host binds and unbinds it, and the
//! controller drops its handle whenever the note under it goes away (delete,
//! reload).
//!
//! - [`buffer::BufferEditor`]: headless editor over a repository, used by the
//!   CLI and tests.
//! - [`cache`]: the editor instance cache keyed by note path.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;

pub mod buffer;
pub mod cache;

#[async_trait]
pub trait ActiveEditor: Send + Sync {
    /// Path of the note this editor is bound to
    fn path(&self) -> String;

    /// Move the active block into a new note at `path` and switch to it
    async fn create_new_note_from_active_block(&self, path: &str, name: &str) -> Result<()>;

    /// Create an empty note at `path` and switch to it
    async fn create_new_note(&self, path: &str, name: &str) -> Result<()>;

    /// Set the display name of the bound note (persisted on the next save)
    fn set_name(&self, name: &str);

    /// Persist the bound note
    async fn save(&self) -> Result<()>;

    /// Presentational state, mirrored by the controller for display
    fn status(&self) -> NoteStatus {
        NoteStatus::default()
    }
}

pub type EditorHandle = Arc<dyn ActiveEditor>;

/// Display mirror of the open note. Never a source of truth: the editor owns
/// these values and pushes them to the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStatus {
    pub name: Option<String>,
    pub language: Option<String>,
    pub language_auto: Option<bool>,
    pub cursor_line: Option<usize>,
    pub selection_size: Option<usize>,
}

//! # Library State Controller
//!
//! [`Library`] holds the session state of a note library and is the only
//! entry point for changing it. It composes three collaborators:
//!
//! - a [`NoteRepository`] that stores notes,
//! - an [`EditorCache`] that owns per-path editor instances,
//! - the optional active editor ([`EditorHandle`]) bound by the host.
//!
//! ## State
//!
//! | Field | Default | Reset on reload |
//! |-------|---------|-----------------|
//! | note index | repository listing + scratch | rebuilt |
//! | current note path | scratch | yes |
//! | active editor | none | yes |
//! | note status mirror | empty | yes |
//! | recent notes | `[scratch]` | no |
//! | dialog | none | no |
//! | library generation | 0 | incremented |
//!
//! ## Serialization of Mutations
//!
//! Async mutating actions (`refresh_index`, `save_new_note`,
//! `update_note_metadata`, `delete_note`, `reload_library`, `create_new_note*`)
//! all run under one writer lock, so their repository effects never
//! interleave. The state itself sits behind a synchronous lock that is never
//! held across an `.await`; the synchronous actions (opening notes and
//! dialogs, binding the editor) only take that lock.
//!
//! ## Partial Failures
//!
//! Nothing is rolled back. When a repository call fails after the controller
//! already changed local state (navigated away, freed a cached editor, saved
//! a rename), the library is flagged with [`Library::needs_reload`] and
//! the error is returned unchanged. [`Library::reload_library`] clears the
//! flag.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

use crate::config::LibraryConfig;
use crate::dialog::{CreateNoteMode, CreateNoteParams, Dialog};
use crate::editor::cache::EditorCache;
use crate::editor::{EditorHandle, NoteStatus};
use crate::error::{LibraryError, Result};
use crate::format::NoteFormat;
use crate::model::{NoteIndex, NoteMetadata};
use crate::recent::RecentNotes;
use crate::store::NoteRepository;

struct LibraryState {
    notes: NoteIndex,
    recent: RecentNotes,
    current_note_path: String,
    active_editor: Option<EditorHandle>,
    status: NoteStatus,
    generation: u64,
    dialog: Option<Dialog>,
    needs_reload: bool,
}

impl LibraryState {
    fn new(scratch_path: &str, max_recent: usize) -> Self {
        let mut notes = NoteIndex::new();
        notes.insert(scratch_path.to_string(), NoteMetadata::scratch());
        Self {
            notes,
            recent: RecentNotes::new(scratch_path, max_recent),
            current_note_path: scratch_path.to_string(),
            active_editor: None,
            status: NoteStatus::default(),
            generation: 0,
            dialog: None,
            needs_reload: false,
        }
    }

    fn open_note(&mut self, path: &str) {
        self.dialog = None;
        self.current_note_path = path.to_string();
        self.recent.touch(path);
    }

    /// Drop the editor and fall back to the scratch note in one step.
    fn leave_to_scratch(&mut self, scratch_path: &str) {
        self.active_editor = None;
        self.current_note_path = scratch_path.to_string();
        self.status = NoteStatus::default();
    }
}

/// Observable session state, for hosts that render or persist it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySnapshot {
    pub current_note_path: String,
    pub status: NoteStatus,
    pub recent_note_paths: Vec<String>,
    pub dialog: Option<Dialog>,
    pub library_generation: u64,
    pub needs_reload: bool,
    pub has_active_editor: bool,
    pub notes: NoteIndex,
}

pub struct Library<R: NoteRepository, C: EditorCache> {
    repository: Arc<R>,
    cache: Arc<C>,
    scratch_path: String,
    state: RwLock<LibraryState>,
    writer: Mutex<()>,
}

impl<R, C> Library<R, C>
where
    R: NoteRepository + 'static,
    C: EditorCache + 'static,
{
    /// Startup sequencing: hook storage root changes up to
    /// [`Library::reload_library`], then populate the index.
    ///
    /// Must be called from within a tokio runtime; reloads triggered by the
    /// repository are spawned onto it.
    pub async fn start(repository: Arc<R>, cache: Arc<C>, config: &LibraryConfig) -> Result<Arc<Self>> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| LibraryError::InvalidState(format!("no async runtime: {}", e)))?;
        let library = Arc::new(Self::new(repository, cache, config));

        let weak: Weak<Self> = Arc::downgrade(&library);
        library.repository.on_root_changed(Box::new(move || {
            let Some(library) = weak.upgrade() else {
                return;
            };
            runtime.spawn(async move {
                if let Err(e) = library.reload_library().await {
                    tracing::error!(error = %e, "library reload failed");
                }
            });
        }));

        library.refresh_index().await?;
        tracing::info!(notes = library.state.read().notes.len(), "library started");
        Ok(library)
    }
}

impl<R: NoteRepository, C: EditorCache> Library<R, C> {
    pub fn new(repository: Arc<R>, cache: Arc<C>, config: &LibraryConfig) -> Self {
        let scratch_path = config.scratch_path();
        let state = LibraryState::new(&scratch_path, config.max_recent());
        Self {
            repository,
            cache,
            scratch_path,
            state: RwLock::new(state),
            writer: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    pub fn scratch_path(&self) -> &str {
        &self.scratch_path
    }

    // --- Index ---

    /// Replace the index with the repository's current listing.
    pub async fn refresh_index(&self) -> Result<()> {
        let _writer = self.writer.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<()> {
        let mut notes = self.repository.list().await?;
        notes
            .entry(self.scratch_path.clone())
            .or_insert_with(NoteMetadata::scratch);
        tracing::debug!(count = notes.len(), "note index refreshed");
        self.state.write().notes = notes;
        Ok(())
    }

    // --- Navigation and dialogs ---

    pub fn open_note(&self, path: &str) {
        tracing::debug!(path, "open note");
        self.state.write().open_note(path);
    }

    pub fn open_language_selector(&self) {
        self.state.write().dialog = Some(Dialog::LanguageSelector);
    }

    pub fn open_note_selector(&self) {
        self.state.write().dialog = Some(Dialog::NoteSelector);
    }

    pub fn open_create_note(&self, mode: Option<CreateNoteMode>, name_suggestion: Option<&str>) {
        self.state.write().dialog = Some(Dialog::create_note(mode, name_suggestion));
    }

    pub fn close_dialog(&self) {
        self.state.write().dialog = None;
    }

    /// Close the note selector, leaving any other dialog open.
    pub fn close_note_selector(&self) {
        let mut state = self.state.write();
        if state.dialog.as_ref().is_some_and(Dialog::is_note_selector) {
            state.dialog = None;
        }
    }

    /// Switch to `path` if it is not already open, then show the edit dialog.
    pub fn edit_note(&self, path: &str) {
        let mut state = self.state.write();
        if state.current_note_path != path {
            state.open_note(path);
        }
        state.dialog = Some(Dialog::EditNote);
    }

    // --- Active editor ---

    pub fn bind_editor(&self, editor: EditorHandle) {
        let mut state = self.state.write();
        tracing::debug!(path = %editor.path(), "editor bound");
        state.status = editor.status();
        state.active_editor = Some(editor);
    }

    pub fn unbind_editor(&self) {
        self.state.write().active_editor = None;
    }

    pub fn active_editor(&self) -> Option<EditorHandle> {
        self.state.read().active_editor.clone()
    }

    pub fn set_note_status(&self, status: NoteStatus) {
        self.state.write().status = status;
    }

    /// Pull the status mirror from the bound editor, if any.
    pub fn sync_note_status(&self) {
        let mut state = self.state.write();
        if let Some(editor) = state.active_editor.clone() {
            state.status = editor.status();
        }
    }

    fn require_editor(&self) -> Result<EditorHandle> {
        self.active_editor()
            .ok_or_else(|| LibraryError::InvalidState("no active editor".to_string()))
    }

    // --- Note lifecycle ---

    /// Ask the active editor to move its active block into a new note.
    pub async fn create_new_note_from_active_block(&self, path: &str, name: &str) -> Result<()> {
        let _writer = self.writer.lock().await;
        let editor = self.require_editor()?;
        editor.create_new_note_from_active_block(path, name).await?;
        self.after_editor_created(path).await
    }

    /// Ask the active editor to create an empty note.
    pub async fn create_new_note(&self, path: &str, name: &str) -> Result<()> {
        let _writer = self.writer.lock().await;
        let editor = self.require_editor()?;
        editor.create_new_note(path, name).await?;
        self.after_editor_created(path).await
    }

    async fn after_editor_created(&self, path: &str) -> Result<()> {
        self.refresh_locked()
            .await
            .map_err(|e| self.flag_needs_reload(e))?;
        self.state.write().open_note(path);
        self.sync_note_status();
        Ok(())
    }

    /// Store a new note without navigating to it.
    pub async fn save_new_note(&self, path: &str, name: &str, content: &str) -> Result<()> {
        let _writer = self.writer.lock().await;
        if self.state.read().notes.contains_key(path) {
            return Err(LibraryError::DuplicateNote(path.to_string()));
        }

        let note = NoteFormat::new(name, content);
        self.repository.create(path, &note.serialize()?).await?;
        tracing::debug!(path, name, "note created");
        self.refresh_locked()
            .await
            .map_err(|e| self.flag_needs_reload(e))
    }

    /// Rename the active note and optionally move it to `new_path`.
    pub async fn update_note_metadata(
        &self,
        path: &str,
        name: &str,
        new_path: Option<&str>,
    ) -> Result<()> {
        let _writer = self.writer.lock().await;
        let editor = self.require_editor()?;
        let editor_path = editor.path();
        if editor_path != path {
            return Err(LibraryError::InvalidState(format!(
                "can't update note ({}) since it's not the active one ({})",
                path, editor_path
            )));
        }

        editor.set_name(name);
        editor.save().await?;
        self.state.write().status.name = Some(name.to_string());

        let Some(new_path) = new_path.filter(|p| *p != path) else {
            return Ok(());
        };

        self.cache.free_editor(path);
        if let Err(e) = self.repository.move_note(path, new_path).await {
            return Err(self.flag_needs_reload(e));
        }
        tracing::debug!(from = path, to = new_path, "note moved");

        {
            let mut state = self.state.write();
            // The bound editor still points at the old path.
            state.active_editor = None;
            state.open_note(new_path);
        }
        self.refresh_locked()
            .await
            .map_err(|e| self.flag_needs_reload(e))
    }

    pub async fn delete_note(&self, path: &str) -> Result<()> {
        if path == self.scratch_path {
            return Err(LibraryError::IllegalOperation(
                "cannot delete the scratch note".to_string(),
            ));
        }
        let _writer = self.writer.lock().await;

        {
            let mut state = self.state.write();
            let editor_on_path = state
                .active_editor
                .as_ref()
                .is_some_and(|editor| editor.path() == path);
            if editor_on_path || state.current_note_path == path {
                state.leave_to_scratch(&self.scratch_path);
            }
        }
        self.cache.free_editor(path);

        if let Err(e) = self.repository.delete(path).await {
            return Err(self.flag_needs_reload(e));
        }
        tracing::debug!(path, "note deleted");
        self.refresh_locked()
            .await
            .map_err(|e| self.flag_needs_reload(e))
    }

    /// Rebuild everything after the storage root changed.
    pub async fn reload_library(&self) -> Result<()> {
        let _writer = self.writer.lock().await;
        self.refresh_locked().await?;
        self.cache.clear_cache(false);

        let mut state = self.state.write();
        state.leave_to_scratch(&self.scratch_path);
        state.generation += 1;
        state.needs_reload = false;
        tracing::info!(generation = state.generation, "library reloaded");
        Ok(())
    }

    fn flag_needs_reload(&self, error: LibraryError) -> LibraryError {
        tracing::warn!(error = %error, "library state may be stale, reload required");
        self.state.write().needs_reload = true;
        error
    }

    // --- Read accessors ---

    pub fn notes(&self) -> NoteIndex {
        self.state.read().notes.clone()
    }

    pub fn current_note_path(&self) -> String {
        self.state.read().current_note_path.clone()
    }

    pub fn recent_note_paths(&self) -> Vec<String> {
        self.state.read().recent.paths().to_vec()
    }

    pub fn dialog(&self) -> Option<Dialog> {
        self.state.read().dialog.clone()
    }

    pub fn create_note_params(&self) -> Option<CreateNoteParams> {
        match &self.state.read().dialog {
            Some(Dialog::CreateNote(params)) => Some(params.clone()),
            _ => None,
        }
    }

    pub fn note_status(&self) -> NoteStatus {
        self.state.read().status.clone()
    }

    pub fn library_generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn needs_reload(&self) -> bool {
        self.state.read().needs_reload
    }

    pub fn snapshot(&self) -> LibrarySnapshot {
        let state = self.state.read();
        LibrarySnapshot {
            current_note_path: state.current_note_path.clone(),
            status: state.status.clone(),
            recent_note_paths: state.recent.paths().to_vec(),
            dialog: state.dialog.clone(),
            library_generation: state.generation,
            needs_reload: state.needs_reload,
            has_active_editor: state.active_editor.is_some(),
            notes: state.notes.clone(),
        }
    }
}

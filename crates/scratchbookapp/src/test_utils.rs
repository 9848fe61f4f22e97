use async_trait::async_trait;
use parking_lot::Mutex;

use crate::editor::{ActiveEditor, NoteStatus};
use crate::error::{LibraryError, Result};

/// A call received by [`RecordingEditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCall {
    CreateFromActiveBlock(String, String),
    CreateNew(String, String),
    SetName(String),
    Save,
}

/// Editor double that records every call and never touches storage.
///
/// Creating a note rebinds the editor to the new path, like a real editor
/// switching to the note it just created.
pub struct RecordingEditor {
    path: Mutex<String>,
    calls: Mutex<Vec<EditorCall>>,
    failure: Mutex<Option<String>>,
}

impl RecordingEditor {
    pub fn new(path: &str) -> Self {
        Self {
            path: Mutex::new(path.to_string()),
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every async operation fail with `LibraryError::Editor(message)`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<EditorCall> {
        self.calls.lock().clone()
    }

    fn check(&self) -> Result<()> {
        match self.failure.lock().as_ref() {
            Some(message) => Err(LibraryError::Editor(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ActiveEditor for RecordingEditor {
    fn path(&self) -> String {
        self.path.lock().clone()
    }

    async fn create_new_note_from_active_block(&self, path: &str, name: &str) -> Result<()> {
        self.calls
            .lock()
            .push(EditorCall::CreateFromActiveBlock(path.into(), name.into()));
        self.check()?;
        *self.path.lock() = path.to_string();
        Ok(())
    }

    async fn create_new_note(&self, path: &str, name: &str) -> Result<()> {
        self.calls
            .lock()
            .push(EditorCall::CreateNew(path.into(), name.into()));
        self.check()?;
        *self.path.lock() = path.to_string();
        Ok(())
    }

    fn set_name(&self, name: &str) {
        self.calls.lock().push(EditorCall::SetName(name.into()));
    }

    async fn save(&self) -> Result<()> {
        self.calls.lock().push(EditorCall::Save);
        self.check()
    }

    fn status(&self) -> NoteStatus {
        NoteStatus {
            language: Some("text".to_string()),
            language_auto: Some(true),
            cursor_line: Some(1),
            selection_size: Some(0),
            ..Default::default()
        }
    }
}

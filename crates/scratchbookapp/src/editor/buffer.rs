use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use super::{ActiveEditor, NoteStatus};
use crate::error::{LibraryError, Result};
use crate::format::NoteFormat;
use crate::store::NoteRepository;

struct Buffer {
    path: String,
    note: NoteFormat,
}

/// A headless editor: the note is held in memory and written back through the
/// repository on [`ActiveEditor::save`].
///
/// The cursor is considered to sit at the end of the note, so the active
/// block is always the last one.
pub struct BufferEditor<R: NoteRepository> {
    repository: Arc<R>,
    buffer: Mutex<Buffer>,
}

impl<R: NoteRepository> BufferEditor<R> {
    pub async fn open(repository: Arc<R>, path: &str) -> Result<Self> {
        let text = repository.load(path).await?;
        let note = NoteFormat::parse(&text)?;
        Ok(Self::with_note(repository, path, note))
    }

    /// Bind to `note` at `path` without touching storage.
    pub fn with_note(repository: Arc<R>, path: &str, note: NoteFormat) -> Self {
        Self {
            repository,
            buffer: Mutex::new(Buffer {
                path: path.to_string(),
                note,
            }),
        }
    }

    pub fn content(&self) -> String {
        self.buffer.lock().note.content.clone()
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.buffer.lock().note.content = content.into();
    }

    pub fn name(&self) -> Option<String> {
        self.buffer.lock().note.name().map(str::to_string)
    }

    fn rebind(&self, path: &str, note: NoteFormat) {
        let mut buffer = self.buffer.lock();
        buffer.path = path.to_string();
        buffer.note = note;
    }
}

#[async_trait]
impl<R: NoteRepository> ActiveEditor for BufferEditor<R> {
    fn path(&self) -> String {
        self.buffer.lock().path.clone()
    }

    async fn create_new_note_from_active_block(&self, path: &str, name: &str) -> Result<()> {
        let (old_path, remaining, block) = {
            let buffer = self.buffer.lock();
            let mut remaining = buffer.note.clone();
            let block = remaining.take_last_block().ok_or_else(|| {
                LibraryError::Editor(format!("Note {} has no active block", buffer.path))
            })?;
            (buffer.path.clone(), remaining, block)
        };

        let new_note = NoteFormat::new(name, block.render());
        let remaining_text = remaining.serialize()?;
        self.repository.create(path, &new_note.serialize()?).await?;

        // The block now lives in the new note; drop it from the old one. If
        // that fails the new note goes away again, so the block stays in one place.
        if let Err(e) = self.repository.save(&old_path, &remaining_text).await {
            if let Err(cleanup) = self.repository.delete(path).await {
                tracing::warn!(path, error = %cleanup, "block now exists in two notes");
            }
            return Err(e);
        }
        tracing::debug!(from = %old_path, to = %path, "moved active block to new note");

        self.rebind(path, new_note);
        Ok(())
    }

    async fn create_new_note(&self, path: &str, name: &str) -> Result<()> {
        let note = NoteFormat::new(name, NoteFormat::empty_content());
        self.repository.create(path, &note.serialize()?).await?;
        self.rebind(path, note);
        Ok(())
    }

    fn set_name(&self, name: &str) {
        self.buffer.lock().note.set_name(name);
    }

    async fn save(&self) -> Result<()> {
        let (path, text) = {
            let buffer = self.buffer.lock();
            (buffer.path.clone(), buffer.note.serialize()?)
        };
        self.repository.save(&path, &text).await
    }

    fn status(&self) -> NoteStatus {
        let buffer = self.buffer.lock();
        let last = buffer.note.blocks().pop();
        NoteStatus {
            name: buffer.note.name().map(str::to_string),
            language: last.as_ref().map(|b| b.language.clone()),
            language_auto: last.as_ref().map(|b| b.auto_detect),
            cursor_line: Some(buffer.note.content.lines().count()),
            selection_size: Some(0),
        }
    }
}

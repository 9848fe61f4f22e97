//! Filesystem-backed repository.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── scratch.txt
//! ├── todo.txt
//! └── work/
//!     └── standup.txt
//! ```
//!
//! Note paths map one to one onto files below the root. Only `*.txt` files are
//! listed; dotfiles (including in-flight `.{uuid}.tmp` writes) are ignored.
//! Every write goes to a temporary file in the destination directory and is
//! renamed into place, so readers never observe a partially written note.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use super::{metadata_from_note, NoteRepository, RootChangedCallback};
use crate::error::{LibraryError, Result};
use crate::model::{validate_note_path, NoteIndex, NOTE_EXT};

pub struct FsRepository {
    root: RwLock<PathBuf>,
    callbacks: Mutex<Vec<RootChangedCallback>>,
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: RwLock::new(root.into()),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.root.read().clone()
    }

    /// Point the repository at a different library directory and notify
    /// every registered listener.
    pub fn set_root(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        tracing::info!(root = %root.display(), "library root changed");
        *self.root.write() = root;
        for callback in self.callbacks.lock().iter() {
            callback();
        }
    }

    /// Absolute file path for a note path.
    pub fn note_file(&self, path: &str) -> Result<PathBuf> {
        validate_note_path(path)?;
        let mut file = self.root();
        for segment in path.split('/') {
            file.push(segment);
        }
        Ok(file)
    }

    async fn ensure_parent(file: &Path) -> Result<()> {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn atomic_write(file: &Path, content: &str) -> Result<()> {
        Self::ensure_parent(file).await?;
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let tmp_file = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).await?;
        if let Err(e) = fs::rename(&tmp_file, file).await {
            let _ = fs::remove_file(&tmp_file).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn exists(file: &Path) -> Result<bool> {
        Ok(fs::try_exists(file).await?)
    }
}

fn not_found_as(err: std::io::Error, path: &str) -> LibraryError {
    if err.kind() == ErrorKind::NotFound {
        LibraryError::NoteNotFound(path.to_string())
    } else {
        LibraryError::Io(err)
    }
}

fn is_note_file(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(NOTE_EXT)
}

#[async_trait]
impl NoteRepository for FsRepository {
    async fn list(&self) -> Result<NoteIndex> {
        let root = self.root();
        let mut index = NoteIndex::new();
        if !Self::exists(&root).await? {
            return Ok(index);
        }

        // Directories still to visit, with their note path prefix.
        let mut pending = vec![(root, String::new())];
        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let file_type = entry.file_type().await?;
                let note_path = format!("{}{}", prefix, name);

                if file_type.is_dir() {
                    if !name.starts_with('.') {
                        pending.push((entry.path(), format!("{}/", note_path)));
                    }
                    continue;
                }
                if !file_type.is_file() || !is_note_file(&name) {
                    continue;
                }

                let text = fs::read_to_string(entry.path()).await?;
                let mut metadata = metadata_from_note(&note_path, &text);
                if let Ok(modified) = entry.metadata().await.and_then(|m| m.modified()) {
                    metadata = metadata.with_modified(DateTime::<Utc>::from(modified));
                }
                index.insert(note_path, metadata);
            }
        }
        Ok(index)
    }

    async fn load(&self, path: &str) -> Result<String> {
        let file = self.note_file(path)?;
        fs::read_to_string(&file)
            .await
            .map_err(|e| not_found_as(e, path))
    }

    async fn save(&self, path: &str, content: &str) -> Result<()> {
        let file = self.note_file(path)?;
        Self::atomic_write(&file, content).await
    }

    async fn create(&self, path: &str, content: &str) -> Result<()> {
        let file = self.note_file(path)?;
        if Self::exists(&file).await? {
            return Err(LibraryError::NoteExists(path.to_string()));
        }
        Self::atomic_write(&file, content).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let file = self.note_file(path)?;
        fs::remove_file(&file)
            .await
            .map_err(|e| not_found_as(e, path))
    }

    async fn move_note(&self, old_path: &str, new_path: &str) -> Result<()> {
        let from = self.note_file(old_path)?;
        let to = self.note_file(new_path)?;
        if !Self::exists(&from).await? {
            return Err(LibraryError::NoteNotFound(old_path.to_string()));
        }
        if Self::exists(&to).await? {
            return Err(LibraryError::NoteExists(new_path.to_string()));
        }
        Self::ensure_parent(&to).await?;
        fs::rename(&from, &to)
            .await
            .map_err(|e| not_found_as(e, old_path))
    }

    fn on_root_changed(&self, callback: RootChangedCallback) {
        self.callbacks.lock().push(callback);
    }
}

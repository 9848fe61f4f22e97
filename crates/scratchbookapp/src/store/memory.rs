use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use super::{metadata_from_note, NoteRepository, RootChangedCallback};
use crate::error::{LibraryError, Result};
use crate::model::{validate_note_path, NoteIndex};

/// A repository call, as recorded by [`InMemoryRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOp {
    List,
    Load(String),
    Save(String),
    Create(String),
    Delete(String),
    Move(String, String),
}

impl RepoOp {
    pub fn is_write(&self) -> bool {
        !matches!(self, RepoOp::List | RepoOp::Load(_))
    }
}

#[derive(Default)]
struct MemState {
    notes: BTreeMap<String, String>,
    ops: Vec<RepoOp>,
    simulate_write_error: bool,
    failing_path: Option<String>,
}

/// In-memory note repository for testing.
///
/// Every call is appended to an operation log (see [`InMemoryRepository::ops`])
/// so tests can assert on the exact sequence of repository effects.
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<MemState>,
    callbacks: Mutex<Vec<RootChangedCallback>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a note without recording an operation.
    pub fn insert_raw(&self, path: &str, serialized: &str) {
        self.state
            .lock()
            .notes
            .insert(path.to_string(), serialized.to_string());
    }

    /// Stored text of a note, bypassing the operation log.
    pub fn raw(&self, path: &str) -> Option<String> {
        self.state.lock().notes.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().notes.contains_key(path)
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state.lock().simulate_write_error = simulate;
    }

    /// Make writes to `path` fail while every other path stays writable.
    pub fn set_failing_path(&self, path: Option<&str>) {
        self.state.lock().failing_path = path.map(str::to_string);
    }

    pub fn ops(&self) -> Vec<RepoOp> {
        self.state.lock().ops.clone()
    }

    pub fn write_ops(&self) -> Vec<RepoOp> {
        self.state
            .lock()
            .ops
            .iter()
            .filter(|op| op.is_write())
            .cloned()
            .collect()
    }

    pub fn clear_ops(&self) {
        self.state.lock().ops.clear();
    }

    /// Replace the whole library, as if the storage root had been pointed
    /// somewhere else, and notify listeners.
    pub fn swap_library<I, P, C>(&self, notes: I)
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        {
            let mut state = self.state.lock();
            state.notes = notes
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect();
        }
        self.trigger_root_changed();
    }

    pub fn trigger_root_changed(&self) {
        for callback in self.callbacks.lock().iter() {
            callback();
        }
    }

    fn record(&self, op: RepoOp) -> parking_lot::MutexGuard<'_, MemState> {
        let mut state = self.state.lock();
        state.ops.push(op);
        state
    }

    fn check_writable(state: &MemState, path: &str) -> Result<()> {
        if state.simulate_write_error || state.failing_path.as_deref() == Some(path) {
            return Err(LibraryError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn list(&self) -> Result<NoteIndex> {
        let state = self.record(RepoOp::List);
        Ok(state
            .notes
            .iter()
            .map(|(path, text)| (path.clone(), metadata_from_note(path, text)))
            .collect())
    }

    async fn load(&self, path: &str) -> Result<String> {
        let state = self.record(RepoOp::Load(path.to_string()));
        state
            .notes
            .get(path)
            .cloned()
            .ok_or_else(|| LibraryError::NoteNotFound(path.to_string()))
    }

    async fn save(&self, path: &str, content: &str) -> Result<()> {
        let mut state = self.record(RepoOp::Save(path.to_string()));
        Self::check_writable(&state, path)?;
        validate_note_path(path)?;
        state.notes.insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn create(&self, path: &str, content: &str) -> Result<()> {
        let mut state = self.record(RepoOp::Create(path.to_string()));
        Self::check_writable(&state, path)?;
        validate_note_path(path)?;
        if state.notes.contains_key(path) {
            return Err(LibraryError::NoteExists(path.to_string()));
        }
        state.notes.insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut state = self.record(RepoOp::Delete(path.to_string()));
        Self::check_writable(&state, path)?;
        state
            .notes
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| LibraryError::NoteNotFound(path.to_string()))
    }

    async fn move_note(&self, old_path: &str, new_path: &str) -> Result<()> {
        let mut state = self.record(RepoOp::Move(old_path.to_string(), new_path.to_string()));
        Self::check_writable(&state, old_path)?;
        validate_note_path(new_path)?;
        if state.notes.contains_key(new_path) {
            return Err(LibraryError::NoteExists(new_path.to_string()));
        }
        let text = state
            .notes
            .remove(old_path)
            .ok_or_else(|| LibraryError::NoteNotFound(old_path.to_string()))?;
        state.notes.insert(new_path.to_string(), text);
        Ok(())
    }

    fn on_root_changed(&self, callback: RootChangedCallback) {
        self.callbacks.lock().push(callback);
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::format::NoteFormat;
    use crate::model::SCRATCH_PATH;

    pub struct RepositoryFixture {
        pub repository: InMemoryRepository,
    }

    impl Default for RepositoryFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RepositoryFixture {
        pub fn new() -> Self {
            Self {
                repository: InMemoryRepository::new(),
            }
        }

        pub fn with_scratch(self) -> Self {
            self.with_note(SCRATCH_PATH, "Scratch", "\n∞∞∞text-a\n")
        }

        pub fn with_note(self, path: &str, name: &str, content: &str) -> Self {
            let serialized = NoteFormat::new(name, content)
                .serialize()
                .expect("fixture note serializes");
            self.repository.insert_raw(path, &serialized);
            self
        }

        pub fn with_notes(mut self, count: usize) -> Self {
            for i in 0..count {
                let path = format!("note-{}.txt", i + 1);
                let name = format!("Test Note {}", i + 1);
                let content = format!("\n∞∞∞text-a\nContent for note {}", i + 1);
                self = self.with_note(&path, &name, &content);
            }
            self
        }
    }
}

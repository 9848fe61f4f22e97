use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Note already exists: {0}")]
    DuplicateNote(String),

    #[error("Illegal operation: {0}")]
    IllegalOperation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Note path already taken: {0}")]
    NoteExists(String),

    #[error("Invalid note path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Editor error: {0}")]
    Editor(String),
}

impl LibraryError {
    /// True for failures reported by the note repository rather than by the
    /// controller's own precondition checks.
    pub fn is_repository_failure(&self) -> bool {
        matches!(
            self,
            LibraryError::NoteNotFound(_)
                | LibraryError::NoteExists(_)
                | LibraryError::InvalidPath(_)
                | LibraryError::Io(_)
                | LibraryError::Serialization(_)
                | LibraryError::Store(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

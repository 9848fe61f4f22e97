//! # Scratchbook Architecture
//!
//! Scratchbook is a **UI-agnostic note library**. The session state of a
//! library (which note is open, the recent list, the open dialog) lives in a
//! single controller object that any host can drive: a desktop shell, a TUI,
//! or the bundled CLI.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (CLI, GUI shell, ...)                                 │
//! │  - Owns the runtime, renders state, binds the editor        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controller (library.rs)                                    │
//! │  - Index, navigation, recents, dialogs, note lifecycle      │
//! │  - Serializes mutating actions                              │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                           │
//!                  ▼                           ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Storage (store/)             │ │  Editor (editor/)         │
//! │  - NoteRepository trait       │ │  - ActiveEditor trait     │
//! │  - FsRepository, in-memory    │ │  - EditorCache trait      │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! The controller and its collaborators:
//! - Take regular Rust arguments and return `Result<T, LibraryError>`
//! - **Never** write to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** call `std::process::exit`
//!
//! ## Testing Strategy
//!
//! 1. **Controller** (`library.rs`): unit tests against
//!    [`store::memory::InMemoryRepository`], whose operation log lets tests
//!    assert which repository effects happened and in what order.
//! 2. **Storage** (`store/fs.rs`): unit tests plus `tests/` with `tempfile`.
//! 3. **CLI**: end-to-end tests in the `scratchbook` crate.
//!
//! ## Module Overview
//!
//! - [`library`]: The controller, entry point for all operations
//! - [`store`]: Storage abstraction and implementations
//! - [`editor`]: Active editor and editor cache seams
//! - [`format`]: The on-disk note format
//! - [`model`]: Core data types (`NoteMetadata`, `NoteIndex`)
//! - [`recent`]: Recently opened notes
//! - [`dialog`]: Modal dialog state
//! - [`config`]: Configuration management
//! - [`init`]: Wiring a filesystem library together
//! - [`error`]: Error types

pub mod config;
pub mod dialog;
pub mod editor;
pub mod error;
pub mod format;
pub mod init;
pub mod library;
pub mod model;
pub mod recent;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

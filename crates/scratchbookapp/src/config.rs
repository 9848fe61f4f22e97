//! # Configuration
//!
//! Configuration is managed by [`clapfig`], which handles layered loading from
//! TOML files, environment variables and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `SCRATCHBOOK__MAX_RECENT`, etc.
//! 2. **Library Config**: `<library>/scratchbook.toml`.
//! 3. **Global Config**: OS-appropriate config directory (via `directories`).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `library_path` | none | Library directory, overrides the OS data dir |
//! | `scratch_path` | `scratch.txt` | Path of the undeletable scratch note |
//! | `max_recent` | `100` | Length of the recent notes list |
//! | `editor_cache_size` | `4` | Editors kept alive by the instance cache |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::editor::cache::DEFAULT_CACHE_SIZE;
use crate::model::{MAX_RECENT_NOTES, SCRATCH_PATH};

/// Configuration for a library, stored in `scratchbook.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding the notes. When absent, the OS data directory is used.
    pub library_path: Option<PathBuf>,

    /// Path of the scratch note, relative to the library root
    #[config(default = "scratch.txt")]
    pub scratch_path: String,

    /// Maximum number of entries in the recent notes list
    #[config(default = 100)]
    pub max_recent: usize,

    /// Number of editor instances kept alive by the cache
    #[config(default = 4)]
    pub editor_cache_size: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            scratch_path: SCRATCH_PATH.to_string(),
            max_recent: MAX_RECENT_NOTES,
            editor_cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl LibraryConfig {
    /// Recent list length, never zero.
    pub fn max_recent(&self) -> usize {
        self.max_recent.max(1)
    }

    /// Scratch path with surrounding slashes and whitespace removed, falling
    /// back to the default when that leaves nothing.
    pub fn scratch_path(&self) -> String {
        let trimmed = self.scratch_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            SCRATCH_PATH.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

//! # Library Initialization
//!
//! [`initialize`] wires a filesystem library together: it resolves where the
//! notes live, loads configuration, makes sure the scratch note exists on disk
//! and starts the [`Library`] controller.
//!
//! ## Root Resolution
//!
//! The library root is the first of:
//! 1. The explicit `library_override` (the CLI's `--library` flag).
//! 2. The `SCRATCHBOOK_LIBRARY` environment variable.
//! 3. `library_path` from the global `scratchbook.toml`.
//! 4. The OS-appropriate data directory (via the `directories` crate).
//!
//! ## Config Resolution
//!
//! Configuration is loaded twice. The first pass reads only the global config
//! directory, since `library_path` decides where the library config lives.
//! The second pass merges the global file with `<root>/scratchbook.toml`, the
//! library file winning.

use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::LibraryConfig;
use crate::editor::cache::EditorInstanceCache;
use crate::error::{LibraryError, Result};
use crate::format::NoteFormat;
use crate::library::Library;
use crate::model::SCRATCH_NAME;
use crate::store::fs::FsRepository;
use crate::store::NoteRepository;

pub const LIBRARY_ENV: &str = "SCRATCHBOOK_LIBRARY";
pub const CONFIG_FILE: &str = "scratchbook.toml";

pub type FsLibrary = Library<FsRepository, EditorInstanceCache>;

pub struct LibraryContext {
    pub library: Arc<FsLibrary>,
    pub config: LibraryConfig,
    pub root: PathBuf,
}

impl LibraryContext {
    pub fn repository(&self) -> &Arc<FsRepository> {
        self.library.repository()
    }

    pub fn cache(&self) -> &Arc<EditorInstanceCache> {
        self.library.cache()
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "scratchbook", "scratchbook").ok_or_else(|| {
        LibraryError::InvalidState("could not determine the home directory".to_string())
    })
}

fn global_search_paths() -> Vec<SearchPath> {
    project_dirs()
        .map(|dirs| vec![SearchPath::Path(dirs.config_dir().to_path_buf())])
        .unwrap_or_default()
}

fn load_config(search_paths: Vec<SearchPath>) -> LibraryConfig {
    Clapfig::builder::<LibraryConfig>()
        .app_name("scratchbook")
        .file_name(CONFIG_FILE)
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Pick the library root, see the module docs for the order.
pub fn resolve_root(
    library_override: Option<PathBuf>,
    global: &LibraryConfig,
) -> Result<PathBuf> {
    if let Some(path) = library_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(LIBRARY_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = &global.library_path {
        return Ok(path.clone());
    }
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Create the scratch note if the library doesn't have one yet.
async fn ensure_scratch(repository: &FsRepository, scratch_path: &str) -> Result<()> {
    match repository.load(scratch_path).await {
        Ok(_) => Ok(()),
        Err(LibraryError::NoteNotFound(_)) => {
            let note = NoteFormat::new(SCRATCH_NAME, NoteFormat::empty_content());
            repository.create(scratch_path, &note.serialize()?).await?;
            tracing::info!(path = scratch_path, "created scratch note");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Initialize a filesystem library and start its controller.
///
/// Must be called from within a tokio runtime.
pub async fn initialize(library_override: Option<PathBuf>) -> Result<LibraryContext> {
    let global = load_config(global_search_paths());
    let root = resolve_root(library_override, &global)?;

    let mut search_paths = global_search_paths();
    search_paths.push(SearchPath::Path(root.clone()));
    let config = load_config(search_paths);

    initialize_at(&root, config).await
}

/// Start a filesystem library at `root` with an already loaded config.
pub async fn initialize_at(root: &Path, config: LibraryConfig) -> Result<LibraryContext> {
    tokio::fs::create_dir_all(root).await?;
    tracing::debug!(root = %root.display(), "opening library");

    let repository = Arc::new(FsRepository::new(root));
    ensure_scratch(&repository, &config.scratch_path()).await?;

    let cache = Arc::new(EditorInstanceCache::new(config.editor_cache_size));
    let library = Library::start(repository, cache, &config).await?;

    Ok(LibraryContext {
        library,
        config,
        root: root.to_path_buf(),
    })
}

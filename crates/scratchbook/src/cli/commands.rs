//! # CLI Layer
//!
//! This module is **one possible host** for the library controller. It is the
//! only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Owns the async runtime and the log subscriber
//! - Handles argument parsing
//!
//! Every command initializes a library session, binds a headless
//! [`BufferEditor`] where the action needs an active editor, runs the
//! controller action and prints the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use scratchbookapp::editor::buffer::BufferEditor;
use scratchbookapp::format::{Block, NoteFormat};
use scratchbookapp::init::{initialize, FsLibrary, LibraryContext};
use scratchbookapp::model::fallback_name;
use scratchbookapp::store::NoteRepository;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use super::print;
use super::setup::{Cli, Commands};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(dispatch(cli))
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let ctx = initialize(cli.library)
        .await
        .context("failed to open library")?;
    tracing::debug!(root = %ctx.root.display(), command = ?cli.command, "dispatching");

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => handle_list(&ctx),
        Commands::Show { path } => handle_show(&ctx, &path).await,
        Commands::Create {
            path,
            name,
            content,
        } => handle_create(&ctx, &path, name, content).await,
        Commands::New { path, name, from } => handle_new(&ctx, &path, name, from).await,
        Commands::Rename { path, name, to } => handle_rename(&ctx, &path, &name, to).await,
        Commands::Delete { path } => handle_delete(&ctx, &path).await,
        Commands::Status { json } => handle_status(&ctx, json),
    }
}

/// Open `path` in a headless editor and make it the active one.
async fn bind_buffer_editor(ctx: &LibraryContext, path: &str) -> Result<Arc<FsLibrary>> {
    let library = ctx.library.clone();
    let editor = BufferEditor::open(ctx.repository().clone(), path)
        .await
        .with_context(|| format!("failed to open {}", path))?;
    library.open_note(path);
    library.bind_editor(Arc::new(editor));
    Ok(library)
}

fn handle_list(ctx: &LibraryContext) -> Result<()> {
    print::print_notes(&ctx.library.notes(), ctx.library.scratch_path());
    Ok(())
}

async fn handle_show(ctx: &LibraryContext, path: &str) -> Result<()> {
    let text = ctx.repository().load(path).await?;
    let note = NoteFormat::parse(&text)?;
    let name = note.name().map(str::to_string).unwrap_or_else(|| fallback_name(path));
    print::print_note(path, &name, &note.blocks());
    Ok(())
}

async fn handle_create(
    ctx: &LibraryContext,
    path: &str,
    name: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let name = name.unwrap_or_else(|| fallback_name(path));
    let content = match content {
        Some(text) => Block::new("text", true, text).render(),
        None => NoteFormat::empty_content(),
    };
    ctx.library.save_new_note(path, &name, &content).await?;
    print::print_success(&format!("Created {} ({})", name, path));
    Ok(())
}

async fn handle_new(
    ctx: &LibraryContext,
    path: &str,
    name: Option<String>,
    from: Option<String>,
) -> Result<()> {
    let name = name.unwrap_or_else(|| fallback_name(path));
    match from {
        Some(source) => {
            let library = bind_buffer_editor(ctx, &source).await?;
            library
                .create_new_note_from_active_block(path, &name)
                .await?;
            print::print_success(&format!("Moved last block of {} into {}", source, path));
        }
        None => {
            let scratch = ctx.library.scratch_path().to_string();
            let library = bind_buffer_editor(ctx, &scratch).await?;
            library.create_new_note(path, &name).await?;
            print::print_success(&format!("Created {} ({})", name, path));
        }
    }
    Ok(())
}

async fn handle_rename(
    ctx: &LibraryContext,
    path: &str,
    name: &str,
    to: Option<String>,
) -> Result<()> {
    let library = bind_buffer_editor(ctx, path).await?;
    library
        .update_note_metadata(path, name, to.as_deref())
        .await?;
    match to.as_deref().filter(|target| *target != path) {
        Some(target) => print::print_success(&format!("Renamed {} to {} ({})", path, name, target)),
        None => print::print_success(&format!("Renamed {} to {}", path, name)),
    }
    Ok(())
}

async fn handle_delete(ctx: &LibraryContext, path: &str) -> Result<()> {
    ctx.library.delete_note(path).await?;
    print::print_success(&format!("Deleted {}", path));
    Ok(())
}

fn handle_status(ctx: &LibraryContext, json: bool) -> Result<()> {
    let snapshot = ctx.library.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print::print_status(&snapshot, &ctx.root);
    }
    Ok(())
}

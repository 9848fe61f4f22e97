use scratchbookapp::config::LibraryConfig;
use scratchbookapp::editor::buffer::BufferEditor;
use scratchbookapp::editor::ActiveEditor;
use scratchbookapp::error::LibraryError;
use scratchbookapp::format::NoteFormat;
use scratchbookapp::init::initialize_at;
use scratchbookapp::model::SCRATCH_PATH;
use scratchbookapp::store::fs::FsRepository;
use scratchbookapp::store::NoteRepository;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn setup() -> (TempDir, FsRepository) {
    let dir = TempDir::new().unwrap();
    let repository = FsRepository::new(dir.path());
    (dir, repository)
}

fn note_text(name: &str, body: &str) -> String {
    NoteFormat::new(name, format!("\n∞∞∞text-a\n{}", body))
        .serialize()
        .unwrap()
}

fn assert_no_tmp_files(dir: &Path) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[tokio::test]
async fn test_fs_repository_basic_note_io() {
    let (dir, repository) = setup();

    // 1. Create
    repository
        .create("todo.txt", &note_text("Todo", "milk"))
        .await
        .unwrap();
    assert!(dir.path().join("todo.txt").is_file());

    // 2. Load
    let text = repository.load("todo.txt").await.unwrap();
    assert_eq!(NoteFormat::parse(&text).unwrap().name(), Some("Todo"));

    // 3. Delete
    repository.delete("todo.txt").await.unwrap();
    assert!(matches!(
        repository.load("todo.txt").await,
        Err(LibraryError::NoteNotFound(_))
    ));
}

#[tokio::test]
async fn test_fs_repository_atomic_write_artifacts() {
    let (dir, repository) = setup();
    repository
        .save("work/standup.txt", &note_text("Standup", "notes"))
        .await
        .unwrap();

    let on_disk = fs::read_to_string(dir.path().join("work/standup.txt")).unwrap();
    assert_eq!(on_disk, note_text("Standup", "notes"));
    assert_no_tmp_files(dir.path());
    assert_no_tmp_files(&dir.path().join("work"));
}

#[tokio::test]
async fn test_fs_repository_list_walks_subdirectories() {
    let (dir, repository) = setup();
    fs::create_dir_all(dir.path().join("work/deep")).unwrap();
    fs::create_dir_all(dir.path().join(".hidden")).unwrap();
    fs::write(dir.path().join("a.txt"), note_text("Alpha", "")).unwrap();
    fs::write(dir.path().join("work/deep/b.txt"), note_text("Beta", "")).unwrap();
    fs::write(dir.path().join("work/legacy.txt"), "\n∞∞∞text\nold").unwrap();
    fs::write(dir.path().join("readme.md"), "not a note").unwrap();
    fs::write(dir.path().join(".hidden/c.txt"), note_text("Hidden", "")).unwrap();

    let index = repository.list().await.unwrap();
    let paths: Vec<&str> = index.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["a.txt", "work/deep/b.txt", "work/legacy.txt"]);
    assert_eq!(index["a.txt"].name, "Alpha");
    assert_eq!(index["work/legacy.txt"].name, "legacy");
    assert!(index["a.txt"].modified.is_some());
}

#[tokio::test]
async fn test_fs_repository_list_missing_root_is_empty() {
    let dir = TempDir::new().unwrap();
    let repository = FsRepository::new(dir.path().join("not-yet"));
    assert!(repository.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fs_repository_rejects_escaping_paths() {
    let (_dir, repository) = setup();
    for path in ["../outside.txt", "/etc/passwd", "a//b.txt", ""] {
        let result = repository.create(path, "x").await;
        assert!(
            matches!(result, Err(LibraryError::InvalidPath(_))),
            "{} should be rejected, got {:?}",
            path,
            result
        );
    }
}

#[tokio::test]
async fn test_fs_repository_move_note() {
    let (dir, repository) = setup();
    repository
        .create("a.txt", &note_text("A", ""))
        .await
        .unwrap();
    repository
        .create("b.txt", &note_text("B", ""))
        .await
        .unwrap();

    assert!(matches!(
        repository.move_note("a.txt", "b.txt").await,
        Err(LibraryError::NoteExists(_))
    ));
    assert!(matches!(
        repository.move_note("ghost.txt", "c.txt").await,
        Err(LibraryError::NoteNotFound(_))
    ));

    repository
        .move_note("a.txt", "archive/2024/a.txt")
        .await
        .unwrap();
    assert!(!dir.path().join("a.txt").exists());
    assert!(dir.path().join("archive/2024/a.txt").is_file());
}

#[tokio::test]
async fn test_library_lifecycle_on_disk() {
    let dir = TempDir::new().unwrap();
    let ctx = initialize_at(dir.path(), LibraryConfig::default())
        .await
        .unwrap();
    let library = ctx.library.clone();

    library
        .save_new_note("ideas.txt", "Ideas", "\n∞∞∞markdown\n# later")
        .await
        .unwrap();
    assert_eq!(library.notes()["ideas.txt"].name, "Ideas");

    // Open the note in a headless editor, then rename and move it.
    library.open_note("ideas.txt");
    let editor = BufferEditor::open(ctx.repository().clone(), "ideas.txt")
        .await
        .unwrap();
    library.bind_editor(Arc::new(editor));
    library
        .update_note_metadata("ideas.txt", "Someday", Some("someday/ideas.txt"))
        .await
        .unwrap();

    assert!(!dir.path().join("ideas.txt").exists());
    let moved = fs::read_to_string(dir.path().join("someday/ideas.txt")).unwrap();
    assert_eq!(NoteFormat::parse(&moved).unwrap().name(), Some("Someday"));
    assert_eq!(library.current_note_path(), "someday/ideas.txt");

    library.delete_note("someday/ideas.txt").await.unwrap();
    assert!(!dir.path().join("someday/ideas.txt").exists());
    assert_eq!(library.current_note_path(), SCRATCH_PATH);
    assert!(matches!(
        library.delete_note(SCRATCH_PATH).await,
        Err(LibraryError::IllegalOperation(_))
    ));
    assert!(dir.path().join(SCRATCH_PATH).is_file());
}

#[tokio::test]
async fn test_library_create_note_through_buffer_editor() {
    let dir = TempDir::new().unwrap();
    let ctx = initialize_at(dir.path(), LibraryConfig::default())
        .await
        .unwrap();
    let library = ctx.library.clone();

    let editor = Arc::new(
        BufferEditor::open(ctx.repository().clone(), SCRATCH_PATH)
            .await
            .unwrap(),
    );
    editor.set_content("\n∞∞∞text-a\nkeep\n∞∞∞rust\nfn main() {}");
    editor.save().await.unwrap();
    library.bind_editor(editor.clone());

    library
        .create_new_note_from_active_block("snippet.txt", "Snippet")
        .await
        .unwrap();

    assert_eq!(library.current_note_path(), "snippet.txt");
    assert_eq!(editor.path(), "snippet.txt");
    let scratch = fs::read_to_string(dir.path().join(SCRATCH_PATH)).unwrap();
    assert_eq!(
        NoteFormat::parse(&scratch).unwrap().content,
        "\n∞∞∞text-a\nkeep"
    );
    assert_eq!(library.note_status().language.as_deref(), Some("rust"));
}

#[tokio::test]
async fn test_root_change_reloads_library() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(second.path().join("elsewhere.txt"), note_text("Elsewhere", "")).unwrap();

    let ctx = initialize_at(first.path(), LibraryConfig::default())
        .await
        .unwrap();
    let library = ctx.library.clone();
    library.open_note("missing.txt");

    ctx.repository().set_root(second.path());
    for _ in 0..200 {
        if library.library_generation() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(library.library_generation(), 1);
    assert_eq!(library.current_note_path(), SCRATCH_PATH);
    let notes = library.notes();
    assert!(notes.contains_key("elsewhere.txt"));
    // The scratch entry is always present, even before the file exists.
    assert!(notes.contains_key(SCRATCH_PATH));
}

#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

struct Env {
    _temp: TempDir,
    library: std::path::PathBuf,
    config_home: std::path::PathBuf,
}

fn setup() -> Env {
    let temp = TempDir::new().unwrap();
    let library = temp.path().join("library");
    let config_home = temp.path().join("config");
    fs::create_dir_all(&config_home).unwrap();
    Env {
        _temp: temp,
        library,
        config_home,
    }
}

impl Env {
    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("scratchbook"));
        cmd.env("XDG_CONFIG_HOME", &self.config_home)
            .env_remove("SCRATCHBOOK_LIBRARY")
            .env_remove("RUST_LOG")
            .arg("--library")
            .arg(&self.library);
        cmd
    }
}

#[test]
fn test_first_run_creates_scratch() {
    let env = setup();
    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scratch"));
    assert!(env.library.join("scratch.txt").is_file());
}

#[test]
fn test_create_show_and_list() {
    let env = setup();
    env.cmd()
        .args(["create", "groceries.txt", "--name", "Groceries", "--content", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Groceries"));

    env.cmd()
        .args(["show", "groceries.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("milk"));

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("groceries.txt"));
}

#[test]
fn test_create_duplicate_fails() {
    let env = setup();
    env.cmd().args(["create", "a.txt"]).assert().success();
    env.cmd()
        .args(["create", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_rename_and_move() {
    let env = setup();
    env.cmd().args(["create", "draft.txt"]).assert().success();
    env.cmd()
        .args(["rename", "draft.txt", "Final", "--to", "done/final.txt"])
        .assert()
        .success();

    assert!(!env.library.join("draft.txt").exists());
    let moved = fs::read_to_string(env.library.join("done/final.txt")).unwrap();
    assert!(moved.contains("\"name\":\"Final\""));
}

#[test]
fn test_delete_note_and_scratch() {
    let env = setup();
    env.cmd().args(["create", "old.txt"]).assert().success();
    env.cmd()
        .args(["delete", "old.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted old.txt"));
    assert!(!env.library.join("old.txt").exists());

    env.cmd()
        .args(["delete", "scratch.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scratch"));
    assert!(env.library.join("scratch.txt").is_file());
}

#[test]
fn test_new_from_block_moves_last_block() {
    let env = setup();
    fs::create_dir_all(&env.library).unwrap();
    fs::write(
        env.library.join("ideas.txt"),
        "{\"formatVersion\":\"1.0.0\",\"name\":\"Ideas\"}\n∞∞∞text-a\nkeep\n∞∞∞markdown\n# split",
    )
    .unwrap();

    env.cmd()
        .args(["new", "split.txt", "--name", "Split", "--from", "ideas.txt"])
        .assert()
        .success();

    let ideas = fs::read_to_string(env.library.join("ideas.txt")).unwrap();
    assert!(!ideas.contains("# split"));
    let split = fs::read_to_string(env.library.join("split.txt")).unwrap();
    assert!(split.contains("# split"));
    assert!(split.contains("\"name\":\"Split\""));
}

#[test]
fn test_status_json() {
    let env = setup();
    env.cmd()
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"currentNotePath\": \"scratch.txt\""))
        .stdout(predicate::str::contains("\"libraryGeneration\": 0"));
}

#[test]
fn test_show_missing_note_fails() {
    let env = setup();
    env.cmd()
        .args(["show", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

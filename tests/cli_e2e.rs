use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn todoz(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.arg("--data-dir")
        .arg(data_dir)
        .env("NO_COLOR", "1")
        .env_remove("TODOZ_DATA_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn stored(data_dir: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(data_dir.join("todos.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn add_toggle_and_list() {
    let dir = TempDir::new().unwrap();

    todoz(dir.path())
        .args(["add", "Buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Buy milk"));
    todoz(dir.path()).args(["add", "Walk dog"]).assert().success();

    todoz(dir.path())
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: Buy milk"));

    todoz(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: 1/2"))
        .stdout(predicate::str::contains("[x] Buy milk"))
        .stdout(predicate::str::contains("[ ] Walk dog"));

    todoz(dir.path())
        .args(["list", "--filter", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("Walk dog").not());

    let saved = stored(dir.path());
    let rows = saved.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["text"], "Buy milk");
    assert_eq!(rows[0]["completed"], true);
    assert!(rows[0]["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn naked_run_lists() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: 0/0"))
        .stdout(predicate::str::contains("No todos yet."));
}

#[test]
fn blank_add_stores_nothing() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path()).args(["add", "   "]).assert().success();
    assert!(!dir.path().join("todos.json").exists());
}

#[test]
fn edit_and_delete_by_id() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path()).args(["add", "Buy milk"]).assert().success();
    let id = stored(dir.path())[0]["id"].as_i64().unwrap();

    todoz(dir.path())
        .args(["edit", &format!("#{}", id), "Buy", "oat", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated: Buy oat milk"));
    assert_eq!(stored(dir.path())[0]["text"], "Buy oat milk");

    todoz(dir.path())
        .args(["delete", &format!("#{}", id)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: Buy oat milk"));
    assert_eq!(stored(dir.path()), serde_json::json!([]));
}

#[test]
fn bad_reference_fails() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path())
        .args(["toggle", "first"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid todo reference: first"));
}

#[test]
fn clear_asks_first() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path()).args(["add", "a"]).assert().success();
    todoz(dir.path()).args(["add", "b"]).assert().success();

    todoz(dir.path())
        .arg("clear")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Clear cancelled."))
        .stderr(predicate::str::contains(
            "Are you sure you want to clear the list?",
        ));
    assert_eq!(stored(dir.path()).as_array().unwrap().len(), 2);

    todoz(dir.path())
        .arg("clear")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 todos."));
    assert_eq!(stored(dir.path()), serde_json::json!([]));
}

#[test]
fn clear_yes_skips_the_prompt() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path()).args(["add", "a"]).assert().success();
    todoz(dir.path())
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 todo."))
        .stderr(predicate::str::contains("Are you sure").not());
}

#[test]
fn corrupt_data_is_set_aside() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("todos.json"), "{not json").unwrap();

    todoz(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be read"))
        .stdout(predicate::str::contains("No todos yet."));

    let kept = std::fs::read_to_string(dir.path().join("todos.corrupt.json")).unwrap();
    assert_eq!(kept, "{not json");

    todoz(dir.path()).args(["add", "fresh"]).assert().success();
    assert_eq!(stored(dir.path())[0]["text"], "fresh");
}

#[test]
fn path_and_config() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("todos.json"));

    todoz(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("confirm-clear = true"));

    todoz(dir.path())
        .args(["config", "confirm-clear", "false"])
        .assert()
        .success();
    todoz(dir.path()).args(["add", "a"]).assert().success();
    todoz(dir.path())
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 todo."));
}

#[test]
fn shell_session() {
    let dir = TempDir::new().unwrap();
    todoz(dir.path())
        .arg("shell")
        .write_stdin("add Buy milk\nadd Walk dog\nt 1\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: 1/2"));
    assert_eq!(stored(dir.path())[0]["completed"], true);
}

#[test]
fn data_dir_from_environment() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.env("TODOZ_DATA_DIR", env_dir.path())
        .env("NO_COLOR", "1")
        .args(["add", "from env"])
        .assert()
        .success();
    assert_eq!(stored(env_dir.path())[0]["text"], "from env");

    // The flag wins over the environment.
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.env("TODOZ_DATA_DIR", env_dir.path())
        .env("NO_COLOR", "1")
        .arg("--data-dir")
        .arg(flag_dir.path())
        .args(["add", "from flag"])
        .assert()
        .success();
    assert_eq!(stored(flag_dir.path())[0]["text"], "from flag");
    assert_eq!(stored(env_dir.path()).as_array().unwrap().len(), 1);
}

#[test]
fn non_utf8_data_is_set_aside_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let raw: &[u8] = b"[{\"id\":1,\"text\":\"caf\xe9\",\"completed\":false,\"createdAt\":\"2023-11-14T22:13:20.000Z\"}]";
    std::fs::write(dir.path().join("todos.json"), raw).unwrap();

    todoz(dir.path())
        .args(["add", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be read"));

    assert_eq!(
        std::fs::read(dir.path().join("todos.corrupt.json")).unwrap(),
        raw
    );
    assert_eq!(stored(dir.path())[0]["text"], "new");
}

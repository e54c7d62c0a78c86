#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Sandbox {
    temp: TempDir,
    data: PathBuf,
    config: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        let config = temp.path().join("config");
        fs::create_dir_all(&config).unwrap();
        Self {
            temp,
            data,
            config,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("questlog"));
        cmd.env("QUESTLOG_DATA_DIR", self.data.as_os_str())
            .env("XDG_CONFIG_HOME", self.config.as_os_str())
            .env_remove("RUST_LOG");
        cmd
    }

    fn slot(&self) -> PathBuf {
        self.data.join("questlog-tracker-data.json")
    }

    fn list_json(&self, collection: &str) -> Vec<Value> {
        let output = self
            .cmd()
            .args(["list", collection, "--output", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: Value = serde_json::from_slice(&output.stdout).unwrap();
        value.as_array().unwrap().clone()
    }
}

fn first_id(records: &[Value]) -> String {
    records[0]["id"].as_str().unwrap().to_string()
}

fn backup_in(dir: &Path) -> PathBuf {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| path.extension().is_some_and(|ext| ext == "json"))
        .unwrap()
}

#[test]
fn test_naked_run_shows_an_empty_dashboard() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Active quests"))
        .stdout(predicate::str::contains("Never"));
}

#[test]
fn test_add_list_and_toggle() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["quest", "add", "Find the Painter", "--location", "Lumière"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quest: Find the Painter added"));

    sandbox
        .cmd()
        .args(["quest", "add", "Side errand"])
        .assert()
        .success();

    let quests = sandbox.list_json("quests");
    assert_eq!(quests.len(), 2);
    assert_eq!(quests[0]["name"], "Find the Painter");
    assert_eq!(quests[0]["isMain"], false);
    let id = first_id(&quests);

    sandbox
        .cmd()
        .args(["toggle", "quests", &id, "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now main"));

    sandbox
        .cmd()
        .args(["list", "quests", "--type", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Find the Painter"))
        .stdout(predicate::str::contains("Side errand").not());
}

#[test]
fn test_edit_and_delete() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["item", "add", "Potion", "--quantity", "3 flasks"])
        .assert()
        .success();

    let items = sandbox.list_json("inventory");
    assert_eq!(items[0]["quantity"], 3);
    let id = first_id(&items);

    sandbox
        .cmd()
        .args(["item", "edit", &id, "--quantity", "-2", "--key-item"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Item: Potion updated"));
    let items = sandbox.list_json("inventory");
    assert_eq!(items[0]["quantity"], 0);
    assert_eq!(items[0]["isKeyItem"], true);

    sandbox
        .cmd()
        .args(["delete", "inventory", &id, "missing-id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Item: Potion deleted"))
        .stdout(predicate::str::contains("No item with id missing-id"));
    assert!(sandbox.list_json("inventory").is_empty());
}

#[test]
fn test_blank_name_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["character", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    assert!(!sandbox.slot().exists());
}

#[test]
fn test_stats_as_json() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["location", "add", "Lumière", "--discovered"])
        .assert()
        .success();
    sandbox
        .cmd()
        .args(["location", "add", "Flying Waters"])
        .assert()
        .success();

    let output = sandbox
        .cmd()
        .args(["stats", "--output", "json"])
        .output()
        .unwrap();
    let stats: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["locations"], 2);
    assert_eq!(stats["discoveredLocations"], 1);
    assert_eq!(stats["lastExport"], Value::Null);
}

#[test]
fn test_export_then_import_elsewhere() {
    let source = Sandbox::new();
    let target = Sandbox::new();
    let out = TempDir::new().unwrap();

    source
        .cmd()
        .args(["note", "add", "Boss order", "--content", "Eveque first"])
        .assert()
        .success();
    source
        .cmd()
        .args(["export", "--out"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("questlog-tracker-backup-"));
    let backup = backup_in(out.path());

    target
        .cmd()
        .args(["quest", "add", "Will be replaced"])
        .assert()
        .success();
    target
        .cmd()
        .arg("import")
        .arg(&backup)
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("OVERWRITE"))
        .stdout(predicate::str::contains("Imported 1 records, replacing 1"));

    assert!(target.list_json("quests").is_empty());
    assert_eq!(target.list_json("notes")[0]["title"], "Boss order");
    target
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Never").not());
}

#[test]
fn test_import_without_a_terminal_changes_nothing() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["quest", "add", "Keep me"])
        .assert()
        .success();
    let before = fs::read_to_string(sandbox.slot()).unwrap();

    let incoming = sandbox.temp.path().join("incoming.json");
    fs::write(&incoming, r#"{"quests": [{"id": "q9", "name": "Intruder"}]}"#).unwrap();

    sandbox
        .cmd()
        .arg("import")
        .arg(&incoming)
        .assert()
        .success()
        .stdout(predicate::str::contains("Import cancelled, nothing changed"));
    assert_eq!(fs::read_to_string(sandbox.slot()).unwrap(), before);
}

#[test]
fn test_import_of_the_wrong_file_type_fails() {
    let sandbox = Sandbox::new();
    let notes = sandbox.temp.path().join("notes.txt");
    fs::write(&notes, "{}").unwrap();

    sandbox
        .cmd()
        .arg("import")
        .arg(&notes)
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid import file type: .txt"));
}

#[test]
fn test_clear_needs_both_confirmations() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["quest", "add", "Doomed"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["clear", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing was deleted"));
    assert_eq!(sandbox.list_json("quests").len(), 1);

    sandbox
        .cmd()
        .args(["clear", "-yy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All tracker data has been cleared"));
    assert!(sandbox.list_json("quests").is_empty());
}

#[test]
fn test_corrupt_slot_fails_until_reset() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(&sandbox.data).unwrap();
    fs::write(sandbox.slot(), "{ not json").unwrap();

    sandbox
        .cmd()
        .arg("stats")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Saved data in"));
    assert_eq!(fs::read_to_string(sandbox.slot()).unwrap(), "{ not json");

    sandbox
        .cmd()
        .args(["quest", "add", "Fresh start", "--reset-corrupt"])
        .assert()
        .success();
    assert_eq!(sandbox.list_json("quests").len(), 1);
}

#[test]
fn test_data_dir_flag_overrides_environment() {
    let sandbox = Sandbox::new();
    let other = TempDir::new().unwrap();

    sandbox
        .cmd()
        .args(["note", "add", "Elsewhere", "--data-dir"])
        .arg(other.path())
        .assert()
        .success();

    assert!(other.path().join("questlog-tracker-data.json").exists());
    assert!(!sandbox.slot().exists());
}

mod support;

use predicates::prelude::*;
use predicates::str::{contains, is_match};
use serde_json::Value;

use support::TestDataDir;

#[test]
fn add_toggle_search_delete_flow() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestDataDir::new();

    data.cmd()
        .args(["add", "Buy", "milk"])
        .assert()
        .success()
        .stdout(contains("Added: Buy milk"))
        .stdout(contains("pending: 1"));
    assert_eq!(
        data.read_tasks().as_deref(),
        Some(r#"[{"text":"Buy milk","completed":false}]"#)
    );

    data.cmd()
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(contains("Completed: Buy milk"));
    assert_eq!(
        data.read_tasks().as_deref(),
        Some(r#"[{"text":"Buy milk","completed":true}]"#)
    );
    data.cmd().arg("count").assert().success().stdout("0\n");

    data.cmd()
        .args(["list", "--search", "MILK"])
        .assert()
        .success()
        .stdout(contains("1. [x] Buy milk"));
    data.cmd()
        .args(["list", "--search", "bread"])
        .assert()
        .success()
        .stdout(contains("No matches"))
        .stdout(contains("Buy milk").not());
    assert!(data.read_tasks().is_some_and(|raw| raw.contains("Buy milk")));

    data.cmd()
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(contains("Deleted: Buy milk"));
    assert_eq!(data.read_tasks().as_deref(), Some("[]"));

    data.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No tasks"))
        .stdout(contains("pending: 0"));

    Ok(())
}

#[test]
fn toggling_twice_restores_state() {
    let data = TestDataDir::new();
    data.cmd().args(["add", "Walk dog"]).assert().success();

    data.cmd().args(["toggle", "1"]).assert().success();
    data.cmd()
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(contains("Reopened: Walk dog"));

    assert_eq!(
        data.read_tasks().as_deref(),
        Some(r#"[{"text":"Walk dog","completed":false}]"#)
    );
    data.cmd().arg("count").assert().success().stdout("1\n");
}

#[test]
fn blank_add_is_a_no_op() {
    let data = TestDataDir::new();

    data.cmd()
        .args(["add", "   "])
        .assert()
        .success()
        .stdout(contains("Nothing to add"));
    data.cmd().arg("add").assert().success();

    assert!(data.read_tasks().is_none());
}

#[test]
fn corrupted_storage_starts_empty_and_is_removed() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestDataDir::new();
    data.write_file("tasks.json", "{not json")?;

    data.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No tasks"))
        .stdout(contains("pending: 0"));

    assert!(!data.tasks_file().exists());
    Ok(())
}

#[test]
fn out_of_range_position_is_user_error() {
    let data = TestDataDir::new();
    data.cmd().args(["add", "Only one"]).assert().success();

    data.cmd()
        .args(["toggle", "2"])
        .assert()
        .code(2)
        .stderr(contains("error:"))
        .stderr(contains("hint: tasklist list"));
    data.cmd().args(["delete", "0"]).assert().code(2);

    data.cmd().arg("count").assert().success().stdout("1\n");
}

#[test]
fn json_output_uses_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestDataDir::new();
    data.cmd().args(["add", "Buy milk"]).assert().success();
    data.cmd().args(["add", "Bake bread"]).assert().success();
    data.cmd().args(["toggle", "2"]).assert().success();

    let output = data.cmd().args(["list", "--json"]).output()?;
    assert!(output.status.success());
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["schema_version"], "tasklist.v1");
    assert_eq!(payload["command"], "list");
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["data"]["total"], 2);
    assert_eq!(payload["data"]["pending"], 1);
    assert_eq!(payload["data"]["tasks"][1]["position"], 2);
    assert_eq!(payload["data"]["tasks"][1]["completed"], true);

    data.cmd()
        .args(["count", "--json"])
        .assert()
        .success()
        .stdout(is_match("(?s)\"data\"\\s*:\\s*\\{\\s*\"pending\"\\s*:\\s*1\\s*\\}").unwrap());

    let output = data.cmd().args(["toggle", "9", "--json"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["command"], "toggle");
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error"]["kind"], "user_error");
    assert_eq!(payload["error"]["details"]["position"], 9);

    Ok(())
}

#[test]
fn clear_removes_stored_list() {
    let data = TestDataDir::new();
    data.cmd().args(["add", "Buy milk"]).assert().success();
    assert!(data.tasks_file().exists());

    data.cmd()
        .arg("clear")
        .assert()
        .success()
        .stdout(contains("Cleared all tasks"));

    assert!(!data.tasks_file().exists());
    data.cmd().arg("count").assert().success().stdout("0\n");
}

#[test]
fn quiet_suppresses_output() {
    let data = TestDataDir::new();
    data.cmd()
        .args(["-q", "add", "Buy milk"])
        .assert()
        .success()
        .stdout("");
    assert!(data.tasks_file().exists());
}

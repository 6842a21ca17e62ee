use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn door(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("door").unwrap();
    cmd.current_dir(dir.path())
        .env("DOOR_VAULT_DIR", dir.path().join("vault"))
        .env("DOOR_FLOW_PATH", dir.path().join(".door-flow.json"))
        .env_remove("DOOR_CONFIG")
        .env_remove("DOOR_BRIDGE_URL")
        .env_remove("DOOR_HITS_TICKTICK");
    cmd
}

// ---------------------------------------------------------------------------
// door flow
// ---------------------------------------------------------------------------

#[test]
fn flow_shows_empty_collections() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .arg("flow")
        .assert()
        .success()
        .stdout(predicate::str::contains("hotlist"))
        .stdout(predicate::str::contains("warstacks"));
}

#[test]
fn flow_json_outputs_document() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["flow", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\": 1"));
}

// ---------------------------------------------------------------------------
// door hotlist
// ---------------------------------------------------------------------------

#[test]
fn hotlist_list_empty() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["hotlist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("empty"));
}

#[test]
fn hotlist_add_without_bridge_fails() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["hotlist", "add", "Launch plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DOOR_BRIDGE_URL"));
}

#[test]
fn hotlist_quickadd_writes_markdown() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["hotlist", "quickadd", "call", "the", "bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1-Potential"));

    let potential = dir.path().join("vault").join("1-Potential");
    let entries: Vec<_> = std::fs::read_dir(&potential).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn hotlist_export_with_empty_list_fails() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["hotlist", "export"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

// ---------------------------------------------------------------------------
// door doorwar
// ---------------------------------------------------------------------------

#[test]
fn doorwar_with_empty_hotlist_fails() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .arg("doorwar")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

// ---------------------------------------------------------------------------
// door warstack
// ---------------------------------------------------------------------------

#[test]
fn warstack_start_prints_first_prompt() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["warstack", "start", "--title", "T", "--chat", "c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1/10"));
}

#[test]
fn warstack_chat_answers_advance_and_complete() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["warstack", "start", "--title", "T", "--chat", "c"])
        .assert()
        .success();

    door(&dir)
        .args(["warstack", "answer", "--chat", "c", "Body"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 2/10"));

    for _ in 0..8 {
        door(&dir)
            .args(["warstack", "answer", "--chat", "c", "x"])
            .assert()
            .success();
    }

    door(&dir)
        .args(["warstack", "answer", "--chat", "c", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"))
        .stdout(predicate::str::contains("4 hits"));

    assert!(dir.path().join("vault").join("War-Stacks").is_dir());
    assert!(dir.path().join("vault").join("3-Production").is_dir());
}

#[test]
fn warstack_show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["warstack", "show", "ffffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn warstack_answer_without_target_fails() {
    let dir = TempDir::new().unwrap();
    door(&dir)
        .args(["warstack", "answer", "x"])
        .assert()
        .failure();
}

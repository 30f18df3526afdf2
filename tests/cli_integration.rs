//! CLI integration tests for Focus
//!
//! These tests verify the complete workflow from initialization through
//! task dependencies and the pomodoro timer, ensuring commands work
//! together correctly.

use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command instance for the focus binary
fn focus_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("focus"))
}

/// Create a temporary directory and initialize a focus project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    focus_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Add a task and return its ID
fn add_task(dir: &TempDir, description: &str) -> String {
    let output = focus_cmd()
        .current_dir(dir.path())
        .args(["task", "add", description, "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    json["id"].as_str().unwrap().to_string()
}

fn show_task(dir: &TempDir, id: &str) -> serde_json::Value {
    let output = focus_cmd()
        .current_dir(dir.path())
        .args(["task", "show", id, "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    focus_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized focus project"));

    assert!(dir.path().join(".focus").is_dir());
    assert!(dir.path().join(".focus/config.toml").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    focus_cmd().arg("init").arg(dir.path()).assert().success();
    focus_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_commands_outside_project_fail() {
    let dir = TempDir::new().unwrap();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a focus project"));
}

// =============================================================================
// Task Tests
// =============================================================================

#[test]
fn test_task_add_and_list() {
    let dir = setup_project();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Write report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task"));

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"));
}

#[test]
fn test_task_add_rejects_empty_description() {
    let dir = setup_project();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_task_add_with_metadata() {
    let dir = setup_project();
    let id = add_task(&dir, "placeholder");

    // Re-add with metadata flags and verify via show
    let output = focus_cmd()
        .current_dir(dir.path())
        .args([
            "task",
            "add",
            "Urgent review",
            "--priority",
            "high",
            "--category",
            "work",
            "--due",
            "2026-09-15",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let created: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let new_id = created["id"].as_str().unwrap();
    assert_ne!(new_id, id);

    let shown = show_task(&dir, new_id);
    assert_eq!(shown["priority"], "high");
    assert_eq!(shown["category"], "work");
    assert_eq!(shown["due_date"], "2026-09-15");
}

#[test]
fn test_task_done_marks_completed() {
    let dir = setup_project();
    let id = add_task(&dir, "Quick job");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed task"));

    let shown = show_task(&dir, &id);
    assert_eq!(shown["completed"], true);
    assert!(shown["completed_at"].is_string());
}

#[test]
fn test_task_done_is_idempotent() {
    let dir = setup_project();
    let id = add_task(&dir, "Repeat me");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &id])
        .assert()
        .success();
    let first = show_task(&dir, &id)["completed_at"].clone();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &id])
        .assert()
        .success();
    let second = show_task(&dir, &id)["completed_at"].clone();

    // Original completion timestamp survives the second call
    assert_eq!(first, second);
}

#[test]
fn test_task_undone_reopens() {
    let dir = setup_project();
    let id = add_task(&dir, "Changed my mind");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &id])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "undone", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reopened task"));

    let shown = show_task(&dir, &id);
    assert_eq!(shown["completed"], false);
    assert!(shown["completed_at"].is_null());
}

#[test]
fn test_task_delete_removes_task() {
    let dir = setup_project();
    let id = add_task(&dir, "Ephemeral");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task"));

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_unknown_task_id_fails() {
    let dir = setup_project();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", "t-0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

// =============================================================================
// Dependency Tests
// =============================================================================

#[test]
fn test_blocked_task_cannot_complete() {
    let dir = setup_project();
    let prereq = add_task(&dir, "Gather data");
    let dependent = add_task(&dir, "Write analysis");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &dependent, &prereq])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &dependent])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prerequisite(s) incomplete"));
}

#[test]
fn test_completing_prerequisite_unblocks_dependent() {
    let dir = setup_project();
    let prereq = add_task(&dir, "Gather data");
    let dependent = add_task(&dir, "Write analysis");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &dependent, &prereq])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &prereq])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unblocked"));

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &dependent])
        .assert()
        .success();
}

#[test]
fn test_unblock_requires_all_prerequisites() {
    let dir = setup_project();
    let first = add_task(&dir, "Step one");
    let second = add_task(&dir, "Step two");
    let last = add_task(&dir, "Final step");

    for prereq in [&first, &second] {
        focus_cmd()
            .current_dir(dir.path())
            .args(["task", "dep", &last, prereq])
            .assert()
            .success();
    }

    // Only the last blocker's completion reports the unblock
    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &first])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unblocked").not());

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &second])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unblocked"));
}

#[test]
fn test_self_dependency_rejected() {
    let dir = setup_project();
    let id = add_task(&dir, "Recursive");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &id, &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Self-dependency"));
}

#[test]
fn test_cycle_rejected() {
    let dir = setup_project();
    let a = add_task(&dir, "Task A");
    let b = add_task(&dir, "Task B");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &a, &b])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &b, &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn test_undep_removes_prerequisite() {
    let dir = setup_project();
    let prereq = add_task(&dir, "Optional step");
    let dependent = add_task(&dir, "Main work");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &dependent, &prereq])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "undep", &dependent, &prereq])
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer requires"));

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &dependent])
        .assert()
        .success();
}

#[test]
fn test_deps_shows_both_directions() {
    let dir = setup_project();
    let prereq = add_task(&dir, "Foundation");
    let dependent = add_task(&dir, "Structure");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &dependent, &prereq])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "deps", &prereq])
        .assert()
        .success()
        .stdout(predicate::str::contains("Required by:"))
        .stdout(predicate::str::contains("Structure"));

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "deps", &dependent])
        .assert()
        .success()
        .stdout(predicate::str::contains("Requires:"))
        .stdout(predicate::str::contains(&prereq));
}

#[test]
fn test_delete_warns_dependents() {
    let dir = setup_project();
    let prereq = add_task(&dir, "Doomed prerequisite");
    let dependent = add_task(&dir, "Survivor");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &dependent, &prereq])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "delete", &prereq])
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer requires"));

    // Dependent is no longer blocked
    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &dependent])
        .assert()
        .success();
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_ready_and_blocked_queries() {
    let dir = setup_project();
    let prereq = add_task(&dir, "Free task");
    let dependent = add_task(&dir, "Held task");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "dep", &dependent, &prereq])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .arg("ready")
        .assert()
        .success()
        .stdout(predicate::str::contains("Free task"))
        .stdout(predicate::str::contains("Held task").not());

    focus_cmd()
        .current_dir(dir.path())
        .arg("blocked")
        .assert()
        .success()
        .stdout(predicate::str::contains("Held task"))
        .stdout(predicate::str::contains("blocked by"));
}

#[test]
fn test_completed_tasks_hidden_from_queries() {
    let dir = setup_project();
    let id = add_task(&dir, "Done deal");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &id])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .arg("ready")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done deal").not());

    // But list --all still shows it
    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Done deal"));
}

#[test]
fn test_status_overview() {
    let dir = setup_project();
    let done = add_task(&dir, "Finished");
    add_task(&dir, "Pending");

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "done", &done])
        .assert()
        .success();

    let output = focus_cmd()
        .current_dir(dir.path())
        .args(["status", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["tasks"]["total"], 2);
    assert_eq!(json["tasks"]["completed"], 1);
    assert_eq!(json["tasks"]["ready"], 1);
    assert_eq!(json["tasks"]["blocked"], 0);
}

// =============================================================================
// Pomodoro Tests
// =============================================================================

#[test]
fn test_pomodoro_status_shows_defaults() {
    let dir = setup_project();

    focus_cmd()
        .current_dir(dir.path())
        .args(["pomodoro", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25:00"))
        .stdout(predicate::str::contains("every 4 sessions"));
}

#[test]
fn test_pomodoro_config_set_and_show() {
    let dir = setup_project();

    focus_cmd()
        .current_dir(dir.path())
        .args(["pomodoro", "config", "--work", "600", "--interval", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated pomodoro settings"));

    focus_cmd()
        .current_dir(dir.path())
        .args(["pomodoro", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("work_duration = 600"))
        .stdout(predicate::str::contains("long_break_interval = 2"));
}

#[test]
fn test_pomodoro_config_rejects_zero_duration() {
    let dir = setup_project();

    focus_cmd()
        .current_dir(dir.path())
        .args(["pomodoro", "config", "--work", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn test_pomodoro_run_records_session() {
    let dir = setup_project();

    // Shrink durations so the run finishes quickly
    focus_cmd()
        .current_dir(dir.path())
        .args([
            "pomodoro",
            "config",
            "--work",
            "1",
            "--short-break",
            "1",
            "--long-break",
            "1",
        ])
        .assert()
        .success();

    focus_cmd()
        .current_dir(dir.path())
        .args(["pomodoro", "run", "--sessions", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work session complete (1 today)"));

    assert!(dir.path().join(".focus/pomodoro_history.json").is_file());

    let output = focus_cmd()
        .current_dir(dir.path())
        .args(["pomodoro", "status", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["sessions_today"], 1);
    assert_eq!(json["sessions_total"], 1);
}

// =============================================================================
// Output Format Tests
// =============================================================================

#[test]
fn test_json_list_output() {
    let dir = setup_project();
    add_task(&dir, "Structured");

    let output = focus_cmd()
        .current_dir(dir.path())
        .args(["task", "list", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["description"], "Structured");
    assert_eq!(items[0]["completed"], false);
    assert_eq!(items[0]["blocked"], false);
}

#[test]
fn test_verbose_output_goes_to_stderr() {
    let dir = setup_project();

    focus_cmd()
        .current_dir(dir.path())
        .args(["task", "list", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose]"));
}

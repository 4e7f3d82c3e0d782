//! Integration tests for the levelup CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Get a Command for the levelup binary, pointed at `dir` for storage.
fn levelup(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("levelup"));
    cmd.env("NO_COLOR", "1").arg("--data-dir").arg(dir.path());
    cmd
}

fn json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Active goals of `category` as (id, title, priority) in display order.
fn goals_in(dir: &TempDir, category: &str) -> Vec<(String, String, u64)> {
    let groups = json(levelup(dir).args(["goal", "list", "--json", "--category", category]));
    groups[0][1]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| {
            (
                g["id"].as_str().unwrap().to_string(),
                g["title"].as_str().unwrap().to_string(),
                g["priority"].as_u64().unwrap(),
            )
        })
        .collect()
}

fn add_goal(dir: &TempDir, title: &str, category: &str) {
    levelup(dir)
        .args(["goal", "add", title, "--category", category, "--due", "2026-12-31"])
        .assert()
        .success();
}

#[test]
fn test_help() {
    Command::new(cargo::cargo_bin!("levelup"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Track goals, daily tasks and workouts"));
}

#[test]
fn test_version() {
    Command::new(cargo::cargo_bin!("levelup"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_goal_add_and_list() {
    let temp = TempDir::new().unwrap();

    levelup(&temp)
        .args(["goal", "add", "Save 1000", "-c", "Finances", "-d", "2026-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'Save 1000' to"));

    levelup(&temp)
        .args(["goal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finances"))
        .stdout(predicate::str::contains("1. Save 1000"));

    assert!(temp.path().join("store.json").exists());
}

#[test]
fn test_goal_insert_at_priority() {
    let temp = TempDir::new().unwrap();
    for title in ["A", "B", "C"] {
        add_goal(&temp, title, "Work");
    }

    levelup(&temp)
        .args(["goal", "add", "X", "-c", "Work", "-d", "2026-12-31", "-p", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at #2"));

    let goals = goals_in(&temp, "Work");
    let titles: Vec<&str> = goals.iter().map(|(_, t, _)| t.as_str()).collect();
    let priorities: Vec<u64> = goals.iter().map(|(_, _, p)| *p).collect();
    assert_eq!(titles, ["A", "X", "B", "C"]);
    assert_eq!(priorities, [1, 2, 3, 4]);
}

#[test]
fn test_goal_move_down_by_prefix() {
    let temp = TempDir::new().unwrap();
    for title in ["A", "B", "C"] {
        add_goal(&temp, title, "Personal");
    }
    let a = goals_in(&temp, "Personal")[0].0.clone();

    levelup(&temp)
        .args(["goal", "down", &a[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved down"));

    let titles: Vec<String> = goals_in(&temp, "Personal")
        .into_iter()
        .map(|(_, t, _)| t)
        .collect();
    assert_eq!(titles, ["B", "A", "C"]);
}

#[test]
fn test_goal_unknown_id_fails() {
    let temp = TempDir::new().unwrap();
    add_goal(&temp, "A", "Work");

    levelup(&temp)
        .args(["goal", "complete", "zzzzzzzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No goal matches"));
}

#[test]
fn test_goal_blank_title_rejected() {
    let temp = TempDir::new().unwrap();

    levelup(&temp)
        .args(["goal", "add", "   ", "-c", "Work", "-d", "2026-12-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be blank"));
}

#[test]
fn test_goal_progress_is_clamped() {
    let temp = TempDir::new().unwrap();
    add_goal(&temp, "Read", "Personal");
    let id = goals_in(&temp, "Personal")[0].0.clone();

    levelup(&temp)
        .args(["goal", "progress", &id, "150"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress set to 100%"));
}

#[test]
fn test_goal_progress_nan_changes_nothing() {
    let temp = TempDir::new().unwrap();
    add_goal(&temp, "Read", "Personal");
    let id = goals_in(&temp, "Personal")[0].0.clone();
    levelup(&temp)
        .args(["goal", "progress", &id, "40"])
        .assert()
        .success();

    levelup(&temp)
        .args(["goal", "progress", &id, "NaN"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Progress set").not())
        .stderr(predicate::str::contains("nothing changed"));

    let groups = json(levelup(&temp).args(["goal", "list", "--json", "-c", "Personal"]));
    assert_eq!(groups[0][1][0]["progress"], 0.4);
}

#[test]
fn test_goal_complete_updates_ranks() {
    let temp = TempDir::new().unwrap();
    add_goal(&temp, "A", "Work");
    add_goal(&temp, "B", "Work");
    let a = goals_in(&temp, "Work")[0].0.clone();

    levelup(&temp)
        .args(["goal", "complete", &a])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed 'A'"));

    let remaining = goals_in(&temp, "Work");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].2, 1);

    let ranks = json(levelup(&temp).args(["goal", "ranks", "--json"]));
    let work = ranks["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["category"] == "Work")
        .unwrap();
    assert_eq!(work["completed"], 1);
    assert_eq!(work["rank"], "Iron");
    assert_eq!(ranks["overall"], "Iron");

    let completed = json(levelup(&temp).args(["goal", "completed", "--json"]));
    assert_eq!(completed["Work"].as_array().unwrap().len(), 1);
}

#[test]
fn test_goal_reset_requires_two_confirmations() {
    let temp = TempDir::new().unwrap();
    add_goal(&temp, "A", "Work");
    let a = goals_in(&temp, "Work")[0].0.clone();
    levelup(&temp).args(["goal", "complete", &a]).assert().success();

    levelup(&temp)
        .args(["goal", "reset", "Work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    levelup(&temp)
        .args(["goal", "reset", "Work", "--yes", "--confirm", "work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Confirmation does not match"));

    let ranks = json(levelup(&temp).args(["goal", "ranks", "--json"]));
    assert!(ranks["categories"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["category"] == "Work" && c["completed"] == 1));

    levelup(&temp)
        .args(["goal", "reset", "Work", "--yes", "--confirm", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 archived completion(s) removed"));

    let completed = json(levelup(&temp).args(["goal", "completed", "--json"]));
    assert!(completed.as_object().unwrap().is_empty());
}

#[test]
fn test_config_default_categories() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("levelup.toml"),
        "default_categories = [\"Health\", \"Study\"]\n",
    )
    .unwrap();

    let ranks = json(levelup(&temp).args(["goal", "ranks", "--json"]));
    let names: Vec<&str> = ranks["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["category"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Health", "Study"]);
}

#[test]
fn test_invalid_config_exit_code() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "retention_days = 0\n").unwrap();

    levelup(&temp)
        .arg("--config")
        .arg(&config)
        .args(["goal", "list"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("retention_days"));
}

#[test]
fn test_task_lifecycle() {
    let temp = TempDir::new().unwrap();

    levelup(&temp)
        .args(["task", "add", "Dentist", "-D", "2099-03-01", "-t", "14:30", "-m", "bring card"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scheduled 'Dentist' for 2099-03-01 14:30"));

    let tasks = json(levelup(&temp).args(["task", "list", "--all", "--json"]));
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["description"], "bring card");
    assert_eq!(tasks[0]["isCompleted"], false);
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    levelup(&temp)
        .args(["task", "toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked done"));

    levelup(&temp)
        .args(["task", "list", "-D", "2099-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"))
        .stdout(predicate::str::contains("Dentist"));

    levelup(&temp)
        .args(["task", "delete", &id])
        .assert()
        .success();

    let tasks = json(levelup(&temp).args(["task", "list", "--all", "--json"]));
    assert!(tasks.as_array().unwrap().is_empty());
}

#[test]
fn test_task_overdue_rolls_forward() {
    let temp = TempDir::new().unwrap();
    let yesterday = chrono::Local::now().date_naive() - chrono::Days::new(1);

    levelup(&temp)
        .args(["task", "add", "Laundry", "-D", &yesterday.to_string()])
        .assert()
        .success();

    // Any task command runs the rollover pass first.
    let tasks = json(levelup(&temp).args(["task", "list", "--json"]));
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Laundry");
    assert_eq!(tasks[0]["rolloverCount"], 1);

    let report = json(levelup(&temp).args(["task", "maintain", "--json"]));
    assert_eq!(report["unchanged"], 1);
    assert_eq!(report["rolled"], 0);
}

#[test]
fn test_workout_logging() {
    let temp = TempDir::new().unwrap();

    levelup(&temp)
        .args(["workout", "add", "chest", "Bench Press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logging 'Bench Press' on Chest day"));

    levelup(&temp)
        .args(["workout", "add", "Chest", "Bench Press"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already logged"));

    let logs = json(levelup(&temp).args(["workout", "list", "chest", "--json"]));
    assert_eq!(logs[0]["sets"].as_array().unwrap().len(), 5);
    let id = logs[0]["id"].as_str().unwrap().to_string();

    levelup(&temp)
        .args(["workout", "set", &id, "1", "-w", "100", "-r", "5"])
        .assert()
        .success();

    levelup(&temp)
        .args(["workout", "set", &id, "9", "-w", "1", "-r", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Set 9 does not exist"));

    levelup(&temp)
        .args(["workout", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("volume 500"))
        .stdout(predicate::str::contains("1. 100 x 5"));

    levelup(&temp)
        .args(["workout", "delete", &id])
        .assert()
        .success();

    let logs = json(levelup(&temp).args(["workout", "list", "--json"]));
    assert!(logs.as_array().unwrap().is_empty());
}

#[test]
fn test_workout_unknown_body_part() {
    let temp = TempDir::new().unwrap();

    levelup(&temp)
        .args(["workout", "add", "arms", "Curl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown body part"));
}

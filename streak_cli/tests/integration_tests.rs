//! Integration tests for the krep-streak binary.
//!
//! These tests verify end-to-end behavior including:
//! - Session logging to the journal
//! - Streak and adherence reporting at a pinned clock
//! - Week Zero bookkeeping and cycle reset
//! - Weekly breakdown and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("krep-streak"))
}

fn log_session(data_dir: &Path, kind: &str, at: &str) {
    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--kind")
        .arg(kind)
        .arg("--at")
        .arg(at)
        .assert()
        .success();
}

fn status_json(data_dir: &Path, now: &str) -> serde_json::Value {
    let output = cli()
        .arg("status")
        .arg("--json")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--now")
        .arg(now)
        .output()
        .expect("Failed to run status");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("status output is not JSON")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout streak and adherence tracker",
        ));
}

#[test]
fn test_empty_data_dir_reports_zero() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--now")
        .arg("2024-03-10T09:00:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 0 days"))
        .stdout(predicate::str::contains("Adherence (30-day window): 0%"));
}

#[test]
fn test_log_appends_to_journal() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--kind")
        .arg("strength")
        .arg("--at")
        .arg("2024-03-04T07:30:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged strength session on 2024-03-04"));

    let journal = fs::read_to_string(temp_dir.path().join("sessions.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 1);
    assert!(journal.contains("2024-03-04T07:30:00"));
}

#[test]
fn test_log_rejects_unknown_kind() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--kind")
        .arg("juggling")
        .assert()
        .failure();

    assert!(!temp_dir.path().join("sessions.jsonl").exists());
}

#[test]
fn test_full_week_streak() {
    let temp_dir = setup_test_dir();
    for day in 3..=9 {
        log_session(temp_dir.path(), "strength", &format!("2024-03-{:02}T07:00:00", day));
    }

    let report = status_json(temp_dir.path(), "2024-03-10T09:00:00");
    assert_eq!(report["current_streak"], 7);
    assert_eq!(report["longest_streak"], 7);
    assert_eq!(report["adherence"], 100);

    // Two days later the current streak has lapsed
    let report = status_json(temp_dir.path(), "2024-03-11T09:00:00");
    assert_eq!(report["current_streak"], 0);
    assert_eq!(report["longest_streak"], 7);
}

#[test]
fn test_midweek_start_creates_week_zero() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--kind")
        .arg("cardio")
        .arg("--at")
        .arg("2024-03-06T18:00:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1 begins 2024-03-10"));

    for day in 7..=9 {
        log_session(temp_dir.path(), "cardio", &format!("2024-03-{:02}T18:00:00", day));
    }

    let schedule = fs::read_to_string(temp_dir.path().join("schedule.json")).unwrap();
    assert!(schedule.contains("\"is_week_zero\": true"));

    let report = status_json(temp_dir.path(), "2024-03-09T20:00:00");
    assert_eq!(report["current_streak"], 4);
    assert_eq!(report["longest_streak"], 4);
    // Week Zero days are not eligible for adherence
    assert_eq!(report["adherence"], 0);
}

#[test]
fn test_reset_cycle_clears_week_zero() {
    let temp_dir = setup_test_dir();
    log_session(temp_dir.path(), "strength", "2024-03-07T18:00:00");

    cli()
        .arg("reset-cycle")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--now")
        .arg("2024-03-08T08:00:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycle reset on 2024-03-08"));

    let report = status_json(temp_dir.path(), "2024-03-08T08:00:00");
    // Only Mar 7 is eligible once Week Zero is gone
    assert_eq!(report["adherence"], 100);
}

#[test]
fn test_history_file_with_corrupt_entries() {
    let temp_dir = setup_test_dir();
    let history = temp_dir.path().join("export.json");
    fs::write(
        &history,
        r#"[
            {"date": "2024-03-08T07:00:00", "kind": "strength"},
            {"date": "not-a-date", "kind": "strength"},
            {"date": "2024-03-09T07:00:00", "kind": "strength"},
            {"kind": "cardio"}
        ]"#,
    )
    .unwrap();

    let output = cli()
        .arg("status")
        .arg("--json")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--history")
        .arg(&history)
        .arg("--now")
        .arg("2024-03-10T09:00:00")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sessions_considered"], 2);
    assert_eq!(report["current_streak"], 2);
    assert_eq!(report["adherence"], 100);
}

#[test]
fn test_window_override() {
    let temp_dir = setup_test_dir();
    log_session(temp_dir.path(), "yoga", "2024-03-01T07:00:00");
    log_session(temp_dir.path(), "yoga", "2024-03-09T07:00:00");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--now")
        .arg("2024-03-10T09:00:00")
        .arg("--window")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adherence (2-day window): 100%"));
}

#[test]
fn test_weeks_and_export() {
    let temp_dir = setup_test_dir();
    for day in 3..=8 {
        log_session(temp_dir.path(), "strength", &format!("2024-03-{:02}T07:00:00", day));
    }

    cli()
        .arg("weeks")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--now")
        .arg("2024-03-12T09:00:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-03"))
        .stdout(predicate::str::contains("valid"));

    let out = temp_dir.path().join("reports").join("weeks.csv");
    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--now")
        .arg("2024-03-12T09:00:00")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 weeks"));

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("week_start,status,outcome"));
    assert!(csv.contains("2024-03-03,complete,valid,7,6,6,0,1,"));
}

#[test]
fn test_rest_entries_do_not_keep_streak_current() {
    let temp_dir = setup_test_dir();
    for day in 3..=9 {
        log_session(temp_dir.path(), "strength", &format!("2024-03-{:02}T07:00:00", day));
    }
    for day in 10..=14 {
        log_session(temp_dir.path(), "rest", &format!("2024-03-{:02}T07:00:00", day));
    }

    let report = status_json(temp_dir.path(), "2024-03-14T20:00:00");
    assert_eq!(report["current_streak"], 0);
    assert_eq!(report["longest_streak"], 7);
}

#[test]
fn test_init_config_and_rolling_grace() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config").join("config.toml");

    cli()
        .arg("init-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("grace_hours = 24"));

    // Refuses to clobber without --force
    cli()
        .arg("init-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure();

    fs::write(&config_path, "[streak]\ngrace = \"rolling\"\n").unwrap();
    log_session(temp_dir.path(), "strength", "2024-03-09T08:00:00");

    // 36 hours on: yesterday by the calendar, outside the rolling window
    let output = cli()
        .arg("status")
        .arg("--json")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("--now")
        .arg("2024-03-10T20:00:00")
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["current_streak"], 0);

    let report = status_json(temp_dir.path(), "2024-03-10T20:00:00");
    assert_eq!(report["current_streak"], 1);
}

#[test]
fn test_oversized_grace_hours_rejected() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[streak]\ngrace = \"rolling\"\ngrace_hours = 9223372036854775807\n",
    )
    .unwrap();

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("grace_hours"));
}

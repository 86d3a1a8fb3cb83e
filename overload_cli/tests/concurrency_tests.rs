//! Concurrency tests for the overload binary.
//!
//! These tests verify that multiple processes can safely:
//! - Start the session for one date simultaneously (one session results)
//! - Log sets into one session simultaneously (no set is lost)
//! - Read the week preview while sessions are written

use assert_cmd::Command;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn cli(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("overload"));
    cmd.env("XDG_CONFIG_HOME", root.join("config"))
        .arg("--data-dir")
        .arg(root.join("data"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Every snapshot line in the session log, in file order
fn snapshots(root: &Path) -> Vec<serde_json::Value> {
    let log = std::fs::read_to_string(root.join("data/sessions.jsonl")).expect("Failed to read log");
    log.lines()
        .map(|line| serde_json::from_str(line).expect("Corrupt log line"))
        .collect()
}

#[test]
fn test_concurrent_start_creates_one_session() {
    let temp_dir = setup_test_dir();
    let root: PathBuf = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = root.clone();
            thread::spawn(move || {
                cli(&root)
                    .args(["start", "--date", "2024-03-04"])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let lines = snapshots(&root);
    let ids: HashSet<&str> = lines.iter().filter_map(|s| s["id"].as_str()).collect();
    assert_eq!(ids.len(), 1, "Expected one session, got {:?}", ids);
    assert_eq!(lines.len(), 1, "Only the first start should write");
}

#[test]
fn test_concurrent_logging_loses_no_set() {
    let temp_dir = setup_test_dir();
    let root: PathBuf = temp_dir.path().to_path_buf();

    cli(&root)
        .args(["start", "--date", "2024-03-04"])
        .assert()
        .success();
    let session = snapshots(&root)[0]["id"]
        .as_str()
        .expect("Session without id")
        .to_string();

    let handles: Vec<_> = (1..=4)
        .map(|set| {
            let root = root.clone();
            let session = session.clone();
            thread::spawn(move || {
                cli(&root)
                    .args(["log", "--session", session.as_str()])
                    .args(["--exercise", "barbell_bench_press"])
                    .arg("--set")
                    .arg(set.to_string())
                    .args(["--reps", "10", "--weight", "135"])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let lines = snapshots(&root);
    assert_eq!(lines.len(), 5);

    // The last snapshot wins, so it has to carry every set
    let latest = lines.last().unwrap();
    let bench = latest["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["exercise_id"] == "barbell_bench_press")
        .expect("Bench press missing");
    let logged: Vec<u64> = bench["sets"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["actual_reps"].as_u64())
        .collect();
    assert_eq!(logged, vec![10, 10, 10, 10]);
}

#[test]
fn test_preview_while_writing() {
    let temp_dir = setup_test_dir();
    let root: PathBuf = temp_dir.path().to_path_buf();

    let writer_root = root.clone();
    let writer = thread::spawn(move || {
        for day in 4..=8 {
            thread::sleep(Duration::from_millis(5));
            cli(&writer_root)
                .args(["start", "--date", &format!("2024-03-{:02}", day)])
                .assert()
                .success();
        }
    });

    for _ in 0..5 {
        cli(&root).arg("preview").assert().success();
    }

    writer.join().expect("Writer thread panicked");

    let ids: HashSet<String> = snapshots(&root)
        .iter()
        .filter_map(|s| s["id"].as_str().map(str::to_string))
        .collect();
    assert_eq!(ids.len(), 5);
}

//! Runs the `media-trends` binary as a child process.

use std::fs;
use std::process::Command;

fn media_trends() -> Command {
    Command::new(env!("CARGO_BIN_EXE_media-trends"))
}

#[test]
fn test_fatal_error_is_printed_with_logging_off() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let output = media_trends()
        .env("RUST_LOG", "off")
        .args(["--rows", "10", "--no-charts", "--output-dir"])
        .arg(blocker.join("x"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: analysis failed"), "stderr: {stderr}");
    assert!(stderr.contains("blocker"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_json_report_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = media_trends()
        .env("RUST_LOG", "off")
        .args(["--rows", "30", "--seed", "9", "--format", "json", "--no-charts", "--no-export"])
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metadata"]["seed"], 9);
    assert_eq!(report["metadata"]["usage_rows"], 30);
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_redirected_logs_carry_no_colour_codes() {
    let dir = tempfile::tempdir().unwrap();
    let output = media_trends()
        .env("RUST_LOG", "media_trends=info")
        .args(["--rows", "10", "--no-charts", "--output-dir"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("analysis complete"), "stderr: {stderr}");
    assert!(!stderr.contains('\u{1b}'));
}

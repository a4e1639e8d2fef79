//! CLI tests for the `opl check` subcommand.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn write_temp_opl(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.opl");
    fs::write(&path, content).unwrap();
    (dir, path.to_string_lossy().to_string())
}

fn opl_cmd() -> Command {
    Command::new(cargo::cargo_bin!("opl"))
}

#[test]
fn check_ok_file_reports_entity_count() {
    let (_dir, path) = write_temp_opl("# header\nn1 v1\nw2 Nn1\n\n");
    let output = opl_cmd()
        .args(["check", &path])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["status"], "ok");
    assert_eq!(summary["entities"], 2);
}

#[test]
fn check_stops_at_first_error_by_default() {
    let (_dir, path) = write_temp_opl("n1 v1\nn2 q\nn3 q\n");
    let output = opl_cmd()
        .args(["check", &path])
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));

    let errors: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["message"], "unknown attribute");
    assert_eq!(errors[0]["line"], 2);
    assert_eq!(errors[0]["column"], 3);
}

#[test]
fn check_keep_going_reports_every_failing_line() {
    let (_dir, path) = write_temp_opl("n1 v1\nx bad\nn3 v1\nn4 dQ\n");
    let output = opl_cmd()
        .args(["check", &path, "--keep-going"])
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));

    let errors: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["message"], "unknown type");
    assert_eq!(errors[0]["line"], 2);
    assert_eq!(errors[1]["message"], "invalid visible flag");
    assert_eq!(errors[1]["line"], 4);
    assert_eq!(errors[1]["column"], 4);
}

#[test]
fn check_masked_out_lines_are_not_parsed() {
    // The node line is malformed, but with nodes masked out the
    // dispatcher never parses it.
    let (_dir, path) = write_temp_opl("n1 zzz\nw1 Nn1\n");
    let output = opl_cmd()
        .args(["check", &path, "--types", "w"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["entities"], 1);
}

#[test]
fn check_pretty_output_renders_source_context() {
    let (_dir, path) = write_temp_opl("n1 v1 v2\n");
    let output = opl_cmd()
        .args(["check", &path, "--output", "pretty"])
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Duplicate attribute: version (v)"),
        "missing message in pretty output: {stderr}"
    );
}

#[test]
fn check_crlf_lines_are_tolerated() {
    let (_dir, path) = write_temp_opl("n1 v1\r\nw2 Nn1\r\n");
    let output = opl_cmd()
        .args(["check", &path])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["entities"], 2);
}

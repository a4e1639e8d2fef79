//! CLI tests for the `opl parse` subcommand.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

const SAMPLE_OPL: &str = "\
# sample extract
n17 v1 dV c123 t2016-03-04T12:34:56Z i42 ualice Tamenity=bench x8.4234 y49.0123
w5 v2 Thighway=residential Nn100,n101x8.1y49.2,n102
r7 Mn1@from,w2@via,r3@
c42 k100 d3 i1 ubob x1.0 y2.0 X3.0 Y4.0
";

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
fn parse_prints_entities_as_json() {
    let (_dir, path) = write_temp_opl(SAMPLE_OPL);
    let output = opl_cmd()
        .args(["parse", &path])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let entities: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let entities = entities.as_array().expect("JSON array");
    assert_eq!(entities.len(), 4, "comment line emits nothing");

    assert_eq!(entities[0]["kind"], "node");
    assert_eq!(entities[0]["id"], 17);
    assert_eq!(entities[0]["user"], "alice");
    assert_eq!(entities[0]["timestamp"], "2016-03-04T12:34:56Z");

    assert_eq!(entities[1]["kind"], "way");
    assert_eq!(entities[1]["nodes"].as_array().unwrap().len(), 3);

    assert_eq!(entities[2]["kind"], "relation");
    assert_eq!(entities[2]["members"][1]["type"], "way");
    assert_eq!(entities[2]["members"][2]["role"], "");

    assert_eq!(entities[3]["kind"], "changeset");
    assert_eq!(entities[3]["num_changes"], 100);
}

#[test]
fn parse_respects_types_filter() {
    let (_dir, path) = write_temp_opl(SAMPLE_OPL);
    let output = opl_cmd()
        .args(["parse", &path, "--types", "nw"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let entities: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let kinds: Vec<&str> = entities
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["node", "way"]);
}

#[test]
fn parse_rejects_bad_types_letter() {
    let (_dir, path) = write_temp_opl(SAMPLE_OPL);
    let output = opl_cmd()
        .args(["parse", &path, "--types", "nz"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown entity type letter"), "{stderr}");
}

#[test]
fn parse_error_reports_line_and_column() {
    let (_dir, path) = write_temp_opl("n1 v1\nn2 v1 v2\n");
    let output = opl_cmd()
        .args(["parse", &path])
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(1));

    let errors: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1, "parse stops at the first failing line");
    assert_eq!(errors[0]["message"], "Duplicate attribute: version (v)");
    assert_eq!(errors[0]["line"], 2);
    assert_eq!(errors[0]["column"], 6);
}

#[test]
fn parse_missing_file_is_an_io_error() {
    let output = opl_cmd()
        .args(["parse", "/no/such/file.opl"])
        .output()
        .expect("failed to run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "{stderr}");
}

#[test]
fn parse_help_names_the_file_argument() {
    let output = opl_cmd()
        .args(["parse", "--help"])
        .output()
        .expect("failed to run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FILE"), "missing FILE in help: {stdout}");
    assert!(stdout.contains("--types"), "missing --types in help");
}

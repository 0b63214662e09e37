//! Command-line behavior of the `mcheck` binary.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const ENGINE_MANIFEST: &str = r#"{
    "inputs": ["SAL", "NBPART"],
    "outputs": [
        { "name": "IMP", "terms": [ { "input": "NBPART", "coefficient": 100.0 } ] },
        { "name": "NET", "terms": [ { "input": "SAL", "coefficient": 0.5 } ] }
    ],
    "errors": [
        { "kind": "A", "major_code": "000", "minor_code": "001",
          "description": "salary above ceiling", "classification": "N",
          "raised_when": { "input": "SAL", "above": 20000.0 } }
    ]
}"#;

fn mcheck() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mcheck"));
    cmd.env_remove("MCHECK_ENGINE")
        .env_remove("MCHECK_REPEAT")
        .env_remove("MCHECK_REPORT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn setup(fixture: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().expect("tempdir should be created");
    let engine = temp.path().join("engine.json");
    let case = temp.path().join("cases/case.m");
    write_file(&engine, ENGINE_MANIFEST);
    write_file(&case, fixture);
    (temp, engine, case)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Scenario 3: no argument.
#[test]
fn no_argument_prints_usage_and_fails() {
    let output = mcheck().output().expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let out = stdout(&output);
    assert!(out.contains("Expected one command-line argument"), "stdout: {}", out);
    assert!(out.contains("Usage"), "stdout: {}", out);
}

/// Scenario 3: two arguments.
#[test]
fn two_arguments_print_usage_and_fail() {
    let output = mcheck()
        .args(["a.m", "b.m"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("Expected one command-line argument"));
}

/// Scenario 4: missing fixture, reported even without an engine.
#[test]
fn missing_fixture_reports_not_found() {
    let temp = TempDir::new().unwrap();
    let output = mcheck()
        .arg(temp.path().join("nope.m"))
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).contains("Run file not found!"));
}

#[test]
fn passing_fixture_exits_zero_silently() {
    let (_temp, engine, case) = setup(
        "#ENTREES-PRIMITIF\nSAL/30000\n#CONTROLES-PRIMITIF\n#RESULTATS-PRIMITIF\nIMP/0\nNET/15000\n#ENTREES-CORRECTIF\n",
    );

    let output = mcheck()
        .arg("--engine")
        .arg(&engine)
        .arg(&case)
        .output()
        .expect("binary should run");

    assert!(
        output.status.success(),
        "stdout: {} stderr: {}",
        stdout(&output),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).is_empty());
}

/// Scenario 2 through the binary.
#[test]
fn mismatch_prints_diagnostic_and_fails() {
    let (_temp, engine, case) =
        setup("#ENTREES-PRIMITIF\nSAL/30000\n#CONTROLES-PRIMITIF\nIMP/5000\n#RESULTATS-PRIMITIF\n");

    let output = mcheck()
        .env("MCHECK_ENGINE", &engine)
        .arg(&case)
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Testing file:"), "stdout: {}", out);
    assert!(out.contains("case.m"));
    assert!(out.contains("Expected value for IMP : 5000.0000, computed 0.0000!"));
}

#[test]
fn report_is_written_even_on_mismatch() {
    let (temp, engine, case) =
        setup("#ENTREES-PRIMITIF\nSAL/30000\n#CONTROLES-PRIMITIF\nNET/1\nIMP/0\n");
    let report = temp.path().join("out/report.json");

    let output = mcheck()
        .arg("--engine")
        .arg(&engine)
        .arg("--repeat")
        .arg("7")
        .arg("--report")
        .arg(&report)
        .arg(&case)
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(1));
    let parsed: Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report should exist"))
            .expect("report should be JSON");
    assert_eq!(parsed["passed"], Value::Bool(false));
    assert_eq!(parsed["repeat_count"], 7);
    assert_eq!(parsed["assertions_checked"], 1);
    assert_eq!(parsed["mismatch"]["name"], "NET");
    assert_eq!(parsed["mismatch"]["computed"], 15000.0);
    assert_eq!(parsed["occurred_errors"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["occurred_errors"][0]["minor_code"], "001");
}

#[test]
fn check_mode_parses_without_evaluating() {
    let (_temp, engine, case) =
        setup("#ENTREES-PRIMITIF\nSAL/1\nNBPART/2\n#CONTROLES-PRIMITIF\nIMP/999\n");

    let output = mcheck()
        .arg("--check")
        .arg("--engine")
        .arg(&engine)
        .arg(&case)
        .output()
        .expect("binary should run");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("2 inputs, 1 expected outputs, evaluation triggered"), "stdout: {}", out);
}

#[test]
fn unknown_name_is_a_format_error() {
    let (_temp, engine, case) = setup("#ENTREES-PRIMITIF\nBOGUS/1\n#CONTROLES-PRIMITIF\n");

    let output = mcheck()
        .arg("--engine")
        .arg(&engine)
        .arg(&case)
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown input name: BOGUS"));
}

#[test]
fn missing_engine_configuration_fails() {
    let (_temp, _engine, case) = setup("#ENTREES-PRIMITIF\n");

    let output = mcheck().arg(&case).output().expect("binary should run");

    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("MCHECK_ENGINE"));
}

#[test]
fn zero_repeat_is_rejected() {
    let (_temp, engine, case) = setup("#ENTREES-PRIMITIF\n");

    let output = mcheck()
        .env("MCHECK_REPEAT", "0")
        .arg("--engine")
        .arg(&engine)
        .arg(&case)
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn repeat_flag_overrides_invalid_environment() {
    let (_temp, engine, case) =
        setup("#ENTREES-PRIMITIF\nSAL/30000\n#CONTROLES-PRIMITIF\nNET/15000\n");

    for bad in ["0", "many"] {
        let output = mcheck()
            .env("MCHECK_REPEAT", bad)
            .arg("--repeat")
            .arg("5")
            .arg("--engine")
            .arg(&engine)
            .arg(&case)
            .output()
            .expect("binary should run");

        assert!(
            output.status.success(),
            "MCHECK_REPEAT={} stderr: {}",
            bad,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn unopenable_fixture_reports_not_found() {
    let temp = TempDir::new().unwrap();
    let plain = temp.path().join("plain.txt");
    write_file(&plain, "not a directory");

    let output = mcheck()
        .arg(plain.join("case.m"))
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).contains("Run file not found!"));
}

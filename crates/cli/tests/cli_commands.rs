use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("widgets.json")
}

#[test]
fn analyze_prints_supported_and_rejected_functions() {
    cargo_bin_cmd!("wrapgen")
        .arg("analyze")
        .arg("--model")
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Functions (10): 8 supported, 2 rejected"))
        .stdout(predicate::str::contains("+ QWidget::setParent params=[parent: QLabel, QPushButton, QWidget]"))
        .stdout(predicate::str::contains("- QWidget::surfaceHandle (structural:"));
}

#[test]
fn analyze_json_is_machine_readable() {
    let output = cargo_bin_cmd!("wrapgen")
        .arg("analyze")
        .arg("--model")
        .arg(fixture())
        .arg("--json")
        .arg("--supported-only")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let body: serde_json::Value = serde_json::from_slice(&output).expect("analyze json");
    assert_eq!(body["supported_count"], 8);
    let decisions = body["decisions"].as_array().expect("decisions");
    assert_eq!(decisions.len(), 8);
    assert!(decisions.iter().all(|d| d["verdict"]["verdict"] == "supported"));
}

#[test]
fn analyze_minimal_flag_narrows_output() {
    cargo_bin_cmd!("wrapgen")
        .args(["analyze", "--minimal", "--model"])
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 supported, 8 rejected"))
        .stdout(predicate::str::contains("(not in minimal set)"));
}

#[test]
fn analyze_reads_config_file() {
    let tmp = tempdir().expect("tempdir");
    let config = tmp.path().join("engine.yaml");
    fs::write(&config, "minimal: true\n").expect("write config");

    cargo_bin_cmd!("wrapgen")
        .arg("analyze")
        .arg("--model")
        .arg(fixture())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 supported, 8 rejected"));
}

#[test]
fn dispatch_command_reports_candidates() {
    cargo_bin_cmd!("wrapgen")
        .args(["dispatch", "--function", "QAbstractButton::paintEvent", "--receiver", "--model"])
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("ptr: QPushButton, QAbstractButton"));
}

#[test]
fn virtuals_command_emits_json() {
    let output = cargo_bin_cmd!("wrapgen")
        .args(["virtuals", "--function", "QAbstractButton::paintEvent", "--json", "--model"])
        .arg(fixture())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let body: serde_json::Value = serde_json::from_slice(&output).expect("virtuals json");
    assert_eq!(body["derived_from_virtual"], true);
    assert_eq!(body["derived_from_impure"], true);
}

#[test]
fn rules_command_lists_builtin_table() {
    cargo_bin_cmd!("wrapgen")
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("[version_pinned @5.8.0]"))
        .stdout(predicate::str::contains("already marked unsupported"));
}

#[test]
fn fingerprint_is_stable_across_runs() {
    let run = || {
        let output = cargo_bin_cmd!("wrapgen")
            .arg("fingerprint")
            .arg("--model")
            .arg(fixture())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(output).expect("utf8").trim().to_string()
    };

    let first = run();
    assert_eq!(first.len(), 64);
    assert_eq!(first, run());
}

#[test]
fn version_flag_reports_core_version() {
    cargo_bin_cmd!("wrapgen")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("wrapgen {}", wrapgen_core::version())));
}

#[test]
fn missing_model_fails() {
    let tmp = tempdir().expect("tempdir");
    cargo_bin_cmd!("wrapgen")
        .arg("analyze")
        .arg("--model")
        .arg(tmp.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load metadata model"));
}

#[test]
fn unknown_function_fails() {
    cargo_bin_cmd!("wrapgen")
        .args(["dispatch", "--function", "QWidget::nope", "--model"])
        .arg(fixture())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Function not found: QWidget::nope"));
}

//! End-to-end tests for the form16 binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command isolated from any user configuration on the machine.
fn form16(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("form16").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn process_old_layout_with_deduction_as_json() {
    let home = TempDir::new().unwrap();

    form16(&home)
        .arg("process")
        .arg(fixture("old_layout.txt"))
        .args(["--deduction", "Sec80C=1,50,000", "--seed", "1", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"employee_name\":\"ANIL KUMAR\""))
        .stdout(predicate::str::contains("\"net_taxable_income\":866058"))
        .stdout(predicate::str::contains("\"old_regime_tax\":141140"));
}

#[test]
fn process_old_layout_as_text() {
    let home = TempDir::new().unwrap();

    form16(&home)
        .arg("process")
        .arg(fixture("old_layout.txt"))
        .args(["-d", "section_80c=150000", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANIL KUMAR"))
        .stdout(predicate::str::contains("₹1,41,140"))
        .stdout(predicate::str::contains("80C (PPF/ELSS/LIC etc.)"));
}

#[test]
fn process_new_layout_as_csv() {
    let home = TempDir::new().unwrap();

    form16(&home)
        .arg("process")
        .arg(fixture("new_layout.txt"))
        .args(["--format", "csv", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("source,regime,employee_name"))
        .stdout(predicate::str::contains("PRIYA SHARMA"))
        .stdout(predicate::str::contains(",new,"));
}

#[test]
fn process_applies_field_edits() {
    let home = TempDir::new().unwrap();

    form16(&home)
        .arg("process")
        .arg(fixture("new_layout.txt"))
        .args(["--set", "employee_name=RAVI VERMA", "--format", "json", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"employee_name\":\"RAVI VERMA\""))
        .stdout(predicate::str::contains("\"better_regime\":\"new\""));
}

#[test]
fn process_writes_output_file() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("report.json");

    form16(&home)
        .arg("process")
        .arg(fixture("old_layout.txt"))
        .args(["--format", "json", "--seed", "1", "--output"])
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"tds_deducted\":146140"));
    assert!(written.contains("\"refund\":5000"));
}

#[test]
fn process_missing_file_fails() {
    let home = TempDir::new().unwrap();

    form16(&home)
        .args(["process", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_empty_text_reports_soft_failure() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("blank.txt");
    fs::write(&input, "nothing useful here\n").unwrap();

    form16(&home)
        .arg("process")
        .arg(&input)
        .args(["--format", "json", "--seed", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No Form 16 fields could be read"))
        .stdout(predicate::str::contains("\"gross_salary\":0"));
}

#[test]
fn compute_compares_regimes() {
    let home = TempDir::new().unwrap();

    form16(&home)
        .args([
            "compute",
            "--income",
            "10,66,058",
            "--standard-deduction",
            "50000",
            "-d",
            "section_80c=150000",
            "--seed",
            "3",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"old_regime_tax\":141140"))
        .stdout(predicate::str::contains("\"net_taxable_income\":866058"));
}

#[test]
fn batch_writes_reports_and_summary() {
    let home = TempDir::new().unwrap();
    let input_dir = home.path().join("inputs");
    let output_dir = home.path().join("reports");
    fs::create_dir_all(&input_dir).unwrap();
    fs::copy(fixture("old_layout.txt"), input_dir.join("anil.txt")).unwrap();
    fs::copy(fixture("new_layout.txt"), input_dir.join("priya.txt")).unwrap();
    fs::write(input_dir.join("blank.txt"), "").unwrap();

    let pattern = format!("{}/*.txt", input_dir.display());
    form16(&home)
        .args(["batch", pattern.as_str(), "--summary", "--continue-on-error", "--seed", "1", "-o"])
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 1 failed"));

    assert!(output_dir.join("anil.json").exists());
    assert!(output_dir.join("priya.json").exists());

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 4);
    assert!(summary.contains("anil.txt,success,old,ANIL KUMAR"));
    assert!(summary.contains("blank.txt,error"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("blank.txt"), "").unwrap();

    let pattern = format!("{}/*.txt", home.path().display());
    form16(&home)
        .args(["batch", pattern.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("form16.json");
    let path = path.to_str().unwrap();

    form16(&home)
        .args(["config", "set", "report.indian_grouping", "false", "-c", path])
        .assert()
        .success();

    form16(&home)
        .args(["config", "get", "report.indian_grouping", "-c", path])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));

    form16(&home)
        .args(["config", "set", "report.no_such_key", "1", "-c", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_grouping_changes_text_report() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("form16.json");
    fs::write(&path, r#"{ "report": { "indian_grouping": false, "currency_symbol": "INR " } }"#)
        .unwrap();

    form16(&home)
        .arg("process")
        .arg(fixture("old_layout.txt"))
        .args(["-d", "section_80c=150000", "--seed", "1", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("INR 141,140"));
}

#[test]
fn rust_log_overrides_verbosity() {
    let home = TempDir::new().unwrap();
    let args = ["compute", "--income", "10,66,058", "--standard-deduction", "50000"];

    form16(&home)
        .args(args)
        .assert()
        .success()
        .stderr(predicate::str::contains("net taxable").not());

    form16(&home)
        .env("RUST_LOG", "info")
        .args(args)
        .assert()
        .success()
        .stderr(predicate::str::contains("net taxable 1016058"));
}

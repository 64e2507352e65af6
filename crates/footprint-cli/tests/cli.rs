use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with its config directory pointed at `home`.
fn footprint(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path()).env("HOME", home.path());
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    footprint(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_parse_missing_file() {
    let home = TempDir::new().unwrap();
    footprint(&home)
        .args(["parse", "does-not-exist.pdf", "--vendor", "dell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_parse_rejects_unknown_vendor() {
    let home = TempDir::new().unwrap();
    footprint(&home)
        .args(["parse", "report.pdf", "--vendor", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown vendor"));
}

#[test]
fn test_parse_invalid_pdf_fails() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("broken.pdf");
    fs::write(&input, b"this is not a pdf").unwrap();

    footprint(&home)
        .args(["parse", "--vendor", "hp", "--no-ocr"])
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn test_batch_without_matches() {
    let home = TempDir::new().unwrap();
    let pattern = home.path().join("*.pdf");

    footprint(&home)
        .args(["batch", "--vendor", "dell"])
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_batch_continue_on_error_writes_summary() {
    let home = TempDir::new().unwrap();
    let input_dir = home.path().join("reports");
    let output_dir = home.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();
    fs::write(input_dir.join("broken.pdf"), b"garbage").unwrap();
    fs::write(input_dir.join("notes.txt"), b"ignored").unwrap();

    footprint(&home)
        .args(["batch", "--vendor", "hp", "--no-ocr", "--summary", "--continue-on-error"])
        .arg(input_dir.join("*").to_str().unwrap())
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 HP reports"))
        .stdout(predicate::str::contains("0 parsed, 0 without data, 1 failed"));

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    let mut lines = summary.lines();
    assert!(lines.next().unwrap().starts_with("filename,status,processing_time_ms,error,name,"));
    assert!(lines.next().unwrap().starts_with("broken.pdf,error,"));
}

#[test]
fn test_batch_stops_on_first_error() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("broken.pdf"), b"garbage").unwrap();

    footprint(&home)
        .args(["batch", "--vendor", "dell", "--no-ocr"])
        .arg(home.path().join("*.pdf").to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_config_path_before_init() {
    let home = TempDir::new().unwrap();
    footprint(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_config_init_get_set() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("footprint.json");
    let config = config.to_str().unwrap();

    footprint(&home)
        .args(["--config", config, "config", "init"])
        .assert()
        .success();

    footprint(&home)
        .args(["--config", config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    footprint(&home)
        .args(["--config", config, "config", "get", "extraction.image_recovery"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    footprint(&home)
        .args(["--config", config, "config", "set", "extraction.max_pages", "2"])
        .assert()
        .success();

    footprint(&home)
        .args(["--config", config, "config", "get", "extraction.max_pages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));

    footprint(&home)
        .args(["--config", config, "config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

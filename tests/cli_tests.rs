mod support;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use support::write_config;

fn riskboard() -> Command {
    let mut cmd = cargo_bin_cmd!("riskboard");
    cmd.env_remove("RISKBOARD_CONFIG")
        .env_remove("RISKBOARD_DATABASE")
        .env_remove("RISKBOARD_WEBHOOK_PASSPHRASE")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn version_flag_prints_version() {
    riskboard()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "database = \"quotes.db\"\n");

    riskboard()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}

#[test]
fn config_validate_fails_on_invalid_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[supervisor]\nbackoff_multiplier = 0.5\n");

    riskboard()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("backoff_multiplier"));
}

#[test]
fn config_validate_fails_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    riskboard()
        .args(["config", "validate", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn config_validate_shows_syntax_error_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[webhook]\nport = eighty\n");

    riskboard()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.toml"))
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn config_show_in_json_mode_emits_config_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[dashboard]\ntitle = \"Desk\"\n");

    riskboard()
        .args(["--json", "config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"config\""))
        .stdout(predicate::str::contains("\"title\":\"Desk\""));
}

#[test]
fn migrate_then_export_prints_csv_header() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("data").join("investment_data.db");
    let path = write_config(
        dir.path(),
        &format!("database = {:?}\n", db.to_string_lossy()),
    );

    riskboard()
        .args(["migrate", "--config"])
        .arg(&path)
        .assert()
        .success();
    assert!(db.exists());

    riskboard()
        .args(["export", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Symbol,Price,ATR,Exit Price,Last Updated\n",
        ));
}

#[test]
fn database_env_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("from-env.db");
    let path = write_config(dir.path(), "database = \"ignored.db\"\n");

    riskboard()
        .env("RISKBOARD_DATABASE", &db)
        .args(["migrate", "--config"])
        .arg(&path)
        .assert()
        .success();

    assert!(db.exists());
    assert!(!dir.path().join("ignored.db").exists());
}

#[test]
fn latest_on_empty_database_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("quotes.db");
    let path = write_config(
        dir.path(),
        &format!("database = {:?}\n", db.to_string_lossy()),
    );

    riskboard()
        .args(["latest", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No data available yet"));
}

#[test]
fn unknown_command_fails() {
    riskboard().arg("trade").assert().failure();
}

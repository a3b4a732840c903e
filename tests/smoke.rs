//! Smoke tests -- verify the binary runs and each subcommand works end to end.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

const RUNS_JSON: &str = r#"[
  {"schedule_id": 1, "job_code": "catalog_product_alert", "status": "success",
   "scheduled_at": "2024-01-01 10:00:00", "executed_at": "2024-01-01 10:05:00",
   "finished_at": "2024-01-01 10:20:00"},
  {"schedule_id": 2, "job_code": "newsletter_send_all", "status": "pending",
   "scheduled_at": "2024-01-01 14:00:00"}
]"#;

fn runs_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RUNS_JSON.as_bytes()).unwrap();
    file
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("cron-timeline").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("CRON_TIMELINE_CONFIG");
    cmd
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeline layout for cron job executions"));
}

#[test]
fn test_cli_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cron-timeline"));
}

#[test]
fn test_range_text_output() {
    let file = runs_file();
    cli()
        .args(["--now", "2024-01-01 18:00:00", "range", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("First day:  2024-01-01 09:00:00"))
        .stdout(predicate::str::contains("Span:       24 hours"))
        .stdout(predicate::str::contains("Mon 01/01 09:00"));
}

#[test]
fn test_range_json_output() {
    let file = runs_file();
    let output = cli()
        .args(["--now", "2024-01-01 18:00:00", "range", "--json", "--input"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let range: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(range["first_day"], "2024-01-01T09:00:00");
    assert_eq!(range["total_span_hours"], 24);
    assert_eq!(range["day_buckets"].as_array().unwrap().len(), 2);
    assert_eq!(range["contains_today"], true);
}

#[test]
fn test_layout_json_output() {
    let file = runs_file();
    let output = cli()
        .args(["--now", "2024-01-01 18:00:00", "layout", "--json", "--input"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["extent"]["kind"], "hours");
    assert_eq!(rows[0]["extent"]["hours"], 0.25);
    assert_eq!(rows[0]["status"]["kind"], "success");
    assert_eq!(rows[1]["start_offset_hours"], 5.0);
    assert_eq!(rows[1]["extent"]["kind"], "unbounded");
    assert_eq!(rows[1]["status"]["active"], true);
    assert_eq!(rows[1]["status"]["permanent"], true);
}

#[test]
fn test_now_offset() {
    let file = runs_file();
    cli()
        .args(["--now", "2024-01-01 18:00:00", "now-offset", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("180%\n");
}

#[test]
fn test_weeks() {
    cli().args(["weeks", "7"]).assert().success().stdout("1.4\n");
    cli().args(["weeks", "10"]).assert().success().stdout("2\n");
}

#[test]
fn test_import_then_read_from_db() {
    let file = runs_file();
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("cron.db");

    cli()
        .args(["import", "--input"])
        .arg(file.path())
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 job runs"));

    cli()
        .args(["--now", "2024-01-01 18:00:00", "layout", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("newsletter_send_all"))
        .stdout(predicate::str::contains("open"));
}

#[test]
fn test_missing_source_fails() {
    cli()
        .arg("range")
        .assert()
        .failure()
        .stderr(predicate::str::contains("record source is required"));
}

#[test]
fn test_bad_now_fails() {
    let file = runs_file();
    cli()
        .args(["--now", "yesterday", "range", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match date format"));
}

#[test]
fn test_broken_env_config_is_reported() {
    let file = runs_file();
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "min_hours = [not toml").unwrap();

    cli()
        .env("CRON_TIMELINE_CONFIG", config.path())
        .args(["--now", "2024-01-01 18:00:00", "range", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Span:       24 hours"))
        .stderr(predicate::str::contains("could not be loaded"));
}

#[test]
fn test_limit_keeps_latest_runs_regardless_of_file_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
  {"schedule_id": 2, "job_code": "newsletter_send_all", "status": "pending",
   "scheduled_at": "2024-01-01 14:00:00"},
  {"schedule_id": 1, "job_code": "catalog_product_alert", "status": "success",
   "scheduled_at": "2024-01-01 10:00:00", "finished_at": "2024-01-01 10:20:00"}
]"#,
    )
    .unwrap();

    let output = cli()
        .args(["--now", "2024-01-01 18:00:00", "layout", "--json", "--limit", "1", "--input"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["job_code"], "newsletter_send_all");
}

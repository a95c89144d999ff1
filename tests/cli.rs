//! End-to-end tests for the fintrack binary
//!
//! Everything runs against the seeded demo data with the config directory
//! pointed at a temporary folder.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fintrack(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("FINTRACK_CONFIG_DIR", config_dir.path())
        .env_remove("FINTRACK_BACKEND_URL")
        .env_remove("FINTRACK_ANON_KEY")
        .env_remove("FINTRACK_LOG");
    cmd
}

fn demo(config_dir: &TempDir, args: &[&str]) -> Command {
    let mut cmd = fintrack(config_dir);
    cmd.arg("--demo").args(args);
    cmd
}

#[test]
fn test_no_command_prints_hint() {
    let dir = TempDir::new().unwrap();
    fintrack(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("fintrack --help"));
}

#[test]
fn test_missing_backend_is_reported() {
    let dir = TempDir::new().unwrap();
    fintrack(&dir)
        .args(["account", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backend URL configured"));
}

#[test]
fn test_demo_dashboard() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, Demo User"))
        .stdout(predicate::str::contains("Recent transactions"))
        .stdout(predicate::str::contains("Emergency fund"))
        .stdout(predicate::str::contains("unavailable").not());
}

#[test]
fn test_demo_account_list() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking"))
        .stdout(predicate::str::contains("Old Brokerage").not())
        .stdout(predicate::str::contains("TOTAL"));

    demo(&dir, &["account", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Old Brokerage"));
}

#[test]
fn test_demo_account_show_unknown() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["account", "show", "Piggy bank"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found: Piggy bank"));
}

#[test]
fn test_demo_add_transaction() {
    let dir = TempDir::new().unwrap();
    demo(
        &dir,
        &[
            "transaction", "add", "Coffee beans", "14.50", "--account", "Wallet", "--category",
            "Groceries",
        ],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("Recorded Expense: Coffee beans"))
    .stdout(predicate::str::contains("-$14.50"));
}

#[test]
fn test_demo_add_transaction_validation() {
    let dir = TempDir::new().unwrap();
    demo(
        &dir,
        &[
            "transaction", "add", "Coffee", "0", "--account", "Wallet", "--category", "Groceries",
        ],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("Amount must be positive."));
}

#[test]
fn test_demo_transfer() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["transfer", "250", "--from", "Checking", "--to", "Savings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transferred $250.00 from Checking to Savings"));
}

#[test]
fn test_demo_transfer_same_account() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["transfer", "10", "--from", "Checking", "--to", "checking"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be different"));
}

#[test]
fn test_demo_categories() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["category", "list", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("Groceries").not());
}

#[test]
fn test_demo_budget_list() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"));
}

#[test]
fn test_demo_goal_add_funds() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["goal", "add-funds", "Emergency fund", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emergency fund: $6300.00 of $10000.00 saved"));
}

#[test]
fn test_demo_report_json() {
    let dir = TempDir::new().unwrap();
    let output = demo(&dir, &["report", "summary", "--range", "this-year", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"], "summary");
    assert_eq!(value["schema_version"], "1.0.0");
    assert!(value["data"]["total_income"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_demo_report_to_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("categories.csv");
    demo(
        &dir,
        &["report", "categories", "--format", "csv", "--output", out.to_str().unwrap()],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote categories report"));

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("category,total,percentage\n"));
}

#[test]
fn test_demo_report_bad_range() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["report", "monthly", "--range", "fortnight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown range"));
}

#[test]
fn test_demo_profile_show() {
    let dir = TempDir::new().unwrap();
    demo(&dir, &["profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile: Demo User"));
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    fintrack(&dir)
        .args(["config", "--currency-symbol", "€", "--recent-limit", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    fintrack(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency symbol: €"))
        .stdout(predicate::str::contains("Recent limit:    8"))
        .stdout(predicate::str::contains("Signed in:       no"));
}

#[test]
fn test_logout_without_session() {
    let dir = TempDir::new().unwrap();
    fintrack(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session."));
}

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_cli_pending_queue_from_reference_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.args(["--status", "pending"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,affiliate_id,affiliate_name,affiliate_email,amount",
        ))
        .stdout(predicate::str::contains("PAY001,AFF001,Rahul Sharma"))
        .stdout(predicate::str::contains("PAY012,AFF011,Neha Kapoor"))
        .stdout(predicate::str::contains("PAY002").not());

    Ok(())
}

#[test]
fn test_cli_json_view_carries_stats() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(cargo_bin!("payout-console"))
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(view["stats"]["pending_count"], 4);
    assert_eq!(view["stats"]["today_requests_count"], 3);
    assert_eq!(view["stats"]["total_affiliates"], 11);
    assert_eq!(view["visible"].as_array().map(Vec::len), Some(5));
    assert_eq!(view["has_more"], true);
    assert_eq!(view["total_matching"], 12);

    Ok(())
}

#[test]
fn test_cli_reads_fixture_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.args(["tests/fixtures/requests.csv", "--method", "bank", "--sort", "amount"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PAY202,AFF202,Dev Shah"))
        .stdout(predicate::str::contains("PAY204,AFF202,Dev Shah"))
        .stdout(predicate::str::contains("PAY201").not());

    Ok(())
}

#[test]
fn test_cli_reports_malformed_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.csv");
    let mut contents = fs::read_to_string("tests/fixtures/requests.csv")?;
    contents.push_str(
        "PAY299,AFF299,Broken Row,broken@example.com,-10,2024-03-02,pending,upi,x,1,0,2023-01-01,low\n",
    );
    fs::write(&path, contents)?;

    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.arg(&path).args(["--all"]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading payout request"))
        .stdout(predicate::str::contains("PAY203"))
        .stdout(predicate::str::contains("PAY299").not());

    Ok(())
}

#[test]
fn test_cli_approve_moves_request_out_of_pending() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.args(["--approve", "PAY001", "--status", "pending"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PAY005"))
        .stdout(predicate::str::contains("PAY001").not());

    Ok(())
}

#[test]
fn test_cli_approve_unknown_id_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.args(["--approve", "PAY999"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Payout request not found: PAY999"));

    Ok(())
}

#[test]
fn test_cli_exports_filtered_view() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.args(["--status", "completed", "--export-name", "completed"])
        .arg("--export-dir")
        .arg(dir.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Exported 3 payout requests"));

    let exported = fs::read_to_string(dir.path().join("completed.csv"))?;
    assert_eq!(exported.lines().count(), 4);
    assert!(exported.contains("PAY004"));
    assert!(exported.contains("PAY007"));
    assert!(exported.contains("PAY010"));

    Ok(())
}

#[test]
fn test_cli_generated_input_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("generated.csv");
    common::write_requests_csv(&path, &common::generated_requests(30, 5))?;

    let output = Command::new(cargo_bin!("payout-console"))
        .arg(&path)
        .args(["--all", "--json", "--today", "2024-01-05"])
        .output()?;
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(view["visible"].as_array().map(Vec::len), Some(30));
    assert_eq!(view["has_more"], false);

    Ok(())
}

#[test]
fn test_cli_rejects_empty_export_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.args(["--export-name", "  "]).arg("--export-dir").arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Export filename must not be empty"));
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);

    Ok(())
}

#[test]
fn test_cli_export_name_cannot_escape_export_dir() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempdir()?;
    let exports = root.path().join("exports");
    let mut cmd = Command::new(cargo_bin!("payout-console"));
    cmd.args(["--export-name", "../escaped"])
        .arg("--export-dir")
        .arg(&exports);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("plain file name"));
    assert!(!root.path().join("escaped.csv").exists());

    Ok(())
}

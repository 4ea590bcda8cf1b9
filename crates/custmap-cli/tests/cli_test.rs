//! Integration tests for the custmap binary
//!
//! Every run uses the offline gazetteer and a scratch working directory so
//! no network or stray config file is involved.

use std::path::PathBuf;
use std::process::{Command, Output};

fn custmap_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("custmap");
    path
}

fn run(args: &[&str]) -> Output {
    let workdir = tempfile::tempdir().unwrap();
    let mut command = Command::new(custmap_bin());
    command.current_dir(workdir.path()).args(["--offline", "--debounce-ms", "0"]).args(args);
    for var in [
        "CUSTMAP_DEBOUNCE_MS",
        "CUSTMAP_MAX_RESULTS",
        "CUSTMAP_GATEWAY_TIMEOUT_MS",
        "CUSTMAP_GEOCODER",
        "CUSTMAP_DEFAULT_REGION",
    ] {
        command.env_remove(var);
    }
    command.output().expect("Failed to execute command")
}

fn json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

#[test]
fn test_customers_json_lists_directory() {
    let output = run(&["customers", "--json"]);
    assert!(output.status.success());

    let parsed = json(&output);
    assert_eq!(parsed["status"], "success");
    let customers = parsed["data"].as_array().unwrap();
    assert_eq!(customers.len(), 8);
    assert_eq!(customers[0]["name"], "Ted James");
    assert_eq!(customers[7]["location"], "Anaheim, California");
}

#[test]
fn test_customers_grid_is_human_readable() {
    let output = run(&["customers"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Zed Bishop"));
    assert!(stdout.contains("Carey, North Carolina"));
}

#[test]
fn test_search_returns_candidates() {
    let output = run(&["search", "Phoenix", "--json"]);
    assert!(output.status.success());

    let parsed = json(&output);
    let rows = parsed["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["address"], "200 W Washington St, Phoenix, Arizona 85003, United States");
}

#[test]
fn test_search_respects_max_results() {
    let output = run(&["--max-results", "1", "search", "Phoenix", "--json"]);
    let parsed = json(&output);
    assert_eq!(parsed["data"].as_array().unwrap().len(), 1);
}

#[test]
fn test_search_rejects_max_results_above_five() {
    let output = run(&["--max-results", "8", "search", "Phoenix", "--json"]);
    assert!(!output.status.success());
}

#[test]
fn test_reverse_unknown_location() {
    let output = run(&["reverse", "0", "-150", "--json"]);
    assert!(output.status.success());
    assert_eq!(json(&output)["data"]["address"], "Unknown location");
}

#[test]
fn test_edit_with_pick_saves_record() {
    let output = run(&["edit", "1", "--pick", "1 Main St Springfield", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let data = &json(&output)["data"];
    let record = &data["record"];
    assert_eq!(record["id"], "1");
    assert_eq!(record["name"], "Ted James");
    assert_eq!(record["addressLine1"], "1 Main St");
    assert_eq!(record["city"], "Springfield");
    assert_eq!(record["postalCode"], "62701");
    assert_eq!(record["fullAddress"], "1 Main St, Springfield, Illinois 62701, United States");
    assert!(record["submissionId"].is_string());
    assert_eq!(data["merged_fields"].as_array().unwrap().len(), 5);
}

#[test]
fn test_edit_without_address_fails_validation() {
    let output = run(&["edit", "2", "--name", "M", "--json"]);
    assert!(!output.status.success());

    let parsed = json(&output);
    assert_eq!(parsed["status"], "error");
    assert_eq!(parsed["data"]["errors"]["name"], "Name must be at least 2 characters");
    assert_eq!(parsed["data"]["errors"]["addressLine1"], "Address Line 1 is required");
}

#[test]
fn test_edit_cancelled_picker_keeps_form() {
    let output = run(&[
        "edit",
        "3",
        "--set",
        "address_line1=600 4th Ave",
        "--tap",
        "39.8017,-89.6440",
        "--cancel-picker",
        "--json",
    ]);
    assert!(output.status.success());

    let data = &json(&output)["data"];
    assert_eq!(data["picker"], "cancelled");
    assert_eq!(data["record"]["city"], "Seattle");
    assert!(data["record"]["fullAddress"].is_null());
}

#[test]
fn test_edit_unknown_customer() {
    let output = run(&["edit", "42"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Customer '42' not found"));
}

#[test]
fn test_config_reports_cli_source() {
    let output = run(&["config", "--json"]);
    let rows = json(&output)["data"].as_array().unwrap().clone();

    let geocoder = rows.iter().find(|r| r["key"] == "geocoder").unwrap();
    assert_eq!(geocoder["value"], "offline");
    assert_eq!(geocoder["source"], "Cli");

    let results = rows.iter().find(|r| r["key"] == "max_results").unwrap();
    assert_eq!(results["source"], "Default");
}

#[test]
fn test_edit_picker_opens_on_device_position() {
    let output = run(&["edit", "4", "--position", "33.3062,-111.8413", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let data = &json(&output)["data"];
    assert_eq!(data["record"]["addressLine1"], "175 S Arizona Ave");
    assert_eq!(data["record"]["postalCode"], "85225");
    assert_eq!(data["map"][0]["kind"], "render");
    assert_eq!(data["map"][1]["kind"], "animate");
    assert_eq!(data["map"][1]["duration_ms"], 1000);
}

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn write_inventory(dir: &Path, file_name: &str, rows: &[&str]) {
    let mut text = String::from("Location\tName\tID\tCount\tSlots\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(dir.join(file_name), text).expect("write fixture");
}

fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_inventory(
        dir.path(),
        "Alpha-Inventory.txt",
        &[
            "Primary\tLegendary Sword\t1001\t1\t0",
            "General1-Slot1\tWater Flask\t4001\t6\t0",
            "General1-Slot2\tEmpty\t0\t0\t0",
            "SharedBank1\tHope Stone\t5001\t1\t0",
        ],
    );
    write_inventory(
        dir.path(),
        "Beta-Inventory.txt",
        &[
            "Bank1\tWater Flask\t4001\t2\t0",
            "Primary-Slot1\tVortex of the Past\t901\t1\t0",
            "SharedBank1\tHope Stone\t5001\t1\t0",
        ],
    );
    dir
}

fn run_cli(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eqinv"))
        .arg(dir)
        .args(args)
        .env_remove("EQINV_DATA_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run eqinv CLI")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn default_output_is_the_overview() {
    let dir = fixture_dir();
    let output = run_cli(dir.path(), &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(" ::: Inventory Overview :::"));
    assert!(stdout.contains(" ::: Characters :::"));
    assert!(stdout.contains("SHARED-VAULT"));
    assert!(stdout.contains("Shared vault from Beta skipped, same as Alpha"));
}

#[test]
fn search_with_filters_prints_matching_rows() {
    let dir = fixture_dir();
    let output = run_cli(
        dir.path(),
        &["--search", "water", "--character", "beta", "--json"],
    );
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["count"], 1);
    assert_eq!(value["results"][0]["character"], "Beta");
    assert_eq!(value["results"][0]["location"], "Bank1");
}

#[test]
fn search_by_type_and_exact_name() {
    let dir = fixture_dir();
    let output = run_cli(dir.path(), &["--search", "hope stone", "--type", "bank", "--exact"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Found 1 item matching \"hope stone\""));
}

#[test]
fn duplicates_default_to_two_places() {
    let dir = fixture_dir();
    let output = run_cli(dir.path(), &["--duplicates", "--json"]);
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["min_count"], 2);
    assert_eq!(value["groups"][0]["name"], "Water Flask");
    assert_eq!(value["groups"][0]["total_quantity"], 8);
}

#[test]
fn summary_of_unknown_character_fails() {
    let dir = fixture_dir();
    let output = run_cli(dir.path(), &["--summary", "Nobody"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Nobody"));

    let output = run_cli(dir.path(), &["--summary", "alpha"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with(" ::: Alpha :::"));
}

#[test]
fn zeb_respects_include_equipped() {
    let dir = fixture_dir();
    let find_vortex = |value: &Value| -> bool {
        value["components"]
            .as_array()
            .expect("components array")
            .iter()
            .find(|c| c["name"] == "Vortex of the Past")
            .map(|c| c["ready"] == true)
            .expect("vortex listed")
    };

    let without = stdout_json(&run_cli(dir.path(), &["--zeb", "--json"]));
    assert!(!find_vortex(&without));
    let with = stdout_json(&run_cli(
        dir.path(),
        &["--zeb", "--include-equipped", "--json"],
    ));
    assert!(find_vortex(&with));
}

#[test]
fn recipes_file_reports_each_quest() {
    let dir = fixture_dir();
    let manifest = dir.path().join("quests.json");
    fs::write(
        &manifest,
        r#"{"flasks": {"name": "Flasks", "items": [{"name": "Water Flask", "quantity": 8}]}}"#,
    )
    .expect("write manifest");

    let manifest = manifest.to_string_lossy().to_string();
    let output = run_cli(dir.path(), &["--recipes", &manifest, "--json"]);
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["quests"][0]["key"], "flasks");
    assert_eq!(value["quests"][0]["can_complete"], true);
}

#[test]
fn quest_components_use_whole_stacks() {
    let dir = fixture_dir();
    let value = stdout_json(&run_cli(dir.path(), &["--quest", "2", "--json"]));
    let flask = value["components"]
        .as_array()
        .expect("components array")
        .iter()
        .find(|c| c["name"] == "Water Flask")
        .expect("flask listed");
    assert_eq!(flask["ready"], true);
    assert_eq!(flask["rule"], "single");

    let output = run_cli(dir.path(), &["--quest", "9"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("\"9\""));
}

#[test]
fn signet_lists_the_quest_chain() {
    let dir = fixture_dir();
    let output = run_cli(dir.path(), &["--signet"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(" ::: 1. Blacksmithing :::"));
    assert!(stdout.contains(" ::: 7. Baking + Final Turn-In :::"));
}

#[test]
fn missing_directory_exits_with_one() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = run_cli(&dir.path().join("missing"), &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn conflicting_modes_are_usage_errors() {
    let dir = fixture_dir();
    let output = run_cli(dir.path(), &["--zeb", "--signet"]);
    assert_eq!(output.status.code(), Some(2));

    let output = run_cli(dir.path(), &["--exact"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn data_dir_can_come_from_the_environment() {
    let dir = fixture_dir();
    let output = Command::new(env!("CARGO_BIN_EXE_eqinv"))
        .args(["--characters", "--json"])
        .env("EQINV_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run eqinv CLI");
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value.as_array().map(Vec::len), Some(3));
}

#![cfg(feature = "cli")]
use assert_cmd::Command;
use insta::assert_json_snapshot;
use rstest::rstest;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn copy_fixture(stem: &str, dir: &Path) -> String {
    let input_path = dir.join(format!("{stem}.avpr"));
    let protocol = fs::read_to_string(format!("tests/fixtures/avpr/{stem}.avpr")).unwrap();
    fs::write(&input_path, protocol).unwrap();
    input_path.to_str().unwrap().to_string()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn run_fixture(stem: &str, topic_dir: &str) {
    let dir = tempdir().unwrap();
    let input_path = copy_fixture(stem, dir.path());
    let out_dir = dir.path().join("out");

    // Run CLI
    Command::cargo_bin("avpr2sample")
        .unwrap()
        .arg(&input_path)
        .arg("--out-dir")
        .arg(out_dir.to_str().unwrap())
        .assert()
        .success();

    // Read the generated sample message
    let json = read_json(&out_dir.join(topic_dir).join("index.json"));

    // Compare with snapshot
    assert_json_snapshot!(stem, json);
}

#[rstest]
#[case("orders", "orders/new")]
#[case("customers", "customers/created")]
fn cli_fixtures(#[case] stem: &str, #[case] topic_dir: &str) {
    run_fixture(stem, topic_dir);
}

#[test]
fn types_without_topics_are_not_written() {
    let dir = tempdir().unwrap();
    let input_path = copy_fixture("orders", dir.path());
    let out_dir = dir.path().join("out");

    Command::cargo_bin("avpr2sample")
        .unwrap()
        .arg(&input_path)
        .arg("--out-dir")
        .arg(out_dir.to_str().unwrap())
        .assert()
        .success();

    let entries: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["orders".to_string()]);
    let written: Vec<_> = fs::read_dir(out_dir.join("orders")).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn recursive_type_is_skipped_and_run_continues() {
    let dir = tempdir().unwrap();
    let input_path = copy_fixture("customers", dir.path());
    let out_dir = dir.path().join("out");

    Command::cargo_bin("avpr2sample")
        .unwrap()
        .arg(&input_path)
        .arg("--out-dir")
        .arg(out_dir.to_str().unwrap())
        .assert()
        .success();

    assert!(out_dir.join("customers/created/index.json").exists());
    assert!(!out_dir.join("categories").exists());
}

#[test]
fn directories_are_scanned_for_protocols() {
    let dir = tempdir().unwrap();
    let contracts = dir.path().join("contracts");
    let nested = contracts.join("crm");
    fs::create_dir_all(&nested).unwrap();
    copy_fixture("orders", &contracts);
    copy_fixture("customers", &nested);
    let out_dir = dir.path().join("out");

    Command::cargo_bin("avpr2sample")
        .unwrap()
        .arg(contracts.to_str().unwrap())
        .arg("--out-dir")
        .arg(out_dir.to_str().unwrap())
        .assert()
        .success();

    assert!(out_dir.join("orders/new/index.json").exists());
    assert!(out_dir.join("customers/created/index.json").exists());
}

#[test]
fn schema_mode_writes_avsc_and_sample() {
    let dir = tempdir().unwrap();
    let input_path = copy_fixture("orders", dir.path());
    let out_dir = dir.path().join("out");

    Command::cargo_bin("avpr2sample")
        .unwrap()
        .arg(&input_path)
        .arg("--schemas")
        .arg("--versioned-only")
        .arg("--out-dir")
        .arg(out_dir.to_str().unwrap())
        .assert()
        .success();

    let schema = read_json(&out_dir.join("com.acme.orders.OrderCreated.avsc"));
    assert_eq!(schema["name"], json!("OrderCreated"));
    assert_eq!(schema["namespace"], json!("com.acme.orders"));
    assert_eq!(schema["version"], json!("1.0.0"));
    assert_eq!(schema["fields"][6]["type"]["name"], json!("Address"));
    assert_eq!(
        schema["fields"][7],
        json!({"name": "bill_to", "type": ["null", "com.acme.orders.Address"], "default": null})
    );

    let sample = read_json(&out_dir.join("com.acme.orders.OrderCreated.json"));
    assert_eq!(sample["status"], json!("NEW"));
    assert_eq!(sample["bill_to"], json!({"street": "string", "city": "string"}));

    assert!(!out_dir.join("com.acme.orders.Address.avsc").exists());
}

#[test]
fn missing_paths_is_a_usage_error() {
    Command::cargo_bin("avpr2sample").unwrap().assert().failure();
}

#[test]
fn unparsable_protocol_fails() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("broken.avpr");
    fs::write(&input_path, "{\"protocol\": ").unwrap();

    Command::cargo_bin("avpr2sample")
        .unwrap()
        .arg(input_path.to_str().unwrap())
        .arg("--out-dir")
        .arg(dir.path().join("out").to_str().unwrap())
        .assert()
        .failure()
        .code(1);
}

//! Top-level CLI behaviour: help, version, argument errors.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::apiary;

#[test]
fn no_args_shows_usage_and_fails() {
    Command::cargo_bin("apiary")
        .expect("binary builds")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("apiary")
        .expect("binary builds")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("create")
                .and(predicate::str::contains("credits"))
                .and(predicate::str::contains("list"))
                .and(predicate::str::contains("destroy")),
        );
}

#[test]
fn version_prints_package_version() {
    Command::cargo_bin("apiary")
        .expect("binary builds")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_json_is_parseable() {
    let output = Command::cargo_bin("apiary")
        .expect("binary builds")
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn list_on_empty_home_succeeds() {
    let home = TempDir::new().expect("tempdir");
    apiary(home.path()).arg("list").assert().success();
}

#[test]
fn list_json_shows_instance_names() {
    let home = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(home.path().join("instances/bot-a")).expect("mkdir");

    let output = apiary(home.path())
        .args(["list", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    let names: Vec<_> = value
        .as_array()
        .expect("array")
        .iter()
        .map(|e| e["name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(names, vec!["bot-a".to_string()]);
}

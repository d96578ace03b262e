//! CLI options interaction tests
//!
//! These run the `qic` binary against a local mirror of an interop runner
//! result tree, so no network access is needed.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const RUN: &str = "2024-03-01T12:00";

/// Helper function to create a test command isolated from the caller's environment
fn create_test_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("qic").unwrap();
    cmd.current_dir(workdir);
    for var in [
        "QIC_BASE_URL",
        "QIC_DATA_DIR",
        "QIC_REPORT_DIR",
        "QIC_TIMEOUT_SECONDS",
        "QIC_CONCURRENCY",
        "QIC_PROXY",
        "QIC_STRICT",
        "QIC_ENABLE_COLOR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Mirror with one run where `a` serves `b` three goodput sub-tests
fn create_mirror(root: &Path) {
    write_file(&root.join("logs.json"), &format!(r#"["{}"]"#, RUN));
    for (index, value) in [(1, 7000), (2, 7200), (3, 7400)] {
        write_file(
            &root.join(RUN).join("a_b").join("goodput").join(index.to_string()).join("output.txt"),
            &format!("Goodput: {} kbps\n", value),
        );
    }
    write_file(
        &root.join(RUN).join("b_a").join("crosstraffic").join("1").join("output.txt"),
        "Goodput: 1500 kbps\n",
    );
}

/// Workspace with a mirror, a config file pointing at it and an empty data dir
fn create_workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let mirror = temp_dir.path().join("mirror");
    create_mirror(&mirror);

    let config = serde_json::json!({
        "base_url": mirror.to_str().unwrap(),
        "data_dir": temp_dir.path().join("data").to_str().unwrap(),
        "clients": ["a", "b"],
        "servers": ["a", "b"],
        "concurrency": 2,
    });
    write_file(&temp_dir.path().join("config.json"), &config.to_string());
    temp_dir
}

#[test]
fn test_help_lists_subcommands() {
    let temp_dir = TempDir::new().unwrap();
    create_test_cmd(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("crawl"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("--strict"))
        .stdout(predicate::str::contains("QIC_*"));
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    create_test_cmd(temp_dir.path())
        .arg("crawl")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-c/--config"));
}

#[test]
fn test_unreadable_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    create_test_cmd(temp_dir.path())
        .args(["-c", "does-not-exist.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[CONFIG]"));
}

#[test]
fn test_config_without_common_implementation_fails() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        &temp_dir.path().join("config.json"),
        r#"{"clients": ["a"], "servers": ["b"]}"#,
    );
    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("both 'clients' and 'servers'"));
}

#[test]
fn test_invalid_concurrency_rejected() {
    let temp_dir = create_workspace();
    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--concurrency", "0"])
        .assert()
        .failure();
}

#[test]
fn test_crawl_local_mirror_then_report() {
    let temp_dir = create_workspace();
    let data_dir = temp_dir.path().join("data");

    // No subcommand means crawl
    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Crawl Summary:"))
        .stdout(predicate::str::contains("New runs:       1"))
        .stdout(predicate::str::contains(RUN));

    let artifact: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("2024-03-01T1200.json")).unwrap()).unwrap();
    assert_eq!(artifact["goodput"]["a"]["b"], serde_json::json!([7000, 7200, 7400]));
    assert_eq!(artifact["goodput"]["b"]["a"], serde_json::json!([]));
    assert_eq!(artifact["crosstraffic"]["b"]["a"], serde_json::json!([1500]));

    let manifest: Vec<String> =
        serde_json::from_str(&fs::read_to_string(data_dir.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest, vec![RUN.to_string()]);

    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color", "crawl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already stored: 1"))
        .stdout(predicate::str::contains("New runs:       0"));

    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color", "report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS: Reported 1 of 1 pending runs"));

    let grid = fs::read_to_string(data_dir.join("reports").join("goodput").join("2024-03-01T1200.txt")).unwrap();
    assert!(grid.contains("7200 ± 163"));
}

#[test]
fn test_missing_listing_exits_silently() {
    let temp_dir = create_workspace();
    fs::remove_file(temp_dir.path().join("mirror").join("logs.json")).unwrap();

    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color"])
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert!(!temp_dir.path().join("data").exists());
}

#[test]
fn test_data_dir_override_wins_over_config() {
    let temp_dir = create_workspace();
    let override_dir = temp_dir.path().join("elsewhere");

    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color", "--data-dir"])
        .arg(&override_dir)
        .assert()
        .success();

    assert!(override_dir.join("manifest.json").is_file());
    assert!(!temp_dir.path().join("data").exists());
}

#[test]
fn test_env_file_overrides_config() {
    let temp_dir = create_workspace();
    let env_dir = temp_dir.path().join("from-env");
    write_file(
        &temp_dir.path().join(".env"),
        &format!("QIC_DATA_DIR={}\n", env_dir.to_str().unwrap()),
    );

    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color"])
        .assert()
        .success();

    assert!(env_dir.join("2024-03-01T1200.json").is_file());
}

#[test]
fn test_strict_mode_fails_on_malformed_output() {
    let temp_dir = create_workspace();
    write_file(
        &temp_dir.path().join("mirror").join(RUN).join("a_a").join("goodput").join("1").join("output.txt"),
        "the client crashed\n",
    );

    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color", "--strict"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("[AGGREGATE]"));

    assert!(!temp_dir.path().join("data").join("2024-03-01T1200.json").exists());

    // Without --strict the malformed output only ends that pair
    create_test_cmd(temp_dir.path())
        .args(["-c", "config.json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New runs:       1"));
}

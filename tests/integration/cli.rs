//! The `commit-graph` binary.

use super::test_utils::*;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SHA_A: &str = "a1b2c3d4e5f6789012345678901234567890abcd";
const SHA_B: &str = "b1b2c3d4e5f6789012345678901234567890abcd";

fn log_dump() -> String {
    format!(
        "{SHA_A}\x01{SHA_B}\x01 (HEAD -> main)\x01Jane\x01jane@example.com\x012024-03-01T10:15:00+00:00\x01Second\x01\x02\n\
         {SHA_B}\x01\x01 (origin/main, tag: v1.0)\x01Jane\x01jane@example.com\x012024-03-01T10:00:00+00:00\x01First\x01\x02"
    )
}

fn commit_graph() -> Command {
    let mut cmd = Command::cargo_bin("commit-graph").unwrap();
    cmd.env("COMMIT_GRAPH_LOG", "off");
    cmd
}

#[test]
fn test_log_file_to_json() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let log_path = temp_dir.path().join("history.log");
    std::fs::write(&log_path, log_dump())?;

    let output = commit_graph()
        .args(["--log-file", log_path.to_str().unwrap(), "--mode", "branch-rows"])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["mode"], "branch-rows");
    assert_eq!(json["commit_nodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["commit_nodes"][0]["owning_branch_key"], "refs/heads/main");
    assert_eq!(json["commit_nodes"][1]["owning_branch_key"], "refs/remotes/origin/main");
    assert_eq!(json["edges"][0]["kind"], "branch_out");
    Ok(())
}

#[test]
fn test_stdin_text_output() {
    commit_graph()
        .args(["--log-file", "-", "--format", "text", "--mode", "swimlane"])
        .write_stdin(log_dump())
        .assert()
        .success()
        .stdout(predicate::str::contains("a1b2c3d"))
        .stdout(predicate::str::contains("Second"))
        .stdout(predicate::str::contains("2 commits, 1 edges, 1 lanes"));
}

#[test]
fn test_repository_argument() -> anyhow::Result<()> {
    let (_temp_dir, repo_path) = create_complex_test_repo()?;

    commit_graph()
        .arg(&repo_path)
        .args(["--format", "text", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge feature branch"))
        .stdout(predicate::str::contains("2 commits"));
    Ok(())
}

#[test]
fn test_not_a_repository() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    commit_graph()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Repository error"));
    Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, r##"{ "palette": ["#000000"] }"##)?;

    commit_graph()
        .args(["--config", config_path.to_str().unwrap(), "--log-file", "-"])
        .write_stdin(log_dump())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration for 'palette'"));
    Ok(())
}

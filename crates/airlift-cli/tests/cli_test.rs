use assert_cmd::Command;
use predicates::prelude::*;

fn airlift() -> Command {
    let mut cmd = Command::cargo_bin("airlift").unwrap();
    // Keep host environment out of the tests
    cmd.env_remove("AIRLIFT_FERNET_KEY");
    cmd
}

#[test]
fn test_cli_help() {
    airlift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("summary"));
}

#[test]
fn test_plan_emits_json() {
    airlift()
        .args(["plan", "--fernet-key", "cli-test-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"resources\""))
        .stdout(predicate::str::contains("airflow-vpc"))
        .stdout(predicate::str::contains("AirflowBucket"));
}

#[test]
fn test_plan_uses_explicit_bucket_name() {
    airlift()
        .args([
            "plan",
            "--fernet-key",
            "cli-test-key",
            "--bucket-name",
            "pinned-bucket",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("pinned-bucket"));
}

#[test]
fn test_plan_requires_fernet_key() {
    airlift().arg("plan").assert().failure().stderr(
        predicate::str::contains("--fernet-key").or(predicate::str::contains("AIRLIFT_FERNET_KEY")),
    );
}

#[test]
fn test_plan_reads_fernet_key_from_env() {
    airlift()
        .env("AIRLIFT_FERNET_KEY", "env-test-key")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"resources\""));
}

#[test]
fn test_plan_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.json");

    airlift()
        .args(["plan", "--fernet-key", "cli-test-key", "--output"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"resources\""));
    assert!(content.contains("airflow-vpc"));
}

#[test]
fn test_summary_lists_resources() {
    airlift()
        .args(["summary", "--fernet-key", "cli-test-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 security-group"))
        .stdout(predicate::str::contains("3 service"))
        .stdout(predicate::str::contains("AirflowBucket"));
}

#[test]
fn test_invalid_command() {
    airlift().arg("invalid-command").assert().failure();
}

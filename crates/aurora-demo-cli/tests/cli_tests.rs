//! Integration tests for the `aurora-demo` binary.
//!
//! Only actions that never reach AWS are exercised: the greeting and the
//! unknown-action fallback. The SDK is still configured, so a region is
//! provided and instance metadata lookups are disabled.

use assert_cmd::Command;
use predicates::prelude::*;

fn aurora_demo() -> Command {
    let mut cmd = Command::cargo_bin("aurora-demo").expect("binary exists");
    cmd.env("AWS_REGION", "eu-west-1")
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .env("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE")
        .env("AWS_SECRET_ACCESS_KEY", "example")
        .env_remove("DBCLUSTERARN")
        .env_remove("SECRETARN")
        .env_remove("DBCLUSTERID")
        .env_remove("WARMUP_MAX_ATTEMPTS")
        .env_remove("WARMUP_RETRY_DELAY_MS");
    cmd
}

fn with_target(cmd: &mut Command) -> &mut Command {
    cmd.args([
        "--resource-arn",
        "arn:aws:rds:eu-west-1:123456789012:cluster:demo-cluster",
        "--secret-arn",
        "arn:aws:secretsmanager:eu-west-1:123456789012:secret:demo-secret",
        "--cluster-id",
        "demo-cluster",
    ])
}

#[test]
fn help_lists_flags() {
    aurora_demo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--action"))
        .stdout(predicate::str::contains("--resource-arn"))
        .stdout(predicate::str::contains("DBCLUSTERARN"));
}

#[test]
fn greets_without_action() {
    let mut cmd = aurora_demo();
    with_target(&mut cmd)
        .args(["--path", "/cli"])
        .assert()
        .success()
        .stdout("<html><body>Hi! This is path /cli </body></html>\n");
}

#[test]
fn identifiers_can_come_from_environment() {
    aurora_demo()
        .env("DBCLUSTERARN", "arn:aws:rds:eu-west-1:123456789012:cluster:demo")
        .env("SECRETARN", "arn:aws:secretsmanager:eu-west-1:123456789012:secret:demo")
        .env("DBCLUSTERID", "demo")
        .args(["--action", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi! This is path /"));
}

#[test]
fn unknown_action_prints_fallback_page() {
    let mut cmd = aurora_demo();
    with_target(&mut cmd)
        .args(["--action", "truncate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown action 'truncate'"));
}

#[test]
fn missing_cluster_id_fails() {
    aurora_demo()
        .args([
            "--resource-arn",
            "arn:aws:rds:eu-west-1:123456789012:cluster:demo",
            "--secret-arn",
            "arn:aws:secretsmanager:eu-west-1:123456789012:secret:demo",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--cluster-id"));
}

#[test]
fn zero_warmup_attempts_is_rejected() {
    let mut cmd = aurora_demo();
    with_target(&mut cmd)
        .args(["--warmup-attempts", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

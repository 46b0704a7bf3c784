//! Integration tests for the `ivy-snapshot` binary.
//!
//! Each test writes a manifest into a temporary directory, runs the binary
//! via `assert_cmd` with a scrubbed environment, and checks exit status and
//! output. Submission tests point `GITHUB_API_URL` at a `wiremock` server.

#![allow(deprecated)] // cargo_bin deprecation — macro replacement not yet stable

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MANIFEST: &str = r#"<ivy-module version="2.0">
    <info organisation="com.acme" module="widgets"/>
    <dependencies>
        <dependency org="com.example" name="foo" rev="1.2.3"/>
        <dependency org="com.example" name="bar" rev="4.5.6" />
    </dependencies>
</ivy-module>
"#;

fn ivy_snapshot() -> Command {
    let mut cmd = Command::cargo_bin("ivy-snapshot").expect("ivy-snapshot binary not found");
    cmd.env_clear();
    cmd
}

fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("ivy.xml");
    std::fs::write(&path, content).expect("write manifest");
    path
}

fn with_github_env(cmd: &mut Command, api_url: &str) {
    cmd.env("GITHUB_TOKEN", "ghs_test")
        .env("GITHUB_REPOSITORY", "acme/widgets")
        .env("GITHUB_SHA", "abc123")
        .env("GITHUB_REF", "refs/heads/main")
        .env("GITHUB_API_URL", api_url);
}

#[test]
fn missing_token_fails_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), MANIFEST);

    ivy_snapshot()
        .arg(&manifest)
        .env("GITHUB_REPOSITORY", "acme/widgets")
        .env("GITHUB_SHA", "abc123")
        .env("GITHUB_REF", "refs/heads/main")
        // Unroutable on purpose; reaching it would be a bug
        .env("GITHUB_API_URL", "http://127.0.0.1:9")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing GITHUB_TOKEN"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_environment_variables_fail() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), MANIFEST);

    ivy_snapshot()
        .arg(&manifest)
        .env("GITHUB_TOKEN", "ghs_test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_REPOSITORY"))
        .stderr(predicate::str::contains("GITHUB_SHA"));
}

#[test]
fn manifest_without_dependencies_fails() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), "<ivy-module><dependencies/></ivy-module>");

    let mut cmd = ivy_snapshot();
    with_github_env(&mut cmd, "http://127.0.0.1:9");
    cmd.arg(&manifest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No dependencies found in"));
}

#[test]
fn default_manifest_path_is_ivy_xml() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = ivy_snapshot();
    with_github_env(&mut cmd, "http://127.0.0.1:9");
    cmd.current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read manifest ivy.xml"));
}

#[tokio::test(flavor = "multi_thread")]
async fn created_response_exits_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/dependency-graph/snapshots"))
        .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), MANIFEST);
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let mut cmd = ivy_snapshot();
        with_github_env(&mut cmd, &uri);
        cmd.arg(&manifest)
            .assert()
            .success()
            .stdout(predicate::str::contains("Dependency snapshot submitted."));
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let resolved = body["manifests"]
        .as_object()
        .and_then(|m| m.values().next())
        .map(|m| &m["resolved"])
        .unwrap();
    assert!(resolved.get("pkg:maven/com.example/foo@1.2.3").is_some());
    assert!(resolved.get("pkg:maven/com.example/bar@4.5.6").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn forbidden_response_exits_one_and_echoes_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string("Resource not accessible by integration"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), MANIFEST);
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let mut cmd = ivy_snapshot();
        with_github_env(&mut cmd, &uri);
        cmd.arg(&manifest)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Dependency submission failed: 403"))
            .stderr(predicate::str::contains(
                "Resource not accessible by integration",
            ));
    })
    .await
    .unwrap();
}

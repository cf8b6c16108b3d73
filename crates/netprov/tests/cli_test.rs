//! Integration tests for the `netprov` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes run
//! without any controller. The remaining tests point the binary at
//! wiremock controllers through command-line flags.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `netprov` binary with env isolation.
///
/// Clears all `NETPROV_*` env vars and points config directories and the
/// debug log into `home` so tests never touch the user's configuration.
fn netprov_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netprov");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("NETPROV_LOG_FILE", home.join("netprov_run.log"))
        .env_remove("RUST_LOG")
        .env_remove("NETPROV_PROFILE")
        .env_remove("NETPROV_INTENT_URL")
        .env_remove("NETPROV_INTENT_USERNAME")
        .env_remove("NETPROV_INTENT_PASSWORD")
        .env_remove("NETPROV_POLICY_URL")
        .env_remove("NETPROV_POLICY_USERNAME")
        .env_remove("NETPROV_POLICY_PASSWORD")
        .env_remove("NETPROV_OUTPUT")
        .env_remove("NETPROV_INSECURE")
        .env_remove("NETPROV_TIMEOUT");
    cmd
}

/// Flags naming both controllers, so no config file is needed.
fn controller_flags(intent: &str, policy: &str) -> Vec<String> {
    [
        "--intent-url",
        intent,
        "--intent-username",
        "admin",
        "--intent-password",
        "pw",
        "--policy-url",
        policy,
        "--policy-username",
        "ersadmin",
        "--policy-password",
        "secret",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async test thread; the mock servers keep serving.
async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn mount_intent_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .and(basic_auth("admin", "pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Token": "tok" })))
        .expect(1)
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = netprov_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    netprov_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("run")
            .and(predicate::str::contains("template"))
            .and(predicate::str::contains("deploy"))
            .and(predicate::str::contains("endpoint")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    netprov_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("netprov"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    netprov_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("netprov"));
}

#[test]
fn test_config_path_points_at_toml() {
    let home = tempfile::tempdir().unwrap();
    netprov_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_missing_config_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = netprov_cmd(home.path())
        .args(["device", "show", "sw1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("Configuration file not found"),
        "unexpected output:\n{text}"
    );
}

#[test]
fn test_vlan_out_of_range_rejected() {
    let home = tempfile::tempdir().unwrap();
    netprov_cmd(home.path())
        .args([
            "deploy",
            "apply",
            "--device",
            "sw1",
            "--vlan",
            "5000",
            "--switchport",
            "Gi1/0/6",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_descriptor_fails_before_network() {
    let home = tempfile::tempdir().unwrap();
    let template = home.path().join("vlan.txt");
    let descriptor = home.path().join("descriptor.json");
    std::fs::write(&template, "vlan $vlanId\n").unwrap();
    std::fs::write(
        &descriptor,
        r#"{"vlan": 0, "switchName": "sw1", "switchport": "Gi1/0/6",
            "endpointGroup": "POS", "macAddress": "aa:bb:cc:dd:ee:ff"}"#,
    )
    .unwrap();

    // Nothing listens on port 9; a network call would be a connection error.
    let output = netprov_cmd(home.path())
        .args(controller_flags("https://127.0.0.1:9", "https://127.0.0.1:9"))
        .arg("run")
        .arg("--template")
        .arg(&template)
        .arg("--descriptor")
        .arg(&descriptor)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("descriptor"), "unexpected output:\n{text}");
}

#[test]
fn test_unreadable_template_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    netprov_cmd(home.path())
        .args(controller_flags("https://127.0.0.1:9", "https://127.0.0.1:9"))
        .args([
            "run",
            "--template",
            "/nonexistent/vlan.txt",
            "--descriptor",
            "/nonexistent/d.json",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("template"));
}

// ── Against mock controllers ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_device_show_json() {
    let intent = MockServer::start().await;
    mount_intent_auth(&intent).await;
    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .and(query_param("hostname", "sw1"))
        .and(header("X-Auth-Token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{
                "id": "dev-1",
                "hostname": "sw1",
                "managementIpAddress": "10.0.0.11",
                "platformId": "C9300-24P",
                "softwareVersion": "17.3.4",
                "reachabilityStatus": "Reachable"
            }]
        })))
        .mount(&intent)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = netprov_cmd(home.path());
    cmd.args(controller_flags(&intent.uri(), &intent.uri()))
        .args(["-o", "json-compact", "device", "show", "sw1"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["id"], "dev-1");
    assert_eq!(value["management_ip"], "10.0.0.11");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_device_exits_not_found() {
    let intent = MockServer::start().await;
    mount_intent_auth(&intent).await;
    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": [] })))
        .mount(&intent)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = netprov_cmd(home.path());
    cmd.args(controller_flags(&intent.uri(), &intent.uri()))
        .args(["device", "show", "ghost"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_task_show_plain() {
    let intent = MockServer::start().await;
    mount_intent_auth(&intent).await;
    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/task/t-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "id": "t-9", "isError": true, "endTime": 1, "failureReason": "boom" }
        })))
        .mount(&intent)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = netprov_cmd(home.path());
    cmd.args(controller_flags(&intent.uri(), &intent.uri()))
        .args(["-o", "plain", "task", "show", "t-9"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "FAILURE");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_endpoint_register_creates_record() {
    let policy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ers/config/endpointgroup/name/POS"))
        .and(basic_auth("ersadmin", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "EndPointGroup": { "id": "grp-1", "name": "POS" }
        })))
        .mount(&policy)
        .await;
    Mock::given(method("GET"))
        .and(path("/ers/config/endpoint/name/AA:BB:CC:DD:EE:FF"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&policy)
        .await;
    Mock::given(method("POST"))
        .and(path("/ers/config/endpoint"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&policy)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = netprov_cmd(home.path());
    cmd.args(controller_flags("https://127.0.0.1:9", &policy.uri()))
        .args(["-o", "plain", "endpoint", "register", "aa-bb-cc-dd-ee-ff", "--group", "POS"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "created");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_auth() {
    let intent = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&intent)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = netprov_cmd(home.path());
    cmd.args(controller_flags(&intent.uri(), &intent.uri()))
        .args(["project", "ensure"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

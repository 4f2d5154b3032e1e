use std::io::Write;

use assert_cmd::Command;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mailcow(server: &MockServer) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mailcow"));
    for key in ["MAILCOW_SRC_HOST", "MAILCOW_SRC_PORT", "MAILCOW_SRC_ENC"] {
        cmd.env_remove(key);
    }
    cmd.env("MAILCOW_API_URL", server.uri());
    cmd.env("MAILCOW_API_KEY", "test-key");
    cmd
}

#[tokio::test]
async fn get_uses_the_no_log_endpoint_by_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/get/syncjobs/all/no_log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "username": "john@example.com", "user1": "john@old.com",
              "host1": "imap.old.com", "active": "1" }
        ])))
        .mount(&server)
        .await;

    let output = mailcow(&server)
        .args(["jobs", "get"])
        .output()
        .expect("run mailcow");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("john@old.com"));
    assert!(stdout.contains("imap.old.com"));
    assert!(stdout.contains("Total: 1 sync job(s)"));
}

#[tokio::test]
async fn include_log_switches_the_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/get/syncjobs/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let output = mailcow(&server)
        .args(["jobs", "get", "--include-log"])
        .output()
        .expect("run mailcow");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No sync jobs found."));
}

#[tokio::test]
async fn add_single_job_applies_imapsync_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/add/syncjob"))
        .and(body_string_contains("\"host1\":\"imap.old.com\""))
        .and(body_string_contains("\"port1\":\"993\""))
        .and(body_string_contains("\"enc1\":\"SSL\""))
        .and(body_string_contains("\"mins_interval\":\"20\""))
        .and(body_string_contains("\"exclude\":\"(?i)spam|(?i)junk\""))
        .and(body_string_contains("\"delete2duplicates\":\"1\""))
        .and(body_string_contains("\"username\":\"john@example.com\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "type": "success", "msg": ["syncjob_added", "john@example.com"] }
        ])))
        .mount(&server)
        .await;

    let output = mailcow(&server)
        .args([
            "jobs",
            "add",
            "--host1",
            "imap.old.com",
            "--user1",
            "john@old.com",
            "--password1",
            "oldpass",
            "--username",
            "john@example.com",
        ])
        .output()
        .expect("run mailcow");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("syncjob_added john@example.com"));
}

#[tokio::test]
async fn host_comes_from_the_environment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/add/syncjob"))
        .and(body_string_contains("\"host1\":\"imap.env.com\""))
        .and(body_string_contains("\"enc1\":\"TLS\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "type": "success", "msg": ["syncjob_added", "ana@example.com"] }
        ])))
        .mount(&server)
        .await;

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "user1,password1,username").unwrap();
    writeln!(csv, "ana@old.com,oldpass,ana@example.com").unwrap();

    let output = mailcow(&server)
        .env("MAILCOW_SRC_HOST", "imap.env.com")
        .env("MAILCOW_SRC_ENC", "tls")
        .args(["jobs", "add", "-f", csv.path().to_str().unwrap()])
        .output()
        .expect("run mailcow");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[tokio::test]
async fn add_without_host_is_a_usage_error() {
    let server = MockServer::start().await;

    let output = mailcow(&server)
        .args([
            "jobs",
            "add",
            "--user1",
            "a@old.com",
            "--password1",
            "p",
            "--username",
            "a@example.com",
        ])
        .output()
        .expect("run mailcow");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--host1"));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn rows_missing_credentials_are_reported_invalid() {
    let server = MockServer::start().await;

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "user1,password1,username").unwrap();
    writeln!(csv, "ana@old.com,,ana@example.com").unwrap();

    let output = mailcow(&server)
        .args([
            "jobs",
            "add",
            "--host1",
            "imap.old.com",
            "-f",
            csv.path().to_str().unwrap(),
        ])
        .output()
        .expect("run mailcow");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("invalid"));
    assert!(stdout.contains("password1"));
}

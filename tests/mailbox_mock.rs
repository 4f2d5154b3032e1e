use std::io::Write;

use assert_cmd::Command;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mailcow(server: &MockServer) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mailcow"));
    cmd.env_remove("MAILCOW_DOMAIN");
    cmd.env("MAILCOW_API_URL", server.uri());
    cmd.env("MAILCOW_API_KEY", "test-key");
    cmd
}

fn success_reply(what: &str, who: &str) -> serde_json::Value {
    json!([{ "type": "success", "msg": [what, who] }])
}

#[tokio::test]
async fn add_single_mailbox_posts_payload_with_password2() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/add/mailbox"))
        .and(body_string_contains("\"local_part\":\"john\""))
        .and(body_string_contains("\"domain\":\"example.com\""))
        .and(body_string_contains("\"password2\":\"s3cretPW!\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_reply("mailbox_added", "john@example.com")),
        )
        .mount(&server)
        .await;

    let output = mailcow(&server)
        .args([
            "mailbox",
            "add",
            "-d",
            "example.com",
            "--local-part",
            "john",
            "--password",
            "s3cretPW!",
        ])
        .output()
        .expect("run mailcow");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("created"));
    assert!(stdout.contains("mailbox_added john@example.com"));
    assert!(stdout.contains("Completed: 1 created, 0 failed"));
}

#[tokio::test]
async fn batch_continues_past_a_failing_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/add/mailbox"))
        .and(body_string_contains("\"local_part\":\"dup\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "type": "error", "msg": ["object_exists", "dup@example.com"] }
        ])))
        .mount(&server)
        .await;

    for local in ["john", "ana"] {
        Mock::given(method("POST"))
            .and(path("/api/v1/add/mailbox"))
            .and(body_string_contains(format!("\"local_part\":\"{local}\"")))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_reply(
                "mailbox_added",
                &format!("{local}@example.com"),
            )))
            .mount(&server)
            .await;
    }

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "local_part,name,password").unwrap();
    writeln!(csv, "john,John Doe,aA1!aaaaaaaaaaaa").unwrap();
    writeln!(csv, "dup,Dup User,aA1!aaaaaaaaaaaa").unwrap();
    writeln!(csv, "ana,Ana Pop,aA1!aaaaaaaaaaaa").unwrap();

    let output = mailcow(&server)
        .args([
            "mailbox",
            "add",
            "-d",
            "example.com",
            "-f",
            csv.path().to_str().unwrap(),
        ])
        .output()
        .expect("run mailcow");

    // One failed row makes the run non-zero, but all rows were attempted.
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mailbox_added john@example.com"));
    assert!(stdout.contains("object_exists"));
    assert!(stdout.contains("mailbox_added ana@example.com"));
    assert!(stdout.contains("Completed: 2 created, 1 failed"));
}

#[tokio::test]
async fn preview_performs_no_api_calls() {
    let server = MockServer::start().await;

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "local_part,name").unwrap();
    writeln!(csv, "john,John Doe").unwrap();
    writeln!(csv, ",Missing Local").unwrap();

    let output = mailcow(&server)
        .args([
            "mailbox",
            "add",
            "-d",
            "example.com",
            "-f",
            csv.path().to_str().unwrap(),
            "--gen-password",
            "--preview",
        ])
        .output()
        .expect("run mailcow");

    assert!(output.status.success());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("preview"));
    assert!(stdout.contains("invalid"));
    assert!(stdout.contains("Total: 2 mailbox(s) to create"));
}

#[tokio::test]
async fn generated_passwords_are_echoed_in_the_report() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/add/mailbox"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_reply("mailbox_added", "john@example.com")),
        )
        .mount(&server)
        .await;

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "local_part,name").unwrap();
    writeln!(csv, "john,John Doe").unwrap();
    writeln!(csv, ",Missing Local").unwrap();

    let output = mailcow(&server)
        .args([
            "mailbox",
            "add",
            "-d",
            "example.com",
            "-f",
            csv.path().to_str().unwrap(),
            "--gen-password",
            "-o",
            "csv",
        ])
        .output()
        .expect("run mailcow");

    // The invalid second row makes the run non-zero.
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "local_part,domain,name,password,status,detail");

    let created: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(created[0], "john");
    assert_eq!(created[3].len(), 16);
    assert_eq!(created[4], "created");

    let invalid: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(invalid[0], "");
    assert_eq!(invalid[3], "");
    assert_eq!(invalid[4], "invalid");
    assert!(invalid[5].contains("local_part"));
}

#[tokio::test]
async fn get_filters_by_domain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/get/mailbox/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "username": "john@example.com", "name": "John", "domain": "example.com",
              "quota": 0, "quota_used": 0, "active": "1" },
            { "username": "eve@other.org", "name": "Eve", "domain": "other.org",
              "quota": 0, "quota_used": 0, "active": "1" }
        ])))
        .mount(&server)
        .await;

    let output = mailcow(&server)
        .args(["mailbox", "get", "-d", "example.com"])
        .output()
        .expect("run mailcow");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("john@example.com"));
    assert!(!stdout.contains("eve@other.org"));
    assert!(stdout.contains("Total: 1 mailbox(es)"));
}

#[tokio::test]
async fn update_masks_the_password_in_the_echo() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/edit/mailbox"))
        .and(body_string_contains("\"items\":[\"john@example.com\"]"))
        .and(body_string_contains("\"password\":\"newpass!A1\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_reply("mailbox_modified", "john@example.com")),
        )
        .mount(&server)
        .await;

    let output = mailcow(&server)
        .args([
            "mailbox",
            "update",
            "john@example.com",
            "--password",
            "newpass!A1",
            "--quota",
            "1024",
        ])
        .output()
        .expect("run mailcow");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated mailbox john@example.com"));
    assert!(stdout.contains("password: ********"));
    assert!(stdout.contains("quota: 1024"));
    assert!(!stdout.contains("newpass!A1"));
}

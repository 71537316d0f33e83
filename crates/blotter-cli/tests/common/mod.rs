#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// A small capture: a failed login, a JSON listing fetched over two
/// transactions, and two messages.
#[allow(dead_code)]
pub const ARCHIVE: &str = r#"{
  "tasks": [
    {
      "id": "login",
      "state": "failure",
      "url": "https://api.example.com/login",
      "method": "POST",
      "original_request": {
        "url": "https://api.example.com/login",
        "method": "POST",
        "headers": [{ "name": "Content-Type", "value": "application/x-www-form-urlencoded" }]
      },
      "response": { "status_code": 401, "headers": [{ "name": "Content-Type", "value": "application/json" }] },
      "request_body": { "text": "user=ana&pass=it's" },
      "response_body": { "text": "{\"error\":\"bad credentials\"}" }
    },
    {
      "id": "items",
      "state": "success",
      "url": "https://api.example.com/items?page=2",
      "response": { "status_code": 200, "headers": [{ "name": "Content-Type", "value": "application/json" }] },
      "response_body": { "base64": "eyJpdGVtcyI6WzEsMiwzXX0=" },
      "transactions": [
        {
          "request": { "url": "https://api.example.com/items?page=2", "headers": [{ "name": "Accept", "value": "application/json" }] },
          "fetch_type": "localCache"
        },
        {
          "request": { "url": "https://api.example.com/items?page=2", "headers": [{ "name": "Accept", "value": "application/json" }] },
          "response": { "status_code": 200, "headers": [{ "name": "Content-Type", "value": "application/json" }] },
          "fetch_type": "networkLoad",
          "duration": 0.085
        }
      ]
    }
  ],
  "messages": [
    { "level": "error", "label": "auth", "text": "Login rejected", "task_id": "login" },
    { "level": "info", "text": "Cache warmed" }
  ]
}"#;

/// Create a configured `blotter` command suitable for integration tests.
#[allow(dead_code)]
pub fn blotter_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blotter"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("BLOTTER_CONFIG");
    cmd
}

/// Write the sample archive into `dir`.
#[allow(dead_code)]
pub fn write_archive(dir: &Path) -> PathBuf {
    let path = dir.join("capture.json");
    std::fs::write(&path, ARCHIVE).expect("failed to write archive");
    path
}

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `codefill` invocation isolated from the user's config directory.
fn codefill(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codefill").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

const SEGMENTED_PAGE: &str = r#"{
    "visible_text": "Enter the 4-digit code",
    "elements": [
        {"handle": 1, "tag": "div", "rect": {"width": 400, "height": 60}},
        {"handle": 2, "parent": 1, "tag": "input", "attributes": {"maxlength": "1"}, "rect": {"width": 40, "height": 40}},
        {"handle": 3, "parent": 1, "tag": "input", "attributes": {"maxlength": "1"}, "rect": {"width": 40, "height": 40}},
        {"handle": 4, "parent": 1, "tag": "input", "attributes": {"maxlength": "1"}, "rect": {"width": 40, "height": 40}},
        {"handle": 5, "parent": 1, "tag": "input", "attributes": {"maxlength": "1"}, "rect": {"width": 40, "height": 40}}
    ]
}"#;

#[test]
fn extract_prints_code_from_flags() {
    let home = TempDir::new().unwrap();

    codefill(home.path())
        .args(["extract", "--subject", "Sign-in attempt"])
        .args(["--body", "Your verification code is 482913. It expires in 10 minutes."])
        .assert()
        .success()
        .stdout("482913\n");
}

#[test]
fn extract_json_reports_tier() {
    let home = TempDir::new().unwrap();

    codefill(home.path())
        .args(["extract", "--body", "Order total 1299 for 3 items", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code\": \"1299\""))
        .stdout(predicate::str::contains("\"tier\": \"numeric\""));
}

#[test]
fn extract_reports_nothing_found() {
    let home = TempDir::new().unwrap();

    codefill(home.path())
        .args(["extract", "--subject", "Newsletter", "--body", "Thanks for reading", "-f", "json"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn extract_strips_html_bodies() {
    let home = TempDir::new().unwrap();
    let message = home.path().join("message.html");
    fs::write(
        &message,
        "<html><head><style>.x { color: red }</style></head>\
         <body><p>Your code: <b>A1B2C3</b></p></body></html>",
    )
    .unwrap();

    codefill(home.path())
        .arg("extract")
        .arg("--input")
        .arg(&message)
        .assert()
        .success()
        .stdout("A1B2C3\n");
}

#[test]
fn extract_rejects_empty_message() {
    let home = TempDir::new().unwrap();

    codefill(home.path())
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("neither subject nor body"));
}

#[test]
fn classify_finds_segmented_boxes() {
    let home = TempDir::new().unwrap();
    let page = home.path().join("page.json");
    fs::write(&page, SEGMENTED_PAGE).unwrap();

    codefill(home.path())
        .arg("classify")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 boxes: 2 3 4 5"));
}

#[test]
fn classify_json_output() {
    let home = TempDir::new().unwrap();
    let page = home.path().join("page.json");
    fs::write(
        &page,
        r#"{"elements": [{"handle": 7, "tag": "input",
            "attributes": {"autocomplete": "one-time-code"},
            "rect": {"width": 200, "height": 30}}]}"#,
    )
    .unwrap();

    codefill(home.path())
        .args(["classify", "--format", "json"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tier\": \"marker\""))
        .stdout(predicate::str::contains("\"handle\": 7"));
}

#[test]
fn classify_rejects_duplicate_handles() {
    let home = TempDir::new().unwrap();
    let page = home.path().join("page.json");
    fs::write(
        &page,
        r#"{"elements": [{"handle": 1, "tag": "input"}, {"handle": 1, "tag": "input"}]}"#,
    )
    .unwrap();

    codefill(home.path())
        .arg("classify")
        .arg(&page)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate element handle"));
}

#[test]
fn batch_prefers_newest_message() {
    let home = TempDir::new().unwrap();
    let inbox = home.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(
        inbox.join("alice.json"),
        r#"[
            {"subject": "Old code", "body": "Your code is 111111", "received_at": "2026-01-01T10:00:00Z"},
            {"subject": "New code", "body": "Your code is 222222", "received_at": "2026-01-01T10:05:00Z"}
        ]"#,
    )
    .unwrap();
    fs::write(
        inbox.join("bob.json"),
        r#"{"subject": "Welcome", "body": "Glad to have you"}"#,
    )
    .unwrap();

    let pattern = inbox.join("*.json");
    codefill(home.path())
        .args(["batch", "--format", "csv"])
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("file,messages,index,code,tier,error"))
        .stdout(predicate::str::contains("alice.json,2,0,222222,callout,"))
        .stdout(predicate::str::contains("bob.json,1,,,,"));

    codefill(home.path())
        .args(["batch", "--keep-order"])
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("111111"));
}

#[test]
fn batch_fails_without_matches() {
    let home = TempDir::new().unwrap();
    let pattern = home.path().join("missing-*.json");

    codefill(home.path())
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("codefill.json");
    let config = config.to_str().unwrap();

    codefill(home.path())
        .args(["--config", config, "config", "init"])
        .assert()
        .success();

    codefill(home.path())
        .args(["--config", config, "config", "set", "extraction.year_max", "2020"])
        .assert()
        .success();

    codefill(home.path())
        .args(["--config", config, "config", "get", "extraction.year_max"])
        .assert()
        .success()
        .stdout("2020\n");

    // 2025 only reads as a year while the range covers it.
    codefill(home.path())
        .args(["extract", "--body", "Reminder: event in 2025", "-f", "json"])
        .assert()
        .success()
        .stdout("null\n");

    codefill(home.path())
        .args(["--config", config, "extract", "--body", "Reminder: event in 2025"])
        .assert()
        .success()
        .stdout("2025\n");
}

#[test]
fn config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("codefill.json");

    codefill(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.nonexistent", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_set_rejects_empty_year_range() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("codefill.json");

    codefill(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.year_min", "2100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("year_min 2100 exceeds year_max 2099"));
}

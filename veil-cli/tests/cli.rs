use predicates::prelude::*;
use serde_json::{json, Value};
use std::error::Error;
use std::fs;

fn encode_one(id: u64, salt: &str) -> Result<String, Box<dyn Error>> {
    let output = assert_cmd::Command::cargo_bin("veil")?
        .args(["encode", &id.to_string(), "--salt", salt, "--min-length", "8"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    Ok(String::from_utf8(output)?.trim().to_string())
}

#[test]
fn encode_then_decode_round_trips() -> Result<(), Box<dyn Error>> {
    let token = encode_one(42, "cli-test")?;
    assert!(token.chars().count() >= 8);
    assert_ne!(token, "42");

    assert_cmd::Command::cargo_bin("veil")?
        .args(["decode", &token, "--salt", "cli-test", "--min-length", "8"])
        .assert()
        .success()
        .stdout(predicate::eq("42\n"));
    Ok(())
}

#[test]
fn encode_emits_one_token_per_id() -> Result<(), Box<dyn Error>> {
    let output = assert_cmd::Command::cargo_bin("veil")?
        .args(["encode", "1", "2", "3", "--salt", "cli-test"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output)?;
    assert_eq!(stdout.lines().count(), 3);
    Ok(())
}

#[test]
fn decode_rejects_garbage_tokens() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("veil")?
        .args(["decode", "!!!", "--salt", "cli-test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not decode"));
    Ok(())
}

#[test]
fn invalid_alphabet_fails_at_startup() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("veil")?
        .args(["encode", "42", "--alphabet", "abc"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn transform_encode_rewrites_identifier_fields() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.json");
    fs::write(
        &input,
        serde_json::to_vec(&json!({ "userId": 42, "name": "ada" }))?,
    )?;

    let output = assert_cmd::Command::cargo_bin("veil")?
        .args([
            "transform",
            "--direction",
            "encode",
            "--input",
            input.to_str().unwrap(),
            "--salt",
            "cli-test",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&output)?;
    assert!(value["userId"].is_string());
    assert_eq!(value["name"], json!("ada"));
    Ok(())
}

#[test]
fn transform_decode_restores_the_original() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let original = json!({ "userId": 42, "userIds": [1, 2], "name": "ada" });
    let input = dir.path().join("input.json");
    let encoded = dir.path().join("encoded.json");
    fs::write(&input, serde_json::to_vec(&original)?)?;

    assert_cmd::Command::cargo_bin("veil")?
        .args([
            "transform",
            "--direction",
            "encode",
            "--input",
            input.to_str().unwrap(),
            "--output",
            encoded.to_str().unwrap(),
            "--salt",
            "cli-test",
        ])
        .assert()
        .success();

    let output = assert_cmd::Command::cargo_bin("veil")?
        .args([
            "transform",
            "--direction",
            "decode",
            "--input",
            encoded.to_str().unwrap(),
            "--salt",
            "cli-test",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value, original);
    Ok(())
}

#[test]
fn transform_decode_fails_on_invalid_tokens() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.json");
    fs::write(
        &input,
        serde_json::to_vec(&json!({ "userId": "not-a-token!" }))?,
    )?;

    assert_cmd::Command::cargo_bin("veil")?
        .args([
            "transform",
            "--direction",
            "decode",
            "--input",
            input.to_str().unwrap(),
            "--salt",
            "cli-test",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("userId"));
    Ok(())
}

#[test]
fn key_flag_extends_classification_without_pattern() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.json");
    fs::write(&input, serde_json::to_vec(&json!({ "user": 1, "id": 2 }))?)?;

    let output = assert_cmd::Command::cargo_bin("veil")?
        .args([
            "transform",
            "--direction",
            "encode",
            "--input",
            input.to_str().unwrap(),
            "--no-pattern",
            "--key",
            "user",
            "--salt",
            "cli-test",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&output)?;
    assert!(value["user"].is_string());
    assert_eq!(value["id"], json!(2));
    Ok(())
}

// fieldmask/tests/cli_integration_tests.rs
//! Command-line interface (CLI) integration tests for the `fieldmask` binary.
//!
//! These tests run the built executable with `assert_cmd`, feed documents
//! through stdin or temporary files, and check stdout (the masked document),
//! stderr (status lines and reports) and the exit status.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn fieldmask() -> Command {
    let mut cmd = Command::cargo_bin("fieldmask").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Runs `fieldmask` with `input` on stdin and parses stdout as JSON.
fn run_json(input: &str, args: &[&str]) -> Result<Value> {
    let output = fieldmask().args(args).write_stdin(input).output()?;
    assert!(
        output.status.success(),
        "fieldmask failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn policy_file(yaml: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

#[test]
fn test_mask_fields_from_command_line() -> Result<()> {
    let masked = run_json(
        r#"{"a":1,"b":{"c":2,"e":3},"d":[10,20,30,40,50,60]}"#,
        &["-q", "mask", "-s", "***", "-f", "a", "-f", "b.c", "-f", "d[1,3-5]"],
    )?;
    assert_eq!(
        masked,
        json!({"a": "***", "b": {"c": "***", "e": 3}, "d": [10, "***", 30, "***", "***", "***"]})
    );
    Ok(())
}

#[test]
fn test_default_symbol_is_four_stars() -> Result<()> {
    let masked = run_json(r#"{"password":"p","user":"u"}"#, &["-q", "mask", "-f", "password"])?;
    assert_eq!(masked, json!({"password": "****", "user": "u"}));
    Ok(())
}

#[test]
fn test_full_level_masks_every_top_level_field() -> Result<()> {
    let masked = run_json(
        r#"{"a":1,"b":{"c":2},"n":null}"#,
        &["-q", "mask", "--level", "full", "-s", "#"],
    )?;
    assert_eq!(masked, json!({"a": "#", "b": "#", "n": "#"}));
    Ok(())
}

#[test]
fn test_no_policy_passes_document_through() {
    fieldmask()
        .args(["mask"])
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .success()
        .stdout("{\"a\":1}\n")
        .stderr(predicate::str::contains("passes through unchanged"));
}

#[test]
fn test_policy_file_response_direction() -> Result<()> {
    let policy = policy_file(
        r#"
name: orders
symbol: "xx"
request:
  level: partial
  fields: ["card.number"]
response:
  level: partial
  fields: ["items[*].price", "token"]
"#,
    )?;
    let path = policy.path().to_str().unwrap();
    let masked = run_json(
        r#"{"token":"t","items":[{"price":1,"sku":"a"},{"price":2,"sku":"b"}],"card":{"number":"4111"}}"#,
        &["-q", "mask", "--policy", path, "--direction", "response"],
    )?;
    assert_eq!(
        masked,
        json!({
            "token": "xx",
            "items": [{"price": "xx", "sku": "a"}, {"price": "xx", "sku": "b"}],
            "card": {"number": "4111"}
        })
    );
    Ok(())
}

#[test]
fn test_malformed_rule_fails_before_reading_input() {
    fieldmask()
        .args(["mask", "-f", "d[abc]"])
        .write_stdin("this is not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed index expression 'abc'"));
}

#[test]
fn test_invalid_json_input_fails() {
    fieldmask()
        .args(["-q", "mask", "-f", "a"])
        .write_stdin("{\"a\":")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input is not a valid JSON document"));
}

#[test]
fn test_empty_input_fails() {
    fieldmask()
        .args(["-q", "mask", "-f", "a"])
        .write_stdin("  \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to mask"));
}

#[test]
fn test_report_goes_to_stderr() {
    fieldmask()
        .args(["mask", "--report", "-f", "b.c", "-f", "x.y"])
        .write_stdin(r#"{"b":{"c":1},"x":"flat"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("masked_paths").not())
        .stderr(predicate::str::contains("\"masked_paths\""))
        .stderr(predicate::str::contains("\"b.c\""))
        .stderr(predicate::str::contains("\"expected\": \"object\""));
}

#[test]
fn test_strict_fails_on_shape_mismatch() {
    fieldmask()
        .args(["-q", "mask", "--strict", "-f", "list[0]"])
        .write_stdin(r#"{"list":"not an array"}"#)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--strict"));
}

#[test]
fn test_input_and_output_files() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    fs::write(&input, r#"{"secret":"s","keep":1}"#)?;

    fieldmask()
        .args(["mask", "-f", "secret", "--pretty"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Writing masked document to file"));

    let written = fs::read_to_string(&output)?;
    assert!(written.contains('\n'), "expected pretty output: {}", written);
    let masked: Value = serde_json::from_str(&written)?;
    assert_eq!(masked, json!({"secret": "****", "keep": 1}));
    Ok(())
}

#[test]
fn test_missing_named_policy_fails() {
    fieldmask()
        .args(["mask", "--policy-name", "no-such-policy-anywhere"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-policy-anywhere"));
}

#[test]
fn test_debug_flag_enables_core_logging() {
    fieldmask()
        .args(["-d", "mask", "-f", "a"])
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .success()
        .stderr(predicate::str::contains("Starting compilation of 1 rule expressions."));
}

#[test]
fn test_check_prints_merged_rules() -> Result<()> {
    let output = fieldmask()
        .args(["-q", "check", "-f", "x.y", "-f", "x.z"])
        .output()?;
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout)?;
    let rules = &report["fields"]["rules"];
    assert_eq!(rules["x"]["kind"], "scalar");
    assert!(rules["x"]["children"].get("y").is_some());
    assert!(rules["x"]["children"].get("z").is_some());
    assert_eq!(report["fields"]["key"].as_str().map(str::len), Some(64));
    Ok(())
}

#[test]
fn test_check_policy_file() -> Result<()> {
    let policy = policy_file("request:\n  level: partial\n  fields: [\"tokens[<=2]\"]\n")?;
    fieldmask()
        .args(["check", "--policy"])
        .arg(policy.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"request\""))
        .stdout(predicate::str::contains("\"less_eq\""))
        .stderr(predicate::str::contains("All rules compiled successfully."));
    Ok(())
}

#[test]
fn test_check_rejects_bad_policy() -> Result<()> {
    let policy = policy_file("response:\n  level: partial\n  fields: [\"a..b\"]\n")?;
    fieldmask()
        .args(["check", "--policy"])
        .arg(policy.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("response rules: Malformed rule expression 'a..b'"));
    Ok(())
}

#[test]
fn test_policy_and_policy_name_conflict() {
    fieldmask()
        .args(["check", "--policy", "a.yaml", "--policy-name", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

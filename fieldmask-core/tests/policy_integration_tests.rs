// fieldmask-core/tests/policy_integration_tests.rs
use anyhow::Result;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

use fieldmask_core::{
    Direction, MaskingEngine, MaskingLevel, MaskingPolicy, RuleCache, RuleEngine,
};

fn policy_file(yaml: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

#[test_log::test]
fn test_load_from_file() -> Result<()> {
    let file = policy_file(
        r#"
name: payments
description: "Card payment endpoints"
symbol: "<redacted>"
request:
  level: partial
  fields:
    - "card.number"
    - "card.cvv"
    - "items[*].voucher"
response:
  level: full
"#,
    )?;
    let policy = MaskingPolicy::load_from_file(file.path())?;
    assert_eq!(policy.display_name(), "payments");
    assert_eq!(policy.symbol, "<redacted>");
    assert_eq!(policy.request.level, MaskingLevel::Partial);
    assert_eq!(policy.request.fields.len(), 3);
    assert_eq!(policy.response.level, MaskingLevel::Full);
    assert!(policy.response.fields.is_empty());
    Ok(())
}

#[test]
fn test_load_from_file_rejects_bad_rules() -> Result<()> {
    let file = policy_file(
        r#"
request:
  level: partial
  fields: ["items[1-x]"]
"#,
    )?;
    let err = MaskingPolicy::load_from_file(file.path()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to load policy file"));
    assert!(message.contains("request rules"));
    Ok(())
}

#[test]
fn test_load_from_file_rejects_unknown_level() -> Result<()> {
    let file = policy_file("request:\n  level: sometimes\n")?;
    assert!(MaskingPolicy::load_from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let err = MaskingPolicy::load_from_file("/definitely/not/here/policy.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read policy file"));
}

#[test]
fn test_policy_drives_both_directions() -> Result<()> {
    let file = policy_file(
        r#"
symbol: "***"
request:
  level: partial
  fields: ["password", "profile.email"]
response:
  level: partial
  fields: ["tokens[0]", "tokens[>1]"]
"#,
    )?;
    let policy = MaskingPolicy::load_from_file(file.path())?;
    let cache = RuleCache::new();

    let request = RuleEngine::from_policy(&policy, Direction::Request, &cache)?;
    assert_eq!(
        request.mask(&json!({
            "user": "ann",
            "password": "hunter2",
            "profile": {"email": "ann@example.com", "age": 30}
        })),
        json!({
            "user": "ann",
            "password": "***",
            "profile": {"email": "***", "age": 30}
        })
    );

    let response = RuleEngine::from_policy(&policy, Direction::Response, &cache)?;
    assert_eq!(
        response.mask(&json!({"tokens": ["t0", "t1", "t2", "t3"]})),
        json!({"tokens": ["***", "t1", "***", "***"]})
    );

    // A second lookup of the same direction reuses the compiled rules.
    RuleEngine::from_policy(&policy, Direction::Request, &cache)?;
    assert_eq!(cache.compilations(), 2);
    Ok(())
}

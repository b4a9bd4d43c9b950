//! `check` command implementation: compiles rules without masking anything.

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::{json, Map, Value};

use fieldmask_core::{compile_rule_set, Direction, MaskingLevel, MaskingPolicy, RuleSetKey};

use super::{load_policy, success_msg};
use crate::cli::CheckCommand;
use crate::ui::theme::ThemeMap;

fn describe<S: AsRef<str>>(expressions: &[S]) -> Result<Value> {
    let rules = compile_rule_set(expressions)?;
    let key = RuleSetKey::from_expressions(expressions);
    debug!("Rule set {} has {} top-level field(s).", key, rules.len());
    Ok(json!({
        "key": key,
        "rules": serde_json::to_value(&rules)?,
    }))
}

/// Builds the JSON description printed by `fieldmask check`.
///
/// Explicit `fields` are reported under `"fields"`; otherwise each requested
/// direction of `policy` is reported under its name with its level.
pub fn check_report(
    policy: &MaskingPolicy,
    fields: &[String],
    direction: Option<Direction>,
) -> Result<Value> {
    let mut out = Map::new();
    if !fields.is_empty() {
        let entry = describe(fields).context("Rule check failed")?;
        out.insert("fields".to_string(), entry);
        return Ok(Value::Object(out));
    }

    let directions = match direction {
        Some(direction) => vec![direction],
        None => vec![Direction::Request, Direction::Response],
    };
    for direction in directions {
        let spec = policy.spec(direction);
        // Fields are only compiled where they take effect.
        let mut entry = if spec.level == MaskingLevel::Partial {
            describe(spec.fields.as_slice())
                .with_context(|| format!("Rule check failed for {} rules", direction))?
        } else {
            json!({ "ignored_fields": spec.fields })
        };
        if let Value::Object(map) = &mut entry {
            map.insert("level".to_string(), json!(spec.level));
        }
        out.insert(direction.to_string(), entry);
    }
    Ok(Value::Object(out))
}

/// Entry point for `fieldmask check`.
pub fn run_check_command(cmd: CheckCommand, quiet: bool, theme_map: &ThemeMap) -> Result<()> {
    info!("Starting check operation.");
    let policy = load_policy(&cmd.source)?;
    let report = check_report(&policy, &cmd.fields, cmd.direction.map(Into::into))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !quiet {
        success_msg("All rules compiled successfully.", theme_map);
    }
    Ok(())
}

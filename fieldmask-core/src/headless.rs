// fieldmask-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot masking of JSON text, for callers that
//! hold serialized documents rather than `serde_json::Value`s.

use log::debug;
use serde_json::Value;

use crate::errors::FieldMaskError;
use crate::masking::{mask, MaskingLevel};
use crate::rules::{compile_rule_set, RuleSet};

fn check_inputs<S: AsRef<str>>(
    level: MaskingLevel,
    expressions: &[S],
    input: &str,
    symbol: &str,
) -> Result<RuleSet, FieldMaskError> {
    if input.trim().is_empty() {
        return Err(FieldMaskError::EmptyInput);
    }
    if symbol.is_empty() {
        return Err(FieldMaskError::EmptySymbol);
    }
    match level {
        MaskingLevel::Partial if expressions.is_empty() => Err(FieldMaskError::EmptyRules),
        MaskingLevel::Partial => compile_rule_set(expressions),
        _ => Ok(RuleSet::new()),
    }
}

/// Parses `input` as one JSON document, masks it and serializes the result.
///
/// # Arguments
///
/// * `level` - How much to mask.
/// * `expressions` - Rule expressions, used at `Partial` only.
/// * `input` - JSON text.
/// * `symbol` - Replacement for masked values.
pub fn mask_json_str<S: AsRef<str>>(
    level: MaskingLevel,
    expressions: &[S],
    input: &str,
    symbol: &str,
) -> Result<String, FieldMaskError> {
    let rules = check_inputs(level, expressions, input, symbol)?;
    let document: Value = serde_json::from_str(input)?;
    let masked = mask(level, &rules, &document, symbol);
    Ok(serde_json::to_string(&masked)?)
}

/// Masks a JSON array of records, each record an object.
///
/// `null` entries are dropped; every other entry is masked on its own. A
/// top-level value that is not an array is masked as a single record.
pub fn desensitize_records<S: AsRef<str>>(
    level: MaskingLevel,
    expressions: &[S],
    input: &str,
    symbol: &str,
) -> Result<String, FieldMaskError> {
    let rules = check_inputs(level, expressions, input, symbol)?;
    let records = match serde_json::from_str::<Value>(input)? {
        Value::Array(records) => records,
        single => vec![single],
    };

    let total = records.len();
    let masked: Vec<Value> = records
        .iter()
        .filter(|record| !record.is_null())
        .map(|record| mask(level, &rules, record, symbol))
        .collect();

    debug!(
        "Desensitized {} record(s); {} null record(s) dropped.",
        masked.len(),
        total - masked.len()
    );
    Ok(serde_json::to_string(&Value::Array(masked))?)
}

//! masking.rs - Applies a compiled `RuleSet` to a document.
//!
//! The walk never fails. Where a rule's kind does not fit the document (an
//! array rule over an object, a nested rule over a string, ...) the subtree is
//! left as it is and the walk continues elsewhere. Masking sits on the logging
//! path of the operation it describes and must not break that operation.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::report::{log_masked_value_debug, MaskOutcome, MaskReport, ShapeMismatch};
use crate::rules::node::{RuleKind, RuleNode, RuleSet};

/// The replacement symbol used when a caller does not provide one.
pub const DEFAULT_SYMBOL: &str = "****";

/// How much of a document to mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskingLevel {
    /// Leave the document untouched.
    #[default]
    #[serde(alias = "no")]
    None,
    /// Replace every top-level field.
    #[serde(alias = "all")]
    Full,
    /// Replace only the fields named by the rule set.
    #[serde(alias = "part")]
    Partial,
}

impl fmt::Display for MaskingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaskingLevel::None => "none",
            MaskingLevel::Full => "full",
            MaskingLevel::Partial => "partial",
        };
        f.write_str(name)
    }
}

impl FromStr for MaskingLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no" => Ok(MaskingLevel::None),
            "full" | "all" => Ok(MaskingLevel::Full),
            "partial" | "part" => Ok(MaskingLevel::Partial),
            other => Err(anyhow!("Unknown masking level '{}'", other)),
        }
    }
}

/// Masks `document` according to `level` and `rules`, returning a new document.
pub fn mask(level: MaskingLevel, rules: &RuleSet, document: &Value, symbol: &str) -> Value {
    Walker::new(symbol, None).mask_document(level, rules, document)
}

/// Like [`mask`], but also records masked paths and shape mismatches.
pub fn mask_with_report(
    level: MaskingLevel,
    rules: &RuleSet,
    document: &Value,
    symbol: &str,
) -> MaskOutcome {
    let mut report = MaskReport::default();
    let value = Walker::new(symbol, Some(&mut report)).mask_document(level, rules, document);
    debug!(
        "Masking pass finished: {} path(s) masked, {} shape mismatch(es).",
        report.masked_count(),
        report.mismatches.len()
    );
    MaskOutcome { value, report }
}

/// Masks a single value against the rule `node` (absent means no rule here).
pub fn mask_value(node: Option<&RuleNode>, value: &Value, symbol: &str) -> Value {
    let mut walker = Walker::new(symbol, None);
    let mut path = Path::default();
    walker.value(node, value, &mut path)
}

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// The position of the walk, rendered only when something is reported.
#[derive(Debug, Default)]
struct Path<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Path<'a> {
    fn push(&mut self, segment: Segment<'a>) {
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct Walker<'s, 'r> {
    symbol: &'s str,
    report: Option<&'r mut MaskReport>,
}

impl<'s, 'r> Walker<'s, 'r> {
    fn new(symbol: &'s str, report: Option<&'r mut MaskReport>) -> Self {
        Self { symbol, report }
    }

    fn mask_document(&mut self, level: MaskingLevel, rules: &RuleSet, document: &Value) -> Value {
        let mut path = Path::default();
        match level {
            MaskingLevel::None => document.clone(),
            MaskingLevel::Full => match document {
                Value::Object(fields) => {
                    let mut out = Map::with_capacity(fields.len());
                    for (key, value) in fields {
                        path.push(Segment::Key(key.as_str()));
                        out.insert(key.clone(), self.replace(value, &path));
                        path.pop();
                    }
                    Value::Object(out)
                }
                other => self.replace(other, &path),
            },
            MaskingLevel::Partial => match document {
                Value::Object(fields) => {
                    let mut out = Map::with_capacity(fields.len());
                    for (key, value) in fields {
                        path.push(Segment::Key(key.as_str()));
                        out.insert(key.clone(), self.value(rules.get(key), value, &mut path));
                        path.pop();
                    }
                    Value::Object(out)
                }
                other => {
                    debug!(
                        "Partial masking of a top-level {} leaves it unchanged.",
                        kind_name(other)
                    );
                    other.clone()
                }
            },
        }
    }

    fn value<'v>(&mut self, node: Option<&RuleNode>, value: &'v Value, path: &mut Path<'v>) -> Value {
        let node = match (node, value) {
            (_, Value::Null) => return Value::Null,
            (None, _) => return value.clone(),
            (Some(node), _) => node,
        };

        match node.kind() {
            RuleKind::Scalar if node.is_leaf() => self.replace(value, path),
            RuleKind::Scalar => match value {
                Value::Object(fields) => self.object_fields(node, fields, path),
                other => self.mismatch(other, "object", path),
            },
            RuleKind::Indexed => match value {
                Value::Array(items) => self.array(node, items, path),
                other => self.mismatch(other, "array", path),
            },
        }
    }

    /// Masks the fields of `fields` that have a child rule in `node`.
    fn object_fields<'v>(
        &mut self,
        node: &RuleNode,
        fields: &'v Map<String, Value>,
        path: &mut Path<'v>,
    ) -> Value {
        let mut out = Map::with_capacity(fields.len());
        for (key, value) in fields {
            path.push(Segment::Key(key.as_str()));
            out.insert(key.clone(), self.value(node.child(key), value, path));
            path.pop();
        }
        Value::Object(out)
    }

    fn array<'v>(&mut self, node: &RuleNode, items: &'v [Value], path: &mut Path<'v>) -> Value {
        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if !node.matches_index(idx) {
                out.push(item.clone());
                continue;
            }
            path.push(Segment::Index(idx));
            let masked = match item {
                _ if node.is_leaf() => self.replace(item, path),
                Value::Null => Value::Null,
                Value::Object(fields) => self.object_fields(node, fields, path),
                other => self.mismatch(other, "object", path),
            };
            path.pop();
            out.push(masked);
        }
        Value::Array(out)
    }

    fn replace(&mut self, original: &Value, path: &Path<'_>) -> Value {
        log_masked_value_debug(&path.to_string(), original);
        if let Some(report) = self.report.as_deref_mut() {
            report.masked_paths.push(path.to_string());
        }
        Value::String(self.symbol.to_string())
    }

    fn mismatch(&mut self, value: &Value, expected: &'static str, path: &Path<'_>) -> Value {
        let found = kind_name(value);
        debug!(
            "Rule at '{}' expects {} but document has {}; leaving it unmasked.",
            path, expected, found
        );
        if let Some(report) = self.report.as_deref_mut() {
            report.mismatches.push(ShapeMismatch {
                path: path.to_string(),
                expected,
                found,
            });
        }
        value.clone()
    }
}

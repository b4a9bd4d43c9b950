//! parser.rs - Parses one rule expression into a `RuleNode` tree.
//!
//! Supported forms:
//!
//! * `a` masks field `a`.
//! * `b.c` masks field `c` nested under `b`.
//! * `d[1,3-5]` masks elements 1, 3, 4, 5 of array `d`.
//! * `e[2].f` masks field `f` of element 2 of array `e`.
//!
//! Each call returns exactly one root node. Overlapping paths from different
//! expressions are reconciled by the merger, not here.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::errors::FieldMaskError;
use crate::rules::matcher::compile_matcher;
use crate::rules::node::RuleNode;

/// Parses `expression` into a rule tree.
///
/// Fails with `MalformedExpression` on structural errors and with
/// `MalformedIndexExpression` when a bracket token is invalid.
pub fn parse(expression: &str) -> Result<RuleNode, FieldMaskError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(malformed(expression));
    }
    let node = parse_path(trimmed, expression)?;
    debug!(
        "Parsed rule expression '{}' into {} node(s).",
        expression,
        node.node_count()
    );
    Ok(node)
}

fn malformed(expression: &str) -> FieldMaskError {
    FieldMaskError::MalformedExpression(expression.to_string())
}

/// Parses the remaining path `s`; `original` is kept for error reporting.
fn parse_path(s: &str, original: &str) -> Result<RuleNode, FieldMaskError> {
    let split = s.find(['.', '[', ']']);

    match split.map(|idx| (idx, s.as_bytes()[idx])) {
        None => Ok(RuleNode::scalar(segment(s, original)?)),
        Some((_, b']')) => Err(malformed(original)),
        Some((idx, b'.')) => {
            let parent = segment(&s[..idx], original)?;
            let rest = &s[idx + 1..];
            if rest.is_empty() {
                return Err(malformed(original));
            }
            let child = parse_path(rest, original)?;
            Ok(RuleNode::scalar(parent).with_child(child))
        }
        Some((idx, _)) => parse_bracket(s, idx, original),
    }
}

/// Parses `key[tokens]tail` where `open` is the index of `[` in `s`.
fn parse_bracket(s: &str, open: usize, original: &str) -> Result<RuleNode, FieldMaskError> {
    let key = segment(&s[..open], original)?;
    let after_open = &s[open + 1..];
    let close = after_open.find(']').ok_or_else(|| malformed(original))?;
    let interior = &after_open[..close];

    if interior.contains('[') || interior.trim().is_empty() {
        return Err(malformed(original));
    }

    let mut matchers = Vec::new();
    for token in interior.split(',') {
        if token.trim().is_empty() {
            return Err(malformed(original));
        }
        matchers.push(compile_matcher(token)?);
    }

    let node = RuleNode::indexed(key, matchers).ok_or_else(|| malformed(original))?;

    let tail = &after_open[close + 1..];
    let tail = match tail.strip_prefix('.') {
        Some("") => return Err(malformed(original)),
        Some(rest) => rest,
        None => tail,
    };
    if tail.is_empty() {
        return Ok(node);
    }
    let child = parse_path(tail, original)?;
    Ok(node.with_child(child))
}

/// Field names are non-empty and contain no whitespace or commas.
fn segment<'a>(s: &'a str, original: &str) -> Result<&'a str, FieldMaskError> {
    if s.is_empty() || s.contains(',') || s.chars().any(char::is_whitespace) {
        Err(malformed(original))
    } else {
        Ok(s)
    }
}

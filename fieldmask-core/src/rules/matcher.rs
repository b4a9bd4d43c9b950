//! matcher.rs - Compiles bracket tokens into array index predicates.
//!
//! The interior of `field[...]` is a comma-separated list of tokens. Each
//! token compiles into one [`IndexMatcher`]; an element is selected when any
//! matcher of the rule accepts its index.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::errors::FieldMaskError;

/// The matching mode of an [`IndexMatcher`], without its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherMode {
    Exact,
    Wildcard,
    Range,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

/// A compiled predicate over array indices.
///
/// Each variant carries exactly the bounds its mode needs. Serialized, a
/// matcher reads as `{"mode": "range", "left": 3, "right": 5}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IndexMatcher {
    /// `N`
    Exact { left: i64 },
    /// `*`
    Wildcard,
    /// `A-B`, inclusive on both sides.
    Range { left: i64, right: i64 },
    /// `<N`
    Less { right: i64 },
    /// `<=N`
    LessEq { right: i64 },
    /// `>N`
    Greater { left: i64 },
    /// `>=N`
    GreaterEq { left: i64 },
}

impl IndexMatcher {
    pub fn mode(&self) -> MatcherMode {
        match self {
            IndexMatcher::Exact { .. } => MatcherMode::Exact,
            IndexMatcher::Wildcard => MatcherMode::Wildcard,
            IndexMatcher::Range { .. } => MatcherMode::Range,
            IndexMatcher::Less { .. } => MatcherMode::Less,
            IndexMatcher::LessEq { .. } => MatcherMode::LessEq,
            IndexMatcher::Greater { .. } => MatcherMode::Greater,
            IndexMatcher::GreaterEq { .. } => MatcherMode::GreaterEq,
        }
    }

    /// The lower bound, for modes that have one.
    pub fn left(&self) -> Option<i64> {
        match *self {
            IndexMatcher::Exact { left }
            | IndexMatcher::Range { left, .. }
            | IndexMatcher::Greater { left }
            | IndexMatcher::GreaterEq { left } => Some(left),
            _ => None,
        }
    }

    /// The upper bound, for modes that have one.
    pub fn right(&self) -> Option<i64> {
        match *self {
            IndexMatcher::Range { right, .. }
            | IndexMatcher::Less { right }
            | IndexMatcher::LessEq { right } => Some(right),
            _ => None,
        }
    }

    /// Returns true if the element at `index` is selected by this matcher.
    pub fn matches(&self, index: usize) -> bool {
        let i = i64::try_from(index).unwrap_or(i64::MAX);
        match *self {
            IndexMatcher::Exact { left } => i == left,
            IndexMatcher::Wildcard => true,
            IndexMatcher::Range { left, right } => left <= i && i <= right,
            IndexMatcher::Less { right } => i < right,
            IndexMatcher::LessEq { right } => i <= right,
            IndexMatcher::Greater { left } => i > left,
            IndexMatcher::GreaterEq { left } => i >= left,
        }
    }
}

impl fmt::Display for IndexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexMatcher::Exact { left } => write!(f, "{}", left),
            IndexMatcher::Wildcard => write!(f, "*"),
            IndexMatcher::Range { left, right } => write!(f, "{}-{}", left, right),
            IndexMatcher::Less { right } => write!(f, "<{}", right),
            IndexMatcher::LessEq { right } => write!(f, "<={}", right),
            IndexMatcher::Greater { left } => write!(f, ">{}", left),
            IndexMatcher::GreaterEq { left } => write!(f, ">={}", left),
        }
    }
}

/// Returns true if any matcher in `matchers` selects `index`.
pub fn any_matches<'a, I>(matchers: I, index: usize) -> bool
where
    I: IntoIterator<Item = &'a IndexMatcher>,
{
    matchers.into_iter().any(|m| m.matches(index))
}

/// Compiles one bracket token into an `IndexMatcher`.
///
/// Two-character operators are tested before their one-character prefixes,
/// then an interior `-` (range), then `*`, and finally a plain integer.
pub fn compile_matcher(token: &str) -> Result<IndexMatcher, FieldMaskError> {
    let malformed = || FieldMaskError::MalformedIndexExpression(token.to_string());
    let bound = |s: &str| s.trim().parse::<i64>().map_err(|_| malformed());

    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(malformed());
    }

    let matcher = if let Some(rest) = trimmed.strip_prefix("<=") {
        IndexMatcher::LessEq { right: bound(rest)? }
    } else if let Some(rest) = trimmed.strip_prefix(">=") {
        IndexMatcher::GreaterEq { left: bound(rest)? }
    } else if let Some(rest) = trimmed.strip_prefix('<') {
        IndexMatcher::Less { right: bound(rest)? }
    } else if let Some(rest) = trimmed.strip_prefix('>') {
        IndexMatcher::Greater { left: bound(rest)? }
    } else if let Some((left, right)) = split_range(trimmed) {
        IndexMatcher::Range {
            left: bound(left)?,
            right: bound(right)?,
        }
    } else if trimmed == "*" {
        IndexMatcher::Wildcard
    } else {
        IndexMatcher::Exact { left: bound(trimmed)? }
    };

    debug!("Compiled index token '{}' into {:?}.", token, matcher);
    Ok(matcher)
}

/// Splits `A-B` at the first `-` that is not the leading sign of `A`.
fn split_range(token: &str) -> Option<(&str, &str)> {
    let idx = token.char_indices().skip(1).find(|&(_, c)| c == '-')?.0;
    Some((&token[..idx], &token[idx + 1..]))
}

//! Rule-expression compilation for fieldmask.
//!
//! A rule expression names a field to mask, for example `password`,
//! `user.address.street` or `cards[0,2-4,>=10].number`. This module turns a list
//! of such expressions into a [`RuleSet`]: each expression is parsed into a
//! [`RuleNode`] tree (with bracket tokens compiled into [`IndexMatcher`]s), and
//! trees sharing a top-level field are merged.
//!
//! This module works closely with `masking` (which walks documents against a
//! `RuleSet`) and `cache` (which memoizes compiled rule sets).

pub mod matcher;
pub mod merge;
pub mod node;
pub mod parser;

use log::debug;

use crate::errors::FieldMaskError;

pub use matcher::{compile_matcher, IndexMatcher, MatcherMode};
pub use merge::merge;
pub use node::{RuleKind, RuleNode, RuleSet};
pub use parser::parse;

/// Parses and merges `expressions` into a single `RuleSet`.
///
/// The first malformed expression aborts the whole build.
pub fn compile_rule_set<S: AsRef<str>>(expressions: &[S]) -> Result<RuleSet, FieldMaskError> {
    debug!("Starting compilation of {} rule expressions.", expressions.len());

    let nodes = expressions
        .iter()
        .map(|expr| parse(expr.as_ref()))
        .collect::<Result<Vec<RuleNode>, FieldMaskError>>()?;

    let rule_set = merge(nodes);
    debug!(
        "Finished compiling rule expressions. Top-level fields: {}.",
        rule_set.len()
    );
    Ok(rule_set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_rule_set_merges_shared_prefixes() {
        let rules = compile_rule_set(&["x.y", "x.z", "a"]).unwrap();
        assert_eq!(rules.len(), 2);
        let x = rules.get("x").unwrap();
        assert_eq!(x.children().keys().collect::<Vec<_>>(), vec!["y", "z"]);
    }

    #[test]
    fn test_compile_rule_set_fails_fast_on_bad_token() {
        let err = compile_rule_set(&["a", "d[abc]"]).unwrap_err();
        assert!(matches!(err, FieldMaskError::MalformedIndexExpression(ref t) if t == "abc"));
    }

    #[test]
    fn test_compile_rule_set_empty_list() {
        let rules = compile_rule_set::<&str>(&[]).unwrap();
        assert!(rules.is_empty());
    }
}

// fieldmask-core/src/engines/rule_engine.rs
//! A `MaskingEngine` implementation backed by a compiled rule tree.
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use anyhow::Context;
use log::debug;
use serde_json::Value;

use crate::cache::{RuleCache, RuleSetKey};
use crate::config::{Direction, MaskingPolicy, MaskingSpec};
use crate::engine::MaskingEngine;
use crate::errors::FieldMaskError;
use crate::masking::{mask, mask_with_report, MaskingLevel};
use crate::report::MaskOutcome;
use crate::rules::{compile_rule_set, RuleSet};

#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Arc<RuleSet>,
    level: MaskingLevel,
    symbol: String,
}

impl RuleEngine {
    /// Compiles `expressions` directly, without a cache.
    ///
    /// Expressions are only compiled at `Partial`; the other levels ignore them.
    pub fn new<S: AsRef<str>>(
        level: MaskingLevel,
        expressions: &[S],
        symbol: impl Into<String>,
    ) -> Result<Self, FieldMaskError> {
        let symbol = checked_symbol(symbol.into())?;
        let rules = match level {
            MaskingLevel::Partial => Arc::new(compile_rule_set(expressions)?),
            _ => Arc::new(RuleSet::new()),
        };
        Ok(Self { rules, level, symbol })
    }

    /// Builds an engine for `spec`, reusing any rule set `cache` already holds for it.
    pub fn with_cache(
        cache: &RuleCache,
        spec: &MaskingSpec,
        symbol: impl Into<String>,
    ) -> Result<Self, FieldMaskError> {
        Self::with_cache_key(cache, &spec.cache_key(), spec, symbol)
    }

    /// Like [`with_cache`](Self::with_cache), under a caller-chosen key.
    pub fn with_cache_key(
        cache: &RuleCache,
        key: &RuleSetKey,
        spec: &MaskingSpec,
        symbol: impl Into<String>,
    ) -> Result<Self, FieldMaskError> {
        let symbol = checked_symbol(symbol.into())?;
        let rules = match spec.level {
            MaskingLevel::Partial => cache.get_or_build(key, spec.fields.as_slice())?,
            _ => Arc::new(RuleSet::new()),
        };
        debug!(
            "RuleEngine ready: level '{}', {} top-level rule(s).",
            spec.level,
            rules.len()
        );
        Ok(Self {
            rules,
            level: spec.level,
            symbol,
        })
    }

    /// Builds the engine for one direction of `policy`.
    pub fn from_policy(
        policy: &MaskingPolicy,
        direction: Direction,
        cache: &RuleCache,
    ) -> anyhow::Result<Self> {
        Self::with_cache(cache, policy.spec(direction), policy.symbol.clone()).with_context(|| {
            format!(
                "Failed to build {} masking engine for policy '{}'",
                direction,
                policy.display_name()
            )
        })
    }
}

fn checked_symbol(symbol: String) -> Result<String, FieldMaskError> {
    if symbol.is_empty() {
        Err(FieldMaskError::EmptySymbol)
    } else {
        Ok(symbol)
    }
}

impl MaskingEngine for RuleEngine {
    fn mask(&self, document: &Value) -> Value {
        mask(self.level, &self.rules, document, &self.symbol)
    }

    fn mask_with_report(&self, document: &Value) -> MaskOutcome {
        mask_with_report(self.level, &self.rules, document, &self.symbol)
    }

    fn level(&self) -> MaskingLevel {
        self.level
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn rule_set(&self) -> &RuleSet {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_compiles_only_for_partial() {
        let engine = RuleEngine::new(MaskingLevel::Full, &["d[abc]"], "*").unwrap();
        assert!(engine.rule_set().is_empty());

        let err = RuleEngine::new(MaskingLevel::Partial, &["d[abc]"], "*").unwrap_err();
        assert!(matches!(err, FieldMaskError::MalformedIndexExpression(_)));
    }

    #[test]
    fn test_empty_symbol_is_rejected() {
        let err = RuleEngine::new(MaskingLevel::Full, &["a"], "").unwrap_err();
        assert!(matches!(err, FieldMaskError::EmptySymbol));
    }

    #[test]
    fn test_engines_share_cached_rules() {
        let cache = RuleCache::new();
        let spec = MaskingSpec::new(MaskingLevel::Partial, vec!["a".to_string()]);
        let first = RuleEngine::with_cache(&cache, &spec, "*").unwrap();
        let second = RuleEngine::with_cache(&cache, &spec, "#").unwrap();
        assert!(Arc::ptr_eq(&first.rules, &second.rules));
        assert_eq!(cache.compilations(), 1);

        assert_eq!(first.mask(&json!({"a": 1})), json!({"a": "*"}));
        assert_eq!(second.mask(&json!({"a": 1})), json!({"a": "#"}));
    }

    #[test]
    fn test_from_policy_selects_direction() {
        let cache = RuleCache::new();
        let policy = MaskingPolicy {
            request: MaskingSpec::new(MaskingLevel::Partial, vec!["password".to_string()]),
            response: MaskingSpec::new(MaskingLevel::Full, Vec::new()),
            ..Default::default()
        };
        let doc = json!({"user": "u", "password": "p"});

        let request = RuleEngine::from_policy(&policy, Direction::Request, &cache).unwrap();
        assert_eq!(request.mask(&doc), json!({"user": "u", "password": "****"}));

        let response = RuleEngine::from_policy(&policy, Direction::Response, &cache).unwrap();
        assert_eq!(response.mask(&doc), json!({"user": "****", "password": "****"}));
    }

    #[test]
    fn test_mask_str() {
        let engine = RuleEngine::new(MaskingLevel::Partial, &["b.c"], "***").unwrap();
        assert_eq!(
            engine.mask_str(r#"{"b":{"c":2,"e":3}}"#).unwrap(),
            r#"{"b":{"c":"***","e":3}}"#
        );
        assert!(matches!(engine.mask_str("  "), Err(FieldMaskError::EmptyInput)));
        assert!(matches!(engine.mask_str("{not json"), Err(FieldMaskError::Json(_))));
    }
}

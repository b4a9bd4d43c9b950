//! Configuration management for `fieldmask-core`.
//!
//! This module defines masking policies: the replacement symbol plus a
//! masking level and a list of rule expressions for each direction of a call
//! (request and response). It handles YAML deserialization and provides
//! utilities for locating, loading and validating policy files.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cache::RuleSetKey;
use crate::masking::{MaskingLevel, DEFAULT_SYMBOL};
use crate::rules::compile_rule_set;

/// Which side of an intercepted call a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Request,
    Response,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Request => f.write_str("request"),
            Direction::Response => f.write_str("response"),
        }
    }
}

/// Masking level plus the rule expressions that apply at `Partial`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MaskingSpec {
    pub level: MaskingLevel,
    /// Rule expressions such as `"a"`, `"b.c"`, `"d[1,3-5]"`, `"e[2].f"`.
    pub fields: Vec<String>,
}

impl MaskingSpec {
    pub fn new(level: MaskingLevel, fields: Vec<String>) -> Self {
        Self { level, fields }
    }

    /// Cache identity of this spec's rule expressions.
    pub fn cache_key(&self) -> RuleSetKey {
        RuleSetKey::from_expressions(self.fields.as_slice())
    }
}

/// A named masking policy, usually loaded from YAML.
///
/// ```yaml
/// name: payments
/// symbol: "****"
/// request:
///   level: partial
///   fields: ["card.number", "card.cvv"]
/// response:
///   level: full
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MaskingPolicy {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replacement for masked values.
    pub symbol: String,
    pub request: MaskingSpec,
    pub response: MaskingSpec,
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            symbol: DEFAULT_SYMBOL.to_string(),
            request: MaskingSpec::default(),
            response: MaskingSpec::default(),
        }
    }
}

impl MaskingPolicy {
    /// Loads and validates a policy from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading masking policy from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;
        let policy = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to load policy file {}", path.display()))?;
        info!(
            "Loaded policy '{}' from file {}.",
            policy.display_name(),
            path.display()
        );
        Ok(policy)
    }

    /// Parses and validates a policy from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let policy: MaskingPolicy =
            serde_yml::from_str(text).context("Failed to parse masking policy YAML")?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn spec(&self, direction: Direction) -> &MaskingSpec {
        match direction {
            Direction::Request => &self.request,
            Direction::Response => &self.response,
        }
    }

    pub fn spec_mut(&mut self, direction: Direction) -> &mut MaskingSpec {
        match direction {
            Direction::Request => &mut self.request,
            Direction::Response => &mut self.response,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Checks the symbol and compiles every rule expression, so a bad rule is
    /// reported while loading rather than when the first document arrives.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.symbol.is_empty() {
            errors.push("The `symbol` field cannot be empty.".to_string());
        }

        for direction in [Direction::Request, Direction::Response] {
            let spec = self.spec(direction);
            match spec.level {
                MaskingLevel::Partial if spec.fields.is_empty() => warn!(
                    "Policy '{}': {} level is 'partial' but no fields are listed. Nothing will be masked.",
                    self.display_name(),
                    direction
                ),
                MaskingLevel::Partial => {
                    if let Err(e) = compile_rule_set(spec.fields.as_slice()) {
                        errors.push(format!("{} rules: {}", direction, e));
                    }
                }
                MaskingLevel::None | MaskingLevel::Full if !spec.fields.is_empty() => debug!(
                    "Policy '{}': {} fields are ignored at level '{}'.",
                    self.display_name(),
                    direction,
                    spec.level
                ),
                _ => {}
            }
        }

        if !errors.is_empty() {
            let full_error_message = format!(
                "Policy '{}' validation failed:\n{}",
                self.display_name(),
                errors.join("\n")
            );
            Err(anyhow!(full_error_message))
        } else {
            Ok(())
        }
    }
}

/// Locations searched for a policy named `name`, most specific first.
pub fn policy_candidate_paths(name: &str) -> Vec<PathBuf> {
    let file_name = format!("{}.yaml", name);
    let base_dirs = vec![
        dirs::home_dir().map(|p| p.join(".fieldmask").join("policies")),
        dirs::config_dir().map(|p| p.join("fieldmask").join("policies")),
        Some(PathBuf::from("/etc/fieldmask/policies")),
        Some(PathBuf::from("./config")),
    ];
    base_dirs
        .into_iter()
        .flatten()
        .map(|dir| dir.join(&file_name))
        .collect()
}

/// Loads the first policy named `name` found in [`policy_candidate_paths`].
pub fn load_policy_by_name(name: &str) -> Result<MaskingPolicy> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        bail!("Invalid policy name '{}'.", name);
    }
    for candidate in policy_candidate_paths(name) {
        if candidate.is_file() {
            debug!("Found policy '{}' at: {}", name, candidate.display());
            return MaskingPolicy::load_from_file(&candidate);
        }
        debug!("Policy candidate not found: {}", candidate.display());
    }
    bail!("Policy '{}' not found in any of the policy directories.", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_masks_nothing() {
        let policy = MaskingPolicy::default();
        assert_eq!(policy.symbol, "****");
        assert_eq!(policy.request.level, MaskingLevel::None);
        assert_eq!(policy.response.level, MaskingLevel::None);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_str_fills_defaults() {
        let policy = MaskingPolicy::from_yaml_str(
            r#"
request:
  level: partial
  fields: ["password", "card[*].number"]
"#,
        )
        .unwrap();
        assert_eq!(policy.symbol, "****");
        assert_eq!(policy.request.fields.len(), 2);
        assert_eq!(policy.spec(Direction::Response), &MaskingSpec::default());
    }

    #[test]
    fn test_original_level_names_are_accepted() {
        let policy = MaskingPolicy::from_yaml_str(
            "request:\n  level: part\n  fields: [a]\nresponse:\n  level: all\n",
        )
        .unwrap();
        assert_eq!(policy.request.level, MaskingLevel::Partial);
        assert_eq!(policy.response.level, MaskingLevel::Full);
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let policy = MaskingPolicy {
            symbol: String::new(),
            request: MaskingSpec::new(MaskingLevel::Partial, vec!["d[abc]".to_string()]),
            response: MaskingSpec::new(MaskingLevel::Partial, vec!["a..b".to_string()]),
            ..Default::default()
        };
        let message = policy.validate().unwrap_err().to_string();
        assert!(message.contains("symbol"));
        assert!(message.contains("request rules: Malformed index expression 'abc'"));
        assert!(message.contains("response rules: Malformed rule expression 'a..b'"));
    }

    #[test]
    fn test_fields_outside_partial_are_not_compiled() {
        let policy = MaskingPolicy {
            request: MaskingSpec::new(MaskingLevel::Full, vec!["d[abc]".to_string()]),
            response: MaskingSpec::new(MaskingLevel::None, vec!["a..b".to_string()]),
            ..Default::default()
        };
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_invalid_policy_names_are_rejected() {
        assert!(load_policy_by_name("../etc/passwd").is_err());
        assert!(load_policy_by_name("").is_err());
    }

    #[test]
    fn test_candidate_paths_end_with_file_name() {
        let paths = policy_candidate_paths("payments");
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.ends_with("payments.yaml")));
    }

    #[test]
    fn test_cache_key_tracks_fields() {
        let a = MaskingSpec::new(MaskingLevel::Partial, vec!["a".to_string()]);
        let b = MaskingSpec::new(MaskingLevel::Full, vec!["a".to_string()]);
        assert_eq!(a.cache_key(), b.cache_key());
    }
}

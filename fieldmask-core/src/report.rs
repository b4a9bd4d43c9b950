// fieldmask-core/src/report.rs
//! Provides data structures for reporting what a masking pass did, and helpers
//! for keeping original values out of debug logs.

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use log::debug;

use crate::errors::FieldMaskError;

/// Initialized once to determine if original values may appear in debug logs.
static PII_DEBUG_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("FIELDMASK_ALLOW_DEBUG_PII")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

/// A position where a rule's kind did not fit the document's shape.
/// The subtree at `path` was left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeMismatch {
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl From<ShapeMismatch> for FieldMaskError {
    fn from(m: ShapeMismatch) -> Self {
        FieldMaskError::ShapeMismatch {
            path: m.path,
            expected: m.expected,
            found: m.found,
        }
    }
}

/// Record of one masking pass: which paths were replaced and which rules
/// could not be applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaskReport {
    pub masked_paths: Vec<String>,
    pub mismatches: Vec<ShapeMismatch>,
}

impl MaskReport {
    pub fn masked_count(&self) -> usize {
        self.masked_paths.len()
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// A masked document together with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskOutcome {
    pub value: Value,
    pub report: MaskReport,
}

impl MaskOutcome {
    /// Returns the masked value, or the first shape mismatch as an error.
    pub fn into_strict(self) -> Result<Value, FieldMaskError> {
        match self.report.mismatches.into_iter().next() {
            Some(mismatch) => Err(mismatch.into()),
            None => Ok(self.value),
        }
    }
}

/// Replaces sensitive content with a length hint.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(original: &Value) -> String {
    let rendered = original.to_string();
    if *PII_DEBUG_ALLOWED {
        rendered
    } else {
        redact_sensitive(&rendered)
    }
}

/// Logs a single masked position at debug level.
pub fn log_masked_value_debug(path: &str, original: &Value) {
    if log::log_enabled!(log::Level::Debug) {
        debug!(
            target: "fieldmask_core::masking",
            "Masked '{}' (original: {})",
            path,
            get_loggable_content(original)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_sensitive_hides_content() {
        assert_eq!(redact_sensitive("short"), "[REDACTED]");
        assert_eq!(redact_sensitive("a much longer secret"), "[REDACTED: 20 chars]");
    }

    #[test]
    fn test_into_strict_passes_clean_outcome() {
        let outcome = MaskOutcome {
            value: json!({"a": "***"}),
            report: MaskReport {
                masked_paths: vec!["a".to_string()],
                mismatches: Vec::new(),
            },
        };
        assert!(outcome.report.is_clean());
        assert_eq!(outcome.into_strict().unwrap(), json!({"a": "***"}));
    }

    #[test]
    fn test_into_strict_reports_first_mismatch() {
        let outcome = MaskOutcome {
            value: json!({"d": 1}),
            report: MaskReport {
                masked_paths: Vec::new(),
                mismatches: vec![ShapeMismatch {
                    path: "d".to_string(),
                    expected: "array",
                    found: "number",
                }],
            },
        };
        match outcome.into_strict() {
            Err(FieldMaskError::ShapeMismatch { path, expected, found }) => {
                assert_eq!(path, "d");
                assert_eq!(expected, "array");
                assert_eq!(found, "number");
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }
}

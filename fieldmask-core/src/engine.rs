// fieldmask-core/src/engine.rs
//! Defines the core MaskingEngine trait.
//!
//! The `MaskingEngine` trait decouples callers (an interception layer, the
//! CLI) from how a masking configuration is compiled and applied. An engine
//! is bound to one masking level, one replacement symbol and one compiled
//! rule set, and can be shared across threads.
//!
//! License: MIT OR APACHE 2.0

use serde_json::Value;

use crate::errors::FieldMaskError;
use crate::masking::MaskingLevel;
use crate::report::MaskOutcome;
use crate::rules::RuleSet;

/// A trait that defines the core functionality of a masking engine.
pub trait MaskingEngine: Send + Sync {
    /// Returns a masked copy of `document`. Never fails.
    fn mask(&self, document: &Value) -> Value;

    /// Masks `document` and reports masked paths and shape mismatches.
    fn mask_with_report(&self, document: &Value) -> MaskOutcome;

    /// Parses `input` as JSON, masks it and serializes the result.
    fn mask_str(&self, input: &str) -> Result<String, FieldMaskError> {
        if input.trim().is_empty() {
            return Err(FieldMaskError::EmptyInput);
        }
        let document: Value = serde_json::from_str(input)?;
        Ok(serde_json::to_string(&self.mask(&document))?)
    }

    fn level(&self) -> MaskingLevel;

    fn symbol(&self) -> &str;

    /// Returns a reference to the compiled rules used by the engine.
    fn rule_set(&self) -> &RuleSet;
}

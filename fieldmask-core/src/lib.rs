// fieldmask-core/src/lib.rs
//! # fieldmask Core Library
//!
//! `fieldmask-core` redacts sensitive fields from structured request/response
//! documents before they are logged or persisted. It defines a small rule
//! expression language for naming fields, compiles expressions into rule
//! trees, and applies them to `serde_json::Value` documents.
//!
//! The library is pure: it never decides *when* to mask and never writes the
//! masked record anywhere. Callers supply a masking level, rule expressions,
//! a document and a replacement symbol, and receive back a masked document.
//!
//! ## Modules
//!
//! * `rules`: Parses rule expressions (`a`, `b.c`, `d[1,3-5]`, `e[2].f`) and merges them into a `RuleSet`.
//! * `masking`: Walks a document against a `RuleSet` and a `MaskingLevel`.
//! * `cache`: `RuleCache`, a build-once cache of compiled rule sets.
//! * `config`: `MaskingPolicy` for loading symbol, levels and fields from YAML.
//! * `engine`: Defines the `MaskingEngine` trait.
//! * `engines`: Contains concrete implementations of the `MaskingEngine` trait.
//! * `report`: Records which paths a masking pass replaced or skipped.
//! * `headless`: Convenience wrappers for one-shot masking of JSON text.
//! * `errors`: The `FieldMaskError` enum.
//!
//! ## Rule expressions
//!
//! | expression | masks |
//! |---|---|
//! | `a` | field `a` |
//! | `b.c` | field `c` inside `b` |
//! | `d[1,3-5]` | elements 1, 3, 4 and 5 of array `d` |
//! | `d[*]`, `d[<5]`, `d[<=5]`, `d[>5]`, `d[>=5]` | elements selected by the operator |
//! | `e[2].f` | field `f` of element 2 of array `e` |
//!
//! ## Usage Example
//!
//! ```rust
//! use fieldmask_core::{mask, compile_rule_set, MaskingLevel};
//! use serde_json::json;
//!
//! let rules = compile_rule_set(&["a", "b.c", "d[1,3-5]"])?;
//! let document = json!({"a": 1, "b": {"c": 2, "e": 3}, "d": [10, 20, 30, 40, 50, 60]});
//!
//! let masked = mask(MaskingLevel::Partial, &rules, &document, "***");
//! assert_eq!(
//!     masked,
//!     json!({"a": "***", "b": {"c": "***", "e": 3}, "d": [10, "***", 30, "***", "***", "***"]})
//! );
//! # Ok::<(), fieldmask_core::FieldMaskError>(())
//! ```
//!
//! ## Error Handling
//!
//! Malformed rules are configuration errors: they surface as `FieldMaskError`
//! while a `RuleSet` is built, before any document is processed. Masking
//! itself never fails; rules that do not fit a document's shape leave that
//! part of the document untouched.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod cache;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod masking;
pub mod report;
pub mod rules;

/// Re-exports the rule compiler types and entry points.
pub use rules::{
    compile_matcher,
    compile_rule_set,
    merge,
    parse,
    IndexMatcher,
    MatcherMode,
    RuleKind,
    RuleNode,
    RuleSet,
};

/// Re-exports the masking entry points.
pub use masking::{mask, mask_value, mask_with_report, MaskingLevel, DEFAULT_SYMBOL};

/// Re-exports the rule cache.
pub use cache::{RuleCache, RuleSetKey};

/// Re-exports the policy configuration types and functions.
pub use config::{load_policy_by_name, policy_candidate_paths, Direction, MaskingPolicy, MaskingSpec};

/// Re-exports the custom error type for clear error reporting.
pub use errors::FieldMaskError;

/// Re-exports types related to the masking engine trait.
pub use engine::MaskingEngine;
pub use engines::rule_engine::RuleEngine;

/// Re-exports types for masking reports.
pub use report::{MaskOutcome, MaskReport, ShapeMismatch};

/// Re-exports types and functions for one-shot use.
pub use headless::{desensitize_records, mask_json_str};

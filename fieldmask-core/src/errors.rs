//! errors.rs - Custom error types for the fieldmask-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `fieldmask-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FieldMaskError {
    /// A rule expression is structurally invalid (unmatched brackets, empty segments, ...).
    #[error("Malformed rule expression '{0}'")]
    MalformedExpression(String),

    /// A bracket token is none of the supported index forms, or its bound is not an integer.
    #[error("Malformed index expression '{0}'")]
    MalformedIndexExpression(String),

    /// A rule's kind does not match the document's shape at `path`.
    #[error("Shape mismatch at '{path}': rule expects {expected}, document has {found}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Input document is empty")]
    EmptyInput,

    #[error("Replacement symbol is empty")]
    EmptySymbol,

    #[error("Partial masking requested but no rule expressions were given")]
    EmptyRules,

    #[error("Failed to process JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

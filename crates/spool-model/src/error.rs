//! Error types for the report model.

use thiserror::Error;

use crate::numeric::NumericTag;

/// A structurally valid but semantically invalid definition.
///
/// Raised while building fields and numeric formats; always fatal to report
/// loading.
#[derive(Debug, Error)]
pub enum FieldDefinitionError {
    /// Extracted field starting before the first column.
    #[error("column {index}: left bound (left={left}) is lower than 0")]
    NegativeLeftBound { index: usize, left: i64 },

    /// Extracted field whose right bound precedes its left bound.
    #[error("column {index}: right bound (right={right}) is lower than left bound (left={left})")]
    InvertedRange { index: usize, left: i64, right: i64 },

    /// `empty` field with a repeat count below one.
    #[error("column {index}: empty field repeat count must be at least 1, got {count}")]
    InvalidRepeat { index: usize, count: i64 },

    /// Numeric format declared with the same thousands and decimal separator.
    #[error("decimal separator '{separator}' is the same as the thousands separator")]
    SeparatorConflict { separator: char },

    /// Numeric format whose validation pattern does not compile.
    #[error("invalid numeric pattern \"{pattern}\": {source}")]
    InvalidNumericPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Extracted text that does not follow its declared numeric format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value \"{value}\" of format {tag} {}", describe(.reason, .pattern))]
pub struct FormatMismatch {
    pub value: String,
    pub tag: NumericTag,
    pub pattern: String,
    pub reason: MismatchReason,
}

/// Why a numeric conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// The text does not fully match the format pattern.
    Pattern,
    /// The text matches but the integer does not fit in `i64`.
    OutOfRange,
}

fn describe(reason: &MismatchReason, pattern: &str) -> String {
    match reason {
        MismatchReason::Pattern => format!("does not match pattern {pattern}"),
        MismatchReason::OutOfRange => "is out of range for i64".to_string(),
    }
}

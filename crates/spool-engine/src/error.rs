//! Report loading and processing errors.

use std::path::{Path, PathBuf};

use thiserror::Error;

use spool_grammar::SyntaxError;
use spool_model::{FieldDefinitionError, FieldsetRole, FormatMismatch};

/// Failure while loading a report definition or processing a listing.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The definition (or one of its formulas) does not follow the grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A field that parses but cannot be built.
    #[error("section {section}, {role} fieldset {fieldset} (line {line}): {source}")]
    FieldDefinition {
        section: usize,
        role: FieldsetRole,
        fieldset: usize,
        line: usize,
        #[source]
        source: FieldDefinitionError,
    },

    /// An include or exclude filter that is not a valid regular expression.
    #[error("invalid filter pattern \"{pattern}\"")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Extracted text that does not follow its numeric format.
    #[error("{}line {line_number}, field {field}: {source}", location(.path.as_deref()))]
    FormatMismatch {
        path: Option<PathBuf>,
        line_number: usize,
        field: String,
        #[source]
        source: FormatMismatch,
    },

    /// Reading the definition or a listing failed.
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Attaches the listing path to errors raised while processing lines.
    #[must_use]
    pub fn with_path(self, listing: Option<&Path>) -> Self {
        match self {
            ReportError::FormatMismatch {
                path: None,
                line_number,
                field,
                source,
            } => ReportError::FormatMismatch {
                path: listing.map(Path::to_path_buf),
                line_number,
                field,
                source,
            },
            other => other,
        }
    }

    /// Line of the listing that caused the error, if any.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ReportError::FormatMismatch { line_number, .. } => Some(*line_number),
            _ => None,
        }
    }
}

fn location(path: Option<&Path>) -> String {
    path.map(|path| format!("{}: ", path.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spool_model::{MismatchReason, NumericTag};

    fn mismatch() -> ReportError {
        ReportError::FormatMismatch {
            path: None,
            line_number: 7,
            field: "amount".to_string(),
            source: FormatMismatch {
                value: "12a".to_string(),
                tag: NumericTag::Integer,
                pattern: "-?[0-9]+".to_string(),
                reason: MismatchReason::Pattern,
            },
        }
    }

    #[test]
    fn format_mismatch_names_line_and_field() {
        assert_eq!(mismatch().to_string(), "line 7, field amount: value \"12a\" of format integer does not match pattern -?[0-9]+");
    }

    #[test]
    fn with_path_prefixes_listing() {
        let err = mismatch().with_path(Some(Path::new("in/list.txt")));
        assert!(err.to_string().starts_with("in/list.txt: line 7, field amount"));
        assert_eq!(err.line_number(), Some(7));
    }
}

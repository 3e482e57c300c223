//! Syntax errors with source positions.

use std::fmt;

use thiserror::Error;

/// Which grammar rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// Report definition (including its style block).
    Config,
    /// Spreadsheet formula.
    Formula,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyntaxKind::Config => "report definition",
            SyntaxKind::Formula => "formula",
        })
    }
}

/// Input that does not follow a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub kind: SyntaxKind,
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column (in characters) of the failure.
    pub column: usize,
    pub message: String,
    /// Source line containing the failure.
    pub snippet: String,
}

impl SyntaxError {
    /// Error at byte `offset` of `source`.
    pub(crate) fn at(kind: SyntaxKind, source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = position(source, offset);
        let snippet = source
            .lines()
            .nth(line - 1)
            .unwrap_or_default()
            .to_string();
        Self {
            kind,
            line,
            column,
            message: message.into(),
            snippet,
        }
    }

    /// The offending line with a caret under the failing column.
    pub fn pointer(&self) -> String {
        let pad: String = self
            .snippet
            .chars()
            .take(self.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        format!("{}\n{pad}^", self.snippet)
    }
}

/// 1-based `(line, column)` of byte `offset`; columns count characters.
pub(crate) fn position(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |current| current.chars().count())
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let source = "title x\nsection\n  bödy";
        assert_eq!(position(source, 0), (1, 1));
        assert_eq!(position(source, 8), (2, 1));
        assert_eq!(position(source, source.len()), (3, 7));
    }

    #[test]
    fn pointer_marks_column() {
        let err = SyntaxError::at(SyntaxKind::Formula, "=SUM(A1,", 8, "expected argument");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 9);
        assert_eq!(err.pointer(), "=SUM(A1,\n        ^");
        assert_eq!(
            err.to_string(),
            "formula syntax error at line 1, column 9: expected argument"
        );
    }
}

//! Line filters.

use std::fmt;

use regex::Regex;

/// A pattern tested against raw input lines, anchored at the line start.
#[derive(Debug, Clone)]
pub struct LineFilter {
    pattern: String,
    regex: Regex,
}

impl LineFilter {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the regex error when the pattern is invalid.
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self { pattern, regex })
    }

    /// Pattern as written in the report definition.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

impl fmt::Display for LineFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.pattern)
    }
}

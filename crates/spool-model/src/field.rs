//! Field definitions.
//!
//! A field is either *extracted* (its value is sliced from the input line)
//! or *special* (its value is synthesized: a constant, a formula or blank
//! padding). [`FieldKind`] carries exactly the payload each variant needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldDefinitionError, FormatMismatch};
use crate::grid::CellValue;
use crate::numeric::{self, Number, NumericTag};

/// Field type tag as written in report definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Function,
    Empty,
    Const,
    String,
    Fixed,
    Numeric(NumericTag),
}

impl FieldType {
    /// Keyword used in report definitions.
    pub fn keyword(self) -> &'static str {
        match self {
            FieldType::Function => "function",
            FieldType::Empty => "empty",
            FieldType::Const => "const",
            FieldType::String => "string",
            FieldType::Fixed => "fixed",
            FieldType::Numeric(tag) => tag.keyword(),
        }
    }

    /// Case-insensitive lookup by keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let lower = keyword.to_ascii_lowercase();
        match lower.as_str() {
            "function" => Some(FieldType::Function),
            "empty" => Some(FieldType::Empty),
            "const" => Some(FieldType::Const),
            "string" => Some(FieldType::String),
            "fixed" => Some(FieldType::Fixed),
            other => NumericTag::from_keyword(other).map(FieldType::Numeric),
        }
    }

    /// Synthesized rather than read from the input line.
    pub fn is_special(self) -> bool {
        matches!(self, FieldType::Function | FieldType::Empty | FieldType::Const)
    }

    pub fn is_extracted(self) -> bool {
        !self.is_special()
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Numeric(_))
    }

    /// Holds a spreadsheet formula.
    pub fn is_calculated(self) -> bool {
        matches!(self, FieldType::Function)
    }

    /// Extracted text is trimmed (and converted) before it is stored.
    pub fn needs_transform(self) -> bool {
        matches!(self, FieldType::String | FieldType::Numeric(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How extracted text becomes a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Trimmed text.
    String,
    /// Text kept verbatim, surrounding whitespace included.
    Fixed,
    /// Trimmed text converted through the numeric registry.
    Numeric(NumericTag),
}

impl Extraction {
    pub fn field_type(self) -> FieldType {
        match self {
            Extraction::String => FieldType::String,
            Extraction::Fixed => FieldType::Fixed,
            Extraction::Numeric(tag) => FieldType::Numeric(tag),
        }
    }

    /// Turns the raw slice of a line into the stored value.
    ///
    /// # Errors
    ///
    /// Numeric extractions fail with [`FormatMismatch`] when the trimmed text
    /// does not follow the declared format.
    pub fn transform(self, raw: &str) -> Result<CellValue, FormatMismatch> {
        match self {
            Extraction::String => Ok(CellValue::Text(raw.trim().to_string())),
            Extraction::Fixed => Ok(CellValue::Text(raw.to_string())),
            Extraction::Numeric(tag) => numeric::to_number(tag, raw.trim()).map(CellValue::Number),
        }
    }
}

/// Half-open character range `[left, right)` of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    left: usize,
    right: usize,
}

impl ColumnRange {
    /// Validates raw bounds for the field at `index`.
    ///
    /// # Errors
    ///
    /// Fails when `left < 0` or `right < left`.
    pub fn new(index: usize, left: i64, right: i64) -> Result<Self, FieldDefinitionError> {
        if left < 0 {
            return Err(FieldDefinitionError::NegativeLeftBound { index, left });
        }
        if right < left {
            return Err(FieldDefinitionError::InvertedRange { index, left, right });
        }
        Ok(Self {
            left: left as usize,
            right: right as usize,
        })
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    /// Slices `line` by character position.
    ///
    /// Bounds past the end of the line are clamped, so a short line yields a
    /// shorter or empty slice.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let start = char_offset(line, self.left);
        let end = char_offset(line, self.right);
        &line[start..end]
    }
}

fn char_offset(line: &str, chars: usize) -> usize {
    line.char_indices()
        .nth(chars)
        .map_or(line.len(), |(offset, _)| offset)
}

/// Literal payload of a `const` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Text(String),
    Number(Number),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Text(text) => write!(f, "\"{text}\""),
            ConstValue::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Type-specific payload of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Extracted {
        extraction: Extraction,
        range: ColumnRange,
    },
    Empty {
        repeat: usize,
    },
    Const(ConstValue),
    /// Normalized formula text.
    Function(String),
}

/// One field of a fieldset.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    index: usize,
    kind: FieldKind,
    name: Option<String>,
    style_id: Option<String>,
}

impl Field {
    /// Field reading `[left, right)` of each matching line.
    ///
    /// # Errors
    ///
    /// Fails when the bounds are invalid.
    pub fn extracted(
        index: usize,
        extraction: Extraction,
        left: i64,
        right: i64,
    ) -> Result<Self, FieldDefinitionError> {
        let range = ColumnRange::new(index, left, right)?;
        Ok(Self::with_kind(index, FieldKind::Extracted { extraction, range }))
    }

    /// `repeat` blank cells.
    ///
    /// # Errors
    ///
    /// Fails when `repeat < 1`.
    pub fn empty(index: usize, repeat: i64) -> Result<Self, FieldDefinitionError> {
        if repeat < 1 {
            return Err(FieldDefinitionError::InvalidRepeat {
                index,
                count: repeat,
            });
        }
        Ok(Self::with_kind(
            index,
            FieldKind::Empty {
                repeat: repeat as usize,
            },
        ))
    }

    pub fn constant(index: usize, value: ConstValue) -> Self {
        Self::with_kind(index, FieldKind::Const(value))
    }

    pub fn function(index: usize, formula: impl Into<String>) -> Self {
        Self::with_kind(index, FieldKind::Function(formula.into()))
    }

    fn with_kind(index: usize, kind: FieldKind) -> Self {
        Self {
            index,
            kind,
            name: None,
            style_id: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style_id: Option<String>) -> Self {
        self.style_id = style_id;
        self
    }

    /// Position within the owning fieldset.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn style_id(&self) -> Option<&str> {
        self.style_id.as_deref()
    }

    pub fn field_type(&self) -> FieldType {
        match &self.kind {
            FieldKind::Extracted { extraction, .. } => extraction.field_type(),
            FieldKind::Empty { .. } => FieldType::Empty,
            FieldKind::Const(_) => FieldType::Const,
            FieldKind::Function(_) => FieldType::Function,
        }
    }

    pub fn is_special(&self) -> bool {
        self.field_type().is_special()
    }

    pub fn is_extracted(&self) -> bool {
        self.field_type().is_extracted()
    }

    pub fn is_numeric(&self) -> bool {
        self.field_type().is_numeric()
    }

    pub fn is_calculated(&self) -> bool {
        self.field_type().is_calculated()
    }

    /// Column range of an extracted field.
    pub fn range(&self) -> Option<ColumnRange> {
        match &self.kind {
            FieldKind::Extracted { range, .. } => Some(*range),
            _ => None,
        }
    }

    /// Number of cells this field produces.
    pub fn width(&self) -> usize {
        match &self.kind {
            FieldKind::Empty { repeat } => *repeat,
            _ => 1,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_type())?;
        match &self.kind {
            FieldKind::Extracted { range, .. } => write!(f, " {} {}", range.left, range.right)?,
            FieldKind::Empty { repeat } => write!(f, " {repeat}")?,
            FieldKind::Const(value) => write!(f, " {value}")?,
            FieldKind::Function(formula) => write!(f, " {formula}")?,
        }
        if let Some(name) = &self.name {
            write!(f, " as {name}")?;
        }
        if let Some(style_id) = &self.style_id {
            write!(f, " :{style_id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_by_character() {
        let range = ColumnRange::new(0, 2, 5).unwrap();
        assert_eq!(range.slice("añoXYZ"), "oXY");
        assert_eq!(range.slice("ab"), "");
        assert_eq!(range.slice("abcd"), "cd");
    }

    #[test]
    fn fixed_keeps_whitespace() {
        let value = Extraction::Fixed.transform("  a ").unwrap();
        assert_eq!(value, CellValue::Text("  a ".to_string()));
        let value = Extraction::String.transform("  a ").unwrap();
        assert_eq!(value, CellValue::Text("a".to_string()));
    }

    #[test]
    fn classifies_types() {
        assert!(FieldType::Const.is_special());
        assert!(FieldType::Fixed.is_extracted());
        assert!(!FieldType::Fixed.needs_transform());
        assert!(FieldType::Numeric(NumericTag::Float).needs_transform());
        assert_eq!(
            FieldType::from_keyword("DecimalDC"),
            Some(FieldType::Numeric(NumericTag::DecimalDC))
        );
    }

    #[test]
    fn displays_definition() {
        let field = Field::extracted(0, Extraction::String, 0, 10)
            .unwrap()
            .with_name(Some("code".into()))
            .with_style(Some("bold".into()));
        assert_eq!(field.to_string(), "string 0 10 as code :bold");
    }
}

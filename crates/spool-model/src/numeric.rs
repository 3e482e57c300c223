//! Locale-aware numeric formats.
//!
//! Listings print numbers with different thousands and decimal separators.
//! Each numeric field type names one [`NumericFormat`], which validates the
//! extracted text and converts it into a [`Number`] of the declared kind.
//!
//! | tag         | thousands | decimal | kind    |
//! |-------------|-----------|---------|---------|
//! | `integer`   |           |         | integer |
//! | `integerc`  | `,`       |         | integer |
//! | `integerd`  | `.`       |         | integer |
//! | `float`     |           | `.`     | float   |
//! | `floatc`    |           | `,`     | float   |
//! | `floatcd`   | `,`       | `.`     | float   |
//! | `floatdc`   | `.`       | `,`     | float   |
//! | `decimal`   |           | `.`     | decimal |
//! | `decimalc`  |           | `,`     | decimal |
//! | `decimalcd` | `,`       | `.`     | decimal |
//! | `decimaldc` | `.`       | `,`     | decimal |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FieldDefinitionError, FormatMismatch, MismatchReason};

/// Canonical decimal point used before parsing.
pub const DEFAULT_DECIMAL_SEPARATOR: char = '.';

// ASCII digits only; `\d` would also accept other Unicode digits that the
// parsers reject.
const INTEGER: &str = r"-?[0-9]+";
const INTEGER_COMMA: &str = r"-?[0-9]{1,3}(?:,[0-9]{3})*";
const INTEGER_DOT: &str = r"-?[0-9]{1,3}(?:\.[0-9]{3})*";
const FLOAT_DOT: &str = r"-?[0-9]+(?:\.[0-9]+)?";
const FLOAT_COMMA: &str = r"-?[0-9]+(?:,[0-9]+)?";
const FLOAT_COMMA_DOT: &str = r"-?[0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]+)?";
const FLOAT_DOT_COMMA: &str = r"-?[0-9]{1,3}(?:\.[0-9]{3})*(?:,[0-9]+)?";

/// Numeric field type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericTag {
    Integer,
    IntegerC,
    IntegerD,
    Float,
    FloatC,
    FloatCD,
    FloatDC,
    Decimal,
    DecimalC,
    DecimalCD,
    DecimalDC,
}

impl NumericTag {
    pub const ALL: [NumericTag; 11] = [
        NumericTag::Integer,
        NumericTag::IntegerC,
        NumericTag::IntegerD,
        NumericTag::Float,
        NumericTag::FloatC,
        NumericTag::FloatCD,
        NumericTag::FloatDC,
        NumericTag::Decimal,
        NumericTag::DecimalC,
        NumericTag::DecimalCD,
        NumericTag::DecimalDC,
    ];

    /// Keyword used for this tag in report definitions.
    pub fn keyword(self) -> &'static str {
        match self {
            NumericTag::Integer => "integer",
            NumericTag::IntegerC => "integerc",
            NumericTag::IntegerD => "integerd",
            NumericTag::Float => "float",
            NumericTag::FloatC => "floatc",
            NumericTag::FloatCD => "floatcd",
            NumericTag::FloatDC => "floatdc",
            NumericTag::Decimal => "decimal",
            NumericTag::DecimalC => "decimalc",
            NumericTag::DecimalCD => "decimalcd",
            NumericTag::DecimalDC => "decimaldc",
        }
    }

    /// Case-insensitive lookup by keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Number kind produced by this tag.
    pub fn kind(self) -> NumericKind {
        match self {
            NumericTag::Integer | NumericTag::IntegerC | NumericTag::IntegerD => {
                NumericKind::Integer
            }
            NumericTag::Float | NumericTag::FloatC | NumericTag::FloatCD | NumericTag::FloatDC => {
                NumericKind::Float
            }
            NumericTag::Decimal
            | NumericTag::DecimalC
            | NumericTag::DecimalCD
            | NumericTag::DecimalDC => NumericKind::Decimal,
        }
    }
}

impl fmt::Display for NumericTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Target representation of a converted number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    Integer,
    Float,
    Decimal,
}

impl NumericKind {
    /// Value returned for empty input.
    pub fn zero(self) -> Number {
        match self {
            NumericKind::Integer => Number::Integer(0),
            NumericKind::Float => Number::Float(0.0),
            NumericKind::Decimal => Number::Decimal(BigDecimal::zero()),
        }
    }
}

/// A converted numeric value.
///
/// Decimals keep every digit of the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    Decimal(BigDecimal),
}

impl Number {
    pub fn kind(&self) -> NumericKind {
        match self {
            Number::Integer(_) => NumericKind::Integer,
            Number::Float(_) => NumericKind::Float,
            Number::Decimal(_) => NumericKind::Decimal,
        }
    }

    /// Lossy conversion for outputs that only store doubles.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(value) => *value as f64,
            Number::Float(value) => *value,
            Number::Decimal(value) => value.to_f64().unwrap_or(f64::NAN),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{value}"),
            Number::Float(value) => write!(f, "{value}"),
            Number::Decimal(value) => write!(f, "{value}"),
        }
    }
}

/// Validation pattern, separators and target kind of one numeric tag.
#[derive(Debug, Clone)]
pub struct NumericFormat {
    tag: NumericTag,
    pattern: String,
    regex: Regex,
    thousands_separator: Option<char>,
    decimal_separator: Option<char>,
    kind: NumericKind,
}

impl NumericFormat {
    /// Builds a format; `pattern` must match the whole value.
    ///
    /// # Errors
    ///
    /// Fails when both separators are the same character or when the pattern
    /// does not compile.
    pub fn new(
        tag: NumericTag,
        pattern: &str,
        thousands_separator: Option<char>,
        decimal_separator: Option<char>,
        kind: NumericKind,
    ) -> Result<Self, FieldDefinitionError> {
        if let (Some(decimal), Some(thousands)) = (decimal_separator, thousands_separator) {
            if decimal == thousands {
                return Err(FieldDefinitionError::SeparatorConflict { separator: decimal });
            }
        }
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            FieldDefinitionError::InvalidNumericPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            tag,
            pattern: pattern.to_string(),
            regex,
            thousands_separator,
            decimal_separator,
            kind,
        })
    }

    pub fn tag(&self) -> NumericTag {
        self.tag
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn thousands_separator(&self) -> Option<char> {
        self.thousands_separator
    }

    pub fn decimal_separator(&self) -> Option<char> {
        self.decimal_separator
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    /// Converts already trimmed text into a number.
    ///
    /// # Errors
    ///
    /// Returns [`FormatMismatch`] when the text does not fully match the
    /// format pattern, or when a matching integer does not fit in `i64`.
    pub fn to_number(&self, value: &str) -> Result<Number, FormatMismatch> {
        if value.is_empty() {
            return Ok(self.kind.zero());
        }
        if !self.regex.is_match(value) {
            return Err(self.mismatch(value, MismatchReason::Pattern));
        }
        let mut normalized: String = match self.thousands_separator {
            Some(separator) => value.chars().filter(|c| *c != separator).collect(),
            None => value.to_string(),
        };
        if let Some(separator) = self.decimal_separator {
            if separator != DEFAULT_DECIMAL_SEPARATOR {
                normalized = normalized.replace(separator, ".");
            }
        }
        let number = match self.kind {
            NumericKind::Integer => normalized.parse::<i64>().ok().map(Number::Integer),
            NumericKind::Float => normalized.parse::<f64>().ok().map(Number::Float),
            NumericKind::Decimal => BigDecimal::from_str(&normalized).ok().map(Number::Decimal),
        };
        // Only integers have a bounded range; matching text parses otherwise.
        number.ok_or_else(|| self.mismatch(value, MismatchReason::OutOfRange))
    }

    fn mismatch(&self, value: &str, reason: MismatchReason) -> FormatMismatch {
        FormatMismatch {
            value: value.to_string(),
            tag: self.tag,
            pattern: self.pattern.clone(),
            reason,
        }
    }
}

/// The built-in formats, one per [`NumericTag`].
#[derive(Debug)]
pub struct NumericRegistry {
    formats: BTreeMap<NumericTag, NumericFormat>,
}

impl NumericRegistry {
    /// Builds the eleven built-in formats.
    ///
    /// # Errors
    ///
    /// Propagates the first invalid format definition.
    pub fn builtin() -> Result<Self, FieldDefinitionError> {
        use NumericKind::{Decimal as Dec, Float, Integer};
        let definitions = [
            (NumericTag::Integer, INTEGER, None, None, Integer),
            (NumericTag::IntegerC, INTEGER_COMMA, Some(','), None, Integer),
            (NumericTag::IntegerD, INTEGER_DOT, Some('.'), None, Integer),
            (NumericTag::Float, FLOAT_DOT, None, Some('.'), Float),
            (NumericTag::FloatC, FLOAT_COMMA, None, Some(','), Float),
            (NumericTag::FloatCD, FLOAT_COMMA_DOT, Some(','), Some('.'), Float),
            (NumericTag::FloatDC, FLOAT_DOT_COMMA, Some('.'), Some(','), Float),
            (NumericTag::Decimal, FLOAT_DOT, None, Some('.'), Dec),
            (NumericTag::DecimalC, FLOAT_COMMA, None, Some(','), Dec),
            (NumericTag::DecimalCD, FLOAT_COMMA_DOT, Some(','), Some('.'), Dec),
            (NumericTag::DecimalDC, FLOAT_DOT_COMMA, Some('.'), Some(','), Dec),
        ];
        let mut formats = BTreeMap::new();
        for (tag, pattern, thousands, decimal, kind) in definitions {
            formats.insert(tag, NumericFormat::new(tag, pattern, thousands, decimal, kind)?);
        }
        Ok(Self { formats })
    }

    pub fn get(&self, tag: NumericTag) -> &NumericFormat {
        // `builtin` registers every tag.
        &self.formats[&tag]
    }
}

static REGISTRY: LazyLock<NumericRegistry> =
    LazyLock::new(|| NumericRegistry::builtin().expect("built-in numeric formats are valid"));

/// Process-wide registry of built-in formats.
pub fn registry() -> &'static NumericRegistry {
    &REGISTRY
}

/// Converts trimmed text using the format registered for `tag`.
///
/// # Errors
///
/// Returns [`FormatMismatch`] when the text does not follow the format.
pub fn to_number(tag: NumericTag, value: &str) -> Result<Number, FormatMismatch> {
    registry().get(tag).to_number(value)
}

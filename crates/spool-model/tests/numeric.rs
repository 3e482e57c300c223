//! Tests for the numeric format registry.

use bigdecimal::{BigDecimal, Zero};
use spool_model::numeric::{self, NumericFormat};
use spool_model::{FieldDefinitionError, MismatchReason, Number, NumericKind, NumericTag};

fn dec(text: &str) -> Number {
    Number::Decimal(text.parse::<BigDecimal>().expect("decimal literal"))
}

#[test]
fn every_tag_parses_its_canonical_example() {
    let cases = [
        (NumericTag::Integer, "-1234", Number::Integer(-1234)),
        (NumericTag::IntegerC, "1,234,567", Number::Integer(1_234_567)),
        (NumericTag::IntegerD, "1.234.567", Number::Integer(1_234_567)),
        (NumericTag::Float, "1234.5", Number::Float(1234.5)),
        (NumericTag::FloatC, "1234,5", Number::Float(1234.5)),
        (NumericTag::FloatCD, "1,234.56", Number::Float(1234.56)),
        (NumericTag::FloatDC, "1.234,56", Number::Float(1234.56)),
        (NumericTag::Decimal, "-0.10", dec("-0.10")),
        (NumericTag::DecimalC, "12,75", dec("12.75")),
        (NumericTag::DecimalCD, "9,876,543.21", dec("9876543.21")),
        (NumericTag::DecimalDC, "9.876.543,21", dec("9876543.21")),
    ];
    for (tag, text, expected) in cases {
        let value = numeric::to_number(tag, text).expect("canonical example parses");
        assert_eq!(value, expected, "{tag} {text}");
        assert_eq!(value.kind(), tag.kind(), "{tag}");
    }
}

#[test]
fn empty_text_yields_zero_of_kind() {
    for tag in NumericTag::ALL {
        let value = numeric::to_number(tag, "").expect("empty parses");
        assert_eq!(value, tag.kind().zero());
    }
    assert_eq!(NumericKind::Decimal.zero(), Number::Decimal(BigDecimal::zero()));
}

#[test]
fn pattern_violations_fail() {
    let cases = [
        (NumericTag::Integer, "12a"),
        (NumericTag::IntegerC, "1234,567"),
        (NumericTag::IntegerD, "1,234"),
        (NumericTag::Float, "1,5"),
        (NumericTag::FloatC, "1.5"),
        (NumericTag::FloatCD, "1.234,56"),
        (NumericTag::FloatDC, "1,234.56"),
        (NumericTag::Decimal, "abc"),
        (NumericTag::DecimalC, "1.5"),
        (NumericTag::DecimalCD, "12,34"),
        (NumericTag::DecimalDC, "12.34"),
    ];
    for (tag, text) in cases {
        let err = numeric::to_number(tag, text).expect_err("pattern violation");
        assert_eq!(err.tag, tag);
        assert_eq!(err.value, text);
        assert_eq!(err.pattern, numeric::registry().get(tag).pattern());
        assert_eq!(err.reason, MismatchReason::Pattern);
    }
}

#[test]
fn decimals_keep_every_digit() {
    let cases = [
        (
            NumericTag::Decimal,
            "1.00000000000000000000000000000001",
            "1.00000000000000000000000000000001",
        ),
        (
            NumericTag::Decimal,
            "123456789012345678901234567890",
            "123456789012345678901234567890",
        ),
        (
            NumericTag::DecimalC,
            "-0,000000000000000000000000000000123",
            "-0.000000000000000000000000000000123",
        ),
        (
            NumericTag::DecimalCD,
            "123,456,789,012,345,678,901,234,567,890.5",
            "123456789012345678901234567890.5",
        ),
    ];
    for (tag, text, expected) in cases {
        let value = numeric::to_number(tag, text).expect("matching decimal parses");
        assert_eq!(value, dec(expected), "{tag} {text}");
    }

    let tiny_step = numeric::to_number(NumericTag::Decimal, "1.00000000000000000000000000000001")
        .expect("parses");
    assert_ne!(tiny_step, dec("1"));
    assert_ne!(tiny_step, dec("1.0000000000000000000000000000"));
}

#[test]
fn integer_overflow_is_not_a_pattern_error() {
    let err = numeric::to_number(NumericTag::IntegerC, "9,223,372,036,854,775,808")
        .expect_err("one past i64::MAX");
    assert_eq!(err.reason, MismatchReason::OutOfRange);
    assert_eq!(
        numeric::to_number(NumericTag::IntegerC, "9,223,372,036,854,775,807").expect("i64::MAX"),
        Number::Integer(i64::MAX)
    );
}

#[test]
fn partial_match_is_not_enough() {
    assert!(numeric::to_number(NumericTag::Integer, "12 34").is_err());
    assert!(numeric::to_number(NumericTag::Float, "x1.5").is_err());
}

#[test]
fn equal_separators_are_rejected() {
    for separator in [',', '.', ' '] {
        let err = NumericFormat::new(
            NumericTag::FloatCD,
            r"-?\d+",
            Some(separator),
            Some(separator),
            NumericKind::Float,
        )
        .expect_err("separator conflict");
        assert!(matches!(
            err,
            FieldDefinitionError::SeparatorConflict { separator: s } if s == separator
        ));
    }
}

#[test]
fn custom_format_converts_with_its_separators() {
    let format = NumericFormat::new(
        NumericTag::DecimalDC,
        r"-?\d{1,3}(?: \d{3})*(?:,\d+)?",
        Some(' '),
        Some(','),
        NumericKind::Decimal,
    )
    .expect("valid format");
    assert_eq!(format.to_number("1 234,5").expect("parses"), dec("1234.5"));
}

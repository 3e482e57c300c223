//! Tests for fields, addressing and the cell grid.

use std::sync::Arc;

use proptest::prelude::*;
use spool_model::{
    Cell, CellValue, Extraction, Field, FieldDefinitionError, FieldKind, FieldType, NumericTag,
    column_index, column_name, resolve_relative,
};

#[test]
fn negative_left_bound_is_rejected() {
    let err = Field::extracted(2, Extraction::String, -1, 4).expect_err("negative left");
    assert!(matches!(
        err,
        FieldDefinitionError::NegativeLeftBound { index: 2, left: -1 }
    ));
}

#[test]
fn inverted_range_is_rejected() {
    let err = Field::extracted(0, Extraction::Fixed, 10, 5).expect_err("inverted range");
    assert!(matches!(
        err,
        FieldDefinitionError::InvertedRange {
            left: 10,
            right: 5,
            ..
        }
    ));
}

#[test]
fn empty_range_is_allowed() {
    let field = Field::extracted(0, Extraction::Numeric(NumericTag::Integer), 5, 5)
        .expect("zero width range");
    assert_eq!(field.field_type(), FieldType::Numeric(NumericTag::Integer));
    assert_eq!(field.range().map(|r| r.slice("0123456789")), Some(""));
}

#[test]
fn zero_repeat_is_rejected() {
    let err = Field::empty(1, 0).expect_err("zero repeat");
    assert!(matches!(
        err,
        FieldDefinitionError::InvalidRepeat { index: 1, count: 0 }
    ));
    let field = Field::empty(1, 3).expect("three blanks");
    assert_eq!(field.width(), 3);
    assert!(matches!(field.kind(), FieldKind::Empty { repeat: 3 }));
}

#[test]
fn relative_markers_resolve_at_c5() {
    let formula = "=<COL:+2><ROW:-1>+<COL:0><ROW:0>";
    let field = Arc::new(Field::function(0, formula));
    let cell = Cell::new(4, 2, field, None, CellValue::Formula(formula.to_string()));
    assert_eq!(cell.address(), "C5");
    assert_eq!(
        cell.value().as_str(),
        Some("=E4+C5")
    );
    assert_eq!(resolve_relative("<ROW:-1>", 4, 2), "4");
    assert_eq!(resolve_relative("<COL:+2>", 4, 2), "E");
}

#[test]
fn markers_are_case_sensitive() {
    assert_eq!(resolve_relative("=<row:1>", 0, 0), "=<row:1>");
}

proptest! {
    #[test]
    fn column_names_round_trip(index in 0usize..1000) {
        let name = column_name(index);
        prop_assert!(name.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(column_index(&name), Some(index));
    }
}

#[test]
fn column_names_are_distinct() {
    let names: std::collections::HashSet<String> = (0..1000).map(column_name).collect();
    assert_eq!(names.len(), 1000);
}

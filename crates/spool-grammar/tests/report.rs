//! Integration tests for the report definition grammar.

use spool_grammar::{FieldSpec, SyntaxKind, parse_report};
use spool_model::{Border, ConstValue, Encoding, Extraction, Number, NumericTag};

const BALANCE: &str = r##"
# Monthly balance listing
title Monthly balance # kept
description
    Accounts listing.
    One line per account.
/description
encoding LATIN-1
columns_width 12 30 15
exclude_filters "^-+$", "PAGE\s+\d+"

style head bold align center border thin
style total bold format "#,##0.00"

section process_only_one_time
  header
    fieldset const "Code" :head const "Balance" :head
  body
    fieldset include_filters "ACC" keep_in_row
      string 4 10 as code
    fieldset include_filters " +BAL", " +SALDO" new_row
      floatdc 10 25 as balance
  footer
    fieldset empty function =SUM(<col>$<startrow>:<col><rows>) :total

section blank_row
  body
    fieldset include_filters "DATA"
      fixed 0 4 integer 5 9 empty 3 as pad const -2.5
"##;

#[test]
fn parses_complete_definition() {
    let report = parse_report(BALANCE).unwrap();
    assert_eq!(report.title, "Monthly balance # kept");
    assert_eq!(
        report.description.as_deref(),
        Some("Accounts listing.\n    One line per account.")
    );
    assert_eq!(report.encoding, Some(Encoding::Latin1));
    assert_eq!(report.columns_width, [12, 30, 15]);
    assert_eq!(report.exclude_filters, [r"^-+$", r"PAGE\s+\d+"]);
    assert_eq!(report.styles.len(), 2);
    assert_eq!(report.styles[0].border, Some(Border::Thin));
    assert_eq!(report.styles[1].num_format.as_deref(), Some("#,##0.00"));
    assert_eq!(report.sections.len(), 2);
    assert_eq!(report.field_count(), 10);
}

#[test]
fn sections_carry_flags_and_fieldsets() {
    let report = parse_report(BALANCE).unwrap();
    let first = &report.sections[0];
    assert!(first.process_only_one_time);
    assert!(!first.blank_row);
    assert_eq!(first.header.len(), 1);
    assert_eq!(first.body.len(), 2);
    assert_eq!(first.footer.len(), 1);

    let accounts = &first.body[0];
    assert_eq!(accounts.include_filters, ["ACC"]);
    assert!(accounts.keep_in_row);
    assert!(!accounts.new_row);

    let balances = &first.body[1];
    assert_eq!(balances.include_filters, [" +BAL", " +SALDO"]);
    assert!(balances.new_row);
    assert_eq!(
        balances.fields[0].spec,
        FieldSpec::Extracted {
            extraction: Extraction::Numeric(NumericTag::FloatDC),
            left: 10,
            right: 25,
        }
    );
    assert_eq!(balances.fields[0].name.as_deref(), Some("balance"));

    let header = &first.header[0].fields;
    assert_eq!(header[0].spec, FieldSpec::Const(ConstValue::Text("Code".into())));
    assert_eq!(header[1].style_id.as_deref(), Some("head"));

    let footer = &first.footer[0].fields;
    assert_eq!(footer[0].spec, FieldSpec::Empty { repeat: 1 });
    assert_eq!(
        footer[1].spec,
        FieldSpec::Function("=SUM(<COL:0>$<STARTROW>:<COL:0><ROWS>)".into())
    );
    assert_eq!(footer[1].style_id.as_deref(), Some("total"));

    let second = &report.sections[1];
    assert!(second.blank_row);
    let fields = &second.body[0].fields;
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[2].spec, FieldSpec::Empty { repeat: 3 });
    assert_eq!(fields[2].name.as_deref(), Some("pad"));
    assert_eq!(
        fields[3].spec,
        FieldSpec::Const(ConstValue::Number(Number::Float(-2.5)))
    );
}

#[test]
fn fields_know_their_line() {
    let report = parse_report(BALANCE).unwrap();
    let code = &report.sections[0].body[0].fields[0];
    assert_eq!(code.line, 20);
}

#[test]
fn minimal_definition() {
    let report = parse_report(
        "title\nsection body fieldset include_filters \"DATA\" string 0 4 integer 5 9",
    )
    .unwrap();
    assert_eq!(report.title, "");
    assert_eq!(report.description, None);
    assert_eq!(report.encoding, None);
    assert!(report.columns_width.is_empty());
    assert!(report.styles.is_empty());
}

#[test]
fn keywords_ignore_case() {
    let report = parse_report(
        "TITLE x\nSection Blank_Row BODY FieldSet Include_Filters \"A\" STRING 0 1 As a",
    )
    .unwrap();
    assert!(report.sections[0].blank_row);
    assert_eq!(report.sections[0].body[0].fields[0].name.as_deref(), Some("a"));
}

#[test]
fn bounds_are_kept_raw() {
    let report =
        parse_report("title x\nsection body fieldset include_filters \"A\" string -1 4 empty 0")
            .unwrap();
    let fields = &report.sections[0].body[0].fields;
    assert_eq!(
        fields[0].spec,
        FieldSpec::Extracted {
            extraction: Extraction::String,
            left: -1,
            right: 4,
        }
    );
    assert_eq!(fields[1].spec, FieldSpec::Empty { repeat: 0 });
}

#[test]
fn missing_title_is_reported() {
    let err = parse_report("section body").unwrap_err();
    assert_eq!(err.kind, SyntaxKind::Config);
    assert_eq!((err.line, err.column), (1, 1));
    assert_eq!(err.message, "expected title");
}

#[test]
fn extracted_field_in_header_is_rejected() {
    let err = parse_report(
        "title x\nsection\n  header\n    fieldset string 0 4\n  body fieldset include_filters \"A\" string 0 1",
    )
    .unwrap_err();
    assert_eq!((err.line, err.column), (4, 14));
    assert_eq!(err.message, "extracted field in a header or footer fieldset");
}

#[test]
fn body_is_required() {
    let err = parse_report("title x\nsection\n  footer fieldset empty").unwrap_err();
    assert_eq!((err.line, err.column), (3, 3));
    assert_eq!(err.message, "expected body");
}

#[test]
fn body_fieldset_needs_filters() {
    let err = parse_report("title x\nsection body fieldset string 0 1").unwrap_err();
    assert_eq!((err.line, err.column), (2, 23));
    assert_eq!(err.message, "expected include_filters");
}

#[test]
fn bounds_must_follow_type() {
    let err =
        parse_report("title x\nsection body fieldset include_filters \"A\" string 0").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.message, "expected column bound");
}

#[test]
fn repeated_flag_is_rejected() {
    let err = parse_report("title x\nsection blank_row blank_row body").unwrap_err();
    assert_eq!((err.line, err.column), (2, 19));
    assert_eq!(err.message, "flag given more than once");
}

#[test]
fn unknown_encoding_is_rejected() {
    let err = parse_report("title x\nencoding ebcdic\nsection").unwrap_err();
    assert_eq!((err.line, err.column), (2, 10));
}

#[test]
fn bad_formula_is_a_definition_error() {
    let err = parse_report(
        "title x\nsection body fieldset include_filters \"A\" function =SUM(A1",
    )
    .unwrap_err();
    assert_eq!(err.kind, SyntaxKind::Config);
    assert_eq!(err.line, 2);
    assert_eq!(err.message, "expected closing parenthesis");
}

#[test]
fn error_pointer() {
    let err = parse_report("title x\nsection body fieldset include_filters \"A\" strin 0 1")
        .unwrap_err();
    insta::assert_snapshot!(err.pointer(), @r#"
    section body fieldset include_filters "A" strin 0 1
                                              ^
    "#);
}

//! Integration tests for the renderers.

use std::path::Path;

use spool_engine::Report;
use spool_output::{
    OutputFormat, RenderOptions, build_workbook, output_file_name, render, render_to_string,
};

const SALES: &str = r##"
title Sales
description
    Weekly totals.
/description
columns_width 10 12
style money bold format "#,##0.00"

section
  header
    fieldset const "Item" const "Amount"
  body
    fieldset include_filters "S "
      string 2 8 as item integer 8 11 as amount :money
  footer
    fieldset const "Total" function =SUM(<col><startrow>:<col><rows>) as total :money
"##;

fn processed() -> Report {
    let mut report: Report = SALES.parse().unwrap();
    report
        .process(["S apple  12", "-- page 1 --", "S pear    7"])
        .unwrap();
    report
}

#[test]
fn csv_writes_one_record_per_row() {
    let csv = render_to_string(&processed(), OutputFormat::Csv, &RenderOptions::default()).unwrap();
    insta::assert_snapshot!(csv, @r"
    Item;Amount
    apple;12
    pear;7
    Total;=SUM(B2:B3)
    ");
}

#[test]
fn csv_delimiter_is_configurable() {
    let options = RenderOptions::default().with_csv_delimiter(b',');
    let csv = render_to_string(&processed(), OutputFormat::Csv, &options).unwrap();
    assert!(csv.starts_with("Item,Amount\n"));
}

#[test]
fn json_names_values() {
    let json = render_to_string(&processed(), OutputFormat::Json, &RenderOptions::default()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(document["title"], "Sales");
    assert_eq!(document["description"], "Weekly totals.");
    let group = &document["groups"][0];
    assert_eq!(group["start_row"], 2);

    let rows = group["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["kind"], "header");
    assert_eq!(rows[0]["values"]["field0"], "Item");
    assert_eq!(rows[1]["kind"], "body");
    assert_eq!(rows[1]["range"], "A2:B2");
    assert_eq!(rows[1]["values"]["item"], "apple");
    assert_eq!(rows[1]["values"]["amount"], 12);
    assert_eq!(rows[3]["kind"], "footer");
    assert_eq!(rows[3]["values"]["total"], "=SUM(B2:B3)");
}

#[test]
fn compact_json_is_one_line() {
    let options = RenderOptions::default().with_pretty_json(false);
    let json = render_to_string(&processed(), OutputFormat::Json, &options).unwrap();
    assert_eq!(json.lines().count(), 1);
}

#[test]
fn xml_nests_groups_rows_and_cells() {
    let xml = render_to_string(&processed(), OutputFormat::Xml, &RenderOptions::default()).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<report title="Sales">"#));
    assert!(xml.contains("<description>Weekly totals.</description>"));
    assert!(xml.contains(r#"<group index="0" section="0" start_row="2">"#));
    assert!(xml.contains(r#"<row kind="footer">"#));
    assert!(xml.contains(r#"<cell name="item" address="A3">pear</cell>"#));
    assert_eq!(xml.matches("<cell ").count(), 8);
}

#[test]
fn html_lays_groups_out_as_table_bodies() {
    let html = render_to_string(&processed(), OutputFormat::Html, &RenderOptions::default()).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Sales</title>"));
    assert!(html.contains("<p>Weekly totals.</p>"));
    assert!(html.contains(r#"<col style="width: 12ch"/>"#));
    assert!(html.contains(r#"<tbody data-section="0" data-start-row="2">"#));
    assert!(html.contains(r#"<tr class="header">"#));
    assert!(html.contains("<th>Item</th>"));
    assert!(html.contains("<td>pear</td>"));
    assert!(html.contains(r#"<td class="money">12</td>"#));
    assert!(html.contains(r#"<td class="money">=SUM(B2:B3)</td>"#));
    assert_eq!(html.matches("<tr ").count(), 4);
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn html_escapes_text() {
    let mut report: Report = r#"title A & B
        section body fieldset include_filters "^X" string 2 10"#
        .parse()
        .unwrap();
    report.process(["X <b>&</b>"]).unwrap();
    let html = render_to_string(&report, OutputFormat::Html, &RenderOptions::default()).unwrap();
    assert!(html.contains("<title>A &amp; B</title>"));
    assert!(html.contains("<td>&lt;b&gt;&amp;&lt;/b&gt;</td>"));
}

#[test]
fn xlsx_is_only_rendered_to_files() {
    let err = render_to_string(&processed(), OutputFormat::Xlsx, &RenderOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("binary"));

    let mut workbook = build_workbook(&processed(), &RenderOptions::default()).unwrap();
    let bytes = workbook.save_to_buffer().unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn invalid_sheet_names_are_rejected() {
    let options = RenderOptions::default().with_sheet_name("bad[name]");
    let err = build_workbook(&processed(), &options).err().expect("expected an error");
    assert!(err.to_string().contains("invalid sheet name"));
}

#[test]
fn renders_every_format_to_disk() {
    let report = processed();
    let dir = tempfile::tempdir().unwrap();
    for format in OutputFormat::ALL {
        let name = output_file_name(Path::new("in/sales.lst"), format, None, false);
        let path = dir.path().join(name);
        render(&report, format, &path, &RenderOptions::default()).unwrap();
        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0, "{format} output is empty");
    }
    assert!(dir.path().join("sales.xlsx").exists());
}

#[test]
fn empty_pass_renders_headerless_documents() {
    let mut report: Report = SALES.parse().unwrap();
    report.process(["nothing to see"]).unwrap();
    let csv = render_to_string(&report, OutputFormat::Csv, &RenderOptions::default()).unwrap();
    assert!(csv.is_empty());
    let json = render_to_string(&report, OutputFormat::Json, &RenderOptions::default()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(document["groups"].as_array().map(Vec::len), Some(0));
}

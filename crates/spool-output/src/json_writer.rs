//! JSON output.

use std::io::Write;

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::{Map, Value};

use spool_engine::Report;
use spool_model::{CellGroup, CellValue, FieldsetRole, Number, Row};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    groups: Vec<JsonGroup>,
}

#[derive(Debug, Serialize)]
struct JsonGroup {
    index: usize,
    section: usize,
    start_row: usize,
    rows: Vec<JsonRow>,
}

#[derive(Debug, Serialize)]
struct JsonRow {
    kind: FieldsetRole,
    /// Spreadsheet range covered by the row, e.g. `A2:C2`.
    range: String,
    values: Map<String, Value>,
}

pub(crate) fn write_json<W: Write>(
    report: &Report,
    writer: &mut W,
    options: &crate::RenderOptions,
) -> Result<()> {
    let document = JsonReport {
        title: report.title(),
        description: report.description(),
        groups: report.cell_groups().iter().map(json_group).collect(),
    };
    let serialized = if options.pretty_json {
        serde_json::to_writer_pretty(&mut *writer, &document)
    } else {
        serde_json::to_writer(&mut *writer, &document)
    };
    serialized.context("serialize json output")?;
    writer.write_all(b"\n").context("write json output")?;
    Ok(())
}

fn json_group(group: &CellGroup) -> JsonGroup {
    JsonGroup {
        index: group.index(),
        section: group.section(),
        start_row: group.excel_start_row(),
        rows: group.rows().iter().map(json_row).collect(),
    }
}

fn json_row(row: &Row) -> JsonRow {
    let range = match (row.cells().first(), row.cells().last()) {
        (Some(first), Some(last)) => {
            format!("{}:{}", first.address(), last.address())
        }
        _ => String::new(),
    };
    let values = row
        .cells()
        .iter()
        .map(|cell| (cell.name(), json_value(&cell.value())))
        .collect();
    JsonRow {
        kind: row.role(),
        range,
        values,
    }
}

fn json_value(value: &CellValue) -> Value {
    match value {
        CellValue::Empty => Value::Null,
        CellValue::Text(text) | CellValue::Formula(text) => Value::String(text.clone()),
        CellValue::Number(Number::Integer(value)) => Value::from(*value),
        CellValue::Number(Number::Float(value)) => Value::from(*value),
        CellValue::Number(Number::Decimal(value)) => decimal_value(value),
    }
}

/// JSON numbers are read back as doubles, so wider decimals stay strings.
fn decimal_value(value: &BigDecimal) -> Value {
    let text = value.to_string();
    let exact = text
        .parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(|float| float.to_string().parse::<BigDecimal>().ok())
        .is_some_and(|round_trip| round_trip == *value);
    match text.parse::<serde_json::Number>() {
        Ok(number) if exact => Value::Number(number),
        _ => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(text: &str) -> Value {
        decimal_value(&text.parse().unwrap())
    }

    #[test]
    fn short_decimals_are_numbers() {
        assert_eq!(decimal("12.75"), serde_json::json!(12.75));
        assert_eq!(decimal("-0.1"), serde_json::json!(-0.1));
    }

    #[test]
    fn wide_decimals_keep_their_digits() {
        assert_eq!(
            decimal("123456789012345678901234567890.000001"),
            Value::String("123456789012345678901234567890.000001".into())
        );
        assert_eq!(
            decimal("1.00000000000000000000000000000001"),
            Value::String("1.00000000000000000000000000000001".into())
        );
    }
}

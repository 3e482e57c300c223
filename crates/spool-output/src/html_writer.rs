//! HTML output: a standalone page holding one table.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use spool_engine::Report;
use spool_model::Row;

/// Each cell group becomes a `<tbody>`; header rows use `<th>` cells.
pub(crate) fn write_html<W: Write>(report: &Report, writer: &mut W) -> Result<()> {
    let mut html = Writer::new_with_indent(writer, b' ', 2);
    html.write_event(Event::DocType(BytesText::new("html")))?;
    html.write_event(Event::Start(BytesStart::new("html")))?;

    html.write_event(Event::Start(BytesStart::new("head")))?;
    html.create_element("meta")
        .with_attribute(("charset", "UTF-8"))
        .write_empty()?;
    html.create_element("title")
        .write_text_content(BytesText::new(report.title()))?;
    html.write_event(Event::End(BytesEnd::new("head")))?;

    html.write_event(Event::Start(BytesStart::new("body")))?;
    html.create_element("h1")
        .write_text_content(BytesText::new(report.title()))?;
    if let Some(description) = report.description() {
        html.create_element("p")
            .write_text_content(BytesText::new(description))?;
    }

    html.write_event(Event::Start(BytesStart::new("table")))?;
    if !report.columns_width().is_empty() {
        html.write_event(Event::Start(BytesStart::new("colgroup")))?;
        for width in report.columns_width() {
            let style = format!("width: {width}ch");
            html.create_element("col")
                .with_attribute(("style", style.as_str()))
                .write_empty()?;
        }
        html.write_event(Event::End(BytesEnd::new("colgroup")))?;
    }

    for group in report.cell_groups() {
        let section = group.section().to_string();
        let start_row = group.excel_start_row().to_string();
        let mut element = BytesStart::new("tbody");
        element.push_attribute(("data-section", section.as_str()));
        element.push_attribute(("data-start-row", start_row.as_str()));
        html.write_event(Event::Start(element))?;
        for row in group.rows() {
            write_row(&mut html, row)?;
        }
        html.write_event(Event::End(BytesEnd::new("tbody")))?;
    }

    html.write_event(Event::End(BytesEnd::new("table")))?;
    html.write_event(Event::End(BytesEnd::new("body")))?;
    html.write_event(Event::End(BytesEnd::new("html")))?;
    Ok(())
}

fn write_row<W: Write>(html: &mut Writer<W>, row: &Row) -> Result<()> {
    let kind = row.role().to_string();
    let mut element = BytesStart::new("tr");
    element.push_attribute(("class", kind.as_str()));
    html.write_event(Event::Start(element))?;

    let tag = if row.is_header() { "th" } else { "td" };
    for cell in row {
        let value = cell.value().to_string();
        let cell_element = html.create_element(tag);
        match cell.style_id() {
            Some(style) => cell_element
                .with_attribute(("class", style))
                .write_text_content(BytesText::new(&value))?,
            None => cell_element.write_text_content(BytesText::new(&value))?,
        };
    }
    html.write_event(Event::End(BytesEnd::new("tr")))?;
    Ok(())
}

//! XML output.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use spool_engine::Report;

/// `<report>` → `<group>` → `<row>` → `<cell>`.
pub(crate) fn write_xml<W: Write>(report: &Report, writer: &mut W) -> Result<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("report");
    root.push_attribute(("title", report.title()));
    xml.write_event(Event::Start(root))?;

    if let Some(description) = report.description() {
        xml.write_event(Event::Start(BytesStart::new("description")))?;
        xml.write_event(Event::Text(BytesText::new(description)))?;
        xml.write_event(Event::End(BytesEnd::new("description")))?;
    }

    for group in report.cell_groups() {
        let index = group.index().to_string();
        let section = group.section().to_string();
        let start_row = group.excel_start_row().to_string();
        let mut element = BytesStart::new("group");
        element.push_attribute(("index", index.as_str()));
        element.push_attribute(("section", section.as_str()));
        element.push_attribute(("start_row", start_row.as_str()));
        xml.write_event(Event::Start(element))?;

        for row in group.rows() {
            let kind = row.role().to_string();
            let mut element = BytesStart::new("row");
            element.push_attribute(("kind", kind.as_str()));
            xml.write_event(Event::Start(element))?;
            for cell in row {
                let name = cell.name();
                let address = cell.address();
                let value = cell.value().to_string();
                let mut element = BytesStart::new("cell");
                element.push_attribute(("name", name.as_str()));
                element.push_attribute(("address", address.as_str()));
                if value.is_empty() {
                    xml.write_event(Event::Empty(element))?;
                } else {
                    xml.write_event(Event::Start(element))?;
                    xml.write_event(Event::Text(BytesText::new(&value)))?;
                    xml.write_event(Event::End(BytesEnd::new("cell")))?;
                }
            }
            xml.write_event(Event::End(BytesEnd::new("row")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("group")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("report")))?;
    Ok(())
}

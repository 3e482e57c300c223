//! Output generation for processed listings.
//!
//! A processed [`Report`] is rendered read-only into one of:
//!
//! - **xlsx**: one worksheet with column widths, cell styles and live formulas
//! - **csv**: one record per row, `;` separated
//! - **json**: groups, rows and named values
//! - **xml**: the same tree as json, as elements
//! - **html**: a standalone page with one table, a `<tbody>` per cell group

mod csv_writer;
mod html_writer;
mod json_writer;
mod naming;
mod xlsx_writer;
mod xml_writer;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use spool_engine::Report;

pub use naming::{TIME_STAMP_FORMAT, output_file_name};
pub use xlsx_writer::build_workbook;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Xlsx,
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Xml,
        OutputFormat::Html,
    ];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown output format: {s}"))
    }
}

/// Options shared by the renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Author property of xlsx documents.
    pub author: String,
    /// Worksheet name; the xlsx default when unset.
    pub sheet_name: Option<String>,
    pub csv_delimiter: u8,
    pub pretty_json: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            author: concat!("spool ", env!("CARGO_PKG_VERSION")).to_string(),
            sheet_name: None,
            csv_delimiter: b';',
            pretty_json: true,
        }
    }
}

impl RenderOptions {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }
}

/// Writes the last pass of `report` to `path`.
pub fn render(
    report: &Report,
    format: OutputFormat,
    path: &Path,
    options: &RenderOptions,
) -> Result<()> {
    debug!(path = %path.display(), %format, "rendering report");
    if format == OutputFormat::Xlsx {
        let mut workbook = build_workbook(report, options)?;
        return workbook
            .save(path)
            .with_context(|| format!("write {}", path.display()));
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    render_to_writer(report, format, &mut writer, options)?;
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))
}

/// Writes a text format (csv, json, xml, html) to `writer`.
pub fn render_to_writer<W: Write>(
    report: &Report,
    format: OutputFormat,
    writer: &mut W,
    options: &RenderOptions,
) -> Result<()> {
    match format {
        OutputFormat::Csv => csv_writer::write_csv(report, writer, options),
        OutputFormat::Json => json_writer::write_json(report, writer, options),
        OutputFormat::Xml => xml_writer::write_xml(report, writer),
        OutputFormat::Html => html_writer::write_html(report, writer),
        OutputFormat::Xlsx => bail!("xlsx is a binary format; use render or build_workbook"),
    }
}

/// Renders a text format into a string.
pub fn render_to_string(
    report: &Report,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String> {
    let mut buffer = Vec::new();
    render_to_writer(report, format, &mut buffer, options)?;
    String::from_utf8(buffer).context("renderer produced invalid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("XLSX".parse::<OutputFormat>(), Ok(OutputFormat::Xlsx));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("Html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Xlsx);
    }
}

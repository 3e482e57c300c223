//! XLSX output.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rust_xlsxwriter::{
    Color as XlsxColor, DocProperties, Format, FormatAlign, FormatBorder, FormatUnderline,
    Formula, Workbook, Worksheet,
};
use tracing::{debug, warn};

use spool_engine::Report;
use spool_model::{Border, Cell, CellValue, Color, HorizontalAlign, Style, VerticalAlign};

use crate::RenderOptions;

/// Builds a workbook with one worksheet holding the last pass of `report`.
///
/// # Errors
///
/// Fails on invalid sheet names and on cells outside the worksheet limits.
pub fn build_workbook(report: &Report, options: &RenderOptions) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let mut properties = DocProperties::new()
        .set_title(report.title())
        .set_author(&options.author);
    if let Some(description) = report.description() {
        properties = properties.set_comment(description);
    }
    workbook.set_properties(&properties);

    let formats: BTreeMap<&str, Format> = report
        .styles()
        .iter()
        .map(|(id, style)| (id.as_str(), style_format(style)))
        .collect();

    let worksheet = workbook.add_worksheet();
    if let Some(name) = &options.sheet_name {
        worksheet
            .set_name(name)
            .with_context(|| format!("invalid sheet name {name:?}"))?;
    }
    for (col, width) in report.columns_width().iter().enumerate() {
        worksheet
            .set_column_width(column(col)?, *width)
            .with_context(|| format!("set width of column {col}"))?;
    }

    let mut written = 0usize;
    for cell in report.cell_groups().iter().flat_map(|group| group.cells()) {
        let format = match cell.style_id() {
            Some(id) => {
                let format = formats.get(id);
                if format.is_none() {
                    warn!(style = id, cell = %cell.address(), "undefined style, writing unformatted");
                }
                format
            }
            None => None,
        };
        write_cell(worksheet, cell, format)?;
        written += 1;
    }
    debug!(cells = written, styles = formats.len(), "worksheet built");
    Ok(workbook)
}

fn write_cell(worksheet: &mut Worksheet, cell: &Cell, format: Option<&Format>) -> Result<()> {
    let row = u32::try_from(cell.row()).context("row outside the worksheet")?;
    let col = column(cell.col())?;
    let default_format = Format::new();
    let format = format.unwrap_or(&default_format);
    match &*cell.value() {
        CellValue::Empty => worksheet.write_blank(row, col, format),
        CellValue::Text(text) => worksheet.write_string_with_format(row, col, text, format),
        CellValue::Number(number) => {
            worksheet.write_number_with_format(row, col, number.as_f64(), format)
        }
        CellValue::Formula(text) if text.starts_with('=') => {
            worksheet.write_formula_with_format(row, col, Formula::new(text), format)
        }
        CellValue::Formula(text) => worksheet.write_string_with_format(row, col, text, format),
    }
    .with_context(|| format!("write cell {}", cell.address()))?;
    Ok(())
}

fn column(index: usize) -> Result<u16> {
    u16::try_from(index).context("column outside the worksheet")
}

fn style_format(style: &Style) -> Format {
    let mut format = Format::new();
    if let Some(num_format) = &style.num_format {
        format = format.set_num_format(num_format);
    }
    if let Some(font) = &style.font_name {
        format = format.set_font_name(font);
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if style.bold {
        format = format.set_bold();
    }
    if style.italic {
        format = format.set_italic();
    }
    if style.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if style.strikeout {
        format = format.set_font_strikethrough();
    }
    if let Some(align) = style.align {
        format = format.set_align(horizontal(align));
    }
    if let Some(valign) = style.valign {
        format = format.set_align(vertical(valign));
    }
    if let Some(border) = style.border {
        format = format.set_border(border_line(border));
    }
    if let Some(color) = color(style.border_color.as_ref(), &style.id) {
        format = format.set_border_color(color);
    }
    if let Some(color) = color(style.background.as_ref(), &style.id) {
        format = format.set_background_color(color);
    }
    if let Some(color) = color(style.font_color.as_ref(), &style.id) {
        format = format.set_font_color(color);
    }
    if style.unlocked {
        format = format.set_unlocked();
    }
    if style.hidden {
        format = format.set_hidden();
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    if style.shrink {
        format = format.set_shrink();
    }
    format
}

fn color(color: Option<&Color>, style: &str) -> Option<XlsxColor> {
    let color = color?;
    match color.rgb() {
        Some(rgb) => Some(XlsxColor::RGB(rgb)),
        None => {
            warn!(style, %color, "ignoring malformed color");
            None
        }
    }
}

fn horizontal(align: HorizontalAlign) -> FormatAlign {
    match align {
        HorizontalAlign::Left => FormatAlign::Left,
        HorizontalAlign::Center => FormatAlign::Center,
        HorizontalAlign::Right => FormatAlign::Right,
        HorizontalAlign::Justify => FormatAlign::Justify,
    }
}

fn vertical(align: VerticalAlign) -> FormatAlign {
    match align {
        VerticalAlign::Top => FormatAlign::Top,
        VerticalAlign::Bottom => FormatAlign::Bottom,
        VerticalAlign::Center => FormatAlign::VerticalCenter,
        VerticalAlign::Justify => FormatAlign::VerticalJustify,
    }
}

fn border_line(border: Border) -> FormatBorder {
    match border {
        Border::NoLine => FormatBorder::None,
        Border::Thin => FormatBorder::Thin,
        Border::Medium => FormatBorder::Medium,
        Border::Dashed => FormatBorder::Dashed,
        Border::Dotted => FormatBorder::Dotted,
        Border::Thick => FormatBorder::Thick,
        Border::Double => FormatBorder::Double,
        Border::Hair => FormatBorder::Hair,
        Border::MediumDashed => FormatBorder::MediumDashed,
        Border::ThinDashDotted => FormatBorder::DashDot,
        Border::MediumDashDotted => FormatBorder::MediumDashDot,
        Border::ThinDashDotDotted => FormatBorder::DashDotDot,
        Border::MediumDashDotDotted => FormatBorder::MediumDashDotDot,
        Border::SlantedMediumDashDotted => FormatBorder::SlantDashDot,
    }
}

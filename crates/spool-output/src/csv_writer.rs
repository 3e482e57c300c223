//! Delimited text output.

use std::io::Write;

use anyhow::{Context, Result};
use csv::WriterBuilder;

use spool_engine::Report;

use crate::RenderOptions;

/// One record per row; cells are placed by column, gaps left empty.
pub(crate) fn write_csv<W: Write>(
    report: &Report,
    writer: &mut W,
    options: &RenderOptions,
) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .delimiter(options.csv_delimiter)
        .flexible(true)
        .from_writer(writer);
    for row in report.cell_groups().iter().flat_map(|group| group.rows()) {
        let width = row.cells().iter().map(|cell| cell.col() + 1).max().unwrap_or(0);
        let mut record = vec![String::new(); width];
        for cell in row {
            record[cell.col()] = cell.value().to_string();
        }
        csv.write_record(&record).context("write csv record")?;
    }
    csv.flush().context("flush csv output")?;
    Ok(())
}

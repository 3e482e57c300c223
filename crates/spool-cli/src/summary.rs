use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use spool_cli::pipeline::{ListingResult, RunResult};

pub fn print_summary(result: &RunResult) {
    println!("Report: {} ({})", result.title, result.definition.display());
    println!("Output: {} [{}]", result.output_dir.display(), result.format);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Listing"),
        header_cell("Output"),
        header_cell("Lines"),
        header_cell("Excluded"),
        header_cell("Unmatched"),
        header_cell("Groups"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_lines = 0usize;
    let mut total_rows = 0usize;
    for listing in &result.listings {
        let Some(summary) = listing.summary else {
            table.add_row(failed_row(listing));
            continue;
        };
        total_lines += summary.lines;
        total_rows += summary.rows;
        table.add_row(vec![
            listing_cell(listing),
            output_cell(listing),
            Cell::new(summary.lines),
            count_cell(summary.excluded, Color::DarkGrey),
            count_cell(summary.unmatched, Color::Yellow),
            Cell::new(summary.groups),
            Cell::new(summary.rows),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_lines).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let failures: Vec<&ListingResult> = result
        .listings
        .iter()
        .filter(|listing| !listing.is_ok())
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for listing in failures {
            if let Some(error) = &listing.error {
                eprintln!("- {}: {error}", listing.input.display());
            }
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ]);
    }
}

fn failed_row(listing: &ListingResult) -> Vec<Cell> {
    vec![
        listing_cell(listing),
        Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn listing_cell(listing: &ListingResult) -> Cell {
    Cell::new(listing.input.display())
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn output_cell(listing: &ListingResult) -> Cell {
    match &listing.output {
        Some(path) => Cell::new(path.display()).fg(Color::Green),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

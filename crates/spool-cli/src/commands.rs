use std::fs;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use tracing::{info, warn};

use spool_cli::pipeline::{ProcessOptions, RunResult, load_report, run};
use spool_engine::Report;
use spool_grammar::parse_formula;
use spool_model::{Fieldset, FieldsetRole, Section};
use spool_output::RenderOptions;

use crate::cli::{CheckArgs, FormulaArgs, ProcessArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

pub fn run_process(args: &ProcessArgs) -> Result<RunResult> {
    let mut render = RenderOptions::default();
    if let Some(name) = &args.sheet_name {
        render = render.with_sheet_name(name);
    }
    let options = ProcessOptions::default()
        .with_output_dir(&args.output_dir)
        .with_format(args.format.into())
        .with_time_stamp(args.time_stamp)
        .with_keep_extension(args.keep_extension)
        .with_render_options(render);
    let result = run(&args.conf_file, &args.files, &options)?;
    info!(
        listings = result.listings.len(),
        failed = result.listings.iter().filter(|listing| !listing.is_ok()).count(),
        "process complete"
    );
    Ok(result)
}

pub fn run_check(args: &CheckArgs) -> Result<()> {
    let report = load_report(&args.definition)?;
    print_report(&report);
    Ok(())
}

/// Prints `input => normalized` per formula; returns the number of failures.
pub fn run_formula(args: &FormulaArgs) -> Result<usize> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let mut failures = 0;
    for (index, line) in text.lines().enumerate() {
        let formula = line.trim();
        if formula.is_empty() {
            continue;
        }
        match parse_formula(formula) {
            Ok(normalized) => println!("{formula} => {normalized}"),
            Err(err) => {
                failures += 1;
                warn!(line = index + 1, "{err}");
                println!("{formula} => error: {}", err.message);
                println!("{}", indent(&err.pointer()));
            }
        }
    }
    Ok(failures)
}

fn print_report(report: &Report) {
    println!("Title: {}", report.title());
    if let Some(description) = report.description() {
        println!("Description: {description}");
    }
    println!("Encoding: {}", report.encoding());
    if !report.columns_width().is_empty() {
        let widths: Vec<String> = report
            .columns_width()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Column widths: {}", widths.join(" "));
    }
    for filter in report.exclude_filters() {
        println!("Exclude: \"{}\"", filter.pattern());
    }
    for style in report.styles().values() {
        println!("{style}");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Role"),
        header_cell("Fieldset"),
        header_cell("Filters"),
        header_cell("Fields"),
    ]);
    apply_table_style(&mut table);
    for (index, section) in report.sections().iter().enumerate() {
        for role in [FieldsetRole::Header, FieldsetRole::Body, FieldsetRole::Footer] {
            for (position, fieldset) in section.fieldsets(role).iter().enumerate() {
                table.add_row(vec![
                    section_cell(index, section),
                    Cell::new(role),
                    Cell::new(fieldset_label(position, fieldset)),
                    filters_cell(fieldset),
                    Cell::new(fields_text(fieldset)),
                ]);
            }
        }
    }
    println!("{table}");
}

fn section_cell(index: usize, section: &Section) -> Cell {
    let mut label = index.to_string();
    if section.process_only_one_time() {
        label.push_str(" once");
    }
    if section.blank_row() {
        label.push_str(" blank_row");
    }
    Cell::new(label).fg(Color::Blue)
}

fn fieldset_label(position: usize, fieldset: &Fieldset) -> String {
    let mut label = position.to_string();
    if fieldset.new_row() {
        label.push_str(" new_row");
    }
    if fieldset.keep_in_row() {
        label.push_str(" keep_in_row");
    }
    label
}

fn filters_cell(fieldset: &Fieldset) -> Cell {
    if fieldset.include_filters().is_empty() {
        return dim_cell("-");
    }
    let patterns: Vec<String> = fieldset
        .include_filters()
        .iter()
        .map(|filter| format!("\"{}\"", filter.pattern()))
        .collect();
    Cell::new(patterns.join(", "))
}

fn fields_text(fieldset: &Fieldset) -> String {
    let fields: Vec<String> = fieldset
        .fields()
        .iter()
        .map(ToString::to_string)
        .collect();
    fields.join("\n")
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

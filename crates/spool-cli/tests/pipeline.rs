//! Integration tests for listing processing from files.

use std::fs;
use std::path::{Path, PathBuf};

use spool_cli::pipeline::{ProcessOptions, load_report, run};
use spool_output::OutputFormat;

const DEFINITION: &str = r#"
title Stock
exclude_filters "^-+$"
section
  header fieldset const "Code" const "Units"
  body fieldset include_filters "IT" string 3 8 as code integer 8 12 as units
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn processes_each_listing_into_its_own_file() {
    let dir = tempfile::tempdir().unwrap();
    let definition = write(dir.path(), "stock.def", DEFINITION);
    let first = write(dir.path(), "north.lst", "IT A001    5\n--------\nIT B002   12\n");
    let second = write(dir.path(), "south.lst", "IT C003    1\n");
    let out = dir.path().join("out");

    let options = ProcessOptions::default()
        .with_output_dir(&out)
        .with_format(OutputFormat::Csv)
        .with_keep_extension(true);
    let result = run(&definition, &[first, second], &options).unwrap();

    assert!(!result.has_errors());
    assert_eq!(result.title, "Stock");
    assert_eq!(result.listings.len(), 2);
    let north = &result.listings[0];
    assert_eq!(north.output.as_deref(), Some(out.join("north.lst.csv").as_path()));
    let summary = north.summary.unwrap();
    assert_eq!((summary.lines, summary.excluded, summary.rows), (3, 1, 3));

    let csv = fs::read_to_string(out.join("north.lst.csv")).unwrap();
    assert_eq!(csv, "Code;Units\nA001;5\nB002;12\n");
    let csv = fs::read_to_string(out.join("south.lst.csv")).unwrap();
    assert_eq!(csv, "Code;Units\nC003;1\n");
}

#[test]
fn failing_listings_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let definition = write(dir.path(), "stock.def", DEFINITION);
    let bad = write(dir.path(), "bad.lst", "IT A001   x5\n");
    let missing = dir.path().join("missing.lst");
    let good = write(dir.path(), "good.lst", "IT A001    5\n");

    let options = ProcessOptions::default()
        .with_output_dir(dir.path())
        .with_format(OutputFormat::Json);
    let result = run(&definition, &[bad, missing, good], &options).unwrap();

    assert!(result.has_errors());
    let errors: Vec<&str> = result
        .listings
        .iter()
        .filter_map(|listing| listing.error.as_deref())
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("line 1, field units"));
    assert!(errors[1].contains("missing.lst"));
    assert!(result.listings[2].is_ok());
    assert!(dir.path().join("good.json").exists());
    assert!(!dir.path().join("bad.json").exists());
}

#[test]
fn invalid_definitions_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let definition = write(dir.path(), "broken.def", "title t\nsection body fieldset\n");
    let err = load_report(&definition).unwrap_err();
    assert!(format!("{err:#}").contains("broken.def"));
    assert!(err.downcast_ref::<spool_engine::ReportError>().is_some());
}

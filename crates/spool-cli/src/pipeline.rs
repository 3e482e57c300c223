//! Processing of listing files with a loaded report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::{error, info, info_span};

use spool_engine::{PassSummary, Report};
use spool_output::{OutputFormat, RenderOptions, output_file_name, render};

/// How listings are turned into output files.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Prefix output names with the processing time.
    pub time_stamp: bool,
    /// Keep the listing's extension before the output extension.
    pub keep_extension: bool,
    pub render: RenderOptions,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: OutputFormat::default(),
            time_stamp: false,
            keep_extension: false,
            render: RenderOptions::default(),
        }
    }
}

impl ProcessOptions {
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_time_stamp(mut self, enable: bool) -> Self {
        self.time_stamp = enable;
        self
    }

    #[must_use]
    pub fn with_keep_extension(mut self, enable: bool) -> Self {
        self.keep_extension = enable;
        self
    }

    #[must_use]
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Output path for `input`, stamped with `time_stamp` when requested.
    pub fn output_path(&self, input: &Path, time_stamp: NaiveDateTime) -> PathBuf {
        let stamp = self.time_stamp.then_some(time_stamp);
        self.output_dir.join(output_file_name(
            input,
            self.format,
            stamp,
            self.keep_extension,
        ))
    }
}

/// Outcome of one listing.
#[derive(Debug)]
pub struct ListingResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub summary: Option<PassSummary>,
    /// Error chain when the listing failed.
    pub error: Option<String>,
}

impl ListingResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a `process` run.
#[derive(Debug)]
pub struct RunResult {
    pub definition: PathBuf,
    pub title: String,
    pub format: OutputFormat,
    pub output_dir: PathBuf,
    pub listings: Vec<ListingResult>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.listings.iter().any(|listing| !listing.is_ok())
    }
}

/// Reads and builds a report definition.
///
/// # Errors
///
/// Fails when the file cannot be read or does not define a valid report.
pub fn load_report(path: &Path) -> Result<Report> {
    Report::from_file(path)
        .with_context(|| format!("load report definition {}", path.display()))
}

/// Loads `definition` once and processes every listing with it.
///
/// A failing listing does not stop the others; its error is kept in the
/// result.
///
/// # Errors
///
/// Fails when the definition cannot be loaded or the output directory cannot
/// be created.
pub fn run(definition: &Path, inputs: &[PathBuf], options: &ProcessOptions) -> Result<RunResult> {
    let mut report = load_report(definition)?;
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!("create output directory {}", options.output_dir.display())
    })?;
    let listings = process_listings(&mut report, inputs, options);
    Ok(RunResult {
        definition: definition.to_path_buf(),
        title: report.title().to_string(),
        format: options.format,
        output_dir: options.output_dir.clone(),
        listings,
    })
}

/// Processes each listing in turn with the same report.
pub fn process_listings(
    report: &mut Report,
    inputs: &[PathBuf],
    options: &ProcessOptions,
) -> Vec<ListingResult> {
    inputs
        .iter()
        .map(|input| {
            let path = options.output_path(input, Local::now().naive_local());
            match process_listing(report, input, &path, options) {
                Ok(summary) => ListingResult {
                    input: input.clone(),
                    output: Some(path),
                    summary: Some(summary),
                    error: None,
                },
                Err(err) => {
                    error!(input = %input.display(), "{err:#}");
                    ListingResult {
                        input: input.clone(),
                        output: None,
                        summary: None,
                        error: Some(format!("{err:#}")),
                    }
                }
            }
        })
        .collect()
}

/// Runs one pass over `input` and renders it to `output`.
///
/// # Errors
///
/// Fails on unreadable listings, values that do not follow their format and
/// output errors.
pub fn process_listing(
    report: &mut Report,
    input: &Path,
    output: &Path,
    options: &ProcessOptions,
) -> Result<PassSummary> {
    let span = info_span!("listing", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let summary = report
        .process_file(input)
        .with_context(|| format!("process {}", input.display()))?;
    render(report, options.format, output, &options.render)?;
    info!(
        output = %output.display(),
        rows = summary.rows,
        duration_ms = start.elapsed().as_millis(),
        "output written"
    );
    Ok(summary)
}

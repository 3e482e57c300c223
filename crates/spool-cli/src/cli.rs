//! Command line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use spool_output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "spool",
    version,
    about = "Turn fixed-layout text listings into spreadsheets",
    long_about = "Turn fixed-layout text listings into spreadsheets.\n\n\
                  A report definition selects lines with regular expressions, slices\n\
                  them into typed fields and lays them out as header, body and footer\n\
                  rows. Outputs: XLSX, CSV, JSON, XML and HTML."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process listings with a report definition.
    Process(ProcessArgs),

    /// Load a report definition and print its structure.
    Check(CheckArgs),

    /// Normalize the formulas of a file, one per line.
    Formula(FormulaArgs),
}

#[derive(Parser)]
pub struct ProcessArgs {
    /// Report definition describing the listings.
    #[arg(short = 'c', long = "conf-file", value_name = "DEFINITION")]
    pub conf_file: PathBuf,

    /// Directory for the generated files.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value = "xlsx")]
    pub format: OutputFormatArg,

    /// Prefix output names with the processing time.
    #[arg(short = 't', long = "time-stamp")]
    pub time_stamp: bool,

    /// Keep the listing's extension in output names.
    #[arg(short = 'k', long = "keep-extension")]
    pub keep_extension: bool,

    /// Worksheet name of xlsx outputs.
    #[arg(long = "sheet-name", value_name = "NAME")]
    pub sheet_name: Option<String>,

    /// Listings to process.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Report definition to load.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,
}

#[derive(Parser)]
pub struct FormulaArgs {
    /// File with one formula per line.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Xlsx,
    Csv,
    Json,
    Xml,
    Html,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Xlsx => OutputFormat::Xlsx,
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Xml => OutputFormat::Xml,
            OutputFormatArg::Html => OutputFormat::Html,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

//! `spool`: turn text listings into spreadsheets.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use spool_cli::logging::{LogConfig, LogFormat, init_logging};
use spool_engine::ReportError;
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_formula, run_process};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Process(args) => match run_process(args) {
            Ok(result) => {
                print_summary(&result);
                if result.has_errors() { 1 } else { 0 }
            }
            Err(error) => report_failure(&error),
        },
        Command::Check(args) => match run_check(args) {
            Ok(()) => 0,
            Err(error) => report_failure(&error),
        },
        Command::Formula(args) => match run_formula(args) {
            Ok(0) => 0,
            Ok(_) => 1,
            Err(error) => report_failure(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_failure(error: &anyhow::Error) -> i32 {
    error!("{error:#}");
    eprintln!("error: {error:#}");
    if let Some(ReportError::Syntax(syntax)) = error.downcast_ref::<ReportError>() {
        eprintln!("{}", syntax.pointer());
    }
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level_filter(cli.verbosity.tracing_level_filter())
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_log_file(cli.log_file.clone());
    if let Some(level) = cli.log_level {
        config = config.with_level_filter(match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        });
    }
    config = config.with_format(match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    });
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config.with_ansi(with_ansi)
}

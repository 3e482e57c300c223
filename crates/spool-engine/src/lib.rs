//! Listing processing engine.
//!
//! A [`Report`] is built from a report definition and then fed the lines of
//! a listing. Each line is tested against the exclude filters, dispatched to
//! the first body fieldset whose include filter matches, and laid out into
//! the cell groups of the grid:
//!
//! ```no_run
//! use spool_engine::Report;
//!
//! let mut report = Report::from_file("balance.def")?;
//! let summary = report.process_file("balance.txt")?;
//! println!("{} rows in {} groups", summary.rows, summary.groups);
//! # Ok::<(), spool_engine::ReportError>(())
//! ```

pub mod error;
mod layout;
pub mod listing;
pub mod report;

pub use error::ReportError;
pub use listing::ListingReader;
pub use report::{PassSummary, Report, Route};

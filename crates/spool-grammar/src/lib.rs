//! Parsers for the report definition language.
//!
//! Three grammars live here:
//!
//! - [`parse_report`]: the report definition (title, filters, styles, sections)
//! - [`parse_formula`]: spreadsheet formulas embedded in `function` fields
//! - the style block, parsed as part of a report into [`spool_model::Style`]
//!
//! Parsing produces an [`ast::ReportDefinition`]; semantic checks (bounds,
//! repeat counts, filter patterns) are left to the model.

pub mod ast;
pub mod error;
mod formula;
mod report;
mod style;
mod token;

pub use ast::{FieldDef, FieldSpec, FieldsetDef, ReportDefinition, SectionDef};
pub use error::{SyntaxError, SyntaxKind};
pub use formula::parse_formula;
pub use report::parse_report;

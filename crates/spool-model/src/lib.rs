//! Semantic model for listing reports.
//!
//! This crate holds the pieces a report definition is built from and the grid
//! a processed listing turns into:
//!
//! - [`numeric`]: locale-aware numeric formats and their registry
//! - [`field`], [`section`], [`filter`]: fields, fieldsets, sections, line filters
//! - [`grid`]: cells, rows and cell groups produced by a pass
//! - [`address`]: spreadsheet row/column naming
//! - [`style`]: cell style records
//! - [`encoding`]: listing encodings

pub mod address;
pub mod encoding;
pub mod error;
pub mod field;
pub mod filter;
pub mod grid;
pub mod numeric;
pub mod section;
pub mod style;

pub use address::{cell_address, column_index, column_name, excel_row};
pub use encoding::Encoding;
pub use error::{FieldDefinitionError, FormatMismatch, MismatchReason};
pub use field::{ColumnRange, ConstValue, Extraction, Field, FieldKind, FieldType};
pub use filter::LineFilter;
pub use grid::{Cell, CellGroup, CellValue, Row, resolve_relative};
pub use numeric::{Number, NumericFormat, NumericKind, NumericRegistry, NumericTag};
pub use section::{Fieldset, FieldsetRole, Section};
pub use style::{Border, Color, ColorName, HorizontalAlign, Style, VerticalAlign};

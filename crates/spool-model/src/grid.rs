//! The output grid: cells, rows and cell groups.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use crate::address::{cell_address, column_name, excel_row};
use crate::field::{Field, FieldKind};
use crate::numeric::Number;
use crate::section::FieldsetRole;

static ROW_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ROW:(?P<offset>[+-]?\d+)>").expect("valid row offset regex"));
static COL_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<COL:(?P<offset>[+-]?\d+)>").expect("valid col offset regex"));

/// Rendered for a relative reference that points before `A1`.
pub const INVALID_REFERENCE: &str = "#REF!";

/// Typed content of a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(Number),
    /// Formula text or the literal produced by a `function` field.
    Formula(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) | CellValue::Formula(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            CellValue::Number(number) => Some(number),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) | CellValue::Formula(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Rewrites `<ROW:n>` and `<COL:n>` markers relative to the 0-based `(row, col)`.
///
/// Offsets landing before the first row or column render as `#REF!`.
pub fn resolve_relative(formula: &str, row: usize, col: usize) -> String {
    let resolved = ROW_OFFSET.replace_all(formula, |caps: &Captures<'_>| {
        match shift(excel_row(row), &caps["offset"]) {
            Some(target) if target >= 1 => target.to_string(),
            _ => INVALID_REFERENCE.to_string(),
        }
    });
    COL_OFFSET
        .replace_all(&resolved, |caps: &Captures<'_>| {
            shift(col, &caps["offset"]).map_or_else(|| INVALID_REFERENCE.to_string(), column_name)
        })
        .into_owned()
}

fn shift(base: usize, offset: &str) -> Option<usize> {
    let offset: i64 = offset.parse().ok()?;
    let base = i64::try_from(base).ok()?;
    usize::try_from(base.checked_add(offset)?).ok()
}

/// One positioned value of the grid.
#[derive(Debug, Clone)]
pub struct Cell {
    row: usize,
    col: usize,
    field: Arc<Field>,
    raw: Option<String>,
    value: CellValue,
}

impl Cell {
    pub fn new(
        row: usize,
        col: usize,
        field: Arc<Field>,
        raw: Option<String>,
        value: CellValue,
    ) -> Self {
        Self {
            row,
            col,
            field,
            raw,
            value,
        }
    }

    /// 0-based row.
    pub fn row(&self) -> usize {
        self.row
    }

    /// 0-based column.
    pub fn col(&self) -> usize {
        self.col
    }

    pub fn excel_row(&self) -> usize {
        excel_row(self.row)
    }

    pub fn excel_col(&self) -> String {
        column_name(self.col)
    }

    /// `A1`-style address.
    pub fn address(&self) -> String {
        cell_address(self.row, self.col)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Text before transformation, `None` for blank padding cells.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Stored value, with relative markers of formulas resolved against this
    /// cell's position.
    pub fn value(&self) -> Cow<'_, CellValue> {
        match &self.value {
            CellValue::Formula(text) if text.contains('<') => Cow::Owned(CellValue::Formula(
                resolve_relative(text, self.row, self.col),
            )),
            value => Cow::Borrowed(value),
        }
    }

    /// Name used by non-spreadsheet outputs.
    pub fn name(&self) -> String {
        match (self.field.name(), self.field.kind()) {
            (None, _) => format!("field{}", self.col),
            (Some(name), FieldKind::Empty { repeat }) if *repeat != 1 => {
                format!("{name}{}", self.col)
            }
            (Some(name), _) => name.to_string(),
        }
    }

    pub fn style_id(&self) -> Option<&str> {
        self.field.style_id()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) = {}",
            self.address(),
            self.field.field_type(),
            self.value()
        )
    }
}

/// Cells produced by one fieldset, possibly merged across several lines.
#[derive(Debug, Clone)]
pub struct Row {
    role: FieldsetRole,
    section: usize,
    fieldset: usize,
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(role: FieldsetRole, section: usize, fieldset: usize, cells: Vec<Cell>) -> Self {
        Self {
            role,
            section,
            fieldset,
            cells,
        }
    }

    pub fn role(&self) -> FieldsetRole {
        self.role
    }

    /// Index of the owning section in the report.
    pub fn section(&self) -> usize {
        self.section
    }

    /// Index of the originating fieldset within its role's list.
    pub fn fieldset(&self) -> usize {
        self.fieldset
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_header(&self) -> bool {
        self.role == FieldsetRole::Header
    }

    pub fn is_body(&self) -> bool {
        self.role == FieldsetRole::Body
    }

    pub fn is_footer(&self) -> bool {
        self.role == FieldsetRole::Footer
    }

    /// Continues the row with the cells of another line.
    pub fn extend(&mut self, role: FieldsetRole, fieldset: usize, cells: Vec<Cell>) {
        self.role = role;
        self.fieldset = fieldset;
        self.cells.extend(cells);
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// One occurrence of a section in the listing.
#[derive(Debug, Clone)]
pub struct CellGroup {
    index: usize,
    section: usize,
    base_row: usize,
    header_rows: usize,
    rows: Vec<Row>,
}

impl CellGroup {
    pub fn new(index: usize, section: usize, base_row: usize, header_rows: usize) -> Self {
        Self {
            index,
            section,
            base_row,
            header_rows,
            rows: Vec::new(),
        }
    }

    /// Position of this group in the pass.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn section(&self) -> usize {
        self.section
    }

    /// First output row, header included.
    pub fn base_row(&self) -> usize {
        self.base_row
    }

    /// First body row (0-based), after the group's header rows.
    pub fn start_row(&self) -> usize {
        self.base_row + self.header_rows
    }

    pub fn excel_start_row(&self) -> usize {
        excel_row(self.start_row())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn last_row_mut(&mut self) -> Option<&mut Row> {
        self.rows.last_mut()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }
}

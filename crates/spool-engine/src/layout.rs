//! Grid layout state for one pass over a listing.
//!
//! The state owns the row counter and the cell groups built so far. Rows are
//! laid out in output order: a group starts with its header rows, continues
//! with body rows and ends with its footer rows, optionally followed by one
//! blank row.

use std::sync::Arc;

use tracing::debug;

use spool_model::{
    Cell, CellGroup, CellValue, ConstValue, Field, FieldKind, Fieldset, FieldsetRole, Row,
    Section,
};

use crate::error::ReportError;

#[derive(Debug, Default)]
pub(crate) struct LayoutState {
    /// Next output row (0-based).
    row: usize,
    active: Option<CellGroup>,
    groups: Vec<CellGroup>,
    /// The last stored row is still open for the next matching line.
    same_row: bool,
    /// 1-based number of the line being processed.
    line_number: usize,
}

impl LayoutState {
    pub(crate) fn row(&self) -> usize {
        self.row
    }

    pub(crate) fn line_number(&self) -> usize {
        self.line_number
    }

    pub(crate) fn next_line(&mut self) -> usize {
        self.line_number += 1;
        self.line_number
    }

    /// Section index of the group being filled.
    pub(crate) fn active_section(&self) -> Option<usize> {
        self.active.as_ref().map(CellGroup::section)
    }

    pub(crate) fn group_count(&self) -> usize {
        self.groups.len() + usize::from(self.active.is_some())
    }

    /// Starts a group for `section` at the current row and lays out its header.
    pub(crate) fn open_group(
        &mut self,
        index: usize,
        section: &Section,
        line: &str,
    ) -> Result<(), ReportError> {
        let group = CellGroup::new(self.group_count(), index, self.row, section.header().len());
        debug!(
            group = group.index(),
            section = index,
            start_row = group.start_row(),
            "opening cell group"
        );
        self.active = Some(group);
        for (position, fieldset) in section.header().iter().enumerate() {
            self.store(FieldsetRole::Header, position, fieldset, line)?;
        }
        Ok(())
    }

    /// Finishes the active group: closes a kept row, lays out the footer and
    /// skips a row when the section asks for a blank one.
    ///
    /// `line` is the record the footer is built from. The trailing blank row
    /// is only added when another group follows.
    pub(crate) fn close_group(
        &mut self,
        sections: &[Section],
        line: &str,
        followed: bool,
    ) -> Result<(), ReportError> {
        let Some(index) = self.active_section() else {
            return Ok(());
        };
        if self.same_row {
            self.row += 1;
            self.same_row = false;
        }
        let section = &sections[index];
        for (position, fieldset) in section.footer().iter().enumerate() {
            self.store(FieldsetRole::Footer, position, fieldset, line)?;
        }
        if followed && section.blank_row() {
            self.row += 1;
        }
        if let Some(group) = self.active.take() {
            debug!(
                group = group.index(),
                section = index,
                rows = group.rows().len(),
                "closing cell group"
            );
            self.groups.push(group);
        }
        Ok(())
    }

    /// Lays out the fields of `fieldset` for `line` in the active group.
    pub(crate) fn store(
        &mut self,
        role: FieldsetRole,
        position: usize,
        fieldset: &Fieldset,
        line: &str,
    ) -> Result<(), ReportError> {
        if self.same_row && fieldset.new_row() {
            self.row += 1;
            self.same_row = false;
        }
        let Some(group) = self.active.as_mut() else {
            return Ok(());
        };
        let extend = self.same_row;
        let mut col = if extend {
            group
                .rows()
                .last()
                .and_then(|row| row.cells().last())
                .map_or(0, |cell| cell.col() + 1)
        } else {
            0
        };

        let mut cells = Vec::with_capacity(fieldset.fields().len());
        for field in fieldset.fields() {
            match field.kind() {
                FieldKind::Extracted { extraction, range } => {
                    let raw = range.slice(line);
                    let value = extraction.transform(raw).map_err(|source| {
                        ReportError::FormatMismatch {
                            path: None,
                            line_number: self.line_number,
                            field: field_label(field, col),
                            source,
                        }
                    })?;
                    cells.push(Cell::new(self.row, col, Arc::clone(field), Some(raw.to_string()), value));
                    col += 1;
                }
                FieldKind::Empty { repeat } => {
                    for _ in 0..*repeat {
                        cells.push(Cell::new(self.row, col, Arc::clone(field), None, CellValue::Empty));
                        col += 1;
                    }
                }
                FieldKind::Const(value) => {
                    let value = match value {
                        ConstValue::Text(text) => CellValue::Text(text.clone()),
                        ConstValue::Number(number) => CellValue::Number(number.clone()),
                    };
                    cells.push(Cell::new(self.row, col, Arc::clone(field), None, value));
                    col += 1;
                }
                FieldKind::Function(formula) => {
                    let text = formula
                        .replace("<STARTROW>", &group.excel_start_row().to_string())
                        .replace("<ROWS>", &self.row.to_string());
                    cells.push(Cell::new(
                        self.row,
                        col,
                        Arc::clone(field),
                        Some(formula.clone()),
                        CellValue::Formula(text),
                    ));
                    col += 1;
                }
            }
        }

        if cells.is_empty() {
            return Ok(());
        }
        match group.last_row_mut() {
            Some(row) if extend => row.extend(role, position, cells),
            _ => group.push(Row::new(role, group.section(), position, cells)),
        }
        if fieldset.keep_in_row() {
            self.same_row = true;
        } else {
            self.same_row = false;
            self.row += 1;
        }
        Ok(())
    }

    /// Groups laid out so far, the active one included.
    pub(crate) fn into_groups(mut self) -> Vec<CellGroup> {
        if let Some(group) = self.active.take() {
            self.groups.push(group);
        }
        self.groups
    }
}

fn field_label(field: &Field, col: usize) -> String {
    field
        .name()
        .map_or_else(|| format!("field{col}"), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spool_model::{Extraction, LineFilter};

    fn body(fields: Vec<Field>, keep_in_row: bool, new_row: bool) -> Fieldset {
        Fieldset::body(
            fields,
            vec![LineFilter::new("X").unwrap()],
            new_row,
            keep_in_row,
        )
    }

    fn text(index: usize, left: i64, right: i64) -> Field {
        Field::extracted(index, Extraction::String, left, right).unwrap()
    }

    #[test]
    fn kept_rows_continue_at_next_column() {
        let section = Section::new(false, false);
        let mut state = LayoutState::default();
        state.open_group(0, &section, "").unwrap();

        let first = body(vec![text(0, 0, 2), Field::empty(1, 2).unwrap()], true, false);
        let second = body(vec![text(0, 2, 4)], false, false);
        state.store(FieldsetRole::Body, 0, &first, "abcd").unwrap();
        assert_eq!(state.row(), 0);
        state.store(FieldsetRole::Body, 1, &second, "abcd").unwrap();
        assert_eq!(state.row(), 1);

        let groups = state.into_groups();
        let row = &groups[0].rows()[0];
        assert_eq!(row.len(), 4);
        assert_eq!(row.cells()[3].col(), 3);
        assert_eq!(row.cells()[3].value().as_str(), Some("cd"));
        assert_eq!(row.fieldset(), 1);
    }

    #[test]
    fn new_row_breaks_a_kept_row() {
        let section = Section::new(false, false);
        let mut state = LayoutState::default();
        state.open_group(0, &section, "").unwrap();

        let kept = body(vec![text(0, 0, 1)], true, false);
        let fresh = body(vec![text(0, 1, 2)], false, true);
        state.store(FieldsetRole::Body, 0, &kept, "ab").unwrap();
        state.store(FieldsetRole::Body, 1, &fresh, "ab").unwrap();

        let groups = state.into_groups();
        assert_eq!(groups[0].rows().len(), 2);
        assert_eq!(groups[0].rows()[1].cells()[0].row(), 1);
    }

    #[test]
    fn formulas_see_group_start_and_current_row() {
        let mut section = Section::new(false, false);
        section.push(Fieldset::header(vec![Field::constant(
            0,
            ConstValue::Text("Total".into()),
        )]));
        let mut state = LayoutState::default();
        state.open_group(0, &section, "").unwrap();

        let sum = body(
            vec![Field::function(0, "=SUM(A<STARTROW>:A<ROWS>)")],
            false,
            false,
        );
        state.store(FieldsetRole::Body, 0, &sum, "").unwrap();

        let groups = state.into_groups();
        let cell = &groups[0].rows()[1].cells()[0];
        assert_eq!(cell.value().as_str(), Some("=SUM(A2:A1)"));
        assert_eq!(cell.raw(), Some("=SUM(A<STARTROW>:A<ROWS>)"));
    }
}

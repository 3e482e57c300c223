//! Fieldsets and sections.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::filter::LineFilter;

/// Where a fieldset sits within its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldsetRole {
    Header,
    Body,
    Footer,
}

impl fmt::Display for FieldsetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldsetRole::Header => "header",
            FieldsetRole::Body => "body",
            FieldsetRole::Footer => "footer",
        })
    }
}

/// Fields applied together against one matching input line.
#[derive(Debug, Clone)]
pub struct Fieldset {
    role: FieldsetRole,
    fields: Vec<Arc<Field>>,
    include_filters: Vec<LineFilter>,
    new_row: bool,
    keep_in_row: bool,
}

impl Fieldset {
    pub fn header(fields: Vec<Field>) -> Self {
        Self::special(FieldsetRole::Header, fields)
    }

    pub fn footer(fields: Vec<Field>) -> Self {
        Self::special(FieldsetRole::Footer, fields)
    }

    /// Body fieldset selected by its include filters.
    pub fn body(
        fields: Vec<Field>,
        include_filters: Vec<LineFilter>,
        new_row: bool,
        keep_in_row: bool,
    ) -> Self {
        Self {
            role: FieldsetRole::Body,
            fields: fields.into_iter().map(Arc::new).collect(),
            include_filters,
            new_row,
            keep_in_row,
        }
    }

    fn special(role: FieldsetRole, fields: Vec<Field>) -> Self {
        Self {
            role,
            fields: fields.into_iter().map(Arc::new).collect(),
            include_filters: Vec::new(),
            new_row: false,
            keep_in_row: false,
        }
    }

    pub fn role(&self) -> FieldsetRole {
        self.role
    }

    pub fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }

    pub fn include_filters(&self) -> &[LineFilter] {
        &self.include_filters
    }

    /// Forces a fresh output row even when the previous line kept its row open.
    pub fn new_row(&self) -> bool {
        self.new_row
    }

    /// Leaves the row open so the next matching line continues it.
    pub fn keep_in_row(&self) -> bool {
        self.keep_in_row
    }

    pub fn is_header(&self) -> bool {
        self.role == FieldsetRole::Header
    }

    pub fn is_footer(&self) -> bool {
        self.role == FieldsetRole::Footer
    }

    pub fn is_body(&self) -> bool {
        self.role == FieldsetRole::Body
    }
}

/// A region of the report grouping header, body and footer fieldsets.
#[derive(Debug, Clone, Default)]
pub struct Section {
    header: Vec<Fieldset>,
    body: Vec<Fieldset>,
    footer: Vec<Fieldset>,
    process_only_one_time: bool,
    blank_row: bool,
    processed: bool,
}

impl Section {
    pub fn new(process_only_one_time: bool, blank_row: bool) -> Self {
        Self {
            process_only_one_time,
            blank_row,
            ..Self::default()
        }
    }

    /// Appends a fieldset to the list matching its role.
    pub fn push(&mut self, fieldset: Fieldset) {
        match fieldset.role() {
            FieldsetRole::Header => self.header.push(fieldset),
            FieldsetRole::Body => self.body.push(fieldset),
            FieldsetRole::Footer => self.footer.push(fieldset),
        }
    }

    pub fn header(&self) -> &[Fieldset] {
        &self.header
    }

    pub fn body(&self) -> &[Fieldset] {
        &self.body
    }

    pub fn footer(&self) -> &[Fieldset] {
        &self.footer
    }

    pub fn fieldsets(&self, role: FieldsetRole) -> &[Fieldset] {
        match role {
            FieldsetRole::Header => &self.header,
            FieldsetRole::Body => &self.body,
            FieldsetRole::Footer => &self.footer,
        }
    }

    pub fn has_header(&self) -> bool {
        !self.header.is_empty()
    }

    pub fn has_footer(&self) -> bool {
        !self.footer.is_empty()
    }

    /// Only the first occurrence in a listing produces output.
    pub fn process_only_one_time(&self) -> bool {
        self.process_only_one_time
    }

    /// Skip one output row after each occurrence.
    pub fn blank_row(&self) -> bool {
        self.blank_row
    }

    pub fn processed(&self) -> bool {
        self.processed
    }

    pub fn mark_processed(&mut self) {
        self.processed = true;
    }

    pub fn reset_processed(&mut self) {
        self.processed = false;
    }

    /// True when a matching line must be dropped.
    pub fn is_exhausted(&self) -> bool {
        self.process_only_one_time && self.processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ConstValue;

    #[test]
    fn push_routes_by_role() {
        let mut section = Section::new(true, false);
        section.push(Fieldset::header(vec![Field::constant(
            0,
            ConstValue::Text("Code".into()),
        )]));
        section.push(Fieldset::body(
            vec![Field::function(0, "=1")],
            vec![LineFilter::new("X").unwrap()],
            false,
            true,
        ));
        assert!(section.has_header());
        assert!(!section.has_footer());
        assert_eq!(section.body().len(), 1);
        assert!(section.body()[0].keep_in_row());

        assert!(!section.is_exhausted());
        section.mark_processed();
        assert!(section.is_exhausted());
        section.reset_processed();
        assert!(!section.processed());
    }
}

//! Parsed report definitions.
//!
//! The tree mirrors the text closely. Bounds and repeat counts are kept as
//! written so the model can reject them with its own errors.

use spool_model::{ConstValue, Encoding, Extraction, Style};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDefinition {
    pub title: String,
    pub description: Option<String>,
    pub encoding: Option<Encoding>,
    pub columns_width: Vec<u32>,
    pub exclude_filters: Vec<String>,
    pub styles: Vec<Style>,
    pub sections: Vec<SectionDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionDef {
    pub process_only_one_time: bool,
    pub blank_row: bool,
    pub header: Vec<FieldsetDef>,
    pub body: Vec<FieldsetDef>,
    pub footer: Vec<FieldsetDef>,
}

/// A fieldset as written. Header and footer fieldsets have no filters or flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldsetDef {
    pub include_filters: Vec<String>,
    pub new_row: bool,
    pub keep_in_row: bool,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub spec: FieldSpec,
    pub name: Option<String>,
    pub style_id: Option<String>,
    /// 1-based line of the field in the definition.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    Extracted {
        extraction: Extraction,
        left: i64,
        right: i64,
    },
    Empty {
        repeat: i64,
    },
    Const(ConstValue),
    /// Normalized formula.
    Function(String),
}

impl ReportDefinition {
    /// Number of fields across every fieldset.
    pub fn field_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| {
                section
                    .header
                    .iter()
                    .chain(&section.body)
                    .chain(&section.footer)
            })
            .map(|fieldset| fieldset.fields.len())
            .sum()
    }
}

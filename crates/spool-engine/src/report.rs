//! Report: a loaded definition plus the grid of its last pass.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info, trace, warn};

use spool_grammar::{FieldDef, FieldSpec, FieldsetDef, ReportDefinition, parse_report};
use spool_model::{
    CellGroup, Encoding, Field, FieldDefinitionError, Fieldset, FieldsetRole, LineFilter, Section,
    Style,
};

use crate::error::ReportError;
use crate::layout::LayoutState;
use crate::listing::ListingReader;

/// Include filter routing matching lines to a body fieldset.
#[derive(Debug, Clone)]
pub struct Route {
    filter: LineFilter,
    section: usize,
    fieldset: usize,
}

impl Route {
    pub fn filter(&self) -> &LineFilter {
        &self.filter
    }

    pub fn section(&self) -> usize {
        self.section
    }

    /// Index within the section's body fieldsets.
    pub fn fieldset(&self) -> usize {
        self.fieldset
    }
}

/// Counters of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub lines: usize,
    pub excluded: usize,
    pub unmatched: usize,
    /// Lines of sections that are only processed once.
    pub skipped: usize,
    pub groups: usize,
    pub rows: usize,
}

/// A loaded report definition.
///
/// Built once, then used for any number of passes. Each pass replaces the
/// cell groups of the previous one; the `processed` mark of sections that are
/// only processed once survives between passes until
/// [`Report::reset_processed`] is called.
#[derive(Debug, Clone)]
pub struct Report {
    title: String,
    description: Option<String>,
    encoding: Encoding,
    columns_width: Vec<u32>,
    styles: BTreeMap<String, Style>,
    exclude_filters: Vec<LineFilter>,
    routes: Vec<Route>,
    sections: Vec<Section>,
    cell_groups: Vec<CellGroup>,
    rows: usize,
}

impl Report {
    /// Builds the model of a parsed definition.
    ///
    /// # Errors
    ///
    /// Fails on invalid field bounds or repeat counts and on filters that are
    /// not valid regular expressions.
    pub fn from_definition(definition: ReportDefinition) -> Result<Self, ReportError> {
        let ReportDefinition {
            title,
            description,
            encoding,
            columns_width,
            exclude_filters,
            styles: style_defs,
            sections: section_defs,
        } = definition;

        let mut styles = BTreeMap::new();
        for style in style_defs {
            if let Some(previous) = styles.insert(style.id.clone(), style) {
                warn!(style = %previous.id, "style defined more than once, keeping the last one");
            }
        }

        let exclude_filters = exclude_filters
            .into_iter()
            .map(compile_filter)
            .collect::<Result<Vec<_>, _>>()?;

        let mut sections = Vec::with_capacity(section_defs.len());
        let mut routes = Vec::new();
        for (index, def) in section_defs.into_iter().enumerate() {
            let mut section = Section::new(def.process_only_one_time, def.blank_row);
            for (position, fieldset) in def.header.into_iter().enumerate() {
                let fields = build_fields(index, FieldsetRole::Header, position, fieldset.fields)?;
                section.push(Fieldset::header(fields));
            }
            for (position, fieldset) in def.body.into_iter().enumerate() {
                let FieldsetDef {
                    include_filters,
                    new_row,
                    keep_in_row,
                    fields,
                } = fieldset;
                let filters = include_filters
                    .into_iter()
                    .map(compile_filter)
                    .collect::<Result<Vec<_>, _>>()?;
                routes.extend(filters.iter().map(|filter| Route {
                    filter: filter.clone(),
                    section: index,
                    fieldset: position,
                }));
                let fields = build_fields(index, FieldsetRole::Body, position, fields)?;
                section.push(Fieldset::body(fields, filters, new_row, keep_in_row));
            }
            for (position, fieldset) in def.footer.into_iter().enumerate() {
                let fields = build_fields(index, FieldsetRole::Footer, position, fieldset.fields)?;
                section.push(Fieldset::footer(fields));
            }
            sections.push(section);
        }

        let report = Self {
            title,
            description,
            encoding: encoding.unwrap_or_default(),
            columns_width,
            styles,
            exclude_filters,
            routes,
            sections,
            cell_groups: Vec::new(),
            rows: 0,
        };
        report.warn_undefined_styles();
        debug!(
            title = %report.title,
            sections = report.sections.len(),
            routes = report.routes.len(),
            encoding = %report.encoding,
            "report loaded"
        );
        Ok(report)
    }

    /// Reads and builds a definition file (UTF-8).
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or the definition is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    fn warn_undefined_styles(&self) {
        let fields = self.sections.iter().flat_map(|section| {
            section
                .header()
                .iter()
                .chain(section.body())
                .chain(section.footer())
                .flat_map(Fieldset::fields)
        });
        for field in fields {
            if let Some(style_id) = field.style_id()
                && !self.styles.contains_key(style_id)
            {
                warn!(style = style_id, field = %field, "field refers to an undefined style");
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Encoding of the listings; utf-8 unless the definition says otherwise.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn columns_width(&self) -> &[u32] {
        &self.columns_width
    }

    pub fn styles(&self) -> &BTreeMap<String, Style> {
        &self.styles
    }

    pub fn style(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    pub fn exclude_filters(&self) -> &[LineFilter] {
        &self.exclude_filters
    }

    /// Include filters in dispatch order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Groups produced by the last pass.
    pub fn cell_groups(&self) -> &[CellGroup] {
        &self.cell_groups
    }

    /// Row counter at the end of the last pass.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Lets sections that are only processed once produce output again.
    pub fn reset_processed(&mut self) {
        for section in &mut self.sections {
            section.reset_processed();
        }
    }

    /// Runs a pass over in-memory lines.
    ///
    /// # Errors
    ///
    /// Stops at the first extracted value that does not follow its numeric
    /// format; the groups built up to that line stay available.
    pub fn process<I, S>(&mut self, lines: I) -> Result<PassSummary, ReportError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(lines.into_iter().map(|line| Ok(line.into())), None)
    }

    /// Runs a pass over a listing file decoded with the report's encoding.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors and on values that do not follow their numeric
    /// format.
    pub fn process_file(&mut self, path: impl AsRef<Path>) -> Result<PassSummary, ReportError> {
        let path = path.as_ref();
        let io_error = |source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        };
        let reader = ListingReader::open(path, self.encoding).map_err(io_error)?;
        self.run(reader.map(|line| line.map_err(io_error)), Some(path))
    }

    fn run<I>(&mut self, lines: I, path: Option<&Path>) -> Result<PassSummary, ReportError>
    where
        I: Iterator<Item = Result<String, ReportError>>,
    {
        let mut state = LayoutState::default();
        let mut summary = PassSummary::default();
        let outcome = self.consume(&mut state, &mut summary, lines);

        summary.groups = state.group_count();
        summary.rows = state.row();
        self.rows = state.row();
        let line_number = state.line_number();
        self.cell_groups = state.into_groups();

        if let Err(err) = outcome {
            let err = err.with_path(path);
            warn!(line = line_number, error = %err, "pass aborted");
            return Err(err);
        }
        info!(
            lines = summary.lines,
            excluded = summary.excluded,
            unmatched = summary.unmatched,
            skipped = summary.skipped,
            groups = summary.groups,
            rows = summary.rows,
            "listing processed"
        );
        Ok(summary)
    }

    fn consume<I>(
        &mut self,
        state: &mut LayoutState,
        summary: &mut PassSummary,
        lines: I,
    ) -> Result<(), ReportError>
    where
        I: Iterator<Item = Result<String, ReportError>>,
    {
        let mut last_line = String::new();
        for line in lines {
            let line = line?;
            state.next_line();
            summary.lines += 1;

            if self.exclude_filters.iter().any(|filter| filter.matches(&line)) {
                summary.excluded += 1;
                continue;
            }
            let Some(route) = self.routes.iter().find(|route| route.filter.matches(&line)) else {
                summary.unmatched += 1;
                continue;
            };
            let (index, position) = (route.section, route.fieldset);
            if self.sections[index].is_exhausted() {
                summary.skipped += 1;
                trace!(
                    line = state.line_number(),
                    section = index,
                    "section exhausted, line skipped"
                );
                continue;
            }
            trace!(
                line = state.line_number(),
                section = index,
                fieldset = position,
                "line routed"
            );

            if state.active_section() != Some(index) {
                state.close_group(&self.sections, &line, true)?;
                state.open_group(index, &self.sections[index], &line)?;
            }
            state.store(
                FieldsetRole::Body,
                position,
                &self.sections[index].body()[position],
                &line,
            )?;
            self.sections[index].mark_processed();
            last_line = line;
        }
        state.close_group(&self.sections, &last_line, false)
    }
}

impl FromStr for Report {
    type Err = ReportError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_definition(parse_report(text)?)
    }
}

fn compile_filter(pattern: String) -> Result<LineFilter, ReportError> {
    LineFilter::new(pattern.as_str())
        .map_err(|source| ReportError::InvalidFilter { pattern, source })
}

fn build_fields(
    section: usize,
    role: FieldsetRole,
    fieldset: usize,
    defs: Vec<FieldDef>,
) -> Result<Vec<Field>, ReportError> {
    defs.into_iter()
        .enumerate()
        .map(|(index, def)| {
            let line = def.line;
            build_field(index, def).map_err(|source| ReportError::FieldDefinition {
                section,
                role,
                fieldset,
                line,
                source,
            })
        })
        .collect()
}

fn build_field(index: usize, def: FieldDef) -> Result<Field, FieldDefinitionError> {
    let field = match def.spec {
        FieldSpec::Extracted {
            extraction,
            left,
            right,
        } => Field::extracted(index, extraction, left, right)?,
        FieldSpec::Empty { repeat } => Field::empty(index, repeat)?,
        FieldSpec::Const(value) => Field::constant(index, value),
        FieldSpec::Function(formula) => Field::function(index, formula),
    };
    Ok(field.with_name(def.name).with_style(def.style_id))
}

//! Report definition grammar.
//!
//! ```text
//! title Monthly balance
//! description
//!     Accounts listing, one line per account.
//! /description
//! encoding latin-1
//! columns_width 12 30 15
//! exclude_filters "^-+$", "PAGE"
//! style total bold border thin
//!
//! section blank_row
//!   header
//!     fieldset const "Code" const "Name" const "Balance"
//!   body
//!     fieldset include_filters "ACC" keep_in_row
//!       string 4 10 as code
//!       string 10 40
//!     fieldset include_filters " +BAL"
//!       floatdc 10 25 as balance
//!   footer
//!     fieldset empty 2 function =SUM(<col>$<startrow>:<col><rows>) :total
//! ```

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until, take_while1};
use nom::character::complete::{char, digit1, not_line_ending, one_of, space0};
use nom::combinator::{cut, map, map_opt, map_res, opt, recognize};
use nom::error::context;
use nom::multi::{many0, many1};
use nom::sequence::{pair, preceded, terminated, tuple};
use tracing::debug;

use spool_model::{ConstValue, Encoding, Extraction, FieldType, Number};

use crate::ast::{FieldDef, FieldSpec, FieldsetDef, ReportDefinition, SectionDef};
use crate::error::{SyntaxError, SyntaxKind, position};
use crate::formula::formula;
use crate::style::style;
use crate::token::{
    Failure, PResult, Reason, blank, finish, identifier, integer, keyword, lexeme, quoted,
    quoted_list, unsigned,
};

/// Parses a whole report definition.
///
/// # Errors
///
/// Returns a [`SyntaxKind::Config`] error positioned at the furthest point the
/// grammar reached. Formulas embedded in `function` fields are checked here
/// too and reported with the same kind.
pub fn parse_report(text: &str) -> Result<ReportDefinition, SyntaxError> {
    let definition = finish(SyntaxKind::Config, text, terminated(report(text), blank))?;
    debug!(
        title = %definition.title,
        sections = definition.sections.len(),
        styles = definition.styles.len(),
        fields = definition.field_count(),
        "parsed report definition"
    );
    Ok(definition)
}

fn report<'a>(source: &'a str) -> impl FnMut(&'a str) -> PResult<'a, ReportDefinition> {
    move |input| {
        let (input, title) = preceded(keyword("title"), title_text)(input)?;
        let (input, description) = opt(preceded(keyword("description"), cut(description)))(input)?;
        let (input, encoding) = opt(preceded(keyword("encoding"), cut(encoding)))(input)?;
        let (input, columns_width) = opt(preceded(
            keyword("columns_width"),
            cut(context("column width", many1(lexeme(unsigned)))),
        ))(input)?;
        let (input, exclude_filters) =
            opt(preceded(keyword("exclude_filters"), cut(quoted_list)))(input)?;
        let (input, styles) = many0(style)(input)?;
        let (input, sections) = many1(section(source))(input)?;
        Ok((
            input,
            ReportDefinition {
                title,
                description,
                encoding,
                columns_width: columns_width.unwrap_or_default(),
                exclude_filters: exclude_filters.unwrap_or_default(),
                styles,
                sections,
            },
        ))
    }
}

/// Rest of the line, `#` included.
fn title_text(input: &str) -> PResult<'_, String> {
    map(preceded(space0, not_line_ending), |text: &str| {
        text.trim().to_string()
    })(input)
}

fn description(input: &str) -> PResult<'_, String> {
    context(
        "/description",
        map(
            terminated(take_until("/description"), tag("/description")),
            |text: &str| text.trim().to_string(),
        ),
    )(input)
}

fn encoding(input: &str) -> PResult<'_, Encoding> {
    let (input, ()) = blank(input)?;
    context(
        "utf-8, ascii, latin-1, utf-16 or utf-16-le",
        map_opt(
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            Encoding::from_label,
        ),
    )(input)
}

fn section<'a>(source: &'a str) -> impl FnMut(&'a str) -> PResult<'a, SectionDef> {
    move |input| {
        let (input, _) = keyword("section")(input)?;
        let (input, [process_only_one_time, blank_row]) =
            flags(["process_only_one_time", "blank_row"])(input)?;
        let (input, header) = opt(preceded(
            keyword("header"),
            cut(many1(special_fieldset(source))),
        ))(input)?;
        let (input, body) = cut(preceded(
            keyword("body"),
            cut(many1(body_fieldset(source))),
        ))(input)?;
        let (input, footer) = opt(preceded(
            keyword("footer"),
            cut(many1(special_fieldset(source))),
        ))(input)?;
        Ok((
            input,
            SectionDef {
                process_only_one_time,
                blank_row,
                header: header.unwrap_or_default(),
                body,
                footer: footer.unwrap_or_default(),
            },
        ))
    }
}

/// Optional flags in any order, each at most once.
fn flags<'a, const N: usize>(
    names: [&'static str; N],
) -> impl FnMut(&'a str) -> PResult<'a, [bool; N]> {
    move |mut input| {
        let mut set = [false; N];
        loop {
            let (at, ()) = blank(input)?;
            let found = names.into_iter().enumerate().find_map(|(index, name)| {
                keyword(name)(at).ok().map(|(rest, _)| (index, rest))
            });
            let Some((index, rest)) = found else {
                return Ok((input, set));
            };
            if set[index] {
                return Err(nom::Err::Failure(Failure::message(
                    at,
                    "flag given more than once",
                )));
            }
            set[index] = true;
            input = rest;
        }
    }
}

/// Header or footer fieldset.
fn special_fieldset<'a>(source: &'a str) -> impl FnMut(&'a str) -> PResult<'a, FieldsetDef> {
    move |input| {
        let (input, _) = keyword("fieldset")(input)?;
        let (input, fields) = cut(many1(field(source, false)))(input)?;
        Ok((
            input,
            FieldsetDef {
                fields,
                ..FieldsetDef::default()
            },
        ))
    }
}

fn body_fieldset<'a>(source: &'a str) -> impl FnMut(&'a str) -> PResult<'a, FieldsetDef> {
    move |input| {
        let (input, _) = keyword("fieldset")(input)?;
        let (input, include_filters) =
            cut(preceded(keyword("include_filters"), quoted_list))(input)?;
        let (input, [new_row, keep_in_row]) = flags(["new_row", "keep_in_row"])(input)?;
        let (input, fields) = cut(many1(field(source, true)))(input)?;
        Ok((
            input,
            FieldsetDef {
                include_filters,
                new_row,
                keep_in_row,
                fields,
            },
        ))
    }
}

/// `<kind> [as name] [:style]`, recording the line it starts on.
fn field<'a>(
    source: &'a str,
    allow_extracted: bool,
) -> impl FnMut(&'a str) -> PResult<'a, FieldDef> {
    move |input| {
        let (start, ()) = blank(input)?;
        if !allow_extracted && extraction(start).is_ok() {
            return Err(nom::Err::Failure(Failure::message(
                start,
                "extracted field in a header or footer fieldset",
            )));
        }
        let parsed = if allow_extracted {
            alt((special_field, extracted_field))(start)
        } else {
            special_field(start)
        };
        let (input, spec) = match parsed {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => {
                return Err(nom::Err::Error(Failure {
                    input: start,
                    reason: Reason::Expected("field"),
                }));
            }
            Err(err) => return Err(err),
        };
        let (input, name) = opt(preceded(
            keyword("as"),
            cut(context("field name", lexeme(identifier))),
        ))(input)?;
        let (input, style_id) = opt(preceded(
            lexeme(char(':')),
            cut(context("style id", lexeme(identifier))),
        ))(input)?;
        let (line, _) = position(source, source.len() - start.len());
        Ok((
            input,
            FieldDef {
                spec,
                name: name.map(str::to_string),
                style_id: style_id.map(str::to_string),
                line,
            },
        ))
    }
}

fn special_field(input: &str) -> PResult<'_, FieldSpec> {
    alt((
        map(preceded(keyword("empty"), opt(lexeme(integer))), |repeat| {
            FieldSpec::Empty {
                repeat: repeat.unwrap_or(1),
            }
        }),
        map(
            preceded(
                keyword("const"),
                cut(context("quoted text or number", lexeme(const_value))),
            ),
            FieldSpec::Const,
        ),
        map(preceded(keyword("function"), cut(formula)), FieldSpec::Function),
    ))(input)
}

fn extracted_field(input: &str) -> PResult<'_, FieldSpec> {
    map(
        pair(extraction, cut(pair(bound, bound))),
        |(extraction, (left, right))| FieldSpec::Extracted {
            extraction,
            left,
            right,
        },
    )(input)
}

fn bound(input: &str) -> PResult<'_, i64> {
    lexeme(context("column bound", integer))(input)
}

fn extraction(input: &str) -> PResult<'_, Extraction> {
    map_opt(identifier, |word| match FieldType::from_keyword(word)? {
        FieldType::String => Some(Extraction::String),
        FieldType::Fixed => Some(Extraction::Fixed),
        FieldType::Numeric(tag) => Some(Extraction::Numeric(tag)),
        FieldType::Function | FieldType::Empty | FieldType::Const => None,
    })(input)
}

fn const_value(input: &str) -> PResult<'_, ConstValue> {
    alt((
        map(quoted, |text| ConstValue::Text(text.to_string())),
        map(const_number, ConstValue::Number),
    ))(input)
}

fn const_number(input: &str) -> PResult<'_, Number> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            opt(pair(char('.'), digit1)),
        ))),
        |text: &str| {
            let text = text.strip_prefix('+').unwrap_or(text);
            if text.contains('.') {
                text.parse::<f64>().map(Number::Float).map_err(|_| ())
            } else {
                text.parse::<i64>().map(Number::Integer).map_err(|_| ())
            }
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_any_order_once() {
        let (rest, set) = flags(["new_row", "keep_in_row"])(" keep_in_row new_row string").unwrap();
        assert_eq!(set, [true, true]);
        assert_eq!(rest, " string");

        let (_, set) = flags(["new_row", "keep_in_row"])("string 0 1").unwrap();
        assert_eq!(set, [false, false]);

        assert!(matches!(
            flags(["new_row", "keep_in_row"])("new_row new_row"),
            Err(nom::Err::Failure(_))
        ));
    }

    #[test]
    fn const_numbers_keep_their_kind() {
        assert_eq!(const_number("-12").unwrap().1, Number::Integer(-12));
        assert_eq!(const_number("+1.5").unwrap().1, Number::Float(1.5));
    }

    #[test]
    fn field_records_its_line() {
        let source = "\n\n  string 0 4 as code :bold";
        let (_, def) = field(source, true)(source).unwrap();
        assert_eq!(def.line, 3);
        assert_eq!(def.name.as_deref(), Some("code"));
        assert_eq!(def.style_id.as_deref(), Some("bold"));
    }
}

//! Spreadsheet formula grammar.
//!
//! Formulas are validated and normalized, never evaluated. Normalization
//! joins tokens without whitespace, upper-cases cell and range references and
//! spells relative placeholders with an explicit offset:
//!
//! | written       | normalized   |
//! |---------------|--------------|
//! | `<col>`       | `<COL:0>`    |
//! | `<row:+5>`    | `<ROW:5>`    |
//! | `<row:-1>`    | `<ROW:-1>`   |
//! | `<rows>`      | `<ROWS>`     |
//! | `<startrow>`  | `<STARTROW>` |
//!
//! A formula is a quoted text, an optionally signed number or `=` followed by
//! an expression. Function names, named ranges, sheet names and linked
//! workbook paths are kept as written.

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1, take_while_m_n};
use nom::character::complete::{alpha1, char, digit1, one_of, satisfy};
use nom::combinator::{cut, map, not, opt, recognize};
use nom::error::context;
use nom::multi::{fold_many0, many0_count, separated_list0};
use nom::sequence::{delimited, pair, preceded, separated_pair, terminated, tuple};

use crate::error::{SyntaxError, SyntaxKind};
use crate::token::{PResult, blank, finish, identifier, is_word_char, lexeme, quoted, quoted_raw};

/// Parses and normalizes one formula.
///
/// # Errors
///
/// Returns a [`SyntaxKind::Formula`] error positioned at the first token the
/// grammar cannot accept.
pub fn parse_formula(text: &str) -> Result<String, SyntaxError> {
    finish(SyntaxKind::Formula, text, terminated(formula, blank))
}

/// A formula starting after optional blanks; used by the report grammar.
pub(crate) fn formula(input: &str) -> PResult<'_, String> {
    let (input, ()) = blank(input)?;
    context(
        "formula (\"text\", number or =expression)",
        alt((
            map(quoted, str::to_string),
            signed_number,
            map(preceded(char('='), cut(expression)), |expr| format!("={expr}")),
        )),
    )(input)
}

fn signed_number(input: &str) -> PResult<'_, String> {
    // A leading `+` is dropped.
    map(pair(opt(one_of("+-")), number), |(sign, number)| match sign {
        Some('-') => format!("-{number}"),
        _ => number.to_string(),
    })(input)
}

fn number(input: &str) -> PResult<'_, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)
}

fn expression(input: &str) -> PResult<'_, String> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(lexeme(one_of("+-")), cut(term)),
        move || first.clone(),
        |mut acc, (op, term)| {
            acc.push(op);
            acc.push_str(&term);
            acc
        },
    )(input)
}

fn term(input: &str) -> PResult<'_, String> {
    let (input, first) = factor(input)?;
    fold_many0(
        pair(lexeme(one_of("*/")), cut(factor)),
        move || first.clone(),
        |mut acc, (op, factor)| {
            acc.push(op);
            acc.push_str(&factor);
            acc
        },
    )(input)
}

fn factor(input: &str) -> PResult<'_, String> {
    let (input, ()) = blank(input)?;
    context(
        "expression",
        alt((
            call,
            reference,
            map(number, str::to_string),
            map(pair(one_of("+-"), cut(expression)), |(sign, expr)| {
                format!("{sign}{expr}")
            }),
            map(
                delimited(
                    char('('),
                    cut(expression),
                    cut(context("closing parenthesis", lexeme(char(')')))),
                ),
                |expr| format!("({expr})"),
            ),
        )),
    )(input)
}

/// `name(.name)*(args)`
fn call(input: &str) -> PResult<'_, String> {
    let (input, name) = recognize(pair(identifier, many0_count(pair(char('.'), identifier))))(input)?;
    let (input, _) = lexeme(char('('))(input)?;
    let (input, args) = separated_list0(lexeme(char(',')), argument)(input)?;
    let (input, _) = cut(context("closing parenthesis", lexeme(char(')'))))(input)?;
    Ok((input, format!("{name}({})", args.join(","))))
}

/// Expression or quoted text, optionally compared with another one.
fn argument(input: &str) -> PResult<'_, String> {
    let (input, left) = operand(input)?;
    let (input, condition) = opt(pair(lexeme(relational), cut(operand)))(input)?;
    Ok((
        input,
        match condition {
            Some((op, right)) => format!("{left}{op}{right}"),
            None => left,
        },
    ))
}

fn operand(input: &str) -> PResult<'_, String> {
    alt((expression, map(lexeme(quoted_raw), str::to_string)))(input)
}

fn relational(input: &str) -> PResult<'_, &str> {
    alt((tag("<>"), tag(">="), tag("<="), tag("="), tag(">"), tag("<")))(input)
}

/// Cell, range or named range, optionally qualified by sheet and workbook.
fn reference(input: &str) -> PResult<'_, String> {
    alt((
        map(
            pair(terminated(linked_workbook, char('!')), identifier),
            |(book, name)| format!("{book}!{name}"),
        ),
        map(pair(opt(sheet), address), |(sheet, address)| match sheet {
            Some(sheet) => format!("{sheet}{address}"),
            None => address,
        }),
    ))(input)
}

/// `['book']Sheet!`
fn sheet(input: &str) -> PResult<'_, &str> {
    recognize(tuple((
        opt(linked_workbook),
        take_while_m_n(1, 31, |c: char| {
            c.is_ascii_alphanumeric() || c == '-' || c == '_'
        }),
        char('!'),
    )))(input)
}

/// `'C:\dir\book.xlsx'`, `'\\server\share\book.xlsx'`, `'smb://host/share/book.xlsx'`
fn linked_workbook(input: &str) -> PResult<'_, &str> {
    recognize(delimited(
        char('\''),
        pair(opt(workbook_path), file_name),
        char('\''),
    ))(input)
}

fn workbook_path(input: &str) -> PResult<'_, &str> {
    recognize(tuple((
        opt(alt((drive, server))),
        path_separator,
        many0_count(pair(identifier, path_separator)),
    )))(input)
}

fn drive(input: &str) -> PResult<'_, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_alphabetic()), char(':')))(input)
}

fn server(input: &str) -> PResult<'_, &str> {
    recognize(tuple((
        alt((tag("\\\\"), recognize(pair(opt(tag_no_case("smb:")), tag("//"))))),
        take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')),
        path_separator,
        identifier,
    )))(input)
}

fn path_separator(input: &str) -> PResult<'_, char> {
    one_of("\\/")(input)
}

fn file_name(input: &str) -> PResult<'_, &str> {
    recognize(pair(identifier, opt(pair(char('.'), identifier))))(input)
}

fn address(input: &str) -> PResult<'_, String> {
    alt((range, cell, map(identifier, str::to_string)))(input)
}

fn range(input: &str) -> PResult<'_, String> {
    map(separated_pair(cell, char(':'), cell), |(from, to)| {
        format!("{from}:{to}")
    })(input)
}

/// `[$]col[$]row`, upper-cased.
fn cell(input: &str) -> PResult<'_, String> {
    let (input, (col_abs, col, row_abs, row)) =
        tuple((opt(char('$')), column_id, opt(char('$')), row_id))(input)?;
    // `A1B` is a name, not a cell followed by garbage.
    let (input, _) = not(satisfy(is_word_char))(input)?;
    let mut out = String::new();
    if col_abs.is_some() {
        out.push('$');
    }
    out.push_str(&col);
    if row_abs.is_some() {
        out.push('$');
    }
    out.push_str(&row);
    Ok((input, out.to_ascii_uppercase()))
}

fn column_id(input: &str) -> PResult<'_, String> {
    alt((map(alpha1, str::to_string), relative("col")))(input)
}

fn row_id(input: &str) -> PResult<'_, String> {
    alt((
        map(digit1, str::to_string),
        map(tag_no_case("<rows>"), str::to_string),
        map(tag_no_case("<startrow>"), str::to_string),
        relative("row"),
    ))(input)
}

/// `<name>`, `<name:n>`, `<name:+n>` or `<name:-n>` spelled `<name:n>`.
fn relative<'a>(name: &'static str) -> impl FnMut(&'a str) -> PResult<'a, String> {
    move |input| {
        let (input, _) = char('<')(input)?;
        let (input, _) = tag_no_case(name)(input)?;
        let (input, offset) = opt(preceded(char(':'), pair(opt(one_of("+-")), digit1)))(input)?;
        let (input, _) = char('>')(input)?;
        let offset = match offset {
            Some((Some('-'), digits)) => format!("-{digits}"),
            Some((_, digits)) => digits.to_string(),
            None => "0".to_string(),
        };
        Ok((input, format!("<{name}:{offset}>")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        parse_formula(text).unwrap_or_else(|err| panic!("{text}: {err}"))
    }

    #[test]
    fn top_level_forms() {
        assert_eq!(normalize(r#""Total""#), "Total");
        assert_eq!(normalize("+12.5"), "12.5");
        assert_eq!(normalize("-3"), "-3");
        assert_eq!(normalize("= a1 + b2 * 2"), "=A1+B2*2");
    }

    #[test]
    fn relative_placeholders_get_explicit_offsets() {
        assert_eq!(normalize("=<col><row>"), "=<COL:0><ROW:0>");
        assert_eq!(normalize("=<col:-1><row:+5>"), "=<COL:-1><ROW:5>");
        assert_eq!(
            normalize("=SUM(<col>$<startrow>:<col><rows>)"),
            "=SUM(<COL:0>$<STARTROW>:<COL:0><ROWS>)"
        );
    }

    #[test]
    fn function_calls_keep_names() {
        assert_eq!(
            normalize(r#"=IF( a1 >= 10 , "big", "small" )"#),
            r#"=IF(A1>=10,"big","small")"#
        );
        assert_eq!(normalize("=_xlfn.STDEV.S(a1:a9)"), "=_xlfn.STDEV.S(A1:A9)");
        assert_eq!(normalize("=round((a1-b1)/2, 2)"), "=round((A1-B1)/2,2)");
        assert_eq!(normalize("=NOW()"), "=NOW()");
    }

    #[test]
    fn cells_win_over_names() {
        assert_eq!(normalize("=log10"), "=LOG10");
        assert_eq!(normalize("=total+a1b"), "=total+a1b");
        assert_eq!(normalize("=$a$1"), "=$A$1");
    }

    #[test]
    fn sheet_and_workbook_prefixes_are_kept() {
        assert_eq!(normalize("=Sheet1!a1"), "=Sheet1!A1");
        assert_eq!(
            normalize(r"='C:\data\book.xlsx'Sheet1!b2"),
            r"='C:\data\book.xlsx'Sheet1!B2"
        );
        assert_eq!(
            normalize(r"='\\server\share\book.xlsx'!Rates"),
            r"='\\server\share\book.xlsx'!Rates"
        );
        assert_eq!(
            normalize("='smb://host/share/book.xlsx'Data!a1:b2"),
            "='smb://host/share/book.xlsx'Data!A1:B2"
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(normalize("=a1 # first\n + a2"), "=A1+A2");
    }

    #[test]
    fn rejects_malformed_input() {
        let err = parse_formula("=SUM(A1,").unwrap_err();
        assert_eq!(err.kind, SyntaxKind::Formula);
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 8);
        assert_eq!(err.message, "expected closing parenthesis");

        assert!(parse_formula("A1+").is_err());
        assert!(parse_formula("=(A1").is_err());
        assert!(parse_formula("=1 2").is_err());
    }
}

//! Lexical building blocks shared by the grammars.
//!
//! Every token parser skips leading whitespace and `#` comments, so grammar
//! rules can be written as plain sequences of tokens. Parsers that must not
//! allow gaps (cell references, numbers) use the raw helpers instead.

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while};
use nom::character::complete::{
    anychar, char, digit1, multispace1, none_of, not_line_ending, satisfy,
};
use nom::combinator::{all_consuming, map, map_res, not, opt, recognize, value};
use nom::error::{ContextError, ErrorKind, FromExternalError, ParseError, context};
use nom::multi::{many0_count, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use crate::error::{SyntaxError, SyntaxKind};

pub(crate) type PResult<'a, T> = IResult<&'a str, T, Failure<'a>>;

/// What a failing parser wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reason {
    Expected(&'static str),
    Char(char),
    Message(&'static str),
    Kind(ErrorKind),
}

/// Parse failure that remembers the furthest position reached.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Failure<'a> {
    pub(crate) input: &'a str,
    pub(crate) reason: Reason,
}

impl<'a> Failure<'a> {
    pub(crate) fn message(input: &'a str, message: &'static str) -> Self {
        Self {
            input,
            reason: Reason::Message(message),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self.reason {
            Reason::Expected(what) => format!("expected {what}"),
            Reason::Char(c) => format!("expected '{c}'"),
            Reason::Message(message) => message.to_string(),
            Reason::Kind(ErrorKind::Eof) => "unexpected input".to_string(),
            Reason::Kind(_) if self.input.is_empty() => "unexpected end of input".to_string(),
            Reason::Kind(_) => "unexpected input".to_string(),
        }
    }
}

impl<'a> ParseError<&'a str> for Failure<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            reason: Reason::Kind(kind),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'a str, c: char) -> Self {
        Self {
            input,
            reason: Reason::Char(c),
        }
    }

    fn or(self, other: Self) -> Self {
        // Keep the alternative that got furthest.
        if other.input.len() <= self.input.len() {
            other
        } else {
            self
        }
    }
}

impl<'a> ContextError<&'a str> for Failure<'a> {
    fn add_context(input: &'a str, ctx: &'static str, other: Self) -> Self {
        let labelled = matches!(other.reason, Reason::Expected(_) | Reason::Message(_));
        if !labelled && other.input.len() == input.len() {
            Self {
                input: other.input,
                reason: Reason::Expected(ctx),
            }
        } else {
            other
        }
    }
}

impl<'a, E> FromExternalError<&'a str, E> for Failure<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        Self::from_error_kind(input, kind)
    }
}

/// Runs `parser` over the whole of `source`.
pub(crate) fn finish<'a, O, F>(kind: SyntaxKind, source: &'a str, parser: F) -> Result<O, SyntaxError>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    match all_consuming(parser)(source) {
        Ok((_, output)) => Ok(output),
        Err(nom::Err::Error(failure) | nom::Err::Failure(failure)) => Err(SyntaxError::at(
            kind,
            source,
            source.len() - failure.input.len(),
            failure.describe(),
        )),
        Err(nom::Err::Incomplete(_)) => Err(SyntaxError::at(
            kind,
            source,
            source.len(),
            "unexpected end of input",
        )),
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Skips whitespace and `#` comments.
pub(crate) fn blank(input: &str) -> PResult<'_, ()> {
    value((), many0_count(alt((multispace1, comment))))(input)
}

fn comment(input: &str) -> PResult<'_, &str> {
    recognize(pair(char('#'), not_line_ending))(input)
}

/// `inner` after optional blanks.
pub(crate) fn lexeme<'a, O, F>(mut inner: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    move |input| {
        let (input, ()) = blank(input)?;
        inner(input)
    }
}

/// Case-insensitive, whole-word keyword.
pub(crate) fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    move |input| {
        let (input, ()) = blank(input)?;
        context(
            word,
            terminated(tag_no_case(word), not(satisfy(is_word_char))),
        )(input)
    }
}

pub(crate) fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(is_word_char),
    ))(input)
}

/// Optionally negative integer.
pub(crate) fn integer(input: &str) -> PResult<'_, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |text: &str| {
        text.parse::<i64>()
    })(input)
}

pub(crate) fn unsigned(input: &str) -> PResult<'_, u32> {
    map_res(digit1, |text: &str| text.parse::<u32>())(input)
}

/// Double-quoted string including its quotes.
///
/// Backslash sequences and doubled quotes are kept as written; the content
/// of filters is a regular expression.
pub(crate) fn quoted_raw(input: &str) -> PResult<'_, &str> {
    recognize(delimited(
        char('"'),
        many0_count(alt((
            value((), tag("\"\"")),
            value((), preceded(char('\\'), anychar)),
            value((), none_of("\"\\\r\n")),
        ))),
        char('"'),
    ))(input)
}

/// Content of a double-quoted string.
pub(crate) fn quoted(input: &str) -> PResult<'_, &str> {
    map(quoted_raw, |text| &text[1..text.len() - 1])(input)
}

/// `"a", "b", ...`
pub(crate) fn quoted_list(input: &str) -> PResult<'_, Vec<String>> {
    separated_list1(
        lexeme(char(',')),
        map(lexeme(quoted), str::to_string),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_skips_comments() {
        let (rest, ()) = blank("  # note\n\t# more\n  body").unwrap();
        assert_eq!(rest, "body");
    }

    #[test]
    fn keywords_are_whole_words() {
        assert!(keyword("body")("  BODY fieldset").is_ok());
        assert!(keyword("body")("bodyx").is_err());
        let (rest, _) = keyword("empty")("empty 3").unwrap();
        assert_eq!(rest, " 3");
    }

    #[test]
    fn quoted_keeps_escapes() {
        let (rest, text) = quoted(r#""^\s+\"TOTAL" tail"#).unwrap();
        assert_eq!(text, r#"^\s+\"TOTAL"#);
        assert_eq!(rest, " tail");
        assert_eq!(quoted(r#""""#).unwrap().1, "");
        assert!(quoted("\"open\nline\"").is_err());
    }

    #[test]
    fn lists_quoted_strings() {
        let (_, items) = quoted_list(r#" "a" , "b","c""#).unwrap();
        assert_eq!(items, ["a", "b", "c"]);
    }

    #[test]
    fn integers_may_be_negative() {
        assert_eq!(integer("-12 ").unwrap().1, -12);
        assert!(integer("x").is_err());
    }
}

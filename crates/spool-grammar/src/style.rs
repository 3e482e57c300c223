//! Style block grammar.
//!
//! ```text
//! style total bold size 12 border red thin background FFEECC
//! ```
//!
//! Options may appear in any order, each at most once. Colors are palette
//! names or six hexadecimal digits (written without `#`, which starts a
//! comment).

use nom::branch::alt;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::satisfy;
use nom::combinator::{cut, map, map_opt, not, opt, value};
use nom::error::context;
use nom::sequence::{pair, preceded, terminated};

use spool_model::{Border, Color, ColorName, HorizontalAlign, Style, VerticalAlign};

use crate::token::{Failure, PResult, blank, identifier, is_word_char, keyword, lexeme, quoted, unsigned};

#[derive(Debug, Clone, PartialEq)]
enum StyleOption {
    Format(String),
    Font(String),
    Size(u32),
    Bold,
    Italic,
    Underline,
    Strikeout,
    Align(HorizontalAlign),
    Valign(VerticalAlign),
    Border(Option<Color>, Border),
    Background(Color),
    Color(Color),
    Unlocked,
    Hidden,
    Wrap,
    Shrink,
}

impl StyleOption {
    fn apply(self, style: &mut Style) {
        match self {
            StyleOption::Format(format) => style.num_format = Some(format),
            StyleOption::Font(font) => style.font_name = Some(font),
            StyleOption::Size(size) => style.font_size = Some(size),
            StyleOption::Bold => style.bold = true,
            StyleOption::Italic => style.italic = true,
            StyleOption::Underline => style.underline = true,
            StyleOption::Strikeout => style.strikeout = true,
            StyleOption::Align(align) => style.align = Some(align),
            StyleOption::Valign(valign) => style.valign = Some(valign),
            StyleOption::Border(color, border) => {
                style.border = Some(border);
                style.border_color = color;
            }
            StyleOption::Background(color) => style.background = Some(color),
            StyleOption::Color(color) => style.font_color = Some(color),
            StyleOption::Unlocked => style.unlocked = true,
            StyleOption::Hidden => style.hidden = true,
            StyleOption::Wrap => style.wrap = true,
            StyleOption::Shrink => style.shrink = true,
        }
    }
}

/// `style <id> <option>*`
pub(crate) fn style(input: &str) -> PResult<'_, Style> {
    let (input, _) = keyword("style")(input)?;
    let (mut input, id) = cut(context("style id", lexeme(identifier)))(input)?;
    let mut style = Style::new(id);
    let mut seen = Vec::new();
    loop {
        let (at, ()) = blank(input)?;
        match style_option(at) {
            Ok((rest, option)) => {
                let kind = std::mem::discriminant(&option);
                if seen.contains(&kind) {
                    return Err(nom::Err::Failure(Failure::message(
                        at,
                        "style option given more than once",
                    )));
                }
                seen.push(kind);
                option.apply(&mut style);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, style)),
            Err(err) => return Err(err),
        }
    }
}

fn style_option(input: &str) -> PResult<'_, StyleOption> {
    alt((
        map(preceded(keyword("format"), cut(lexeme(quoted))), |text| {
            StyleOption::Format(text.to_string())
        }),
        map(preceded(keyword("font"), cut(lexeme(quoted))), |text| {
            StyleOption::Font(text.to_string())
        }),
        map(
            preceded(keyword("size"), cut(context("font size", lexeme(unsigned)))),
            StyleOption::Size,
        ),
        value(StyleOption::Bold, keyword("bold")),
        value(StyleOption::Italic, keyword("italic")),
        value(StyleOption::Underline, keyword("underline")),
        value(StyleOption::Strikeout, keyword("strikeout")),
        map(
            preceded(
                keyword("align"),
                cut(context("left, center, right or justify", lexeme(horizontal))),
            ),
            StyleOption::Align,
        ),
        map(
            preceded(
                keyword("valign"),
                cut(context("top, bottom, center or justify", lexeme(vertical))),
            ),
            StyleOption::Valign,
        ),
        map(
            preceded(keyword("border"), cut(context("border line", border))),
            |(color, line)| StyleOption::Border(color, line),
        ),
        map(
            preceded(keyword("background"), cut(context("color", lexeme(color)))),
            StyleOption::Background,
        ),
        map(
            preceded(keyword("color"), cut(context("color", lexeme(color)))),
            StyleOption::Color,
        ),
        value(StyleOption::Unlocked, keyword("unlocked")),
        value(StyleOption::Hidden, keyword("hidden")),
        value(StyleOption::Wrap, keyword("wrap")),
        value(StyleOption::Shrink, keyword("shrink")),
    ))(input)
}

/// Line and optional color, in either order.
fn border(input: &str) -> PResult<'_, (Option<Color>, Border)> {
    alt((
        map(pair(lexeme(color), lexeme(border_line)), |(color, line)| {
            (Some(color), line)
        }),
        map(pair(lexeme(border_line), opt(lexeme(color))), |(line, color)| {
            (color, line)
        }),
    ))(input)
}

fn border_line(input: &str) -> PResult<'_, Border> {
    map_opt(identifier, |word| {
        Border::ALL
            .into_iter()
            .find(|line| line.keyword().eq_ignore_ascii_case(word))
    })(input)
}

fn horizontal(input: &str) -> PResult<'_, HorizontalAlign> {
    map_opt(identifier, |word| {
        HorizontalAlign::ALL
            .into_iter()
            .find(|align| align.keyword().eq_ignore_ascii_case(word))
    })(input)
}

fn vertical(input: &str) -> PResult<'_, VerticalAlign> {
    map_opt(identifier, |word| {
        VerticalAlign::ALL
            .into_iter()
            .find(|align| align.keyword().eq_ignore_ascii_case(word))
    })(input)
}

fn color(input: &str) -> PResult<'_, Color> {
    alt((
        map_opt(identifier, |word| {
            ColorName::ALL
                .into_iter()
                .find(|name| name.keyword().eq_ignore_ascii_case(word))
                .map(Color::Named)
        }),
        map(
            terminated(
                take_while_m_n(6, 6, |c: char| c.is_ascii_hexdigit()),
                not(satisfy(is_word_char)),
            ),
            |code: &str| Color::Rgb(format!("#{}", code.to_ascii_uppercase())),
        ),
    ))(input)
}

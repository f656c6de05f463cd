use std::sync::Arc;

use winnow::{
    ascii::{multispace0, multispace1},
    combinator::{alt, delimited, eof, preceded, repeat, separated, terminated},
    error::{ContextError, StrContext, StrContextValue},
    prelude::*,
    token::{any, take_till, take_while},
};

use crate::error::AddressError;

/// Number of byte groups in a network address.
pub const ADDRESS_BYTES: usize = 8;

type ParserResult<T> = winnow::PResult<T, ContextError>;

/// Split a line of shell input into the command name and its arguments.
///
/// Returns `None` for blank input.
pub fn tokenize(line: &str) -> Option<(&str, Vec<String>)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    Some((name, tokens.map(str::to_string).collect()))
}

/// Parse a dotted hex address such as `00.00.00.00.01.27.E4.48`.
///
/// # Grammar
///
/// ```md
/// address  := hex_byte ("." hex_byte){7};
/// hex_byte := [0-9a-fA-F]{1,2};
/// ```
pub fn parse_address(input: &str) -> Result<u64, AddressError> {
    let bytes = address_bytes.parse(input).map_err(|err| {
        let offset = err.offset();
        let label = err
            .inner()
            .context()
            .find_map(|ctx| match ctx {
                StrContext::Expected(StrContextValue::Description(what)) => {
                    Some(format!("expected {what}"))
                }
                _ => None,
            })
            .unwrap_or_else(|| "unexpected input".to_string());
        AddressError {
            input: Arc::new(input.to_string()),
            span: (offset, input.len().saturating_sub(offset).min(1)).into(),
            label,
        }
    })?;

    Ok(bytes.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

fn address_bytes(input: &mut &str) -> ParserResult<Vec<u8>> {
    separated(
        ADDRESS_BYTES,
        hex_byte,
        '.'.context(StrContext::Expected(StrContextValue::Description("a dot"))),
    )
    .parse_next(input)
}

fn hex_byte(input: &mut &str) -> ParserResult<u8> {
    take_while(1..=2, |c: char| c.is_ascii_hexdigit())
        .try_map(|digits| u8::from_str_radix(digits, 16))
        .context(StrContext::Expected(StrContextValue::Description(
            "a hex byte",
        )))
        .parse_next(input)
}

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
}

/// One word inside a style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleWord<'a> {
    Bold,
    Italic,
    Underline,
    Dim,
    Rgb(Rgb),
    /// `$name`, looked up in the theme when rendering.
    Variable(&'a str),
    Named(NamedColor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken<'a> {
    Text(&'a str),
    /// A style tag and the source it was parsed from, brackets included.
    Open {
        raw: &'a str,
        words: Vec<StyleWord<'a>>,
    },
    /// `[@...]`, carries what follows the `@`.
    Action(&'a str),
    Close,
}

/// Split markup into text runs and tags.
///
/// # Grammar
///
/// ```md
/// markup  := (escape | close | action | style | text | stray)*;
/// escape  := "\[";
/// close   := "[" ws* "/" ws* "]";
/// action  := "[" ws* "@" [^\]]* "]";
/// style   := "[" ws* word (ws+ word)* ws* "]";
/// word    := "bold" | "b" | "italic" | "i" | "underline" | "u" | "dim" | "d"
///          | "#" hex{6} | "$" ident | colour;
/// text    := [^[\\]+;
/// ```
///
/// Anything else, such as a bracket that opens no valid tag, is a `stray`
/// one character text run, so every input parses.
pub fn parse_markup(text: &str) -> Vec<MarkupToken<'_>> {
    repeat(0.., markup_token)
        .parse(text)
        .unwrap_or_else(|_| vec![MarkupToken::Text(text)])
}

/// `#RRGGBB` to a colour.
pub fn parse_hex_color(text: &str) -> Option<Rgb> {
    preceded('#', hex_color).parse(text).ok()
}

fn markup_token<'i>(input: &mut &'i str) -> ParserResult<MarkupToken<'i>> {
    alt((
        "\\[".value(MarkupToken::Text("[")),
        close_tag,
        action_tag,
        style_tag,
        take_till(1.., ['[', '\\']).map(MarkupToken::Text),
        any.take().map(MarkupToken::Text),
    ))
    .parse_next(input)
}

fn close_tag<'i>(input: &mut &'i str) -> ParserResult<MarkupToken<'i>> {
    ('[', multispace0, '/', multispace0, ']')
        .value(MarkupToken::Close)
        .parse_next(input)
}

fn action_tag<'i>(input: &mut &'i str) -> ParserResult<MarkupToken<'i>> {
    delimited(('[', multispace0, '@'), take_till(0.., ']'), ']')
        .map(MarkupToken::Action)
        .parse_next(input)
}

fn style_tag<'i>(input: &mut &'i str) -> ParserResult<MarkupToken<'i>> {
    delimited(
        ('[', multispace0),
        separated(1.., style_word, multispace1),
        (multispace0, ']'),
    )
    .with_taken()
    .map(|(words, raw)| MarkupToken::Open { raw, words })
    .parse_next(input)
}

fn style_word<'i>(input: &mut &'i str) -> ParserResult<StyleWord<'i>> {
    take_while(1.., |c: char| !c.is_whitespace() && c != ']')
        .and_then(terminated(style_keyword, eof))
        .parse_next(input)
}

fn style_keyword<'i>(input: &mut &'i str) -> ParserResult<StyleWord<'i>> {
    alt((
        preceded('#', hex_color).map(StyleWord::Rgb),
        preceded('$', take_while(1.., |c: char| c.is_alphanumeric() || c == '_'))
            .map(StyleWord::Variable),
        alt((keyword("bold"), keyword("b"))).value(StyleWord::Bold),
        alt((keyword("italic"), keyword("i"))).value(StyleWord::Italic),
        alt((keyword("underline"), keyword("u"))).value(StyleWord::Underline),
        alt((keyword("dim"), keyword("d"))).value(StyleWord::Dim),
        named_color.map(StyleWord::Named),
    ))
    .parse_next(input)
}

fn named_color(input: &mut &str) -> ParserResult<NamedColor> {
    alt((
        keyword("black").value(NamedColor::Black),
        keyword("red").value(NamedColor::Red),
        keyword("green").value(NamedColor::Green),
        keyword("yellow").value(NamedColor::Yellow),
        keyword("blue").value(NamedColor::Blue),
        keyword("magenta").value(NamedColor::Magenta),
        keyword("cyan").value(NamedColor::Cyan),
        keyword("white").value(NamedColor::White),
        alt((keyword("grey"), keyword("gray"))).value(NamedColor::Grey),
    ))
    .parse_next(input)
}

/// A whole word, not just a prefix of one.
fn keyword<'i>(word: &'static str) -> impl Parser<&'i str, &'i str, ContextError> {
    terminated(word, eof)
}

fn hex_color(input: &mut &str) -> ParserResult<Rgb> {
    (hex_pair, hex_pair, hex_pair)
        .map(|(r, g, b)| Rgb { r, g, b })
        .parse_next(input)
}

fn hex_pair(input: &mut &str) -> ParserResult<u8> {
    take_while(2, |c: char| c.is_ascii_hexdigit())
        .try_map(|digits| u8::from_str_radix(digits, 16))
        .parse_next(input)
}

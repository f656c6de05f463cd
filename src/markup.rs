//! Renders the bracket markup used in command output.
//!
//! ```text
//! [#FF0000]red[/] [$primary]theme colour[/] [bold italic]both[/]
//! ```
//!
//! Tags nest and `[/]` closes the innermost one. `\[` is a literal bracket,
//! `[@...]` action tags are dropped and bracketed text that is not a valid
//! tag is printed as is.

use std::fmt;

use crossterm::{
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
    Command,
};

use crate::{
    parser::{self, MarkupToken, NamedColor, Rgb, StyleWord},
    theme::Theme,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    foreground: Option<Color>,
    bold: bool,
    italic: bool,
    underline: bool,
    dim: bool,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    theme: Theme,
    plain: bool,
}

impl Renderer {
    pub fn new(theme: Theme, plain: bool) -> Self {
        Self { theme, plain }
    }

    /// A renderer that only strips markup.
    pub fn plain(theme: Theme) -> Self {
        Self::new(theme, true)
    }

    /// Markup to text with ANSI escapes, or bare text in plain mode.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        // writing into a String does not fail
        let _ = self.render_into(text, &mut out);
        out
    }

    fn render_into(&self, text: &str, out: &mut String) -> fmt::Result {
        let mut stack: Vec<Style> = Vec::new();

        for token in parser::parse_markup(text) {
            let current = stack.last().copied().unwrap_or_default();
            match token {
                MarkupToken::Text(run) => out.push_str(run),
                MarkupToken::Open { raw, words } => match self.style(current, &words) {
                    Some(style) => {
                        stack.push(style);
                        self.apply(out, style)?;
                    }
                    // unknown theme variable
                    None => out.push_str(raw),
                },
                MarkupToken::Action(_) => stack.push(current),
                MarkupToken::Close => {
                    if let Some(closed) = stack.pop() {
                        let outer = stack.last().copied().unwrap_or_default();
                        if closed != outer {
                            self.apply(out, outer)?;
                        }
                    }
                }
            }
        }

        if stack.last().is_some_and(|style| *style != Style::default()) {
            self.apply(out, Style::default())?;
        }
        Ok(())
    }

    /// `current` with every word of a tag applied on top.
    fn style(&self, current: Style, words: &[StyleWord]) -> Option<Style> {
        let mut style = current;
        for word in words {
            match *word {
                StyleWord::Bold => style.bold = true,
                StyleWord::Italic => style.italic = true,
                StyleWord::Underline => style.underline = true,
                StyleWord::Dim => style.dim = true,
                StyleWord::Rgb(rgb) => style.foreground = Some(rgb_color(rgb)),
                StyleWord::Variable(name) => {
                    let rgb = parser::parse_hex_color(self.theme.variable(name)?)?;
                    style.foreground = Some(rgb_color(rgb));
                }
                StyleWord::Named(named) => style.foreground = Some(named_color(named)),
            }
        }
        Some(style)
    }

    fn apply(&self, out: &mut String, style: Style) -> fmt::Result {
        if self.plain {
            return Ok(());
        }

        SetAttribute(Attribute::Reset).write_ansi(out)?;
        if let Some(color) = style.foreground {
            SetForegroundColor(color).write_ansi(out)?;
        }
        let attributes = [
            (style.bold, Attribute::Bold),
            (style.italic, Attribute::Italic),
            (style.underline, Attribute::Underlined),
            (style.dim, Attribute::Dim),
        ];
        for (enabled, attribute) in attributes {
            if enabled {
                SetAttribute(attribute).write_ansi(out)?;
            }
        }
        Ok(())
    }
}

fn rgb_color(Rgb { r, g, b }: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

fn named_color(named: NamedColor) -> Color {
    match named {
        NamedColor::Black => Color::Black,
        NamedColor::Red => Color::Red,
        NamedColor::Green => Color::Green,
        NamedColor::Yellow => Color::Yellow,
        NamedColor::Blue => Color::Blue,
        NamedColor::Magenta => Color::Magenta,
        NamedColor::Cyan => Color::Cyan,
        NamedColor::White => Color::White,
        NamedColor::Grey => Color::Grey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Renderer {
        Renderer::plain(Theme::new("test", "#112233"))
    }

    fn ansi() -> Renderer {
        Renderer::new(Theme::new("test", "#112233"), false)
    }

    #[test]
    fn test_plain_strips_tags() {
        let renderer = plain();

        assert_eq!(renderer.render("[#0000FF]home[/] bar.txt"), "home bar.txt");
        assert_eq!(
            renderer.render("[bold italic]type       size    name[/]"),
            "type       size    name"
        );
        assert_eq!(renderer.render("[$primary]┌([#00FF00]neo[/])[/]"), "┌(neo)");
    }

    #[test]
    fn test_unknown_brackets_are_literal() {
        let renderer = plain();

        assert_eq!(renderer.render("[not a tag] [] [#GG0000]x"), "[not a tag] [] [#GG0000]x");
        assert_eq!(renderer.render("unclosed [bold"), "unclosed [bold");
        assert_eq!(renderer.render("[$nope]x[/]"), "[$nope]x");
    }

    #[test]
    fn test_escaped_bracket() {
        assert_eq!(plain().render(r"\[bold] stays"), "[bold] stays");
        assert_eq!(plain().render(r" \_____|"), r" \_____|");
    }

    #[test]
    fn test_action_tags_are_dropped() {
        assert_eq!(
            plain().render("0 1 2 [@click=app.link('slot_machine')]3[/] 4"),
            "0 1 2 3 4"
        );
    }

    #[test]
    fn test_ansi_colours_and_reset() {
        // Arrange
        let renderer = ansi();

        // Act
        let out = renderer.render("[#FF0000]red[/] and [$primary]theme[/]");

        // Assert
        assert!(out.contains("\x1b[38;2;255;0;0mred"));
        assert!(out.contains("\x1b[38;2;17;34;51mtheme"));
        assert!(out.contains(" and "));
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_nested_tags_restore_outer_style() {
        let out = ansi().render("[red]a[bold]b[/]c[/]");

        let restored = out.split('b').nth(1).unwrap();
        assert!(restored.starts_with("\x1b[0m"));
        assert!(!restored[..restored.find('c').unwrap()].contains("\x1b[1m"));
    }

    #[test]
    fn test_theme_variable_that_is_not_a_colour_stays_literal() {
        let mut theme = Theme::new("test", "#112233");
        theme.secondary = Some("teal".into());

        let out = Renderer::plain(theme).render("[$secondary]x[/] [$primary]y[/]");

        assert_eq!(out, "[$secondary]x y");
    }
}

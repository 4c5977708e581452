//! Convert SGR-colored terminal text into ratatui lines.

use ansi_parser::{AnsiParser, AnsiSequence, Output};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parse colored output into lines, carrying the active style across line breaks.
///
/// Only graphics-mode sequences are interpreted; every other escape is dropped.
pub fn ansi_to_lines(text: &str) -> Vec<Line<'static>> {
    let mut style = Style::default();
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut spans = Vec::new();
        for output in raw_line.ansi_parse() {
            match output {
                Output::TextBlock(block) => {
                    if !block.is_empty() {
                        spans.push(Span::styled(block.replace('\t', "    "), style));
                    }
                }
                Output::Escape(AnsiSequence::SetGraphicsMode(codes)) => {
                    style = apply_sgr(style, &codes);
                }
                Output::Escape(_) => {}
            }
        }
        lines.push(Line::from(spans));
    }

    lines
}

fn apply_sgr(mut style: Style, codes: &[u8]) -> Style {
    if codes.is_empty() {
        return Style::default();
    }

    let mut i = 0;
    while i < codes.len() {
        let code = codes[i];
        match code {
            0 => style = Style::default(),
            1 => style = style.add_modifier(Modifier::BOLD),
            2 => style = style.add_modifier(Modifier::DIM),
            3 => style = style.add_modifier(Modifier::ITALIC),
            4 => style = style.add_modifier(Modifier::UNDERLINED),
            7 => style = style.add_modifier(Modifier::REVERSED),
            9 => style = style.add_modifier(Modifier::CROSSED_OUT),
            22 => style = style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style = style.remove_modifier(Modifier::ITALIC),
            24 => style = style.remove_modifier(Modifier::UNDERLINED),
            27 => style = style.remove_modifier(Modifier::REVERSED),
            29 => style = style.remove_modifier(Modifier::CROSSED_OUT),
            30..=37 => style = style.fg(Color::Indexed(code - 30)),
            39 => style.fg = None,
            40..=47 => style = style.bg(Color::Indexed(code - 40)),
            49 => style.bg = None,
            90..=97 => style = style.fg(Color::Indexed(code - 90 + 8)),
            100..=107 => style = style.bg(Color::Indexed(code - 100 + 8)),
            38 | 48 => {
                let (color, consumed) = extended_color(&codes[i + 1..]);
                if let Some(color) = color {
                    style = if code == 38 {
                        style.fg(color)
                    } else {
                        style.bg(color)
                    };
                }
                i += consumed;
            }
            _ => {}
        }
        i += 1;
    }

    style
}

/// Parse `5;n` or `2;r;g;b` after a 38/48 code. Returns the color and the
/// number of parameters consumed.
fn extended_color(params: &[u8]) -> (Option<Color>, usize) {
    match params {
        [5, n, ..] => (Some(Color::Indexed(*n)), 2),
        [2, r, g, b, ..] => (Some(Color::Rgb(*r, *g, *b)), 4),
        _ => (None, params.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_text() {
        let lines = ansi_to_lines("one\ntwo");
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), "one");
        assert_eq!(text(&lines[1]), "two");
    }

    #[test]
    fn test_colors_and_reset() {
        let lines = ansi_to_lines("\x1b[31mred\x1b[0m plain");
        assert_eq!(text(&lines[0]), "red plain");
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Indexed(1)));
        assert_eq!(lines[0].spans[1].style, Style::default());
    }

    #[test]
    fn test_style_carries_across_lines() {
        let lines = ansi_to_lines("\x1b[1;32mgreen\nstill\x1b[0m");
        let style = lines[1].spans[0].style;
        assert_eq!(style.fg, Some(Color::Indexed(2)));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_extended_colors() {
        assert_eq!(
            apply_sgr(Style::default(), &[38, 5, 208]).fg,
            Some(Color::Indexed(208))
        );
        assert_eq!(
            apply_sgr(Style::default(), &[48, 2, 10, 20, 30]).bg,
            Some(Color::Rgb(10, 20, 30))
        );
    }
}

//! Trait for providing theme colors to the diff renderer.

use ratatui::style::Color;

/// Provides theme colors for rendered diffs.
///
/// The application injects its palette by implementing this trait; every
/// method except the two backgrounds has a dark-mode default.
pub trait ThemeProvider: Send + Sync {
    /// Background color for added lines.
    fn addition_background(&self) -> Color;

    /// Background color for removed lines.
    fn deletion_background(&self) -> Color;

    /// Foreground color for added lines without syntax highlighting.
    fn addition_foreground(&self) -> Color {
        Color::Green
    }

    /// Foreground color for removed lines without syntax highlighting.
    fn deletion_foreground(&self) -> Color {
        Color::Red
    }

    /// Background for the changed words of an added line.
    fn addition_emphasis(&self) -> Color {
        Color::Rgb(40, 100, 40)
    }

    /// Background for the changed words of a removed line.
    fn deletion_emphasis(&self) -> Color {
        Color::Rgb(110, 40, 40)
    }

    fn context_foreground(&self) -> Color {
        Color::Reset
    }

    fn context_background(&self) -> Color {
        Color::Reset
    }

    fn hunk_header_background(&self) -> Color {
        Color::Rgb(40, 40, 60)
    }

    fn hunk_header_foreground(&self) -> Color {
        Color::Cyan
    }

    fn line_number_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Color of the `│` between the two side-by-side columns.
    fn separator_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Color of sentinel messages ("No diff content", "Binary file").
    fn placeholder_foreground(&self) -> Color {
        Color::DarkGray
    }
}

/// Default theme with sensible dark-mode colors.
#[derive(Debug, Clone, Default)]
pub struct DefaultTheme;

impl ThemeProvider for DefaultTheme {
    fn addition_background(&self) -> Color {
        Color::Rgb(30, 60, 30) // dark green
    }

    fn deletion_background(&self) -> Color {
        Color::Rgb(60, 30, 30) // dark red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = DefaultTheme;
        assert_eq!(theme.addition_background(), Color::Rgb(30, 60, 30));
        assert_eq!(theme.deletion_background(), Color::Rgb(60, 30, 30));
        assert_eq!(theme.context_background(), Color::Reset);
    }
}

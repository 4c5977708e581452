//! `syntect` highlighting for diff line content

use crate::model::HighlightedSpan;
use crate::traits::SyntaxHighlighter;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

pub const DEFAULT_SYNTAX_THEME: &str = "base16-ocean.dark";

/// Entries per cache generation
const GENERATION_SIZE: usize = 2048;

/// Line highlighter with a two-generation span cache.
///
/// Lookups hit the young generation first and promote hits from the old
/// one. When the young generation fills up it becomes the old one and the
/// previous old generation is dropped, so lines on screen survive scrolling
/// without the cache growing past two generations.
pub struct DiffHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    /// Syntax index per lowercased extension (or file name without one)
    by_extension: HashMap<String, usize>,
    young: HashMap<(usize, String), Vec<HighlightedSpan>>,
    old: HashMap<(usize, String), Vec<HighlightedSpan>>,
    generation_size: usize,
}

impl std::fmt::Debug for DiffHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffHighlighter")
            .field("young", &self.young.len())
            .field("old", &self.old.len())
            .finish()
    }
}

impl Default for DiffHighlighter {
    fn default() -> Self {
        Self::with_theme_name(DEFAULT_SYNTAX_THEME)
    }
}

impl DiffHighlighter {
    /// Highlighter using a theme bundled with syntect; unknown names fall
    /// back to [`DEFAULT_SYNTAX_THEME`].
    pub fn with_theme_name(name: &str) -> Self {
        let mut bundled = ThemeSet::load_defaults();
        let theme = bundled.themes.remove(name).unwrap_or_else(|| {
            log::warn!("Unknown syntax theme {:?}, using {}", name, DEFAULT_SYNTAX_THEME);
            bundled
                .themes
                .remove(DEFAULT_SYNTAX_THEME)
                .unwrap_or_default()
        });

        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
            by_extension: HashMap::new(),
            young: HashMap::new(),
            old: HashMap::new(),
            generation_size: GENERATION_SIZE,
        }
    }

    fn syntax_for(&mut self, file_name: &str) -> usize {
        let path = Path::new(file_name);
        let key = path
            .extension()
            .or_else(|| path.file_name())
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if let Some(&index) = self.by_extension.get(&key) {
            return index;
        }

        let syntaxes = &self.syntaxes;
        let found = syntaxes
            .find_syntax_by_extension(&key)
            .or_else(|| syntaxes.find_syntax_for_file(file_name).ok().flatten())
            .unwrap_or_else(|| syntaxes.find_syntax_plain_text());
        let index = syntaxes
            .syntaxes()
            .iter()
            .position(|s| s.name == found.name)
            .unwrap_or(0);

        self.by_extension.insert(key, index);
        index
    }

    fn highlight_uncached(&self, syntax: usize, content: &str) -> Vec<HighlightedSpan> {
        let Some(reference) = self.syntaxes.syntaxes().get(syntax) else {
            return vec![HighlightedSpan::plain(content)];
        };
        // Lines are highlighted in isolation; multi-line constructs that
        // start outside the hunk are not tracked.
        let mut lines = HighlightLines::new(reference, &self.theme);
        match lines.highlight_line(content, &self.syntaxes) {
            Ok(ranges) => ranges
                .into_iter()
                .map(|(style, text)| to_span(style, text))
                .collect(),
            Err(e) => {
                log::debug!("Highlighting failed, showing plain text: {}", e);
                vec![HighlightedSpan::plain(content)]
            }
        }
    }

    fn remember(&mut self, key: (usize, String), spans: Vec<HighlightedSpan>) {
        if self.young.len() >= self.generation_size {
            self.old = std::mem::take(&mut self.young);
        }
        self.young.insert(key, spans);
    }

    pub fn cached_lines(&self) -> usize {
        self.young.len() + self.old.len()
    }
}

impl SyntaxHighlighter for DiffHighlighter {
    fn highlight(&mut self, file_name: &str, content: &str) -> Vec<HighlightedSpan> {
        let key = (self.syntax_for(file_name), content.to_string());
        if let Some(spans) = self.young.get(&key) {
            return spans.clone();
        }
        if let Some(spans) = self.old.remove(&key) {
            self.remember(key, spans.clone());
            return spans;
        }
        let spans = self.highlight_uncached(key.0, content);
        self.remember(key, spans.clone());
        spans
    }
}

/// Keep the foreground and font style; the line kind decides the background.
fn to_span(style: Style, text: &str) -> HighlightedSpan {
    let fg = style.foreground;
    HighlightedSpan {
        text: text.to_string(),
        fg: Some(Color::Rgb(fg.r, fg.g, fg.b)),
        bg: None,
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
        underline: style.font_style.contains(FontStyle::UNDERLINE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(spans: &[HighlightedSpan]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_rust_line_keeps_text() {
        let mut highlighter = DiffHighlighter::default();
        let spans = highlighter.highlight("src/main.rs", "fn main() {}");
        assert!(spans.len() > 1);
        assert_eq!(text(&spans), "fn main() {}");
        assert!(spans.iter().all(|s| s.bg.is_none()));
    }

    #[test]
    fn test_repeated_lines_hit_the_cache() {
        let mut highlighter = DiffHighlighter::default();
        highlighter.highlight("a.rs", "let x = 1;");
        highlighter.highlight("b.rs", "let x = 1;");
        assert_eq!(highlighter.cached_lines(), 1);

        highlighter.highlight("a.py", "let x = 1;");
        assert_eq!(highlighter.cached_lines(), 2);
    }

    #[test]
    fn test_generations_bound_the_cache() {
        let mut highlighter = DiffHighlighter::default();
        highlighter.generation_size = 4;
        for i in 0..20 {
            highlighter.highlight("lib.rs", &format!("let v{} = {};", i, i));
        }
        assert!(highlighter.cached_lines() <= 8);

        // Old-generation hits are promoted, not recomputed
        let key = (highlighter.syntax_for("lib.rs"), "let v15 = 15;".to_string());
        assert!(highlighter.old.contains_key(&key));
        highlighter.highlight("lib.rs", "let v15 = 15;");
        assert!(highlighter.young.contains_key(&key));
        assert!(!highlighter.old.contains_key(&key));
    }

    #[test]
    fn test_unknown_theme_and_extension() {
        let mut highlighter = DiffHighlighter::with_theme_name("no-such-theme");
        let spans = highlighter.highlight("notes.unknownext", "some content");
        assert_eq!(text(&spans), "some content");
    }
}

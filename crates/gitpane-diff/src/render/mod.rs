//! Terminal renderers for parsed diffs.
//!
//! Both renderers return only the rows inside the viewport as styled
//! [`Line`]s, so the caller can hand them straight to a `Paragraph`.

mod side_by_side;
mod text;
mod unified;

pub use side_by_side::{
    group_lines_for_side_by_side, render_side_by_side, side_by_side_clip_info,
    side_by_side_content_width, side_by_side_row_count, ClipInfo, LinePair,
};
pub use text::{display_width, slice_columns};
pub use unified::{render_unified, unified_row_count};

use crate::model::{DiffLine, LineType, ParsedDiff};
use crate::traits::{SyntaxHighlighter, ThemeProvider};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};
use text::{expand_tabs, skip_columns, take_columns, to_spans, Segment};

pub const NO_DIFF_CONTENT: &str = "No diff content";
pub const BINARY_FILE: &str = "Binary file (no text diff)";

/// How the inline and full-screen diff are laid out.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DiffViewMode {
    #[default]
    Unified,
    SideBySide,
}

impl DiffViewMode {
    pub fn toggle(self) -> Self {
        match self {
            DiffViewMode::Unified => DiffViewMode::SideBySide,
            DiffViewMode::SideBySide => DiffViewMode::Unified,
        }
    }
}

/// The visible window of a rendered diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Total width in columns, gutters included.
    pub width: usize,
    /// First visual row to emit.
    pub v_scroll: usize,
    /// Number of rows to emit.
    pub height: usize,
    /// First content column to show.
    pub h_scroll: usize,
    /// Soft-wrap long lines instead of truncating them.
    pub wrap: bool,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn scrolled(mut self, v_scroll: usize, h_scroll: usize) -> Self {
        self.v_scroll = v_scroll;
        self.h_scroll = h_scroll;
        self
    }

    pub fn wrapped(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }
}

/// Render with whichever layout `mode` selects.
pub fn render_diff(
    mode: DiffViewMode,
    diff: Option<&ParsedDiff>,
    viewport: &Viewport,
    highlighter: Option<&mut dyn SyntaxHighlighter>,
    theme: &dyn ThemeProvider,
) -> Vec<Line<'static>> {
    match mode {
        DiffViewMode::Unified => render_unified(diff, viewport, highlighter, theme),
        DiffViewMode::SideBySide => render_side_by_side(diff, viewport, highlighter, theme),
    }
}

/// Total visual rows for `mode`, for scroll clamping.
pub fn row_count(mode: DiffViewMode, diff: Option<&ParsedDiff>, width: usize, wrap: bool) -> usize {
    match mode {
        DiffViewMode::Unified => unified_row_count(diff, width, wrap),
        DiffViewMode::SideBySide => side_by_side_row_count(diff, width, wrap),
    }
}

/// Apply a viewport to lines that were styled elsewhere (external tool output).
///
/// Lines are never wrapped; content past the pane width is cut.
pub fn window_lines(lines: &[Line<'static>], viewport: &Viewport) -> Vec<Line<'static>> {
    lines
        .iter()
        .skip(viewport.v_scroll)
        .take(viewport.height)
        .map(|line| {
            let segments: Vec<Segment> = line
                .spans
                .iter()
                .map(|span| (span.content.to_string(), span.style))
                .collect();
            let visible = take_columns(&skip_columns(segments, viewport.h_scroll), viewport.width);
            Line::from(to_spans(visible)).style(line.style)
        })
        .collect()
}

/// Returns the diff when it has content, or the sentinel line to show instead.
fn renderable<'a>(
    diff: Option<&'a ParsedDiff>,
    theme: &dyn ThemeProvider,
) -> Result<&'a ParsedDiff, Line<'static>> {
    let style = Style::default().fg(theme.placeholder_foreground());
    match diff {
        Some(d) if d.binary => Err(Line::from(Span::styled(BINARY_FILE, style))),
        Some(d) if !d.is_empty() => Ok(d),
        _ => Err(Line::from(Span::styled(NO_DIFF_CONTENT, style))),
    }
}

/// Digits needed for the line-number gutter, at least 4.
fn line_no_width(diff: &ParsedDiff) -> usize {
    diff.max_line_no().to_string().len().max(4)
}

fn format_line_no(n: Option<u32>, width: usize) -> String {
    match n {
        Some(n) => format!("{:>width$}", n, width = width),
        None => " ".repeat(width),
    }
}

fn line_background(line_type: LineType, theme: &dyn ThemeProvider) -> Style {
    match line_type {
        LineType::Add => Style::default().bg(theme.addition_background()),
        LineType::Remove => Style::default().bg(theme.deletion_background()),
        LineType::Header => Style::default().bg(theme.hunk_header_background()),
        LineType::Context => Style::default().bg(theme.context_background()),
    }
}

fn line_foreground(line_type: LineType, theme: &dyn ThemeProvider) -> Style {
    match line_type {
        LineType::Add => Style::default().fg(theme.addition_foreground()),
        LineType::Remove => Style::default().fg(theme.deletion_foreground()),
        LineType::Header => Style::default().fg(theme.hunk_header_foreground()),
        LineType::Context => Style::default().fg(theme.context_foreground()),
    }
}

fn emphasis(line_type: LineType, theme: &dyn ThemeProvider) -> Style {
    let bg = match line_type {
        LineType::Add => theme.addition_emphasis(),
        _ => theme.deletion_emphasis(),
    };
    line_foreground(line_type, theme)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

fn highlighted(
    highlighter: &mut Option<&mut dyn SyntaxHighlighter>,
    file_name: &str,
    text: &str,
    fallback: Style,
) -> Vec<Segment> {
    match highlighter {
        Some(h) => h
            .highlight(file_name, text)
            .into_iter()
            .map(|span| {
                let style = span.to_style();
                (span.text, style)
            })
            .collect(),
        None => vec![(text.to_string(), fallback)],
    }
}

/// Styled content of a line, already shifted by `h_scroll`.
///
/// Word-diff segments are only honoured when `h_scroll == 0`; their
/// boundaries do not survive slicing.
fn content_segments(
    line: &DiffLine,
    file_name: &str,
    h_scroll: usize,
    highlighter: &mut Option<&mut dyn SyntaxHighlighter>,
    theme: &dyn ThemeProvider,
) -> Vec<Segment> {
    let base = line_foreground(line.line_type, theme);

    let segments: Vec<Segment> = match (&line.word_diff, line.line_type) {
        (Some(words), LineType::Add | LineType::Remove) if h_scroll == 0 => {
            let changed = emphasis(line.line_type, theme);
            let mut out = Vec::new();
            for word in words {
                if word.is_change {
                    out.push((word.text.clone(), changed));
                } else {
                    out.extend(highlighted(highlighter, file_name, &word.text, base));
                }
            }
            out
        }
        (_, LineType::Context) => highlighted(highlighter, file_name, &line.content, base),
        _ => vec![(line.content.clone(), base)],
    };

    let segments = segments
        .into_iter()
        .map(|(text, style)| (expand_tabs(&text), style))
        .collect();
    skip_columns(segments, h_scroll)
}

/// A line's content as it is laid out after horizontal scroll.
fn scrolled_text(line: &DiffLine, h_scroll: usize) -> String {
    skip_columns(vec![(expand_tabs(&line.content), Style::default())], h_scroll)
        .into_iter()
        .map(|(text, _)| text)
        .collect()
}

/// Collects only the rows inside `[start, start + height)`.
struct RowWindow {
    start: usize,
    end: usize,
    pos: usize,
    lines: Vec<Line<'static>>,
}

impl RowWindow {
    fn new(viewport: &Viewport) -> Self {
        Self {
            start: viewport.v_scroll,
            end: viewport.v_scroll.saturating_add(viewport.height),
            pos: 0,
            lines: Vec::new(),
        }
    }

    /// Whether any of the next `count` rows is visible.
    fn wants(&self, count: usize) -> bool {
        self.pos + count > self.start && self.pos < self.end
    }

    fn skip(&mut self, count: usize) {
        self.pos += count;
    }

    fn push(&mut self, line: Line<'static>) {
        if self.pos >= self.start && self.pos < self.end {
            self.lines.push(line);
        }
        self.pos += 1;
    }

    fn is_full(&self) -> bool {
        self.pos >= self.end
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        self.lines
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{DiffLine, Hunk, ParsedDiff};
    use ratatui::text::Line;

    /// Flatten a rendered line to its plain text.
    pub fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    pub fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    /// One hunk: context "ctx", removed "old", added "new".
    pub fn ctx_old_new() -> ParsedDiff {
        let mut diff = ParsedDiff::new("src/lib.rs", "src/lib.rs");
        let mut hunk = Hunk::new(1, 2, 1, 2);
        hunk.lines.push(DiffLine::context("ctx", 1, 1));
        hunk.lines.push(DiffLine::remove("old", 2));
        hunk.lines.push(DiffLine::add("new", 2));
        diff.hunks.push(hunk);
        diff
    }
}

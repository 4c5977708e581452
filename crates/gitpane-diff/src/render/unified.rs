//! Unified (single column) rendering.

use super::text::{pad_to, to_spans, truncate_segments, wrap_rows, wrap_segments, Segment};
use super::{
    content_segments, format_line_no, line_background, line_no_width, renderable, scrolled_text,
    RowWindow, Viewport,
};
use crate::model::{DiffLine, Hunk, ParsedDiff};
use crate::traits::{SyntaxHighlighter, ThemeProvider};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

struct Columns {
    line_no: usize,
    /// Both line numbers, their separators and the marker.
    gutter: usize,
    content: usize,
}

impl Columns {
    fn new(diff: &ParsedDiff, width: usize) -> Self {
        let line_no = line_no_width(diff);
        let gutter = line_no * 2 + 3;
        Self {
            line_no,
            gutter,
            content: width.saturating_sub(gutter).max(1),
        }
    }
}

/// Render a diff as `old new ±content` rows with a header per hunk.
pub fn render_unified(
    diff: Option<&ParsedDiff>,
    viewport: &Viewport,
    mut highlighter: Option<&mut dyn SyntaxHighlighter>,
    theme: &dyn ThemeProvider,
) -> Vec<Line<'static>> {
    let diff = match renderable(diff, theme) {
        Ok(diff) => diff,
        Err(sentinel) => return vec![sentinel],
    };

    let columns = Columns::new(diff, viewport.width);
    let file_name = diff.file_name().to_string();
    let mut rows = RowWindow::new(viewport);

    'hunks: for hunk in &diff.hunks {
        let header_rows = header_row_count(hunk, viewport);
        if rows.wants(header_rows) {
            for line in header_lines(hunk, viewport, theme) {
                rows.push(line);
            }
        } else {
            rows.skip(header_rows);
        }

        for line in &hunk.lines {
            if rows.is_full() {
                break 'hunks;
            }
            let count = line_row_count(line, &columns, viewport);
            if !rows.wants(count) {
                rows.skip(count);
                continue;
            }
            for row in line_rows(line, &file_name, &columns, viewport, &mut highlighter, theme) {
                rows.push(row);
            }
        }
    }

    rows.into_lines()
}

/// Total visual rows of the unified rendering.
pub fn unified_row_count(diff: Option<&ParsedDiff>, width: usize, wrap: bool) -> usize {
    let Some(diff) = diff.filter(|d| !d.binary && !d.is_empty()) else {
        return 1;
    };
    let viewport = Viewport::new(width, 0).wrapped(wrap);
    let columns = Columns::new(diff, width);
    diff.hunks
        .iter()
        .map(|hunk| {
            header_row_count(hunk, &viewport)
                + hunk
                    .lines
                    .iter()
                    .map(|line| line_row_count(line, &columns, &viewport))
                    .sum::<usize>()
        })
        .sum()
}

fn header_row_count(hunk: &Hunk, viewport: &Viewport) -> usize {
    if viewport.wrap {
        wrap_rows(&hunk.header(), viewport.width)
    } else {
        1
    }
}

fn line_row_count(line: &DiffLine, columns: &Columns, viewport: &Viewport) -> usize {
    if viewport.wrap {
        wrap_rows(&scrolled_text(line, viewport.h_scroll), columns.content)
    } else {
        1
    }
}

fn header_lines(hunk: &Hunk, viewport: &Viewport, theme: &dyn ThemeProvider) -> Vec<Line<'static>> {
    let style = Style::default()
        .fg(theme.hunk_header_foreground())
        .bg(theme.hunk_header_background());
    let segments: Vec<Segment> = vec![(hunk.header(), style)];

    let rows = if viewport.wrap {
        wrap_segments(segments, viewport.width)
    } else {
        vec![truncate_segments(segments, viewport.width.max(1), style)]
    };

    rows.into_iter()
        .map(|row| Line::from(to_spans(row)).style(style))
        .collect()
}

fn line_rows(
    line: &DiffLine,
    file_name: &str,
    columns: &Columns,
    viewport: &Viewport,
    highlighter: &mut Option<&mut dyn SyntaxHighlighter>,
    theme: &dyn ThemeProvider,
) -> Vec<Line<'static>> {
    let background = line_background(line.line_type, theme);
    let number_style = background.fg(theme.line_number_foreground());
    let content = content_segments(line, file_name, viewport.h_scroll, highlighter, theme);

    let content_rows = if viewport.wrap {
        wrap_segments(content, columns.content)
    } else {
        vec![truncate_segments(
            content,
            columns.content,
            number_style,
        )]
    };

    let gutter = format!(
        "{} {} ",
        format_line_no(line.old_line_no, columns.line_no),
        format_line_no(line.new_line_no, columns.line_no)
    );
    let marker_style = super::line_foreground(line.line_type, theme);

    content_rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = if i == 0 {
                vec![
                    Span::styled(gutter.clone(), number_style),
                    Span::styled(line.line_type.marker().to_string(), marker_style),
                ]
            } else {
                let mut blank = Vec::new();
                pad_to(&mut blank, columns.gutter, background);
                blank
            };
            spans.extend(to_spans(row));
            Line::from(spans).style(background)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffLine, HighlightedSpan, Hunk, LineType, WordSegment};
    use crate::render::test_support::{ctx_old_new, line_text, texts};
    use crate::render::NO_DIFF_CONTENT;
    use crate::traits::DefaultTheme;
    use pretty_assertions::assert_eq;

    const GUTTER: usize = 4 * 2 + 3;

    fn wide() -> Viewport {
        Viewport::new(120, 100)
    }

    fn single_line(content: &str) -> ParsedDiff {
        let mut diff = ParsedDiff::new("a.txt", "a.txt");
        let mut hunk = Hunk::new(1, 1, 1, 1);
        hunk.lines.push(DiffLine::context(content, 1, 1));
        diff.hunks.push(hunk);
        diff
    }

    /// Strip gutter and marker from a content row.
    fn content_of(row: &str) -> String {
        row.chars().skip(GUTTER).collect::<String>()
    }

    #[test]
    fn test_nil_and_binary_sentinels() {
        let theme = DefaultTheme;
        let nil = render_unified(None, &wide(), None, &theme);
        assert_eq!(texts(&nil), vec![NO_DIFF_CONTENT]);

        let empty = ParsedDiff::default();
        let lines = render_unified(Some(&empty), &wide(), None, &theme);
        assert!(line_text(&lines[0]).contains("No diff content"));

        let binary = ParsedDiff::binary("a.png", "a.png");
        let lines = render_unified(Some(&binary), &wide(), None, &theme);
        assert_eq!(lines.len(), 1);
        assert!(line_text(&lines[0]).contains("Binary"));
    }

    #[test]
    fn test_header_and_markers() {
        let diff = ctx_old_new();
        let lines = render_unified(Some(&diff), &wide(), None, &DefaultTheme);
        let rows = texts(&lines);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "@@ -1,2 +1,2 @@");
        assert_eq!(rows[1], "   1    1  ctx");
        assert_eq!(rows[2], "   2      -old");
        assert_eq!(rows[3], "        2 +new");
    }

    #[test]
    fn test_round_trip_content_columns() {
        let mut diff = ParsedDiff::new("a.rs", "a.rs");
        let mut hunk = Hunk::new(10, 3, 10, 3);
        hunk.lines.push(DiffLine::context("fn a() {", 10, 10));
        hunk.lines.push(DiffLine::remove("    old();", 11));
        hunk.lines.push(DiffLine::add("    new();", 11));
        hunk.lines.push(DiffLine::context("}", 12, 12));
        diff.hunks.push(hunk);
        let mut second = Hunk::new(40, 1, 40, 1);
        second.lines.push(DiffLine::context("tail", 40, 40));
        diff.hunks.push(second);

        let lines = render_unified(Some(&diff), &wide(), None, &DefaultTheme);
        let contents: Vec<String> = texts(&lines)
            .iter()
            .filter(|row| !row.starts_with("@@"))
            .map(|row| content_of(row))
            .collect();
        let expected: Vec<String> = diff.lines().map(|l| l.content.clone()).collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_h_scroll_slices_content() {
        let diff = single_line("0123456789ABCDEFGHIJ");
        let viewport = wide().scrolled(0, 5);
        let lines = render_unified(Some(&diff), &viewport, None, &DefaultTheme);
        let content = content_of(&line_text(&lines[1]));

        assert!(!content.contains("01234"));
        assert!(content.contains("56789"));
        assert_eq!(content, "56789ABCDEFGHIJ");
    }

    #[test]
    fn test_h_scroll_is_idempotent_and_past_end_is_blank() {
        let diff = single_line("short");
        let viewport = wide().scrolled(0, 3);
        let first = texts(&render_unified(Some(&diff), &viewport, None, &DefaultTheme));
        let second = texts(&render_unified(Some(&diff), &viewport, None, &DefaultTheme));
        assert_eq!(first, second);

        let past = wide().scrolled(0, 50);
        let lines = render_unified(Some(&diff), &past, None, &DefaultTheme);
        assert!(content_of(&line_text(&lines[1])).trim().is_empty());
    }

    #[test]
    fn test_truncates_with_ellipsis() {
        let diff = single_line("abcdefghijklmnopqrstuvwxyz");
        let viewport = Viewport::new(GUTTER + 10, 10);
        let lines = render_unified(Some(&diff), &viewport, None, &DefaultTheme);
        assert_eq!(content_of(&line_text(&lines[1])), "abcdefg...");
    }

    #[test]
    fn test_wrap_expands_rows() {
        let diff = single_line("abcdefghijklmnopqrstuvwxyz");
        let viewport = Viewport::new(GUTTER + 10, 10).wrapped(true);
        let lines = render_unified(Some(&diff), &viewport, None, &DefaultTheme);
        let rows = texts(&lines);

        // Header plus ceil(26 / 10) rows.
        assert_eq!(rows.len(), 4);
        assert_eq!(content_of(&rows[1]), "abcdefghij");
        assert_eq!(rows[2], format!("{}klmnopqrst", " ".repeat(GUTTER)));
        assert_eq!(content_of(&rows[3]), "uvwxyz");
        assert_eq!(unified_row_count(Some(&diff), GUTTER + 10, true), 4);
        assert_eq!(unified_row_count(Some(&diff), GUTTER + 10, false), 2);
    }

    #[test]
    fn test_wrap_counts_wide_chars_like_rendering() {
        // Ten columns of two-column chars need three rows of five, not two.
        let diff = single_line("日本語です");
        let viewport = Viewport::new(GUTTER + 5, 100).wrapped(true);
        let rows = texts(&render_unified(Some(&diff), &viewport, None, &DefaultTheme));
        assert_eq!(rows.len(), 4);
        assert_eq!(content_of(&rows[1]), "日本");
        assert_eq!(unified_row_count(Some(&diff), GUTTER + 5, true), rows.len());

        // The last wrapped row is still reachable by scrolling.
        let bottom = Viewport::new(GUTTER + 5, 1).wrapped(true).scrolled(3, 0);
        let rows = texts(&render_unified(Some(&diff), &bottom, None, &DefaultTheme));
        assert_eq!(rows.len(), 1);
        assert_eq!(content_of(&rows[0]), "す");
    }

    #[test]
    fn test_viewport_limits_rows() {
        let diff = ctx_old_new();
        let viewport = Viewport::new(80, 2).scrolled(1, 0);
        let rows = texts(&render_unified(Some(&diff), &viewport, None, &DefaultTheme));
        assert_eq!(rows.len(), 2);
        assert!(rows[0].ends_with("ctx"));
        assert!(rows[1].ends_with("-old"));
    }

    #[test]
    fn test_word_diff_emphasis_and_scroll_disables_it() {
        let theme = DefaultTheme;
        let mut diff = ParsedDiff::new("a.txt", "a.txt");
        let mut hunk = Hunk::new(1, 1, 1, 1);
        let mut added = DiffLine::add("let b = 2;", 1);
        added.word_diff = Some(vec![
            WordSegment::new("let ", false),
            WordSegment::new("b", true),
            WordSegment::new(" = 2;", false),
        ]);
        hunk.lines.push(added);
        diff.hunks.push(hunk);

        let lines = render_unified(Some(&diff), &wide(), None, &theme);
        let emphasised: Vec<_> = lines[1]
            .spans
            .iter()
            .filter(|s| s.style.bg == Some(theme.addition_emphasis()))
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(emphasised, vec!["b"]);

        let scrolled = render_unified(Some(&diff), &wide().scrolled(0, 1), None, &theme);
        assert!(scrolled[1]
            .spans
            .iter()
            .all(|s| s.style.bg != Some(theme.addition_emphasis())));
    }

    struct Upper;

    impl SyntaxHighlighter for Upper {
        fn highlight(&mut self, _file_name: &str, content: &str) -> Vec<HighlightedSpan> {
            vec![HighlightedSpan::plain(content.to_uppercase())]
        }
    }

    #[test]
    fn test_highlighter_applies_to_context_only() {
        let diff = ctx_old_new();
        let mut upper = Upper;
        let lines = render_unified(Some(&diff), &wide(), Some(&mut upper), &DefaultTheme);
        let rows = texts(&lines);
        assert!(rows[1].ends_with("CTX"));
        assert!(rows[2].ends_with("old"));
        assert_eq!(diff.hunks[0].lines[0].line_type, LineType::Context);
    }
}

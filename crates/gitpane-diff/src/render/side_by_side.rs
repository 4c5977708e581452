//! Side-by-side rendering: old file on the left, new file on the right.

use super::text::{
    display_width, expand_tabs, pad_to, to_spans, truncate_segments, wrap_segments,
    wrap_rows, Segment,
};
use super::{
    content_segments, format_line_no, line_background, line_foreground, line_no_width,
    renderable, scrolled_text, RowWindow, Viewport,
};
use crate::model::{DiffLine, Hunk, LineType, ParsedDiff};
use crate::traits::{SyntaxHighlighter, ThemeProvider};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

const SEPARATOR: &str = "│";

/// One visual pairing of an old-side and a new-side line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePair<'a> {
    pub left: Option<&'a DiffLine>,
    pub right: Option<&'a DiffLine>,
}

/// Whether content is hidden beyond either horizontal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipInfo {
    pub has_more_left: bool,
    pub has_more_right: bool,
}

/// Pair lines for side-by-side display.
///
/// Context lines appear on both sides. A run of removed lines is paired in
/// order with the run of added lines that follows it; the longer run gets an
/// empty opposite side for its surplus lines.
pub fn group_lines_for_side_by_side(lines: &[DiffLine]) -> Vec<LinePair<'_>> {
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        match lines[i].line_type {
            LineType::Context | LineType::Header => {
                pairs.push(LinePair {
                    left: Some(&lines[i]),
                    right: Some(&lines[i]),
                });
                i += 1;
            }
            LineType::Remove | LineType::Add => {
                let removes_start = i;
                while i < lines.len() && lines[i].line_type == LineType::Remove {
                    i += 1;
                }
                let adds_start = i;
                while i < lines.len() && lines[i].line_type == LineType::Add {
                    i += 1;
                }
                let removes = &lines[removes_start..adds_start];
                let adds = &lines[adds_start..i];
                for k in 0..removes.len().max(adds.len()) {
                    pairs.push(LinePair {
                        left: removes.get(k),
                        right: adds.get(k),
                    });
                }
            }
        }
    }

    pairs
}

struct Halves {
    line_no: usize,
    left: usize,
    right: usize,
}

impl Halves {
    fn new(diff: &ParsedDiff, width: usize) -> Self {
        let inner = width.saturating_sub(SEPARATOR.chars().count());
        let left = inner / 2;
        Self {
            line_no: line_no_width(diff),
            left,
            right: inner - left,
        }
    }

    fn gutter(&self) -> usize {
        self.line_no + 2
    }

    fn content(&self, half: usize) -> usize {
        half.saturating_sub(self.gutter()).max(1)
    }
}

/// Content columns available in each half at `width`, for clip indicators.
pub fn side_by_side_content_width(diff: Option<&ParsedDiff>, width: usize) -> usize {
    match diff {
        Some(diff) => {
            let halves = Halves::new(diff, width);
            halves.content(halves.left)
        }
        None => width,
    }
}

/// Report whether horizontally scrolled content is clipped on either side.
pub fn side_by_side_clip_info(
    diff: Option<&ParsedDiff>,
    content_width: usize,
    h_scroll: usize,
) -> ClipInfo {
    let widest = diff
        .map(|d| {
            d.lines()
                .map(|l| display_width(&expand_tabs(&l.content)))
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);

    ClipInfo {
        has_more_left: h_scroll > 0,
        has_more_right: widest > h_scroll + content_width,
    }
}

/// Render a diff as two columns separated by `│`.
pub fn render_side_by_side(
    diff: Option<&ParsedDiff>,
    viewport: &Viewport,
    mut highlighter: Option<&mut dyn SyntaxHighlighter>,
    theme: &dyn ThemeProvider,
) -> Vec<Line<'static>> {
    let diff = match renderable(diff, theme) {
        Ok(diff) => diff,
        Err(sentinel) => return vec![sentinel],
    };

    let halves = Halves::new(diff, viewport.width);
    let file_name = diff.file_name().to_string();
    let mut rows = RowWindow::new(viewport);

    'hunks: for hunk in &diff.hunks {
        if rows.wants(1) {
            rows.push(header_line(hunk, viewport.width, theme));
        } else {
            rows.skip(1);
        }

        for pair in group_lines_for_side_by_side(&hunk.lines) {
            if rows.is_full() {
                break 'hunks;
            }
            let count = pair_row_count(&pair, &halves, viewport);
            if !rows.wants(count) {
                rows.skip(count);
                continue;
            }
            for row in pair_rows(&pair, &file_name, &halves, viewport, &mut highlighter, theme) {
                rows.push(row);
            }
        }
    }

    rows.into_lines()
}

/// Total visual rows of the side-by-side rendering.
pub fn side_by_side_row_count(diff: Option<&ParsedDiff>, width: usize, wrap: bool) -> usize {
    let Some(diff) = diff.filter(|d| !d.binary && !d.is_empty()) else {
        return 1;
    };
    let viewport = Viewport::new(width, 0).wrapped(wrap);
    let halves = Halves::new(diff, width);
    diff.hunks
        .iter()
        .map(|hunk| {
            1 + group_lines_for_side_by_side(&hunk.lines)
                .iter()
                .map(|pair| pair_row_count(pair, &halves, &viewport))
                .sum::<usize>()
        })
        .sum()
}

fn side_row_count(line: Option<&DiffLine>, content_width: usize, viewport: &Viewport) -> usize {
    match line {
        Some(line) if viewport.wrap => {
            wrap_rows(&scrolled_text(line, viewport.h_scroll), content_width)
        }
        _ => 1,
    }
}

fn pair_row_count(pair: &LinePair<'_>, halves: &Halves, viewport: &Viewport) -> usize {
    side_row_count(pair.left, halves.content(halves.left), viewport).max(side_row_count(
        pair.right,
        halves.content(halves.right),
        viewport,
    ))
}

fn header_line(hunk: &Hunk, width: usize, theme: &dyn ThemeProvider) -> Line<'static> {
    let style = Style::default()
        .fg(theme.hunk_header_foreground())
        .bg(theme.hunk_header_background());
    let segments = truncate_segments(vec![(hunk.header(), style)], width.max(1), style);
    Line::from(to_spans(segments)).style(style)
}

/// Which line number a side shows.
#[derive(Clone, Copy)]
enum Side {
    Old,
    New,
}

#[allow(clippy::too_many_arguments)]
fn side_rows(
    line: Option<&DiffLine>,
    side: Side,
    half: usize,
    file_name: &str,
    halves: &Halves,
    viewport: &Viewport,
    highlighter: &mut Option<&mut dyn SyntaxHighlighter>,
    theme: &dyn ThemeProvider,
) -> Vec<Vec<Span<'static>>> {
    let Some(line) = line else {
        let mut blank = Vec::new();
        pad_to(&mut blank, half, Style::default());
        return vec![blank];
    };

    let background = line_background(line.line_type, theme);
    let number_style = background.fg(theme.line_number_foreground());
    let content_width = halves.content(half);
    let content: Vec<Segment> =
        content_segments(line, file_name, viewport.h_scroll, highlighter, theme)
            .into_iter()
            .map(|(text, style)| (text, background.patch(style)))
            .collect();

    let content_rows = if viewport.wrap {
        wrap_segments(content, content_width)
    } else {
        vec![truncate_segments(content, content_width, number_style)]
    };

    let number = match side {
        Side::Old => line.old_line_no,
        Side::New => line.new_line_no,
    };
    let gutter = format!("{} ", format_line_no(number, halves.line_no));
    let marker_style = background.patch(line_foreground(line.line_type, theme));

    content_rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = Vec::new();
            if i == 0 {
                spans.push(Span::styled(gutter.clone(), number_style));
                spans.push(Span::styled(
                    line.line_type.marker().to_string(),
                    marker_style,
                ));
            } else {
                pad_to(&mut spans, halves.gutter(), background);
            }
            spans.extend(to_spans(row));
            pad_to(&mut spans, half, background);
            spans
        })
        .collect()
}

fn pair_rows(
    pair: &LinePair<'_>,
    file_name: &str,
    halves: &Halves,
    viewport: &Viewport,
    highlighter: &mut Option<&mut dyn SyntaxHighlighter>,
    theme: &dyn ThemeProvider,
) -> Vec<Line<'static>> {
    let left = side_rows(
        pair.left,
        Side::Old,
        halves.left,
        file_name,
        halves,
        viewport,
        highlighter,
        theme,
    );
    let right = side_rows(
        pair.right,
        Side::New,
        halves.right,
        file_name,
        halves,
        viewport,
        highlighter,
        theme,
    );

    let separator = Style::default().fg(theme.separator_foreground());
    let count = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();

    (0..count)
        .map(|_| {
            let mut spans = left.next().unwrap_or_else(|| {
                let mut blank = Vec::new();
                pad_to(&mut blank, halves.left, Style::default());
                blank
            });
            spans.push(Span::styled(SEPARATOR, separator));
            spans.extend(right.next().unwrap_or_default());
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::{ctx_old_new, line_text, texts};
    use crate::traits::DefaultTheme;
    use pretty_assertions::assert_eq;

    fn kinds(pairs: &[LinePair<'_>]) -> Vec<(Option<LineType>, Option<LineType>)> {
        pairs
            .iter()
            .map(|p| (p.left.map(|l| l.line_type), p.right.map(|l| l.line_type)))
            .collect()
    }

    #[test]
    fn test_pairing_remove_add() {
        let lines = vec![DiffLine::remove("old", 1), DiffLine::add("new", 1)];
        let pairs = group_lines_for_side_by_side(&lines);
        assert_eq!(
            kinds(&pairs),
            vec![(Some(LineType::Remove), Some(LineType::Add))]
        );
    }

    #[test]
    fn test_pairing_surplus_removes() {
        let lines = vec![
            DiffLine::remove("a", 1),
            DiffLine::remove("b", 2),
            DiffLine::add("c", 1),
        ];
        let pairs = group_lines_for_side_by_side(&lines);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].right.map(|l| l.content.as_str()), Some("c"));
        assert_eq!(pairs[1].left.map(|l| l.content.as_str()), Some("b"));
        assert!(pairs[1].right.is_none());
    }

    #[test]
    fn test_pairing_surplus_adds_and_context() {
        let lines = vec![
            DiffLine::context("x", 1, 1),
            DiffLine::add("a", 2),
            DiffLine::add("b", 3),
            DiffLine::context("y", 2, 4),
        ];
        let pairs = group_lines_for_side_by_side(&lines);
        assert_eq!(
            kinds(&pairs),
            vec![
                (Some(LineType::Context), Some(LineType::Context)),
                (None, Some(LineType::Add)),
                (None, Some(LineType::Add)),
                (Some(LineType::Context), Some(LineType::Context)),
            ]
        );
    }

    #[test]
    fn test_render_columns() {
        let diff = ctx_old_new();
        let lines = render_side_by_side(Some(&diff), &Viewport::new(40, 20), None, &DefaultTheme);
        let rows = texts(&lines);

        assert!(rows.iter().any(|r| r.contains('│')));
        let (left, right): (Vec<String>, Vec<String>) = rows
            .iter()
            .filter_map(|r| r.split_once('│'))
            .map(|(l, r)| (l.to_string(), r.to_string()))
            .unzip();
        let left = left.join("\n");
        let right = right.join("\n");

        assert!(left.contains("ctx"));
        assert!(left.contains("old"));
        assert!(!left.contains("new"));
        assert!(right.contains("ctx"));
        assert!(right.contains("new"));
        assert!(!right.contains("old"));
    }

    #[test]
    fn test_separator_is_aligned() {
        let mut diff = ctx_old_new();
        diff.hunks[0].lines.push(DiffLine::add("only new", 3));
        let lines = render_side_by_side(Some(&diff), &Viewport::new(40, 20), None, &DefaultTheme);

        let columns: Vec<usize> = texts(&lines)
            .iter()
            .skip(1)
            .map(|r| r.chars().position(|c| c == '│').unwrap())
            .collect();
        assert!(columns.iter().all(|&c| c == 19), "{:?}", columns);
    }

    #[test]
    fn test_sentinels() {
        let theme = DefaultTheme;
        let nil = render_side_by_side(None, &Viewport::new(40, 5), None, &theme);
        assert!(line_text(&nil[0]).contains("No diff content"));

        let binary = ParsedDiff::binary("x", "x");
        let lines = render_side_by_side(Some(&binary), &Viewport::new(40, 5), None, &theme);
        assert!(line_text(&lines[0]).contains("Binary"));
    }

    #[test]
    fn test_clip_info() {
        let diff = ctx_old_new();
        assert_eq!(
            side_by_side_clip_info(Some(&diff), 2, 0),
            ClipInfo {
                has_more_left: false,
                has_more_right: true
            }
        );
        assert_eq!(
            side_by_side_clip_info(Some(&diff), 2, 1),
            ClipInfo {
                has_more_left: true,
                has_more_right: false
            }
        );
        assert_eq!(side_by_side_clip_info(None, 10, 0), ClipInfo::default());
        assert_eq!(side_by_side_content_width(Some(&diff), 40), 13);
    }

    #[test]
    fn test_row_count_with_wrap() {
        let mut diff = ParsedDiff::new("a", "a");
        let mut hunk = Hunk::new(1, 1, 1, 1);
        hunk.lines.push(DiffLine::remove("abcdefghijklmnopqrstuvwxyz", 1));
        hunk.lines.push(DiffLine::add("short", 1));
        diff.hunks.push(hunk);

        // 40 columns: halves of 19/20, 13/14 content columns.
        assert_eq!(side_by_side_row_count(Some(&diff), 40, false), 2);
        assert_eq!(side_by_side_row_count(Some(&diff), 40, true), 3);

        let viewport = Viewport::new(40, 20).wrapped(true);
        let lines = render_side_by_side(Some(&diff), &viewport, None, &DefaultTheme);
        assert_eq!(lines.len(), 3);
    }
}

//! Column-aware text slicing on styled segments.
//!
//! All widths are terminal display columns, never bytes. Slicing only ever
//! cuts between chars, so multi-byte and wide characters stay intact.

use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A run of text sharing one style.
pub(crate) type Segment = (String, Style);

pub(crate) const ELLIPSIS: &str = "...";
const TAB: &str = "    ";

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Replace tabs with spaces so widths are predictable.
pub(crate) fn expand_tabs(s: &str) -> String {
    if s.contains('\t') {
        s.replace('\t', TAB)
    } else {
        s.to_string()
    }
}

/// Slice `s` to the columns `[start, start + max)`.
///
/// A wide character straddling either edge is dropped rather than split.
pub fn slice_columns(s: &str, start: usize, max: usize) -> String {
    let segments = vec![(s.to_string(), Style::default())];
    take_columns(&skip_columns(segments, start), max)
        .into_iter()
        .map(|(text, _)| text)
        .collect()
}

pub(crate) fn segments_width(segments: &[Segment]) -> usize {
    segments.iter().map(|(t, _)| display_width(t)).sum()
}

/// Drop the first `start` columns.
pub(crate) fn skip_columns(segments: Vec<Segment>, start: usize) -> Vec<Segment> {
    if start == 0 {
        return segments;
    }

    let mut col = 0;
    let mut out = Vec::new();
    for (text, style) in segments {
        let mut kept = String::new();
        for c in text.chars() {
            let w = char_width(c);
            if col >= start {
                kept.push(c);
            }
            col += w;
        }
        if !kept.is_empty() {
            out.push((kept, style));
        }
    }
    out
}

/// Keep at most `max` columns.
pub(crate) fn take_columns(segments: &[Segment], max: usize) -> Vec<Segment> {
    let mut col = 0;
    let mut out = Vec::new();
    for (text, style) in segments {
        let mut kept = String::new();
        let mut full = false;
        for c in text.chars() {
            let w = char_width(c);
            if col + w > max {
                full = true;
                break;
            }
            kept.push(c);
            col += w;
        }
        if !kept.is_empty() {
            out.push((kept, *style));
        }
        if full {
            break;
        }
    }
    out
}

/// Fit segments into `width` columns, ending with `...` when they overflow.
pub(crate) fn truncate_segments(
    segments: Vec<Segment>,
    width: usize,
    ellipsis_style: Style,
) -> Vec<Segment> {
    if segments_width(&segments) <= width {
        return segments;
    }
    if width <= ELLIPSIS.len() {
        return vec![(".".repeat(width), ellipsis_style)];
    }
    let mut out = take_columns(&segments, width - ELLIPSIS.len());
    out.push((ELLIPSIS.to_string(), ellipsis_style));
    out
}

/// Split segments into rows of at most `width` columns. Always yields one row.
pub(crate) fn wrap_segments(segments: Vec<Segment>, width: usize) -> Vec<Vec<Segment>> {
    let width = width.max(1);
    let mut rows = vec![Vec::new()];
    let mut col = 0;

    for (text, style) in segments {
        let mut current = String::new();
        for c in text.chars() {
            let w = char_width(c);
            if col + w > width && col > 0 {
                if !current.is_empty() {
                    if let Some(row) = rows.last_mut() {
                        row.push((std::mem::take(&mut current), style));
                    }
                }
                rows.push(Vec::new());
                col = 0;
            }
            current.push(c);
            col += w;
        }
        if !current.is_empty() {
            if let Some(row) = rows.last_mut() {
                row.push((current, style));
            }
        }
    }

    rows
}

/// Number of rows `wrap_segments` produces for `text`.
///
/// Walks chars with the same break rule, so a wide char that does not fit
/// the rest of a row starts a new one.
pub(crate) fn wrap_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut rows = 1;
    let mut col = 0;
    for c in text.chars() {
        let w = char_width(c);
        if col + w > width && col > 0 {
            rows += 1;
            col = 0;
        }
        col += w;
    }
    rows
}

/// Right-pad spans with spaces up to `width` columns.
pub(crate) fn pad_to(spans: &mut Vec<Span<'static>>, width: usize, style: Style) {
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

pub(crate) fn to_spans(segments: Vec<Segment>) -> Vec<Span<'static>> {
    segments
        .into_iter()
        .map(|(text, style)| Span::styled(text, style))
        .collect()
}

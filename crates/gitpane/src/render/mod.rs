//! Painting. Reads the view and its precomputed [`FrameLayout`] and never
//! mutates either, so every rect used here is the one the hit map holds.
//!
//! [`FrameLayout`]: crate::status::FrameLayout

mod diff_pane;
mod modals;
mod sidebar;
pub mod time;

use crate::status::StatusView;
use crate::theme::Theme;
use gitpane_diff::DiffHighlighter;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(f: &mut Frame, view: &StatusView, theme: &Theme, highlighter: &mut DiffHighlighter) {
    let layout = view.frame();
    f.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), layout.area);

    if layout.full_diff {
        diff_pane::render_full(f, view, theme, highlighter);
    } else {
        if view.sidebar_visible {
            sidebar::render(f, view, theme);
            render_divider(f, layout.panes.divider, view, theme);
        }
        diff_pane::render(f, view, theme, highlighter);
    }

    if layout.modal.is_some() {
        modals::render(f, view, theme);
    }
}

fn render_divider(f: &mut Frame, area: Rect, view: &StatusView, theme: &Theme) {
    let style = if view.mouse.is_dragging() {
        Style::default().fg(theme.accent_primary)
    } else {
        theme.dimmed()
    };
    let lines: Vec<Line> = (0..area.height).map(|_| Line::styled("│", style)).collect();
    f.render_widget(Paragraph::new(lines), area);
}

/// Draw a transient notice in the bottom-right corner
pub fn render_toast(f: &mut Frame, text: &str, theme: &Theme) {
    let area = f.area();
    let width = (text.width() as u16 + 4).min(area.width.saturating_sub(2));
    if width < 5 || area.height < 4 {
        return;
    }
    let rect = Rect::new(
        area.right().saturating_sub(width + 1),
        area.bottom().saturating_sub(4),
        width,
        3,
    );
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent_secondary))
        .style(Style::default().bg(theme.bg_panel));
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    f.render_widget(
        Paragraph::new(Line::styled(
            truncate(text, usize::from(inner.width)),
            theme.text(),
        )),
        inner,
    );
}

/// Cut `text` to `width` columns, ending in `…` when shortened
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left and right text on one row, the right side kept whole
pub(crate) fn split_row<'a>(
    left: Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
) -> Line<'a> {
    let right_width: usize = right.iter().map(|s| s.width()).sum();
    let room = width.saturating_sub(right_width + 1);
    let mut spans = Vec::new();
    let mut used = 0;
    for span in left {
        if used >= room {
            break;
        }
        let text = truncate(&span.content, room - used);
        used += text.width();
        spans.push(Span::styled(text, span.style));
    }
    if right_width > 0 && right_width < width {
        spans.push(Span::raw(" ".repeat(width - used - right_width)));
        spans.extend(right);
    }
    Line::from(spans)
}

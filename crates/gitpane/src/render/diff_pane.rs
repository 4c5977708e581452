//! Right pane (inline diff or commit preview) and the full-screen diff

use super::time::relative_time;
use super::{split_row, truncate};
use crate::command::DiffSource;
use crate::status::{preview_body_lines, FocusPane, Mode, StatusView};
use crate::theme::Theme;
use chrono::Utc;
use gitpane_diff::{
    display_width, render_diff, side_by_side_clip_info, side_by_side_content_width,
    window_lines, DiffHighlighter, DiffViewMode, ParsedDiff, SyntaxHighlighter, Viewport,
    NO_DIFF_CONTENT,
};
use gitpane_vcs::Commit;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What one diff area shows
struct DiffContent<'a> {
    source: Option<&'a DiffSource>,
    diff: Option<&'a ParsedDiff>,
    external: Option<&'a [Line<'static>]>,
    error: Option<&'a str>,
    loading: bool,
    scroll: usize,
    h_scroll: usize,
}

pub fn render(f: &mut Frame, view: &StatusView, theme: &Theme, highlighter: &mut DiffHighlighter) {
    let layout = view.frame();
    let focused = view.active_pane() == FocusPane::Diff && matches!(view.mode(), Mode::Status);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(focused))
        .style(Style::default().bg(theme.bg_primary));
    f.render_widget(block, layout.panes.diff);

    if let Some(commit) = view.preview_commit() {
        render_preview(f, view, commit, theme, focused);
        return;
    }

    match (&view.selected_diff, &view.inline_diff) {
        (Some(source), Some(payload)) => {
            let content = DiffContent {
                source: Some(source),
                diff: payload.diff.as_ref(),
                external: payload.external.as_deref(),
                error: payload.error.as_deref(),
                loading: false,
                scroll: view.diff_pane_scroll,
                h_scroll: view.diff_pane_h_scroll,
            };
            render_content(f, view, &content, layout.diff_inner, theme, highlighter);
        }
        (Some(source), None) => {
            let content = DiffContent {
                source: Some(source),
                diff: None,
                external: None,
                error: None,
                loading: true,
                scroll: 0,
                h_scroll: 0,
            };
            render_content(f, view, &content, layout.diff_inner, theme, highlighter);
        }
        _ => placeholder(f, layout.diff_inner, "Select a file to view diff", theme),
    }
}

pub fn render_full(
    f: &mut Frame,
    view: &StatusView,
    theme: &Theme,
    highlighter: &mut DiffHighlighter,
) {
    let Mode::Diff(state) = view.mode() else {
        return;
    };
    let layout = view.frame();
    let hints = Line::from(vec![
        Span::styled(" esc", theme.key_hint()),
        Span::styled(" back  ", theme.key_description()),
        Span::styled("v", theme.key_hint()),
        Span::styled(" layout  ", theme.key_description()),
        Span::styled("O", theme.key_hint()),
        Span::styled(" reveal ", theme.key_description()),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(true))
        .title_bottom(hints)
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg_primary));
    f.render_widget(block, layout.area);

    let content = DiffContent {
        source: state.source.as_ref(),
        diff: state.diff.as_ref(),
        external: state.external.as_deref(),
        error: state.error.as_deref(),
        loading: state.loading && state.diff.is_none() && state.external.is_none(),
        scroll: state.scroll,
        h_scroll: state.h_scroll,
    };
    render_content(f, view, &content, layout.diff_inner, theme, highlighter);
}

fn placeholder(f: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height / 2;
    f.render_widget(
        Paragraph::new(Line::styled(text.to_string(), theme.muted())).alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1),
    );
}

/// Header rows then the visible window of the diff
fn render_content(
    f: &mut Frame,
    view: &StatusView,
    content: &DiffContent,
    inner: Rect,
    theme: &Theme,
    highlighter: &mut DiffHighlighter,
) {
    if inner.height < 3 {
        return;
    }
    let width = usize::from(inner.width);
    let mode = view.diff_mode;

    // Row 1: path and counts
    let path = content.source.map(DiffSource::path).unwrap_or_default();
    let mut title = vec![Span::styled(path.to_string(), theme.panel_title())];
    if let Some(DiffSource::Commit { hash, .. }) = content.source {
        title.push(Span::styled(
            format!(" @ {}", gitpane_vcs::short_hash(hash)),
            theme.commit_hash(),
        ));
    }
    let counts = match content.diff {
        Some(diff) => vec![
            Span::styled(format!("+{}", diff.additions()), theme.additions()),
            Span::raw(" "),
            Span::styled(format!("-{}", diff.deletions()), theme.deletions()),
        ],
        None => vec![],
    };
    f.render_widget(
        Paragraph::new(split_row(title, counts, width)),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );

    // Row 2: layout and clip markers
    let label = match mode {
        DiffViewMode::Unified => "unified",
        DiffViewMode::SideBySide => "side-by-side",
    };
    let mut status = vec![Span::styled(label, theme.muted())];
    if content.external.is_some() {
        status.push(Span::styled(" (delta)", theme.muted()));
    }
    let (left_clip, right_clip) = clip_markers(mode, content, width);
    let markers = vec![
        Span::styled(if left_clip { "◀" } else { " " }, theme.warning()),
        Span::styled(if right_clip { "▶" } else { " " }, theme.warning()),
    ];
    f.render_widget(
        Paragraph::new(split_row(status, markers, width)),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let body = Rect::new(inner.x, inner.y + 2, inner.width, inner.height - 2);
    if content.loading {
        placeholder(f, body, "Loading…", theme);
        return;
    }
    if let Some(error) = content.error {
        let lines: Vec<Line> = error
            .lines()
            .map(|l| Line::styled(truncate(l, width), theme.error()))
            .collect();
        f.render_widget(Paragraph::new(lines), body);
        return;
    }

    let viewport = Viewport::new(width, usize::from(body.height))
        .scrolled(content.scroll, content.h_scroll)
        .wrapped(view.config.wrap_lines);
    let lines = match content.external {
        Some(lines) => window_lines(lines, &viewport),
        None if content.diff.is_none() => {
            vec![Line::styled(NO_DIFF_CONTENT, theme.muted())]
        }
        None => render_diff(
            mode,
            content.diff,
            &viewport,
            Some(highlighter as &mut dyn SyntaxHighlighter),
            theme,
        ),
    };
    f.render_widget(Paragraph::new(lines), body);
}

/// Whether content is hidden past the left and right edges
fn clip_markers(mode: DiffViewMode, content: &DiffContent, width: usize) -> (bool, bool) {
    if content.external.is_some() || content.diff.is_none() {
        return (content.h_scroll > 0, false);
    }
    match mode {
        DiffViewMode::SideBySide => {
            let column = side_by_side_content_width(content.diff, width);
            let clip = side_by_side_clip_info(content.diff, column, content.h_scroll);
            (clip.has_more_left, clip.has_more_right)
        }
        DiffViewMode::Unified => {
            let widest = content
                .diff
                .map(|d| d.lines().map(|l| display_width(&l.content)).max().unwrap_or(0))
                .unwrap_or(0);
            (content.h_scroll > 0, widest > content.h_scroll + width)
        }
    }
}

fn render_preview(f: &mut Frame, view: &StatusView, commit: &Commit, theme: &Theme, focused: bool) {
    let layout = view.frame();
    let inner = layout.diff_inner;
    let width = usize::from(inner.width);
    let now = Utc::now();

    let mut header = Vec::new();
    let mut badge = vec![
        Span::styled(format!("commit {}", commit.short_hash), theme.commit_hash()),
        Span::styled(format!("  {}", commit.author), theme.text()),
    ];
    if !commit.pushed {
        badge.push(Span::styled("  unpushed", Style::default().fg(theme.commit_unpushed)));
    }
    header.push(split_row(
        badge,
        vec![Span::styled(relative_time(commit.date, now), theme.muted())],
        width,
    ));
    header.push(Line::styled(
        truncate(&commit.subject, width),
        theme.text().add_modifier(Modifier::BOLD),
    ));
    for line in preview_body_lines(commit) {
        header.push(Line::styled(truncate(line, width), theme.muted()));
    }
    header.push(Line::styled("─".repeat(width), theme.dimmed()));
    let stats = commit.stats;
    header.push(split_row(
        vec![Span::styled(
            format!("Files ({})", commit.files.len()),
            theme.section_header(),
        )],
        vec![
            Span::styled(format!("+{}", stats.additions), theme.additions()),
            Span::raw(" "),
            Span::styled(format!("-{}", stats.deletions), theme.deletions()),
        ],
        width,
    ));
    let header_height = (header.len() as u16).min(inner.height);
    f.render_widget(
        Paragraph::new(header),
        Rect::new(inner.x, inner.y, inner.width, header_height),
    );

    let list = layout.preview_files;
    if list.height == 0 {
        return;
    }
    let lines: Vec<Line> = commit
        .files
        .iter()
        .enumerate()
        .skip(view.preview_scroll)
        .take(usize::from(list.height))
        .map(|(i, file)| {
            let left = vec![
                Span::styled(format!(" {} ", file.status.symbol()), theme.file_status(file.status)),
                Span::styled(file.path.clone(), theme.text()),
            ];
            let mut right = Vec::new();
            if file.additions > 0 {
                right.push(Span::styled(format!("+{}", file.additions), theme.additions()));
            }
            if file.deletions > 0 {
                if !right.is_empty() {
                    right.push(Span::raw(" "));
                }
                right.push(Span::styled(format!("-{}", file.deletions), theme.deletions()));
            }
            let line = split_row(left, right, usize::from(list.width));
            if i == view.preview_cursor {
                line.style(theme.selected(focused))
            } else {
                line
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list);
}

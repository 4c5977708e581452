//! Sidebar: header, file sections, remote status, commits and stashes

use super::time::relative_time;
use super::{split_row, truncate};
use crate::model::DiffStats;
use crate::status::{FileRow, FocusPane, Mode, RemoteStatus, StatusView};
use crate::theme::Theme;
use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, view: &StatusView, theme: &Theme) {
    let layout = view.frame();
    let focused = view.active_pane() == FocusPane::Sidebar && matches!(view.mode(), Mode::Status);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(focused))
        .style(Style::default().bg(theme.bg_panel));
    f.render_widget(block, layout.panes.sidebar);

    let geometry = &layout.sidebar;
    render_title(f, view, theme, geometry.title);
    if let Some(message) = &view.status_message {
        let style = if message.is_error {
            theme.error()
        } else {
            theme.success()
        };
        f.render_widget(
            Paragraph::new(Line::styled(
                truncate(&message.text, usize::from(geometry.message.width)),
                style,
            )),
            geometry.message,
        );
    }
    render_files(f, view, theme, geometry.files, focused);
    render_remote(f, view, theme, geometry.remote);
    render_commits_header(f, view, theme, geometry.commits_header);
    render_commits(f, view, theme, geometry.commits, focused);
    render_stashes(f, view, theme, geometry.stashes);
}

fn render_title(f: &mut Frame, view: &StatusView, theme: &Theme, area: Rect) {
    let branch = match &view.push_status {
        Some(status) if status.detached_head => "(detached)".to_string(),
        Some(status) => status.current_branch.clone(),
        None => String::new(),
    };
    let mut left = vec![Span::styled("Git ", theme.panel_title())];
    if !branch.is_empty() {
        left.push(Span::styled(branch, theme.text().add_modifier(Modifier::BOLD)));
    }
    if !view.stashes.is_empty() {
        left.push(Span::styled(
            format!(" [{}]", view.stashes.count()),
            theme.muted(),
        ));
    }
    let right = vec![Span::styled(view.tree().summary(), theme.muted())];
    f.render_widget(
        Paragraph::new(split_row(left, right, usize::from(area.width))),
        area,
    );
}

fn stats_spans(stats: DiffStats, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if stats.additions > 0 {
        spans.push(Span::styled(format!("+{}", stats.additions), theme.additions()));
    }
    if stats.deletions > 0 {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!("-{}", stats.deletions), theme.deletions()));
    }
    spans
}

fn render_files(f: &mut Frame, view: &StatusView, theme: &Theme, area: Rect, focused: bool) {
    if area.height == 0 {
        return;
    }
    let entries = view.tree().all_entries();
    let width = usize::from(area.width);
    let lines: Vec<Line> = view
        .frame()
        .file_rows
        .iter()
        .skip(view.scroll_off)
        .take(usize::from(area.height))
        .map(|row| match *row {
            FileRow::Header(bucket, count) => Line::styled(
                format!("{} ({})", bucket.title(), count),
                theme.section_header(),
            ),
            FileRow::Clean => Line::styled("Working tree clean", theme.muted()),
            FileRow::Entry(index) => {
                let Some(entry) = entries.get(index) else {
                    return Line::default();
                };
                let file = entry.entry;
                let indent = "  ".repeat(1 + entry.depth);
                let marker = if file.is_folder {
                    if file.is_expanded {
                        '▾'
                    } else {
                        '▸'
                    }
                } else {
                    file.status.symbol()
                };
                let name = if entry.depth > 0 {
                    file.name()
                } else {
                    file.path.as_str()
                };
                let mut left = vec![
                    Span::raw(indent),
                    Span::styled(format!("{} ", marker), theme.file_status(file.status)),
                    Span::styled(name.to_string(), theme.text()),
                ];
                if let Some(old) = &file.old_path {
                    left.push(Span::styled(format!(" ← {}", old), theme.muted()));
                }
                let line = split_row(left, stats_spans(file.diff_stats, theme), width);
                if index == view.cursor() {
                    line.style(theme.selected(focused))
                } else {
                    line
                }
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn render_remote(f: &mut Frame, view: &StatusView, theme: &Theme, area: Rect) {
    let Some(status) = &view.remote_status else {
        return;
    };
    let line = match status {
        RemoteStatus::Running(op) => Line::styled(op.progress(), theme.warning()),
        RemoteStatus::Succeeded(op) => Line::styled(op.done(), theme.success()),
        RemoteStatus::Failed(op, error) => {
            let first = error.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
            let text = format!("{:?} failed: {}", op, first.trim());
            Line::styled(truncate(&text, usize::from(area.width)), theme.error())
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_commits_header(f: &mut Frame, view: &StatusView, theme: &Theme, area: Rect) {
    if area.height == 0 {
        return;
    }
    let mut left = vec![Span::styled("Recent Commits", theme.section_header())];
    if let Some(status) = &view.push_status {
        let ahead_behind = status.format_ahead_behind();
        if !ahead_behind.is_empty() {
            left.push(Span::styled(format!(" {}", ahead_behind), theme.muted()));
        }
    }
    let history = &view.history;
    if history.filter_active {
        if let Some(author) = &history.filter.author {
            left.push(Span::styled(format!(" [author:{}]", author), theme.warning()));
        }
        if let Some(path) = &history.filter.path {
            left.push(Span::styled(format!(" [path:{}]", path), theme.warning()));
        }
    }
    let mut right = Vec::new();
    if history.loading_more {
        right.push(Span::styled("loading…", theme.muted()));
    } else if view.graph_enabled {
        right.push(Span::styled("graph", theme.muted()));
    }
    f.render_widget(
        Paragraph::new(split_row(left, right, usize::from(area.width))),
        area,
    );
}

fn render_commits(f: &mut Frame, view: &StatusView, theme: &Theme, area: Rect, focused: bool) {
    if area.height == 0 {
        return;
    }
    let commits = view.active_commits();
    if commits.is_empty() {
        f.render_widget(
            Paragraph::new(Line::styled("  No commits", theme.muted())),
            area,
        );
        return;
    }

    let now = Utc::now();
    let files = view.files_len();
    let matches = view
        .committed_search
        .as_ref()
        .map(|s| s.matches.as_slice())
        .unwrap_or_default();
    let lines: Vec<Line> = commits
        .iter()
        .enumerate()
        .skip(view.commit_scroll_off)
        .take(usize::from(area.height))
        .map(|(i, commit)| {
            let mut left = vec![Span::raw("  ")];
            if let Some(graph) = view.graph.get(i).filter(|_| view.graph_enabled) {
                left.push(Span::styled(
                    format!("{:<width$}", graph.render(), width = graph.width),
                    Style::default().fg(theme.graph),
                ));
            }
            let hash_style = if commit.pushed {
                theme.commit_hash()
            } else {
                Style::default().fg(theme.commit_unpushed)
            };
            left.push(Span::styled(format!("{} ", commit.short_hash), hash_style));
            let subject_style = if matches.contains(&i) {
                theme.warning().add_modifier(Modifier::BOLD)
            } else {
                theme.text()
            };
            left.push(Span::styled(commit.subject.clone(), subject_style));

            let right = vec![Span::styled(relative_time(commit.date, now), theme.muted())];
            let line = split_row(left, right, usize::from(area.width));
            if files + i == view.cursor() {
                line.style(theme.selected(focused))
            } else {
                line
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn render_stashes(f: &mut Frame, view: &StatusView, theme: &Theme, area: Rect) {
    if area.height == 0 {
        return;
    }
    let width = usize::from(area.width);
    let mut lines = vec![Line::styled(
        format!("Stashes ({})", view.stashes.count()),
        theme.section_header(),
    )];
    lines.extend(
        view.stashes
            .stashes
            .iter()
            .take(usize::from(area.height) - 1)
            .map(|stash| {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{} ", stash.stash_ref), theme.commit_hash()),
                    Span::styled(
                        truncate(&stash.message, width.saturating_sub(stash.stash_ref.len() + 3)),
                        theme.muted(),
                    ),
                ])
            }),
    );
    f.render_widget(Paragraph::new(lines), area);
}

//! Dialogs drawn over a dimmed background

use super::truncate;
use crate::status::{
    push_options, BranchPickerState, CommitComposeState, ComposeFocus, ConfirmButton,
    ModalGeometry, Mode, Overlay, SearchState, StatusView,
};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, view: &StatusView, theme: &Theme) {
    let Some(modal) = &view.frame().modal else {
        return;
    };
    dim_buffer(f.buffer_mut(), view.frame().area, theme);

    match (view.overlay(), view.mode()) {
        (Some(Overlay::HistorySearch(search)), _) => render_search(f, view, modal, search, theme),
        (Some(Overlay::PathFilter { input }), _) => render_path_filter(f, modal, input, theme),
        (None, Mode::Commit(state)) => render_commit(f, modal, state, theme),
        (None, Mode::PushMenu { focus }) => render_push_menu(f, view, modal, *focus, theme),
        (None, Mode::ConfirmDiscard(state)) => {
            let block = frame_block(" Discard changes ", confirm_hints(theme), theme);
            draw_block(f, modal, block);
            f.render_widget(
                Paragraph::new(Line::styled(state.target.describe(), theme.text()))
                    .wrap(Wrap { trim: true }),
                modal.body,
            );
            confirm_buttons(f, modal, "Discard", state.button, theme);
        }
        (None, Mode::ConfirmStashPop(state)) => {
            let block = frame_block(" Pop stash ", confirm_hints(theme), theme);
            draw_block(f, modal, block);
            let question = format!("Apply and drop {}?", state.target);
            f.render_widget(
                Paragraph::new(Line::styled(question, theme.text())),
                modal.body,
            );
            confirm_buttons(f, modal, "Pop", state.button, theme);
        }
        (None, Mode::BranchPicker(state)) => render_branches(f, modal, state, theme),
        (None, Mode::Status | Mode::Diff(_)) => {}
    }
}

fn render_search(
    f: &mut Frame,
    view: &StatusView,
    modal: &ModalGeometry,
    search: &SearchState,
    theme: &Theme,
) {
    let footer_hints = hints(&[("enter", "jump"), ("esc", "close")], theme);
    draw_block(f, modal, frame_block(" Search commits ", footer_hints, theme));
    input_line(f, modal.body, "/ ", &search.query, theme);

    let commits = view.active_commits();
    let width = usize::from(modal.list.width);
    let lines: Vec<Line> = search
        .matches
        .iter()
        .enumerate()
        .skip(view.history_scroll)
        .take(usize::from(modal.list.height))
        .filter_map(|(i, index)| {
            let commit = commits.get(*index)?;
            let text = format!("{} {}", commit.short_hash, commit.subject);
            let line = Line::styled(truncate(&text, width), theme.text());
            Some(if i == search.selected {
                line.style(theme.selected(true))
            } else {
                line
            })
        })
        .collect();
    f.render_widget(Paragraph::new(lines), modal.list);

    let footer = if search.query.is_empty() {
        "Type to search commit subjects".to_string()
    } else {
        format!("{} matches", search.matches.len())
    };
    f.render_widget(
        Paragraph::new(Line::styled(footer, theme.muted())),
        modal.footer,
    );
}

fn render_path_filter(f: &mut Frame, modal: &ModalGeometry, input: &str, theme: &Theme) {
    let footer_hints = hints(&[("enter", "apply"), ("esc", "cancel")], theme);
    draw_block(f, modal, frame_block(" Filter by path ", footer_hints, theme));
    input_line(f, modal.body, "Path: ", input, theme);
    f.render_widget(
        Paragraph::new(Line::styled(
            "Empty input clears the path filter",
            theme.muted(),
        )),
        modal.footer,
    );
}

fn render_commit(f: &mut Frame, modal: &ModalGeometry, state: &CommitComposeState, theme: &Theme) {
    let title = if state.amend {
        " Amend Commit "
    } else {
        " Commit "
    };
    let footer_hints = hints(
        &[
            ("ctrl+s", "commit"),
            ("alt+a", "amend"),
            ("tab", "focus"),
            ("esc", "cancel"),
        ],
        theme,
    );
    draw_block(f, modal, frame_block(title, footer_hints, theme));

    let editing = state.focus == ComposeFocus::Message && !state.in_progress;
    let body: Vec<Line> = if state.message.is_empty() && !editing {
        vec![Line::styled("Commit message", theme.dimmed())]
    } else {
        let mut text = state.message.clone();
        if editing {
            text.push('█');
        }
        text.split('\n')
            .map(|l| Line::styled(l.to_string(), theme.text()))
            .collect()
    };
    // Keep the end of a long message in view
    let skip = body.len().saturating_sub(usize::from(modal.body.height));
    let visible: Vec<Line> = body.into_iter().skip(skip).collect();
    f.render_widget(
        Paragraph::new(visible).wrap(Wrap { trim: false }),
        modal.body,
    );

    if let Some(error) = &state.error {
        let text = truncate(error, usize::from(modal.footer.width));
        f.render_widget(
            Paragraph::new(Line::styled(text, theme.error())),
            modal.footer,
        );
    }
    let label = if state.in_progress {
        "Committing…"
    } else {
        "Commit"
    };
    let focused = state.focus == ComposeFocus::Button;
    button(f, modal.buttons.first(), label, focused, false, theme);
}

fn render_push_menu(
    f: &mut Frame,
    view: &StatusView,
    modal: &ModalGeometry,
    focus: usize,
    theme: &Theme,
) {
    let footer_hints = hints(&[("enter", "push"), ("esc", "cancel")], theme);
    draw_block(f, modal, frame_block(" Push ", footer_hints, theme));

    let target = match &view.push_status {
        Some(status) => match &status.upstream {
            Some(upstream) => format!("{} → {}", status.current_branch, upstream),
            None => format!("{} (no upstream)", status.current_branch),
        },
        None => String::new(),
    };
    f.render_widget(
        Paragraph::new(Line::styled(target, theme.muted())),
        modal.body,
    );

    for (i, (variant, rect)) in push_options().iter().zip(&modal.buttons).enumerate() {
        let line = Line::from(vec![
            Span::styled(format!(" {} ", variant.shortcut()), theme.key_hint()),
            Span::styled(variant.label(), theme.text()),
        ]);
        let line = if i == focus {
            line.style(theme.selected(true))
        } else {
            line
        };
        f.render_widget(Paragraph::new(line), *rect);
    }
}

fn render_branches(
    f: &mut Frame,
    modal: &ModalGeometry,
    state: &BranchPickerState,
    theme: &Theme,
) {
    let footer_hints = hints(&[("enter", "checkout"), ("esc", "close")], theme);
    draw_block(f, modal, frame_block(" Switch branch ", footer_hints, theme));

    let width = usize::from(modal.list.width);
    let lines: Vec<Line> = state
        .branches
        .iter()
        .enumerate()
        .skip(state.scroll)
        .take(usize::from(modal.list.height))
        .map(|(i, branch)| {
            let marker = if branch.is_current { "* " } else { "  " };
            let name_style = if branch.is_remote {
                theme.muted()
            } else {
                theme.text()
            };
            let line = Line::from(vec![
                Span::styled(marker, theme.success()),
                Span::styled(truncate(&branch.name, width.saturating_sub(12)), name_style),
                Span::styled(format!(" {}", branch.format_tracking_info()), theme.muted()),
            ]);
            if i == state.cursor {
                line.style(theme.selected(true))
            } else {
                line
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), modal.list);

    let footer_width = usize::from(modal.footer.width);
    let footer = match (&state.error, &state.checking_out) {
        (Some(error), _) => Line::styled(truncate(error, footer_width), theme.error()),
        (None, Some(name)) => {
            Line::styled(format!("Checking out {}…", name), theme.warning())
        }
        (None, None) if state.loading => Line::styled("Loading branches…", theme.muted()),
        (None, None) => Line::styled(
            format!("{} branches", state.branches.len()),
            theme.muted(),
        ),
    };
    f.render_widget(Paragraph::new(footer), modal.footer);
}

fn confirm_hints(theme: &Theme) -> Line<'static> {
    hints(&[("y", "confirm"), ("n", "cancel")], theme)
}

/// Drop colours behind a dialog to the dimmed style
fn dim_buffer(buf: &mut Buffer, area: Rect, theme: &Theme) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let cell = &mut buf[(x, y)];
            cell.set_style(
                Style::default()
                    .fg(theme.text_dimmed)
                    .bg(Color::Reset)
                    .remove_modifier(Modifier::all()),
            );
        }
    }
}

fn hints<'a>(pairs: &[(&'a str, &'a str)], theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::raw(" ")];
    for (key, description) in pairs {
        spans.push(Span::styled(*key, theme.key_hint()));
        spans.push(Span::styled(format!(" {} ", description), theme.key_description()));
    }
    Line::from(spans)
}

fn frame_block<'a>(title: &'a str, footer: Line<'a>, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(theme.panel_title())
        .title_bottom(footer)
        .title_alignment(Alignment::Center)
        .border_style(theme.panel_border(true))
        .style(Style::default().bg(theme.bg_panel))
}

fn draw_block(f: &mut Frame, modal: &ModalGeometry, block: Block) {
    f.render_widget(Clear, modal.rect);
    f.render_widget(block, modal.rect);
}

fn input_line(f: &mut Frame, area: Rect, prompt: &str, input: &str, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(prompt.to_string(), theme.key_hint()),
        Span::styled(input.to_string(), theme.text()),
        Span::styled("█", theme.muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn button(
    f: &mut Frame,
    rect: Option<&Rect>,
    label: &str,
    focused: bool,
    danger: bool,
    theme: &Theme,
) {
    let Some(rect) = rect else {
        return;
    };
    f.render_widget(
        Paragraph::new(Line::styled(label.to_string(), theme.button(focused, danger)))
            .alignment(Alignment::Center)
            .style(theme.button(focused, danger)),
        *rect,
    );
}

fn confirm_buttons(
    f: &mut Frame,
    modal: &ModalGeometry,
    confirm: &str,
    selected: ConfirmButton,
    theme: &Theme,
) {
    button(
        f,
        modal.buttons.first(),
        confirm,
        selected == ConfirmButton::Confirm,
        true,
        theme,
    );
    button(
        f,
        modal.buttons.get(1),
        "Cancel",
        selected == ConfirmButton::Cancel,
        false,
        theme,
    );
    f.render_widget(
        Paragraph::new(Line::styled("tab switches, enter selects", theme.muted()))
            .alignment(Alignment::Center),
        modal.footer,
    );
}

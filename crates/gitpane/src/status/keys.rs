//! Keyboard routing per mode
//!
//! Overlays take keys first, then the current mode, then (in status mode)
//! the focused pane. Bindings are case-sensitive.

use super::mode::{
    push_options, BranchPickerState, CommitComposeState, ComposeFocus, ConfirmButton,
    ConfirmState, FocusPane, FullDiffState, Mode, Overlay, RemoteOp, RemoteStatus, SearchState,
    ViewMode,
};
use super::{CursorTarget, Selection, StatusView, H_SCROLL_STEP};
use crate::command::{Command, DiffSource, DiscardTarget};
use crate::model::Bucket;
use gitpane_diff::display_width;
use gitpane_vcs::{Commit, PushVariant};

/// Whether `key` is a single printable character
fn printable(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Markdown summary of a commit for the clipboard
pub fn commit_markdown(commit: &Commit) -> String {
    let mut out = format!("`{}` {}", commit.short_hash, commit.subject);
    let body = commit.body.trim();
    if !body.is_empty() {
        out.push_str("\n\n");
        out.push_str(body);
    }
    if !commit.files.is_empty() {
        out.push_str("\n\n");
        for file in &commit.files {
            out.push_str(&format!(
                "- {} {} (+{} -{})\n",
                file.status.symbol(),
                file.path,
                file.additions,
                file.deletions
            ));
        }
        out.truncate(out.trim_end().len());
    }
    out
}

/// Outcome of a key in a two-button dialog
enum ConfirmAction {
    Confirm,
    Cancel,
    Stay,
}

fn confirm_key<T>(state: &mut ConfirmState<T>, key: &str) -> ConfirmAction {
    match key {
        "tab" | "shift+tab" | "left" | "right" | "h" | "l" => {
            state.button = state.button.toggle();
            ConfirmAction::Stay
        }
        "enter" => match state.button {
            ConfirmButton::Confirm => ConfirmAction::Confirm,
            ConfirmButton::Cancel => ConfirmAction::Cancel,
        },
        "y" | "Y" => ConfirmAction::Confirm,
        "n" | "N" | "esc" | "q" => ConfirmAction::Cancel,
        _ => ConfirmAction::Stay,
    }
}

/// Apply a vertical/horizontal scroll key. Returns false if `key` is not one.
fn scroll_key(
    key: &str,
    scroll: &mut usize,
    h_scroll: &mut usize,
    max_scroll: usize,
    max_h_scroll: usize,
    page: usize,
) -> bool {
    let half = (page / 2).max(1);
    match key {
        "j" | "down" => *scroll = (*scroll + 1).min(max_scroll),
        "k" | "up" => *scroll = scroll.saturating_sub(1),
        "g" | "home" => *scroll = 0,
        "G" | "end" => *scroll = max_scroll,
        "ctrl+d" | "pgdown" => *scroll = (*scroll + half).min(max_scroll),
        "ctrl+u" | "pgup" => *scroll = scroll.saturating_sub(half),
        "h" | "left" => *h_scroll = h_scroll.saturating_sub(H_SCROLL_STEP),
        "l" | "right" => *h_scroll = (*h_scroll + H_SCROLL_STEP).min(max_h_scroll),
        "0" => *h_scroll = 0,
        _ => return false,
    }
    true
}

impl StatusView {
    pub(crate) fn route_key(&mut self, key: &str) -> Vec<Command> {
        if self.overlay.is_some() {
            return self.overlay_key(key);
        }
        match self.view_mode() {
            ViewMode::Status => match self.active_pane {
                FocusPane::Sidebar => self.sidebar_key(key),
                FocusPane::Diff if self.preview_commit.is_some() => self.preview_key(key),
                FocusPane::Diff => self.diff_pane_key(key),
            },
            ViewMode::Diff => self.full_diff_key(key),
            ViewMode::Commit => self.commit_key(key),
            ViewMode::PushMenu => self.push_menu_key(key),
            ViewMode::ConfirmDiscard => self.confirm_discard_key(key),
            ViewMode::BranchPicker => self.branch_key(key),
            ViewMode::ConfirmStashPop => self.confirm_stash_key(key),
        }
    }

    // === Sidebar ===

    fn sidebar_key(&mut self, key: &str) -> Vec<Command> {
        match key {
            "j" | "down" => self.move_cursor(1),
            "k" | "up" => self.move_cursor(-1),
            "g" | "home" => {
                self.scroll_off = 0;
                self.commit_scroll_off = 0;
                self.set_cursor(0)
            }
            "G" | "end" => self.set_cursor(self.total_selectable().saturating_sub(1)),
            "l" | "right" | "tab" | "shift+tab" => {
                if self.diff_target_loaded() {
                    self.active_pane = FocusPane::Diff;
                }
                vec![]
            }
            "\\" => self.toggle_sidebar(),
            "s" => self.stage_selected(),
            "u" => self.unstage_selected(),
            "S" => self.stage_all(),
            "d" => self.open_selected(false),
            "enter" => self.open_selected(true),
            "c" => self.open_commit_compose(),
            "P" => self.open_push_menu(),
            "D" => self.open_discard_confirm(),
            "z" => self.stash_push(),
            "Z" => self.open_stash_pop_confirm(),
            "b" => self.open_branch_picker(),
            "f" => match self.selected_commit() {
                Some(commit) => {
                    let author = commit.author.clone();
                    self.filter_by_author(author)
                }
                None => self.start_remote(RemoteOp::Fetch),
            },
            "F" => self.clear_filters(),
            "p" => match self.selected_commit() {
                Some(_) => {
                    let input = self.history.filter.path.clone().unwrap_or_default();
                    self.overlay = Some(Overlay::PathFilter { input });
                    vec![]
                }
                None => self.start_remote(RemoteOp::Pull),
            },
            "/" => {
                self.overlay = Some(Overlay::HistorySearch(SearchState::default()));
                self.history_scroll = 0;
                vec![]
            }
            "n" => self.step_search(1),
            "N" => self.step_search(-1),
            "esc" => {
                self.committed_search = None;
                vec![]
            }
            "v" => {
                if self.selected_commit().is_none() {
                    return vec![];
                }
                self.graph_enabled = !self.graph_enabled;
                self.recompute_graph();
                vec![Command::SavePreferences(self.preferences())]
            }
            "y" | "Y" | "o" => match self.selected_commit().cloned() {
                Some(commit) => self.commit_action(key, &commit),
                None => vec![],
            },
            "r" => self.full_refresh(),
            "O" => match self.selection() {
                Selection::File(entry) => vec![Command::FocusPlugin {
                    path: entry.entry.path.clone(),
                }],
                _ => vec![],
            },
            _ => vec![],
        }
    }

    pub(crate) fn toggle_sidebar(&mut self) -> Vec<Command> {
        if self.sidebar_visible {
            self.sidebar_restore = Some(self.active_pane);
            self.sidebar_visible = false;
            if self.diff_target_loaded() {
                self.active_pane = FocusPane::Diff;
            }
        } else {
            self.sidebar_visible = true;
            self.active_pane = self.sidebar_restore.take().unwrap_or_default();
        }
        vec![]
    }

    fn stage_selected(&mut self) -> Vec<Command> {
        match self.selection() {
            Selection::File(entry) if entry.bucket != Bucket::Staged => {
                let paths = entry.entry.paths();
                self.pending_cursor = Some(CursorTarget::FirstUnstaged);
                vec![Command::Stage { paths }]
            }
            _ => vec![],
        }
    }

    fn unstage_selected(&mut self) -> Vec<Command> {
        match self.selection() {
            Selection::File(entry) if entry.bucket == Bucket::Staged => {
                vec![Command::Unstage {
                    paths: entry.entry.paths(),
                }]
            }
            _ => vec![],
        }
    }

    fn stage_all(&mut self) -> Vec<Command> {
        if self.tree.modified.is_empty() && self.tree.untracked.is_empty() {
            return vec![];
        }
        self.pending_cursor = Some(CursorTarget::FirstUnstaged);
        vec![Command::StageAll]
    }

    /// `d` (full-screen diff) or `enter` (editor / folder toggle) on the selection
    fn open_selected(&mut self, enter: bool) -> Vec<Command> {
        match self.selection() {
            Selection::File(entry) if entry.entry.is_folder => {
                if enter {
                    let path = entry.entry.path.clone();
                    self.tree.toggle_folder(&path);
                }
                vec![]
            }
            Selection::File(entry) if enter => vec![Command::OpenFile {
                path: entry.entry.path.clone(),
            }],
            Selection::File(entry) => {
                let source = DiffSource::WorkingTree {
                    path: entry.entry.path.clone(),
                    staged: entry.bucket == Bucket::Staged,
                    status: entry.entry.status,
                };
                self.open_full_diff(source, FocusPane::Sidebar)
            }
            Selection::Commit(..) => {
                if self.preview_commit.is_some() {
                    self.active_pane = FocusPane::Diff;
                }
                vec![]
            }
            Selection::None => vec![],
        }
    }

    pub(crate) fn open_full_diff(
        &mut self,
        source: DiffSource,
        return_pane: FocusPane,
    ) -> Vec<Command> {
        let prefill = self
            .inline_diff
            .as_ref()
            .filter(|p| p.source == source && p.external.is_none())
            .and_then(|p| p.diff.clone());
        let command = self.full_diff_command(source.clone());
        self.mode = Mode::Diff(FullDiffState {
            source: Some(source),
            return_pane,
            diff: prefill,
            loading: true,
            ..FullDiffState::default()
        });
        vec![command]
    }

    fn open_commit_compose(&mut self) -> Vec<Command> {
        if self.tree.staged.is_empty() {
            return vec![Command::Toast("Nothing staged to commit".into())];
        }
        self.mode = Mode::Commit(CommitComposeState::default());
        vec![]
    }

    fn open_push_menu(&mut self) -> Vec<Command> {
        if self.remote_busy() {
            return vec![];
        }
        if !self.can_push() {
            return vec![Command::Toast("No unpushed commits".into())];
        }
        self.mode = Mode::PushMenu { focus: 0 };
        vec![]
    }

    fn open_discard_confirm(&mut self) -> Vec<Command> {
        let target = match self.selection() {
            Selection::File(entry) if entry.entry.is_folder => {
                return vec![Command::Toast("Cannot discard a folder".into())];
            }
            Selection::File(entry) => {
                let path = entry.entry.path.clone();
                match entry.bucket {
                    Bucket::Staged => DiscardTarget::Staged {
                        path,
                        status: entry.entry.status,
                    },
                    Bucket::Modified => DiscardTarget::Modified { path },
                    Bucket::Untracked => DiscardTarget::Untracked { path },
                }
            }
            _ => return vec![],
        };
        self.mode = Mode::ConfirmDiscard(ConfirmState::new(target));
        vec![]
    }

    fn stash_push(&mut self) -> Vec<Command> {
        if self.tree.is_empty() {
            return vec![Command::Toast("No local changes to stash".into())];
        }
        vec![Command::StashPush]
    }

    fn open_stash_pop_confirm(&mut self) -> Vec<Command> {
        match self.stashes.newest() {
            Some(stash) => {
                self.mode = Mode::ConfirmStashPop(ConfirmState::new(stash.stash_ref.clone()));
                vec![]
            }
            None => vec![Command::Toast("No stashes".into())],
        }
    }

    fn open_branch_picker(&mut self) -> Vec<Command> {
        self.mode = Mode::BranchPicker(BranchPickerState {
            loading: true,
            ..BranchPickerState::default()
        });
        vec![Command::LoadBranches]
    }

    fn start_remote(&mut self, op: RemoteOp) -> Vec<Command> {
        if self.remote_busy() {
            return vec![];
        }
        self.clear_errors();
        self.set_remote(RemoteStatus::Running(op));
        vec![match op {
            RemoteOp::Fetch => Command::Fetch,
            RemoteOp::Pull => Command::Pull,
            RemoteOp::Push => Command::Push(PushVariant::default()),
        }]
    }

    fn execute_push(&mut self, variant: PushVariant) -> Vec<Command> {
        self.mode = Mode::Status;
        if self.remote_busy() {
            return vec![];
        }
        self.clear_errors();
        self.push_restore_hash = self.selected_commit().map(|c| c.hash.clone());
        self.set_remote(RemoteStatus::Running(RemoteOp::Push));
        vec![Command::Push(variant)]
    }

    fn filter_by_author(&mut self, author: String) -> Vec<Command> {
        self.history.filter.author = Some(author);
        vec![Command::LoadFilteredCommits {
            filter: self.history.filter.clone(),
        }]
    }

    fn apply_path_filter(&mut self, input: &str) -> Vec<Command> {
        let path = input.trim();
        self.history.filter.path = (!path.is_empty()).then(|| path.to_string());
        if self.history.filter.is_empty() {
            return self.clear_filters();
        }
        vec![Command::LoadFilteredCommits {
            filter: self.history.filter.clone(),
        }]
    }

    fn clear_filters(&mut self) -> Vec<Command> {
        if !self.history.filter_active && self.history.filter.is_empty() {
            return vec![];
        }
        let anchor = self.selected_commit().map(|c| c.hash.clone());
        self.history.clear_filter();
        self.recompute_graph();
        self.committed_search = None;
        let files = self.files_len();
        let index = anchor
            .and_then(|hash| self.history.position(&hash))
            .map(|i| files + i)
            .unwrap_or(self.cursor);
        self.set_cursor(index)
    }

    fn commit_action(&mut self, key: &str, commit: &Commit) -> Vec<Command> {
        match key {
            "y" => vec![Command::CopyToClipboard {
                text: commit_markdown(commit),
                label: "commit".into(),
            }],
            "Y" => vec![Command::CopyToClipboard {
                text: commit.short_hash.clone(),
                label: "hash".into(),
            }],
            "o" => vec![Command::OpenCommitInBrowser {
                hash: commit.hash.clone(),
            }],
            _ => vec![],
        }
    }

    fn step_search(&mut self, step: isize) -> Vec<Command> {
        let Some(search) = self.committed_search.as_mut() else {
            return vec![];
        };
        let len = search.matches.len();
        if len == 0 {
            return vec![];
        }
        search.selected = (search.selected as isize + step).rem_euclid(len as isize) as usize;
        let Some(index) = search.current() else {
            return vec![];
        };
        let target = self.files_len() + index;
        self.set_cursor(target)
    }

    // === Right pane ===

    pub(super) fn inline_max_h_scroll(&self) -> usize {
        let Some(payload) = &self.inline_diff else {
            return 0;
        };
        widest_line(payload.diff.as_ref(), payload.external.as_deref())
    }

    fn diff_pane_key(&mut self, key: &str) -> Vec<Command> {
        let max_scroll = self.inline_max_scroll();
        let max_h = self.inline_max_h_scroll();
        let page = usize::from(self.frame.diff_content.height);
        if scroll_key(
            key,
            &mut self.diff_pane_scroll,
            &mut self.diff_pane_h_scroll,
            max_scroll,
            max_h,
            page,
        ) {
            return vec![];
        }
        match key {
            "v" => {
                self.diff_mode = self.diff_mode.toggle();
                let reload = self
                    .inline_diff
                    .as_ref()
                    .filter(|p| p.external.is_some())
                    .map(|p| p.source.clone());
                self.diff_pane_scroll = self.diff_pane_scroll.min(self.inline_max_scroll());
                match reload {
                    Some(source) => vec![self.inline_diff_command(source)],
                    None => vec![],
                }
            }
            "esc" | "tab" | "shift+tab" => {
                self.active_pane = FocusPane::Sidebar;
                vec![]
            }
            "\\" => self.toggle_sidebar(),
            _ => vec![],
        }
    }

    fn preview_key(&mut self, key: &str) -> Vec<Command> {
        let Some(commit) = self.preview_commit.clone() else {
            return vec![];
        };
        let last = commit.files.len().saturating_sub(1);
        match key {
            "j" | "down" => self.preview_cursor = (self.preview_cursor + 1).min(last),
            "k" | "up" => self.preview_cursor = self.preview_cursor.saturating_sub(1),
            "g" | "home" => self.preview_cursor = 0,
            "G" | "end" => self.preview_cursor = last,
            "enter" | "d" => return self.open_preview_file(&commit, self.preview_cursor),
            "y" | "Y" | "o" => return self.commit_action(key, &commit),
            "b" => return self.open_branch_picker(),
            "esc" | "h" | "left" | "tab" | "shift+tab" => self.active_pane = FocusPane::Sidebar,
            "\\" => return self.toggle_sidebar(),
            _ => {}
        }
        vec![]
    }

    pub(crate) fn open_preview_file(&mut self, commit: &Commit, index: usize) -> Vec<Command> {
        let Some(file) = commit.files.get(index) else {
            return vec![];
        };
        let source = DiffSource::Commit {
            hash: commit.hash.clone(),
            path: file.path.clone(),
            parent: commit.first_parent().map(str::to_string),
        };
        self.open_full_diff(source, FocusPane::Diff)
    }

    // === Full-screen diff ===

    pub(super) fn full_diff_max_scroll(&self, state: &FullDiffState) -> usize {
        let rows = match &state.external {
            Some(lines) => lines.len(),
            None => gitpane_diff::row_count(
                self.diff_mode,
                state.diff.as_ref(),
                usize::from(self.frame.diff_content.width),
                self.config.wrap_lines,
            ),
        };
        rows.saturating_sub(usize::from(self.frame.diff_content.height))
    }

    fn full_diff_key(&mut self, key: &str) -> Vec<Command> {
        let Mode::Diff(state) = &self.mode else {
            return vec![];
        };
        let max_scroll = self.full_diff_max_scroll(state);
        let max_h = widest_line(state.diff.as_ref(), state.external.as_deref());
        let page = usize::from(self.frame.diff_content.height);

        let Mode::Diff(state) = &mut self.mode else {
            return vec![];
        };
        if scroll_key(
            key,
            &mut state.scroll,
            &mut state.h_scroll,
            max_scroll,
            max_h,
            page,
        ) {
            return vec![];
        }
        match key {
            "esc" | "q" => {
                self.exit_full_diff();
                vec![]
            }
            "v" => {
                let reload = state.external.as_ref().and(state.source.clone());
                if reload.is_some() {
                    state.loading = true;
                }
                self.diff_mode = self.diff_mode.toggle();
                let mut commands = vec![Command::SavePreferences(self.preferences())];
                if let Some(source) = reload {
                    commands.push(self.full_diff_command(source));
                }
                let max = match &self.mode {
                    Mode::Diff(state) => self.full_diff_max_scroll(state),
                    _ => 0,
                };
                if let Mode::Diff(state) = &mut self.mode {
                    state.scroll = state.scroll.min(max);
                }
                commands
            }
            "O" => match &state.source {
                Some(source) => vec![Command::FocusPlugin {
                    path: source.path().to_string(),
                }],
                None => vec![],
            },
            _ => vec![],
        }
    }

    pub(crate) fn exit_full_diff(&mut self) {
        let return_pane = match &self.mode {
            Mode::Diff(state) => state.return_pane,
            _ => return,
        };
        self.mode = Mode::Status;
        self.active_pane = if self.preview_commit.is_some() {
            FocusPane::Diff
        } else {
            return_pane
        };
    }

    // === Commit compose ===

    fn commit_key(&mut self, key: &str) -> Vec<Command> {
        let last_message = self
            .history
            .recent
            .first()
            .map(|c| match c.body.trim() {
                "" => c.subject.clone(),
                body => format!("{}\n\n{}", c.subject, body),
            })
            .unwrap_or_default();
        let staged = !self.tree.staged.is_empty();

        let Mode::Commit(state) = &mut self.mode else {
            return vec![];
        };
        if state.in_progress {
            return vec![];
        }
        match key {
            "esc" => {
                self.mode = Mode::Status;
                return vec![];
            }
            "tab" | "shift+tab" => {
                state.focus = match state.focus {
                    ComposeFocus::Message => ComposeFocus::Button,
                    ComposeFocus::Button => ComposeFocus::Message,
                };
            }
            "ctrl+s" => return submit_commit(state, staged),
            "enter" => match state.focus {
                ComposeFocus::Button => return submit_commit(state, staged),
                ComposeFocus::Message => state.message.push('\n'),
            },
            "alt+a" => {
                state.amend = !state.amend;
                if state.amend && state.message.trim().is_empty() {
                    state.message = last_message;
                }
            }
            "backspace" => {
                state.message.pop();
            }
            _ => {
                if let Some(c) = printable(key) {
                    if state.focus == ComposeFocus::Message {
                        state.message.push(c);
                        state.error = None;
                    }
                }
            }
        }
        vec![]
    }

    // === Push menu ===

    fn push_menu_key(&mut self, key: &str) -> Vec<Command> {
        let Mode::PushMenu { focus } = &mut self.mode else {
            return vec![];
        };
        let options = push_options();
        let count = options.len();
        match key {
            "j" | "down" => *focus = (*focus + 1).min(count - 1),
            "k" | "up" => *focus = focus.saturating_sub(1),
            "tab" => *focus = (*focus + 1) % count,
            "shift+tab" => *focus = (*focus + count - 1) % count,
            "enter" => {
                let variant = options[*focus];
                return self.execute_push(variant);
            }
            "esc" | "q" => self.mode = Mode::Status,
            _ => {
                let shortcut = printable(key);
                if let Some(variant) = options.iter().find(|v| Some(v.shortcut()) == shortcut) {
                    return self.execute_push(*variant);
                }
            }
        }
        vec![]
    }

    // === Confirm dialogs ===

    fn confirm_discard_key(&mut self, key: &str) -> Vec<Command> {
        let Mode::ConfirmDiscard(state) = &mut self.mode else {
            return vec![];
        };
        match confirm_key(state, key) {
            ConfirmAction::Confirm => {
                let target = state.target.clone();
                self.mode = Mode::Status;
                vec![Command::Discard { target }]
            }
            ConfirmAction::Cancel => {
                self.mode = Mode::Status;
                vec![]
            }
            ConfirmAction::Stay => vec![],
        }
    }

    fn confirm_stash_key(&mut self, key: &str) -> Vec<Command> {
        let Mode::ConfirmStashPop(state) = &mut self.mode else {
            return vec![];
        };
        match confirm_key(state, key) {
            ConfirmAction::Confirm => {
                let stash_ref = state.target.clone();
                self.mode = Mode::Status;
                vec![Command::StashPop { stash_ref }]
            }
            ConfirmAction::Cancel => {
                self.mode = Mode::Status;
                vec![]
            }
            ConfirmAction::Stay => vec![],
        }
    }

    // === Branch picker ===

    fn branch_key(&mut self, key: &str) -> Vec<Command> {
        let Mode::BranchPicker(state) = &mut self.mode else {
            return vec![];
        };
        let last = state.branches.len().saturating_sub(1);
        match key {
            "j" | "down" => state.cursor = (state.cursor + 1).min(last),
            "k" | "up" => state.cursor = state.cursor.saturating_sub(1),
            "g" | "home" => state.cursor = 0,
            "G" | "end" => state.cursor = last,
            "enter" => return checkout_selected(state),
            "esc" | "q" => self.mode = Mode::Status,
            _ => {}
        }
        vec![]
    }

    // === Overlays ===

    fn overlay_key(&mut self, key: &str) -> Vec<Command> {
        match self.overlay.take() {
            Some(Overlay::HistorySearch(search)) => self.search_key(search, key),
            Some(Overlay::PathFilter { mut input }) => match key {
                "esc" => vec![],
                "enter" => self.apply_path_filter(&input),
                "backspace" => {
                    input.pop();
                    self.overlay = Some(Overlay::PathFilter { input });
                    vec![]
                }
                _ => {
                    if let Some(c) = printable(key) {
                        input.push(c);
                    }
                    self.overlay = Some(Overlay::PathFilter { input });
                    vec![]
                }
            },
            None => vec![],
        }
    }

    fn search_key(&mut self, mut search: SearchState, key: &str) -> Vec<Command> {
        match key {
            "esc" => return vec![],
            "enter" => {
                let Some(index) = search.current() else {
                    return vec![];
                };
                self.committed_search = Some(search);
                let target = self.files_len() + index;
                return self.set_cursor(target);
            }
            "up" | "ctrl+p" | "shift+tab" => search.selected = search.selected.saturating_sub(1),
            "down" | "ctrl+n" | "tab" => {
                search.selected = (search.selected + 1).min(search.matches.len().saturating_sub(1))
            }
            "backspace" => {
                search.query.pop();
                self.update_matches(&mut search);
            }
            _ => {
                if let Some(c) = printable(key) {
                    search.query.push(c);
                    self.update_matches(&mut search);
                }
            }
        }
        self.overlay = Some(Overlay::HistorySearch(search));
        vec![]
    }

    /// Case-insensitive substring match on commit subjects
    pub(crate) fn update_matches(&self, search: &mut SearchState) {
        let needle = search.query.to_lowercase();
        search.matches = if needle.is_empty() {
            Vec::new()
        } else {
            self.history
                .active()
                .iter()
                .enumerate()
                .filter(|(_, c)| c.subject.to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect()
        };
        search.selected = search.selected.min(search.matches.len().saturating_sub(1));
    }
}

fn submit_commit(state: &mut CommitComposeState, staged: bool) -> Vec<Command> {
    let message = state.message.trim().to_string();
    if message.is_empty() {
        state.error = Some("Commit message is empty".into());
        return vec![];
    }
    if !staged && !state.amend {
        state.error = Some("Nothing staged to commit".into());
        return vec![];
    }
    state.error = None;
    state.in_progress = true;
    vec![Command::Commit {
        message,
        amend: state.amend,
    }]
}

pub(crate) fn checkout_selected(state: &mut BranchPickerState) -> Vec<Command> {
    if state.loading || state.checking_out.is_some() {
        return vec![];
    }
    let Some(branch) = state.selected() else {
        return vec![];
    };
    if branch.is_current {
        state.error = Some(format!("Already on {}", branch.name));
        return vec![];
    }
    let name = branch.checkout_name().to_string();
    state.checking_out = Some(name.clone());
    state.error = None;
    vec![Command::Checkout { name }]
}

/// Widest content line, for clamping horizontal scroll
pub(super) fn widest_line(
    diff: Option<&gitpane_diff::ParsedDiff>,
    external: Option<&[ratatui::text::Line<'static>]>,
) -> usize {
    match (external, diff) {
        (Some(lines), _) => lines.iter().map(|l| l.width()).max().unwrap_or(0),
        (None, Some(diff)) => diff
            .lines()
            .map(|l| display_width(&l.content))
            .max()
            .unwrap_or(0),
        (None, None) => 0,
    }
}

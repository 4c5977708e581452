//! Completion and host message handling

use super::mode::{FocusPane, Mode, RemoteOp, RemoteStatus};
use super::{CursorTarget, Selection, StatusView, WATCH_DEBOUNCE};
use crate::command::{Command, DiffSource};
use crate::model::{populate_push_status, Bucket, FileTree};
use crate::msg::{DiffPayload, Msg, StashOperation};
use gitpane_vcs::{Commit, CommitFilter, PushStatus, StashList};
use std::time::Instant;

impl StatusView {
    pub(crate) fn handle_msg(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::StatusLoaded {
                tree,
                push_status,
                stashes,
            } => self.on_status_loaded(tree, push_status, stashes),
            Msg::RefreshError(error) => self.error_message(format!("Refresh failed: {}", error)),
            Msg::RecentCommitsLoaded {
                commits,
                push_status,
            } => self.on_recent_commits(commits, push_status),
            Msg::RecentCommitsError(error) => {
                self.push_restore_hash = None;
                self.error_message(format!("Loading commits failed: {}", error))
            }
            Msg::MoreCommitsLoaded { filter, commits } => self.on_more_commits(filter, commits),
            Msg::MoreCommitsError(error) => {
                self.history.loading_more = false;
                self.error_message(format!("Loading commits failed: {}", error))
            }
            Msg::FilteredCommitsLoaded { filter, commits } => {
                self.on_filtered_commits(filter, commits)
            }
            Msg::FilteredCommitsError(error) => {
                self.error_message(format!("Filtering commits failed: {}", error))
            }
            Msg::InlineDiffLoaded(payload) => self.on_inline_diff(payload),
            Msg::FullDiffLoaded(payload) => self.on_full_diff(payload),
            Msg::CommitPreviewLoaded { commit } => self.on_commit_preview(commit),
            Msg::CommitPreviewError { hash, error } => {
                if self.selected_commit().is_some_and(|c| c.hash == hash) {
                    self.error_message(format!("Loading commit failed: {}", error))
                } else {
                    vec![]
                }
            }

            Msg::OperationDone { label } => {
                log::info!("{}", label);
                vec![Command::Refresh]
            }
            Msg::OperationError(error) => {
                self.pending_cursor = None;
                let mut commands = self.error_message(error);
                commands.push(Command::Refresh);
                commands
            }
            Msg::CommitSuccess { short_hash } => {
                if let Mode::Commit(_) = self.mode {
                    self.mode = Mode::Status;
                }
                let mut commands = vec![Command::Refresh, Command::LoadRecentCommits];
                commands.extend(self.set_message(format!("Committed {}", short_hash), false));
                commands
            }
            Msg::CommitError(error) => match &mut self.mode {
                Mode::Commit(state) => {
                    state.error = Some(error);
                    state.in_progress = false;
                    vec![]
                }
                _ => self.error_message(error),
            },
            Msg::PushSuccess { output } => self.on_remote_success(RemoteOp::Push, &output),
            Msg::PushError(error) => {
                self.push_restore_hash = None;
                self.on_remote_error(RemoteOp::Push, error)
            }
            Msg::FetchSuccess { output } => self.on_remote_success(RemoteOp::Fetch, &output),
            Msg::FetchError(error) => self.on_remote_error(RemoteOp::Fetch, error),
            Msg::PullSuccess { output } => self.on_remote_success(RemoteOp::Pull, &output),
            Msg::PullError(error) => self.on_remote_error(RemoteOp::Pull, error),
            Msg::StashResult {
                operation,
                stash_ref,
                error,
            } => self.on_stash_result(operation, stash_ref, error),
            Msg::BranchesLoaded(branches) => {
                if let Mode::BranchPicker(state) = &mut self.mode {
                    state.cursor = branches.iter().position(|b| b.is_current).unwrap_or(0);
                    state.branches = branches;
                    state.loading = false;
                }
                vec![]
            }
            Msg::BranchesError(error) => match &mut self.mode {
                Mode::BranchPicker(state) => {
                    state.loading = false;
                    state.error = Some(error);
                    vec![]
                }
                _ => self.error_message(error),
            },
            Msg::CheckoutSuccess { name } => {
                if let Mode::BranchPicker(_) = self.mode {
                    self.mode = Mode::Status;
                }
                // Another branch has a different history; don't merge into it
                self.history.recent.clear();
                self.history.clear_filter();
                self.history.more_available = true;
                self.committed_search = None;
                self.recompute_graph();
                let mut commands = vec![Command::Refresh, Command::LoadRecentCommits];
                commands.extend(self.set_message(format!("Switched to {}", name), false));
                commands
            }
            Msg::CheckoutError(error) => match &mut self.mode {
                Mode::BranchPicker(state) => {
                    state.checking_out = None;
                    state.error = Some(error);
                    vec![]
                }
                _ => self.error_message(error),
            },

            Msg::WatchEvent { at } => self.on_watch_event(at),
            Msg::WatcherStopped => {
                log::info!("File watcher stopped");
                self.watching = false;
                self.error_message("File watching stopped; press r to refresh")
            }
            Msg::ClearIndicator {
                indicator,
                generation,
            } => {
                self.clear_indicator(indicator, generation);
                vec![]
            }
            Msg::Copied { label } => self
                .set_message(format!("Copied {}", label), false)
                .into_iter()
                .collect(),
            Msg::ClipboardFailed(error) => vec![Command::Toast(format!("Copy failed: {}", error))],
            Msg::BrowserOpened { url } => {
                log::info!("Opened {}", url);
                vec![]
            }
            Msg::BrowserFailed(error) => vec![Command::Toast(error)],
            Msg::PreferencesSaved => vec![],
            Msg::PreferencesFailed(error) => {
                log::warn!("Saving preferences failed: {}", error);
                vec![Command::Toast("Could not save preferences".into())]
            }

            Msg::WindowSize { width, height } => self.on_resize(width, height),
            Msg::PluginFocused | Msg::RefreshRequested => self.full_refresh(),
            Msg::Toast(text) => self.set_message(text, false).into_iter().collect(),
        }
    }

    fn error_message(&mut self, text: impl Into<String>) -> Vec<Command> {
        let text = text.into();
        log::warn!("{}", text);
        self.set_message(text, true);
        vec![]
    }

    fn on_status_loaded(
        &mut self,
        tree: FileTree,
        push_status: Option<PushStatus>,
        stashes: StashList,
    ) -> Vec<Command> {
        let anchor = self.anchor();
        self.tree.replace(tree);
        self.stashes = stashes;
        if let Some(status) = push_status {
            populate_push_status(&mut self.history.recent, &status);
            populate_push_status(&mut self.history.filtered, &status);
            self.push_status = Some(status);
        }
        self.last_refresh = Some(Instant::now());

        match self.pending_cursor.take() {
            Some(CursorTarget::FirstUnstaged) => {
                let files = self.files_len();
                let first = self.tree.bucket_start(Bucket::Modified);
                self.cursor = if files == 0 { 0 } else { first.min(files - 1) };
            }
            None => self.restore_anchor(anchor),
        }

        // The selected file may have changed on disk; reload it in place
        if let Selection::File(entry) = self.selection() {
            if !entry.entry.is_folder {
                let source = DiffSource::WorkingTree {
                    path: entry.entry.path.clone(),
                    staged: entry.bucket == Bucket::Staged,
                    status: entry.entry.status,
                };
                if self.selected_diff.as_ref() == Some(&source) {
                    return vec![self.inline_diff_command(source)];
                }
            }
        }
        self.load_selection()
    }

    fn on_recent_commits(
        &mut self,
        commits: Vec<Commit>,
        push_status: Option<PushStatus>,
    ) -> Vec<Command> {
        let anchor = self.anchor();
        if let Some(status) = push_status {
            self.push_status = Some(status);
        }
        self.history.apply_recent(commits, self.push_status.as_ref());
        self.recompute_graph();

        match self.push_restore_hash.take() {
            Some(hash) => match self.history.position(&hash) {
                Some(i) => self.cursor = self.files_len() + i,
                None => self.restore_anchor(anchor),
            },
            None => self.restore_anchor(anchor),
        }
        self.load_selection()
    }

    fn on_more_commits(&mut self, filter: CommitFilter, commits: Vec<Commit>) -> Vec<Command> {
        let active_filter = if self.history.filter_active {
            self.history.filter.clone()
        } else {
            CommitFilter::default()
        };
        if filter != active_filter {
            log::debug!("Dropping page for stale filter {:?}", filter);
            self.history.loading_more = false;
            return vec![];
        }
        let status = self.push_status.clone();
        self.history.apply_more(commits, status.as_ref());
        self.recompute_graph();
        vec![]
    }

    fn on_filtered_commits(&mut self, filter: CommitFilter, commits: Vec<Commit>) -> Vec<Command> {
        if filter != self.history.filter {
            log::debug!("Dropping results for stale filter {:?}", filter);
            return vec![];
        }
        let empty = commits.is_empty();
        let status = self.push_status.clone();
        self.history.apply_filtered(commits, status.as_ref());
        self.recompute_graph();
        self.committed_search = None;
        let files = self.files_len();
        let mut commands = self.set_cursor(files);
        if empty {
            commands.extend(self.set_message("No commits match the filter", false));
        }
        commands
    }

    fn on_inline_diff(&mut self, payload: DiffPayload) -> Vec<Command> {
        if self.selected_diff.as_ref() != Some(&payload.source) {
            log::debug!("Dropping stale diff for {}", payload.source.path());
            return vec![];
        }
        let commands = match &payload.error {
            Some(error) => vec![Command::Toast(error.clone())],
            None => vec![],
        };
        self.inline_diff = Some(payload);
        self.diff_pane_scroll = self.diff_pane_scroll.min(self.inline_max_scroll());
        commands
    }

    fn on_full_diff(&mut self, payload: DiffPayload) -> Vec<Command> {
        let Mode::Diff(state) = &mut self.mode else {
            return vec![];
        };
        if state.source.as_ref() != Some(&payload.source) {
            log::debug!("Dropping stale full diff for {}", payload.source.path());
            return vec![];
        }
        state.loading = false;
        state.diff = payload.diff;
        state.external = payload.external;
        state.error = payload.error.clone();
        match payload.error {
            Some(error) => vec![Command::Toast(error)],
            None => vec![],
        }
    }

    fn on_commit_preview(&mut self, commit: Commit) -> Vec<Command> {
        if !self.selected_commit().is_some_and(|c| c.hash == commit.hash) {
            log::debug!("Dropping stale preview for {}", commit.short_hash);
            return vec![];
        }
        self.preview_cursor = self
            .preview_cursor
            .min(commit.files.len().saturating_sub(1));
        self.preview_commit = Some(commit);
        vec![]
    }

    fn on_remote_success(&mut self, op: RemoteOp, output: &str) -> Vec<Command> {
        log::info!("{} finished: {}", op.done(), output.trim());
        let mut commands = vec![Command::Refresh, Command::LoadRecentCommits];
        commands.extend(self.set_remote(RemoteStatus::Succeeded(op)));
        commands
    }

    fn on_remote_error(&mut self, op: RemoteOp, error: String) -> Vec<Command> {
        log::warn!("{:?} failed: {}", op, error);
        self.set_remote(RemoteStatus::Failed(op, error));
        vec![]
    }

    fn on_stash_result(
        &mut self,
        operation: StashOperation,
        stash_ref: Option<String>,
        error: Option<String>,
    ) -> Vec<Command> {
        let mut commands = match error {
            Some(error) => self.error_message(format!("Stash failed: {}", error)),
            None => {
                let text = match stash_ref {
                    Some(stash_ref) => format!("{} {}", operation, stash_ref),
                    None => operation.to_string(),
                };
                self.set_message(text, false).into_iter().collect()
            }
        };
        commands.push(Command::Refresh);
        commands
    }

    fn on_watch_event(&mut self, at: Instant) -> Vec<Command> {
        if !self.watching {
            return vec![];
        }
        let recent = self
            .last_refresh
            .is_some_and(|last| at.saturating_duration_since(last) < WATCH_DEBOUNCE);
        if recent {
            log::trace!("Coalescing watch event");
            return vec![Command::WatchNext];
        }
        self.last_refresh = Some(at);
        vec![
            Command::Refresh,
            Command::LoadRecentCommits,
            Command::WatchNext,
        ]
    }

    fn on_resize(&mut self, width: u16, height: u16) -> Vec<Command> {
        let old_width = self.frame.diff_content.width;
        self.width = width;
        self.height = height;
        self.relayout();

        if self.frame.diff_content.width == old_width {
            return vec![];
        }
        // External output is rendered for a fixed width
        let mut commands = Vec::new();
        if let Some(payload) = &self.inline_diff {
            if payload.external.is_some() {
                commands.push(self.inline_diff_command(payload.source.clone()));
            }
        }
        if let Mode::Diff(state) = &self.mode {
            if let (Some(_), Some(source)) = (&state.external, &state.source) {
                commands.push(self.full_diff_command(source.clone()));
            }
        }
        if self.active_pane == FocusPane::Diff && !self.diff_target_loaded() {
            self.active_pane = FocusPane::Sidebar;
        }
        commands
    }
}

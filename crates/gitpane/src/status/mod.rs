//! The status view: a state machine over files, commits and modals
//!
//! All state lives here and is mutated only on the event-loop thread.
//! Input and completion messages go in through [`StatusView::handle_key`],
//! [`StatusView::handle_mouse`] and [`StatusView::update`]; work comes out
//! as [`Command`] descriptors. After every call the view re-runs its
//! layout pass so the hit map always matches the next frame.

mod frame;
mod keys;
mod messages;
mod mode;
mod mouse;
#[cfg(test)]
mod tests;

pub use frame::{preview_body_lines, FileRow, FrameLayout, ModalGeometry, SidebarGeometry};
pub use mode::{
    push_options, BranchPickerState, CommitComposeState, ComposeFocus, ConfirmButton,
    ConfirmState, FocusPane, FullDiffState, Mode, Overlay, RemoteOp, RemoteStatus, SearchState,
    ViewMode,
};

use crate::command::{Command, DiffSource, Indicator};
use crate::hitmap::{HitMap, MouseClassifier};
use crate::input::MouseInput;
use crate::model::{
    compute_graph_for_commits, Bucket, CommitHistory, EntryKey, EntryRef, FileTree, GraphLine,
};
use crate::msg::{DiffPayload, Msg};
use gitpane_config::{AppConfig, Preferences};
use gitpane_diff::{row_count, DiffViewMode};
use gitpane_vcs::{Commit, PushStatus, StashList};
use std::time::{Duration, Instant};

/// Watch events closer than this to the last refresh are dropped
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// Columns moved per horizontal scroll step
pub const H_SCROLL_STEP: usize = 10;

/// Settings the view takes from [`AppConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub page_size: usize,
    pub scroll_delta: usize,
    pub double_click: Duration,
    pub wrap_lines: bool,
    pub watch: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ViewConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_size: config.commit_page_size,
            scroll_delta: config.scroll_delta,
            double_click: Duration::from_millis(config.double_click_ms),
            wrap_lines: config.wrap_lines,
            watch: config.watch,
        }
    }
}

/// What the cursor is on
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    File(EntryRef<'a>),
    /// Commit and its index in the active list
    Commit(&'a Commit, usize),
    None,
}

/// Where to put the cursor once the next status refresh lands
#[derive(Debug, Clone, PartialEq, Eq)]
enum CursorTarget {
    /// First entry that is not staged
    FirstUnstaged,
}

/// Identity of the cursor across list rebuilds
#[derive(Debug, Clone, PartialEq, Eq)]
enum Anchor {
    File(EntryKey, usize),
    Commit(String),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct StatusView {
    pub(crate) config: ViewConfig,

    // === Repository state ===
    pub(crate) tree: FileTree,
    pub(crate) history: CommitHistory,
    pub(crate) push_status: Option<PushStatus>,
    pub(crate) stashes: StashList,
    pub(crate) graph: Vec<GraphLine>,
    pub(crate) graph_enabled: bool,
    pub(crate) diff_mode: DiffViewMode,

    // === Modes ===
    pub(crate) mode: Mode,
    pub(crate) overlay: Option<Overlay>,
    pub(crate) committed_search: Option<SearchState>,
    pub(crate) history_scroll: usize,
    pub(crate) active_pane: FocusPane,

    // === Cursor and scroll ===
    pub(crate) cursor: usize,
    pub(crate) scroll_off: usize,
    pub(crate) commit_scroll_off: usize,
    pub(crate) diff_pane_scroll: usize,
    pub(crate) diff_pane_h_scroll: usize,
    pub(crate) preview_scroll: usize,
    pub(crate) preview_cursor: usize,

    // === Sidebar ===
    pub(crate) sidebar_visible: bool,
    pub(crate) sidebar_width: u16,
    pub(crate) sidebar_restore: Option<FocusPane>,

    // === Right pane ===
    pub(crate) selected_diff: Option<DiffSource>,
    pub(crate) inline_diff: Option<DiffPayload>,
    pub(crate) preview_commit: Option<Commit>,

    // === Transient indicators ===
    pub(crate) remote_status: Option<RemoteStatus>,
    pub(crate) status_message: Option<StatusMessage>,
    remote_generation: u64,
    message_generation: u64,

    // === Refresh bookkeeping ===
    pub(crate) last_refresh: Option<Instant>,
    pub(crate) watching: bool,
    push_restore_hash: Option<String>,
    pending_cursor: Option<CursorTarget>,

    // === Frame ===
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) frame: FrameLayout,
    pub(crate) hitmap: HitMap,
    pub(crate) mouse: MouseClassifier,
}

impl StatusView {
    pub fn new(config: ViewConfig, preferences: &Preferences) -> Self {
        let mouse = MouseClassifier::new(config.double_click, config.scroll_delta);
        let mut view = Self {
            history: CommitHistory::new(config.page_size),
            watching: config.watch,
            config,
            tree: FileTree::default(),
            push_status: None,
            stashes: StashList::default(),
            graph: Vec::new(),
            graph_enabled: preferences.graph_enabled.unwrap_or(false),
            diff_mode: preferences.diff_mode.unwrap_or_default(),
            mode: Mode::Status,
            overlay: None,
            committed_search: None,
            history_scroll: 0,
            active_pane: FocusPane::Sidebar,
            cursor: 0,
            scroll_off: 0,
            commit_scroll_off: 0,
            diff_pane_scroll: 0,
            diff_pane_h_scroll: 0,
            preview_scroll: 0,
            preview_cursor: 0,
            sidebar_visible: true,
            sidebar_width: preferences.sidebar_width.unwrap_or(0),
            sidebar_restore: None,
            selected_diff: None,
            inline_diff: None,
            preview_commit: None,
            remote_status: None,
            status_message: None,
            remote_generation: 0,
            message_generation: 0,
            last_refresh: None,
            push_restore_hash: None,
            pending_cursor: None,
            width: 0,
            height: 0,
            frame: FrameLayout::default(),
            hitmap: HitMap::new(),
            mouse,
        };
        view.relayout();
        view
    }

    /// Commands to run at startup
    pub fn init(&mut self) -> Vec<Command> {
        let mut commands = vec![Command::Refresh, Command::LoadRecentCommits];
        if self.watching {
            commands.push(Command::WatchNext);
        }
        commands
    }

    // === Entry points ===

    pub fn handle_key(&mut self, key: &str) -> Vec<Command> {
        let commands = self.route_key(key);
        self.finish_turn();
        commands
    }

    pub fn handle_mouse(&mut self, input: &MouseInput, now: Instant) -> Vec<Command> {
        let commands = self.route_mouse(input, now);
        self.finish_turn();
        commands
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        let commands = self.handle_msg(msg);
        self.finish_turn();
        commands
    }

    fn finish_turn(&mut self) {
        self.clamp_cursor();
        self.relayout();
    }

    /// Whether a bare `q` should quit the application
    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Status) && self.overlay.is_none()
    }

    // === Accessors ===

    pub fn view_mode(&self) -> ViewMode {
        self.mode.view_mode()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn active_pane(&self) -> FocusPane {
        self.active_pane
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn active_commits(&self) -> &[Commit] {
        self.history.active()
    }

    pub fn preview_commit(&self) -> Option<&Commit> {
        self.preview_commit.as_ref()
    }

    pub fn hitmap(&self) -> &HitMap {
        &self.hitmap
    }

    pub fn frame(&self) -> &FrameLayout {
        &self.frame
    }

    pub fn files_len(&self) -> usize {
        self.tree.len()
    }

    pub fn total_selectable(&self) -> usize {
        self.files_len() + self.history.active().len()
    }

    /// Index into the active commits when the cursor is on a commit
    pub fn selected_commit_index(&self) -> Option<usize> {
        let files = self.files_len();
        (self.cursor >= files && self.cursor < self.total_selectable()).then(|| self.cursor - files)
    }

    pub fn selection(&self) -> Selection<'_> {
        let files = self.files_len();
        if self.cursor < files {
            return match self.tree.all_entries().get(self.cursor) {
                Some(entry) => Selection::File(*entry),
                None => Selection::None,
            };
        }
        match self.selected_commit_index() {
            Some(i) => Selection::Commit(&self.history.active()[i], i),
            None => Selection::None,
        }
    }

    pub fn selected_commit(&self) -> Option<&Commit> {
        match self.selection() {
            Selection::Commit(commit, _) => Some(commit),
            _ => None,
        }
    }

    fn anchor(&self) -> Anchor {
        match self.selection() {
            Selection::File(entry) => Anchor::File(entry.key(), self.cursor),
            Selection::Commit(commit, _) => Anchor::Commit(commit.hash.clone()),
            Selection::None => Anchor::None,
        }
    }

    /// Put the cursor back on the anchored file or commit
    fn restore_anchor(&mut self, anchor: Anchor) {
        match anchor {
            Anchor::File(key, old_index) => {
                self.cursor = self.tree.position(&key).unwrap_or_else(|| {
                    let files = self.files_len();
                    if files == 0 {
                        0
                    } else {
                        old_index.min(files - 1)
                    }
                });
            }
            Anchor::Commit(hash) => {
                if let Some(i) = self.history.position(&hash) {
                    self.cursor = self.files_len() + i;
                }
            }
            Anchor::None => {}
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let total = self.total_selectable();
        if self.cursor >= total.max(1) {
            self.cursor = total.saturating_sub(1);
        }
        if self.selected_commit_index().is_none() && self.preview_commit.is_some() {
            self.preview_commit = None;
            if matches!(self.mode, Mode::Status) && self.active_pane == FocusPane::Diff {
                self.active_pane = FocusPane::Sidebar;
            }
        }
    }

    // === Cursor movement ===

    /// Move the cursor to `index` and load what it lands on
    pub(crate) fn set_cursor(&mut self, index: usize) -> Vec<Command> {
        let total = self.total_selectable();
        self.cursor = index.min(total.saturating_sub(1));
        self.load_selection()
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) -> Vec<Command> {
        let target = self.cursor.saturating_add_signed(delta);
        self.set_cursor(target)
    }

    /// Load the inline diff or commit preview for the current selection
    pub(crate) fn load_selection(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        let selection = match self.selection() {
            Selection::File(entry) if entry.entry.is_folder => None,
            Selection::File(entry) => Some(Ok(DiffSource::WorkingTree {
                path: entry.entry.path.clone(),
                staged: entry.bucket == Bucket::Staged,
                status: entry.entry.status,
            })),
            Selection::Commit(commit, index) => Some(Err((commit.clone(), index))),
            Selection::None => None,
        };

        match selection {
            Some(Ok(source)) => {
                self.preview_commit = None;
                if self.selected_diff.as_ref() != Some(&source) {
                    self.selected_diff = Some(source.clone());
                    self.inline_diff = None;
                    self.diff_pane_scroll = 0;
                    self.diff_pane_h_scroll = 0;
                    commands.push(self.inline_diff_command(source));
                }
            }
            Some(Err((commit, index))) => {
                self.selected_diff = None;
                self.inline_diff = None;
                let same = self
                    .preview_commit
                    .as_ref()
                    .is_some_and(|c| c.hash == commit.hash);
                if !same {
                    self.preview_cursor = 0;
                    self.preview_scroll = 0;
                    commands.push(Command::LoadCommitPreview {
                        hash: commit.hash.clone(),
                    });
                    self.preview_commit = Some(commit);
                }
                if self.history.wants_more(index) {
                    commands.extend(self.load_more_command());
                }
            }
            None => {
                self.selected_diff = None;
                self.inline_diff = None;
                self.preview_commit = None;
            }
        }
        commands
    }

    fn load_more_command(&mut self) -> Option<Command> {
        let before = self.history.oldest_hash()?;
        self.history.loading_more = true;
        let filter = if self.history.filter_active {
            self.history.filter.clone()
        } else {
            Default::default()
        };
        log::debug!("Loading commits before {}", before);
        Some(Command::LoadMoreCommits { before, filter })
    }

    pub(crate) fn inline_diff_command(&self, source: DiffSource) -> Command {
        Command::LoadInlineDiff {
            source,
            width: self.frame.diff_content.width.max(20),
            side_by_side: self.diff_mode == DiffViewMode::SideBySide,
        }
    }

    pub(crate) fn full_diff_command(&self, source: DiffSource) -> Command {
        Command::LoadFullDiff {
            source,
            width: self.width.saturating_sub(2).max(20),
            side_by_side: self.diff_mode == DiffViewMode::SideBySide,
        }
    }

    /// Whether the right pane has something to focus
    pub(crate) fn diff_target_loaded(&self) -> bool {
        self.inline_diff.is_some() || self.preview_commit.is_some()
    }

    // === Derived state ===

    pub(crate) fn recompute_graph(&mut self) {
        self.graph = if self.graph_enabled {
            compute_graph_for_commits(self.history.active())
        } else {
            Vec::new()
        };
    }

    pub(crate) fn can_push(&self) -> bool {
        self.push_status
            .as_ref()
            .is_some_and(|s| !s.unpushed.is_empty())
    }

    pub(crate) fn remote_busy(&self) -> bool {
        matches!(self.remote_status, Some(RemoteStatus::Running(_)))
    }

    pub(crate) fn preferences(&self) -> Preferences {
        Preferences {
            sidebar_width: (self.sidebar_width > 0).then_some(self.sidebar_width),
            diff_mode: Some(self.diff_mode),
            graph_enabled: Some(self.graph_enabled),
        }
    }

    /// Total rows of a loaded diff at `width`
    pub(crate) fn diff_rows(&self, payload: Option<&DiffPayload>, width: u16) -> usize {
        match payload {
            Some(DiffPayload {
                external: Some(lines),
                ..
            }) => lines.len(),
            Some(payload) => row_count(
                self.diff_mode,
                payload.diff.as_ref(),
                usize::from(width),
                self.config.wrap_lines,
            ),
            None => 0,
        }
    }

    pub(crate) fn inline_max_scroll(&self) -> usize {
        let rows = self.diff_rows(self.inline_diff.as_ref(), self.frame.diff_content.width);
        rows.saturating_sub(usize::from(self.frame.diff_content.height))
    }

    // === Indicators ===

    /// Show a message under the sidebar title. Only successes clear themselves.
    pub(crate) fn set_message(
        &mut self,
        text: impl Into<String>,
        is_error: bool,
    ) -> Option<Command> {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error,
        });
        self.message_generation += 1;
        (!is_error).then_some(Command::ScheduleClear {
            indicator: Indicator::Message,
            generation: self.message_generation,
        })
    }

    pub(crate) fn set_remote(&mut self, status: RemoteStatus) -> Option<Command> {
        let schedule = matches!(status, RemoteStatus::Succeeded(_));
        self.remote_status = Some(status);
        self.remote_generation += 1;
        schedule.then_some(Command::ScheduleClear {
            indicator: Indicator::Remote,
            generation: self.remote_generation,
        })
    }

    pub(crate) fn clear_indicator(&mut self, indicator: Indicator, generation: u64) {
        match indicator {
            Indicator::Remote if generation == self.remote_generation => {
                self.remote_status = None;
            }
            Indicator::Message if generation == self.message_generation => {
                self.status_message = None;
            }
            _ => log::debug!("Ignoring stale clear for {:?}", indicator),
        }
    }

    /// Clear errors left from earlier attempts
    pub(crate) fn clear_errors(&mut self) {
        if matches!(self.remote_status, Some(RemoteStatus::Failed(..))) {
            self.remote_status = None;
        }
        if self.status_message.as_ref().is_some_and(|m| m.is_error) {
            self.status_message = None;
        }
    }

    /// Refresh the working tree and reload the first page of commits
    pub(crate) fn full_refresh(&mut self) -> Vec<Command> {
        self.clear_errors();
        vec![Command::Refresh, Command::LoadRecentCommits]
    }
}

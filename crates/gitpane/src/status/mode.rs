//! Mode-specific state of the status view
//!
//! Each modal mode owns its fields, so nothing that belongs to the commit
//! composer can be read while the push menu is open.

use crate::command::{DiffSource, DiscardTarget};
use gitpane_diff::ParsedDiff;
use gitpane_vcs::{Branch, PushVariant};
use ratatui::text::Line;

/// Tag of the current [`Mode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ViewMode {
    Status,
    Diff,
    Commit,
    PushMenu,
    ConfirmDiscard,
    BranchPicker,
    ConfirmStashPop,
}

/// Which status pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    #[default]
    Sidebar,
    Diff,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Status,
    Diff(FullDiffState),
    Commit(CommitComposeState),
    PushMenu { focus: usize },
    ConfirmDiscard(ConfirmState<DiscardTarget>),
    BranchPicker(BranchPickerState),
    ConfirmStashPop(ConfirmState<String>),
}

impl Mode {
    pub fn view_mode(&self) -> ViewMode {
        match self {
            Mode::Status => ViewMode::Status,
            Mode::Diff(_) => ViewMode::Diff,
            Mode::Commit(_) => ViewMode::Commit,
            Mode::PushMenu { .. } => ViewMode::PushMenu,
            Mode::ConfirmDiscard(_) => ViewMode::ConfirmDiscard,
            Mode::BranchPicker(_) => ViewMode::BranchPicker,
            Mode::ConfirmStashPop(_) => ViewMode::ConfirmStashPop,
        }
    }

    /// Modes drawn as a dialog over the status panes
    pub fn is_modal(&self) -> bool {
        !matches!(self, Mode::Status | Mode::Diff(_))
    }
}

/// Full-screen diff
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FullDiffState {
    pub source: Option<DiffSource>,
    /// Pane focus to restore on exit
    pub return_pane: FocusPane,
    pub diff: Option<ParsedDiff>,
    pub external: Option<Vec<Line<'static>>>,
    pub error: Option<String>,
    pub loading: bool,
    pub scroll: usize,
    pub h_scroll: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeFocus {
    #[default]
    Message,
    Button,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitComposeState {
    pub message: String,
    pub focus: ComposeFocus,
    pub amend: bool,
    pub error: Option<String>,
    pub in_progress: bool,
}

/// Focused button of a two-button dialog.
///
/// The state lives inside the dialog's mode, so focus is back on `Confirm`
/// every time a dialog opens after the previous one closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmButton {
    #[default]
    Confirm,
    Cancel,
}

impl ConfirmButton {
    pub fn toggle(self) -> Self {
        match self {
            ConfirmButton::Confirm => ConfirmButton::Cancel,
            ConfirmButton::Cancel => ConfirmButton::Confirm,
        }
    }

    pub fn index(self) -> usize {
        match self {
            ConfirmButton::Confirm => 0,
            ConfirmButton::Cancel => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            ConfirmButton::Confirm
        } else {
            ConfirmButton::Cancel
        }
    }
}

/// Two-button dialog about `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState<T> {
    pub button: ConfirmButton,
    pub target: T,
}

impl<T> ConfirmState<T> {
    pub fn new(target: T) -> Self {
        Self {
            button: ConfirmButton::default(),
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchPickerState {
    pub branches: Vec<Branch>,
    pub cursor: usize,
    pub scroll: usize,
    pub loading: bool,
    pub checking_out: Option<String>,
    pub error: Option<String>,
}

impl BranchPickerState {
    pub fn selected(&self) -> Option<&Branch> {
        self.branches.get(self.cursor)
    }
}

/// Push menu entries in display order
pub fn push_options() -> &'static [PushVariant] {
    &PushVariant::ALL
}

/// Modals that sit on top of any mode and take keys first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    HistorySearch(SearchState),
    PathFilter { input: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query: String,
    /// Indices into the active commits whose subject matches
    pub matches: Vec<usize>,
    pub selected: usize,
}

impl SearchState {
    pub fn current(&self) -> Option<usize> {
        self.matches.get(self.selected).copied()
    }
}

/// Remote operations shown on the sidebar status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOp {
    Push,
    Fetch,
    Pull,
}

impl RemoteOp {
    pub fn progress(self) -> &'static str {
        match self {
            RemoteOp::Push => "Pushing…",
            RemoteOp::Fetch => "Fetching…",
            RemoteOp::Pull => "Pulling…",
        }
    }

    pub fn done(self) -> &'static str {
        match self {
            RemoteOp::Push => "Pushed",
            RemoteOp::Fetch => "Fetched",
            RemoteOp::Pull => "Pulled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Running(RemoteOp),
    Succeeded(RemoteOp),
    /// Full provider output, truncated only when drawn
    Failed(RemoteOp, String),
}

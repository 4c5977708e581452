//! Completion and host messages consumed by the status view

use crate::command::{DiffSource, Indicator};
use crate::model::FileTree;
use gitpane_diff::ParsedDiff;
use gitpane_vcs::{Branch, Commit, CommitFilter, PushStatus, StashList};
use ratatui::text::Line;
use std::time::Instant;

/// A loaded diff, parsed and optionally pre-rendered by an external tool
#[derive(Debug, Clone, PartialEq)]
pub struct DiffPayload {
    pub source: DiffSource,
    /// `None` when git returned no diff text
    pub diff: Option<ParsedDiff>,
    /// External tool output, already sanitised and converted
    pub external: Option<Vec<Line<'static>>>,
    /// Provider or parse failure
    pub error: Option<String>,
}

impl DiffPayload {
    pub fn failed(source: DiffSource, error: impl Into<String>) -> Self {
        Self {
            source,
            diff: None,
            external: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum StashOperation {
    #[strum(to_string = "Stashed")]
    Push,
    #[strum(to_string = "Popped")]
    Pop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // === Loads ===
    StatusLoaded {
        tree: FileTree,
        push_status: Option<PushStatus>,
        stashes: StashList,
    },
    RefreshError(String),
    RecentCommitsLoaded {
        commits: Vec<Commit>,
        push_status: Option<PushStatus>,
    },
    RecentCommitsError(String),
    MoreCommitsLoaded {
        filter: CommitFilter,
        commits: Vec<Commit>,
    },
    MoreCommitsError(String),
    FilteredCommitsLoaded {
        filter: CommitFilter,
        commits: Vec<Commit>,
    },
    FilteredCommitsError(String),
    InlineDiffLoaded(DiffPayload),
    FullDiffLoaded(DiffPayload),
    CommitPreviewLoaded {
        commit: Commit,
    },
    CommitPreviewError {
        hash: String,
        error: String,
    },

    // === Mutations ===
    /// Stage, unstage or discard finished
    OperationDone {
        label: String,
    },
    OperationError(String),
    CommitSuccess {
        short_hash: String,
    },
    CommitError(String),
    PushSuccess {
        output: String,
    },
    PushError(String),
    FetchSuccess {
        output: String,
    },
    FetchError(String),
    PullSuccess {
        output: String,
    },
    PullError(String),
    StashResult {
        operation: StashOperation,
        stash_ref: Option<String>,
        error: Option<String>,
    },
    BranchesLoaded(Vec<Branch>),
    BranchesError(String),
    CheckoutSuccess {
        name: String,
    },
    CheckoutError(String),

    // === Runtime ===
    WatchEvent {
        at: Instant,
    },
    WatcherStopped,
    ClearIndicator {
        indicator: Indicator,
        generation: u64,
    },
    Copied {
        label: String,
    },
    ClipboardFailed(String),
    BrowserOpened {
        url: String,
    },
    BrowserFailed(String),
    PreferencesSaved,
    PreferencesFailed(String),

    // === Host ===
    WindowSize {
        width: u16,
        height: u16,
    },
    PluginFocused,
    RefreshRequested,
    Toast(String),
}

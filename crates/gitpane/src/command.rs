//! Work the status view asks the host to perform
//!
//! Handlers never block. They return descriptors; the executor resolves
//! each one into exactly one [`Msg`](crate::msg::Msg), except the few the
//! host handles itself (editor, toasts, plugin focus).

use gitpane_config::Preferences;
use gitpane_vcs::{CommitFilter, FileStatus, PushVariant};
use std::time::Duration;

/// How long success indicators stay on screen
pub const INDICATOR_TTL: Duration = Duration::from_secs(3);

/// What a diff is taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    WorkingTree {
        path: String,
        staged: bool,
        status: FileStatus,
    },
    Commit {
        hash: String,
        path: String,
        parent: Option<String>,
    },
}

impl DiffSource {
    pub fn path(&self) -> &str {
        match self {
            DiffSource::WorkingTree { path, .. } | DiffSource::Commit { path, .. } => path,
        }
    }
}

/// Which kind of discard to run on a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardTarget {
    /// Unstaged worktree changes
    Modified { path: String },
    /// Index and worktree changes, back to `HEAD`
    Staged { path: String, status: FileStatus },
    /// Delete the file
    Untracked { path: String },
}

impl DiscardTarget {
    pub fn path(&self) -> &str {
        match self {
            DiscardTarget::Modified { path }
            | DiscardTarget::Staged { path, .. }
            | DiscardTarget::Untracked { path } => path,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DiscardTarget::Modified { path } => format!("Discard changes to {}?", path),
            DiscardTarget::Staged { path, .. } => {
                format!("Discard staged and unstaged changes to {}?", path)
            }
            DiscardTarget::Untracked { path } => format!("Delete untracked file {}?", path),
        }
    }
}

/// Transient indicators cleared by a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Push / fetch / pull result line
    Remote,
    /// General status message under the header
    Message,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // === Loading ===
    /// Status, diff stats, push status and stashes
    Refresh,
    LoadRecentCommits,
    LoadMoreCommits {
        before: String,
        filter: CommitFilter,
    },
    LoadFilteredCommits {
        filter: CommitFilter,
    },
    LoadInlineDiff {
        source: DiffSource,
        width: u16,
        side_by_side: bool,
    },
    LoadFullDiff {
        source: DiffSource,
        width: u16,
        side_by_side: bool,
    },
    LoadCommitPreview {
        hash: String,
    },

    // === Mutations ===
    Stage {
        paths: Vec<String>,
    },
    Unstage {
        paths: Vec<String>,
    },
    StageAll,
    Discard {
        target: DiscardTarget,
    },
    Commit {
        message: String,
        amend: bool,
    },
    Push(PushVariant),
    Fetch,
    Pull,
    StashPush,
    StashPop {
        stash_ref: String,
    },
    LoadBranches,
    Checkout {
        name: String,
    },

    // === Runtime ===
    /// Wait for the next filesystem event
    WatchNext,
    ScheduleClear {
        indicator: Indicator,
        generation: u64,
    },
    CopyToClipboard {
        text: String,
        label: String,
    },
    OpenCommitInBrowser {
        hash: String,
    },
    SavePreferences(Preferences),

    // === Host ===
    OpenFile {
        path: String,
    },
    /// Reveal a path in the file browser
    FocusPlugin {
        path: String,
    },
    Toast(String),
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Refresh => "refresh",
            Command::LoadRecentCommits => "load-recent-commits",
            Command::LoadMoreCommits { .. } => "load-more-commits",
            Command::LoadFilteredCommits { .. } => "load-filtered-commits",
            Command::LoadInlineDiff { .. } => "load-inline-diff",
            Command::LoadFullDiff { .. } => "load-full-diff",
            Command::LoadCommitPreview { .. } => "load-commit-preview",
            Command::Stage { .. } => "stage",
            Command::Unstage { .. } => "unstage",
            Command::StageAll => "stage-all",
            Command::Discard { .. } => "discard",
            Command::Commit { .. } => "commit",
            Command::Push(_) => "push",
            Command::Fetch => "fetch",
            Command::Pull => "pull",
            Command::StashPush => "stash-push",
            Command::StashPop { .. } => "stash-pop",
            Command::LoadBranches => "load-branches",
            Command::Checkout { .. } => "checkout",
            Command::WatchNext => "watch-next",
            Command::ScheduleClear { .. } => "schedule-clear",
            Command::CopyToClipboard { .. } => "copy",
            Command::OpenCommitInBrowser { .. } => "open-in-browser",
            Command::SavePreferences(_) => "save-preferences",
            Command::OpenFile { .. } => "open-file",
            Command::FocusPlugin { .. } => "focus-plugin",
            Command::Toast(_) => "toast",
        }
    }
}

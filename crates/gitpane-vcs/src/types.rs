//! Repository data records
//!
//! These types describe what the provider reads out of a repository. They
//! carry no behaviour beyond formatting helpers, so the view layer can build
//! its own models on top of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Length of an abbreviated commit hash.
pub const SHORT_HASH_LEN: usize = 7;

/// Change status of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Untracked,
    Ignored,
    Unmerged,
}

impl FileStatus {
    /// Map a porcelain / name-status letter to a status.
    ///
    /// Returns `None` for `.` (unchanged) and unknown letters.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' | 'T' => Some(FileStatus::Modified),
            'A' => Some(FileStatus::Added),
            'D' => Some(FileStatus::Deleted),
            'R' => Some(FileStatus::Renamed),
            'C' => Some(FileStatus::Copied),
            '?' => Some(FileStatus::Untracked),
            '!' => Some(FileStatus::Ignored),
            'U' => Some(FileStatus::Unmerged),
            _ => None,
        }
    }

    /// Single-letter marker shown next to a path.
    pub fn symbol(self) -> char {
        match self {
            FileStatus::Modified => 'M',
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
            FileStatus::Untracked => '?',
            FileStatus::Ignored => '!',
            FileStatus::Unmerged => 'U',
        }
    }
}

/// A file touched by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFile {
    pub path: String,
    /// Previous path for renames and copies
    pub old_path: Option<String>,
    pub status: FileStatus,
    pub additions: u32,
    pub deletions: u32,
}

/// Aggregate line counts of a commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    pub files_changed: usize,
    pub additions: u32,
    pub deletions: u32,
}

impl CommitStats {
    pub fn from_files(files: &[CommitFile]) -> Self {
        Self {
            files_changed: files.len(),
            additions: files.iter().map(|f| f.additions).sum(),
            deletions: files.iter().map(|f| f.deletions).sum(),
        }
    }
}

/// A commit from the history
///
/// Commits are identified by `hash`: equality and hashing ignore every
/// other field, so a reloaded commit equals its earlier copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    pub author_email: String,
    pub date: DateTime<Utc>,
    pub subject: String,
    pub body: String,
    pub parent_hashes: Vec<String>,
    /// Two or more parents
    pub is_merge: bool,
    /// Reachable from the upstream (not in the unpushed set)
    pub pushed: bool,
    /// Only filled by `commit_detail`
    pub files: Vec<CommitFile>,
    pub stats: CommitStats,
}

impl Commit {
    pub fn new(hash: impl Into<String>, subject: impl Into<String>) -> Self {
        let hash = hash.into();
        Self {
            short_hash: short_hash(&hash),
            hash,
            author: String::new(),
            author_email: String::new(),
            date: DateTime::<Utc>::default(),
            subject: subject.into(),
            body: String::new(),
            parent_hashes: Vec::new(),
            is_merge: false,
            pushed: false,
            files: Vec::new(),
            stats: CommitStats::default(),
        }
    }

    /// First parent, used as the base when diffing a commit's files.
    pub fn first_parent(&self) -> Option<&str> {
        self.parent_hashes.first().map(String::as_str)
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Commit {}

impl Hash for Commit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

/// Abbreviate a full hash to its 7-character prefix.
pub fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}

/// Format `↑a↓b`, omitting zero sides.
pub fn format_ahead_behind(ahead: usize, behind: usize) -> String {
    let mut out = String::new();
    if ahead > 0 {
        out.push_str(&format!("↑{}", ahead));
    }
    if behind > 0 {
        out.push_str(&format!("↓{}", behind));
    }
    out
}

/// Relation of the current branch to its upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushStatus {
    pub current_branch: String,
    pub detached_head: bool,
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    /// Hashes of local commits not yet on any remote
    pub unpushed: HashSet<String>,
}

impl PushStatus {
    pub fn format_ahead_behind(&self) -> String {
        format_ahead_behind(self.ahead, self.behind)
    }

    pub fn has_upstream(&self) -> bool {
        self.upstream.is_some()
    }

    pub fn is_unpushed(&self, hash: &str) -> bool {
        self.unpushed.contains(hash)
    }
}

/// A local or remote-tracking branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn format_tracking_info(&self) -> String {
        format_ahead_behind(self.ahead, self.behind)
    }

    /// Name to hand to `checkout`. Remote branches drop their remote prefix
    /// so git creates a local tracking branch.
    pub fn checkout_name(&self) -> &str {
        if self.is_remote {
            self.name
                .split_once('/')
                .map(|(_, rest)| rest)
                .unwrap_or(&self.name)
        } else {
            &self.name
        }
    }
}

/// A stash entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stash {
    pub index: usize,
    /// e.g. `stash@{0}`
    pub stash_ref: String,
    pub branch: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashList {
    pub stashes: Vec<Stash>,
}

impl StashList {
    pub fn count(&self) -> usize {
        self.stashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stashes.is_empty()
    }

    pub fn newest(&self) -> Option<&Stash> {
        self.stashes.first()
    }
}

/// How `push` should be invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PushVariant {
    #[default]
    Plain,
    ForceWithLease,
    SetUpstream,
}

impl PushVariant {
    pub const ALL: [PushVariant; 3] = [
        PushVariant::Plain,
        PushVariant::ForceWithLease,
        PushVariant::SetUpstream,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PushVariant::Plain => "Push",
            PushVariant::ForceWithLease => "Force push (with lease)",
            PushVariant::SetUpstream => "Push and set upstream",
        }
    }

    /// Direct key in the push menu.
    pub fn shortcut(self) -> char {
        match self {
            PushVariant::Plain => 'p',
            PushVariant::ForceWithLease => 'f',
            PushVariant::SetUpstream => 'u',
        }
    }
}

/// Restricts `recent_commits` to an author and/or a path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFilter {
    pub author: Option<String>,
    pub path: Option<String>,
}

impl CommitFilter {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.path.is_none()
    }
}

/// One line of `git diff --numstat`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumstatEntry {
    /// Path after the change; renames are resolved to their new path
    pub path: String,
    pub additions: u32,
    pub deletions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_ahead_behind() {
        assert_eq!(format_ahead_behind(0, 0), "");
        assert_eq!(format_ahead_behind(2, 0), "↑2");
        assert_eq!(format_ahead_behind(0, 3), "↓3");
        assert_eq!(format_ahead_behind(2, 1), "↑2↓1");
    }

    #[test]
    fn test_commit_identity_is_hash() {
        let mut a = Commit::new("abcdef1234567890", "first");
        let b = Commit::new("abcdef1234567890", "reworded");
        a.pushed = true;
        assert_eq!(a, b);
        assert_eq!(a.short_hash, "abcdef1");

        let set: HashSet<Commit> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_branch_checkout_name() {
        let mut branch = Branch::new("origin/feature/x");
        branch.is_remote = true;
        assert_eq!(branch.checkout_name(), "feature/x");
        assert_eq!(Branch::new("main").checkout_name(), "main");
    }

    #[test]
    fn test_file_status_codes() {
        assert_eq!(FileStatus::from_code('M'), Some(FileStatus::Modified));
        assert_eq!(FileStatus::from_code('.'), None);
        assert_eq!(FileStatus::Untracked.symbol(), '?');
    }

    #[test]
    fn test_commit_stats_from_files() {
        let files = vec![
            CommitFile {
                path: "a".into(),
                old_path: None,
                status: FileStatus::Modified,
                additions: 3,
                deletions: 1,
            },
            CommitFile {
                path: "b".into(),
                old_path: None,
                status: FileStatus::Added,
                additions: 10,
                deletions: 0,
            },
        ];
        assert_eq!(
            CommitStats::from_files(&files),
            CommitStats {
                files_changed: 2,
                additions: 13,
                deletions: 1
            }
        );
    }
}

//! Working tree status as three buckets of entries
//!
//! Built from `git status --porcelain=v2 -z`. A path changed in both the
//! index and the worktree shows up once in `staged` and once in `modified`.
//! Untracked files that share a top-level directory with at least one
//! sibling are folded into a collapsible folder entry.

use gitpane_vcs::parse::parse_numstat;
use gitpane_vcs::{FileStatus, NumstatEntry};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusParseError {
    #[error("malformed status record: {0:?}")]
    Malformed(String),
    #[error("rename record without original path: {0:?}")]
    MissingOrigPath(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Staged,
    Modified,
    Untracked,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Staged, Bucket::Modified, Bucket::Untracked];

    pub fn title(self) -> &'static str {
        match self {
            Bucket::Staged => "Staged",
            Bucket::Modified => "Modified",
            Bucket::Untracked => "Untracked",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub additions: u32,
    pub deletions: u32,
}

impl DiffStats {
    pub fn is_empty(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Repository-relative path; folders end with `/`
    pub path: String,
    pub old_path: Option<String>,
    pub status: FileStatus,
    pub staged: bool,
    pub unstaged: bool,
    pub is_folder: bool,
    pub is_expanded: bool,
    pub diff_stats: DiffStats,
    pub children: Vec<FileEntry>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            status,
            staged: false,
            unstaged: false,
            is_folder: false,
            is_expanded: false,
            diff_stats: DiffStats::default(),
            children: Vec::new(),
        }
    }

    fn folder(path: String, children: Vec<FileEntry>) -> Self {
        let diff_stats = DiffStats {
            additions: children.iter().map(|c| c.diff_stats.additions).sum(),
            deletions: children.iter().map(|c| c.diff_stats.deletions).sum(),
        };
        Self {
            is_folder: true,
            diff_stats,
            children,
            ..Self::new(path, FileStatus::Untracked)
        }
    }

    /// Paths a stage/unstage of this entry applies to
    pub fn paths(&self) -> Vec<String> {
        if self.is_folder {
            self.children.iter().map(|c| c.path.clone()).collect()
        } else {
            vec![self.path.clone()]
        }
    }

    /// Last path component, folders keep their trailing slash
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        let start = trimmed.rfind('/').map(|i| i + 1).unwrap_or(0);
        &self.path[start..]
    }
}

/// A row of the flattened file list
#[derive(Debug, Clone, Copy)]
pub struct EntryRef<'a> {
    pub bucket: Bucket,
    pub entry: &'a FileEntry,
    /// 1 for children of an expanded folder
    pub depth: usize,
}

impl EntryRef<'_> {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            bucket: self.bucket,
            path: self.entry.path.clone(),
        }
    }
}

/// Identity of a row across refreshes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub bucket: Bucket,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    pub staged: Vec<FileEntry>,
    pub modified: Vec<FileEntry>,
    pub untracked: Vec<FileEntry>,
}

impl FileTree {
    pub fn bucket(&self, bucket: Bucket) -> &[FileEntry] {
        match bucket {
            Bucket::Staged => &self.staged,
            Bucket::Modified => &self.modified,
            Bucket::Untracked => &self.untracked,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<FileEntry> {
        match bucket {
            Bucket::Staged => &mut self.staged,
            Bucket::Modified => &mut self.modified,
            Bucket::Untracked => &mut self.untracked,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.untracked.is_empty()
    }

    /// Staged, modified and untracked entries in that order, expanded
    /// folders followed by their children
    pub fn all_entries(&self) -> Vec<EntryRef<'_>> {
        let mut out = Vec::new();
        for bucket in Bucket::ALL {
            for entry in self.bucket(bucket) {
                out.push(EntryRef {
                    bucket,
                    entry,
                    depth: 0,
                });
                if entry.is_folder && entry.is_expanded {
                    out.extend(entry.children.iter().map(|child| EntryRef {
                        bucket,
                        entry: child,
                        depth: 1,
                    }));
                }
            }
        }
        out
    }

    /// Number of selectable rows
    pub fn len(&self) -> usize {
        Bucket::ALL
            .iter()
            .flat_map(|b| self.bucket(*b))
            .map(|e| {
                if e.is_folder && e.is_expanded {
                    1 + e.children.len()
                } else {
                    1
                }
            })
            .sum()
    }

    /// Index of the first row of `bucket`, or where it would start
    pub fn bucket_start(&self, bucket: Bucket) -> usize {
        self.all_entries()
            .iter()
            .position(|r| r.bucket >= bucket)
            .unwrap_or_else(|| self.len())
    }

    pub fn position(&self, key: &EntryKey) -> Option<usize> {
        self.all_entries()
            .iter()
            .position(|r| r.bucket == key.bucket && r.entry.path == key.path)
    }

    /// e.g. "2 staged, 3 modified"
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            (self.staged.len(), "staged"),
            (self.modified.len(), "modified"),
            (self.untracked_file_count(), "untracked"),
        ]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", n, label))
        .collect();
        if parts.is_empty() {
            "clean".to_string()
        } else {
            parts.join(", ")
        }
    }

    pub fn untracked_file_count(&self) -> usize {
        self.untracked
            .iter()
            .map(|e| if e.is_folder { e.children.len() } else { 1 })
            .sum()
    }

    /// Flip an untracked folder open or closed. Returns false if no such folder.
    pub fn toggle_folder(&mut self, path: &str) -> bool {
        match self
            .untracked
            .iter_mut()
            .find(|e| e.is_folder && e.path == path)
        {
            Some(folder) => {
                folder.is_expanded = !folder.is_expanded;
                true
            }
            None => false,
        }
    }

    /// Paths of folders currently expanded
    pub fn expanded_folders(&self) -> HashSet<String> {
        self.untracked
            .iter()
            .filter(|e| e.is_folder && e.is_expanded)
            .map(|e| e.path.clone())
            .collect()
    }

    /// Swap in a freshly built tree, keeping folders open that were open
    pub fn replace(&mut self, mut fresh: FileTree) {
        let expanded = self.expanded_folders();
        for folder in fresh.untracked.iter_mut().filter(|e| e.is_folder) {
            folder.is_expanded = expanded.contains(&folder.path);
        }
        *self = fresh;
    }

    /// Fill `diff_stats` from staged and unstaged `--numstat` output
    pub fn attach_diff_stats(&mut self, staged_numstat: &str, unstaged_numstat: &str) {
        let staged = parse_numstat(staged_numstat);
        let unstaged = parse_numstat(unstaged_numstat);
        for entry in self.staged.iter_mut() {
            entry.diff_stats = lookup_stats(&staged, &entry.path);
        }
        for entry in self.modified.iter_mut() {
            entry.diff_stats = lookup_stats(&unstaged, &entry.path);
        }
    }

    /// Fold untracked files sharing a top-level directory into folders
    pub fn group_untracked_folders(&mut self) {
        let mut groups: BTreeMap<String, Vec<FileEntry>> = BTreeMap::new();
        let mut standalone = Vec::new();
        for entry in std::mem::take(&mut self.untracked) {
            if entry.is_folder {
                standalone.push(entry);
                continue;
            }
            match entry.path.split_once('/') {
                Some((dir, _)) => groups.entry(format!("{}/", dir)).or_default().push(entry),
                None => standalone.push(entry),
            }
        }
        for (dir, mut files) in groups {
            if files.len() >= 2 {
                files.sort_by(|a, b| a.path.cmp(&b.path));
                standalone.push(FileEntry::folder(dir, files));
            } else {
                standalone.extend(files);
            }
        }
        self.untracked = standalone;
        self.sort();
    }

    pub fn sort(&mut self) {
        for bucket in Bucket::ALL {
            self.bucket_mut(bucket).sort_by(|a, b| a.path.cmp(&b.path));
        }
    }
}

fn lookup_stats(stats: &[NumstatEntry], path: &str) -> DiffStats {
    let found = stats.iter().find(|s| s.path == path).or_else(|| {
        let name = basename(path);
        stats.iter().find(|s| basename(&s.path) == name)
    });
    found
        .map(|s| DiffStats {
            additions: s.additions,
            deletions: s.deletions,
        })
        .unwrap_or_default()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Parse `git status --porcelain=v2 -z` into a sorted tree.
///
/// Diff stats are left empty and untracked files are not grouped; see
/// [`FileTree::attach_diff_stats`] and [`FileTree::group_untracked_folders`].
pub fn parse_status(raw: &[u8]) -> Result<FileTree, StatusParseError> {
    let text = String::from_utf8_lossy(raw);
    let mut fields = text.split('\0').filter(|f| !f.is_empty());
    let mut tree = FileTree::default();

    while let Some(record) = fields.next() {
        let kind = record.as_bytes()[0];
        match kind {
            b'#' | b'!' => {}
            b'?' => {
                let path = record
                    .strip_prefix("? ")
                    .ok_or_else(|| StatusParseError::Malformed(record.to_string()))?;
                tree.untracked
                    .push(FileEntry::new(path, FileStatus::Untracked));
            }
            b'1' => {
                let parts: Vec<&str> = record.splitn(9, ' ').collect();
                let [_, xy, _, _, _, _, _, _, path] = parts[..] else {
                    return Err(StatusParseError::Malformed(record.to_string()));
                };
                push_changed(&mut tree, xy, path, None, record)?;
            }
            b'2' => {
                let parts: Vec<&str> = record.splitn(10, ' ').collect();
                let [_, xy, _, _, _, _, _, _, _, path] = parts[..] else {
                    return Err(StatusParseError::Malformed(record.to_string()));
                };
                let orig = fields
                    .next()
                    .ok_or_else(|| StatusParseError::MissingOrigPath(record.to_string()))?;
                push_changed(&mut tree, xy, path, Some(orig), record)?;
            }
            b'u' => {
                let parts: Vec<&str> = record.splitn(11, ' ').collect();
                let [_, _, _, _, _, _, _, _, _, _, path] = parts[..] else {
                    return Err(StatusParseError::Malformed(record.to_string()));
                };
                let mut entry = FileEntry::new(path, FileStatus::Unmerged);
                entry.unstaged = true;
                tree.modified.push(entry);
            }
            _ => return Err(StatusParseError::Malformed(record.to_string())),
        }
    }

    tree.sort();
    Ok(tree)
}

fn push_changed(
    tree: &mut FileTree,
    xy: &str,
    path: &str,
    orig: Option<&str>,
    record: &str,
) -> Result<(), StatusParseError> {
    let mut codes = xy.chars();
    let (Some(index), Some(worktree)) = (codes.next(), codes.next()) else {
        return Err(StatusParseError::Malformed(record.to_string()));
    };

    if let Some(status) = FileStatus::from_code(index).filter(|_| index != '?') {
        let mut entry = FileEntry::new(path, status);
        entry.old_path = orig.map(str::to_string);
        entry.staged = true;
        entry.unstaged = worktree != '.';
        tree.staged.push(entry);
    }
    if let Some(status) = FileStatus::from_code(worktree).filter(|_| worktree != '?') {
        let mut entry = FileEntry::new(path, status);
        entry.staged = index != '.';
        entry.unstaged = true;
        tree.modified.push(entry);
    }
    Ok(())
}

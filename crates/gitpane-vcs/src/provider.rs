//! Version control provider trait
//!
//! The status view never talks to git directly. Every read and every
//! mutation goes through this trait, called from a worker thread, so the
//! view can be exercised in tests with an in-memory implementation.

use crate::error::Result;
use crate::types::{
    Branch, Commit, CommitFilter, FileStatus, PushStatus, PushVariant, StashList,
};
use std::path::{Path, PathBuf};

/// Synchronous access to a working repository
///
/// All methods block; the host runs them off the event-loop thread.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one provider can be shared by
/// every worker.
pub trait VcsProvider: Send + Sync {
    /// Top-level directory of the repository containing `work_dir`.
    fn repo_root(&self, work_dir: &Path) -> Result<PathBuf>;

    // === Working tree ===

    /// Raw `status --porcelain=v2 -z` output.
    fn status_porcelain_v2_z(&self, work_dir: &Path) -> Result<Vec<u8>>;

    /// `diff --numstat` against the index (`staged`) or the worktree.
    fn diff_numstat(&self, work_dir: &Path, staged: bool) -> Result<String>;

    /// Unified diff of one path. Untracked files diff against `/dev/null`.
    fn diff_unified(
        &self,
        work_dir: &Path,
        path: &str,
        staged: bool,
        status: FileStatus,
    ) -> Result<String>;

    fn stage(&self, work_dir: &Path, paths: &[String]) -> Result<()>;

    fn unstage(&self, work_dir: &Path, paths: &[String]) -> Result<()>;

    fn stage_all(&self, work_dir: &Path) -> Result<()>;

    /// Drop unstaged changes to `path`.
    fn discard_modified(&self, work_dir: &Path, path: &str) -> Result<()>;

    /// Drop staged and unstaged changes to `path`, restoring `HEAD`.
    fn discard_staged(&self, work_dir: &Path, path: &str, status: FileStatus) -> Result<()>;

    /// Delete an untracked file.
    fn discard_untracked(&self, work_dir: &Path, path: &str) -> Result<()>;

    // === History ===

    /// Up to `limit` commits, newest first, strictly older than `before`.
    fn recent_commits(
        &self,
        work_dir: &Path,
        limit: usize,
        before: Option<&str>,
        filter: &CommitFilter,
    ) -> Result<Vec<Commit>>;

    /// A commit with its file list and stats.
    fn commit_detail(&self, work_dir: &Path, hash: &str) -> Result<Commit>;

    /// Diff of `path` in commit `hash` against `parent` (or the empty tree).
    fn diff_for_commit(
        &self,
        work_dir: &Path,
        hash: &str,
        path: &str,
        parent: Option<&str>,
    ) -> Result<String>;

    /// Create a commit, returning its short hash.
    fn commit(&self, work_dir: &Path, message: &str, amend: bool) -> Result<String>;

    // === Remotes ===

    fn push_status(&self, work_dir: &Path) -> Result<PushStatus>;

    /// Push and return git's output.
    fn push(&self, work_dir: &Path, variant: PushVariant) -> Result<String>;

    fn fetch(&self, work_dir: &Path) -> Result<String>;

    fn pull(&self, work_dir: &Path) -> Result<String>;

    /// URL of the named remote.
    fn remote_url(&self, work_dir: &Path, remote: &str) -> Result<String>;

    // === Branches ===

    fn branches(&self, work_dir: &Path) -> Result<Vec<Branch>>;

    fn checkout(&self, work_dir: &Path, name: &str) -> Result<()>;

    // === Stashes ===

    fn stash_list(&self, work_dir: &Path) -> Result<StashList>;

    /// Stash tracked and untracked changes, returning the new stash ref.
    fn stash_push(&self, work_dir: &Path, message: Option<&str>) -> Result<String>;

    fn stash_pop(&self, work_dir: &Path, stash_ref: &str) -> Result<()>;

    fn stash_apply(&self, work_dir: &Path, stash_ref: &str) -> Result<()>;

    fn stash_drop(&self, work_dir: &Path, stash_ref: &str) -> Result<()>;
}

//! Resolves view commands into completion messages
//!
//! Provider calls are synchronous, so each command runs on tokio's
//! blocking pool and dispatches exactly one [`Msg`] when it finishes.
//! Timers run as plain async tasks.

use crate::browser;
use anyhow::{Context, Result};
use crate::clipboard::Clipboard;
use crate::command::{Command, DiffSource, DiscardTarget};
use crate::dispatcher::Dispatcher;
use crate::model::{parse_status, FileTree};
use crate::msg::{DiffPayload, Msg, StashOperation};
use gitpane_config::PreferenceStore;
use gitpane_diff::{
    annotate_word_diff, ansi_to_lines, parse_unified_diff, render_external, ExternalDiffTool,
    ToolMode,
};
use gitpane_vcs::{CommitFilter, PushStatus, StashList, VcsProvider};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

/// Everything a command needs, shared by all workers
pub struct Services {
    pub vcs: Arc<dyn VcsProvider>,
    pub work_dir: PathBuf,
    pub page_size: usize,
    pub tool_mode: ToolMode,
    pub tool: Arc<dyn ExternalDiffTool>,
    pub clipboard: Arc<dyn Clipboard>,
    pub preferences: Arc<dyn PreferenceStore>,
    /// Filesystem events; `None` when watching is off
    pub watch_rx: Option<Mutex<Receiver<()>>>,
}

pub struct Executor {
    runtime: Runtime,
    services: Arc<Services>,
    dispatcher: Dispatcher,
}

impl Executor {
    pub fn new(services: Services, dispatcher: Dispatcher) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        Ok(Self {
            runtime,
            services: Arc::new(services),
            dispatcher,
        })
    }

    /// Start a command in the background
    pub fn execute(&self, command: Command) {
        log::debug!("Executing {}", command.name());
        let dispatcher = self.dispatcher.clone();
        let services = Arc::clone(&self.services);

        match command {
            Command::ScheduleClear {
                indicator,
                generation,
            } => {
                self.runtime.spawn(async move {
                    tokio::time::sleep(crate::command::INDICATOR_TTL).await;
                    dispatcher.dispatch(Msg::ClearIndicator {
                        indicator,
                        generation,
                    });
                });
            }
            Command::OpenCommitInBrowser { hash } => {
                self.runtime.spawn(async move {
                    let resolved = tokio::task::spawn_blocking(move || {
                        services.commit_url(&hash)
                    })
                    .await;
                    let msg = match resolved {
                        Ok(Ok(url)) => match browser::open_url(&url).await {
                            Ok(()) => Msg::BrowserOpened { url },
                            Err(e) => {
                                Msg::BrowserFailed(format!("Could not open browser: {}", e))
                            }
                        },
                        Ok(Err(error)) => Msg::BrowserFailed(error),
                        Err(e) => Msg::BrowserFailed(e.to_string()),
                    };
                    dispatcher.dispatch(msg);
                });
            }
            Command::FocusPlugin { path } => {
                let target = services.work_dir.join(&path);
                let folder = match target.parent() {
                    Some(parent) if !target.is_dir() => parent.to_path_buf(),
                    _ => target,
                };
                self.runtime.spawn(async move {
                    let url = folder.display().to_string();
                    let msg = match browser::open_url(&url).await {
                        Ok(()) => Msg::BrowserOpened { url },
                        Err(e) => Msg::BrowserFailed(format!("Could not open {}: {}", url, e)),
                    };
                    dispatcher.dispatch(msg);
                });
            }
            Command::OpenFile { .. } | Command::Toast(_) => {
                log::warn!("Host command {} reached the executor", command.name());
            }
            command => {
                self.runtime.spawn_blocking(move || {
                    if let Some(msg) = services.run(command) {
                        dispatcher.dispatch(msg);
                    }
                });
            }
        }
    }

    /// Stop the runtime without waiting on a parked watch task
    pub fn shutdown(self) {
        self.runtime.shutdown_timeout(Duration::from_millis(500));
    }
}

impl Services {
    /// Run a blocking command to completion
    pub fn run(&self, command: Command) -> Option<Msg> {
        let vcs = self.vcs.as_ref();
        let dir = self.work_dir.as_path();

        let msg = match command {
            Command::Refresh => match self.load_status() {
                Ok((tree, push_status, stashes)) => Msg::StatusLoaded {
                    tree,
                    push_status,
                    stashes,
                },
                Err(error) => Msg::RefreshError(error),
            },
            Command::LoadRecentCommits => {
                match vcs.recent_commits(dir, self.page_size, None, &CommitFilter::default()) {
                    Ok(commits) => Msg::RecentCommitsLoaded {
                        commits,
                        push_status: self.push_status(),
                    },
                    Err(e) => Msg::RecentCommitsError(e.output()),
                }
            }
            Command::LoadMoreCommits { before, filter } => {
                match vcs.recent_commits(dir, self.page_size, Some(&before), &filter) {
                    Ok(commits) => Msg::MoreCommitsLoaded { filter, commits },
                    Err(e) => Msg::MoreCommitsError(e.output()),
                }
            }
            Command::LoadFilteredCommits { filter } => {
                match vcs.recent_commits(dir, self.page_size, None, &filter) {
                    Ok(commits) => Msg::FilteredCommitsLoaded { filter, commits },
                    Err(e) => Msg::FilteredCommitsError(e.output()),
                }
            }
            Command::LoadInlineDiff {
                source,
                width,
                side_by_side,
            } => Msg::InlineDiffLoaded(self.load_diff(source, width, side_by_side)),
            Command::LoadFullDiff {
                source,
                width,
                side_by_side,
            } => Msg::FullDiffLoaded(self.load_diff(source, width, side_by_side)),
            Command::LoadCommitPreview { hash } => match vcs.commit_detail(dir, &hash) {
                Ok(commit) => Msg::CommitPreviewLoaded { commit },
                Err(e) => Msg::CommitPreviewError {
                    hash,
                    error: e.output(),
                },
            },

            Command::Stage { paths } => operation(
                vcs.stage(dir, &paths),
                format!("Staged {}", paths.join(", ")),
            ),
            Command::Unstage { paths } => operation(
                vcs.unstage(dir, &paths),
                format!("Unstaged {}", paths.join(", ")),
            ),
            Command::StageAll => operation(vcs.stage_all(dir), "Staged all changes".into()),
            Command::Discard { target } => {
                let result = match &target {
                    DiscardTarget::Modified { path } => vcs.discard_modified(dir, path),
                    DiscardTarget::Staged { path, status } => {
                        vcs.discard_staged(dir, path, *status)
                    }
                    DiscardTarget::Untracked { path } => vcs.discard_untracked(dir, path),
                };
                operation(result, format!("Discarded {}", target.path()))
            }
            Command::Commit { message, amend } => match vcs.commit(dir, &message, amend) {
                Ok(short_hash) => Msg::CommitSuccess { short_hash },
                Err(e) => Msg::CommitError(e.output()),
            },
            Command::Push(variant) => match vcs.push(dir, variant) {
                Ok(output) => Msg::PushSuccess { output },
                Err(e) => Msg::PushError(e.output()),
            },
            Command::Fetch => match vcs.fetch(dir) {
                Ok(output) => Msg::FetchSuccess { output },
                Err(e) => Msg::FetchError(e.output()),
            },
            Command::Pull => match vcs.pull(dir) {
                Ok(output) => Msg::PullSuccess { output },
                Err(e) => Msg::PullError(e.output()),
            },
            Command::StashPush => match vcs.stash_push(dir, None) {
                Ok(stash_ref) => Msg::StashResult {
                    operation: StashOperation::Push,
                    stash_ref: Some(stash_ref),
                    error: None,
                },
                Err(e) => Msg::StashResult {
                    operation: StashOperation::Push,
                    stash_ref: None,
                    error: Some(e.output()),
                },
            },
            Command::StashPop { stash_ref } => {
                let error = vcs.stash_pop(dir, &stash_ref).err().map(|e| e.output());
                Msg::StashResult {
                    operation: StashOperation::Pop,
                    stash_ref: Some(stash_ref),
                    error,
                }
            }
            Command::LoadBranches => match vcs.branches(dir) {
                Ok(branches) => Msg::BranchesLoaded(branches),
                Err(e) => Msg::BranchesError(e.output()),
            },
            Command::Checkout { name } => match vcs.checkout(dir, &name) {
                Ok(()) => Msg::CheckoutSuccess { name },
                Err(e) => Msg::CheckoutError(e.output()),
            },

            Command::WatchNext => self.next_watch_event()?,
            Command::CopyToClipboard { text, label } => match self.clipboard.set_text(&text) {
                Ok(()) => Msg::Copied { label },
                Err(e) => Msg::ClipboardFailed(e.to_string()),
            },
            Command::SavePreferences(preferences) => match self.preferences.save(&preferences) {
                Ok(()) => Msg::PreferencesSaved,
                Err(e) => Msg::PreferencesFailed(format!("{:#}", e)),
            },

            Command::ScheduleClear { .. }
            | Command::OpenCommitInBrowser { .. }
            | Command::OpenFile { .. }
            | Command::FocusPlugin { .. }
            | Command::Toast(_) => {
                log::warn!("{} cannot run on a worker", command.name());
                return None;
            }
        };
        Some(msg)
    }

    /// Status, diff stats, push status and stashes in one tree
    fn load_status(&self) -> Result<(FileTree, Option<PushStatus>, StashList), String> {
        let dir = self.work_dir.as_path();
        let raw = self.vcs.status_porcelain_v2_z(dir).map_err(|e| e.output())?;
        let mut tree = parse_status(&raw).map_err(|e| e.to_string())?;

        let numstat = |staged: bool| {
            self.vcs.diff_numstat(dir, staged).unwrap_or_else(|e| {
                log::warn!("diff --numstat failed: {}", e);
                String::new()
            })
        };
        tree.attach_diff_stats(&numstat(true), &numstat(false));
        tree.group_untracked_folders();

        let stashes = self.vcs.stash_list(dir).unwrap_or_else(|e| {
            log::warn!("Listing stashes failed: {}", e);
            StashList::default()
        });
        Ok((tree, self.push_status(), stashes))
    }

    fn push_status(&self) -> Option<PushStatus> {
        self.vcs
            .push_status(&self.work_dir)
            .map_err(|e| log::warn!("Reading push status failed: {}", e))
            .ok()
    }

    fn load_diff(&self, source: DiffSource, width: u16, side_by_side: bool) -> DiffPayload {
        let dir = self.work_dir.as_path();
        let raw = match &source {
            DiffSource::WorkingTree {
                path,
                staged,
                status,
            } => self.vcs.diff_unified(dir, path, *staged, *status),
            DiffSource::Commit { hash, path, parent } => {
                self.vcs.diff_for_commit(dir, hash, path, parent.as_deref())
            }
        };
        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => return DiffPayload::failed(source, e.output()),
        };
        if raw.trim().is_empty() {
            return DiffPayload {
                source,
                diff: None,
                external: None,
                error: None,
            };
        }

        let mut diff = match parse_unified_diff(&raw) {
            Ok(diff) => diff,
            Err(e) => {
                log::warn!("Could not parse diff for {}: {}", source.path(), e);
                return DiffPayload::failed(source, format!("Could not parse diff: {}", e));
            }
        };
        annotate_word_diff(&mut diff);

        let external = if diff.binary {
            None
        } else {
            render_external(self.tool_mode, self.tool.as_ref(), &raw, side_by_side, width)
                .map(|output| ansi_to_lines(&output))
        };
        DiffPayload {
            source,
            diff: Some(diff),
            external,
            error: None,
        }
    }

    /// Block until the watcher reports a change, folding queued events into it
    fn next_watch_event(&self) -> Option<Msg> {
        let Some(watch_rx) = &self.watch_rx else {
            return Some(Msg::WatcherStopped);
        };
        let Ok(rx) = watch_rx.lock() else {
            log::error!("Watch receiver lock poisoned");
            return Some(Msg::WatcherStopped);
        };
        match rx.recv() {
            Ok(()) => {
                while rx.try_recv().is_ok() {}
                Some(Msg::WatchEvent { at: Instant::now() })
            }
            Err(_) => Some(Msg::WatcherStopped),
        }
    }

    fn commit_url(&self, hash: &str) -> Result<String, String> {
        let remote = self
            .vcs
            .remote_url(&self.work_dir, "origin")
            .map_err(|e| format!("No origin remote: {}", e.output()))?;
        browser::commit_url(&remote, hash)
            .ok_or_else(|| format!("Cannot build a web URL from {}", remote.trim()))
    }
}

fn operation(result: gitpane_vcs::Result<()>, label: String) -> Msg {
    match result {
        Ok(()) => Msg::OperationDone { label },
        Err(e) => Msg::OperationError(e.output()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::model::Bucket;
    use gitpane_config::MemoryPreferenceStore;
    use gitpane_diff::ExternalToolError;
    use gitpane_vcs::{
        Branch, Commit, FileStatus, PushVariant, Result as VcsResult, Stash, VcsError,
    };
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::mpsc;

    const DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,2 +1,2 @@
 fn main() {
-    old();
+    new();
";

    fn failed<T>(args: &str) -> VcsResult<T> {
        Err(VcsError::CommandFailed {
            args: args.into(),
            code: Some(1),
            output: format!("{} went wrong\n", args),
        })
    }

    /// Canned provider; `fail_remote` makes push, fetch and pull fail
    #[derive(Default)]
    struct FakeVcs {
        fail_remote: bool,
        staged: Mutex<Vec<String>>,
    }

    impl VcsProvider for FakeVcs {
        fn repo_root(&self, work_dir: &Path) -> VcsResult<PathBuf> {
            Ok(work_dir.to_path_buf())
        }

        fn status_porcelain_v2_z(&self, _: &Path) -> VcsResult<Vec<u8>> {
            let mut raw = String::new();
            raw.push_str("1 M. N... 100644 100644 100644 abc def src/lib.rs\0");
            raw.push_str("1 .M N... 100644 100644 100644 abc def README.md\0");
            raw.push_str("? notes/a.txt\0? notes/b.txt\0");
            Ok(raw.into_bytes())
        }

        fn diff_numstat(&self, _: &Path, staged: bool) -> VcsResult<String> {
            Ok(if staged {
                "3\t1\tsrc/lib.rs\n".into()
            } else {
                "1\t0\tREADME.md\n".into()
            })
        }

        fn diff_unified(&self, _: &Path, path: &str, _: bool, _: FileStatus) -> VcsResult<String> {
            match path {
                "src/lib.rs" => Ok(DIFF.into()),
                "empty.txt" => Ok(String::new()),
                _ => failed("diff"),
            }
        }

        fn stage(&self, _: &Path, paths: &[String]) -> VcsResult<()> {
            if let Ok(mut staged) = self.staged.lock() {
                staged.extend(paths.iter().cloned());
            }
            Ok(())
        }

        fn unstage(&self, _: &Path, _: &[String]) -> VcsResult<()> {
            Ok(())
        }

        fn stage_all(&self, _: &Path) -> VcsResult<()> {
            Ok(())
        }

        fn discard_modified(&self, _: &Path, _: &str) -> VcsResult<()> {
            failed("checkout")
        }

        fn discard_staged(&self, _: &Path, _: &str, _: FileStatus) -> VcsResult<()> {
            Ok(())
        }

        fn discard_untracked(&self, _: &Path, _: &str) -> VcsResult<()> {
            Ok(())
        }

        fn recent_commits(
            &self,
            _: &Path,
            limit: usize,
            before: Option<&str>,
            filter: &CommitFilter,
        ) -> VcsResult<Vec<Commit>> {
            let commits = match (before, &filter.author) {
                (Some(_), _) => vec![Commit::new("c0", "older")],
                (None, Some(author)) => vec![Commit::new("a1", format!("by {}", author))],
                (None, None) => vec![Commit::new("c2", "second"), Commit::new("c1", "first")],
            };
            Ok(commits.into_iter().take(limit).collect())
        }

        fn commit_detail(&self, _: &Path, hash: &str) -> VcsResult<Commit> {
            if hash == "missing" {
                return failed("show");
            }
            Ok(Commit::new(hash, "detail"))
        }

        fn diff_for_commit(
            &self,
            _: &Path,
            _: &str,
            _: &str,
            _: Option<&str>,
        ) -> VcsResult<String> {
            Ok(DIFF.into())
        }

        fn commit(&self, _: &Path, message: &str, _: bool) -> VcsResult<String> {
            if message.trim().is_empty() {
                return failed("commit");
            }
            Ok("abc1234".into())
        }

        fn push_status(&self, _: &Path) -> VcsResult<PushStatus> {
            Ok(PushStatus {
                current_branch: "main".into(),
                ..PushStatus::default()
            })
        }

        fn push(&self, _: &Path, _: PushVariant) -> VcsResult<String> {
            if self.fail_remote {
                return failed("push");
            }
            Ok("pushed".into())
        }

        fn fetch(&self, _: &Path) -> VcsResult<String> {
            if self.fail_remote {
                return failed("fetch");
            }
            Ok(String::new())
        }

        fn pull(&self, _: &Path) -> VcsResult<String> {
            if self.fail_remote {
                return failed("pull");
            }
            Ok("Already up to date.".into())
        }

        fn remote_url(&self, _: &Path, _: &str) -> VcsResult<String> {
            Ok("git@github.com:owner/repo.git\n".into())
        }

        fn branches(&self, _: &Path) -> VcsResult<Vec<Branch>> {
            Ok(vec![Branch::new("main")])
        }

        fn checkout(&self, _: &Path, name: &str) -> VcsResult<()> {
            if name == "locked" {
                return failed("checkout");
            }
            Ok(())
        }

        fn stash_list(&self, _: &Path) -> VcsResult<StashList> {
            Ok(StashList {
                stashes: vec![Stash {
                    index: 0,
                    stash_ref: "stash@{0}".into(),
                    branch: "main".into(),
                    message: "WIP".into(),
                }],
            })
        }

        fn stash_push(&self, _: &Path, _: Option<&str>) -> VcsResult<String> {
            Ok("stash@{0}".into())
        }

        fn stash_pop(&self, _: &Path, _: &str) -> VcsResult<()> {
            failed("stash pop")
        }

        fn stash_apply(&self, _: &Path, _: &str) -> VcsResult<()> {
            Ok(())
        }

        fn stash_drop(&self, _: &Path, _: &str) -> VcsResult<()> {
            Ok(())
        }
    }

    struct FakeTool {
        available: bool,
    }

    impl ExternalDiffTool for FakeTool {
        fn available(&self) -> bool {
            self.available
        }

        fn render(&self, _: &str, _: bool, _: u16) -> Result<String, ExternalToolError> {
            Ok("\x1b[?1049h\x1b[32m+    new();\x1b[0m\n".into())
        }
    }

    struct FailingClipboard;

    impl Clipboard for FailingClipboard {
        fn set_text(&self, _: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Write(arboard::Error::ContentNotAvailable))
        }
    }

    fn services(vcs: FakeVcs, tool_mode: ToolMode) -> Services {
        Services {
            vcs: Arc::new(vcs),
            work_dir: PathBuf::from("/repo"),
            page_size: 50,
            tool_mode,
            tool: Arc::new(FakeTool { available: true }),
            clipboard: Arc::new(FailingClipboard),
            preferences: Arc::new(MemoryPreferenceStore::default()),
            watch_rx: None,
        }
    }

    fn working_tree(path: &str) -> DiffSource {
        DiffSource::WorkingTree {
            path: path.into(),
            staged: true,
            status: FileStatus::Modified,
        }
    }

    #[test]
    fn test_refresh_builds_tree_with_stats_and_stashes() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        let Some(Msg::StatusLoaded {
            tree,
            push_status,
            stashes,
        }) = services.run(Command::Refresh)
        else {
            panic!("expected StatusLoaded");
        };

        assert_eq!(tree.bucket(Bucket::Staged)[0].diff_stats.additions, 3);
        assert_eq!(tree.bucket(Bucket::Modified)[0].diff_stats.additions, 1);
        let untracked = tree.bucket(Bucket::Untracked);
        assert_eq!(untracked.len(), 1);
        assert!(untracked[0].is_folder);
        assert_eq!(push_status.map(|s| s.current_branch), Some("main".to_string()));
        assert_eq!(stashes.count(), 1);
    }

    #[test]
    fn test_builtin_diff_is_parsed() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        let msg = services.run(Command::LoadInlineDiff {
            source: working_tree("src/lib.rs"),
            width: 80,
            side_by_side: false,
        });
        let Some(Msg::InlineDiffLoaded(payload)) = msg else {
            panic!("expected InlineDiffLoaded");
        };
        let diff = payload.diff.expect("parsed diff");
        assert_eq!((diff.additions(), diff.deletions()), (1, 1));
        assert_eq!(payload.external, None);
        assert_eq!(payload.error, None);
    }

    #[test]
    fn test_external_output_is_sanitised() {
        let services = services(FakeVcs::default(), ToolMode::Auto);
        let Some(Msg::FullDiffLoaded(payload)) = services.run(Command::LoadFullDiff {
            source: working_tree("src/lib.rs"),
            width: 80,
            side_by_side: true,
        }) else {
            panic!("expected FullDiffLoaded");
        };
        let lines = payload.external.expect("external output");
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "+    new();");
    }

    #[test]
    fn test_empty_and_failed_diffs() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        let Some(Msg::InlineDiffLoaded(empty)) = services.run(Command::LoadInlineDiff {
            source: working_tree("empty.txt"),
            width: 80,
            side_by_side: false,
        }) else {
            panic!("expected InlineDiffLoaded");
        };
        assert_eq!(empty.diff, None);
        assert_eq!(empty.error, None);

        let Some(Msg::InlineDiffLoaded(failed)) = services.run(Command::LoadInlineDiff {
            source: working_tree("other.rs"),
            width: 80,
            side_by_side: false,
        }) else {
            panic!("expected InlineDiffLoaded");
        };
        assert_eq!(failed.error, Some("diff went wrong".to_string()));
    }

    #[test]
    fn test_remote_results_carry_git_output() {
        let ok = services(FakeVcs::default(), ToolMode::Builtin);
        assert_eq!(
            ok.run(Command::Push(PushVariant::Plain)),
            Some(Msg::PushSuccess {
                output: "pushed".into()
            })
        );

        let failing = services(
            FakeVcs {
                fail_remote: true,
                ..FakeVcs::default()
            },
            ToolMode::Builtin,
        );
        assert_eq!(
            failing.run(Command::Push(PushVariant::ForceWithLease)),
            Some(Msg::PushError("push went wrong".into()))
        );
        assert_eq!(
            failing.run(Command::Fetch),
            Some(Msg::FetchError("fetch went wrong".into()))
        );
        assert_eq!(
            failing.run(Command::Pull),
            Some(Msg::PullError("pull went wrong".into()))
        );
    }

    #[test]
    fn test_mutations() {
        let vcs = Arc::new(FakeVcs::default());
        let shared: Arc<dyn VcsProvider> = vcs.clone();
        let mut services = services(FakeVcs::default(), ToolMode::Builtin);
        services.vcs = shared;

        assert_eq!(
            services.run(Command::Stage {
                paths: vec!["a.rs".into(), "b.rs".into()]
            }),
            Some(Msg::OperationDone {
                label: "Staged a.rs, b.rs".into()
            })
        );
        assert_eq!(*vcs.staged.lock().unwrap(), vec!["a.rs", "b.rs"]);

        assert_eq!(
            services.run(Command::Discard {
                target: DiscardTarget::Modified {
                    path: "a.rs".into()
                }
            }),
            Some(Msg::OperationError("checkout went wrong".into()))
        );
        assert_eq!(
            services.run(Command::Commit {
                message: "Add feature".into(),
                amend: false
            }),
            Some(Msg::CommitSuccess {
                short_hash: "abc1234".into()
            })
        );
        assert_eq!(
            services.run(Command::Commit {
                message: "  ".into(),
                amend: true
            }),
            Some(Msg::CommitError("commit went wrong".into()))
        );
    }

    #[test]
    fn test_stash_results() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        assert_eq!(
            services.run(Command::StashPush),
            Some(Msg::StashResult {
                operation: StashOperation::Push,
                stash_ref: Some("stash@{0}".into()),
                error: None,
            })
        );
        assert_eq!(
            services.run(Command::StashPop {
                stash_ref: "stash@{0}".into()
            }),
            Some(Msg::StashResult {
                operation: StashOperation::Pop,
                stash_ref: Some("stash@{0}".into()),
                error: Some("stash pop went wrong".into()),
            })
        );
    }

    #[test]
    fn test_commit_pages_and_filters() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        let Some(Msg::RecentCommitsLoaded {
            commits,
            push_status,
        }) = services.run(Command::LoadRecentCommits)
        else {
            panic!("expected RecentCommitsLoaded");
        };
        assert_eq!(commits.len(), 2);
        assert!(push_status.is_some());

        let filter = CommitFilter {
            author: Some("ada".into()),
            path: None,
        };
        let Some(Msg::FilteredCommitsLoaded {
            filter: echoed,
            commits,
        }) = services.run(Command::LoadFilteredCommits {
            filter: filter.clone(),
        })
        else {
            panic!("expected FilteredCommitsLoaded");
        };
        assert_eq!(echoed, filter);
        assert_eq!(commits[0].subject, "by ada");

        assert_eq!(
            services.run(Command::LoadCommitPreview {
                hash: "missing".into()
            }),
            Some(Msg::CommitPreviewError {
                hash: "missing".into(),
                error: "show went wrong".into(),
            })
        );
    }

    #[test]
    fn test_executor_dispatches_from_the_runtime() {
        let (tx, rx) = mpsc::channel();
        let executor = Executor::new(
            services(FakeVcs::default(), ToolMode::Builtin),
            Dispatcher::new(tx),
        )
        .unwrap();

        executor.execute(Command::LoadBranches);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Msg::BranchesLoaded(vec![Branch::new("main")])
        );
        executor.shutdown();
    }

    #[test]
    fn test_checkout_and_branches() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        assert_eq!(
            services.run(Command::LoadBranches),
            Some(Msg::BranchesLoaded(vec![Branch::new("main")]))
        );
        assert_eq!(
            services.run(Command::Checkout {
                name: "locked".into()
            }),
            Some(Msg::CheckoutError("checkout went wrong".into()))
        );
    }

    #[test]
    fn test_clipboard_and_preferences() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        let Some(Msg::ClipboardFailed(error)) = services.run(Command::CopyToClipboard {
            text: "abc1234".into(),
            label: "hash".into(),
        }) else {
            panic!("expected ClipboardFailed");
        };
        assert!(error.starts_with("failed to write clipboard"));

        let preferences = gitpane_config::Preferences {
            graph_enabled: Some(true),
            ..Default::default()
        };
        assert_eq!(
            services.run(Command::SavePreferences(preferences.clone())),
            Some(Msg::PreferencesSaved)
        );
        assert_eq!(services.preferences.load().unwrap(), preferences);
    }

    #[test]
    fn test_watch_events_coalesce_and_stop() {
        let (tx, rx) = mpsc::channel();
        let mut services = services(FakeVcs::default(), ToolMode::Builtin);
        services.watch_rx = Some(Mutex::new(rx));

        tx.send(()).unwrap();
        tx.send(()).unwrap();
        tx.send(()).unwrap();
        assert!(matches!(
            services.run(Command::WatchNext),
            Some(Msg::WatchEvent { .. })
        ));

        drop(tx);
        assert_eq!(services.run(Command::WatchNext), Some(Msg::WatcherStopped));
    }

    #[test]
    fn test_commit_url_from_origin() {
        let services = services(FakeVcs::default(), ToolMode::Builtin);
        assert_eq!(
            services.commit_url("abc"),
            Ok("https://github.com/owner/repo/commit/abc".to_string())
        );
    }
}

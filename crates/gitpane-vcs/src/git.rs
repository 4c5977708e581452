//! [`VcsProvider`] backed by the `git` command line

use crate::error::{Result, VcsError};
use crate::parse::{
    merge_file_stats, parse_branches, parse_hash_set, parse_left_right_count, parse_log,
    parse_name_status, parse_numstat, parse_stash_list, BRANCH_FORMAT, LOG_FORMAT, STASH_FORMAT,
};
use crate::provider::VcsProvider;
use crate::types::{
    Branch, Commit, CommitFilter, CommitStats, FileStatus, PushStatus, PushVariant, StashList,
};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Runs `git` as a subprocess for every call
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn output(&self, work_dir: &Path, args: &[&str]) -> Result<Output> {
        log::debug!("git {}", args.join(" "));
        Command::new(&self.program)
            .args(["-c", "core.quotepath=false", "-c", "color.ui=never"])
            .args(args)
            .current_dir(work_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_MERGE_AUTOEDIT", "no")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| VcsError::Spawn {
                program: self.program.display().to_string(),
                source,
            })
    }

    /// Run and return stdout when the exit code is in `ok_codes`.
    fn run_allowing(&self, work_dir: &Path, args: &[&str], ok_codes: &[i32]) -> Result<Vec<u8>> {
        let output = self.output(work_dir, args)?;
        let code = output.status.code();
        if code.is_some_and(|c| ok_codes.contains(&c)) {
            return Ok(output.stdout);
        }

        let combined = combined_output(&output);
        log::warn!("git {} failed ({:?}): {}", args.join(" "), code, combined.trim());
        Err(VcsError::CommandFailed {
            args: args.join(" "),
            code,
            output: combined,
        })
    }

    fn run(&self, work_dir: &Path, args: &[&str]) -> Result<Vec<u8>> {
        self.run_allowing(work_dir, args, &[0])
    }

    fn run_text(&self, work_dir: &Path, args: &[&str]) -> Result<String> {
        self.run(work_dir, args)
            .map(|out| String::from_utf8_lossy(&out).into_owned())
    }

    /// Run and return stdout and stderr together, for commands whose
    /// progress goes to stderr.
    fn run_combined(&self, work_dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.output(work_dir, args)?;
        let combined = combined_output(&output);
        if output.status.success() {
            Ok(combined.trim().to_string())
        } else {
            log::warn!("git {} failed: {}", args.join(" "), combined.trim());
            Err(VcsError::CommandFailed {
                args: args.join(" "),
                code: output.status.code(),
                output: combined,
            })
        }
    }

    fn with_paths<'a>(args: &[&'a str], paths: &'a [String]) -> Vec<&'a str> {
        let mut all = args.to_vec();
        all.push("--");
        all.extend(paths.iter().map(String::as_str));
        all
    }

    fn commit_files(
        &self,
        work_dir: &Path,
        commit: &Commit,
    ) -> Result<Vec<crate::types::CommitFile>> {
        let range: Vec<&str> = match commit.first_parent() {
            Some(parent) => vec![parent, commit.hash.as_str()],
            None => vec!["--root", commit.hash.as_str()],
        };

        let mut names = vec!["diff-tree", "-r", "-M", "--no-commit-id", "--name-status"];
        names.extend(&range);
        let mut counts = vec!["diff-tree", "-r", "-M", "--no-commit-id", "--numstat"];
        counts.extend(&range);

        let files = parse_name_status(&self.run_text(work_dir, &names)?);
        let stats = parse_numstat(&self.run_text(work_dir, &counts)?);
        Ok(merge_file_stats(files, &stats))
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}

impl VcsProvider for GitCli {
    fn repo_root(&self, work_dir: &Path) -> Result<PathBuf> {
        match self.run_text(work_dir, &["rev-parse", "--show-toplevel"]) {
            Ok(root) => Ok(PathBuf::from(root.trim())),
            Err(VcsError::CommandFailed { .. }) => {
                Err(VcsError::NotARepository(work_dir.to_path_buf()))
            }
            Err(e) => Err(e),
        }
    }

    fn status_porcelain_v2_z(&self, work_dir: &Path) -> Result<Vec<u8>> {
        self.run(
            work_dir,
            &[
                "--no-optional-locks",
                "status",
                "--porcelain=v2",
                "-z",
                "--untracked-files=all",
            ],
        )
    }

    fn diff_numstat(&self, work_dir: &Path, staged: bool) -> Result<String> {
        if staged {
            self.run_text(work_dir, &["diff", "--cached", "--numstat", "-M"])
        } else {
            self.run_text(work_dir, &["diff", "--numstat"])
        }
    }

    fn diff_unified(
        &self,
        work_dir: &Path,
        path: &str,
        staged: bool,
        status: FileStatus,
    ) -> Result<String> {
        let out = if status == FileStatus::Untracked {
            // --no-index exits 1 when the files differ.
            self.run_allowing(
                work_dir,
                &["diff", "--no-color", "--no-index", "--", "/dev/null", path],
                &[0, 1],
            )?
        } else if staged {
            self.run(work_dir, &["diff", "--no-color", "--cached", "-M", "--", path])?
        } else {
            self.run(work_dir, &["diff", "--no-color", "--", path])?
        };
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn stage(&self, work_dir: &Path, paths: &[String]) -> Result<()> {
        self.run(work_dir, &Self::with_paths(&["add"], paths))
            .map(|_| ())
    }

    fn unstage(&self, work_dir: &Path, paths: &[String]) -> Result<()> {
        match self.run(work_dir, &Self::with_paths(&["reset", "-q", "HEAD"], paths)) {
            Ok(_) => Ok(()),
            // No HEAD yet: drop the paths from the index instead.
            Err(_) => self
                .run(work_dir, &Self::with_paths(&["rm", "--cached", "-q", "-r"], paths))
                .map(|_| ()),
        }
    }

    fn stage_all(&self, work_dir: &Path) -> Result<()> {
        self.run(work_dir, &["add", "-A"]).map(|_| ())
    }

    fn discard_modified(&self, work_dir: &Path, path: &str) -> Result<()> {
        self.run(work_dir, &["checkout", "--", path]).map(|_| ())
    }

    fn discard_staged(&self, work_dir: &Path, path: &str, status: FileStatus) -> Result<()> {
        if status == FileStatus::Added {
            return self.run(work_dir, &["rm", "-f", "-q", "--", path]).map(|_| ());
        }
        self.run(work_dir, &["reset", "-q", "HEAD", "--", path])?;
        if status == FileStatus::Renamed {
            // The new path is untracked after the reset.
            return self.run(work_dir, &["clean", "-f", "-q", "--", path]).map(|_| ());
        }
        self.run(work_dir, &["checkout", "--", path]).map(|_| ())
    }

    fn discard_untracked(&self, work_dir: &Path, path: &str) -> Result<()> {
        self.run(work_dir, &["clean", "-f", "-q", "--", path]).map(|_| ())
    }

    fn recent_commits(
        &self,
        work_dir: &Path,
        limit: usize,
        before: Option<&str>,
        filter: &CommitFilter,
    ) -> Result<Vec<Commit>> {
        // Paging asks for one extra so `before` itself can be dropped.
        let count = format!("-n{}", limit + usize::from(before.is_some()));
        let author = filter.author.as_ref().map(|a| format!("--author={}", a));

        let mut args = vec!["log", LOG_FORMAT, count.as_str()];
        if let Some(author) = &author {
            args.push("--fixed-strings");
            args.push(author);
        }
        if let Some(before) = before {
            args.push(before);
        }
        if let Some(path) = &filter.path {
            args.push("--");
            args.push(path);
        }

        let text = match self.run_text(work_dir, &args) {
            Ok(text) => text,
            // Unborn branch: no commits yet.
            Err(VcsError::CommandFailed { ref output, .. })
                if output.contains("does not have any commits") =>
            {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut commits = parse_log(&text)?;
        if let Some(before) = before {
            commits.retain(|c| c.hash != before);
        }
        commits.truncate(limit);
        Ok(commits)
    }

    fn commit_detail(&self, work_dir: &Path, hash: &str) -> Result<Commit> {
        let text = self.run_text(work_dir, &["show", "-s", LOG_FORMAT, hash])?;
        let mut commit = parse_log(&text)?
            .into_iter()
            .next()
            .ok_or_else(|| VcsError::Parse(format!("no commit {}", hash)))?;
        commit.files = self.commit_files(work_dir, &commit)?;
        commit.stats = CommitStats::from_files(&commit.files);
        Ok(commit)
    }

    fn diff_for_commit(
        &self,
        work_dir: &Path,
        hash: &str,
        path: &str,
        parent: Option<&str>,
    ) -> Result<String> {
        match parent {
            Some(parent) => self.run_text(
                work_dir,
                &["diff", "--no-color", "-M", parent, hash, "--", path],
            ),
            None => self.run_text(
                work_dir,
                &["show", "--no-color", "--format=", "-M", hash, "--", path],
            ),
        }
    }

    fn commit(&self, work_dir: &Path, message: &str, amend: bool) -> Result<String> {
        let mut args = vec!["commit", "-q", "-m", message];
        if amend {
            args.push("--amend");
        }
        self.run_combined(work_dir, &args)?;
        let hash = self.run_text(work_dir, &["rev-parse", "--short=7", "HEAD"])?;
        Ok(hash.trim().to_string())
    }

    fn push_status(&self, work_dir: &Path) -> Result<PushStatus> {
        let symbolic =
            self.run_allowing(work_dir, &["symbolic-ref", "--short", "-q", "HEAD"], &[0, 1])?;
        let branch = String::from_utf8_lossy(&symbolic).trim().to_string();
        let detached_head = branch.is_empty();
        let current_branch = if detached_head {
            self.run_text(work_dir, &["rev-parse", "--short=7", "HEAD"])
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "HEAD".to_string())
        } else {
            branch
        };

        let upstream = self
            .run_text(
                work_dir,
                &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{upstream}"],
            )
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut status = PushStatus {
            current_branch,
            detached_head,
            upstream,
            ..PushStatus::default()
        };

        if status.has_upstream() {
            let counts = self.run_text(
                work_dir,
                &["rev-list", "--left-right", "--count", "HEAD...@{upstream}"],
            )?;
            let (ahead, behind) = parse_left_right_count(&counts)?;
            status.ahead = ahead;
            status.behind = behind;
            let unpushed = self.run_text(work_dir, &["rev-list", "@{upstream}..HEAD"])?;
            status.unpushed = parse_hash_set(&unpushed);
        } else {
            // Without an upstream every commit not on a remote counts as unpushed.
            status.unpushed = self
                .run_text(work_dir, &["rev-list", "HEAD", "--not", "--remotes"])
                .map(|text| parse_hash_set(&text))
                .unwrap_or_default();
            status.ahead = status.unpushed.len();
        }

        Ok(status)
    }

    fn push(&self, work_dir: &Path, variant: PushVariant) -> Result<String> {
        let args: &[&str] = match variant {
            PushVariant::Plain => &["push"],
            PushVariant::ForceWithLease => &["push", "--force-with-lease"],
            PushVariant::SetUpstream => &["push", "--set-upstream", "origin", "HEAD"],
        };
        self.run_combined(work_dir, args)
    }

    fn fetch(&self, work_dir: &Path) -> Result<String> {
        self.run_combined(work_dir, &["fetch"])
    }

    fn pull(&self, work_dir: &Path) -> Result<String> {
        self.run_combined(work_dir, &["pull"])
    }

    fn remote_url(&self, work_dir: &Path, remote: &str) -> Result<String> {
        self.run_text(work_dir, &["remote", "get-url", remote])
            .map(|s| s.trim().to_string())
    }

    fn branches(&self, work_dir: &Path) -> Result<Vec<Branch>> {
        let text = self.run_text(
            work_dir,
            &["for-each-ref", BRANCH_FORMAT, "refs/heads", "refs/remotes"],
        )?;
        Ok(parse_branches(&text))
    }

    fn checkout(&self, work_dir: &Path, name: &str) -> Result<()> {
        self.run_combined(work_dir, &["checkout", name]).map(|_| ())
    }

    fn stash_list(&self, work_dir: &Path) -> Result<StashList> {
        let text = self.run_text(work_dir, &["stash", "list", STASH_FORMAT])?;
        Ok(parse_stash_list(&text))
    }

    fn stash_push(&self, work_dir: &Path, message: Option<&str>) -> Result<String> {
        let mut args = vec!["stash", "push", "--include-untracked"];
        if let Some(message) = message {
            args.push("-m");
            args.push(message);
        }
        let output = self.run_combined(work_dir, &args)?;
        if output.contains("No local changes to save") {
            return Err(VcsError::CommandFailed {
                args: args.join(" "),
                code: Some(0),
                output,
            });
        }
        Ok("stash@{0}".to_string())
    }

    fn stash_pop(&self, work_dir: &Path, stash_ref: &str) -> Result<()> {
        self.run_combined(work_dir, &["stash", "pop", stash_ref]).map(|_| ())
    }

    fn stash_apply(&self, work_dir: &Path, stash_ref: &str) -> Result<()> {
        self.run_combined(work_dir, &["stash", "apply", stash_ref]).map(|_| ())
    }

    fn stash_drop(&self, work_dir: &Path, stash_ref: &str) -> Result<()> {
        self.run_combined(work_dir, &["stash", "drop", stash_ref]).map(|_| ())
    }
}

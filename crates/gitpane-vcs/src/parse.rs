//! Parsers for git's machine-readable output.
//!
//! Everything here is pure so it can be tested on captured output.

use crate::error::{Result, VcsError};
use crate::types::{
    short_hash, Branch, Commit, CommitFile, CommitStats, FileStatus, NumstatEntry, Stash,
    StashList,
};
use chrono::DateTime;
use std::collections::HashSet;

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

/// `--format` for `git log` / `git show` matching [`parse_log`].
pub const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%ae%x1f%at%x1f%P%x1f%s%x1f%b%x1e";

/// `--format` for `git for-each-ref` matching [`parse_branches`].
pub const BRANCH_FORMAT: &str = concat!(
    "--format=%(HEAD)%1f%(refname)%1f%(refname:short)",
    "%1f%(upstream:short)%1f%(upstream:track,nobracket)"
);

/// `--format` for `git stash list` matching [`parse_stash_list`].
pub const STASH_FORMAT: &str = "--format=%gd%x1f%gs";

/// Parse records produced with [`LOG_FORMAT`].
pub fn parse_log(text: &str) -> Result<Vec<Commit>> {
    let mut commits = Vec::new();
    for record in text.split(RECORD_SEP) {
        let record = record.trim_start_matches(['\n', '\r']);
        if record.trim().is_empty() {
            continue;
        }
        commits.push(parse_log_record(record)?);
    }
    Ok(commits)
}

fn parse_log_record(record: &str) -> Result<Commit> {
    let fields: Vec<&str> = record.splitn(7, FIELD_SEP).collect();
    let [hash, author, email, timestamp, parents, subject, body] = fields[..] else {
        return Err(VcsError::Parse(format!(
            "log record has {} fields: {:?}",
            fields.len(),
            record
        )));
    };

    let seconds: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| VcsError::Parse(format!("invalid commit timestamp {:?}", timestamp)))?;
    let date = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| VcsError::Parse(format!("commit timestamp out of range: {}", seconds)))?;

    let parent_hashes: Vec<String> = parents.split_whitespace().map(str::to_string).collect();
    Ok(Commit {
        hash: hash.to_string(),
        short_hash: short_hash(hash),
        author: author.to_string(),
        author_email: email.to_string(),
        date,
        subject: subject.to_string(),
        body: body.trim_end().to_string(),
        is_merge: parent_hashes.len() >= 2,
        parent_hashes,
        pushed: false,
        files: Vec::new(),
        stats: CommitStats::default(),
    })
}

/// Parse `--numstat` output. Binary files (`-`) count as zero lines.
pub fn parse_numstat(text: &str) -> Vec<NumstatEntry> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let additions = parts.next()?;
            let deletions = parts.next()?;
            let path = parts.next()?;
            Some(NumstatEntry {
                path: resolve_rename_path(path),
                additions: additions.parse().unwrap_or(0),
                deletions: deletions.parse().unwrap_or(0),
            })
        })
        .collect()
}

/// Resolve numstat rename notation to the new path.
///
/// Handles `old => new` and `dir/{old => new}/file`.
pub fn resolve_rename_path(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            let inner = &path[open + 1..close];
            if let Some((_, new)) = inner.split_once(" => ") {
                let prefix = &path[..open];
                let suffix = &path[close + 1..];
                let joined = format!("{}{}{}", prefix, new, suffix);
                // `dir/{ => sub}/f` leaves a doubled slash behind.
                return joined.replace("//", "/");
            }
        }
    }
    match path.split_once(" => ") {
        Some((_, new)) => new.to_string(),
        None => path.to_string(),
    }
}

/// Parse `--name-status` output into commit files with zero counts.
pub fn parse_name_status(text: &str) -> Vec<CommitFile> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let code = parts.next()?;
            let status = FileStatus::from_code(code.chars().next()?)?;
            let first = parts.next()?.to_string();
            let (path, old_path) = match parts.next() {
                Some(second) => (second.to_string(), Some(first)),
                None => (first, None),
            };
            Some(CommitFile {
                path,
                old_path,
                status,
                additions: 0,
                deletions: 0,
            })
        })
        .collect()
}

/// Attach numstat counts to name-status entries, matching by path.
pub fn merge_file_stats(mut files: Vec<CommitFile>, stats: &[NumstatEntry]) -> Vec<CommitFile> {
    for file in &mut files {
        if let Some(stat) = stats.iter().find(|s| s.path == file.path) {
            file.additions = stat.additions;
            file.deletions = stat.deletions;
        }
    }
    files
}

/// Parse `rev-list --left-right --count A...B` into `(left, right)`.
pub fn parse_left_right_count(text: &str) -> Result<(usize, usize)> {
    let mut parts = text.split_whitespace();
    let left = parts.next().and_then(|s| s.parse().ok());
    let right = parts.next().and_then(|s| s.parse().ok());
    match (left, right) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(VcsError::Parse(format!("invalid left/right count {:?}", text))),
    }
}

/// One hash per line.
pub fn parse_hash_set(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `upstream:track,nobracket`, e.g. `ahead 2, behind 1`.
pub fn parse_track(track: &str) -> (usize, usize) {
    let mut ahead = 0;
    let mut behind = 0;
    for part in track.split(',') {
        let mut words = part.split_whitespace();
        match (words.next(), words.next().and_then(|n| n.parse().ok())) {
            (Some("ahead"), Some(n)) => ahead = n,
            (Some("behind"), Some(n)) => behind = n,
            _ => {}
        }
    }
    (ahead, behind)
}

/// Parse records produced with [`BRANCH_FORMAT`]. Symbolic `*/HEAD` refs are skipped.
pub fn parse_branches(text: &str) -> Vec<Branch> {
    text.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(FIELD_SEP).collect();
            let [head, refname, short, upstream, track] = fields[..] else {
                log::debug!("Skipping branch line {:?}", line);
                return None;
            };
            if refname.ends_with("/HEAD") {
                return None;
            }
            let (ahead, behind) = parse_track(track);
            Some(Branch {
                name: short.to_string(),
                is_current: head.trim() == "*",
                is_remote: refname.starts_with("refs/remotes/"),
                upstream: (!upstream.is_empty()).then(|| upstream.to_string()),
                ahead,
                behind,
            })
        })
        .collect()
}

/// Parse records produced with [`STASH_FORMAT`].
///
/// Subjects look like `WIP on main: abc1234 msg` or `On main: msg`.
pub fn parse_stash_list(text: &str) -> StashList {
    let stashes = text
        .lines()
        .filter_map(|line| {
            let (stash_ref, subject) = line.split_once(FIELD_SEP)?;
            let index = stash_ref
                .strip_prefix("stash@{")?
                .strip_suffix('}')?
                .parse()
                .ok()?;
            let rest = subject
                .strip_prefix("WIP on ")
                .or_else(|| subject.strip_prefix("On "))
                .unwrap_or(subject);
            let (branch, message) = match rest.split_once(": ") {
                Some((branch, message)) => (branch.to_string(), message.to_string()),
                None => (String::new(), rest.to_string()),
            };
            Some(Stash {
                index,
                stash_ref: stash_ref.to_string(),
                branch,
                message,
            })
        })
        .collect();
    StashList { stashes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_log() {
        let text = concat!(
            "aaaaaaaaaa\x1fAda\x1fada@example.com\x1f1700000000\x1fbbbbbbbb",
            "\x1fAdd parser\x1fLonger body\n\nwith lines\n\x1e\n",
            "cccccccccc\x1fBob\x1fbob@example.com\x1f1690000000\x1fdddd eeee",
            "\x1fMerge branch 'x'\x1f\x1e\n",
        );
        let commits = parse_log(text).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "aaaaaaaaaa");
        assert_eq!(commits[0].short_hash, "aaaaaaa");
        assert_eq!(commits[0].author, "Ada");
        assert_eq!(commits[0].author_email, "ada@example.com");
        assert_eq!(commits[0].date.timestamp(), 1_700_000_000);
        assert_eq!(commits[0].subject, "Add parser");
        assert_eq!(commits[0].body, "Longer body\n\nwith lines");
        assert!(!commits[0].is_merge);
        assert_eq!(commits[1].parent_hashes, vec!["dddd", "eeee"]);
        assert!(commits[1].is_merge);
        assert_eq!(commits[1].body, "");
    }

    #[test]
    fn test_parse_log_rejects_short_record() {
        assert!(matches!(parse_log("abc\x1fonly\x1e"), Err(VcsError::Parse(_))));
    }

    #[test]
    fn test_parse_numstat() {
        let text = concat!(
            "3\t1\tsrc/main.rs\n-\t-\tlogo.png\n",
            "2\t2\tsrc/{old => new}/mod.rs\n0\t0\ta.txt => b.txt\n",
        );
        let entries = parse_numstat(text);
        assert_eq!(
            entries,
            vec![
                NumstatEntry {
                    path: "src/main.rs".into(),
                    additions: 3,
                    deletions: 1
                },
                NumstatEntry {
                    path: "logo.png".into(),
                    additions: 0,
                    deletions: 0
                },
                NumstatEntry {
                    path: "src/new/mod.rs".into(),
                    additions: 2,
                    deletions: 2
                },
                NumstatEntry {
                    path: "b.txt".into(),
                    additions: 0,
                    deletions: 0
                },
            ]
        );
    }

    #[test]
    fn test_resolve_rename_into_new_dir() {
        assert_eq!(resolve_rename_path("src/{ => util}/x.rs"), "src/util/x.rs");
        assert_eq!(resolve_rename_path("{a => b}.rs"), "b.rs");
    }

    #[test]
    fn test_parse_name_status_and_merge() {
        let files = parse_name_status("M\tsrc/lib.rs\nR087\tsrc/a.rs\tsrc/b.rs\nA\tnew.txt\n");
        let stats = parse_numstat("4\t1\tsrc/lib.rs\n1\t1\tsrc/{a.rs => b.rs}\n7\t0\tnew.txt\n");
        let files = merge_file_stats(files, &stats);

        assert_eq!(files.len(), 3);
        assert_eq!(files[1].status, FileStatus::Renamed);
        assert_eq!(files[1].old_path.as_deref(), Some("src/a.rs"));
        assert_eq!(files[1].path, "src/b.rs");
        assert_eq!((files[1].additions, files[1].deletions), (1, 1));
        assert_eq!((files[2].additions, files[2].deletions), (7, 0));
    }

    #[test]
    fn test_parse_left_right_count() {
        assert_eq!(parse_left_right_count("2\t1\n").unwrap(), (2, 1));
        assert!(parse_left_right_count("").is_err());
    }

    #[test]
    fn test_parse_branches() {
        let text = concat!(
            "*\x1frefs/heads/main\x1fmain\x1forigin/main\x1fahead 2, behind 1\n",
            " \x1frefs/heads/feature\x1ffeature\x1f\x1f\n",
            " \x1frefs/remotes/origin/HEAD\x1forigin\x1f\x1f\n",
            " \x1frefs/remotes/origin/main\x1forigin/main\x1f\x1f\n",
        );
        let branches = parse_branches(text);

        assert_eq!(branches.len(), 3);
        assert_eq!(branches[0].name, "main");
        assert!(branches[0].is_current);
        assert_eq!(branches[0].upstream.as_deref(), Some("origin/main"));
        assert_eq!(branches[0].format_tracking_info(), "↑2↓1");
        assert_eq!(branches[1].upstream, None);
        assert!(!branches[1].is_current);
        assert!(branches[2].is_remote);
    }

    #[test]
    fn test_parse_track_gone() {
        assert_eq!(parse_track("gone"), (0, 0));
        assert_eq!(parse_track("behind 4"), (0, 4));
    }

    #[test]
    fn test_parse_stash_list() {
        let text = concat!(
            "stash@{0}\x1fOn main: try idea\n",
            "stash@{1}\x1fWIP on feature/x: abc1234 Fix it\n",
        );
        let list = parse_stash_list(text);

        assert_eq!(list.count(), 2);
        assert_eq!(
            list.stashes[0],
            Stash {
                index: 0,
                stash_ref: "stash@{0}".into(),
                branch: "main".into(),
                message: "try idea".into(),
            }
        );
        assert_eq!(list.stashes[1].branch, "feature/x");
        assert_eq!(list.stashes[1].message, "abc1234 Fix it");
    }

    #[test]
    fn test_parse_hash_set() {
        let set = parse_hash_set("aaa\nbbb\n\n");
        assert!(set.contains("aaa") && set.contains("bbb"));
        assert_eq!(set.len(), 2);
    }
}

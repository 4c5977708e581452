//! Paged commit history with push state and an optional filtered view

use gitpane_vcs::{Commit, CommitFilter, PushStatus};
use std::collections::HashSet;

/// Start loading the next page when the cursor is this close to the end
pub const LOAD_MORE_THRESHOLD: usize = 3;

/// Combine a freshly loaded first page with what is already loaded.
///
/// An empty `latest` keeps `existing`. If `latest` is at least as long it
/// replaces `existing`. Otherwise older pages survive behind the new page.
pub fn merge_commits(existing: Vec<Commit>, latest: Vec<Commit>) -> Vec<Commit> {
    if latest.is_empty() {
        return existing;
    }
    if existing.len() <= latest.len() {
        return latest;
    }
    let seen: HashSet<String> = latest.iter().map(|c| c.hash.clone()).collect();
    let mut merged = latest;
    merged.extend(existing.into_iter().filter(|c| !seen.contains(&c.hash)));
    merged
}

/// Set each commit's `pushed` flag from the unpushed set
pub fn populate_push_status(commits: &mut [Commit], status: &PushStatus) {
    for commit in commits {
        commit.pushed = !status.is_unpushed(&commit.hash);
    }
}

/// Append an older page, skipping hashes already present
pub fn append_page(commits: &mut Vec<Commit>, page: Vec<Commit>) -> usize {
    let seen: HashSet<String> = commits.iter().map(|c| c.hash.clone()).collect();
    let before = commits.len();
    commits.extend(page.into_iter().filter(|c| !seen.contains(&c.hash)));
    commits.len() - before
}

/// Commit history state shared by the sidebar and the filter modals
#[derive(Debug, Clone, Default)]
pub struct CommitHistory {
    pub recent: Vec<Commit>,
    pub filtered: Vec<Commit>,
    pub filter: CommitFilter,
    pub filter_active: bool,
    pub loading_more: bool,
    pub more_available: bool,
    pub page_size: usize,
}

impl CommitHistory {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            more_available: true,
            ..Self::default()
        }
    }

    /// `filtered` while a filter is active, `recent` otherwise
    pub fn active(&self) -> &[Commit] {
        if self.filter_active {
            &self.filtered
        } else {
            &self.recent
        }
    }

    fn active_mut(&mut self) -> &mut Vec<Commit> {
        if self.filter_active {
            &mut self.filtered
        } else {
            &mut self.recent
        }
    }

    pub fn position(&self, hash: &str) -> Option<usize> {
        self.active().iter().position(|c| c.hash == hash)
    }

    /// Merge a refreshed first page into the unfiltered list
    pub fn apply_recent(&mut self, latest: Vec<Commit>, push_status: Option<&PushStatus>) {
        let had_full_page = latest.len() >= self.page_size;
        let existing = std::mem::take(&mut self.recent);
        let grew_past_page = existing.len() > latest.len();
        self.recent = merge_commits(existing, latest);
        if let Some(status) = push_status {
            populate_push_status(&mut self.recent, status);
        }
        if !grew_past_page {
            self.more_available = had_full_page;
        }
    }

    /// Append an older page to the active list
    pub fn apply_more(&mut self, page: Vec<Commit>, push_status: Option<&PushStatus>) {
        let full = page.len() >= self.page_size;
        let list = self.active_mut();
        append_page(list, page);
        if let Some(status) = push_status {
            populate_push_status(list, status);
        }
        self.more_available = full;
        self.loading_more = false;
    }

    /// Replace the filtered list with the first page for `filter`
    pub fn apply_filtered(&mut self, commits: Vec<Commit>, push_status: Option<&PushStatus>) {
        self.more_available = commits.len() >= self.page_size;
        self.filtered = commits;
        if let Some(status) = push_status {
            populate_push_status(&mut self.filtered, status);
        }
        self.filter_active = true;
    }

    pub fn clear_filter(&mut self) {
        self.filter = CommitFilter::default();
        self.filter_active = false;
        self.filtered.clear();
        self.more_available = self.recent.len() >= self.page_size;
    }

    /// Whether the cursor at `index` in the active list should load another page
    pub fn wants_more(&self, index: usize) -> bool {
        let len = self.active().len();
        !self.loading_more
            && self.more_available
            && len > 0
            && index + LOAD_MORE_THRESHOLD >= len
    }

    /// Hash of the oldest loaded commit in the active list
    pub fn oldest_hash(&self) -> Option<String> {
        self.active().last().map(|c| c.hash.clone())
    }

    pub fn unpushed_count(&self) -> usize {
        self.recent.iter().filter(|c| !c.pushed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commits(hashes: &[&str]) -> Vec<Commit> {
        hashes.iter().map(|h| Commit::new(*h, format!("subject {}", h))).collect()
    }

    fn hashes(list: &[Commit]) -> Vec<&str> {
        list.iter().map(|c| c.hash.as_str()).collect()
    }

    #[test]
    fn test_merge_keeps_existing_on_empty() {
        let merged = merge_commits(commits(&["a", "b"]), vec![]);
        assert_eq!(hashes(&merged), vec!["a", "b"]);
    }

    #[test]
    fn test_merge_replaces_when_latest_is_longer() {
        let merged = merge_commits(commits(&["b"]), commits(&["a", "b"]));
        assert_eq!(hashes(&merged), vec!["a", "b"]);
    }

    #[test]
    fn test_merge_keeps_older_pages() {
        let merged = merge_commits(commits(&["b", "c", "d", "e"]), commits(&["a", "b"]));
        assert_eq!(hashes(&merged), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_merge_never_loses_identities() {
        let cases = [
            (vec!["a", "b", "c"], vec!["x", "a"]),
            (vec!["a"], vec!["b", "c"]),
            (vec!["a", "b", "c", "d"], vec![]),
            (vec!["a", "b", "c", "d"], vec!["d", "c"]),
        ];
        for (existing, latest) in cases {
            let merged = merge_commits(commits(&existing), commits(&latest));
            let after: HashSet<&str> = hashes(&merged).into_iter().collect();
            for h in latest.iter() {
                assert!(after.contains(h), "lost {} from latest", h);
            }
            if existing.len() > latest.len() {
                for h in existing.iter() {
                    assert!(after.contains(h), "lost {} from existing", h);
                }
            }
        }
    }

    #[test]
    fn test_populate_push_status() {
        let mut list = commits(&["a", "b", "c"]);
        let status = PushStatus {
            unpushed: ["a".to_string()].into_iter().collect(),
            ..PushStatus::default()
        };
        populate_push_status(&mut list, &status);
        let pushed: Vec<bool> = list.iter().map(|c| c.pushed).collect();
        assert_eq!(pushed, vec![false, true, true]);
    }

    #[test]
    fn test_append_page_dedups() {
        let mut list = commits(&["a", "b"]);
        assert_eq!(append_page(&mut list, commits(&["b", "c"])), 1);
        assert_eq!(hashes(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_wants_more_near_end() {
        let mut history = CommitHistory::new(5);
        history.apply_recent(commits(&["a", "b", "c", "d", "e"]), None);
        assert!(history.more_available);
        assert!(!history.wants_more(0));
        assert!(!history.wants_more(1));
        assert!(history.wants_more(2));
        history.loading_more = true;
        assert!(!history.wants_more(4));

        history.apply_more(commits(&["f"]), None);
        assert!(!history.more_available);
        assert!(!history.loading_more);
        assert!(!history.wants_more(5));
    }

    #[test]
    fn test_filter_switches_active_list() {
        let mut history = CommitHistory::new(50);
        history.apply_recent(commits(&["a", "b", "c"]), None);
        history.filter.author = Some("ana".into());
        history.apply_filtered(commits(&["b"]), None);
        assert_eq!(hashes(history.active()), vec!["b"]);
        assert_eq!(history.position("b"), Some(0));

        history.clear_filter();
        assert_eq!(hashes(history.active()), vec!["a", "b", "c"]);
        assert!(history.filter.is_empty());
    }
}

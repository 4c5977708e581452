//! Filesystem watcher for the working tree and git metadata
//!
//! Every relevant change sends a `()` on the returned channel. Coalescing
//! happens in the status view, which skips refreshes that land too soon
//! after the previous one. Dropping the [`RepoWatcher`] drops the sender,
//! so a pending `recv` on the channel ends with a disconnect.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use thiserror::Error;

/// Files inside the git dir that signal a branch, index or ref change
const GIT_METADATA: &[&str] = &["HEAD", "index", "MERGE_HEAD", "REBASE_HEAD", "CHERRY_PICK_HEAD"];

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("failed to create file watcher: {0}")]
    Create(#[source] notify::Error),
    #[error("failed to watch {path:?}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

pub struct RepoWatcher {
    _watcher: RecommendedWatcher,
}

impl RepoWatcher {
    /// Watch `work_dir` recursively and the metadata in `git_dir`.
    pub fn start(work_dir: &Path, git_dir: &Path) -> Result<(Self, Receiver<()>), WatcherError> {
        let (tx, rx) = mpsc::channel::<()>();

        let git_dir_owned = git_dir.to_path_buf();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant_event(&event, &git_dir_owned) => {
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(e) => log::warn!("Watcher error: {}", e),
            },
            Config::default(),
        )
        .map_err(WatcherError::Create)?;

        watcher
            .watch(work_dir, RecursiveMode::Recursive)
            .map_err(|source| WatcherError::Watch {
                path: work_dir.to_path_buf(),
                source,
            })?;

        // Metadata changes from git commands run outside the app
        if git_dir.is_dir() && !git_dir.starts_with(work_dir) {
            if let Err(e) = watcher.watch(git_dir, RecursiveMode::NonRecursive) {
                log::warn!("Not watching {:?}: {}", git_dir, e);
            }
            let refs = git_dir.join("refs");
            if let Err(e) = watcher.watch(&refs, RecursiveMode::Recursive) {
                log::warn!("Not watching {:?}: {}", refs, e);
            }
        }

        log::info!("Watching {:?} (git dir {:?})", work_dir, git_dir);
        Ok((Self { _watcher: watcher }, rx))
    }
}

/// Create, modify and remove events outside the git dir, plus the few
/// metadata files inside it that mean HEAD, the index or a ref moved.
fn is_relevant_event(event: &Event, git_dir: &Path) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
        _ => return false,
    }

    event.paths.iter().any(|path| match path.strip_prefix(git_dir) {
        Ok(relative) => {
            let relative = relative.to_string_lossy();
            GIT_METADATA.contains(&relative.as_ref()) || relative.starts_with("refs")
        }
        Err(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_worktree_changes_are_relevant() {
        let git_dir = Path::new("/repo/.git");
        assert!(is_relevant_event(
            &event(EventKind::Modify(ModifyKind::Any), "/repo/src/main.rs"),
            git_dir
        ));
        assert!(is_relevant_event(
            &event(EventKind::Create(CreateKind::File), "/repo/new.txt"),
            git_dir
        ));
        assert!(is_relevant_event(
            &event(EventKind::Remove(RemoveKind::File), "/repo/old.txt"),
            git_dir
        ));
    }

    #[test]
    fn test_git_dir_noise_is_ignored() {
        let git_dir = Path::new("/repo/.git");
        let modify = EventKind::Modify(ModifyKind::Any);
        assert!(!is_relevant_event(&event(modify, "/repo/.git/objects/ab/cdef"), git_dir));
        assert!(!is_relevant_event(&event(modify, "/repo/.git/logs/HEAD"), git_dir));
        assert!(!is_relevant_event(&event(modify, "/repo/.git/index.lock"), git_dir));

        assert!(is_relevant_event(&event(modify, "/repo/.git/index"), git_dir));
        assert!(is_relevant_event(&event(modify, "/repo/.git/HEAD"), git_dir));
        assert!(is_relevant_event(&event(modify, "/repo/.git/refs/heads/main"), git_dir));
    }

    #[test]
    fn test_access_events_are_ignored() {
        let git_dir = Path::new("/repo/.git");
        assert!(!is_relevant_event(
            &event(EventKind::Access(AccessKind::Any), "/repo/src/main.rs"),
            git_dir
        ));
    }
}

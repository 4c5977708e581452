use super::*;
use crate::command::DiscardTarget;
use crate::hitmap::RegionId;
use crate::input::MouseInput;
use crate::model::tree::tests::tree_of;
use crate::msg::StashOperation;
use gitpane_vcs::{Branch, CommitFilter, FileStatus, PushVariant, Stash};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn commits(hashes: &[&str]) -> Vec<Commit> {
    hashes
        .iter()
        .map(|h| Commit::new(*h, format!("subject {}", h)))
        .collect()
}

fn view_with(tree: FileTree, commits: Vec<Commit>) -> StatusView {
    let mut view = StatusView::new(ViewConfig::default(), &Preferences::default());
    view.update(Msg::WindowSize {
        width: 120,
        height: 40,
    });
    view.update(Msg::StatusLoaded {
        tree,
        push_status: None,
        stashes: StashList::default(),
    });
    view.update(Msg::RecentCommitsLoaded {
        commits,
        push_status: None,
    });
    view
}

fn keys(view: &mut StatusView, keys: &[&str]) -> Vec<Command> {
    keys.iter().flat_map(|k| view.handle_key(k)).collect()
}

fn unpushed(hashes: &[&str]) -> PushStatus {
    PushStatus {
        current_branch: "main".into(),
        upstream: Some("origin/main".into()),
        ahead: hashes.len(),
        unpushed: hashes.iter().map(|h| h.to_string()).collect::<HashSet<_>>(),
        ..PushStatus::default()
    }
}

fn selected_path(view: &StatusView) -> Option<String> {
    match view.selection() {
        Selection::File(entry) => Some(entry.entry.path.clone()),
        _ => None,
    }
}

#[test]
fn test_navigation_stops_at_the_ends() {
    let mut view = view_with(tree_of(&["a.go", "b.go"], &["c.go"], &[]), vec![]);
    assert_eq!(view.cursor(), 0);
    assert_eq!(view.active_pane(), FocusPane::Sidebar);

    view.handle_key("j");
    assert_eq!(view.cursor(), 1);
    view.handle_key("j");
    assert_eq!(view.cursor(), 2);
    assert_eq!(selected_path(&view).as_deref(), Some("c.go"));
    view.handle_key("j");
    assert_eq!(view.cursor(), 2);

    view.handle_key("g");
    assert_eq!(view.cursor(), 0);
    view.handle_key("G");
    assert_eq!(view.cursor(), 2);
}

#[test]
fn test_moving_onto_a_file_loads_its_diff() {
    let mut view = view_with(tree_of(&[], &["a.rs", "b.rs"], &[]), vec![]);
    let commands = view.handle_key("j");
    assert_eq!(commands.len(), 1);
    match &commands[0] {
        Command::LoadInlineDiff { source, .. } => assert_eq!(
            source,
            &DiffSource::WorkingTree {
                path: "b.rs".into(),
                staged: false,
                status: FileStatus::Modified,
            }
        ),
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_stage_moves_cursor_to_first_unstaged() {
    let mut view = view_with(tree_of(&["x.go"], &["y.go", "z.go"], &[]), vec![]);
    view.handle_key("j");
    assert_eq!(selected_path(&view).as_deref(), Some("y.go"));

    let commands = view.handle_key("s");
    assert_eq!(
        commands,
        vec![Command::Stage {
            paths: vec!["y.go".into()]
        }]
    );

    view.update(Msg::OperationDone {
        label: "Staged y.go".into(),
    });
    view.update(Msg::StatusLoaded {
        tree: tree_of(&["x.go", "y.go"], &["z.go"], &[]),
        push_status: None,
        stashes: StashList::default(),
    });
    assert_eq!(view.cursor(), 2);
    assert_eq!(selected_path(&view).as_deref(), Some("z.go"));
}

#[test]
fn test_refresh_keeps_cursor_on_same_file() {
    let mut view = view_with(tree_of(&[], &["b.rs", "c.rs"], &[]), vec![]);
    view.handle_key("j");
    assert_eq!(selected_path(&view).as_deref(), Some("c.rs"));

    view.update(Msg::StatusLoaded {
        tree: tree_of(&[], &["a.rs", "b.rs", "c.rs"], &[]),
        push_status: None,
        stashes: StashList::default(),
    });
    assert_eq!(view.cursor(), 2);
    assert_eq!(selected_path(&view).as_deref(), Some("c.rs"));
}

#[test]
fn test_cursor_clamped_when_files_disappear() {
    let mut view = view_with(tree_of(&[], &["a.rs", "b.rs", "c.rs"], &[]), vec![]);
    view.handle_key("G");
    assert_eq!(view.cursor(), 2);

    view.update(Msg::StatusLoaded {
        tree: tree_of(&[], &["a.rs"], &[]),
        push_status: None,
        stashes: StashList::default(),
    });
    assert_eq!(view.cursor(), 0);
    assert!(view.cursor() < view.total_selectable());

    view.update(Msg::StatusLoaded {
        tree: FileTree::default(),
        push_status: None,
        stashes: StashList::default(),
    });
    assert_eq!(view.cursor(), 0);
    assert!(matches!(view.selection(), Selection::None));
}

#[test]
fn test_stale_inline_diff_is_dropped() {
    let mut view = view_with(tree_of(&[], &["a.rs", "b.rs"], &[]), vec![]);
    let stale = DiffSource::WorkingTree {
        path: "a.rs".into(),
        staged: false,
        status: FileStatus::Modified,
    };
    view.handle_key("j");

    view.update(Msg::InlineDiffLoaded(DiffPayload {
        source: stale,
        diff: None,
        external: None,
        error: None,
    }));
    assert!(view.inline_diff.is_none());

    let current = view.selected_diff.clone().unwrap();
    view.update(Msg::InlineDiffLoaded(DiffPayload {
        source: current.clone(),
        diff: None,
        external: None,
        error: None,
    }));
    assert_eq!(view.inline_diff.as_ref().map(|p| &p.source), Some(&current));
}

#[test]
fn test_push_keeps_cursor_on_selected_commit() {
    let mut view = view_with(FileTree::default(), vec![]);
    view.update(Msg::RecentCommitsLoaded {
        commits: commits(&["c1", "c2", "c3"]),
        push_status: Some(unpushed(&["c1"])),
    });
    view.handle_key("j");
    assert_eq!(view.selected_commit().map(|c| c.hash.as_str()), Some("c2"));

    view.handle_key("P");
    assert_eq!(view.view_mode(), ViewMode::PushMenu);
    let commands = view.handle_key("enter");
    assert_eq!(commands, vec![Command::Push(PushVariant::Plain)]);
    assert_eq!(view.view_mode(), ViewMode::Status);

    let commands = view.update(Msg::PushSuccess {
        output: String::new(),
    });
    assert!(commands.contains(&Command::LoadRecentCommits));

    view.update(Msg::RecentCommitsLoaded {
        commits: commits(&["c0", "c1", "c2", "c3"]),
        push_status: Some(unpushed(&[])),
    });
    let index = view.selected_commit_index().unwrap();
    assert_eq!(view.active_commits()[index].hash, "c2");
}

#[test]
fn test_push_menu_needs_unpushed_commits() {
    let mut view = view_with(FileTree::default(), commits(&["c1"]));
    let commands = view.handle_key("P");
    assert_eq!(
        commands,
        vec![Command::Toast("No unpushed commits".into())]
    );
    assert_eq!(view.view_mode(), ViewMode::Status);
}

#[test]
fn test_push_menu_shortcut() {
    let mut view = view_with(FileTree::default(), vec![]);
    view.update(Msg::RecentCommitsLoaded {
        commits: commits(&["c1"]),
        push_status: Some(unpushed(&["c1"])),
    });
    view.handle_key("P");
    let commands = view.handle_key("f");
    assert_eq!(commands, vec![Command::Push(PushVariant::ForceWithLease)]);
    assert!(view.remote_busy());

    // A second push is ignored while one is running
    assert_eq!(view.handle_key("P"), vec![]);
    assert_eq!(view.view_mode(), ViewMode::Status);
}

#[test]
fn test_watch_events_are_debounced() {
    let mut view = view_with(FileTree::default(), vec![]);
    view.last_refresh = None;
    let start = Instant::now();

    let first = view.update(Msg::WatchEvent { at: start });
    assert_eq!(
        first,
        vec![
            Command::Refresh,
            Command::LoadRecentCommits,
            Command::WatchNext
        ]
    );

    let second = view.update(Msg::WatchEvent {
        at: start + Duration::from_millis(200),
    });
    assert_eq!(second, vec![Command::WatchNext]);

    let third = view.update(Msg::WatchEvent {
        at: start + Duration::from_millis(600),
    });
    assert!(third.contains(&Command::Refresh));
    assert!(third.contains(&Command::WatchNext));
}

#[test]
fn test_stopped_watcher_ignores_events() {
    let mut view = view_with(FileTree::default(), vec![]);
    view.update(Msg::WatcherStopped);
    assert!(view.status_message.as_ref().is_some_and(|m| m.is_error));
    assert_eq!(
        view.update(Msg::WatchEvent {
            at: Instant::now() + Duration::from_secs(5)
        }),
        vec![]
    );
}

#[test]
fn test_discard_confirm_and_cancel() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &["new.txt"]), vec![]);
    view.handle_key("D");
    assert_eq!(view.view_mode(), ViewMode::ConfirmDiscard);
    assert_eq!(view.handle_key("n"), vec![]);
    assert_eq!(view.view_mode(), ViewMode::Status);

    view.handle_key("j");
    view.handle_key("D");
    let commands = view.handle_key("enter");
    assert_eq!(
        commands,
        vec![Command::Discard {
            target: DiscardTarget::Untracked {
                path: "new.txt".into()
            }
        }]
    );
    assert_eq!(view.view_mode(), ViewMode::Status);
}

#[test]
fn test_confirm_focus_resets_after_close() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    view.handle_key("D");
    view.handle_key("tab");
    let Mode::ConfirmDiscard(state) = view.mode() else {
        panic!("expected discard dialog");
    };
    assert_eq!(state.button, ConfirmButton::Cancel);
    assert_eq!(view.handle_key("esc"), vec![]);

    view.handle_key("D");
    let Mode::ConfirmDiscard(state) = view.mode() else {
        panic!("expected discard dialog");
    };
    assert_eq!(state.button, ConfirmButton::Confirm);
    assert_eq!(
        view.handle_key("enter"),
        vec![Command::Discard {
            target: DiscardTarget::Modified {
                path: "a.rs".into()
            }
        }]
    );
}

#[test]
fn test_discard_refuses_folders() {
    let mut view = view_with(tree_of(&[], &[], &["docs/a.md", "docs/b.md"]), vec![]);
    assert_eq!(selected_path(&view).as_deref(), Some("docs/"));
    let commands = view.handle_key("D");
    assert_eq!(commands, vec![Command::Toast("Cannot discard a folder".into())]);
    assert_eq!(view.view_mode(), ViewMode::Status);
}

#[test]
fn test_enter_toggles_untracked_folder() {
    let mut view = view_with(tree_of(&[], &[], &["docs/a.md", "docs/b.md"]), vec![]);
    assert_eq!(view.files_len(), 1);
    view.handle_key("enter");
    assert_eq!(view.files_len(), 3);
    view.handle_key("j");
    assert_eq!(selected_path(&view).as_deref(), Some("docs/a.md"));
    assert_eq!(
        view.handle_key("enter"),
        vec![Command::OpenFile {
            path: "docs/a.md".into()
        }]
    );
}

#[test]
fn test_stash_pop_confirmation() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    assert_eq!(view.handle_key("Z"), vec![Command::Toast("No stashes".into())]);

    view.update(Msg::StatusLoaded {
        tree: tree_of(&[], &["a.rs"], &[]),
        push_status: None,
        stashes: StashList {
            stashes: vec![Stash {
                index: 0,
                stash_ref: "stash@{0}".into(),
                branch: "main".into(),
                message: "WIP".into(),
            }],
        },
    });
    view.handle_key("Z");
    assert_eq!(view.view_mode(), ViewMode::ConfirmStashPop);
    assert_eq!(
        view.handle_key("y"),
        vec![Command::StashPop {
            stash_ref: "stash@{0}".into()
        }]
    );

    let commands = view.update(Msg::StashResult {
        operation: StashOperation::Pop,
        stash_ref: Some("stash@{0}".into()),
        error: None,
    });
    assert!(commands.contains(&Command::Refresh));
    assert_eq!(
        view.status_message.as_ref().map(|m| m.text.as_str()),
        Some("Popped stash@{0}")
    );
}

#[test]
fn test_commit_compose_flow() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    assert_eq!(
        view.handle_key("c"),
        vec![Command::Toast("Nothing staged to commit".into())]
    );

    let mut view = view_with(tree_of(&["a.rs"], &[], &[]), vec![]);
    view.handle_key("c");
    assert_eq!(view.view_mode(), ViewMode::Commit);

    view.handle_key("ctrl+s");
    match view.mode() {
        Mode::Commit(state) => {
            assert_eq!(state.error.as_deref(), Some("Commit message is empty"))
        }
        other => panic!("unexpected mode {:?}", other),
    }

    keys(&mut view, &["F", "i", "x"]);
    let commands = view.handle_key("ctrl+s");
    assert_eq!(
        commands,
        vec![Command::Commit {
            message: "Fix".into(),
            amend: false
        }]
    );

    // Keys are ignored while the commit runs
    view.handle_key("esc");
    assert_eq!(view.view_mode(), ViewMode::Commit);

    let commands = view.update(Msg::CommitSuccess {
        short_hash: "abc1234".into(),
    });
    assert_eq!(view.view_mode(), ViewMode::Status);
    assert!(commands.contains(&Command::Refresh));
    assert!(commands.contains(&Command::LoadRecentCommits));
}

#[test]
fn test_commit_error_keeps_dialog_open() {
    let mut view = view_with(tree_of(&["a.rs"], &[], &[]), vec![]);
    keys(&mut view, &["c", "w", "i", "p", "ctrl+s"]);
    view.update(Msg::CommitError("hook failed".into()));
    match view.mode() {
        Mode::Commit(state) => {
            assert_eq!(state.error.as_deref(), Some("hook failed"));
            assert!(!state.in_progress);
            assert_eq!(state.message, "wip");
        }
        other => panic!("unexpected mode {:?}", other),
    }
}

#[test]
fn test_history_search() {
    let mut list = commits(&["c1", "c2", "c3"]);
    list[0].subject = "Add parser".into();
    list[1].subject = "Fix bug".into();
    list[2].subject = "parser cleanup".into();
    let mut view = view_with(FileTree::default(), list);

    keys(&mut view, &["/", "P", "a", "r", "s", "e", "r"]);
    match view.overlay() {
        Some(Overlay::HistorySearch(search)) => assert_eq!(search.matches, vec![0, 2]),
        other => panic!("unexpected overlay {:?}", other),
    }

    view.handle_key("enter");
    assert!(view.overlay().is_none());
    assert_eq!(view.selected_commit_index(), Some(0));

    view.handle_key("n");
    assert_eq!(view.selected_commit_index(), Some(2));
    view.handle_key("n");
    assert_eq!(view.selected_commit_index(), Some(0));
    view.handle_key("N");
    assert_eq!(view.selected_commit_index(), Some(2));
}

#[test]
fn test_author_filter_and_stale_results() {
    let mut list = commits(&["c1", "c2"]);
    list[0].author = "Ada".into();
    let mut view = view_with(FileTree::default(), list);

    let commands = view.handle_key("f");
    let filter = CommitFilter {
        author: Some("Ada".into()),
        path: None,
    };
    assert_eq!(
        commands,
        vec![Command::LoadFilteredCommits {
            filter: filter.clone()
        }]
    );

    view.update(Msg::FilteredCommitsLoaded {
        filter: CommitFilter {
            author: Some("Bob".into()),
            path: None,
        },
        commits: commits(&["x"]),
    });
    assert!(!view.history.filter_active);

    view.update(Msg::FilteredCommitsLoaded {
        filter,
        commits: commits(&["c1"]),
    });
    assert!(view.history.filter_active);
    assert_eq!(view.active_commits().len(), 1);

    view.handle_key("F");
    assert!(!view.history.filter_active);
    assert_eq!(view.active_commits().len(), 2);
    assert_eq!(view.selected_commit().map(|c| c.hash.as_str()), Some("c1"));
}

#[test]
fn test_branch_picker_checkout() {
    let mut view = view_with(FileTree::default(), commits(&["c1"]));
    assert_eq!(view.handle_key("b"), vec![Command::LoadBranches]);

    let mut main = Branch::new("main");
    main.is_current = true;
    let mut remote = Branch::new("origin/feature");
    remote.is_remote = true;
    view.update(Msg::BranchesLoaded(vec![main, remote]));

    view.handle_key("enter");
    match view.mode() {
        Mode::BranchPicker(state) => assert_eq!(state.error.as_deref(), Some("Already on main")),
        other => panic!("unexpected mode {:?}", other),
    }

    view.handle_key("j");
    assert_eq!(
        view.handle_key("enter"),
        vec![Command::Checkout {
            name: "feature".into()
        }]
    );

    let commands = view.update(Msg::CheckoutSuccess {
        name: "feature".into(),
    });
    assert_eq!(view.view_mode(), ViewMode::Status);
    assert!(commands.contains(&Command::LoadRecentCommits));
    assert!(view.active_commits().is_empty());
}

#[test]
fn test_remote_indicator_clears_by_generation() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    assert_eq!(view.handle_key("f"), vec![Command::Fetch]);
    assert_eq!(view.remote_status, Some(RemoteStatus::Running(RemoteOp::Fetch)));

    let commands = view.update(Msg::FetchSuccess {
        output: String::new(),
    });
    let Some(Command::ScheduleClear {
        indicator,
        generation,
    }) = commands.last().cloned()
    else {
        panic!("no clear scheduled: {:?}", commands);
    };
    assert_eq!(indicator, Indicator::Remote);

    view.update(Msg::ClearIndicator {
        indicator,
        generation: generation - 1,
    });
    assert!(view.remote_status.is_some());

    view.update(Msg::ClearIndicator {
        indicator,
        generation,
    });
    assert!(view.remote_status.is_none());
}

#[test]
fn test_remote_error_is_sticky_until_next_attempt() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    view.handle_key("p");
    let commands = view.update(Msg::PullError("conflict".into()));
    assert_eq!(commands, vec![]);
    assert_eq!(
        view.remote_status,
        Some(RemoteStatus::Failed(RemoteOp::Pull, "conflict".into()))
    );

    view.handle_key("r");
    assert!(view.remote_status.is_none());
}

#[test]
fn test_full_diff_opens_and_returns() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    let commands = view.handle_key("d");
    assert!(matches!(commands[0], Command::LoadFullDiff { .. }));
    assert_eq!(view.view_mode(), ViewMode::Diff);
    assert!(view.frame().full_diff);

    view.handle_key("q");
    assert_eq!(view.view_mode(), ViewMode::Status);
    assert_eq!(view.active_pane(), FocusPane::Sidebar);
}

#[test]
fn test_graph_toggle_saves_preference() {
    let mut view = view_with(FileTree::default(), commits(&["c1", "c2"]));
    let commands = view.handle_key("v");
    assert_eq!(
        commands,
        vec![Command::SavePreferences(Preferences {
            sidebar_width: None,
            diff_mode: Some(gitpane_diff::DiffViewMode::Unified),
            graph_enabled: Some(true),
        })]
    );
    assert_eq!(view.graph.len(), 2);
}

#[test]
fn test_sidebar_toggle_restores_focus() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    view.handle_key("\\");
    assert!(!view.sidebar_visible);
    assert!(view.hitmap().hit_test(0, 5).is_some_and(|r| r.id == RegionId::DiffPane));

    view.handle_key("\\");
    assert!(view.sidebar_visible);
    assert_eq!(view.active_pane(), FocusPane::Sidebar);
}

// === Mouse ===

#[test]
fn test_click_selects_sidebar_row() {
    let mut view = view_with(tree_of(&["a.rs", "b.rs"], &[], &[]), vec![]);
    let now = Instant::now();
    // Title at y=1, section header at y=2, entries from y=3
    let row = view.hitmap().hit_test(5, 4).unwrap();
    assert_eq!((row.id, row.data), (RegionId::SidebarRow, 1));

    view.handle_mouse(&MouseInput::press(5, 4), now);
    assert_eq!(view.cursor(), 1);
}

#[test]
fn test_double_click_opens_file() {
    let mut view = view_with(tree_of(&["a.rs"], &[], &[]), vec![]);
    let now = Instant::now();
    view.handle_mouse(&MouseInput::press(5, 3), now);
    view.handle_mouse(&MouseInput::release(5, 3), now);
    let commands = view.handle_mouse(
        &MouseInput::press(5, 3),
        now + Duration::from_millis(100),
    );
    assert!(commands.contains(&Command::OpenFile {
        path: "a.rs".into()
    }));
}

#[test]
fn test_divider_drag_resizes_and_saves() {
    let mut view = view_with(FileTree::default(), vec![]);
    let divider = view.frame().panes.divider;
    let start = view.frame().panes.sidebar_width;
    let now = Instant::now();

    view.handle_mouse(&MouseInput::press(divider.x, 5), now);
    view.handle_mouse(&MouseInput::drag(divider.x + 10, 5), now);
    assert_eq!(view.frame().panes.sidebar_width, start + 10);

    let commands = view.handle_mouse(&MouseInput::release(divider.x + 10, 5), now);
    assert_eq!(
        commands,
        vec![Command::SavePreferences(Preferences {
            sidebar_width: Some(start + 10),
            diff_mode: Some(gitpane_diff::DiffViewMode::Unified),
            graph_enabled: Some(false),
        })]
    );
}

#[test]
fn test_modal_buttons_and_backdrop() {
    let mut view = view_with(tree_of(&[], &["a.rs"], &[]), vec![]);
    let now = Instant::now();

    view.handle_key("D");
    view.handle_mouse(&MouseInput::press(0, 0), now);
    assert_eq!(view.view_mode(), ViewMode::Status);

    view.handle_key("D");
    let cancel = view.frame().modal.as_ref().unwrap().buttons[1];
    assert_eq!(view.handle_mouse(&MouseInput::press(cancel.x, cancel.y), now), vec![]);
    assert_eq!(view.view_mode(), ViewMode::Status);

    view.handle_key("D");
    let confirm = view.frame().modal.as_ref().unwrap().buttons[0];
    let commands = view.handle_mouse(
        &MouseInput::press(confirm.x, confirm.y),
        now + Duration::from_secs(1),
    );
    assert_eq!(
        commands,
        vec![Command::Discard {
            target: DiscardTarget::Modified {
                path: "a.rs".into()
            }
        }]
    );
}

#[test]
fn test_wheel_over_sidebar_moves_cursor() {
    let mut view = view_with(
        tree_of(&[], &["a.rs", "b.rs", "c.rs", "d.rs", "e.rs"], &[]),
        vec![],
    );
    view.handle_mouse(
        &MouseInput::wheel(crate::input::MouseButton::WheelDown, 5, 3),
        Instant::now(),
    );
    assert_eq!(view.cursor(), 3);
}

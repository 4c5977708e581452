//! Layout pass: geometry of every pane, row and button for the next frame
//!
//! Painting reads this geometry and the hit map is filled from it, so a
//! click always lands on what was drawn there.

use super::mode::{Mode, Overlay};
use super::StatusView;
use crate::hitmap::RegionId;
use crate::layout::{self, centered_rect, PaneLayout};
use crate::model::Bucket;
use gitpane_vcs::Commit;
use ratatui::layout::Rect;

/// Stash rows shown under the commits
pub const MAX_STASH_ROWS: u16 = 3;
/// Body lines shown in the commit preview header
pub const MAX_PREVIEW_BODY_LINES: usize = 4;

/// A row in the files region of the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRow {
    Header(Bucket, usize),
    /// Cursor index of the entry
    Entry(usize),
    /// Shown when nothing changed
    Clean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidebarGeometry {
    pub inner: Rect,
    pub title: Rect,
    pub message: Rect,
    pub files: Rect,
    pub remote: Rect,
    pub commits_header: Rect,
    pub commits: Rect,
    pub stashes: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalGeometry {
    pub rect: Rect,
    pub inner: Rect,
    /// Single-line input or message area
    pub body: Rect,
    /// Rows of a list (menu entries, branches, matches)
    pub list: Rect,
    pub buttons: Vec<Rect>,
    /// Error or hint line
    pub footer: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameLayout {
    pub area: Rect,
    pub full_diff: bool,
    pub panes: PaneLayout,
    pub sidebar: SidebarGeometry,
    pub file_rows: Vec<FileRow>,
    pub diff_inner: Rect,
    /// Diff rows under the pane's header lines
    pub diff_content: Rect,
    /// File list of the commit preview
    pub preview_files: Rect,
    pub modal: Option<ModalGeometry>,
}

fn inset(rect: Rect) -> Rect {
    Rect::new(
        rect.x.saturating_add(1),
        rect.y.saturating_add(1),
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    )
}

/// Take `height` rows off the top of `rest`
fn take_rows(rest: &mut Rect, height: u16) -> Rect {
    let height = height.min(rest.height);
    let taken = Rect::new(rest.x, rest.y, rest.width, height);
    rest.y += height;
    rest.height -= height;
    taken
}

/// Non-empty body lines shown in the preview header
pub fn preview_body_lines(commit: &Commit) -> Vec<&str> {
    commit
        .body
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .take(MAX_PREVIEW_BODY_LINES)
        .collect()
}

/// Rows above the preview file list: badge, subject, body, separator, "Files (n)"
pub fn preview_header_rows(commit: &Commit) -> u16 {
    let body = preview_body_lines(commit).len() as u16;
    2 + body + 2
}

pub fn file_rows(view: &StatusView) -> Vec<FileRow> {
    let mut rows = Vec::new();
    let mut index = 0;
    let entries = view.tree.all_entries();
    for bucket in Bucket::ALL {
        let count = entries.iter().filter(|e| e.bucket == bucket).count();
        if count == 0 {
            continue;
        }
        let files = if bucket == Bucket::Untracked {
            view.tree.untracked_file_count()
        } else {
            view.tree.bucket(bucket).len()
        };
        rows.push(FileRow::Header(bucket, files));
        for _ in 0..count {
            rows.push(FileRow::Entry(index));
            index += 1;
        }
    }
    if rows.is_empty() {
        rows.push(FileRow::Clean);
    }
    rows
}

fn sidebar_geometry(view: &StatusView, pane: Rect, file_rows: usize) -> SidebarGeometry {
    let inner = inset(pane);
    let mut rest = inner;
    let title = take_rows(&mut rest, 1);
    let message = take_rows(&mut rest, u16::from(view.status_message.is_some()));

    let stash_rows = if view.stashes.is_empty() {
        0
    } else {
        1 + (view.stashes.count() as u16).min(MAX_STASH_ROWS)
    };
    let remote_rows = u16::from(view.remote_status.is_some());
    let available = rest.height.saturating_sub(1 + remote_rows + stash_rows);

    let commits_wanted = (view.history.active().len() as u16).max(1);
    let commits_min = commits_wanted.min(available / 2);
    let files_height = (file_rows as u16).min(available.saturating_sub(commits_min));

    let files = take_rows(&mut rest, files_height);
    let remote = take_rows(&mut rest, remote_rows);
    let commits_header = take_rows(&mut rest, 1);
    let h = rest.height.saturating_sub(stash_rows);
    let commits = take_rows(&mut rest, h);
    let stashes = take_rows(&mut rest, stash_rows);

    SidebarGeometry {
        inner,
        title,
        message,
        files,
        remote,
        commits_header,
        commits,
        stashes,
    }
}

fn modal_geometry(view: &StatusView, area: Rect) -> Option<ModalGeometry> {
    let width = |w: u16| w.min(area.width.saturating_sub(4));
    let height = |h: u16| h.min(area.height.saturating_sub(2));

    if let Some(overlay) = &view.overlay {
        return Some(match overlay {
            Overlay::HistorySearch(_) => {
                let rect = centered_rect(width(72), height(18), area);
                let inner = inset(rect);
                let mut rest = inner;
                let body = take_rows(&mut rest, 1);
                take_rows(&mut rest, 1);
                let footer_y = rest.bottom().saturating_sub(1);
                let h = rest.height.saturating_sub(1);
                let list = take_rows(&mut rest, h);
                ModalGeometry {
                    rect,
                    inner,
                    body,
                    list,
                    footer: Rect::new(inner.x, footer_y, inner.width, 1),
                    ..ModalGeometry::default()
                }
            }
            Overlay::PathFilter { .. } => {
                let rect = centered_rect(width(60), height(6), area);
                let inner = inset(rect);
                let mut rest = inner;
                take_rows(&mut rest, 1);
                let body = take_rows(&mut rest, 1);
                take_rows(&mut rest, 1);
                let footer = take_rows(&mut rest, 1);
                ModalGeometry {
                    rect,
                    inner,
                    body,
                    footer,
                    ..ModalGeometry::default()
                }
            }
        });
    }

    match &view.mode {
        Mode::Status | Mode::Diff(_) => None,
        Mode::Commit(_) => {
            let rect = centered_rect(width(72), height(16), area);
            let inner = inset(rect);
            let mut rest = inner;
            let h = rest.height.saturating_sub(2);
            let body = take_rows(&mut rest, h);
            let footer = take_rows(&mut rest, 1);
            let button_row = take_rows(&mut rest, 1);
            let button_width = 12.min(button_row.width);
            let button = Rect::new(
                button_row.right().saturating_sub(button_width),
                button_row.y,
                button_width,
                button_row.height,
            );
            Some(ModalGeometry {
                rect,
                inner,
                body,
                buttons: vec![button],
                footer,
                ..ModalGeometry::default()
            })
        }
        Mode::PushMenu { .. } => {
            let options = super::push_options().len() as u16;
            let rect = centered_rect(width(48), height(options + 5), area);
            let inner = inset(rect);
            let mut rest = inner;
            let body = take_rows(&mut rest, 1);
            take_rows(&mut rest, 1);
            let list = take_rows(&mut rest, options);
            let buttons = (0..list.height)
                .map(|i| Rect::new(list.x, list.y + i, list.width, 1))
                .collect();
            let footer = take_rows(&mut rest, 1);
            Some(ModalGeometry {
                rect,
                inner,
                body,
                list,
                buttons,
                footer,
            })
        }
        Mode::ConfirmDiscard(_) | Mode::ConfirmStashPop(_) => {
            let rect = centered_rect(width(64), height(8), area);
            let inner = inset(rect);
            let mut rest = inner;
            let body = take_rows(&mut rest, 2);
            take_rows(&mut rest, 1);
            let row = take_rows(&mut rest, 1);
            let footer = take_rows(&mut rest, 1);
            let confirm_width = 13.min(row.width);
            let cancel_width = 12.min(row.width.saturating_sub(confirm_width));
            let start = row.x + row.width.saturating_sub(confirm_width + 2 + cancel_width) / 2;
            let confirm = Rect::new(start, row.y, confirm_width, row.height);
            let cancel = Rect::new(
                (confirm.right() + 2).min(row.right()),
                row.y,
                cancel_width,
                row.height,
            );
            Some(ModalGeometry {
                rect,
                inner,
                body,
                buttons: vec![confirm, cancel],
                footer,
                ..ModalGeometry::default()
            })
        }
        Mode::BranchPicker(state) => {
            let rows = (state.branches.len() as u16).max(1);
            let rect = centered_rect(width(64), height(rows + 4).max(6), area);
            let inner = inset(rect);
            let mut rest = inner;
            let h = rest.height.saturating_sub(1);
            let list = take_rows(&mut rest, h);
            let footer = take_rows(&mut rest, 1);
            Some(ModalGeometry {
                rect,
                inner,
                list,
                footer,
                ..ModalGeometry::default()
            })
        }
    }
}

pub fn compute(view: &StatusView) -> FrameLayout {
    let area = Rect::new(0, 0, view.width, view.height);
    let file_rows = file_rows(view);
    let modal = modal_geometry(view, area);

    if let Mode::Diff(_) = view.mode {
        let diff_inner = inset(area);
        let mut rest = diff_inner;
        take_rows(&mut rest, 2);
        return FrameLayout {
            area,
            full_diff: true,
            diff_inner,
            diff_content: rest,
            file_rows,
            modal,
            ..FrameLayout::default()
        };
    }

    let panes = layout::compute(area, view.sidebar_visible, view.sidebar_width);
    let sidebar = if view.sidebar_visible {
        sidebar_geometry(view, panes.sidebar, file_rows.len())
    } else {
        SidebarGeometry::default()
    };

    let diff_inner = inset(panes.diff);
    let mut rest = diff_inner;
    let preview_files = match &view.preview_commit {
        Some(commit) => {
            take_rows(&mut rest, preview_header_rows(commit));
            rest
        }
        None => Rect::default(),
    };
    let mut content = diff_inner;
    take_rows(&mut content, 2);

    FrameLayout {
        area,
        full_diff: false,
        panes,
        sidebar,
        file_rows,
        diff_inner,
        diff_content: content,
        preview_files,
        modal,
    }
}

/// Adjust `offset` so `index` is inside a window of `height` rows
pub fn ensure_visible(offset: usize, index: usize, height: usize, len: usize) -> usize {
    if height == 0 {
        return 0;
    }
    let mut offset = offset;
    if index < offset {
        offset = index;
    } else if index >= offset + height {
        offset = index + 1 - height;
    }
    offset.min(len.saturating_sub(height))
}

impl StatusView {
    /// Recompute geometry, keep the cursor on screen and re-register hit regions
    pub(crate) fn relayout(&mut self) {
        self.frame = compute(self);
        self.ensure_cursor_visible();
        self.register_hits();
    }

    fn ensure_cursor_visible(&mut self) {
        let frame = &self.frame;
        let files_height = usize::from(frame.sidebar.files.height);
        let rows = frame.file_rows.len();
        if let Some(row) = frame
            .file_rows
            .iter()
            .position(|r| *r == FileRow::Entry(self.cursor))
        {
            // Keep the section header in view with its first entry
            let target = match row.checked_sub(1).map(|r| frame.file_rows[r]) {
                Some(FileRow::Header(..)) if row <= self.scroll_off => row - 1,
                _ => row,
            };
            self.scroll_off = ensure_visible(self.scroll_off, target, files_height, rows);
        } else {
            self.scroll_off = self.scroll_off.min(rows.saturating_sub(files_height));
        }

        let commits_height = usize::from(frame.sidebar.commits.height);
        let commits = self.history.active().len();
        self.commit_scroll_off = match self.selected_commit_index() {
            Some(i) => ensure_visible(self.commit_scroll_off, i, commits_height, commits),
            None => self
                .commit_scroll_off
                .min(commits.saturating_sub(commits_height)),
        };

        let preview_height = usize::from(frame.preview_files.height);
        if let Some(commit) = &self.preview_commit {
            self.preview_scroll = ensure_visible(
                self.preview_scroll,
                self.preview_cursor,
                preview_height,
                commit.files.len(),
            );
        }

        if let Some(modal) = &frame.modal {
            let list_height = usize::from(modal.list.height);
            match (&mut self.mode, &self.overlay) {
                (_, Some(Overlay::HistorySearch(search))) => {
                    self.history_scroll = ensure_visible(
                        self.history_scroll,
                        search.selected,
                        list_height,
                        search.matches.len(),
                    );
                }
                (Mode::BranchPicker(state), None) => {
                    state.scroll = ensure_visible(
                        state.scroll,
                        state.cursor,
                        list_height,
                        state.branches.len(),
                    );
                }
                _ => {}
            }
        }
    }

    fn register_hits(&mut self) {
        self.hitmap.clear();
        let frame = &self.frame;

        if frame.full_diff {
            self.hitmap.add(RegionId::DiffPane, frame.area, 0);
        } else {
            if self.sidebar_visible {
                self.hitmap.add(RegionId::Sidebar, frame.panes.sidebar, 0);
                let files = frame.sidebar.files;
                for (offset, row) in frame
                    .file_rows
                    .iter()
                    .skip(self.scroll_off)
                    .take(usize::from(files.height))
                    .enumerate()
                {
                    if let FileRow::Entry(index) = row {
                        let y = files.y + offset as u16;
                        self.hitmap
                            .add_rect(RegionId::SidebarRow, files.x, y, files.width, 1, *index);
                    }
                }
                let commits = frame.sidebar.commits;
                let files_len = self.tree.len();
                let visible = self
                    .history
                    .active()
                    .len()
                    .saturating_sub(self.commit_scroll_off)
                    .min(usize::from(commits.height));
                for offset in 0..visible {
                    let y = commits.y + offset as u16;
                    let index = files_len + self.commit_scroll_off + offset;
                    self.hitmap
                        .add_rect(RegionId::SidebarRow, commits.x, y, commits.width, 1, index);
                }
            }

            self.hitmap.add(RegionId::DiffPane, frame.panes.diff, 0);
            if let Some(commit) = &self.preview_commit {
                let list = frame.preview_files;
                let visible = commit
                    .files
                    .len()
                    .saturating_sub(self.preview_scroll)
                    .min(usize::from(list.height));
                for offset in 0..visible {
                    self.hitmap.add_rect(
                        RegionId::PreviewFile,
                        list.x,
                        list.y + offset as u16,
                        list.width,
                        1,
                        self.preview_scroll + offset,
                    );
                }
            }

            if self.sidebar_visible {
                self.hitmap.add(RegionId::Divider, frame.panes.divider, 0);
            }
        }

        let Some(modal) = &frame.modal else {
            return;
        };
        self.hitmap.add(RegionId::ModalBackdrop, frame.area, 0);
        self.hitmap.add(RegionId::Modal, modal.rect, 0);
        for (i, button) in modal.buttons.iter().enumerate() {
            self.hitmap.add(RegionId::ModalButton, *button, i);
        }
        let (len, scroll) = match (&self.mode, &self.overlay) {
            (_, Some(Overlay::HistorySearch(search))) => {
                (search.matches.len(), self.history_scroll)
            }
            (Mode::BranchPicker(state), None) => (state.branches.len(), state.scroll),
            _ => (0, 0),
        };
        let visible = len
            .saturating_sub(scroll)
            .min(usize::from(modal.list.height));
        for offset in 0..visible {
            self.hitmap.add_rect(
                RegionId::ListRow,
                modal.list.x,
                modal.list.y + offset as u16,
                modal.list.width,
                1,
                scroll + offset,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ensure_visible() {
        assert_eq!(ensure_visible(0, 3, 5, 10), 0);
        assert_eq!(ensure_visible(0, 7, 5, 10), 3);
        assert_eq!(ensure_visible(6, 2, 5, 10), 2);
        assert_eq!(ensure_visible(8, 9, 5, 10), 5);
        assert_eq!(ensure_visible(4, 0, 0, 10), 0);
    }

    #[test]
    fn test_preview_header_rows() {
        let mut commit = Commit::new("abc", "subject");
        assert_eq!(preview_header_rows(&commit), 4);
        commit.body = "one\n\ntwo\nthree\nfour\nfive".into();
        assert_eq!(preview_body_lines(&commit), vec!["one", "two", "three", "four"]);
        assert_eq!(preview_header_rows(&commit), 8);
    }
}

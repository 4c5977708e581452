//! Mouse routing: hit regions to view actions

use super::mode::{ConfirmButton, FocusPane, Mode, Overlay};
use super::keys::widest_line;
use super::StatusView;
use crate::command::Command;
use crate::hitmap::{HitRegion, MouseAction, RegionId};
use crate::input::MouseInput;
use crate::layout::{clamp_sidebar_width, DIVIDER_WIDTH};
use std::time::Instant;

/// Direction of a wheel scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wheel {
    Up,
    Down,
    Left,
    Right,
}

impl StatusView {
    pub(crate) fn route_mouse(&mut self, input: &MouseInput, now: Instant) -> Vec<Command> {
        let hit = self.hitmap.hit_test(input.x, input.y);
        let action = self.mouse.classify(input, hit, now);
        log::trace!("Mouse {:?} -> {:?}", input, action);

        match action {
            MouseAction::Click(region) => self.click(region, input),
            MouseAction::DoubleClick(region) => self.double_click(region),
            MouseAction::ScrollUp { region, delta } => self.wheel(region, Wheel::Up, delta),
            MouseAction::ScrollDown { region, delta } => self.wheel(region, Wheel::Down, delta),
            MouseAction::ScrollLeft { region, delta } => self.wheel(region, Wheel::Left, delta),
            MouseAction::ScrollRight { region, delta } => self.wheel(region, Wheel::Right, delta),
            MouseAction::Drag { dx, .. } => {
                self.drag_divider(dx);
                vec![]
            }
            MouseAction::DragEnd => {
                log::debug!("Sidebar resized to {}", self.sidebar_width);
                vec![Command::SavePreferences(self.preferences())]
            }
            MouseAction::None => vec![],
        }
    }

    fn click(&mut self, region: HitRegion, input: &MouseInput) -> Vec<Command> {
        match region.id {
            RegionId::SidebarRow => {
                self.active_pane = FocusPane::Sidebar;
                self.set_cursor(region.data)
            }
            RegionId::Sidebar => {
                self.active_pane = FocusPane::Sidebar;
                vec![]
            }
            RegionId::DiffPane => {
                if self.diff_target_loaded() {
                    self.active_pane = FocusPane::Diff;
                }
                vec![]
            }
            RegionId::PreviewFile => {
                self.preview_cursor = region.data;
                self.active_pane = FocusPane::Diff;
                vec![]
            }
            RegionId::Divider => {
                let start = i32::from(self.frame.panes.sidebar_width);
                self.mouse
                    .start_drag(input.x, input.y, RegionId::Divider, start);
                vec![]
            }
            RegionId::ModalBackdrop => self.dismiss_modal(),
            RegionId::Modal => vec![],
            RegionId::ModalButton => self.press_button(region.data),
            RegionId::ListRow => {
                self.select_list_row(region.data);
                vec![]
            }
        }
    }

    fn double_click(&mut self, region: HitRegion) -> Vec<Command> {
        match region.id {
            RegionId::SidebarRow => {
                self.active_pane = FocusPane::Sidebar;
                let mut commands = self.set_cursor(region.data);
                commands.extend(self.route_key("enter"));
                commands
            }
            RegionId::PreviewFile => {
                self.preview_cursor = region.data;
                let Some(commit) = self.preview_commit.clone() else {
                    return vec![];
                };
                self.open_preview_file(&commit, region.data)
            }
            RegionId::ListRow => {
                self.select_list_row(region.data);
                self.route_key("enter")
            }
            // A second click on a button or the backdrop acts like the first
            RegionId::ModalButton | RegionId::ModalBackdrop => self.click(
                region,
                &MouseInput::press(region.rect.x, region.rect.y),
            ),
            _ => vec![],
        }
    }

    /// Close whatever dialog is open, as `esc` would
    fn dismiss_modal(&mut self) -> Vec<Command> {
        if self.overlay.is_some() || self.mode.is_modal() {
            self.route_key("esc")
        } else {
            vec![]
        }
    }

    fn press_button(&mut self, index: usize) -> Vec<Command> {
        match &mut self.mode {
            Mode::Commit(_) => self.route_key("ctrl+s"),
            Mode::PushMenu { focus } => {
                *focus = index;
                self.route_key("enter")
            }
            Mode::ConfirmDiscard(state) => {
                state.button = ConfirmButton::from_index(index);
                self.route_key("enter")
            }
            Mode::ConfirmStashPop(state) => {
                state.button = ConfirmButton::from_index(index);
                self.route_key("enter")
            }
            _ => vec![],
        }
    }

    fn select_list_row(&mut self, index: usize) {
        if let Some(Overlay::HistorySearch(search)) = &mut self.overlay {
            search.selected = index.min(search.matches.len().saturating_sub(1));
            return;
        }
        if let Mode::BranchPicker(state) = &mut self.mode {
            state.cursor = index.min(state.branches.len().saturating_sub(1));
        }
    }

    fn drag_divider(&mut self, dx: i32) {
        if self.mouse.drag_region() != Some(RegionId::Divider) {
            return;
        }
        let Some(start) = self.mouse.drag_start_value() else {
            return;
        };
        let available = self.width.saturating_sub(DIVIDER_WIDTH);
        let wanted = (start + dx).clamp(0, i32::from(u16::MAX)) as u16;
        self.sidebar_width = clamp_sidebar_width(wanted.max(1), available);
    }

    fn wheel(&mut self, region: Option<HitRegion>, wheel: Wheel, delta: usize) -> Vec<Command> {
        let Some(region) = region else {
            return vec![];
        };
        match region.id {
            RegionId::Sidebar | RegionId::SidebarRow => match wheel {
                Wheel::Up => self.move_cursor(-(delta as isize)),
                Wheel::Down => self.move_cursor(delta as isize),
                Wheel::Left | Wheel::Right => vec![],
            },
            RegionId::DiffPane | RegionId::PreviewFile => {
                self.scroll_right_pane(wheel, delta);
                vec![]
            }
            RegionId::ListRow | RegionId::Modal => {
                self.scroll_list(wheel, delta);
                vec![]
            }
            _ => vec![],
        }
    }

    fn scroll_right_pane(&mut self, wheel: Wheel, delta: usize) {
        if let Mode::Diff(state) = &self.mode {
            let max = self.full_diff_max_scroll(state);
            let max_h = widest_line(state.diff.as_ref(), state.external.as_deref());
            if let Mode::Diff(state) = &mut self.mode {
                scroll_by(&mut state.scroll, &mut state.h_scroll, wheel, delta, (max, max_h));
            }
            return;
        }
        if let Some(commit) = &self.preview_commit {
            let last = commit.files.len().saturating_sub(1);
            self.preview_cursor = match wheel {
                Wheel::Up => self.preview_cursor.saturating_sub(delta),
                Wheel::Down => (self.preview_cursor + delta).min(last),
                Wheel::Left | Wheel::Right => self.preview_cursor,
            };
            return;
        }
        let max = (self.inline_max_scroll(), self.inline_max_h_scroll());
        scroll_by(
            &mut self.diff_pane_scroll,
            &mut self.diff_pane_h_scroll,
            wheel,
            delta,
            max,
        );
    }

    fn scroll_list(&mut self, wheel: Wheel, delta: usize) {
        let step = |cursor: usize, last: usize| match wheel {
            Wheel::Up => cursor.saturating_sub(delta),
            Wheel::Down => (cursor + delta).min(last),
            Wheel::Left | Wheel::Right => cursor,
        };
        if let Some(Overlay::HistorySearch(search)) = &mut self.overlay {
            search.selected = step(search.selected, search.matches.len().saturating_sub(1));
            return;
        }
        if let Mode::BranchPicker(state) = &mut self.mode {
            state.cursor = step(state.cursor, state.branches.len().saturating_sub(1));
        }
    }
}

/// Scroll within `(max_scroll, max_h_scroll)`
fn scroll_by(
    scroll: &mut usize,
    h_scroll: &mut usize,
    wheel: Wheel,
    delta: usize,
    (max, max_h): (usize, usize),
) {
    match wheel {
        Wheel::Up => *scroll = scroll.saturating_sub(delta),
        Wheel::Down => *scroll = (*scroll + delta).min(max),
        Wheel::Left => *h_scroll = h_scroll.saturating_sub(delta),
        Wheel::Right => *h_scroll = (*h_scroll + delta).min(max_h),
    }
}

//! Mouse hit regions and pointer event classification
//!
//! Regions are re-registered by every layout pass. Lookups walk the list
//! backwards so whatever was added last (the divider, a modal) wins where
//! rectangles overlap.

use crate::input::{MouseButton, MouseInput, MouseKind};
use ratatui::layout::{Position, Rect};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    /// Whole sidebar pane
    Sidebar,
    /// A file or commit row; data is the cursor index
    SidebarRow,
    /// Right pane
    DiffPane,
    /// A file in the commit preview; data is the file index
    PreviewFile,
    /// Column between the panes
    Divider,
    /// Everything outside an open modal
    ModalBackdrop,
    /// The modal body
    Modal,
    /// A modal button or menu entry; data is its index
    ModalButton,
    /// A row of a modal list (branches, search matches); data is its index
    ListRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub id: RegionId,
    pub rect: Rect,
    pub data: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<HitRegion>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn add_rect(&mut self, id: RegionId, x: u16, y: u16, w: u16, h: u16, data: usize) {
        if w == 0 || h == 0 {
            return;
        }
        self.regions.push(HitRegion {
            id,
            rect: Rect::new(x, y, w, h),
            data,
        });
    }

    pub fn add(&mut self, id: RegionId, rect: Rect, data: usize) {
        self.add_rect(id, rect.x, rect.y, rect.width, rect.height, data);
    }

    /// Topmost region containing the point
    pub fn hit_test(&self, x: u16, y: u16) -> Option<HitRegion> {
        let point = Position::new(x, y);
        self.regions
            .iter()
            .rev()
            .find(|r| r.rect.contains(point))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Click(HitRegion),
    DoubleClick(HitRegion),
    ScrollUp { region: Option<HitRegion>, delta: usize },
    ScrollDown { region: Option<HitRegion>, delta: usize },
    ScrollLeft { region: Option<HitRegion>, delta: usize },
    ScrollRight { region: Option<HitRegion>, delta: usize },
    /// Offset from where the drag started
    Drag { dx: i32, dy: i32 },
    DragEnd,
    None,
}

#[derive(Debug, Clone, Copy)]
struct LastClick {
    at: Instant,
    x: u16,
    y: u16,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    x: u16,
    y: u16,
    region: RegionId,
    start_value: i32,
}

/// Turns raw pointer events into clicks, double-clicks, scrolls and drags
#[derive(Debug, Clone)]
pub struct MouseClassifier {
    double_click: Duration,
    scroll_delta: usize,
    last_clicks: HashMap<RegionId, LastClick>,
    drag: Option<DragState>,
}

impl Default for MouseClassifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(400), 3)
    }
}

impl MouseClassifier {
    pub fn new(double_click: Duration, scroll_delta: usize) -> Self {
        Self {
            double_click,
            scroll_delta: scroll_delta.max(1),
            last_clicks: HashMap::new(),
            drag: None,
        }
    }

    pub fn classify(
        &mut self,
        input: &MouseInput,
        hit: Option<HitRegion>,
        now: Instant,
    ) -> MouseAction {
        let delta = self.scroll_delta;
        match input.kind {
            MouseKind::Wheel => match input.button {
                MouseButton::WheelUp => MouseAction::ScrollUp { region: hit, delta },
                MouseButton::WheelDown => MouseAction::ScrollDown { region: hit, delta },
                MouseButton::WheelLeft => MouseAction::ScrollLeft { region: hit, delta },
                MouseButton::WheelRight => MouseAction::ScrollRight { region: hit, delta },
                _ => MouseAction::None,
            },
            MouseKind::Press if input.button == MouseButton::Left => {
                let Some(region) = hit else {
                    return MouseAction::None;
                };
                let double = self.last_clicks.get(&region.id).is_some_and(|last| {
                    last.x == input.x
                        && last.y == input.y
                        && now.saturating_duration_since(last.at) <= self.double_click
                });
                if double {
                    self.last_clicks.remove(&region.id);
                    MouseAction::DoubleClick(region)
                } else {
                    self.last_clicks.insert(
                        region.id,
                        LastClick {
                            at: now,
                            x: input.x,
                            y: input.y,
                        },
                    );
                    MouseAction::Click(region)
                }
            }
            MouseKind::Motion => match self.drag {
                Some(drag) => MouseAction::Drag {
                    dx: i32::from(input.x) - i32::from(drag.x),
                    dy: i32::from(input.y) - i32::from(drag.y),
                },
                None => MouseAction::None,
            },
            MouseKind::Release => {
                if self.drag.take().is_some() {
                    MouseAction::DragEnd
                } else {
                    MouseAction::None
                }
            }
            MouseKind::Press => MouseAction::None,
        }
    }

    pub fn start_drag(&mut self, x: u16, y: u16, region: RegionId, start_value: i32) {
        self.drag = Some(DragState {
            x,
            y,
            region,
            start_value,
        });
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_region(&self) -> Option<RegionId> {
        self.drag.map(|d| d.region)
    }

    pub fn drag_start_value(&self) -> Option<i32> {
        self.drag.map(|d| d.start_value)
    }
}

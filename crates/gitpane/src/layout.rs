//! Pane geometry for the status view
//!
//! Pure functions of the terminal size and the persisted sidebar width, so
//! the same numbers feed painting and hit-region registration.

use ratatui::layout::Rect;

pub const DIVIDER_WIDTH: u16 = 1;
pub const MIN_SIDEBAR_WIDTH: u16 = 25;
pub const MIN_DIFF_WIDTH: u16 = 40;
/// Share of the available width a fresh sidebar takes, in percent
pub const DEFAULT_SIDEBAR_PERCENT: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneLayout {
    /// Empty when the sidebar is hidden
    pub sidebar: Rect,
    /// Empty when the sidebar is hidden
    pub divider: Rect,
    pub diff: Rect,
    /// Resolved sidebar width, 0 when hidden
    pub sidebar_width: u16,
    /// Logical diff pane width before clipping to the terminal
    pub diff_width: u16,
}

/// Clamp a sidebar width into `[25, available - 40]`; the lower bound wins
/// when the range is empty. A width of 0 means "use the default share".
pub fn clamp_sidebar_width(width: u16, available: u16) -> u16 {
    let width = if width == 0 {
        (u32::from(available) * u32::from(DEFAULT_SIDEBAR_PERCENT) / 100) as u16
    } else {
        width
    };
    let max = available.saturating_sub(MIN_DIFF_WIDTH);
    width.min(max).max(MIN_SIDEBAR_WIDTH)
}

pub fn compute(area: Rect, sidebar_visible: bool, sidebar_width: u16) -> PaneLayout {
    if !sidebar_visible {
        return PaneLayout {
            diff: area,
            diff_width: area.width,
            ..PaneLayout::default()
        };
    }

    let available = area.width.saturating_sub(DIVIDER_WIDTH);
    let sidebar_width = clamp_sidebar_width(sidebar_width, available);
    let diff_width = available.saturating_sub(sidebar_width).max(MIN_DIFF_WIDTH);

    let sidebar = Rect::new(area.x, area.y, sidebar_width.min(area.width), area.height);
    let divider_x = area.x + sidebar.width;
    let divider = Rect::new(
        divider_x,
        area.y,
        DIVIDER_WIDTH.min(area.right().saturating_sub(divider_x)),
        area.height,
    );
    let diff_x = divider.right();
    let diff = Rect::new(
        diff_x,
        area.y,
        diff_width.min(area.right().saturating_sub(diff_x)),
        area.height,
    );

    PaneLayout {
        sidebar,
        divider,
        diff,
        sidebar_width,
        diff_width,
    }
}

/// Rows inside a bordered pane
pub fn interior_height(pane_height: u16) -> u16 {
    pane_height.saturating_sub(2)
}

/// Rows left for content under a pane's two header lines
pub fn content_height(pane_height: u16) -> u16 {
    interior_height(pane_height).saturating_sub(2)
}

/// A `width` x `height` rect centered in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

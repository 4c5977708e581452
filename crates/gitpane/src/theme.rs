use gitpane_diff::ThemeProvider;
use gitpane_vcs::FileStatus;
use ratatui::{prelude::*, style::palette::tailwind};

/// Application theme - centralized color and style management
///
/// Built once at startup and passed by reference to every render function.
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg_primary: Color,
    pub bg_panel: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_dimmed: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Status colors
    pub status_success: Color,
    pub status_error: Color,
    pub status_warning: Color,
    pub status_info: Color,

    // File status colors
    pub file_added: Color,
    pub file_modified: Color,
    pub file_deleted: Color,
    pub file_renamed: Color,
    pub file_untracked: Color,
    pub file_conflict: Color,

    // Commit list
    pub commit_hash: Color,
    pub commit_unpushed: Color,
    pub graph: Color,

    // Diff colors
    pub diff_add_bg: Color,
    pub diff_remove_bg: Color,
    pub diff_add_fg: Color,
    pub diff_remove_fg: Color,
    pub diff_hunk_bg: Color,

    // Selection colors
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub selected_unfocused_bg: Color,

    // Buttons
    pub button_bg: Color,
    pub button_focused_bg: Color,
    pub button_danger_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg_primary: tailwind::SLATE.c950,
            bg_panel: tailwind::SLATE.c900,

            text_primary: tailwind::SLATE.c100,
            text_secondary: tailwind::SLATE.c200,
            text_muted: tailwind::SLATE.c400,
            text_dimmed: tailwind::SLATE.c600,

            accent_primary: tailwind::CYAN.c400,
            accent_secondary: tailwind::CYAN.c600,

            status_success: tailwind::GREEN.c400,
            status_error: tailwind::RED.c400,
            status_warning: tailwind::YELLOW.c400,
            status_info: tailwind::BLUE.c400,

            file_added: tailwind::GREEN.c400,
            file_modified: tailwind::AMBER.c400,
            file_deleted: tailwind::RED.c400,
            file_renamed: tailwind::PURPLE.c400,
            file_untracked: tailwind::SLATE.c400,
            file_conflict: tailwind::ORANGE.c500,

            commit_hash: tailwind::AMBER.c500,
            commit_unpushed: tailwind::CYAN.c400,
            graph: tailwind::INDIGO.c400,

            diff_add_bg: Color::Rgb(22, 48, 32),
            diff_remove_bg: Color::Rgb(56, 24, 28),
            diff_add_fg: tailwind::GREEN.c400,
            diff_remove_fg: tailwind::RED.c400,
            diff_hunk_bg: tailwind::SLATE.c800,

            selected_bg: tailwind::BLUE.c500,
            selected_fg: Color::White,
            selected_unfocused_bg: tailwind::SLATE.c700,

            button_bg: tailwind::SLATE.c700,
            button_focused_bg: tailwind::BLUE.c600,
            button_danger_bg: tailwind::RED.c600,
        }
    }

    // Prebuilt styles for common use cases

    /// Style for panel borders
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.accent_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text_dimmed)
        }
    }

    /// Style for panel titles
    pub fn panel_title(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for section headers ("Staged (2)", "Recent Commits")
    pub fn section_header(&self) -> Style {
        Style::default()
            .fg(self.status_warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints (e.g., "s" in "s stage")
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    pub fn key_description(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for the row under the cursor
    pub fn selected(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.selected_fg)
                .bg(self.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(self.selected_unfocused_bg)
        }
    }

    /// Style for modal buttons
    pub fn button(&self, focused: bool, danger: bool) -> Style {
        let bg = match (focused, danger) {
            (true, true) => self.button_danger_bg,
            (true, false) => self.button_focused_bg,
            (false, _) => self.button_bg,
        };
        Style::default()
            .fg(Color::White)
            .bg(bg)
            .add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            })
    }

    /// Style for a file status letter
    pub fn file_status(&self, status: FileStatus) -> Style {
        let color = match status {
            FileStatus::Added => self.file_added,
            FileStatus::Modified => self.file_modified,
            FileStatus::Deleted => self.file_deleted,
            FileStatus::Renamed | FileStatus::Copied => self.file_renamed,
            FileStatus::Untracked | FileStatus::Ignored => self.file_untracked,
            FileStatus::Unmerged => self.file_conflict,
        };
        Style::default().fg(color)
    }

    pub fn additions(&self) -> Style {
        Style::default().fg(self.diff_add_fg)
    }

    pub fn deletions(&self) -> Style {
        Style::default().fg(self.diff_remove_fg)
    }

    pub fn commit_hash(&self) -> Style {
        Style::default().fg(self.commit_hash)
    }

    /// Style for error messages
    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.status_error)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for success messages
    pub fn success(&self) -> Style {
        Style::default()
            .fg(self.status_success)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for in-progress messages
    pub fn warning(&self) -> Style {
        Style::default().fg(self.status_warning)
    }

    /// Style for muted/helper text
    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for the background behind a modal
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.text_dimmed)
    }

    /// Style for primary text
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }
}

impl ThemeProvider for Theme {
    fn addition_background(&self) -> Color {
        self.diff_add_bg
    }

    fn deletion_background(&self) -> Color {
        self.diff_remove_bg
    }

    fn addition_foreground(&self) -> Color {
        self.diff_add_fg
    }

    fn deletion_foreground(&self) -> Color {
        self.diff_remove_fg
    }

    fn hunk_header_background(&self) -> Color {
        self.diff_hunk_bg
    }

    fn hunk_header_foreground(&self) -> Color {
        self.accent_primary
    }

    fn line_number_foreground(&self) -> Color {
        self.text_dimmed
    }

    fn separator_foreground(&self) -> Color {
        self.text_dimmed
    }

    fn placeholder_foreground(&self) -> Color {
        self.text_muted
    }
}

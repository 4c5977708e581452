//! # gitpane-diff
//!
//! Parsed diff model and terminal renderer used by the gitpane status view.
//!
//! ## Design Principles
//!
//! This crate is **instrumented**: it receives unified diff text and returns
//! styled rows. It never runs `git` itself, so it can be tested without a
//! repository and reused by any host that can produce a diff.
//!
//! - Parsing turns text into a [`ParsedDiff`] of hunks and numbered lines.
//! - Rendering returns only the rows inside a [`Viewport`], as ratatui
//!   [`Line`](ratatui::text::Line)s, in unified or side-by-side layout.
//! - Colors come from a [`ThemeProvider`]; syntax colors from an optional
//!   [`SyntaxHighlighter`].
//! - An [`ExternalDiffTool`] such as `delta` can replace the built-in
//!   renderer; its output is sanitized before it reaches the terminal.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gitpane_diff::{parse_unified_diff, render_diff, DiffViewMode, Viewport};
//!
//! let mut diff = parse_unified_diff(raw)?;
//! gitpane_diff::annotate_word_diff(&mut diff);
//!
//! let viewport = Viewport::new(area.width as usize, area.height as usize);
//! let lines = render_diff(DiffViewMode::Unified, Some(&diff), &viewport, None, &theme);
//! frame.render_widget(Paragraph::new(lines), area);
//! ```

pub mod external;
pub mod highlight;
pub mod model;
pub mod parser;
pub mod render;
pub mod traits;
pub mod word_diff;

// Re-export commonly used types
pub use external::{
    ansi_to_lines, render_external, sanitize_terminal_output, should_use_external, DeltaTool,
    ExternalDiffTool, ExternalToolError, ToolMode,
};
pub use highlight::DiffHighlighter;
pub use model::{DiffLine, HighlightedSpan, Hunk, LineType, ParsedDiff, WordSegment};
pub use parser::{parse_unified_diff, ParseError};
pub use render::{
    display_width, group_lines_for_side_by_side, render_diff, render_side_by_side,
    render_unified, row_count, side_by_side_clip_info, side_by_side_content_width,
    side_by_side_row_count, slice_columns, unified_row_count, window_lines, ClipInfo,
    DiffViewMode, LinePair, Viewport, BINARY_FILE, NO_DIFF_CONTENT,
};
pub use traits::{DefaultTheme, SyntaxHighlighter, ThemeProvider};
pub use word_diff::annotate_word_diff;

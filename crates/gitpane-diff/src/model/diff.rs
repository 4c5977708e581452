//! Diff data structures for a single file's unified diff.

use ratatui::style::{Color, Modifier, Style};

/// A parsed unified diff for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDiff {
    /// Source path (`/dev/null` for added files).
    pub old_file: String,
    /// Target path (`/dev/null` for deleted files).
    pub new_file: String,
    /// Set when the diff describes a binary delta. No hunks are emitted then.
    pub binary: bool,
    /// Change hunks in diff order.
    pub hunks: Vec<Hunk>,
}

impl ParsedDiff {
    /// Create an empty diff between two paths.
    pub fn new(old_file: impl Into<String>, new_file: impl Into<String>) -> Self {
        Self {
            old_file: old_file.into(),
            new_file: new_file.into(),
            binary: false,
            hunks: Vec::new(),
        }
    }

    /// Create a binary diff marker.
    pub fn binary(old_file: impl Into<String>, new_file: impl Into<String>) -> Self {
        Self {
            binary: true,
            ..Self::new(old_file, new_file)
        }
    }

    /// True when there is nothing to show (no hunks and not binary).
    pub fn is_empty(&self) -> bool {
        !self.binary && self.hunks.is_empty()
    }

    /// The path to use for display and syntax detection.
    pub fn file_name(&self) -> &str {
        if self.new_file.is_empty() || self.new_file == "/dev/null" {
            &self.old_file
        } else {
            &self.new_file
        }
    }

    /// Number of added lines across all hunks.
    pub fn additions(&self) -> usize {
        self.lines()
            .filter(|l| l.line_type == LineType::Add)
            .count()
    }

    /// Number of removed lines across all hunks.
    pub fn deletions(&self) -> usize {
        self.lines()
            .filter(|l| l.line_type == LineType::Remove)
            .count()
    }

    /// Iterate all lines of all hunks in order.
    pub fn lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.hunks.iter().flat_map(|h| h.lines.iter())
    }

    /// Largest line number referenced by any line, used for gutter width.
    pub fn max_line_no(&self) -> u32 {
        self.lines()
            .filter_map(|l| l.new_line_no.max(l.old_line_no))
            .max()
            .unwrap_or(1)
    }
}

/// A contiguous changed region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// Trailing section text after the second `@@` (usually a function signature).
    pub section: String,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            section: String::new(),
            lines: Vec::new(),
        }
    }

    /// Header line as rendered above the hunk.
    pub fn header(&self) -> String {
        let base = format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        );
        if self.section.is_empty() {
            base
        } else {
            format!("{} {}", base, self.section)
        }
    }
}

/// Kind of a diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Context,
    Add,
    Remove,
    /// Non-content line (file or hunk header) carried inside a hunk.
    Header,
}

impl LineType {
    /// The single-character marker printed before the content.
    pub fn marker(self) -> char {
        match self {
            LineType::Context | LineType::Header => ' ',
            LineType::Add => '+',
            LineType::Remove => '-',
        }
    }
}

/// A piece of a changed line; `is_change` marks the words that differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSegment {
    pub text: String,
    pub is_change: bool,
}

impl WordSegment {
    pub fn new(text: impl Into<String>, is_change: bool) -> Self {
        Self {
            text: text.into(),
            is_change,
        }
    }
}

/// A single line in a hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub line_type: LineType,
    pub old_line_no: Option<u32>,
    pub new_line_no: Option<u32>,
    pub content: String,
    /// Word-level segmentation. When present, the segment texts concatenate to `content`.
    pub word_diff: Option<Vec<WordSegment>>,
}

impl DiffLine {
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            line_type: LineType::Context,
            old_line_no: Some(old_line),
            new_line_no: Some(new_line),
            content: content.into(),
            word_diff: None,
        }
    }

    pub fn add(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            line_type: LineType::Add,
            old_line_no: None,
            new_line_no: Some(new_line),
            content: content.into(),
            word_diff: None,
        }
    }

    pub fn remove(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            line_type: LineType::Remove,
            old_line_no: Some(old_line),
            new_line_no: None,
            content: content.into(),
            word_diff: None,
        }
    }

    pub fn header(content: impl Into<String>) -> Self {
        Self {
            line_type: LineType::Header,
            old_line_no: None,
            new_line_no: None,
            content: content.into(),
            word_diff: None,
        }
    }
}

/// A styled span produced by a syntax highlighter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedSpan {
    pub text: String,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl HighlightedSpan {
    /// Unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: None,
            bg: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    /// Convert to a ratatui style.
    pub fn to_style(&self) -> Style {
        let mut style = Style::default();
        if let Some(fg) = self.fg {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underline {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

//! Data model for parsed diffs.

mod diff;

pub use diff::{DiffLine, HighlightedSpan, Hunk, LineType, ParsedDiff, WordSegment};

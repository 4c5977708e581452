//! Hook for syntax highlighting rendered lines.

use crate::model::HighlightedSpan;

/// Maps `(file name, line content)` to styled tokens.
///
/// Implementations must return spans whose texts concatenate to `content`.
pub trait SyntaxHighlighter {
    fn highlight(&mut self, file_name: &str, content: &str) -> Vec<HighlightedSpan>;
}

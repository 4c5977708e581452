//! Syntax highlighting.

mod highlighter;

pub use highlighter::DiffHighlighter;

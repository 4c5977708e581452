//! Traits the host application implements to plug into the renderer.

mod syntax_highlighter;
mod theme_provider;

pub use syntax_highlighter::SyntaxHighlighter;
pub use theme_provider::{DefaultTheme, ThemeProvider};

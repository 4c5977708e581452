//! System clipboard access

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(#[source] arboard::Error),
    #[error("failed to write clipboard: {0}")]
    Write(#[source] arboard::Error),
}

pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard via `arboard`
///
/// A handle is opened per write; some platforms drop the selection when a
/// long-lived handle is shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?;
        clipboard
            .set_text(text.to_string())
            .map_err(ClipboardError::Write)?;
        log::debug!("Copied {} bytes to clipboard", text.len());
        Ok(())
    }
}

//! Terminal input in the forms the status view consumes
//!
//! Keys become short strings (`"j"`, `"G"`, `"ctrl+d"`, `"shift+tab"`,
//! `"enter"`) so key tables read like the help text. Mouse events become
//! [`MouseInput`] with the terminal cell they happened on.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton as CtMouseButton, MouseEvent, MouseEventKind,
};

/// String form of a key press, or `None` for keys the view never binds.
pub fn key_to_string(key: &KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(' ') => " ".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => return Some("shift+tab".to_string()),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pgup".to_string(),
        KeyCode::PageDown => "pgdown".to_string(),
        _ => return None,
    };

    let mut prefix = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        prefix.push_str("ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        prefix.push_str("alt+");
    }
    // Shift is already folded into the character for printable keys.
    let printable = matches!(key.code, KeyCode::Char(_));
    if key.modifiers.contains(KeyModifiers::SHIFT) && !printable {
        prefix.push_str("shift+");
    }
    let base = if printable && !prefix.is_empty() {
        base.to_lowercase()
    } else {
        base
    };
    Some(format!("{}{}", prefix, base))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Press,
    Release,
    Motion,
    Wheel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    None,
}

/// A pointer event at a terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub kind: MouseKind,
    pub button: MouseButton,
    pub x: u16,
    pub y: u16,
}

impl MouseInput {
    pub fn new(kind: MouseKind, button: MouseButton, x: u16, y: u16) -> Self {
        Self { kind, button, x, y }
    }

    pub fn press(x: u16, y: u16) -> Self {
        Self::new(MouseKind::Press, MouseButton::Left, x, y)
    }

    pub fn release(x: u16, y: u16) -> Self {
        Self::new(MouseKind::Release, MouseButton::Left, x, y)
    }

    pub fn drag(x: u16, y: u16) -> Self {
        Self::new(MouseKind::Motion, MouseButton::Left, x, y)
    }

    pub fn wheel(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseKind::Wheel, button, x, y)
    }
}

fn convert_button(button: CtMouseButton) -> MouseButton {
    match button {
        CtMouseButton::Left => MouseButton::Left,
        CtMouseButton::Right => MouseButton::Right,
        CtMouseButton::Middle => MouseButton::Middle,
    }
}

impl From<MouseEvent> for MouseInput {
    fn from(event: MouseEvent) -> Self {
        let (kind, button) = match event.kind {
            MouseEventKind::Down(b) => (MouseKind::Press, convert_button(b)),
            MouseEventKind::Up(b) => (MouseKind::Release, convert_button(b)),
            MouseEventKind::Drag(b) => (MouseKind::Motion, convert_button(b)),
            MouseEventKind::Moved => (MouseKind::Motion, MouseButton::None),
            MouseEventKind::ScrollUp => (MouseKind::Wheel, MouseButton::WheelUp),
            MouseEventKind::ScrollDown => (MouseKind::Wheel, MouseButton::WheelDown),
            MouseEventKind::ScrollLeft => (MouseKind::Wheel, MouseButton::WheelLeft),
            MouseEventKind::ScrollRight => (MouseKind::Wheel, MouseButton::WheelRight),
        };
        Self::new(kind, button, event.column, event.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
        key_to_string(&KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(key(KeyCode::Char('j'), KeyModifiers::NONE).as_deref(), Some("j"));
        assert_eq!(key(KeyCode::Char('G'), KeyModifiers::SHIFT).as_deref(), Some("G"));
        assert_eq!(key(KeyCode::Char(' '), KeyModifiers::NONE).as_deref(), Some(" "));
        assert_eq!(key(KeyCode::Char('\\'), KeyModifiers::NONE).as_deref(), Some("\\"));
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE).as_deref(), Some("enter"));
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE).as_deref(), Some("esc"));
        assert_eq!(key(KeyCode::Down, KeyModifiers::NONE).as_deref(), Some("down"));
        assert_eq!(key(KeyCode::F(5), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_modified_keys() {
        assert_eq!(key(KeyCode::Char('d'), KeyModifiers::CONTROL).as_deref(), Some("ctrl+d"));
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::ALT).as_deref(), Some("alt+a"));
        assert_eq!(key(KeyCode::BackTab, KeyModifiers::SHIFT).as_deref(), Some("shift+tab"));
        assert_eq!(key(KeyCode::Tab, KeyModifiers::SHIFT).as_deref(), Some("shift+tab"));
    }

    #[test]
    fn test_mouse_conversion() {
        let event = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            MouseInput::from(event),
            MouseInput::wheel(MouseButton::WheelDown, 4, 7)
        );
    }
}

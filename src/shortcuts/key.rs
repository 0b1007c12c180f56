//! Key presses, independent of the terminal backend.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The keys the dashboard distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    /// Anything else (function keys, arrows we ignore, ...)
    Other,
}

/// One key press with the modifier that matters for shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyPress {
    /// A key without Ctrl.
    pub fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    /// A character without Ctrl.
    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    /// A character with Ctrl held.
    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
        }
    }

    /// Returns the lowercase character of a character key.
    pub fn lowercase_char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Converts a crossterm key event. Release and repeat events yield None.
    pub fn from_crossterm(event: &KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let key = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Esc => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            _ => Key::Other,
        };

        Some(Self {
            key,
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        })
    }
}

// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A hardware key code as reported by the server (8..=255 on X11).
///
/// Key codes identify physical keys, not characters. Use
/// [`Session::lookup_key`](crate::Session::lookup_key) to resolve one against
/// the current keyboard mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyCode(pub u32);

bitflags! {
    /// Keyboard modifier state at the time of an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
        const CAPS_LOCK = 1 << 4;
        const NUM_LOCK = 1 << 5;
    }
}

/// Pointer buttons, numbered the X11 way (1 = left, 4/5 = wheel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Other(u8),
}

impl MouseButton {
    pub fn from_number(number: u32) -> Self {
        match number {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            4 => MouseButton::ScrollUp,
            5 => MouseButton::ScrollDown,
            other => MouseButton::Other(other.min(u8::MAX as u32) as u8),
        }
    }

    pub fn number(self) -> u32 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
            MouseButton::Other(n) => n as u32,
        }
    }
}

/// The symbolic meaning of a key under the active keyboard mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeySymbol {
    /// A key that produced a single printable character.
    Char(char),

    Shift,
    Control,
    Alt,
    Super,
    CapsLock,
    NumLock,

    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,

    Enter,
    Backspace,
    Tab,
    Escape,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    #[default]
    Unknown,
}

/// Result of resolving a [`KeyCode`] through the server's keyboard mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyLookup {
    pub symbol: KeySymbol,
    /// Raw keysym value, for callers that need more than [`KeySymbol`] covers.
    pub keysym: u32,
    /// Text produced by the key, empty for non-printing keys.
    pub text: String,
}

impl KeyLookup {
    /// The produced character if it lies in printable ASCII (space through `~`).
    pub fn printable_ascii(&self) -> Option<char> {
        match self.symbol {
            KeySymbol::Char(c) if (' '..='~').contains(&c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_numbers_round_trip_for_named_buttons() {
        for n in 1..=5 {
            assert_eq!(MouseButton::from_number(n).number(), n);
        }
        assert_eq!(MouseButton::from_number(8), MouseButton::Other(8));
        assert_eq!(MouseButton::from_number(1000), MouseButton::Other(255));
    }

    #[test]
    fn printable_ascii_rejects_control_and_non_ascii() {
        let lookup = |symbol| KeyLookup {
            symbol,
            ..Default::default()
        };
        assert_eq!(lookup(KeySymbol::Char('a')).printable_ascii(), Some('a'));
        assert_eq!(lookup(KeySymbol::Char(' ')).printable_ascii(), Some(' '));
        assert_eq!(lookup(KeySymbol::Char('~')).printable_ascii(), Some('~'));
        assert_eq!(lookup(KeySymbol::Char('\u{7f}')).printable_ascii(), None);
        assert_eq!(lookup(KeySymbol::Char('é')).printable_ascii(), None);
        assert_eq!(lookup(KeySymbol::Enter).printable_ascii(), None);
    }
}

// src/event.rs

//! Input and window events handed out by [`Session::poll_event`](crate::Session::poll_event).

use crate::keys::{KeyCode, Modifiers, MouseButton};

/// One translated event from the session's queue.
///
/// An empty queue is `None` at the `Option` level. [`Event::Ignored`] is a
/// protocol event that was consumed but has no translation here (exposure,
/// window moves, client messages meant for someone else).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Ignored,
    KeyDown {
        code: KeyCode,
        modifiers: Modifiers,
    },
    KeyUp {
        code: KeyCode,
        modifiers: Modifiers,
    },
    PointerMove {
        x: i32,
        y: i32,
    },
    ButtonDown {
        x: i32,
        y: i32,
        button: MouseButton,
    },
    ButtonUp {
        x: i32,
        y: i32,
        button: MouseButton,
    },
    /// The window changed size. The session's stored dimensions already
    /// reflect the new values.
    Resize {
        width: u32,
        height: u32,
    },
    /// The window manager asked the window to close. The session is no longer
    /// open once this has been returned.
    Close,
}

impl Event {
    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        matches!(self, Event::KeyDown { code: c, .. } if *c == code)
    }

    pub fn is_key_released(&self, code: KeyCode) -> bool {
        matches!(self, Event::KeyUp { code: c, .. } if *c == code)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        matches!(self, Event::ButtonDown { button: b, .. } if *b == button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        matches!(self, Event::ButtonUp { button: b, .. } if *b == button)
    }

    /// Pointer position carried by motion and button events.
    pub fn position(&self) -> Option<(i32, i32)> {
        match *self {
            Event::PointerMove { x, y }
            | Event::ButtonDown { x, y, .. }
            | Event::ButtonUp { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }
}

// src/backends/mod.rs

//! Defines the `DisplayBackend` trait that sits between [`Session`](crate::Session)
//! and the display server, plus the plain-data types passed across it.
//!
//! The session owns all wrapper-level policy (close detection, size
//! tracking, guarding a released connection). Backends only decode protocol
//! events and forward drawing requests.

use crate::keys::{KeyCode, KeyLookup, Modifiers};

#[cfg(test)]
pub mod mock;
pub mod x11;

/// Identifies a server-side off-screen drawable created by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

/// The drawable a [`DrawCommand`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Window,
    Buffer(BufferId),
}

/// Atoms a window registers so a close request can be told apart from other
/// client messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CloseToken {
    /// `WM_PROTOCOLS`, the message type of window manager protocol messages.
    pub protocols: u64,
    /// `WM_DELETE_WINDOW`, carried in the first data word.
    pub delete_window: u64,
}

impl CloseToken {
    pub fn matches(&self, message_type: u64, data0: u64) -> bool {
        self.delete_window != 0 && message_type == self.protocols && data0 == self.delete_window
    }
}

/// One protocol event, decoded but not yet interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    KeyPress {
        code: KeyCode,
        modifiers: Modifiers,
    },
    KeyRelease {
        code: KeyCode,
        modifiers: Modifiers,
    },
    Motion {
        x: i32,
        y: i32,
    },
    ButtonPress {
        x: i32,
        y: i32,
        button: u32,
    },
    ButtonRelease {
        x: i32,
        y: i32,
        button: u32,
    },
    Configure {
        width: u32,
        height: u32,
    },
    ClientMessage {
        message_type: u64,
        data0: u64,
    },
    Expose,
    /// Any other event type, by protocol number.
    Other(i32),
}

/// Immediate drawing requests. Each one sets the foreground to `color` and
/// issues a single primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Point {
        x: i32,
        y: i32,
        color: u32,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: u32,
    },
    Rect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: u32,
        filled: bool,
    },
}

/// The display-server operations a session needs.
///
/// Implementations may assume `release` is called at most once by the
/// session and that no other method is called after it. They should still
/// make `release` idempotent.
pub trait DisplayBackend {
    /// The close token registered on the window at creation time.
    fn close_token(&self) -> CloseToken;

    /// Dequeues one pending event without blocking. `None` when the queue is empty.
    fn next_event(&mut self) -> Option<RawEvent>;

    /// Issues one drawing command against `surface`.
    fn draw(&mut self, surface: Surface, command: DrawCommand);

    /// Pushes buffered requests to the server.
    fn flush(&mut self);

    /// Best-effort window title change.
    fn set_title(&mut self, title: &str);

    /// Resolves a key code under the current keyboard mapping.
    fn lookup_key(&mut self, code: KeyCode, modifiers: Modifiers) -> KeyLookup;

    /// Allocates an off-screen buffer compatible with the window.
    fn create_buffer(&mut self, width: u32, height: u32) -> Option<BufferId>;

    /// Copies `width` x `height` pixels from the buffer's origin to the window's origin.
    fn copy_buffer(&mut self, buffer: BufferId, width: u32, height: u32);

    fn free_buffer(&mut self, buffer: BufferId);

    /// Frees every remaining server resource and closes the connection.
    fn release(&mut self);
}

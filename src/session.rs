// src/session.rs

//! The display/window session and its event and drawing facade.
//!
//! A [`Session`] bundles one connection, one top-level window and its
//! graphics context. It tracks the window size and whether the window manager
//! has asked the window to close. Everything else is forwarded to the
//! [`DisplayBackend`] as it is requested: there is no command batching, no
//! damage tracking and no implicit double buffering. Callers that want
//! flicker-free frames draw into a [`BackBuffer`] and [`Session::blit`] it.

use crate::backends::x11::XlibBackend;
use crate::backends::{BufferId, CloseToken, DisplayBackend, DrawCommand, RawEvent, Surface};
use crate::error::SessionError;
use crate::event::Event;
use crate::keys::{KeyCode, KeyLookup, Modifiers, MouseButton};
use log::{debug, info, trace, warn};

pub struct Session<B: DisplayBackend = XlibBackend> {
    /// `None` once the session has been closed. Nothing touches the
    /// connection after that point.
    backend: Option<B>,
    width: u32,
    height: u32,
    open: bool,
    close_token: CloseToken,
}

impl Session<XlibBackend> {
    /// Connects to the display named by `DISPLAY`, creates and maps a
    /// `width` x `height` window titled `title`.
    ///
    /// # Errors
    ///
    /// * [`SessionError::Connection`] if the display server cannot be reached.
    /// * [`SessionError::InvalidTitle`] if `title` contains a NUL byte.
    /// * [`SessionError::WindowCreation`] if the server refuses the window.
    pub fn open(width: u32, height: u32, title: &str) -> Result<Self, SessionError> {
        let backend = XlibBackend::connect(width, height, title)?;
        Ok(Self::with_backend(backend, width, height))
    }
}

impl<B: DisplayBackend> Session<B> {
    /// Wraps an already-connected backend whose window is `width` x `height`.
    pub fn with_backend(backend: B, width: u32, height: u32) -> Self {
        let close_token = backend.close_token();
        debug!(
            "Session created: {}x{}, close token {:?}",
            width, height, close_token
        );
        Self {
            backend: Some(backend),
            width,
            height,
            open: true,
            close_token,
        }
    }

    /// Releases the window's resources and the connection.
    ///
    /// Only the first call does anything. Later calls, and the implicit call
    /// from `Drop`, are no-ops.
    pub fn close(&mut self) {
        self.open = false;
        match self.backend.take() {
            Some(mut backend) => {
                info!("Closing session ({}x{}).", self.width, self.height);
                backend.release();
            }
            None => debug!("Session already closed; close skipped."),
        }
    }

    /// `false` once a close request has been polled or [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether [`close`](Self::close) has released the connection.
    pub fn is_released(&self) -> bool {
        self.backend.is_none()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn close_token(&self) -> CloseToken {
        self.close_token
    }

    /// Best effort: failures are logged, never reported.
    pub fn set_title(&mut self, title: &str) {
        match self.backend.as_mut() {
            Some(backend) => backend.set_title(title),
            None => warn!("set_title('{}') on a closed session ignored.", title),
        }
    }

    /// Takes at most one event off the queue without blocking.
    ///
    /// Returns `None` when nothing is queued (or the session is closed), in
    /// which case no session state changes. A size change updates
    /// [`width`](Self::width)/[`height`](Self::height) before `Resize` is
    /// returned. A window manager close request flips
    /// [`is_open`](Self::is_open) to `false` before `Close` is returned, and
    /// only the first such request is reported.
    pub fn poll_event(&mut self) -> Option<Event> {
        let Some(backend) = self.backend.as_mut() else {
            trace!("poll_event on a closed session.");
            return None;
        };
        let raw = backend.next_event()?;
        Some(self.translate(raw))
    }

    fn translate(&mut self, raw: RawEvent) -> Event {
        match raw {
            RawEvent::KeyPress { code, modifiers } => Event::KeyDown { code, modifiers },
            RawEvent::KeyRelease { code, modifiers } => Event::KeyUp { code, modifiers },
            RawEvent::Motion { x, y } => Event::PointerMove { x, y },
            RawEvent::ButtonPress { x, y, button } => Event::ButtonDown {
                x,
                y,
                button: MouseButton::from_number(button),
            },
            RawEvent::ButtonRelease { x, y, button } => Event::ButtonUp {
                x,
                y,
                button: MouseButton::from_number(button),
            },
            RawEvent::Configure { width, height } => {
                if (width, height) == (self.width, self.height) {
                    // Moves and restacks also arrive as ConfigureNotify.
                    return Event::Ignored;
                }
                debug!(
                    "Window resized from {}x{} to {}x{}",
                    self.width, self.height, width, height
                );
                self.width = width;
                self.height = height;
                Event::Resize { width, height }
            }
            RawEvent::ClientMessage {
                message_type,
                data0,
            } if self.close_token.matches(message_type, data0) => {
                if !self.open {
                    debug!("Repeated close request ignored.");
                    return Event::Ignored;
                }
                info!("Close requested by the window manager.");
                self.open = false;
                Event::Close
            }
            RawEvent::ClientMessage { message_type, .. } => {
                trace!("Ignored client message of type {}", message_type);
                Event::Ignored
            }
            RawEvent::Expose | RawEvent::Other(_) => Event::Ignored,
        }
    }

    /// Resolves a key code through the server's keyboard mapping.
    pub fn lookup_key(&mut self, code: KeyCode, modifiers: Modifiers) -> KeyLookup {
        match self.backend.as_mut() {
            Some(backend) => backend.lookup_key(code, modifiers),
            None => KeyLookup::default(),
        }
    }

    /// A drawing view onto the window.
    pub fn window_canvas(&mut self) -> Canvas<'_, B> {
        Canvas {
            backend: self.backend.as_mut(),
            surface: Surface::Window,
            width: self.width,
            height: self.height,
        }
    }

    /// A drawing view onto an off-screen buffer created by this session.
    pub fn buffer_canvas(&mut self, buffer: &BackBuffer) -> Canvas<'_, B> {
        Canvas {
            backend: self.backend.as_mut(),
            surface: Surface::Buffer(buffer.id),
            width: buffer.width,
            height: buffer.height,
        }
    }

    /// Fills the whole window (at its current size) with `color`.
    pub fn clear(&mut self, color: u32) {
        self.window_canvas().clear(color);
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: u32) {
        self.window_canvas().draw_pixel(x, y, color);
    }

    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32) {
        self.window_canvas().draw_line(x1, y1, x2, y2, color);
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32, filled: bool) {
        self.window_canvas()
            .draw_rect(x, y, width, height, color, filled);
    }

    /// Flushes queued drawing requests to the server.
    pub fn present(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.flush();
        }
    }

    /// Allocates an off-screen buffer the size of the window.
    ///
    /// Returns `None` on a closed session or if the server refuses the pixmap.
    pub fn create_back_buffer(&mut self) -> Option<BackBuffer> {
        let (width, height) = (self.width, self.height);
        let id = self.backend.as_mut()?.create_buffer(width, height)?;
        debug!("Back buffer {:?} created ({}x{})", id, width, height);
        Some(BackBuffer { id, width, height })
    }

    /// Copies `buffer` onto the window at the origin.
    pub fn blit(&mut self, buffer: &BackBuffer) {
        if let Some(backend) = self.backend.as_mut() {
            backend.copy_buffer(buffer.id, buffer.width, buffer.height);
        }
    }

    /// Frees a back buffer. Buffers still alive at [`close`](Self::close) are
    /// freed there, so this is a no-op on a closed session.
    pub fn free_back_buffer(&mut self, buffer: BackBuffer) {
        if let Some(backend) = self.backend.as_mut() {
            debug!("Freeing back buffer {:?}", buffer.id);
            backend.free_buffer(buffer.id);
        }
    }
}

impl<B: DisplayBackend> Drop for Session<B> {
    fn drop(&mut self) {
        self.close();
    }
}

/// A caller-owned off-screen drawable, see [`Session::create_back_buffer`].
#[derive(Debug, PartialEq, Eq)]
pub struct BackBuffer {
    id: BufferId,
    width: u32,
    height: u32,
}

impl BackBuffer {
    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the buffer still covers a `width` x `height` window.
    pub fn matches_size(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

/// Immediate-mode drawing onto one surface of a session.
///
/// Every call sets the foreground color and issues one primitive. On a
/// closed session the calls do nothing.
pub struct Canvas<'a, B: DisplayBackend> {
    backend: Option<&'a mut B>,
    surface: Surface,
    width: u32,
    height: u32,
}

impl<B: DisplayBackend> Canvas<'_, B> {
    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn clear(&mut self, color: u32) {
        let (width, height) = (self.width, self.height);
        self.issue(DrawCommand::Rect {
            x: 0,
            y: 0,
            width,
            height,
            color,
            filled: true,
        });
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: u32) {
        self.issue(DrawCommand::Point { x, y, color });
    }

    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32) {
        self.issue(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }

    /// Outlines (`filled == false`) or fills a rectangle.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32, filled: bool) {
        self.issue(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
            filled,
        });
    }

    fn issue(&mut self, command: DrawCommand) {
        match self.backend.as_deref_mut() {
            Some(backend) => backend.draw(self.surface, command),
            None => trace!("{:?} on a closed session dropped.", command),
        }
    }
}

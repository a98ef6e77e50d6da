// src/backends/x11/graphics.rs

use super::connection::Connection;
use crate::backends::DrawCommand;
use log::{debug, trace, warn};
use std::ptr;

use libc::{c_uint, c_ulong};
use x11::xlib;

/// Wraps the window's `GC`. Must be freed with [`free`](Self::free) while
/// the connection is still open.
#[derive(Debug)]
pub struct GraphicsContext {
    gc: xlib::GC,
}

impl GraphicsContext {
    /// `XCreateGC` with default values on `drawable`.
    pub fn create(connection: &Connection, drawable: xlib::Drawable) -> Option<Self> {
        let gc = unsafe { xlib::XCreateGC(connection.display(), drawable, 0, ptr::null_mut()) };
        if gc.is_null() {
            warn!("XCreateGC failed for drawable {}", drawable);
            return None;
        }
        debug!("GC created: {:p}", gc);
        Some(Self { gc })
    }

    pub fn is_freed(&self) -> bool {
        self.gc.is_null()
    }

    /// Sets the foreground to `color` and issues one primitive on `drawable`.
    pub fn execute(&self, connection: &Connection, drawable: xlib::Drawable, command: DrawCommand) {
        if self.is_freed() || connection.is_closed() {
            return;
        }
        trace!("{:?} on drawable {}", command, drawable);
        let display = connection.display();
        // SAFETY: display and GC are live (checked above); drawable belongs to
        // this connection.
        unsafe {
            match command {
                DrawCommand::Point { x, y, color } => {
                    xlib::XSetForeground(display, self.gc, color as c_ulong);
                    xlib::XDrawPoint(display, drawable, self.gc, x, y);
                }
                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                } => {
                    xlib::XSetForeground(display, self.gc, color as c_ulong);
                    xlib::XDrawLine(display, drawable, self.gc, x1, y1, x2, y2);
                }
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                    filled,
                } => {
                    xlib::XSetForeground(display, self.gc, color as c_ulong);
                    if filled {
                        xlib::XFillRectangle(
                            display,
                            drawable,
                            self.gc,
                            x,
                            y,
                            width as c_uint,
                            height as c_uint,
                        );
                    } else {
                        xlib::XDrawRectangle(
                            display,
                            drawable,
                            self.gc,
                            x,
                            y,
                            width as c_uint,
                            height as c_uint,
                        );
                    }
                }
            }
        }
    }

    /// `XCopyArea` from `src` to `dest`, both at the origin.
    pub fn copy_area(
        &self,
        connection: &Connection,
        src: xlib::Drawable,
        dest: xlib::Drawable,
        width: u32,
        height: u32,
    ) {
        if self.is_freed() || connection.is_closed() {
            return;
        }
        unsafe {
            xlib::XCopyArea(
                connection.display(),
                src,
                dest,
                self.gc,
                0,
                0,
                width as c_uint,
                height as c_uint,
                0,
                0,
            );
        }
    }

    /// Idempotent.
    pub fn free(&mut self, connection: &Connection) {
        if self.is_freed() || connection.is_closed() {
            return;
        }
        trace!("Freeing GC: {:p}", self.gc);
        unsafe {
            xlib::XFreeGC(connection.display(), self.gc);
        }
        self.gc = ptr::null_mut();
    }
}

impl Drop for GraphicsContext {
    fn drop(&mut self) {
        if !self.is_freed() {
            warn!(
                "GC {:p} dropped without free(). It is released with the connection.",
                self.gc
            );
        }
    }
}

/// A server-side off-screen drawable at the screen's default depth.
#[derive(Debug)]
pub struct Pixmap {
    id: xlib::Pixmap,
    width: u32,
    height: u32,
}

impl Pixmap {
    pub fn create(
        connection: &Connection,
        window: xlib::Window,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        if width == 0 || height == 0 || connection.is_closed() {
            return None;
        }
        let id = unsafe {
            xlib::XCreatePixmap(
                connection.display(),
                window,
                width as c_uint,
                height as c_uint,
                connection.depth() as c_uint,
            )
        };
        if id == 0 {
            warn!("XCreatePixmap failed ({}x{})", width, height);
            return None;
        }
        debug!("Pixmap {} created ({}x{})", id, width, height);
        Some(Self { id, width, height })
    }

    #[inline]
    pub fn id(&self) -> xlib::Pixmap {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Idempotent.
    pub fn free(&mut self, connection: &Connection) {
        if self.id == 0 || connection.is_closed() {
            return;
        }
        debug!("Freeing pixmap {}", self.id);
        unsafe {
            xlib::XFreePixmap(connection.display(), self.id);
        }
        self.id = 0;
    }
}

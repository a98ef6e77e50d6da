// src/backends/x11/connection.rs

use crate::error::SessionError;
use log::{debug, info, warn};
use std::ffi::CStr;
use std::ptr;

use libc::{c_int, c_ulong};
use x11::xlib;

/// Owns an Xlib `Display` pointer and closes it exactly once.
#[derive(Debug)]
struct ManagedDisplay {
    ptr: *mut xlib::Display,
}

impl ManagedDisplay {
    /// Calls `XOpenDisplay(NULL)`, which honours the `DISPLAY` environment variable.
    fn open() -> Result<Self, SessionError> {
        let display_ptr = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display_ptr.is_null() {
            return Err(SessionError::Connection {
                display: default_display_name(),
            });
        }
        debug!("X display opened: {:p}", display_ptr);
        Ok(Self { ptr: display_ptr })
    }

    #[inline]
    fn raw(&self) -> *mut xlib::Display {
        self.ptr
    }

    /// Returns `true` if this call closed the display.
    fn close(&mut self) -> bool {
        if self.ptr.is_null() {
            return false;
        }
        info!("Closing X11 display connection: {:p}", self.ptr);
        // SAFETY: ptr came from XOpenDisplay and is nulled right after, so it
        // is closed at most once.
        let status = unsafe { xlib::XCloseDisplay(self.ptr) };
        if status != 0 {
            warn!("XCloseDisplay returned non-zero status: {}", status);
        }
        self.ptr = ptr::null_mut();
        true
    }
}

impl Drop for ManagedDisplay {
    fn drop(&mut self) {
        self.close();
    }
}

/// The name `XOpenDisplay(NULL)` would try, for error messages.
fn default_display_name() -> String {
    // SAFETY: XDisplayName(NULL) returns a pointer to a static or environment
    // string and never fails.
    let name = unsafe { xlib::XDisplayName(ptr::null()) };
    if name.is_null() {
        return String::new();
    }
    let name = unsafe { CStr::from_ptr(name) };
    name.to_string_lossy().into_owned()
}

/// The connection to the X server plus the default-screen values a simple
/// window needs.
#[derive(Debug)]
pub struct Connection {
    managed_display: ManagedDisplay,
    depth: c_int,
    root: xlib::Window,
    black_pixel: c_ulong,
    white_pixel: c_ulong,
}

impl Connection {
    pub fn open() -> Result<Self, SessionError> {
        info!("Establishing X11 server connection.");
        let managed_display = ManagedDisplay::open()?;
        let display = managed_display.raw();

        // SAFETY: display is a live connection for the rest of this function.
        let (screen, depth, root, black_pixel, white_pixel) = unsafe {
            let screen = xlib::XDefaultScreen(display);
            (
                screen,
                xlib::XDefaultDepth(display, screen),
                xlib::XRootWindow(display, screen),
                xlib::XBlackPixel(display, screen),
                xlib::XWhitePixel(display, screen),
            )
        };
        debug!(
            "Default screen {}: depth {}, root window {}",
            screen, depth, root
        );

        Ok(Connection {
            managed_display,
            depth,
            root,
            black_pixel,
            white_pixel,
        })
    }

    /// Closes the display connection. Idempotent.
    pub fn close(&mut self) {
        if !self.managed_display.close() {
            debug!("X11 display connection already closed; close skipped.");
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.managed_display.ptr.is_null()
    }

    /// The raw display pointer. Null after [`close`](Self::close); callers
    /// check [`is_closed`](Self::is_closed) before handing it to Xlib.
    #[inline]
    pub fn display(&self) -> *mut xlib::Display {
        self.managed_display.raw()
    }

    #[inline]
    pub fn depth(&self) -> c_int {
        self.depth
    }

    #[inline]
    pub fn root(&self) -> xlib::Window {
        self.root
    }

    #[inline]
    pub fn black_pixel(&self) -> c_ulong {
        self.black_pixel
    }

    #[inline]
    pub fn white_pixel(&self) -> c_ulong {
        self.white_pixel
    }

    pub fn flush(&self) {
        if self.is_closed() {
            return;
        }
        unsafe {
            xlib::XFlush(self.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_connection() -> Connection {
        Connection {
            managed_display: ManagedDisplay {
                ptr: ptr::null_mut(),
            },
            depth: 24,
            root: 0,
            black_pixel: 0,
            white_pixel: 0xFFFFFF,
        }
    }

    #[test]
    fn test_close_on_closed_connection_is_noop() {
        let mut conn = closed_connection();
        assert!(conn.is_closed());
        conn.close();
        conn.close();
        assert!(conn.is_closed());
        assert!(conn.display().is_null());
    }

    #[test]
    fn test_flush_on_closed_connection_does_not_touch_xlib() {
        let conn = closed_connection();
        conn.flush();
    }

    #[test]
    fn test_managed_display_close_reports_nothing_to_do_when_null() {
        let mut display = ManagedDisplay {
            ptr: ptr::null_mut(),
        };
        assert!(!display.close());
    }
}

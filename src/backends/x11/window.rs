// src/backends/x11/window.rs

use super::connection::Connection;
use crate::backends::CloseToken;
use crate::error::SessionError;
use log::{debug, error, info, trace, warn};
use std::ffi::CString;

use libc::{c_char, c_int, c_long, c_uint};
use x11::xlib;

/// Events the window subscribes to.
pub const EVENT_MASK: c_long = xlib::ExposureMask
    | xlib::KeyPressMask
    | xlib::KeyReleaseMask
    | xlib::ButtonPressMask
    | xlib::ButtonReleaseMask
    | xlib::PointerMotionMask
    | xlib::StructureNotifyMask;

/// A top-level X11 window registered for `WM_DELETE_WINDOW`.
///
/// [`destroy`](Self::destroy) must be called before the connection is closed;
/// `Drop` cannot reach the display and only logs a leak.
#[derive(Debug)]
pub struct Window {
    id: xlib::Window,
    wm_protocols: xlib::Atom,
    wm_delete_window: xlib::Atom,
}

impl Window {
    /// Creates, configures and maps a simple window: black 1px border,
    /// white background, placed at the origin of the root window.
    pub fn create(
        connection: &Connection,
        width: u32,
        height: u32,
        title: &CString,
    ) -> Result<Self, SessionError> {
        info!("Creating X11 window: {}x{}px", width, height);
        let display = connection.display();

        // SAFETY: display is live; all arguments are plain values.
        let id = unsafe {
            xlib::XCreateSimpleWindow(
                display,
                connection.root(),
                0,
                0,
                width as c_uint,
                height as c_uint,
                1,
                connection.black_pixel(),
                connection.white_pixel(),
            )
        };
        if id == 0 {
            return Err(SessionError::WindowCreation);
        }
        debug!("X window created (ID: {})", id);

        let mut window = Self {
            id,
            wm_protocols: 0,
            wm_delete_window: 0,
        };
        window.register_close_protocol(connection);

        unsafe {
            xlib::XSelectInput(display, id, EVENT_MASK);
        }
        window.store_title(connection, title);
        unsafe {
            xlib::XMapWindow(display, id);
        }
        debug!("Window {} mapped.", id);
        Ok(window)
    }

    fn register_close_protocol(&mut self, connection: &Connection) {
        let display = connection.display();
        // SAFETY: atom names are NUL-terminated literals; display and window are live.
        unsafe {
            self.wm_delete_window = xlib::XInternAtom(
                display,
                b"WM_DELETE_WINDOW\0".as_ptr() as *const c_char,
                xlib::False,
            );
            self.wm_protocols = xlib::XInternAtom(
                display,
                b"WM_PROTOCOLS\0".as_ptr() as *const c_char,
                xlib::False,
            );

            if self.wm_delete_window != 0 && self.wm_protocols != 0 {
                let mut protocols = [self.wm_delete_window];
                xlib::XSetWMProtocols(display, self.id, protocols.as_mut_ptr(), 1);
                debug!("WM_PROTOCOLS (WM_DELETE_WINDOW) registered.");
            } else {
                warn!("Failed to intern WM_DELETE_WINDOW or WM_PROTOCOLS. Close requests will not be recognised.");
            }
        }
    }

    /// Sets `WM_NAME` and, when the atoms exist, the UTF-8 `_NET_WM_NAME`.
    pub fn store_title(&self, connection: &Connection, title: &CString) {
        if self.id == 0 || connection.is_closed() {
            warn!("store_title called on a destroyed window.");
            return;
        }
        trace!("Setting window {} title to {:?}", self.id, title);
        let display = connection.display();
        unsafe {
            xlib::XStoreName(display, self.id, title.as_ptr());

            let net_wm_name = xlib::XInternAtom(
                display,
                b"_NET_WM_NAME\0".as_ptr() as *const c_char,
                xlib::False,
            );
            let utf8_string = xlib::XInternAtom(
                display,
                b"UTF8_STRING\0".as_ptr() as *const c_char,
                xlib::False,
            );
            if net_wm_name != 0 && utf8_string != 0 {
                xlib::XChangeProperty(
                    display,
                    self.id,
                    net_wm_name,
                    utf8_string,
                    8,
                    xlib::PropModeReplace,
                    title.as_ptr() as *const u8,
                    title.as_bytes().len() as c_int,
                );
            }
        }
    }

    /// Destroys the window on the server. Idempotent.
    pub fn destroy(&mut self, connection: &Connection) {
        if self.id == 0 || connection.is_closed() {
            debug!("Window already destroyed or connection closed; destroy skipped.");
            return;
        }
        info!("Destroying X11 window (ID: {}).", self.id);
        unsafe {
            xlib::XDestroyWindow(connection.display(), self.id);
        }
        self.id = 0;
    }

    #[inline]
    pub fn id(&self) -> xlib::Window {
        self.id
    }

    pub fn close_token(&self) -> CloseToken {
        CloseToken {
            protocols: self.wm_protocols,
            delete_window: self.wm_delete_window,
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.id != 0 {
            error!(
                "Window (ID: {}) dropped without destroy(). Server resources may leak.",
                self.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_token_carries_interned_atoms() {
        let window = Window {
            id: 0,
            wm_protocols: 301,
            wm_delete_window: 302,
        };
        let token = window.close_token();
        assert!(token.matches(301, 302));
        assert!(!token.matches(301, 303));
        assert!(!token.matches(300, 302));
    }

    #[test]
    fn event_mask_covers_input_and_structure_events() {
        for mask in [
            xlib::KeyPressMask,
            xlib::KeyReleaseMask,
            xlib::ButtonPressMask,
            xlib::ButtonReleaseMask,
            xlib::PointerMotionMask,
            xlib::StructureNotifyMask,
            xlib::ExposureMask,
        ] {
            assert_ne!(EVENT_MASK & mask, 0);
        }
    }
}

// src/backends/x11/mod.rs

//! Xlib implementation of [`DisplayBackend`].
//!
//! `XlibBackend` owns the pieces one window needs, each in its own submodule:
//! - `connection`: the display connection and default-screen values.
//! - `window`: the top-level window and its `WM_DELETE_WINDOW` registration.
//! - `graphics`: the graphics context and off-screen pixmaps.
//! - `event`: non-blocking event decoding and keyboard lookup.

pub mod connection;
pub mod event;
pub mod graphics;
pub mod window;

use crate::backends::{BufferId, CloseToken, DisplayBackend, DrawCommand, RawEvent, Surface};
use crate::error::SessionError;
use crate::keys::{KeyCode, KeyLookup, Modifiers};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::ffi::CString;

use connection::Connection;
use graphics::{GraphicsContext, Pixmap};
use window::Window;
use x11::xlib;

pub struct XlibBackend {
    connection: Connection,
    window: Window,
    gc: GraphicsContext,
    pixmaps: HashMap<BufferId, Pixmap>,
    next_buffer: u64,
    released: bool,
}

impl XlibBackend {
    /// Opens the default display and creates a mapped `width` x `height`
    /// window titled `title`.
    pub fn connect(width: u32, height: u32, title: &str) -> Result<Self, SessionError> {
        let title = CString::new(title).map_err(|_| SessionError::InvalidTitle)?;
        let mut connection = Connection::open()?;

        let mut window = match Window::create(&connection, width, height, &title) {
            Ok(window) => window,
            Err(e) => {
                connection.close();
                return Err(e);
            }
        };

        let Some(gc) = GraphicsContext::create(&connection, window.id()) else {
            error!("Failed to create a graphics context for the window.");
            window.destroy(&connection);
            connection.close();
            return Err(SessionError::WindowCreation);
        };

        connection.flush();
        info!(
            "Xlib backend ready: window {} ({}x{}).",
            window.id(),
            width,
            height
        );
        Ok(Self {
            connection,
            window,
            gc,
            pixmaps: HashMap::new(),
            next_buffer: 1,
            released: false,
        })
    }

    fn drawable(&self, surface: Surface) -> Option<xlib::Drawable> {
        match surface {
            Surface::Window => Some(self.window.id()),
            Surface::Buffer(id) => {
                let pixmap = self.pixmaps.get(&id);
                if pixmap.is_none() {
                    warn!("Draw on unknown buffer {:?} ignored.", id);
                }
                pixmap.map(Pixmap::id)
            }
        }
    }
}

impl DisplayBackend for XlibBackend {
    fn close_token(&self) -> CloseToken {
        self.window.close_token()
    }

    fn next_event(&mut self) -> Option<RawEvent> {
        if self.released {
            return None;
        }
        event::next_event(&self.connection)
    }

    fn draw(&mut self, surface: Surface, command: DrawCommand) {
        if self.released {
            return;
        }
        if let Some(drawable) = self.drawable(surface) {
            self.gc.execute(&self.connection, drawable, command);
        }
    }

    fn flush(&mut self) {
        if !self.released {
            self.connection.flush();
        }
    }

    fn set_title(&mut self, title: &str) {
        if self.released {
            return;
        }
        match CString::new(title) {
            Ok(title) => {
                self.window.store_title(&self.connection, &title);
                self.connection.flush();
            }
            Err(_) => warn!("Window title {:?} contains a NUL byte; not set.", title),
        }
    }

    fn lookup_key(&mut self, code: KeyCode, modifiers: Modifiers) -> KeyLookup {
        if self.released {
            return KeyLookup::default();
        }
        event::lookup_key(&self.connection, code, modifiers)
    }

    fn create_buffer(&mut self, width: u32, height: u32) -> Option<BufferId> {
        if self.released {
            return None;
        }
        let pixmap = Pixmap::create(&self.connection, self.window.id(), width, height)?;
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.pixmaps.insert(id, pixmap);
        Some(id)
    }

    fn copy_buffer(&mut self, buffer: BufferId, width: u32, height: u32) {
        if self.released {
            return;
        }
        let Some(pixmap) = self.pixmaps.get(&buffer) else {
            warn!("Copy from unknown buffer {:?} ignored.", buffer);
            return;
        };
        let (pix_width, pix_height) = pixmap.size();
        self.gc.copy_area(
            &self.connection,
            pixmap.id(),
            self.window.id(),
            width.min(pix_width),
            height.min(pix_height),
        );
    }

    fn free_buffer(&mut self, buffer: BufferId) {
        match self.pixmaps.remove(&buffer) {
            Some(mut pixmap) => pixmap.free(&self.connection),
            None => debug!("Free of unknown buffer {:?} ignored.", buffer),
        }
    }

    fn release(&mut self) {
        if self.released {
            debug!("Xlib backend already released.");
            return;
        }
        info!("Releasing Xlib backend resources.");
        for (_, mut pixmap) in self.pixmaps.drain() {
            pixmap.free(&self.connection);
        }
        self.gc.free(&self.connection);
        self.window.destroy(&self.connection);
        self.connection.close();
        self.released = true;
    }
}

impl Drop for XlibBackend {
    fn drop(&mut self) {
        self.release();
    }
}

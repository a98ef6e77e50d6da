// src/lib.rs

//! A small convenience layer over Xlib.
//!
//! `x11lite` opens one window per [`Session`], hands back at most one input
//! event per [`Session::poll_event`] call and forwards simple drawing requests
//! (pixels, lines, rectangles, clear, present) straight to the server.
//!
//! ```no_run
//! use x11lite::{rgb, Event, Session};
//!
//! # fn main() -> Result<(), x11lite::SessionError> {
//! let mut session = Session::open(640, 480, "demo")?;
//! while session.is_open() {
//!     while let Some(event) = session.poll_event() {
//!         if let Event::KeyDown { code, .. } = event {
//!             log::info!("key {:?}", code);
//!         }
//!     }
//!     session.clear(rgb(255, 255, 255));
//!     session.draw_line(0, 0, 639, 479, rgb(255, 0, 0));
//!     session.present();
//! }
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod keys;
pub mod session;

pub use backends::x11::XlibBackend;
pub use color::rgb;
pub use error::{ConfigError, SessionError};
pub use event::Event;
pub use keys::{KeyCode, KeyLookup, KeySymbol, Modifiers, MouseButton};
pub use session::{BackBuffer, Canvas, Session};

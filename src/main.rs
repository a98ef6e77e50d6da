// src/main.rs

//! `input-showcase`: echoes typed text as a row of blocks in a window.

use anyhow::Context;
use log::{debug, info, warn};
use std::thread;
use std::time::Duration;

use x11lite::backends::DisplayBackend;
use x11lite::config::{AppearanceConfig, CONFIG};
use x11lite::{BackBuffer, Canvas, Event, KeySymbol, Session};

/// Maximum number of characters kept in the typed-text buffer.
const TYPED_TEXT_CAPACITY: usize = 255;

/// The text typed so far. Holds at most [`TYPED_TEXT_CAPACITY`] characters.
#[derive(Debug, Default)]
struct TypedText {
    chars: Vec<char>,
}

impl TypedText {
    /// Applies one key press. Returns whether the text changed.
    fn apply(&mut self, symbol: KeySymbol) -> bool {
        match symbol {
            KeySymbol::Backspace => self.chars.pop().is_some(),
            KeySymbol::Enter => self.push('\n'),
            KeySymbol::Char(c) if (' '..='~').contains(&c) => self.push(c),
            _ => false,
        }
    }

    fn push(&mut self, c: char) -> bool {
        if self.chars.len() >= TYPED_TEXT_CAPACITY {
            return false;
        }
        self.chars.push(c);
        true
    }

    /// Top-left corners of the block drawn for each visible character.
    fn block_origins(&self, appearance: &AppearanceConfig) -> Vec<(i32, i32)> {
        let (mut x, mut y) = (appearance.origin_x, appearance.origin_y);
        let mut origins = Vec::with_capacity(self.chars.len());
        for &c in &self.chars {
            if c == '\n' {
                x = appearance.origin_x;
                y += appearance.line_height;
                continue;
            }
            origins.push((x, y));
            x += appearance.advance_x;
        }
        origins
    }
}

fn draw_frame<B: DisplayBackend>(
    canvas: &mut Canvas<'_, B>,
    text: &TypedText,
    appearance: &AppearanceConfig,
) {
    canvas.clear(appearance.background.to_pixel());
    let foreground = appearance.foreground.to_pixel();
    for (x, y) in text.block_origins(appearance) {
        canvas.draw_rect(
            x,
            y,
            appearance.glyph_width,
            appearance.glyph_height,
            foreground,
            true,
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting input-showcase...");
    let config = &*CONFIG;
    let mut session = Session::open(
        config.window.width,
        config.window.height,
        &config.window.title,
    )
    .with_context(|| {
        format!(
            "Failed to open a {}x{} window",
            config.window.width, config.window.height
        )
    })?;

    let appearance = &config.appearance;
    let frame_interval = Duration::from_millis(config.performance.frame_interval_ms);
    let mut text = TypedText::default();
    let mut back_buffer: Option<BackBuffer> = session.create_back_buffer();
    if back_buffer.is_none() {
        warn!("No back buffer available; drawing straight to the window.");
    }

    while session.is_open() {
        while let Some(event) = session.poll_event() {
            match event {
                Event::KeyDown { code, modifiers } => {
                    let lookup = session.lookup_key(code, modifiers);
                    if text.apply(lookup.symbol) {
                        debug!("Typed text now {} chars", text.chars.len());
                    }
                }
                Event::Resize { width, height } => {
                    if let Some(old) = back_buffer.take() {
                        session.free_back_buffer(old);
                    }
                    back_buffer = session.create_back_buffer();
                    debug!("Back buffer re-created for {}x{}", width, height);
                }
                Event::Close => info!("Window closed."),
                _ => {}
            }
        }
        if !session.is_open() {
            break;
        }

        match &back_buffer {
            Some(buffer) => {
                draw_frame(&mut session.buffer_canvas(buffer), &text, appearance);
                session.blit(buffer);
            }
            None => draw_frame(&mut session.window_canvas(), &text, appearance),
        }
        session.present();
        thread::sleep(frame_interval);
    }

    if let Some(buffer) = back_buffer.take() {
        session.free_back_buffer(buffer);
    }
    session.close();
    info!("input-showcase exited cleanly.");
    Ok(())
}

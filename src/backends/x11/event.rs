// src/backends/x11/event.rs

use super::connection::Connection;
use crate::backends::RawEvent;
use crate::keys::{KeyCode, KeyLookup, KeySymbol, Modifiers};

use log::{debug, trace};
use std::mem;
use std::ptr;

use libc::{c_char, c_int, c_uint};
use x11::{keysym, xlib};

/// Buffer size for text obtained from `XLookupString`.
const KEY_TEXT_BUFFER_SIZE: usize = 32;

/// Dequeues one event if any is pending. Never blocks.
pub fn next_event(connection: &Connection) -> Option<RawEvent> {
    if connection.is_closed() {
        return None;
    }
    let display = connection.display();
    // SAFETY: display is live. XPending flushes the output buffer and reports
    // the queue length; XNextEvent only runs when it is non-zero, so it does
    // not block.
    if unsafe { xlib::XPending(display) } == 0 {
        return None;
    }
    let mut xevent: xlib::XEvent = unsafe { mem::zeroed() };
    unsafe { xlib::XNextEvent(display, &mut xevent) };
    let raw = decode(&xevent);
    trace!("XEvent decoded: {:?}", raw);
    Some(raw)
}

/// Converts an `XEvent` into the backend-neutral form.
pub fn decode(xevent: &xlib::XEvent) -> RawEvent {
    // SAFETY: `type_` is the shared discriminant of every XEvent variant, and
    // each arm reads only the member that matches it.
    let event_type = unsafe { xevent.type_ };
    match event_type {
        xlib::KeyPress | xlib::KeyRelease => {
            let key = unsafe { xevent.key };
            let code = KeyCode(key.keycode);
            let modifiers = modifiers_from_state(key.state);
            if event_type == xlib::KeyPress {
                RawEvent::KeyPress { code, modifiers }
            } else {
                RawEvent::KeyRelease { code, modifiers }
            }
        }
        xlib::MotionNotify => {
            let motion = unsafe { xevent.motion };
            RawEvent::Motion {
                x: motion.x,
                y: motion.y,
            }
        }
        xlib::ButtonPress | xlib::ButtonRelease => {
            let button = unsafe { xevent.button };
            if event_type == xlib::ButtonPress {
                RawEvent::ButtonPress {
                    x: button.x,
                    y: button.y,
                    button: button.button,
                }
            } else {
                RawEvent::ButtonRelease {
                    x: button.x,
                    y: button.y,
                    button: button.button,
                }
            }
        }
        xlib::ConfigureNotify => {
            let configure = unsafe { xevent.configure };
            RawEvent::Configure {
                width: configure.width.max(0) as u32,
                height: configure.height.max(0) as u32,
            }
        }
        xlib::ClientMessage => {
            let client = unsafe { xevent.client_message };
            RawEvent::ClientMessage {
                message_type: client.message_type,
                data0: client.data.get_long(0) as u64,
            }
        }
        xlib::Expose => RawEvent::Expose,
        other => RawEvent::Other(other),
    }
}

/// Maps an X modifier state mask to [`Modifiers`]. Mod1 is Alt, Mod2 is
/// NumLock and Mod4 is Super on practically every keymap.
pub fn modifiers_from_state(state: c_uint) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if state & xlib::ShiftMask != 0 {
        modifiers.insert(Modifiers::SHIFT);
    }
    if state & xlib::ControlMask != 0 {
        modifiers.insert(Modifiers::CONTROL);
    }
    if state & xlib::LockMask != 0 {
        modifiers.insert(Modifiers::CAPS_LOCK);
    }
    if state & xlib::Mod1Mask != 0 {
        modifiers.insert(Modifiers::ALT);
    }
    if state & xlib::Mod2Mask != 0 {
        modifiers.insert(Modifiers::NUM_LOCK);
    }
    if state & xlib::Mod4Mask != 0 {
        modifiers.insert(Modifiers::SUPER);
    }
    modifiers
}

pub fn state_from_modifiers(modifiers: Modifiers) -> c_uint {
    let mut state = 0;
    if modifiers.contains(Modifiers::SHIFT) {
        state |= xlib::ShiftMask;
    }
    if modifiers.contains(Modifiers::CONTROL) {
        state |= xlib::ControlMask;
    }
    if modifiers.contains(Modifiers::CAPS_LOCK) {
        state |= xlib::LockMask;
    }
    if modifiers.contains(Modifiers::ALT) {
        state |= xlib::Mod1Mask;
    }
    if modifiers.contains(Modifiers::NUM_LOCK) {
        state |= xlib::Mod2Mask;
    }
    if modifiers.contains(Modifiers::SUPER) {
        state |= xlib::Mod4Mask;
    }
    state
}

/// Resolves `code` with `XLookupString` on a synthesized key event.
pub fn lookup_key(connection: &Connection, code: KeyCode, modifiers: Modifiers) -> KeyLookup {
    if connection.is_closed() {
        return KeyLookup::default();
    }
    // XLookupString only reads display, keycode and state.
    let mut key_event: xlib::XKeyEvent = unsafe { mem::zeroed() };
    key_event.type_ = xlib::KeyPress;
    key_event.display = connection.display();
    key_event.keycode = code.0;
    key_event.state = state_from_modifiers(modifiers);

    let mut x_keysym: xlib::KeySym = 0;
    let mut text_buffer = [0u8; KEY_TEXT_BUFFER_SIZE];
    // SAFETY: key_event points at a valid XKeyEvent with a live display; the
    // buffer length passed matches the buffer.
    let count = unsafe {
        xlib::XLookupString(
            &mut key_event,
            text_buffer.as_mut_ptr() as *mut c_char,
            text_buffer.len() as c_int,
            &mut x_keysym,
            ptr::null_mut(),
        )
    };
    let text = if count > 0 {
        String::from_utf8_lossy(&text_buffer[..count as usize]).into_owned()
    } else {
        String::new()
    };
    let keysym = u32::try_from(x_keysym).unwrap_or(0);
    let symbol = keysym_to_symbol(keysym, &text);
    debug!(
        "Key lookup: code {} -> keysym 0x{:X} ({:?}), text {:?}",
        code.0, keysym, symbol, text
    );
    KeyLookup {
        symbol,
        keysym,
        text,
    }
}

/// Maps a keysym (plus the text `XLookupString` produced for it) to a
/// [`KeySymbol`]. Named keys win over their control-character text, so
/// Return is `Enter` rather than `Char('\r')`.
pub fn keysym_to_symbol(keysym: u32, text: &str) -> KeySymbol {
    match keysym {
        keysym::XK_Shift_L | keysym::XK_Shift_R => KeySymbol::Shift,
        keysym::XK_Control_L | keysym::XK_Control_R => KeySymbol::Control,
        keysym::XK_Alt_L | keysym::XK_Alt_R | keysym::XK_Meta_L | keysym::XK_Meta_R => {
            KeySymbol::Alt
        }
        keysym::XK_Super_L | keysym::XK_Super_R | keysym::XK_Hyper_L | keysym::XK_Hyper_R => {
            KeySymbol::Super
        }
        keysym::XK_Caps_Lock => KeySymbol::CapsLock,
        keysym::XK_Num_Lock => KeySymbol::NumLock,

        keysym::XK_Return | keysym::XK_KP_Enter => KeySymbol::Enter,
        keysym::XK_BackSpace => KeySymbol::Backspace,
        keysym::XK_Tab | keysym::XK_KP_Tab | keysym::XK_ISO_Left_Tab => KeySymbol::Tab,
        keysym::XK_Escape => KeySymbol::Escape,

        keysym::XK_Home | keysym::XK_KP_Home => KeySymbol::Home,
        keysym::XK_Left | keysym::XK_KP_Left => KeySymbol::Left,
        keysym::XK_Up | keysym::XK_KP_Up => KeySymbol::Up,
        keysym::XK_Right | keysym::XK_KP_Right => KeySymbol::Right,
        keysym::XK_Down | keysym::XK_KP_Down => KeySymbol::Down,
        keysym::XK_Page_Up | keysym::XK_KP_Page_Up => KeySymbol::PageUp,
        keysym::XK_Page_Down | keysym::XK_KP_Page_Down => KeySymbol::PageDown,
        keysym::XK_End | keysym::XK_KP_End => KeySymbol::End,
        keysym::XK_Insert | keysym::XK_KP_Insert => KeySymbol::Insert,
        keysym::XK_Delete | keysym::XK_KP_Delete => KeySymbol::Delete,

        keysym::XK_F1 => KeySymbol::F1,
        keysym::XK_F2 => KeySymbol::F2,
        keysym::XK_F3 => KeySymbol::F3,
        keysym::XK_F4 => KeySymbol::F4,
        keysym::XK_F5 => KeySymbol::F5,
        keysym::XK_F6 => KeySymbol::F6,
        keysym::XK_F7 => KeySymbol::F7,
        keysym::XK_F8 => KeySymbol::F8,
        keysym::XK_F9 => KeySymbol::F9,
        keysym::XK_F10 => KeySymbol::F10,
        keysym::XK_F11 => KeySymbol::F11,
        keysym::XK_F12 => KeySymbol::F12,

        _ => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '\u{FFFD}' => KeySymbol::Char(c),
                _ => KeySymbol::Unknown,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(event_type: c_int, keycode: c_uint, state: c_uint) -> xlib::XEvent {
        let mut key: xlib::XKeyEvent = unsafe { mem::zeroed() };
        key.type_ = event_type;
        key.keycode = keycode;
        key.state = state;
        xlib::XEvent { key }
    }

    fn button_event(event_type: c_int, button: c_uint, x: c_int, y: c_int) -> xlib::XEvent {
        let mut ev: xlib::XButtonEvent = unsafe { mem::zeroed() };
        ev.type_ = event_type;
        ev.button = button;
        ev.x = x;
        ev.y = y;
        xlib::XEvent { button: ev }
    }

    #[test]
    fn test_decode_key_events() {
        let press = decode(&key_event(xlib::KeyPress, 38, xlib::ShiftMask));
        assert_eq!(
            press,
            RawEvent::KeyPress {
                code: KeyCode(38),
                modifiers: Modifiers::SHIFT
            }
        );
        let release = decode(&key_event(xlib::KeyRelease, 38, 0));
        assert_eq!(
            release,
            RawEvent::KeyRelease {
                code: KeyCode(38),
                modifiers: Modifiers::empty()
            }
        );
    }

    #[test]
    fn test_decode_pointer_events() {
        assert_eq!(
            decode(&button_event(xlib::ButtonPress, 1, 10, 20)),
            RawEvent::ButtonPress {
                x: 10,
                y: 20,
                button: 1
            }
        );
        assert_eq!(
            decode(&button_event(xlib::ButtonRelease, 3, 5, 6)),
            RawEvent::ButtonRelease {
                x: 5,
                y: 6,
                button: 3
            }
        );

        let mut motion: xlib::XMotionEvent = unsafe { mem::zeroed() };
        motion.type_ = xlib::MotionNotify;
        motion.x = 7;
        motion.y = 8;
        assert_eq!(
            decode(&xlib::XEvent { motion }),
            RawEvent::Motion { x: 7, y: 8 }
        );
    }

    #[test]
    fn test_decode_configure_and_client_message() {
        let mut configure: xlib::XConfigureEvent = unsafe { mem::zeroed() };
        configure.type_ = xlib::ConfigureNotify;
        configure.width = 640;
        configure.height = 480;
        assert_eq!(
            decode(&xlib::XEvent { configure }),
            RawEvent::Configure {
                width: 640,
                height: 480
            }
        );

        let mut client: xlib::XClientMessageEvent = unsafe { mem::zeroed() };
        client.type_ = xlib::ClientMessage;
        client.message_type = 301;
        client.format = 32;
        client.data.set_long(0, 302);
        assert_eq!(
            decode(&xlib::XEvent {
                client_message: client
            }),
            RawEvent::ClientMessage {
                message_type: 301,
                data0: 302
            }
        );
    }

    #[test]
    fn test_decode_unhandled_types() {
        let mut expose: xlib::XExposeEvent = unsafe { mem::zeroed() };
        expose.type_ = xlib::Expose;
        assert_eq!(decode(&xlib::XEvent { expose }), RawEvent::Expose);

        let mut any: xlib::XAnyEvent = unsafe { mem::zeroed() };
        any.type_ = xlib::FocusIn;
        assert_eq!(
            decode(&xlib::XEvent { any }),
            RawEvent::Other(xlib::FocusIn)
        );
    }

    #[test]
    fn test_modifier_state_round_trip() {
        let all = Modifiers::all();
        assert_eq!(modifiers_from_state(state_from_modifiers(all)), all);
        assert_eq!(
            modifiers_from_state(xlib::ControlMask | xlib::Mod1Mask),
            Modifiers::CONTROL | Modifiers::ALT
        );
        assert_eq!(state_from_modifiers(Modifiers::empty()), 0);
    }

    #[test]
    fn test_keysym_to_symbol_special_keys() {
        assert_eq!(keysym_to_symbol(keysym::XK_Return, "\r"), KeySymbol::Enter);
        assert_eq!(
            keysym_to_symbol(keysym::XK_BackSpace, "\u{8}"),
            KeySymbol::Backspace
        );
        assert_eq!(
            keysym_to_symbol(keysym::XK_Escape, "\u{1b}"),
            KeySymbol::Escape
        );
        assert_eq!(keysym_to_symbol(keysym::XK_Tab, "\t"), KeySymbol::Tab);
        assert_eq!(keysym_to_symbol(keysym::XK_Shift_L, ""), KeySymbol::Shift);
        assert_eq!(keysym_to_symbol(keysym::XK_KP_Left, ""), KeySymbol::Left);
        assert_eq!(keysym_to_symbol(keysym::XK_F12, ""), KeySymbol::F12);
    }

    #[test]
    fn test_keysym_to_symbol_char_input() {
        assert_eq!(keysym_to_symbol(keysym::XK_a, "a"), KeySymbol::Char('a'));
        assert_eq!(keysym_to_symbol(keysym::XK_A, "A"), KeySymbol::Char('A'));
        assert_eq!(
            keysym_to_symbol(keysym::XK_space, " "),
            KeySymbol::Char(' ')
        );
        assert_eq!(keysym_to_symbol(keysym::XK_a, ""), KeySymbol::Unknown);
        assert_eq!(keysym_to_symbol(0, "ab"), KeySymbol::Unknown);
    }
}

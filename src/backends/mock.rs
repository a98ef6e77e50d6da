// src/backends/mock.rs

use crate::backends::{BufferId, CloseToken, DisplayBackend, DrawCommand, RawEvent, Surface};
use crate::keys::{KeyCode, KeyLookup, Modifiers};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

pub const MOCK_PROTOCOLS_ATOM: u64 = 301;
pub const MOCK_DELETE_WINDOW_ATOM: u64 = 302;

/// Everything a session asked the mock to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Draw(Surface, DrawCommand),
    Flush,
    SetTitle(String),
    CreateBuffer(BufferId, u32, u32),
    CopyBuffer(BufferId, u32, u32),
    FreeBuffer(BufferId),
    Release,
}

#[derive(Default)]
struct MockState {
    events: VecDeque<RawEvent>,
    calls: Vec<Call>,
}

/// Test-side view of a `MockBackend` that stays usable after the backend
/// has been moved into (and dropped by) a session.
#[derive(Clone, Default)]
pub struct MockHandle {
    state: Rc<RefCell<MockState>>,
}

impl MockHandle {
    pub fn push_event(&self, event: RawEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.state.borrow().events.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }
}

pub struct MockBackend {
    handle: MockHandle,
    keymap: BTreeMap<u32, KeyLookup>,
    live_buffers: Vec<BufferId>,
    next_buffer: u64,
    released: bool,
}

impl MockBackend {
    pub fn new() -> (Self, MockHandle) {
        let handle = MockHandle::default();
        let backend = Self {
            handle: handle.clone(),
            keymap: BTreeMap::new(),
            live_buffers: Vec::new(),
            next_buffer: 1,
            released: false,
        };
        (backend, handle)
    }

    pub fn map_key(&mut self, code: u32, lookup: KeyLookup) {
        self.keymap.insert(code, lookup);
    }

    pub fn delete_window_message() -> RawEvent {
        RawEvent::ClientMessage {
            message_type: MOCK_PROTOCOLS_ATOM,
            data0: MOCK_DELETE_WINDOW_ATOM,
        }
    }

    fn record(&self, call: Call) {
        assert!(!self.released, "{:?} issued after release", call);
        self.handle.state.borrow_mut().calls.push(call);
    }
}

impl DisplayBackend for MockBackend {
    fn close_token(&self) -> CloseToken {
        CloseToken {
            protocols: MOCK_PROTOCOLS_ATOM,
            delete_window: MOCK_DELETE_WINDOW_ATOM,
        }
    }

    fn next_event(&mut self) -> Option<RawEvent> {
        assert!(!self.released, "next_event after release");
        self.handle.state.borrow_mut().events.pop_front()
    }

    fn draw(&mut self, surface: Surface, command: DrawCommand) {
        self.record(Call::Draw(surface, command));
    }

    fn flush(&mut self) {
        self.record(Call::Flush);
    }

    fn set_title(&mut self, title: &str) {
        self.record(Call::SetTitle(title.to_string()));
    }

    fn lookup_key(&mut self, code: KeyCode, _modifiers: Modifiers) -> KeyLookup {
        self.keymap.get(&code.0).cloned().unwrap_or_default()
    }

    fn create_buffer(&mut self, width: u32, height: u32) -> Option<BufferId> {
        if width == 0 || height == 0 {
            return None;
        }
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.live_buffers.push(id);
        self.record(Call::CreateBuffer(id, width, height));
        Some(id)
    }

    fn copy_buffer(&mut self, buffer: BufferId, width: u32, height: u32) {
        self.record(Call::CopyBuffer(buffer, width, height));
    }

    fn free_buffer(&mut self, buffer: BufferId) {
        if let Some(pos) = self.live_buffers.iter().position(|b| *b == buffer) {
            self.live_buffers.remove(pos);
            self.record(Call::FreeBuffer(buffer));
        }
    }

    fn release(&mut self) {
        for buffer in std::mem::take(&mut self.live_buffers) {
            self.record(Call::FreeBuffer(buffer));
        }
        self.record(Call::Release);
        self.released = true;
    }
}

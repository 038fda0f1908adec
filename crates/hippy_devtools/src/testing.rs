//! In-memory platform used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use codee::Encoder;
use hippy_devtools_common::DevtoolsFrame;
use hippy_devtools_common::codec::DevtoolsJsonCodec;
use leptos_use::core::ConnectionReadyState;

use crate::error::DevtoolsError;
use crate::platform::{
    ContentNode, MountedUi, PendingTask, Platform, Socket, SocketData, SocketEvents,
    TransportError,
};
use crate::props::InspectorProps;

#[derive(Clone, Default)]
pub(crate) struct FakeNode {
    html: Rc<RefCell<String>>,
}

impl FakeNode {
    pub(crate) fn with_html(html: &str) -> Self {
        Self {
            html: Rc::new(RefCell::new(html.to_string())),
        }
    }

    pub(crate) fn html(&self) -> String {
        self.html.borrow().clone()
    }
}

impl ContentNode for FakeNode {
    fn inner_html(&self) -> String {
        self.html()
    }

    fn set_inner_html(&self, html: &str) {
        *self.html.borrow_mut() = html.to_string();
    }
}

pub(crate) struct FakeRoot {
    live: Rc<Cell<bool>>,
}

impl FakeRoot {
    pub(crate) fn new() -> (Self, Rc<Cell<bool>>) {
        let live = Rc::new(Cell::new(true));
        (Self { live: live.clone() }, live)
    }
}

impl MountedUi for FakeRoot {
    fn unmount(self: Box<Self>) {
        self.live.set(false);
    }
}

pub(crate) struct FakeTask {
    cancelled: Rc<Cell<bool>>,
}

impl FakeTask {
    pub(crate) fn new() -> (Self, Rc<Cell<bool>>) {
        let cancelled = Rc::new(Cell::new(false));
        (
            Self {
                cancelled: cancelled.clone(),
            },
            cancelled,
        )
    }
}

impl PendingTask for FakeTask {
    fn cancel(self: Box<Self>) {
        self.cancelled.set(true);
    }
}

#[derive(Clone)]
pub(crate) struct FakeSocket {
    state: Rc<RefCell<ConnectionReadyState>>,
    pub(crate) sent: Rc<RefCell<Vec<String>>>,
}

impl FakeSocket {
    fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ConnectionReadyState::Connecting)),
            sent: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn set_state(&self, state: ConnectionReadyState) {
        *self.state.borrow_mut() = state;
    }
}

impl Socket for FakeSocket {
    fn ready_state(&self) -> ConnectionReadyState {
        self.state.borrow().clone()
    }

    fn send(&self, frame: &DevtoolsFrame) -> Result<(), DevtoolsError> {
        let text = DevtoolsJsonCodec::encode(frame)?;
        self.sent.borrow_mut().push(text);
        Ok(())
    }

    fn close(&self) {
        self.set_state(ConnectionReadyState::Closed);
    }
}

pub(crate) struct FakeConnection {
    pub(crate) url: String,
    pub(crate) socket: FakeSocket,
    events: Rc<dyn SocketEvents>,
}

impl FakeConnection {
    pub(crate) fn open(&self) {
        self.socket.set_state(ConnectionReadyState::Open);
        self.events.on_open();
    }

    pub(crate) fn text(&self, text: &str) {
        self.events.on_message(SocketData::Text(text.to_string()));
    }

    pub(crate) fn binary(&self) {
        self.events.on_message(SocketData::Binary);
    }

    pub(crate) fn close(&self) {
        self.socket.set_state(ConnectionReadyState::Closed);
        self.events.on_close();
    }

    pub(crate) fn error(&self, error: TransportError) {
        self.events.on_error(error);
    }

    /// Outbound frames decoded back to `(event, payload)`.
    pub(crate) fn sent_frames(&self) -> Vec<(String, serde_json::Value)> {
        self.socket
            .sent
            .borrow()
            .iter()
            .map(|text| {
                let value: serde_json::Value = serde_json::from_str(text).unwrap();
                (
                    value["event"].as_str().unwrap().to_string(),
                    value["payload"].clone(),
                )
            })
            .collect()
    }
}

struct Rendered {
    props: InspectorProps,
    live: Rc<Cell<bool>>,
}

struct Timer {
    delay: Duration,
    task: Box<dyn FnOnce()>,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Default)]
struct FakeState {
    location: RefCell<Option<String>>,
    connect_error: RefCell<Option<String>>,
    connections: RefCell<Vec<Rc<FakeConnection>>>,
    renders: RefCell<Vec<Rendered>>,
    timers: RefCell<Vec<Timer>>,
    preferences: RefCell<HashMap<String, String>>,
    preferences_fail: Cell<bool>,
}

#[derive(Clone, Default)]
pub(crate) struct FakePlatform {
    state: Rc<FakeState>,
}

impl FakePlatform {
    pub(crate) fn with_location(location: &str) -> Self {
        let platform = Self::default();
        *platform.state.location.borrow_mut() = Some(location.to_string());
        platform
    }

    pub(crate) fn fail_next_connect(&self, message: &str) {
        *self.state.connect_error.borrow_mut() = Some(message.to_string());
    }

    /// Makes every later preference write fail.
    pub(crate) fn fail_preference_writes(&self) {
        self.state.preferences_fail.set(true);
    }

    pub(crate) fn connection(&self, index: usize) -> Rc<FakeConnection> {
        self.state.connections.borrow()[index].clone()
    }

    pub(crate) fn connection_count(&self) -> usize {
        self.state.connections.borrow().len()
    }

    /// Runs every timer queued so far that was not cancelled.
    pub(crate) fn run_timers(&self) -> usize {
        let timers: Vec<Timer> = self.state.timers.borrow_mut().drain(..).collect();
        let mut ran = 0;
        for timer in timers {
            if !timer.cancelled.get() {
                (timer.task)();
                ran += 1;
            }
        }
        ran
    }

    pub(crate) fn pending_timers(&self) -> Vec<Duration> {
        self.state
            .timers
            .borrow()
            .iter()
            .filter(|timer| !timer.cancelled.get())
            .map(|timer| timer.delay)
            .collect()
    }

    pub(crate) fn render_count(&self) -> usize {
        self.state.renders.borrow().len()
    }

    /// Props of every root that is still mounted.
    pub(crate) fn live_roots(&self) -> Vec<InspectorProps> {
        self.state
            .renders
            .borrow()
            .iter()
            .filter(|rendered| rendered.live.get())
            .map(|rendered| rendered.props.clone())
            .collect()
    }

    pub(crate) fn stored_preference(&self, key: &str) -> Option<String> {
        self.state.preferences.borrow().get(key).cloned()
    }
}

impl Platform for FakePlatform {
    type Node = FakeNode;
    type Socket = FakeSocket;

    fn page_location(&self) -> Option<String> {
        self.state.location.borrow().clone()
    }

    fn connect(
        &self,
        url: &str,
        events: Rc<dyn SocketEvents>,
    ) -> Result<Self::Socket, DevtoolsError> {
        if let Some(message) = self.state.connect_error.borrow_mut().take() {
            return Err(DevtoolsError::SocketOpen {
                url: url.to_string(),
                message,
            });
        }

        let socket = FakeSocket::new();
        self.state.connections.borrow_mut().push(Rc::new(FakeConnection {
            url: url.to_string(),
            socket: socket.clone(),
            events,
        }));
        Ok(socket)
    }

    fn render(&self, _node: &Self::Node, props: InspectorProps) -> Box<dyn MountedUi> {
        let (root, live) = FakeRoot::new();
        self.state.renders.borrow_mut().push(Rendered { props, live });
        Box::new(root)
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Box<dyn PendingTask> {
        let (handle, cancelled) = FakeTask::new();
        self.state.timers.borrow_mut().push(Timer {
            delay,
            task,
            cancelled,
        });
        Box::new(handle)
    }

    fn preference(&self, key: &str) -> Option<String> {
        self.stored_preference(key)
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<(), DevtoolsError> {
        if self.state.preferences_fail.get() {
            return Err(DevtoolsError::Storage {
                message: "QuotaExceededError".to_string(),
            });
        }
        self.state
            .preferences
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

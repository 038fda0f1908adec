//! One socket connection to the debug target.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use codee::Decoder;
use hippy_devtools_common::codec::DevtoolsJsonCodec;
use hippy_devtools_common::{DevtoolsFrame, FrameError, StatusKind};
use leptos_use::core::ConnectionReadyState;
use serde_json::Value as JsonValue;

use crate::frontend::Frontend;
use crate::platform::{Platform, Socket, SocketData, SocketEvents, TransportError};

/// Writes `{event, payload}` to `socket` if it is open.
///
/// Frames sent while the socket is connecting or closed are dropped; there
/// is no outbound queue.
pub fn send_frame<S: Socket>(socket: &S, event: &str, payload: JsonValue) {
    if socket.ready_state() != ConnectionReadyState::Open {
        log::debug!("[DevTools] Socket not open, dropping '{event}'");
        return;
    }

    if let Err(e) = socket.send(&DevtoolsFrame::new(event, payload)) {
        log::error!("[DevTools] Failed to send '{event}': {e}");
    }
}

pub(crate) struct SocketSession<P: Platform> {
    frontend: Rc<Frontend<P>>,
    socket: RefCell<Option<P::Socket>>,
    closed: Cell<bool>,
}

impl<P: Platform> SocketSession<P> {
    pub(crate) fn new(frontend: Rc<Frontend<P>>) -> Self {
        Self {
            frontend,
            socket: RefCell::new(None),
            closed: Cell::new(false),
        }
    }

    pub(crate) fn attach(&self, socket: P::Socket) {
        *self.socket.borrow_mut() = Some(socket);
    }

    fn socket(&self) -> Option<P::Socket> {
        self.socket.borrow().clone()
    }

    fn handle_text(&self, text: &str) {
        let frame: DevtoolsFrame = match DevtoolsJsonCodec::decode(text) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("[DevTools] Failed to parse JSON {text:?}: {e}");
                return;
            }
        };
        log::trace!("[DevTools] WebSocket.onmessage {frame:?}");

        if frame.is_connect_backend() {
            match self.socket() {
                Some(socket) => self.frontend.initialize(socket),
                None => log::warn!("[DevTools] Handshake arrived before the socket was attached"),
            }
            return;
        }

        self.frontend.listeners().dispatch(&frame);
    }

    /// Whether events from this socket still drive the frontend.
    fn is_live(&self) -> bool {
        !self.closed.get() && self.frontend.is_active_session(self)
    }

    /// Stops a session superseded by a newer `start()`.
    ///
    /// The frontend state is torn down by the caller; this only silences the
    /// session and closes its socket.
    pub(crate) fn retire(&self) {
        if self.closed.replace(true) {
            return;
        }
        log::debug!("[DevTools] Retiring superseded socket session");
        if let Some(socket) = self.socket() {
            socket.close();
        }
    }

    pub(crate) fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        if self.frontend.is_active_session(self) {
            self.frontend.release_session(self);
            self.frontend.on_disconnected();
        }
        if let Some(socket) = self.socket() {
            socket.close();
        }
    }
}

impl<P: Platform> SocketEvents for SocketSession<P> {
    fn on_open(&self) {
        log::debug!("[DevTools] WebSocket opened");
    }

    fn on_message(&self, data: SocketData) {
        if !self.is_live() {
            log::trace!("[DevTools] Dropping frame from an inactive session");
            return;
        }
        match data {
            SocketData::Text(text) => self.handle_text(&text),
            SocketData::Binary => {
                log::error!("[DevTools] Failed to parse JSON: {}", FrameError::NotText);
            }
        }
    }

    fn on_close(&self) {
        if !self.is_live() {
            return;
        }
        self.frontend.on_disconnected();
        log::info!("[DevTools] Connection to Hippy closed");

        self.frontend.report_status(
            "devtools disconnect, refresh page to retry.",
            StatusKind::Error,
        );
    }

    fn on_error(&self, error: TransportError) {
        if !self.is_live() {
            return;
        }
        self.frontend.on_error(&error);
        log::error!("[DevTools] Error with websocket connection: {error}");
    }
}

/// Handle to a started session.
///
/// Dropping the handle leaves the session running; call [`close`](Self::close)
/// to end it.
pub struct SessionHandle<P: Platform> {
    session: Rc<SocketSession<P>>,
}

impl<P: Platform> SessionHandle<P> {
    pub(crate) fn new(session: Rc<SocketSession<P>>) -> Self {
        Self { session }
    }

    /// Restores the placeholder, cancels any pending remount and closes the socket.
    ///
    /// Socket events arriving afterwards are ignored.
    pub fn close(&self) {
        self.session.close();
    }

    pub fn is_closed(&self) -> bool {
        self.session.closed.get()
    }
}

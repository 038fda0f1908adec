//! Host seams.
//!
//! Everything the frontend needs from its environment goes through
//! [`Platform`]: opening sockets, rendering the inspector into a content
//! node, deferring work and reading/writing preferences. The browser build
//! uses `WebPlatform`; tests drive an in-memory platform.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use hippy_devtools_common::DevtoolsFrame;
use leptos_use::core::ConnectionReadyState;

use crate::error::DevtoolsError;
use crate::props::InspectorProps;

/// A DOM-like container the inspector is rendered into.
pub trait ContentNode {
    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);
}

/// Raw socket handle. Cloning yields another handle to the same connection.
pub trait Socket: Clone + 'static {
    fn ready_state(&self) -> ConnectionReadyState;
    /// Encodes and writes one frame.
    fn send(&self, frame: &DevtoolsFrame) -> Result<(), DevtoolsError>;
    fn close(&self);
}

/// Payload of an inbound socket message.
#[derive(Clone, Debug, PartialEq)]
pub enum SocketData {
    Text(String),
    /// Binary frames are not part of the protocol; only their arrival is reported.
    Binary,
}

/// Transport-level failure reported by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportError {
    /// Host error code such as `"EADDRINUSE"`, when the host provides one
    pub code: Option<String>,
    pub message: String,
}

impl TransportError {
    pub const ADDRESS_IN_USE: &'static str = "EADDRINUSE";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn is_address_in_use(&self) -> bool {
        self.code.as_deref() == Some(Self::ADDRESS_IN_USE)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Receiver of socket lifecycle events.
pub trait SocketEvents {
    fn on_open(&self);
    fn on_message(&self, data: SocketData);
    fn on_close(&self);
    fn on_error(&self, error: TransportError);
}

/// A rendered inspector tree. Unmounting is synchronous.
pub trait MountedUi {
    fn unmount(self: Box<Self>);
}

/// A deferred task that has not run yet.
pub trait PendingTask {
    /// Prevents the task from running. No-op if it already ran.
    fn cancel(self: Box<Self>);
}

pub trait Platform: 'static {
    type Node: ContentNode + Clone + 'static;
    type Socket: Socket;

    /// Location of the page hosting the frontend, if it can be read.
    fn page_location(&self) -> Option<String>;

    /// Opens a socket and routes its events to `events`.
    fn connect(
        &self,
        url: &str,
        events: Rc<dyn SocketEvents>,
    ) -> Result<Self::Socket, DevtoolsError>;

    /// Renders the inspector tree into `node`.
    fn render(&self, node: &Self::Node, props: InspectorProps) -> Box<dyn MountedUi>;

    /// Runs `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Box<dyn PendingTask>;

    fn preference(&self, key: &str) -> Option<String>;

    fn set_preference(&self, key: &str, value: &str) -> Result<(), DevtoolsError>;
}

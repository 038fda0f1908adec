//! # Hippy DevTools
//!
//! Standalone React DevTools frontend for Hippy apps, rendered with Leptos.
//!
//! The frontend connects to the debug server named in the page URL
//! (`?ws=host:port` or `?wss=host:port`, plus an optional `hash`), waits for
//! the backend handshake and then mounts an inspector into a host-provided
//! content node. Every handshake replaces the bridge/store pair and remounts
//! the inspector; a closed socket or a `shutdown` event puts the node's
//! original markup back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hippy_devtools::{DevtoolsUi, WebPlatform};
//!
//! let node = WebPlatform::content_node("devtools-container").expect("container");
//! let ui = DevtoolsUi::web();
//! ui.set_content_node(node)
//!     .set_status_listener(|message, status| log::info!("[{status}] {message}"));
//! let _session = ui.start()?;
//! ```
//!
//! ## Structure
//!
//! - [`DevtoolsUi`]: the embedder facade
//! - [`Platform`]: socket, render, timer and storage seams
//! - [`FrontendBridge`] and [`InspectorStore`]: the per-connection pair
//! - [`ListenerRegistry`]: fan-out of inbound frames

mod bridge;
mod devtools_ui;
mod error;
mod frontend;
mod listeners;
mod mount;
mod options;
mod platform;
mod props;
mod session;
mod store;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
mod web;

pub use bridge::{BridgeChannel, EventHandler, FrameHandler, FrontendBridge};
pub use devtools_ui::DevtoolsUi;
pub use error::DevtoolsError;
pub use frontend::{Connection, DisconnectedCallback, StatusListener};
pub use listeners::{DispatchReport, Listener, ListenerRegistry, Unsubscribe};
pub use mount::MountState;
pub use options::FrontendOptions;
pub use platform::{
    ContentNode, MountedUi, PendingTask, Platform, Socket, SocketData, SocketEvents,
    TransportError,
};
pub use props::{ElementSource, InspectedElement, InspectorProps, SourceLocation};
pub use session::{SessionHandle, send_frame};
pub use store::{
    BridgeProtocol, CURRENT_BRIDGE_PROTOCOL_VERSION, EventSummary, InspectorStore,
    StoreOptions, StoreSnapshot, StoreSubscription,
};

#[cfg(target_arch = "wasm32")]
pub use web::{InspectorPanel, WebPlatform, WebSocketHandle};

pub use hippy_devtools_common::{
    CONNECT_BACKEND_EVENT, DEFAULT_TAB_KEY, DevtoolsFrame, DevtoolsTab, Endpoint,
    EndpointOptions, FrameError, SHUTDOWN_EVENT, Scheme, StatusKind, resolve_socket_url,
};

// Socket state as reported by [`Socket::ready_state`].
pub use leptos_use::core::ConnectionReadyState;

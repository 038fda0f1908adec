pub mod codec;

pub mod endpoint;
pub use endpoint::{Endpoint, EndpointOptions, Scheme, resolve_socket_url};

pub mod error;
pub use error::FrameError;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use std::fmt::Display;

/// Event name the backend sends once it is ready to be inspected.
///
/// A frame carrying this event starts a fresh bridge/store pair and is never
/// handed to ordinary listeners.
pub const CONNECT_BACKEND_EVENT: &str = "react-devtools-connect-backend";

/// Event the backend emits right before it goes away.
pub const SHUTDOWN_EVENT: &str = "shutdown";

/// Preference key holding the tab the inspector opens on.
pub const DEFAULT_TAB_KEY: &str = "React::DevTools::defaultTab";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
/// A [`DevtoolsFrame`] is the unit exchanged over the debug socket.
///
/// On the wire it is a JSON text frame shaped `{"event": ..., "payload": ...}`.
/// A missing `payload` decodes as `null`.
pub struct DevtoolsFrame {
    /// Event name, e.g. `"operations"` or `"shutdown"`
    pub event: String,
    /// Arbitrary event data
    #[serde(default)]
    pub payload: JsonValue,
}

impl DevtoolsFrame {
    pub fn new(event: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }

    /// Returns true if this frame is the backend handshake.
    pub fn is_connect_backend(&self) -> bool {
        self.event == CONNECT_BACKEND_EVENT
    }
}

/// Connection status reported to the embedding page.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKind {
    /// The socket server accepted the connection.
    ServerConnected,
    /// A backend handshake completed and the inspector is live.
    DevtoolsConnected,
    /// The session ended or failed.
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::ServerConnected => "server-connected",
            StatusKind::DevtoolsConnected => "devtools-connected",
            StatusKind::Error => "error",
        }
    }
}

impl Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inspector tabs that can be selected through the default-tab preference.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DevtoolsTab {
    #[default]
    Components,
    Profiler,
}

impl DevtoolsTab {
    /// Parses a persisted preference value (a JSON string such as `"profiler"`).
    ///
    /// Unknown or malformed values fall back to [`DevtoolsTab::Components`].
    pub fn from_preference(raw: Option<&str>) -> Self {
        raw.and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    /// The persisted form of this tab, the inverse of [`from_preference`](Self::from_preference).
    pub fn to_preference(&self) -> Result<String, FrameError> {
        serde_json::to_string(self).map_err(FrameError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_without_payload_defaults_to_null() {
        let frame: DevtoolsFrame = serde_json::from_str(r#"{"event":"shutdown"}"#).unwrap();
        assert_eq!(frame.event, SHUTDOWN_EVENT);
        assert_eq!(frame.payload, JsonValue::Null);
    }

    #[test]
    fn test_connect_backend_detection() {
        let frame = DevtoolsFrame::new(CONNECT_BACKEND_EVENT, JsonValue::Null);
        assert!(frame.is_connect_backend());

        let frame = DevtoolsFrame::new("operations", serde_json::json!([1, 2, 3]));
        assert!(!frame.is_connect_backend());
    }

    #[test]
    fn test_status_kind_wire_names() {
        assert_eq!(StatusKind::DevtoolsConnected.as_str(), "devtools-connected");
        assert_eq!(
            serde_json::to_string(&StatusKind::ServerConnected).unwrap(),
            "\"server-connected\""
        );
        assert_eq!(StatusKind::Error.to_string(), "error");
    }

    #[test]
    fn test_tab_preference() {
        assert_eq!(DevtoolsTab::Profiler.to_preference().unwrap(), "\"profiler\"");
        for tab in [DevtoolsTab::Components, DevtoolsTab::Profiler] {
            let stored = tab.to_preference().unwrap();
            assert_eq!(DevtoolsTab::from_preference(Some(&stored)), tab);
        }
        assert_eq!(
            DevtoolsTab::from_preference(Some("\"profiler\"")),
            DevtoolsTab::Profiler
        );
        // The raw (unquoted) word is not a valid persisted value
        assert_eq!(
            DevtoolsTab::from_preference(Some("profiler")),
            DevtoolsTab::Components
        );
        assert_eq!(DevtoolsTab::from_preference(None), DevtoolsTab::Components);
    }
}

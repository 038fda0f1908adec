use hippy_devtools_common::FrameError;
use thiserror::Error;

/// Errors that can occur while driving the DevTools frontend.
#[derive(Debug, Error)]
pub enum DevtoolsError {
    /// `start()` or `open_profiler()` was called before a content node was set.
    #[error("no content node set; call set_content_node() first")]
    NoContentNode,

    /// The socket could not be created for the resolved URL.
    #[error("failed to open socket to '{url}': {message}")]
    SocketOpen {
        /// URL the socket was opened against
        url: String,
        /// Error reported by the host
        message: String,
    },

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// An event payload did not have the expected shape.
    #[error("unexpected payload for '{event}': {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    /// The host preference storage rejected a read or write.
    #[error("preference storage unavailable: {message}")]
    Storage { message: String },
}

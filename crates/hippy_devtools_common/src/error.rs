use thiserror::Error;

/// Errors raised while moving a [`DevtoolsFrame`](crate::DevtoolsFrame) on or off the wire.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The socket delivered something other than a text frame.
    #[error("received a non-text frame")]
    NotText,

    /// The text frame was not a valid `{event, payload}` JSON object.
    #[error("failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),

    /// The frame could not be serialized.
    #[error("failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),
}

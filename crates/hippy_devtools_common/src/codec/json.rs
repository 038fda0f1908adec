use codee::{Decoder, Encoder};

use crate::{DevtoolsFrame, error::FrameError};

/// Text codec for the DevTools socket.
///
/// Each WebSocket text frame carries exactly one JSON-encoded
/// [`DevtoolsFrame`]; there is no length prefix or batching.
///
/// ## Usage
///
/// ```rust
/// use codee::{Decoder, Encoder};
/// use hippy_devtools_common::{DevtoolsFrame, codec::DevtoolsJsonCodec};
///
/// let frame = DevtoolsFrame::new("inspectElement", serde_json::json!({ "id": 4 }));
/// let text = DevtoolsJsonCodec::encode(&frame).unwrap();
/// assert_eq!(text, r#"{"event":"inspectElement","payload":{"id":4}}"#);
///
/// let decoded: DevtoolsFrame = DevtoolsJsonCodec::decode(text.as_str()).unwrap();
/// assert_eq!(decoded, frame);
/// ```
pub struct DevtoolsJsonCodec;

impl Encoder<DevtoolsFrame> for DevtoolsJsonCodec {
    type Error = FrameError;
    type Encoded = String;

    fn encode(val: &DevtoolsFrame) -> Result<Self::Encoded, Self::Error> {
        serde_json::to_string(val).map_err(FrameError::Encode)
    }
}

impl Decoder<DevtoolsFrame> for DevtoolsJsonCodec {
    type Error = FrameError;
    type Encoded = str;

    fn decode(val: &Self::Encoded) -> Result<DevtoolsFrame, Self::Error> {
        serde_json::from_str(val).map_err(FrameError::Decode)
    }
}

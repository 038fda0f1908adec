mod json;

pub use json::DevtoolsJsonCodec;

use std::time::Duration;

use hippy_devtools_common::EndpointOptions;

/// Tunables for a [`DevtoolsUi`](crate::DevtoolsUi).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontendOptions {
    /// Delay between clearing the content node and mounting a fresh inspector.
    pub remount_delay: Duration,
    /// Identification tags appended to the socket URL.
    pub endpoint: EndpointOptions,
}

impl Default for FrontendOptions {
    fn default() -> Self {
        Self {
            remount_delay: Duration::from_millis(100),
            endpoint: EndpointOptions::default(),
        }
    }
}

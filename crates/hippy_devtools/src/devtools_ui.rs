use std::rc::Rc;

use hippy_devtools_common::{Endpoint, StatusKind};

use crate::error::DevtoolsError;
use crate::frontend::{Connection, Frontend};
use crate::mount::MountState;
use crate::options::FrontendOptions;
use crate::platform::{Platform, SocketEvents};
use crate::session::{SessionHandle, SocketSession};

/// Entry point for embedding the DevTools frontend in a page.
///
/// Configure it with the chained setters, then call [`start`](Self::start)
/// to connect to the debug target named by the page URL, or
/// [`open_profiler`](Self::open_profiler) to preview the profiler without
/// a connection.
///
/// # Example
///
/// ```rust,ignore
/// use hippy_devtools::DevtoolsUi;
///
/// let ui = DevtoolsUi::web();
/// ui.set_content_node(container)
///     .set_status_listener(|message, status| log::info!("{status}: {message}"))
///     .set_disconnected_callback(|| log::info!("disconnected"));
/// let session = ui.start()?;
/// ```
pub struct DevtoolsUi<P: Platform> {
    frontend: Rc<Frontend<P>>,
}

impl<P: Platform> Clone for DevtoolsUi<P> {
    fn clone(&self) -> Self {
        Self {
            frontend: self.frontend.clone(),
        }
    }
}

impl<P: Platform> DevtoolsUi<P> {
    pub fn new(platform: P) -> Self {
        Self::with_options(platform, FrontendOptions::default())
    }

    pub fn with_options(platform: P, options: FrontendOptions) -> Self {
        Self {
            frontend: Frontend::new(platform, options),
        }
    }

    /// Sets the node the inspector renders into.
    ///
    /// The node's current markup is kept and put back whenever the session
    /// disconnects.
    pub fn set_content_node(&self, node: P::Node) -> &Self {
        self.frontend.set_content_node(node);
        self
    }

    pub fn set_project_roots(&self, roots: Vec<String>) -> &Self {
        self.frontend.set_project_roots(roots);
        self
    }

    pub fn set_status_listener(&self, listener: impl Fn(&str, StatusKind) + 'static) -> &Self {
        self.frontend.set_status_listener(Rc::new(listener));
        self
    }

    pub fn set_disconnected_callback(&self, callback: impl Fn() + 'static) -> &Self {
        self.frontend.set_disconnected_callback(Rc::new(callback));
        self
    }

    /// Opens the socket named by the page URL and returns a closable handle.
    ///
    /// A session started earlier is closed and its bridge state dropped once
    /// the new socket exists.
    pub fn start(&self) -> Result<SessionHandle<P>, DevtoolsError> {
        if !self.frontend.has_content_node() {
            return Err(DevtoolsError::NoContentNode);
        }

        let location = self.frontend.platform.page_location().unwrap_or_default();
        let url =
            Endpoint::from_location_with(&location, &self.frontend.options.endpoint).url_string();
        log::info!("[DevTools] {url}");

        let session = Rc::new(SocketSession::new(self.frontend.clone()));
        let events: Rc<dyn SocketEvents> = session.clone();
        let socket = self.frontend.platform.connect(&url, events)?;
        session.attach(socket);

        if let Some(previous) = self.frontend.activate_session(&session) {
            log::info!("[DevTools] Replacing the previous session");
            previous.retire();
            self.frontend.retire_connection();
        }

        Ok(SessionHandle::new(session))
    }

    /// Renders the profiler tab over an inert bridge, without connecting.
    pub fn open_profiler(&self) -> Result<(), DevtoolsError> {
        if !self.frontend.has_content_node() {
            return Err(DevtoolsError::NoContentNode);
        }
        self.frontend.open_profiler_only();
        Ok(())
    }

    /// The bridge/store pair of the current inspection, if any.
    pub fn connection(&self) -> Option<Connection> {
        self.frontend.connection()
    }

    pub fn mount_state(&self) -> MountState {
        self.frontend.mount_state()
    }

    pub fn platform(&self) -> &P {
        &self.frontend.platform
    }
}

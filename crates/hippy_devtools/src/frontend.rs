//! Shared frontend state: the bridge/store pair, the listener registry, the
//! mount controller and the embedder callbacks.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hippy_devtools_common::{DEFAULT_TAB_KEY, DevtoolsTab, SHUTDOWN_EVENT, StatusKind};
use serde_json::Value as JsonValue;

use crate::bridge::{BridgeChannel, FrontendBridge};
use crate::error::DevtoolsError;
use crate::listeners::ListenerRegistry;
use crate::mount::{MountController, MountState};
use crate::options::FrontendOptions;
use crate::platform::{Platform, TransportError};
use crate::props::{ElementSource, InspectorProps};
use crate::session::{SocketSession, send_frame};
use crate::store::{InspectorStore, StoreOptions};

/// Callback informed about connection status changes.
pub type StatusListener = Rc<dyn Fn(&str, StatusKind)>;

/// Callback run after the inspector was torn down.
pub type DisconnectedCallback = Rc<dyn Fn()>;

/// The bridge and the store built on it. They only ever change together.
#[derive(Clone)]
pub struct Connection {
    pub bridge: Rc<FrontendBridge>,
    pub store: Rc<InspectorStore>,
}

struct Callbacks {
    status: StatusListener,
    disconnected: DisconnectedCallback,
    project_roots: Vec<String>,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            status: Rc::new(|_, _| {}),
            disconnected: Rc::new(|| {}),
            project_roots: Vec::new(),
        }
    }
}

pub(crate) struct Frontend<P: Platform> {
    pub(crate) platform: P,
    pub(crate) options: FrontendOptions,
    callbacks: RefCell<Callbacks>,
    listeners: ListenerRegistry,
    connection: RefCell<Option<Connection>>,
    mount: RefCell<MountController<P::Node>>,
    /// The session whose socket events are honoured
    active_session: RefCell<Weak<SocketSession<P>>>,
    weak_self: Weak<Self>,
}

impl<P: Platform> Frontend<P> {
    pub(crate) fn new(platform: P, options: FrontendOptions) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Frontend {
            platform,
            options,
            callbacks: RefCell::new(Callbacks::default()),
            listeners: ListenerRegistry::new(),
            connection: RefCell::new(None),
            mount: RefCell::new(MountController::new()),
            active_session: RefCell::new(Weak::new()),
            weak_self: weak_self.clone(),
        })
    }

    pub(crate) fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub(crate) fn connection(&self) -> Option<Connection> {
        self.connection.borrow().clone()
    }

    pub(crate) fn mount_state(&self) -> MountState {
        self.mount.borrow().state()
    }

    pub(crate) fn set_content_node(&self, node: P::Node) {
        self.mount.borrow_mut().set_node(node);
    }

    pub(crate) fn has_content_node(&self) -> bool {
        self.mount.borrow().node().is_some()
    }

    pub(crate) fn set_project_roots(&self, roots: Vec<String>) {
        self.callbacks.borrow_mut().project_roots = roots;
    }

    pub(crate) fn set_status_listener(&self, listener: StatusListener) {
        self.callbacks.borrow_mut().status = listener;
    }

    pub(crate) fn set_disconnected_callback(&self, callback: DisconnectedCallback) {
        self.callbacks.borrow_mut().disconnected = callback;
    }

    /// Makes `session` the active one and returns the session it replaces.
    pub(crate) fn activate_session(
        &self,
        session: &Rc<SocketSession<P>>,
    ) -> Option<Rc<SocketSession<P>>> {
        let previous = self.active_session.replace(Rc::downgrade(session));
        previous.upgrade()
    }

    pub(crate) fn is_active_session(&self, session: &SocketSession<P>) -> bool {
        std::ptr::eq(self.active_session.borrow().as_ptr(), session)
    }

    pub(crate) fn release_session(&self, session: &SocketSession<P>) {
        if self.is_active_session(session) {
            *self.active_session.borrow_mut() = Weak::new();
        }
    }

    /// Drops the bridge/store pair and every listener, and puts the
    /// placeholder back. No callbacks run.
    pub(crate) fn retire_connection(&self) {
        let previous = self.connection.borrow_mut().take();
        if let Some(previous) = previous {
            previous.bridge.clean();
        }
        self.listeners.clear();
        self.mount.borrow_mut().restore_placeholder();
    }

    pub(crate) fn report_status(&self, message: &str, kind: StatusKind) {
        let status = self.callbacks.borrow().status.clone();
        status(message, kind);
    }

    /// Starts a fresh inspection over `socket`, replacing any previous one.
    pub(crate) fn initialize(&self, socket: P::Socket) {
        let previous = self.connection.borrow_mut().take();
        if let Some(previous) = previous {
            log::debug!("[DevTools] Backend reconnected, dropping previous bridge");
            previous.bridge.clean();
            self.listeners.clear();
        }

        let bridge = FrontendBridge::new(BridgeChannel::over_registry(
            &self.listeners,
            move |event: &str, payload: JsonValue| send_frame(&socket, event, payload),
        ));

        let weak = self.weak_self.clone();
        bridge.add_listener(SHUTDOWN_EVENT, move |_| {
            if let Some(frontend) = weak.upgrade() {
                frontend.on_disconnected();
                log::info!("[DevTools] backend shutdown");
                frontend.report_status("devtools backend shutdown.", StatusKind::Error);
            }
            Ok(())
        });

        let store = InspectorStore::new(
            bridge.clone(),
            StoreOptions {
                check_bridge_protocol_compatibility: true,
                supports_native_inspection: false,
            },
        );
        *self.connection.borrow_mut() = Some(Connection { bridge, store });

        log::info!("[DevTools] Connected");
        self.report_status("DevTools initialized.", StatusKind::DevtoolsConnected);
        self.reload();
    }

    /// Renders the profiler over an inert bridge, without any socket.
    ///
    /// A preference that cannot be stored is logged; the profiler still
    /// replaces the current pair.
    pub(crate) fn open_profiler_only(&self) {
        let stored = DevtoolsTab::Profiler
            .to_preference()
            .map_err(DevtoolsError::from)
            .and_then(|value| self.platform.set_preference(DEFAULT_TAB_KEY, &value));
        if let Err(e) = stored {
            log::warn!("[DevTools] Could not persist the profiler tab: {e}");
        }

        let previous = self.connection.borrow_mut().take();
        if let Some(previous) = previous {
            previous.bridge.clean();
        }

        let bridge = FrontendBridge::new(BridgeChannel::inert());
        let store = InspectorStore::new(bridge.clone(), StoreOptions::default());
        *self.connection.borrow_mut() = Some(Connection { bridge, store });

        self.reload();
    }

    /// Unmounts, clears the content node and schedules a fresh mount.
    pub(crate) fn reload(&self) {
        let Some(generation) = self.mount.borrow_mut().begin_reload() else {
            log::warn!("[DevTools] No content node set, skipping reload");
            return;
        };

        let weak = self.weak_self.clone();
        let task = self.platform.schedule(
            self.options.remount_delay,
            Box::new(move || {
                if let Some(frontend) = weak.upgrade() {
                    frontend.remount(generation);
                }
            }),
        );
        self.mount.borrow_mut().set_pending(generation, task);
    }

    fn remount(&self, generation: u64) {
        if !self.mount.borrow().is_current(generation) {
            log::debug!("[DevTools] Skipping superseded remount #{generation}");
            return;
        }
        let Some(props) = self.inspector_props() else {
            log::warn!("[DevTools] Remount requested without a bridge");
            return;
        };
        let Some(node) = self.mount.borrow().node().cloned() else {
            return;
        };

        let root = self.platform.render(&node, props);
        self.mount.borrow_mut().finish_mount(generation, root);
    }

    fn inspector_props(&self) -> Option<InspectorProps> {
        let Connection { bridge, store } = self.connection()?;
        let default_tab =
            DevtoolsTab::from_preference(self.platform.preference(DEFAULT_TAB_KEY).as_deref());

        Some(InspectorProps {
            bridge,
            store,
            show_tab_bar: true,
            warn_if_legacy_backend_detected: true,
            default_tab,
            element_source: ElementSource {
                project_roots: self.callbacks.borrow().project_roots.clone(),
            },
        })
    }

    /// Tears the inspector down and restores the waiting placeholder.
    pub(crate) fn on_disconnected(&self) {
        self.mount.borrow_mut().restore_placeholder();

        let disconnected = self.callbacks.borrow().disconnected.clone();
        disconnected();
    }

    /// Tears the inspector down and shows a message for `error`.
    pub(crate) fn on_error(&self, error: &TransportError) {
        self.mount.borrow_mut().show_error(error);

        let disconnected = self.callbacks.borrow().disconnected.clone();
        disconnected();
    }
}

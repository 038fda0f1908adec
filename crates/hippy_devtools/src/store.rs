//! Client-side cache of inspected application state.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::bridge::FrontendBridge;
use crate::error::DevtoolsError;

/// Bridge protocol version this frontend speaks.
pub const CURRENT_BRIDGE_PROTOCOL_VERSION: u32 = 2;

/// Capability flags a store is built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Ask the backend for its bridge protocol and flag mismatches.
    pub check_bridge_protocol_compatibility: bool,
    /// Whether the host can jump to the native view of an element.
    pub supports_native_inspection: bool,
}

/// Protocol description sent by the backend in reply to `getBridgeProtocol`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BridgeProtocol {
    pub version: u32,
    #[serde(default)]
    pub min_npm_version: Option<String>,
    #[serde(default)]
    pub max_npm_version: Option<String>,
}

/// Per-event tally kept by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct EventSummary {
    pub event: String,
    pub count: u64,
    pub last_payload: JsonValue,
}

/// Immutable view of the store handed to the UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Events in order of first arrival
    pub events: Vec<EventSummary>,
    pub bridge_protocol: Option<BridgeProtocol>,
    pub supports_native_inspection: bool,
}

impl StoreSnapshot {
    /// True once the backend reported a protocol version this frontend does not speak.
    pub fn unsupported_bridge_protocol(&self) -> bool {
        self.bridge_protocol
            .as_ref()
            .is_some_and(|protocol| protocol.version != CURRENT_BRIDGE_PROTOCOL_VERSION)
    }

    pub fn total_events(&self) -> u64 {
        self.events.iter().map(|summary| summary.count).sum()
    }
}

type Subscriber = Rc<dyn Fn(&StoreSnapshot)>;

/// Store derived from one bridge. Never reused across bridges.
pub struct InspectorStore {
    bridge: Rc<FrontendBridge>,
    options: StoreOptions,
    snapshot: RefCell<StoreSnapshot>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_subscriber: Cell<u64>,
}

impl InspectorStore {
    pub fn new(bridge: Rc<FrontendBridge>, options: StoreOptions) -> Rc<Self> {
        let store = Rc::new(InspectorStore {
            bridge: bridge.clone(),
            options,
            snapshot: RefCell::new(StoreSnapshot {
                supports_native_inspection: options.supports_native_inspection,
                ..StoreSnapshot::default()
            }),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber: Cell::new(0),
        });

        let weak = Rc::downgrade(&store);
        bridge.add_listener("bridgeProtocol", move |payload| {
            let Some(store) = weak.upgrade() else {
                return Ok(());
            };
            let protocol: BridgeProtocol =
                serde_json::from_value(payload.clone()).map_err(|source| {
                    DevtoolsError::Payload {
                        event: "bridgeProtocol".to_string(),
                        source,
                    }
                })?;
            if protocol.version != CURRENT_BRIDGE_PROTOCOL_VERSION {
                log::warn!(
                    "[DevTools] Backend speaks bridge protocol {} but this frontend speaks {}",
                    protocol.version,
                    CURRENT_BRIDGE_PROTOCOL_VERSION
                );
            }
            store.update(|snapshot| snapshot.bridge_protocol = Some(protocol));
            Ok(())
        });

        let weak = Rc::downgrade(&store);
        bridge.add_any_listener(move |frame| {
            if let Some(store) = weak.upgrade() {
                store.record(&frame.event, &frame.payload);
            }
            Ok(())
        });

        if options.check_bridge_protocol_compatibility {
            bridge.send("getBridgeProtocol", JsonValue::Null);
        }

        store
    }

    pub fn bridge(&self) -> &Rc<FrontendBridge> {
        &self.bridge
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Calls `f` with the new snapshot after every change.
    pub fn subscribe(self: &Rc<Self>, f: impl Fn(&StoreSnapshot) + 'static) -> StoreSubscription {
        let id = self.next_subscriber.get() + 1;
        self.next_subscriber.set(id);
        self.subscribers.borrow_mut().push((id, Rc::new(f)));

        StoreSubscription {
            store: Rc::downgrade(self),
            id,
        }
    }

    fn record(&self, event: &str, payload: &JsonValue) {
        self.update(|snapshot| {
            match snapshot.events.iter_mut().find(|s| s.event == event) {
                Some(summary) => {
                    summary.count += 1;
                    summary.last_payload = payload.clone();
                }
                None => snapshot.events.push(EventSummary {
                    event: event.to_string(),
                    count: 1,
                    last_payload: payload.clone(),
                }),
            }
        });
    }

    fn update(&self, f: impl FnOnce(&mut StoreSnapshot)) {
        let snapshot = {
            let mut snapshot = self.snapshot.borrow_mut();
            f(&mut snapshot);
            snapshot.clone()
        };

        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}

/// Handle returned by [`InspectorStore::subscribe`].
pub struct StoreSubscription {
    store: Weak<InspectorStore>,
    id: u64,
}

impl StoreSubscription {
    pub fn cancel(self) {
        if let Some(store) = self.store.upgrade() {
            store
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

//! Frontend side of the inspection bridge.
//!
//! A [`FrontendBridge`] sits on top of a [`BridgeChannel`]: the channel's
//! `listen` capability feeds it every inbound frame and its `send`
//! capability writes outbound frames. The bridge routes inbound frames to
//! handlers registered per event name.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use hippy_devtools_common::DevtoolsFrame;
use serde_json::Value as JsonValue;

use crate::error::DevtoolsError;
use crate::listeners::{Listener, ListenerRegistry, Unsubscribe};

/// Handler for one bridge event.
pub type EventHandler = Rc<dyn Fn(&JsonValue) -> Result<(), DevtoolsError>>;

/// Handler receiving every frame that reaches the bridge.
pub type FrameHandler = Rc<dyn Fn(&DevtoolsFrame) -> Result<(), DevtoolsError>>;

type ListenFn = Rc<dyn Fn(Listener) -> Unsubscribe>;
type SendFn = Rc<dyn Fn(&str, JsonValue)>;

/// The two capabilities a bridge is built from.
#[derive(Clone)]
pub struct BridgeChannel {
    listen: ListenFn,
    send: SendFn,
}

impl BridgeChannel {
    pub fn new(
        listen: impl Fn(Listener) -> Unsubscribe + 'static,
        send: impl Fn(&str, JsonValue) + 'static,
    ) -> Self {
        Self {
            listen: Rc::new(listen),
            send: Rc::new(send),
        }
    }

    /// A channel that listens into `registry` and sends through `send`.
    pub fn over_registry(
        registry: &ListenerRegistry,
        send: impl Fn(&str, JsonValue) + 'static,
    ) -> Self {
        let registry = registry.clone();
        Self::new(move |listener| registry.register(listener), send)
    }

    /// A channel that never delivers anything and drops every send.
    pub fn inert() -> Self {
        Self::new(|_| Unsubscribe::detached(), |_, _| {})
    }
}

#[derive(Clone)]
enum Route {
    Event(String, EventHandler),
    Any(FrameHandler),
}

/// Event-routing bridge used by the store and the inspector UI.
pub struct FrontendBridge {
    send: SendFn,
    routes: RefCell<Vec<Route>>,
    subscription: RefCell<Option<Unsubscribe>>,
    cleaned: Cell<bool>,
}

impl FrontendBridge {
    pub fn new(channel: BridgeChannel) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<FrontendBridge>| {
            let weak = weak.clone();
            let subscription = (channel.listen)(Rc::new(move |frame: &DevtoolsFrame| {
                match weak.upgrade() {
                    Some(bridge) => bridge.route(frame),
                    None => Ok(()),
                }
            }));

            FrontendBridge {
                send: channel.send.clone(),
                routes: RefCell::new(Vec::new()),
                subscription: RefCell::new(Some(subscription)),
                cleaned: Cell::new(false),
            }
        })
    }

    /// Registers `handler` for frames whose event is `event`.
    pub fn add_listener(
        &self,
        event: impl Into<String>,
        handler: impl Fn(&JsonValue) -> Result<(), DevtoolsError> + 'static,
    ) {
        self.routes
            .borrow_mut()
            .push(Route::Event(event.into(), Rc::new(handler)));
    }

    /// Registers `handler` for every frame.
    pub fn add_any_listener(
        &self,
        handler: impl Fn(&DevtoolsFrame) -> Result<(), DevtoolsError> + 'static,
    ) {
        self.routes.borrow_mut().push(Route::Any(Rc::new(handler)));
    }

    pub fn send(&self, event: &str, payload: JsonValue) {
        if self.cleaned.get() {
            log::debug!("[DevTools] Dropping '{event}' sent on a cleaned bridge");
            return;
        }
        (self.send)(event, payload);
    }

    /// Detaches from the channel and drops every handler.
    pub fn clean(&self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
        self.routes.borrow_mut().clear();
        self.cleaned.set(true);
    }

    pub fn is_cleaned(&self) -> bool {
        self.cleaned.get()
    }

    fn route(&self, frame: &DevtoolsFrame) -> Result<(), DevtoolsError> {
        let routes: Vec<Route> = self.routes.borrow().clone();

        let mut first_error = None;
        for route in routes {
            let result = match route {
                Route::Any(handler) => handler(frame),
                Route::Event(event, handler) if event == frame.event => handler(&frame.payload),
                Route::Event(..) => continue,
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

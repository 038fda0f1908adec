//! Browser platform: a `leptos-use` websocket, timers and storage, with the
//! inspector rendered by Leptos.

mod inspector;

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use hippy_devtools_common::DevtoolsFrame;
use hippy_devtools_common::codec::DevtoolsJsonCodec;
use leptos::prelude::*;
use leptos_use::core::ConnectionReadyState;
use leptos_use::{
    DummyEncoder, ReconnectLimit, UseWebSocketError, UseWebSocketOptions, UseWebSocketReturn,
    use_websocket_with_options,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CloseEvent, Element, HtmlElement, Storage};

use crate::devtools_ui::DevtoolsUi;
use crate::error::DevtoolsError;
use crate::platform::{
    ContentNode, MountedUi, PendingTask, Platform, Socket, SocketData, SocketEvents,
    TransportError,
};
use crate::props::InspectorProps;
use crate::store::{StoreSnapshot, StoreSubscription};

pub use inspector::InspectorPanel;

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl ContentNode for HtmlElement {
    fn inner_html(&self) -> String {
        Element::inner_html(self)
    }

    fn set_inner_html(&self, html: &str) {
        Element::set_inner_html(self, html);
    }
}

type SendFn = Arc<dyn Fn(&DevtoolsFrame) + Send + Sync>;
type CloseFn = Arc<dyn Fn() + Send + Sync>;

/// One `use_websocket` connection and the reactive owner holding its handlers.
#[derive(Clone)]
pub struct WebSocketHandle {
    ready_state: Signal<ConnectionReadyState>,
    send: SendFn,
    close: CloseFn,
    owner: Owner,
}

impl Socket for WebSocketHandle {
    fn ready_state(&self) -> ConnectionReadyState {
        // Disposed once the owner is cleaned up
        self.ready_state
            .try_get_untracked()
            .unwrap_or(ConnectionReadyState::Closed)
    }

    fn send(&self, frame: &DevtoolsFrame) -> Result<(), DevtoolsError> {
        (self.send)(frame);
        Ok(())
    }

    fn close(&self) {
        (self.close)();
        self.owner.cleanup();
    }
}

struct TimeoutTask(TimeoutHandle);

impl PendingTask for TimeoutTask {
    fn cancel(self: Box<Self>) {
        self.0.clear();
    }
}

struct NoopTask;

impl PendingTask for NoopTask {
    fn cancel(self: Box<Self>) {}
}

/// A mounted Leptos root plus the store subscription feeding it.
struct WebRoot<H> {
    handle: H,
    subscription: StoreSubscription,
}

impl<H: 'static> MountedUi for WebRoot<H> {
    fn unmount(self: Box<Self>) {
        let WebRoot {
            handle,
            subscription,
        } = *self;
        subscription.cancel();
        drop(handle);
    }
}

/// [`Platform`] backed by the browser window.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebPlatform;

impl WebPlatform {
    /// Looks up `id` in the current document.
    pub fn content_node(id: &str) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn local_storage() -> Result<Storage, DevtoolsError> {
        let window = web_sys::window().ok_or_else(|| DevtoolsError::Storage {
            message: "no window".to_string(),
        })?;
        window
            .local_storage()
            .map_err(|e| DevtoolsError::Storage {
                message: js_message(&e),
            })?
            .ok_or_else(|| DevtoolsError::Storage {
                message: "localStorage is unavailable".to_string(),
            })
    }
}

impl Platform for WebPlatform {
    type Node = HtmlElement;
    type Socket = WebSocketHandle;

    /// The embedding page's URL when readable, else this frame's own.
    fn page_location(&self) -> Option<String> {
        let window = web_sys::window()?;
        window
            .parent()
            .ok()
            .flatten()
            .and_then(|parent| parent.location().href().ok())
            .or_else(|| window.location().href().ok())
    }

    fn connect(
        &self,
        url: &str,
        events: Rc<dyn SocketEvents>,
    ) -> Result<Self::Socket, DevtoolsError> {
        let owner = Owner::new();
        let socket = owner.with(|| {
            let events = StoredValue::new_local(events);

            let UseWebSocketReturn {
                ready_state,
                send,
                close,
                ..
            } = use_websocket_with_options::<
                DevtoolsFrame,
                DevtoolsFrame,
                DevtoolsJsonCodec,
                (),
                DummyEncoder,
            >(
                url,
                UseWebSocketOptions::default()
                    .immediate(true)
                    .reconnect_limit(ReconnectLimit::Limited(0))
                    .on_open(move |_| {
                        if let Some(events) = events.try_get_value() {
                            events.on_open();
                        }
                    })
                    .on_message_raw(move |text: &str| {
                        if let Some(events) = events.try_get_value() {
                            events.on_message(SocketData::Text(text.to_string()));
                        }
                    })
                    .on_message_raw_bytes(Arc::new(move |_: &[u8]| {
                        if let Some(events) = events.try_get_value() {
                            events.on_message(SocketData::Binary);
                        }
                    }))
                    .on_close(move |event: CloseEvent| {
                        log::debug!(
                            "[DevTools] WebSocket closed: code={} reason={:?}",
                            event.code(),
                            event.reason()
                        );
                        if let Some(events) = events.try_get_value() {
                            events.on_close();
                        }
                    })
                    .on_error(move |error| match error {
                        UseWebSocketError::Event(event) => {
                            if let Some(events) = events.try_get_value() {
                                events.on_error(TransportError::new(format!(
                                    "{} error",
                                    event.type_()
                                )));
                            }
                        }
                        // Frames are decoded again by the session, which logs them
                        other => log::debug!("[DevTools] WebSocket codec error: {other:?}"),
                    }),
            );

            WebSocketHandle {
                ready_state,
                send: Arc::new(send),
                close: Arc::new(close),
                owner: owner.clone(),
            }
        });

        Ok(socket)
    }

    fn render(&self, node: &Self::Node, props: InspectorProps) -> Box<dyn MountedUi> {
        let snapshot = ArcRwSignal::new(props.store.snapshot());
        let subscription = {
            let snapshot = snapshot.clone();
            props
                .store
                .subscribe(move |latest: &StoreSnapshot| snapshot.set(latest.clone()))
        };

        let handle = leptos::mount::mount_to(node.clone(), move || {
            view! { <InspectorPanel props=props snapshot=snapshot/> }
        });

        Box::new(WebRoot {
            handle,
            subscription,
        })
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Box<dyn PendingTask> {
        match set_timeout_with_handle(task, delay) {
            Ok(handle) => Box::new(TimeoutTask(handle)),
            Err(e) => {
                log::error!("[DevTools] Failed to schedule timer: {}", js_message(&e));
                Box::new(NoopTask)
            }
        }
    }

    fn preference(&self, key: &str) -> Option<String> {
        Self::local_storage().ok()?.get_item(key).ok().flatten()
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<(), DevtoolsError> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(|e| DevtoolsError::Storage {
                message: js_message(&e),
            })
    }
}

impl DevtoolsUi<WebPlatform> {
    /// A frontend for the current browser window.
    pub fn web() -> Self {
        Self::new(WebPlatform)
    }
}

//! Browser tests. Run with `wasm-pack test --headless --firefox crates/hippy_devtools`.

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use hippy_devtools::{
    ConnectionReadyState, ContentNode, DEFAULT_TAB_KEY, DevtoolsError, DevtoolsFrame,
    DevtoolsUi, MountState, Platform, Socket, SocketData, SocketEvents, TransportError,
    WebPlatform,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn container(id: &str, html: &str) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    element.set_id(id);
    ContentNode::set_inner_html(&element, html);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn test_content_node_lookup() {
    container("lookup-target", "<p>waiting</p>");
    let node = WebPlatform::content_node("lookup-target").unwrap();
    assert_eq!(ContentNode::inner_html(&node), "<p>waiting</p>");
    assert!(WebPlatform::content_node("missing-target").is_none());
}

#[wasm_bindgen_test]
fn test_preferences_round_trip() {
    let platform = WebPlatform;
    platform.set_preference(DEFAULT_TAB_KEY, "\"components\"").unwrap();
    assert_eq!(
        platform.preference(DEFAULT_TAB_KEY).as_deref(),
        Some("\"components\"")
    );
}

#[wasm_bindgen_test]
fn test_open_profiler_requires_node() {
    let ui = DevtoolsUi::web();
    assert!(matches!(ui.open_profiler(), Err(DevtoolsError::NoContentNode)));
}

#[wasm_bindgen_test]
fn test_open_profiler_clears_node_and_schedules_mount() {
    let node = container("profiler-target", "<p>waiting</p>");
    let ui = DevtoolsUi::web();
    ui.set_content_node(node.clone());

    ui.open_profiler().unwrap();

    assert_eq!(ContentNode::inner_html(&node), "");
    assert_eq!(ui.mount_state(), MountState::Pending);
    assert_eq!(
        ui.platform().preference(DEFAULT_TAB_KEY).as_deref(),
        Some("\"profiler\"")
    );
}

#[derive(Default)]
struct CountingEvents {
    closes: Cell<usize>,
}

impl SocketEvents for CountingEvents {
    fn on_open(&self) {}

    fn on_message(&self, _data: SocketData) {}

    fn on_close(&self) {
        self.closes.set(self.closes.get() + 1);
    }

    fn on_error(&self, _error: TransportError) {}
}

#[wasm_bindgen_test]
fn test_socket_close_releases_handlers() {
    let events = Rc::new(CountingEvents::default());
    let socket = WebPlatform
        .connect("ws://127.0.0.1:9/devtools", events.clone())
        .unwrap();
    assert_ne!(socket.ready_state(), ConnectionReadyState::Open);

    // Not open yet: the frame is dropped without an error
    socket
        .send(&DevtoolsFrame::new("getBridgeProtocol", serde_json::Value::Null))
        .unwrap();

    socket.close();
    assert_eq!(socket.ready_state(), ConnectionReadyState::Closed);
    assert_eq!(events.closes.get(), 0);
}

//! Standalone Hippy DevTools page.
//!
//! Serve with trunk:
//!   cd crates/hippy_devtools_app
//!   trunk serve --open
//!
//! then open `http://127.0.0.1:8080/?ws=<host>:<port>` pointing at the Hippy
//! debug server. Add `&profiler` to preview the profiler without connecting.

#[cfg(target_arch = "wasm32")]
fn main() {
    use hippy_devtools::{DevtoolsUi, StatusKind, WebPlatform};

    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    let Some(node) = WebPlatform::content_node("devtools-container") else {
        log::error!("[DevTools] #devtools-container not found");
        return;
    };

    let ui = DevtoolsUi::web();
    ui.set_content_node(node)
        .set_status_listener(|message, status| match status {
            StatusKind::Error => log::warn!("[DevTools] {status}: {message}"),
            _ => log::info!("[DevTools] {status}: {message}"),
        })
        .set_disconnected_callback(|| log::info!("[DevTools] Inspector torn down"));

    if profiler_requested() {
        if let Err(e) = ui.open_profiler() {
            log::error!("[DevTools] Failed to open profiler: {e}");
        }
    } else {
        match ui.start() {
            // Dropping the handle leaves the session running
            Ok(_session) => log::debug!("[DevTools] Session started"),
            Err(e) => log::error!("[DevTools] Failed to start: {e}"),
        }
    }

    // The frontend lives as long as the page
    std::mem::forget(ui);
}

#[cfg(target_arch = "wasm32")]
fn profiler_requested() -> bool {
    use hippy_devtools::Platform;

    hippy_devtools::WebPlatform
        .page_location()
        .and_then(|location| url::Url::parse(&location).ok())
        .is_some_and(|url| url.query_pairs().any(|(key, _)| key == "profiler"))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("hippy_devtools_app runs in the browser; build it for wasm32-unknown-unknown");
}

//! Leptos inspector panel rendered into the content node.

use hippy_devtools_common::DevtoolsTab;
use leptos::prelude::*;
use serde_json::Value as JsonValue;

use crate::props::{InspectedElement, InspectorProps};
use crate::store::StoreSnapshot;

const INSPECTED_ELEMENT_EVENT: &str = "inspectedElement";

fn tab_label(tab: DevtoolsTab) -> &'static str {
    match tab {
        DevtoolsTab::Components => "Components",
        DevtoolsTab::Profiler => "Profiler",
    }
}

/// The element carried by the latest `inspectedElement` frame, if it parses.
fn inspected_element(snapshot: &StoreSnapshot) -> Option<InspectedElement> {
    let summary = snapshot
        .events
        .iter()
        .find(|summary| summary.event == INSPECTED_ELEMENT_EVENT)?;
    let payload = &summary.last_payload;
    let value = payload.get("value").unwrap_or(payload).clone();
    serde_json::from_value(value).ok()
}

fn payload_preview(payload: &JsonValue) -> String {
    let text = payload.to_string();
    if text.chars().count() > 120 {
        let cut: String = text.chars().take(117).collect();
        format!("{cut}...")
    } else {
        text
    }
}

#[component]
pub fn InspectorPanel(
    props: InspectorProps,
    snapshot: ArcRwSignal<StoreSnapshot>,
) -> impl IntoView {
    let InspectorProps {
        bridge,
        store: _,
        show_tab_bar,
        warn_if_legacy_backend_detected,
        default_tab,
        element_source,
    } = props;

    let snapshot = RwSignal::from(snapshot);
    let tab = RwSignal::new(default_tab);
    let profiling = RwSignal::new(false);
    let bridge = StoredValue::new_local(bridge);
    let element_source = StoredValue::new(element_source);

    let tab_button = move |target: DevtoolsTab| {
        view! {
            <button
                class=move || {
                    let base = "px-3 py-1.5 text-xs font-medium rounded-md transition-colors";
                    if tab.get() == target {
                        format!("{base} bg-indigo-600/80 text-slate-50")
                    } else {
                        format!("{base} text-slate-400 hover:bg-slate-800/70")
                    }
                }
                on:click=move |_| tab.set(target)
            >
                {tab_label(target)}
            </button>
        }
    };

    let toggle_profiling = move |_: leptos::ev::MouseEvent| {
        let event = if profiling.get_untracked() {
            "stopProfiling"
        } else {
            "startProfiling"
        };
        bridge.with_value(|bridge| bridge.send(event, JsonValue::Null));
        profiling.update(|on| *on = !*on);
    };

    let components_view = move || {
        let events = snapshot.with(|s| s.events.clone());
        let element = snapshot.with(inspected_element);

        view! {
            <div class="grid grid-cols-12 gap-4 min-h-0">
                <section class="col-span-8 rounded-2xl border border-white/5 bg-slate-900/70 p-3">
                    <h2 class="text-sm font-semibold text-slate-100 mb-2">"Backend events"</h2>
                    <Show
                        when={
                            let empty = events.is_empty();
                            move || !empty
                        }
                        fallback=|| view! {
                            <div class="text-[11px] text-slate-500">"Waiting for the renderer to report."</div>
                        }
                    >
                        <table class="w-full text-[11px] text-slate-300">
                            <thead class="text-slate-500 text-left">
                                <tr><th>"Event"</th><th>"Count"</th><th>"Last payload"</th></tr>
                            </thead>
                            <tbody>
                                {events
                                    .iter()
                                    .map(|summary| view! {
                                        <tr class="border-t border-slate-800">
                                            <td class="py-1 font-mono">{summary.event.clone()}</td>
                                            <td class="py-1">{summary.count}</td>
                                            <td class="py-1 font-mono text-slate-400 truncate">
                                                {payload_preview(&summary.last_payload)}
                                            </td>
                                        </tr>
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    </Show>
                </section>
                <section class="col-span-4 rounded-2xl border border-white/5 bg-slate-900/70 p-3">
                    <h2 class="text-sm font-semibold text-slate-100 mb-2">"Selected element"</h2>
                    {match element {
                        Some(element) => {
                            let viewable = element_source
                                .with_value(|hooks| hooks.can_view_element_source(&element));
                            let id = element.id;
                            view! {
                                <div class="space-y-2 text-[11px] text-slate-300">
                                    <div class="font-mono">"#"{id}</div>
                                    <button
                                        class="px-2 py-1 rounded border border-white/10 bg-slate-800/50 disabled:opacity-50"
                                        disabled=!viewable
                                        on:click=move |_| {
                                            element_source
                                                .with_value(|hooks| hooks.view_element_source(id, &element));
                                        }
                                    >
                                        "View source"
                                    </button>
                                </div>
                            }
                                .into_any()
                        }
                        None => view! {
                            <div class="text-[11px] text-slate-500">"No element inspected."</div>
                        }
                            .into_any(),
                    }}
                </section>
            </div>
        }
    };

    let profiler_view = move || {
        view! {
            <section class="rounded-2xl border border-white/5 bg-slate-900/70 p-3 space-y-2">
                <div class="flex items-center gap-2">
                    <button
                        class="px-3 py-1 rounded bg-emerald-600 text-slate-50"
                        on:click=toggle_profiling
                    >
                        {move || if profiling.get() { "Stop profiling" } else { "Start profiling" }}
                    </button>
                    <span class="text-[11px] text-slate-400">
                        {move || format!("{} events received", snapshot.with(|s| s.total_events()))}
                    </span>
                </div>
            </section>
        }
    };

    view! {
        <div class="h-full flex flex-col bg-slate-950 text-slate-100">
            <Show when=move || show_tab_bar>
                <header class="flex items-center gap-2 px-4 py-2 border-b border-white/5 flex-shrink-0">
                    {tab_button(DevtoolsTab::Components)}
                    {tab_button(DevtoolsTab::Profiler)}
                </header>
            </Show>

            <Show when=move || {
                warn_if_legacy_backend_detected && snapshot.with(|s| s.unsupported_bridge_protocol())
            }>
                <div class="bg-amber-900/80 border-b border-amber-700 px-4 py-2 text-xs text-amber-200">
                    "The connected backend speaks an unsupported bridge protocol. Update react-devtools in the Hippy app."
                </div>
            </Show>

            <main class="flex-1 overflow-auto p-4 min-h-0">
                {move || match tab.get() {
                    DevtoolsTab::Components => components_view().into_any(),
                    DevtoolsTab::Profiler => profiler_view().into_any(),
                }}
            </main>
        </div>
    }
}

//! Logs Viewer
//!
//! Deployment logs for all instances, or for the instance picked through a
//! card's "View Logs". Search, level and source filters run client-side
//! over the fetched logs; the filtered view can be exported as CSV.

use chrono::Utc;
use grist_manager_shared::filter::{parse_choice, to_csv};
use grist_manager_shared::format::{format_date, format_relative_time};
use grist_manager_shared::{DeploymentLog, LogFilter, LogLevel, LogSource};
use leptos::*;
use wasm_bindgen::JsCast;

use crate::components::common::{
    DownloadIcon, FilterIcon, LogLevelBadge, QueryError, RefreshIcon, SearchIcon, Spinner, XIcon,
};
use crate::state::AppState;

const SELECT_CLASS: &str = "px-3 py-2 rounded-lg bg-slate-900 border border-slate-700 \
                            text-white text-sm focus:outline-none focus:ring-2 focus:ring-blue-500";

/// Logs tab
#[component]
pub fn LogsViewer() -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let selected = app_state.selected_log_instance;

    let query_state = app_state.clone();
    let query = create_memo(move |_| query_state.logs());
    let filter = create_rw_signal(LogFilter::new());

    let filtered = create_memo(move |_| {
        let logs = query.with(|q| q.data().cloned().unwrap_or_default());
        filter.with(|f| f.apply(&logs))
    });

    let loading = move || query.with(|q| q.is_loading());

    let refresh_state = app_state.clone();
    let on_refresh = move |_| {
        tracing::debug!("Refreshing logs");
        refresh_state.fetch_logs();
    };

    let on_export = move |_| {
        let logs = filtered.get_untracked();
        let name = match selected.get_untracked() {
            Some(id) => format!("grist-logs-{}.csv", id),
            None => "grist-logs.csv".to_string(),
        };
        download_csv(&to_csv(&logs), &name);
    };

    view! {
        <div class="p-6">
            <div class="max-w-7xl mx-auto">
                // Header
                <div class="flex items-center justify-between mb-6">
                    <div>
                        <h1 class="text-2xl font-bold text-white">"Deployment Logs"</h1>
                        <div class="flex items-center gap-2 mt-1">
                            {move || match selected.get() {
                                Some(id) => view! {
                                    <p class="text-slate-400">"Showing logs for instance "
                                        <span class="font-mono text-white">{id}</span>
                                    </p>
                                    <button
                                        class="flex items-center gap-1 px-2 py-0.5 text-xs text-slate-400 \
                                               hover:text-white bg-slate-800 rounded transition-colors"
                                        on:click=move |_| selected.set(None)
                                    >
                                        <XIcon class="w-3 h-3" />
                                        "Show all"
                                    </button>
                                }.into_view(),
                                None => view! {
                                    <p class="text-slate-400">"Showing logs for all instances"</p>
                                }.into_view(),
                            }}
                        </div>
                    </div>
                    <div class="flex items-center gap-2">
                        <button
                            class="flex items-center gap-2 px-3 py-2 text-sm text-slate-300 bg-slate-800 \
                                   hover:bg-slate-700 border border-slate-700 rounded-lg transition-colors \
                                   disabled:opacity-50"
                            disabled=loading
                            on:click=on_refresh
                        >
                            <span class=move || if loading() { "animate-spin" } else { "" }>
                                <RefreshIcon class="w-4 h-4" />
                            </span>
                            "Refresh"
                        </button>
                        <button
                            class="flex items-center gap-2 px-3 py-2 text-sm text-slate-300 bg-slate-800 \
                                   hover:bg-slate-700 border border-slate-700 rounded-lg transition-colors \
                                   disabled:opacity-50"
                            disabled=move || filtered.with(|logs| logs.is_empty())
                            on:click=on_export
                        >
                            <DownloadIcon class="w-4 h-4" />
                            "Export"
                        </button>
                    </div>
                </div>

                <FilterBar filter=filter />

                // Log table
                <div class="bg-slate-800 rounded-xl border border-slate-700 overflow-hidden">
                    {move || {
                        let (has_data, error) = query.with(|q| (q.data().is_some(), q.error().cloned()));
                        if let (false, Some(error)) = (has_data, error) {
                            let app_state = app_state.clone();
                            view! {
                                <QueryError error=error on_retry=move || app_state.fetch_logs() />
                            }.into_view()
                        } else if !has_data {
                            view! { <Spinner /> }.into_view()
                        } else {
                            view! { <LogList logs=filtered /> }.into_view()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn FilterBar(filter: RwSignal<LogFilter>) -> impl IntoView {
    view! {
        <div class="bg-slate-800 rounded-xl border border-slate-700 p-4 mb-6">
            <div class="flex flex-wrap items-center gap-4">
                <div class="relative flex-1 min-w-[220px]">
                    <span class="absolute left-3 top-1/2 -translate-y-1/2 text-slate-500">
                        <SearchIcon class="w-4 h-4" />
                    </span>
                    <input
                        type="text"
                        class="w-full pl-9 pr-3 py-2 rounded-lg bg-slate-900 border border-slate-700 \
                               text-white text-sm placeholder-slate-500 \
                               focus:outline-none focus:ring-2 focus:ring-blue-500"
                        placeholder="Search logs..."
                        prop:value=move || filter.with(|f| f.search.clone())
                        on:input=move |e| filter.update(|f| f.search = event_target_value(&e))
                    />
                </div>

                <span class="text-slate-500">
                    <FilterIcon class="w-4 h-4" />
                </span>

                <select
                    class=SELECT_CLASS
                    on:change=move |e| {
                        let level = parse_choice::<LogLevel>(&event_target_value(&e));
                        filter.update(|f| f.level = level);
                    }
                >
                    <option value="all" selected=move || filter.with(|f| f.level.is_none())>"All Levels"</option>
                    {LogLevel::all().iter().copied().map(|level| view! {
                        <option
                            value=level.as_str()
                            selected=move || filter.with(|f| f.level == Some(level))
                        >
                            {level.label()}
                        </option>
                    }).collect_view()}
                </select>

                <select
                    class=SELECT_CLASS
                    on:change=move |e| {
                        let source = parse_choice::<LogSource>(&event_target_value(&e));
                        filter.update(|f| f.source = source);
                    }
                >
                    <option value="all" selected=move || filter.with(|f| f.source.is_none())>"All Sources"</option>
                    {LogSource::all().iter().copied().map(|source| view! {
                        <option
                            value=source.as_str()
                            selected=move || filter.with(|f| f.source == Some(source))
                        >
                            {source.label()}
                        </option>
                    }).collect_view()}
                </select>

                <Show when=move || filter.with(|f| !f.is_empty())>
                    <button
                        class="text-sm text-slate-400 hover:text-white transition-colors"
                        on:click=move |_| filter.update(|f| f.clear())
                    >
                        "Clear filters"
                    </button>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn LogList(logs: Memo<Vec<DeploymentLog>>) -> impl IntoView {
    view! {
        <Show
            when=move || logs.with(|logs| !logs.is_empty())
            fallback=|| view! {
                <div class="text-center py-12">
                    <p class="text-slate-400">"No logs found matching your criteria"</p>
                </div>
            }
        >
            <div class="divide-y divide-slate-700">
                <For
                    each=move || logs.get()
                    key=|log| log.id.clone()
                    children=|log| view! { <LogRow log=log /> }
                />
            </div>
        </Show>
    }
}

#[component]
fn LogRow(log: DeploymentLog) -> impl IntoView {
    let relative = format_relative_time(&log.timestamp, &Utc::now());

    view! {
        <div class="flex items-start gap-4 px-4 py-3 hover:bg-slate-700/30 transition-colors">
            <div class="w-40 flex-shrink-0">
                <div class="text-sm text-slate-300 font-mono">{format_date(&log.timestamp)}</div>
                <div class="text-xs text-slate-500">{relative}</div>
            </div>
            <div class="w-20 flex-shrink-0">
                <LogLevelBadge level=log.level />
            </div>
            <div class="w-20 flex-shrink-0 text-xs text-slate-400 uppercase pt-0.5">
                {log.source.label()}
            </div>
            <div class="flex-1 min-w-0">
                <p class="text-sm text-white break-words">{log.message.clone()}</p>
                <p class="text-xs text-slate-500 mt-0.5">"Instance " {log.instance_id.clone()}</p>
            </div>
        </div>
    }
}

/// Offer `csv` to the browser as a file download
fn download_csv(csv: &str, filename: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&wasm_bindgen::JsValue::from_str(csv));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/csv");

    let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options) else {
        tracing::error!("Failed to create CSV blob");
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        tracing::error!("Failed to create object URL for CSV export");
        return;
    };

    if let Ok(a) = document.create_element("a") {
        let _ = a.set_attribute("href", &url);
        let _ = a.set_attribute("download", filename);

        if let Some(body) = document.body() {
            let _ = body.append_child(&a);
            if let Some(link) = a.dyn_ref::<web_sys::HtmlElement>() {
                link.click();
            }
            let _ = body.remove_child(&a);
        }
    }

    let _ = web_sys::Url::revoke_object_url(&url);
    tracing::info!(filename, "Exported logs");
}

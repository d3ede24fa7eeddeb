//! Instance Card Component
//!
//! One card per instance: status, URL, runtime metrics, the start/stop
//! action and an overflow menu with "View Logs" and "Delete".

use chrono::Utc;
use grist_manager_shared::format::{format_megabytes, format_relative_time, format_uptime};
use grist_manager_shared::{Instance, InstanceAction, InstanceMetrics};
use leptos::*;

use crate::components::common::{
    ClockIcon, CpuIcon, DocumentIcon, ExternalLinkIcon, LogsIcon, MemoryIcon, MoreIcon, PlayIcon,
    StatusBadge, StopIcon, TrashIcon, UsersIcon, WarningIcon,
};
use crate::state::AppState;

#[component]
pub fn InstanceCard(instance: Instance) -> impl IntoView {
    let app_state = expect_context::<AppState>();

    let (acting, set_acting) = create_signal(false);
    let (menu_open, set_menu_open) = create_signal(false);
    let (confirm_delete, set_confirm_delete) = create_signal(false);

    let action = instance.status.primary_action();
    let updated = format_relative_time(&instance.last_updated, &Utc::now());

    let run_action = {
        let app_state = app_state.clone();
        let id = instance.id.clone();
        move |_| {
            if acting.get_untracked() {
                return;
            }
            set_acting.set(true);

            let app_state = app_state.clone();
            let id = id.clone();
            spawn_local(async move {
                if let Err(e) = app_state.run_action(&id, action).await {
                    let context = format!("Failed to {} instance", action.label().to_lowercase());
                    app_state.report_error(&context, &e);
                }
                let _ = set_acting.try_set(false);
            });
        }
    };

    let view_logs = {
        let app_state = app_state.clone();
        let id = instance.id.clone();
        move |_| {
            set_menu_open.set(false);
            app_state.show_logs_for(&id);
        }
    };

    let delete_confirmed = {
        let app_state = app_state.clone();
        let id = instance.id.clone();
        move || {
            let app_state = app_state.clone();
            let id = id.clone();
            spawn_local(async move {
                if let Err(e) = app_state.delete_instance(&id).await {
                    app_state.report_error("Failed to delete instance", &e);
                }
                let _ = set_confirm_delete.try_set(false);
            });
        }
    };

    let metrics = instance.metrics;
    let modal_name = instance.name.clone();

    view! {
        <div class="bg-slate-800 rounded-xl border border-slate-700 p-6 flex flex-col">
            // Header
            <div class="flex items-start justify-between gap-3">
                <div class="min-w-0">
                    <div class="flex items-center gap-2">
                        <h3 class="text-lg font-semibold text-white truncate">{instance.name.clone()}</h3>
                        <StatusBadge status=instance.status />
                    </div>
                    <p class="text-sm text-slate-400 mt-0.5">{instance.team.clone()}</p>
                    <a
                        href=instance.url.clone()
                        target="_blank"
                        rel="noopener noreferrer"
                        class="inline-flex items-center gap-1 text-sm text-blue-400 hover:text-blue-300 mt-1 truncate"
                    >
                        {instance.url.clone()}
                        <ExternalLinkIcon class="w-3 h-3" />
                    </a>
                </div>

                // Overflow menu
                <div class="relative">
                    <button
                        class="p-1.5 text-slate-400 hover:text-white hover:bg-slate-700 rounded transition-colors"
                        on:click=move |_| set_menu_open.update(|open| *open = !*open)
                    >
                        <MoreIcon class="w-4 h-4" />
                    </button>
                    <Show when=move || menu_open.get()>
                        <div class="absolute right-0 mt-1 w-40 bg-slate-900 border border-slate-700 rounded-lg shadow-xl z-10 py-1">
                            <button
                                class="w-full flex items-center gap-2 px-3 py-2 text-sm text-slate-300 hover:bg-slate-800"
                                on:click=view_logs.clone()
                            >
                                <LogsIcon class="w-4 h-4" />
                                "View Logs"
                            </button>
                            <button
                                class="w-full flex items-center gap-2 px-3 py-2 text-sm text-red-400 hover:bg-slate-800"
                                on:click=move |_| {
                                    set_menu_open.set(false);
                                    set_confirm_delete.set(true);
                                }
                            >
                                <TrashIcon class="w-4 h-4" />
                                "Delete"
                            </button>
                        </div>
                    </Show>
                </div>
            </div>

            // Metrics
            {metrics.map(|metrics| view! { <MetricsGrid metrics=metrics /> })}

            // Footer
            <div class="flex items-center justify-between mt-auto pt-4 border-t border-slate-700">
                <span class="text-xs text-slate-500">"Updated " {updated}</span>
                <button
                    class=move || format!(
                        "flex items-center gap-1.5 px-3 py-1.5 text-sm font-medium rounded-lg transition-colors disabled:opacity-50 {}",
                        match action {
                            InstanceAction::Stop => "bg-red-500/10 text-red-400 hover:bg-red-500/20",
                            InstanceAction::Start => "bg-green-500/10 text-green-400 hover:bg-green-500/20",
                        }
                    )
                    disabled=move || acting.get()
                    on:click=run_action
                >
                    {match action {
                        InstanceAction::Stop => view! { <StopIcon class="w-3.5 h-3.5" /> }.into_view(),
                        InstanceAction::Start => view! { <PlayIcon class="w-3.5 h-3.5" /> }.into_view(),
                    }}
                    {move || if acting.get() { "Working..." } else { action.label() }}
                </button>
            </div>

            <Show when=move || confirm_delete.get()>
                <DeleteConfirmModal
                    name=modal_name.clone()
                    on_close=move || set_confirm_delete.set(false)
                    on_confirm=delete_confirmed.clone()
                />
            </Show>
        </div>
    }
}

#[component]
fn MetricsGrid(metrics: InstanceMetrics) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 gap-3 mt-4">
            <Metric label="Users" value=metrics.active_users.to_string()>
                <UsersIcon class="w-4 h-4" />
            </Metric>
            <Metric label="Documents" value=metrics.documents_count.to_string()>
                <DocumentIcon class="w-4 h-4" />
            </Metric>
            <Metric label="CPU" value=format!("{:.0}%", metrics.cpu_usage)>
                <CpuIcon class="w-4 h-4" />
            </Metric>
            <Metric label="Memory" value=format_megabytes(metrics.memory_usage)>
                <MemoryIcon class="w-4 h-4" />
            </Metric>
            <div class="col-span-2">
                <Metric label="Uptime" value=format_uptime(metrics.uptime)>
                    <ClockIcon class="w-4 h-4" />
                </Metric>
            </div>
        </div>
    }
}

#[component]
fn Metric(label: &'static str, value: String, children: Children) -> impl IntoView {
    view! {
        <div class="flex items-center gap-2 px-3 py-2 bg-slate-900 rounded-lg">
            <span class="text-slate-500">{children()}</span>
            <span class="text-xs text-slate-400">{label}</span>
            <span class="ml-auto text-sm font-medium text-white">{value}</span>
        </div>
    }
}

/// Delete confirmation modal
#[component]
fn DeleteConfirmModal(
    name: String,
    on_close: impl Fn() + 'static + Clone,
    on_confirm: impl Fn() + 'static + Clone,
) -> impl IntoView {
    let (deleting, set_deleting) = create_signal(false);

    let on_close_backdrop = on_close.clone();
    let on_close_cancel = on_close;

    let handle_confirm = move |_| {
        set_deleting.set(true);
        on_confirm();
    };

    view! {
        <div class="fixed inset-0 z-50 flex items-center justify-center">
            // Backdrop
            <div
                class="absolute inset-0 bg-black/60 backdrop-blur-sm"
                on:click=move |_| {
                    if !deleting.get_untracked() {
                        on_close_backdrop();
                    }
                }
            />

            // Modal
            <div class="relative bg-slate-800 rounded-xl border border-slate-700 shadow-2xl w-full max-w-md mx-4">
                <div class="p-6 text-center">
                    <div class="w-16 h-16 mx-auto mb-4 rounded-full bg-red-500/10 flex items-center justify-center">
                        <WarningIcon class="w-8 h-8 text-red-400" />
                    </div>
                    <h2 class="text-xl font-semibold text-white mb-2">"Delete Instance"</h2>
                    <p class="text-slate-400">
                        "Are you sure you want to delete "
                        <span class="font-medium text-white">{name}</span>
                        "? This action cannot be undone."
                    </p>
                </div>

                <div class="flex items-center justify-end gap-3 px-6 py-4 border-t border-slate-700">
                    <button
                        class="px-4 py-2 text-sm font-medium text-slate-400 hover:text-white \
                               rounded-lg transition-colors"
                        on:click=move |_| on_close_cancel()
                        disabled=move || deleting.get()
                    >
                        "Cancel"
                    </button>
                    <button
                        class="px-4 py-2 text-sm font-medium bg-red-500 hover:bg-red-600 \
                               text-white rounded-lg transition-colors disabled:opacity-50"
                        disabled=move || deleting.get()
                        on:click=handle_confirm
                    >
                        {move || if deleting.get() { "Deleting..." } else { "Delete Instance" }}
                    </button>
                </div>
            </div>
        </div>
    }
}

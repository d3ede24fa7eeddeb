//! Sidebar Navigation
//!
//! Lists the dashboard tabs. The collapsed state survives reloads through
//! local storage (see [`AppState::toggle_sidebar`]).

use leptos::*;

use crate::components::common::{
    AnalyticsIcon, ChevronLeftIcon, DashboardIcon, LogsIcon, ServerIcon, SettingsIcon,
};
use crate::state::{AppState, Tab};

fn tab_icon(tab: Tab) -> View {
    match tab {
        Tab::Dashboard => view! { <DashboardIcon /> }.into_view(),
        Tab::Instances => view! { <ServerIcon /> }.into_view(),
        Tab::Logs => view! { <LogsIcon /> }.into_view(),
        Tab::Analytics => view! { <AnalyticsIcon /> }.into_view(),
        Tab::Settings => view! { <SettingsIcon /> }.into_view(),
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let collapsed = app_state.sidebar_collapsed;
    let toggle_state = app_state.clone();

    view! {
        <aside class=move || format!(
            "{} bg-slate-800 border-r border-slate-700 flex flex-col flex-shrink-0 transition-all",
            if collapsed.get() { "w-16" } else { "w-60" }
        )>
            // Logo
            <div class="h-16 flex items-center gap-2 px-4 border-b border-slate-700">
                <div class="w-8 h-8 bg-gradient-to-br from-emerald-500 to-blue-600 rounded-lg flex items-center justify-center flex-shrink-0">
                    <span class="text-white text-sm font-bold">"G"</span>
                </div>
                <Show when=move || !collapsed.get()>
                    <span class="text-lg font-bold text-white">"Grist"</span>
                </Show>
            </div>

            // Tabs
            <nav class="flex-1 p-2 space-y-1">
                {Tab::all().iter().copied().map(|tab| {
                    let app_state = app_state.clone();
                    let active = {
                        let app_state = app_state.clone();
                        move || app_state.active_tab.get() == tab
                    };
                    view! {
                        <button
                            class=move || format!(
                                "w-full flex items-center gap-3 px-3 py-2 text-sm rounded-lg transition-colors {}",
                                if active() {
                                    "bg-blue-500/10 text-blue-400"
                                } else {
                                    "text-slate-400 hover:text-white hover:bg-slate-700"
                                }
                            )
                            title=tab.label()
                            on:click=move |_| app_state.active_tab.set(tab)
                        >
                            {tab_icon(tab)}
                            <Show when=move || !collapsed.get()>
                                <span>{tab.label()}</span>
                            </Show>
                        </button>
                    }
                }).collect_view()}
            </nav>

            // Collapse toggle
            <div class="p-2 border-t border-slate-700">
                <button
                    class="w-full flex items-center justify-center p-2 text-slate-400 hover:text-white hover:bg-slate-700 rounded-lg transition-colors"
                    title=move || if collapsed.get() { "Expand sidebar" } else { "Collapse sidebar" }
                    on:click=move |_| toggle_state.toggle_sidebar()
                >
                    <span class=move || if collapsed.get() { "rotate-180 transition-transform" } else { "transition-transform" }>
                        <ChevronLeftIcon />
                    </span>
                </button>
            </div>
        </aside>
    }
}

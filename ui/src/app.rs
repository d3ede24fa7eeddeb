//! Root Application Component
//!
//! This module contains the main App component that sets up:
//! - The data-access client chosen by the configuration
//! - Global state providers
//! - Query synchronisation and tab switching inside the AppShell

use leptos::*;
use leptos_meta::*;

use crate::client::client_from_config;
use crate::components::common::{AnalyticsIcon, SettingsIcon};
use crate::components::dashboard::Dashboard;
use crate::components::instances::InstancesPage;
use crate::components::layout::AppShell;
use crate::components::logs::LogsViewer;
use crate::config::UiConfig;
use crate::state::{AppState, Tab};

/// Root application component
#[component]
pub fn App(config: UiConfig) -> impl IntoView {
    provide_meta_context();

    // Initialize global state
    let api = client_from_config(&config);
    let app_state = AppState::new(api);
    provide_context(app_state.clone());

    // Fetch whatever the visible tab needs whenever it changes or a cached
    // query is invalidated
    {
        let app_state = app_state.clone();
        create_effect(move |_| app_state.sync_queries());
    }

    let active_tab = app_state.active_tab;

    view! {
        <Title text=move || format!("{} · Grist Manager", active_tab.get().label()) />
        <AppShell>
            {move || match active_tab.get() {
                Tab::Dashboard => view! { <Dashboard /> }.into_view(),
                Tab::Instances => view! { <InstancesPage /> }.into_view(),
                Tab::Logs => view! { <LogsViewer /> }.into_view(),
                Tab::Analytics => view! {
                    <PlaceholderPage
                        title="Analytics Dashboard"
                        description="Advanced analytics and reporting features coming soon."
                    >
                        <AnalyticsIcon class="w-8 h-8 text-slate-500" />
                    </PlaceholderPage>
                }.into_view(),
                Tab::Settings => view! {
                    <PlaceholderPage
                        title="Settings"
                        description="Global configuration and preferences coming soon."
                    >
                        <SettingsIcon class="w-8 h-8 text-slate-500" />
                    </PlaceholderPage>
                }.into_view(),
            }}
        </AppShell>
    }
}

/// Placeholder for sections that are not built yet
#[component]
fn PlaceholderPage(
    title: &'static str,
    description: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="p-6">
            <div class="bg-slate-800 rounded-xl border border-slate-700 text-center py-12 px-6">
                <div class="w-16 h-16 rounded-full bg-slate-700/50 flex items-center justify-center mx-auto mb-4">
                    {children()}
                </div>
                <h2 class="text-xl font-semibold text-white mb-2">{title}</h2>
                <p class="text-slate-400">{description}</p>
            </div>
        </div>
    }
}

//! Dashboard Components
//!
//! Overview tab: aggregate metrics, recently updated instances and system
//! health.

use grist_manager_shared::format::format_uptime;
use grist_manager_shared::OverviewStats;
use leptos::*;

mod activity_feed;
mod health_card;

pub use activity_feed::ActivityFeed;
pub use health_card::HealthCard;

use crate::components::common::{ClockIcon, DocumentIcon, QueryError, ServerIcon, Spinner, UsersIcon};
use crate::state::AppState;

/// Main dashboard view
#[component]
pub fn Dashboard() -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let query_state = app_state.clone();
    let query = create_memo(move |_| query_state.instances());

    let stats = create_memo(move |_| {
        query.with(|q| q.data().map(|instances| OverviewStats::from_instances(instances)))
    });

    view! {
        <div class="p-6">
            <div class="max-w-7xl mx-auto">
                // Page header
                <div class="mb-6">
                    <h1 class="text-2xl font-bold text-white">"Dashboard"</h1>
                    <p class="text-slate-400 mt-1">"Overview of your Grist deployments"</p>
                </div>

                {move || match stats.get() {
                    Some(stats) => view! { <Overview stats=stats /> }.into_view(),
                    None => match query.with_untracked(|q| q.error().cloned()) {
                        Some(error) => {
                            let app_state = app_state.clone();
                            view! {
                                <QueryError error=error on_retry=move || app_state.fetch_instances() />
                            }.into_view()
                        }
                        None => view! { <Spinner /> }.into_view(),
                    },
                }}
            </div>
        </div>
    }
}

#[component]
fn Overview(stats: OverviewStats) -> impl IntoView {
    let average_uptime = stats
        .average_uptime
        .map(format_uptime)
        .unwrap_or_else(|| "0m".to_string());

    view! {
        // Metric cards
        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6 mb-6">
            <MetricCard
                label="Running Instances"
                value=format!("{}", stats.running_instances)
                detail=format!("of {} total", stats.total_instances)
                accent="text-green-400 bg-green-500/10"
            >
                <ServerIcon />
            </MetricCard>
            <MetricCard
                label="Active Users"
                value=stats.total_users.to_string()
                detail="across all instances".to_string()
                accent="text-blue-400 bg-blue-500/10"
            >
                <UsersIcon />
            </MetricCard>
            <MetricCard
                label="Total Documents"
                value=stats.total_documents.to_string()
                detail="across all instances".to_string()
                accent="text-purple-400 bg-purple-500/10"
            >
                <DocumentIcon />
            </MetricCard>
            <MetricCard
                label="Avg Uptime"
                value=average_uptime
                detail="of reporting instances".to_string()
                accent="text-amber-400 bg-amber-500/10"
            >
                <ClockIcon />
            </MetricCard>
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <ActivityFeed instances=stats.recent />
            <HealthCard />
        </div>
    }
}

#[component]
fn MetricCard(
    label: &'static str,
    value: String,
    detail: String,
    accent: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="bg-slate-800 rounded-xl border border-slate-700 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-slate-400">{label}</p>
                    <p class="text-3xl font-bold text-white mt-1">{value}</p>
                    <p class="text-xs text-slate-500 mt-1">{detail}</p>
                </div>
                <div class=format!("w-12 h-12 rounded-lg flex items-center justify-center {}", accent)>
                    {children()}
                </div>
            </div>
        </div>
    }
}

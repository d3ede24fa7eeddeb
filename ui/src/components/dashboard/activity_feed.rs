//! Activity Feed Component

use chrono::Utc;
use grist_manager_shared::format::format_relative_time;
use grist_manager_shared::Instance;
use leptos::*;

use crate::components::common::{ActivityIcon, StatusBadge};
use crate::state::{AppState, Tab};

/// Most recently updated instances
#[component]
pub fn ActivityFeed(instances: Vec<Instance>) -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let now = Utc::now();

    view! {
        <div class="bg-slate-800 rounded-xl border border-slate-700 p-6">
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-lg font-semibold text-white">"Recent Activity"</h2>
                <button
                    class="text-sm text-blue-400 hover:text-blue-300"
                    on:click=move |_| app_state.active_tab.set(Tab::Instances)
                >
                    "View All"
                </button>
            </div>

            {if instances.is_empty() {
                view! {
                    <div class="text-center py-8">
                        <p class="text-slate-400">"No recent activity"</p>
                        <p class="text-sm text-slate-500 mt-1">"Instances will appear here once created"</p>
                    </div>
                }.into_view()
            } else {
                view! {
                    <div class="space-y-3">
                        {instances.into_iter().map(|instance| {
                            let updated = format_relative_time(&instance.last_updated, &now);
                            view! {
                                <div class="flex items-center gap-3 p-3 bg-slate-900 rounded-lg">
                                    <div class="w-8 h-8 rounded-full bg-slate-800 flex items-center justify-center text-slate-400">
                                        <ActivityIcon class="w-4 h-4" />
                                    </div>
                                    <div class="flex-1 min-w-0">
                                        <p class="text-sm font-medium text-white truncate">{instance.name}</p>
                                        <p class="text-xs text-slate-500">{instance.team} " · " {updated}</p>
                                    </div>
                                    <StatusBadge status=instance.status />
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}
        </div>
    }
}

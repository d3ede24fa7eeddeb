//! System Health Card Component

use grist_manager_shared::InstanceStatus;
use leptos::*;

use crate::components::common::StatusBadge;

const CHECKS: [&str; 4] = [
    "Overall System Status",
    "Certificate Status",
    "Database Health",
    "Backup Status",
];

/// Health of the shared infrastructure
///
/// There is no health source yet, so every check reads as running.
#[component]
pub fn HealthCard() -> impl IntoView {
    view! {
        <div class="bg-slate-800 rounded-xl border border-slate-700 p-6">
            <h2 class="text-lg font-semibold text-white mb-4">"System Health"</h2>
            <div class="space-y-3">
                {CHECKS.iter().map(|check| view! {
                    <div class="flex items-center justify-between p-3 bg-slate-900 rounded-lg">
                        <span class="text-sm text-slate-300">{*check}</span>
                        <StatusBadge status=InstanceStatus::Running />
                    </div>
                }).collect_view()}
            </div>
        </div>
    }
}

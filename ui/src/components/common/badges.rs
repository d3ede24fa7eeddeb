//! Status and level badges

use grist_manager_shared::{InstanceStatus, LogLevel};
use leptos::*;

fn status_classes(status: InstanceStatus) -> &'static str {
    match status {
        InstanceStatus::Running => "bg-green-500/10 text-green-400 border-green-500/30",
        InstanceStatus::Stopped => "bg-slate-500/10 text-slate-400 border-slate-500/30",
        InstanceStatus::Pending => "bg-amber-500/10 text-amber-400 border-amber-500/30",
        InstanceStatus::Error => "bg-red-500/10 text-red-400 border-red-500/30",
    }
}

fn status_dot(status: InstanceStatus) -> &'static str {
    match status {
        InstanceStatus::Running => "bg-green-400",
        InstanceStatus::Stopped => "bg-slate-400",
        InstanceStatus::Pending => "bg-amber-400 animate-pulse",
        InstanceStatus::Error => "bg-red-400",
    }
}

/// Coloured pill showing an instance status
#[component]
pub fn StatusBadge(status: InstanceStatus) -> impl IntoView {
    view! {
        <span class=format!(
            "inline-flex items-center gap-1.5 px-2 py-0.5 text-xs font-medium rounded-full border {}",
            status_classes(status)
        )>
            <span class=format!("w-1.5 h-1.5 rounded-full {}", status_dot(status)) />
            {status.label()}
        </span>
    }
}

fn level_classes(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "bg-blue-500/10 text-blue-400",
        LogLevel::Warn => "bg-amber-500/10 text-amber-400",
        LogLevel::Error => "bg-red-500/10 text-red-400",
    }
}

#[component]
pub fn LogLevelBadge(level: LogLevel) -> impl IntoView {
    view! {
        <span class=format!(
            "px-2 py-0.5 text-xs font-medium uppercase rounded {}",
            level_classes(level)
        )>
            {level.as_str()}
        </span>
    }
}

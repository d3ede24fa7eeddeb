//! Header Component

use leptos::*;

use crate::components::common::{BellIcon, PlusIcon, SettingsIcon};
use crate::state::{AppState, Tab};

/// Title bar shown above every tab
#[component]
pub fn Header() -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let open_settings = app_state.clone();
    let open_create = app_state.clone();

    view! {
        <header class="h-16 flex items-center justify-between px-6 bg-slate-800 border-b border-slate-700 flex-shrink-0">
            <div>
                <h1 class="text-lg font-bold text-white">"Grist Manager"</h1>
                <p class="text-xs text-slate-400">"Manage your Grist omnibus deployments"</p>
            </div>

            <div class="flex items-center gap-2">
                <button
                    class="p-2 text-slate-400 hover:text-white hover:bg-slate-700 rounded-lg transition-colors"
                    title="Notifications"
                >
                    <BellIcon />
                </button>
                <button
                    class="p-2 text-slate-400 hover:text-white hover:bg-slate-700 rounded-lg transition-colors"
                    title="Settings"
                    on:click=move |_| open_settings.active_tab.set(Tab::Settings)
                >
                    <SettingsIcon />
                </button>
                <button
                    class="ml-2 flex items-center gap-2 px-4 py-2 text-sm font-medium bg-blue-500 \
                           hover:bg-blue-600 text-white rounded-lg transition-colors"
                    on:click=move |_| open_create.show_create_modal.set(true)
                >
                    <PlusIcon class="w-4 h-4" />
                    "New Instance"
                </button>
            </div>
        </header>
    }
}

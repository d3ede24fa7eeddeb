//! App Shell Component
//!
//! Main layout container that combines:
//! - Sidebar navigation
//! - Header
//! - Main content area for the active tab
//! - Create-instance modal and error toasts

use leptos::*;

use super::{Header, Sidebar};
use crate::components::common::ToastStack;
use crate::components::instances::CreateInstanceModal;
use crate::state::AppState;

/// Main application shell layout
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let show_create = app_state.show_create_modal;

    view! {
        <div class="h-screen flex bg-slate-900 text-white overflow-hidden">
            <Sidebar />

            <div class="flex-1 flex flex-col min-w-0">
                <Header />
                <main class="flex-1 overflow-auto">
                    {children()}
                </main>
            </div>

            <Show when=move || show_create.get()>
                <CreateInstanceModal on_close=move || show_create.set(false) />
            </Show>

            <ToastStack />
        </div>
    }
}

//! Loading, empty and error states

use grist_manager_shared::ApiError;
use leptos::*;

use super::{RefreshIcon, WarningIcon, XIcon};
use crate::state::AppState;

/// Centered loading spinner
#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="animate-spin w-8 h-8 border-4 border-blue-500 border-t-transparent rounded-full" />
        </div>
    }
}

#[component]
pub fn EmptyState(
    message: &'static str,
    #[prop(optional)] hint: Option<&'static str>,
) -> impl IntoView {
    view! {
        <div class="text-center py-12">
            <p class="text-slate-400">{message}</p>
            {hint.map(|hint| view! { <p class="text-sm text-slate-500 mt-1">{hint}</p> })}
        </div>
    }
}

/// Inline error for a failed query, with a retry button
#[component]
pub fn QueryError(
    error: ApiError,
    on_retry: impl Fn() + 'static,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 text-center">
            <WarningIcon class="w-8 h-8 text-red-400 mb-3" />
            <p class="text-slate-300">"Failed to load data"</p>
            <p class="text-sm text-slate-500 mt-1">{error.to_string()}</p>
            <button
                class="mt-4 flex items-center gap-2 px-3 py-1.5 text-sm text-slate-300 bg-slate-700 \
                       hover:bg-slate-600 rounded-lg transition-colors"
                on:click=move |_| on_retry()
            >
                <RefreshIcon class="w-4 h-4" />
                "Retry"
            </button>
        </div>
    }
}

/// Error banners raised by failed mutations
#[component]
pub fn ToastStack() -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let toasts = app_state.toasts;

    view! {
        <div class="fixed bottom-4 right-4 z-50 flex flex-col gap-2 w-96 max-w-full">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let app_state = app_state.clone();
                    let id = toast.id;
                    view! {
                        <div class="flex items-start gap-3 p-4 bg-red-500/10 border border-red-500/30 \
                                    rounded-lg shadow-lg backdrop-blur-sm">
                            <WarningIcon class="w-5 h-5 text-red-400 flex-shrink-0" />
                            <p class="flex-1 text-sm text-red-300">{toast.message}</p>
                            <button
                                class="text-red-400 hover:text-red-300"
                                on:click=move |_| app_state.dismiss_toast(id)
                            >
                                <XIcon class="w-4 h-4" />
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

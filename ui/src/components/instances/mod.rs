//! Instance Components
//!
//! The Instances tab: a grid of instance cards plus the create-instance
//! modal opened from the header or the page.

use leptos::*;

mod card;
mod create_modal;

pub use card::InstanceCard;
pub use create_modal::CreateInstanceModal;

use crate::components::common::{EmptyState, PlusIcon, QueryError, Spinner};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListPhase {
    Loading,
    Failed,
    Empty,
    Ready,
}

/// Instances tab
#[component]
pub fn InstancesPage() -> impl IntoView {
    let app_state = expect_context::<AppState>();
    let query_state = app_state.clone();
    let query = create_memo(move |_| query_state.instances());
    let phase = create_memo(move |_| {
        query.with(|state| match (state.data(), state.error()) {
            (Some(instances), _) if instances.is_empty() => ListPhase::Empty,
            (Some(_), _) => ListPhase::Ready,
            (None, Some(_)) => ListPhase::Failed,
            (None, None) => ListPhase::Loading,
        })
    });
    let open_create = app_state.clone();

    view! {
        <div class="p-6">
            <div class="max-w-7xl mx-auto">
                <div class="flex items-center justify-between mb-6">
                    <div>
                        <h1 class="text-2xl font-bold text-white">"Instances"</h1>
                        <p class="text-slate-400 mt-1">"Create, start, stop and remove Grist instances"</p>
                    </div>
                    <button
                        class="flex items-center gap-2 px-4 py-2 text-sm font-medium bg-blue-500 \
                               hover:bg-blue-600 text-white rounded-lg transition-colors"
                        on:click=move |_| open_create.show_create_modal.set(true)
                    >
                        <PlusIcon class="w-4 h-4" />
                        "Create Instance"
                    </button>
                </div>

                {move || match phase.get() {
                    ListPhase::Loading => view! { <Spinner /> }.into_view(),
                    ListPhase::Failed => {
                        let error = query.with_untracked(|state| state.error().cloned());
                        let app_state = app_state.clone();
                        error.map(|error| view! {
                            <QueryError error=error on_retry=move || app_state.fetch_instances() />
                        }).into_view()
                    }
                    ListPhase::Empty => view! {
                        <EmptyState
                            message="No instances yet"
                            hint="Create your first Grist instance to get started"
                        />
                    }.into_view(),
                    ListPhase::Ready => view! {
                        <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-6">
                            <For
                                each=move || query.with(|state| state.data().cloned().unwrap_or_default())
                                key=|instance| {
                                    (instance.id.clone(), instance.status, instance.last_updated)
                                }
                                children=|instance| view! { <InstanceCard instance=instance /> }
                            />
                        </div>
                    }.into_view(),
                }}
            </div>
        </div>
    }
}

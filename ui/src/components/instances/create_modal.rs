//! Create Instance Modal
//!
//! Form for provisioning a new instance. Every field is validated before
//! anything is submitted; field errors clear as the field is edited.

use grist_manager_shared::validation::{CredentialField, Field};
use grist_manager_shared::{ApiError, CreateInstanceForm, FieldErrors, HttpsMode};
use leptos::*;

use crate::components::common::{PlusIcon, TrashIcon, XIcon};
use crate::state::AppState;

const INPUT_BASE: &str = "w-full px-3 py-2 rounded-lg bg-slate-900 border text-white text-sm \
                          placeholder-slate-500 focus:outline-none focus:ring-2 focus:ring-blue-500 \
                          focus:border-transparent";

#[component]
pub fn CreateInstanceModal(on_close: impl Fn() + 'static + Clone) -> impl IntoView {
    let app_state = expect_context::<AppState>();

    let form = create_rw_signal(CreateInstanceForm::new());
    let errors = create_rw_signal(FieldErrors::default());
    let (submitting, set_submitting) = create_signal(false);
    let (api_error, set_api_error) = create_signal(Option::<String>::None);

    let user_count = create_memo(move |_| form.with(|f| f.additional_users.len()));
    let shows_proxies = create_memo(move |_| form.with(|f| f.shows_trusted_proxies()));

    // Dismissal is ignored while a submit is in flight
    let close_if_idle = {
        let on_close = on_close.clone();
        move || {
            if !submitting.get_untracked() {
                on_close();
            }
        }
    };
    let on_close_backdrop = close_if_idle.clone();
    let on_close_header = close_if_idle.clone();
    let on_close_cancel = close_if_idle;

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let request = match form.with_untracked(|f| f.validate()) {
            Ok(request) => request,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };

        errors.set(FieldErrors::default());
        set_api_error.set(None);
        set_submitting.set(true);

        let app_state = app_state.clone();
        let on_close = on_close.clone();
        spawn_local(async move {
            match app_state.create_instance(request).await {
                Ok(_) => {
                    form.update(|f| f.reset());
                    set_submitting.set(false);
                    on_close();
                }
                Err(ApiError::Validation(field_errors)) => {
                    tracing::error!("Server rejected instance: {}", field_errors);
                    errors.set(field_errors);
                    set_submitting.set(false);
                }
                Err(e) => {
                    tracing::error!("Failed to create instance: {}", e);
                    set_api_error.set(Some(e.to_string()));
                    set_submitting.set(false);
                }
            }
        });
    };

    view! {
        <div class="fixed inset-0 z-50 flex items-center justify-center">
            // Backdrop
            <div
                class="absolute inset-0 bg-black/60 backdrop-blur-sm"
                on:click=move |_| on_close_backdrop()
            />

            // Modal
            <div class="relative bg-slate-800 rounded-xl border border-slate-700 shadow-2xl w-full max-w-2xl mx-4 max-h-[90vh] flex flex-col">
                // Header
                <div class="flex items-center justify-between px-6 py-4 border-b border-slate-700">
                    <h2 class="text-lg font-semibold text-white">"Create New Instance"</h2>
                    <button
                        class="p-1 text-slate-400 hover:text-white rounded transition-colors"
                        on:click=move |_| on_close_header()
                        disabled=move || submitting.get()
                    >
                        <XIcon class="w-5 h-5" />
                    </button>
                </div>

                <form class="flex-1 overflow-y-auto" on:submit=on_submit>
                    <div class="p-6 space-y-4">
                        // API error display
                        {move || api_error.get().map(|err| view! {
                            <div class="bg-red-500/10 border border-red-500/30 rounded-lg p-3">
                                <p class="text-sm text-red-400">{err}</p>
                            </div>
                        })}

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <TextField
                                label="Instance Name"
                                field=Field::Name
                                placeholder="Production Grist"
                                form=form
                                errors=errors
                            />
                            <TextField
                                label="Team"
                                field=Field::Team
                                placeholder="acme-corp"
                                form=form
                                errors=errors
                            />
                        </div>

                        <TextField
                            label="URL"
                            field=Field::Url
                            input_type="url"
                            placeholder="https://grist.example.com"
                            form=form
                            errors=errors
                        />

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <TextField
                                label="Admin Email"
                                field=Field::Email
                                input_type="email"
                                placeholder="admin@example.com"
                                form=form
                                errors=errors
                            />
                            <TextField
                                label="Admin Password"
                                field=Field::Password
                                input_type="password"
                                placeholder="At least 6 characters"
                                form=form
                                errors=errors
                            />
                        </div>

                        // HTTPS mode
                        <div class="space-y-1">
                            <label class="block text-sm font-medium text-slate-300">"HTTPS Configuration"</label>
                            <select
                                class=format!("{} border-slate-700", INPUT_BASE)
                                on:change=move |e| {
                                    if let Ok(mode) = event_target_value(&e).parse::<HttpsMode>() {
                                        form.update(|f| f.https = mode);
                                    }
                                }
                            >
                                {HttpsMode::all().iter().map(|mode| {
                                    let mode = *mode;
                                    view! {
                                        <option
                                            value=mode.as_str()
                                            selected=move || form.with(|f| f.https == mode)
                                        >
                                            {mode.label()}
                                        </option>
                                    }
                                }).collect_view()}
                            </select>
                        </div>

                        <Show when=move || shows_proxies.get()>
                            <div class="space-y-1">
                                <label class="block text-sm font-medium text-slate-300">
                                    "Trusted Proxy IPs"
                                    <span class="text-slate-500 font-normal">" (optional)"</span>
                                </label>
                                <input
                                    type="text"
                                    class=format!("{} border-slate-700", INPUT_BASE)
                                    placeholder="192.168.1.0/24, 10.0.0.0/8"
                                    prop:value=move || form.with(|f| f.trusted_proxy_ips.clone())
                                    on:input=move |e| {
                                        form.update(|f| f.trusted_proxy_ips = event_target_value(&e));
                                    }
                                />
                            </div>
                        </Show>

                        // Additional users
                        <div class="space-y-2">
                            <div class="flex items-center justify-between">
                                <label class="block text-sm font-medium text-slate-300">"Additional Users"</label>
                                <button
                                    type="button"
                                    class="flex items-center gap-1 text-sm text-blue-400 hover:text-blue-300"
                                    on:click=move |_| form.update(|f| f.add_user())
                                >
                                    <PlusIcon class="w-4 h-4" />
                                    "Add User"
                                </button>
                            </div>
                            {move || (0..user_count.get()).map(|index| view! {
                                <UserRow index=index form=form />
                            }).collect_view()}
                        </div>
                    </div>

                    // Actions
                    <div class="flex items-center justify-end gap-3 px-6 py-4 border-t border-slate-700">
                        <button
                            type="button"
                            class="px-4 py-2 text-sm font-medium text-slate-400 hover:text-white \
                                   rounded-lg transition-colors"
                            on:click=move |_| on_close_cancel()
                            disabled=move || submitting.get()
                        >
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class="px-4 py-2 text-sm font-medium bg-blue-500 hover:bg-blue-600 \
                                   text-white rounded-lg transition-colors disabled:opacity-50"
                            disabled=move || submitting.get()
                        >
                            {move || if submitting.get() { "Creating..." } else { "Create Instance" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

/// Labelled text input bound to one validated form field
#[component]
fn TextField(
    label: &'static str,
    field: Field,
    #[prop(default = "text")] input_type: &'static str,
    placeholder: &'static str,
    form: RwSignal<CreateInstanceForm>,
    errors: RwSignal<FieldErrors>,
) -> impl IntoView {
    let error = move || errors.with(|e| e.get(field).map(str::to_string));

    view! {
        <div class="space-y-1">
            <label class="block text-sm font-medium text-slate-300">{label}</label>
            <input
                type=input_type
                class=move || {
                    if error().is_some() {
                        format!("{} border-red-500", INPUT_BASE)
                    } else {
                        format!("{} border-slate-700", INPUT_BASE)
                    }
                }
                placeholder=placeholder
                prop:value=move || form.with(|f| f.value(field).to_string())
                on:input=move |e| {
                    form.update(|f| f.set(field, event_target_value(&e)));
                    errors.update(|e| e.clear(field));
                }
            />
            {move || error().map(|err| view! { <p class="text-xs text-red-400 mt-1">{err}</p> })}
        </div>
    }
}

/// Email/password pair for one additional user
#[component]
fn UserRow(index: usize, form: RwSignal<CreateInstanceForm>) -> impl IntoView {
    let value = move |field: CredentialField| {
        form.with(|f| {
            f.additional_users
                .get(index)
                .map(|user| match field {
                    CredentialField::Email => user.email.clone(),
                    CredentialField::Password => user.password.clone(),
                })
                .unwrap_or_default()
        })
    };

    view! {
        <div class="flex items-center gap-2">
            <input
                type="email"
                class=format!("{} border-slate-700", INPUT_BASE)
                placeholder="user@example.com"
                prop:value=move || value(CredentialField::Email)
                on:input=move |e| {
                    form.update(|f| f.update_user(index, CredentialField::Email, event_target_value(&e)));
                }
            />
            <input
                type="password"
                class=format!("{} border-slate-700", INPUT_BASE)
                placeholder="Password"
                prop:value=move || value(CredentialField::Password)
                on:input=move |e| {
                    form.update(|f| f.update_user(index, CredentialField::Password, event_target_value(&e)));
                }
            />
            <button
                type="button"
                class="p-2 text-slate-400 hover:text-red-400 transition-colors"
                title="Remove user"
                on:click=move |_| form.update(|f| f.remove_user(index))
            >
                <TrashIcon class="w-4 h-4" />
            </button>
        </div>
    }
}

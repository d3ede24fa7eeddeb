//! Global State Management
//!
//! This module manages the global application state including:
//! - Navigation (active tab, logs narrowing, create modal)
//! - Cached instance and log queries
//! - Mutations and the error toasts they raise

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use gloo_storage::{LocalStorage, Storage};
use leptos::*;
use grist_manager_shared::query::should_retry;
use grist_manager_shared::{
    ApiError, CreateInstanceRequest, DeploymentLog, Instance, InstanceAction, QueryCache,
    QueryKey, QueryState,
};
use uuid::Uuid;

use crate::client::GristApi;

const SIDEBAR_STORAGE_KEY: &str = "grist_manager_sidebar_collapsed";
const TOAST_DISMISS_MS: u32 = 6_000;

/// Top-level sections of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Instances,
    Logs,
    Analytics,
    Settings,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Dashboard,
            Tab::Instances,
            Tab::Logs,
            Tab::Analytics,
            Tab::Settings,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Instances => "Instances",
            Tab::Logs => "Logs",
            Tab::Analytics => "Analytics",
            Tab::Settings => "Settings",
        }
    }
}

/// A dismissible error banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
}

/// Global application state
#[derive(Clone)]
pub struct AppState {
    /// Section shown in the main area
    pub active_tab: RwSignal<Tab>,

    /// Instance the logs view is narrowed to
    pub selected_log_instance: RwSignal<Option<String>>,

    /// Whether the create-instance modal is open
    pub show_create_modal: RwSignal<bool>,

    pub sidebar_collapsed: RwSignal<bool>,

    /// Error banners, oldest first
    pub toasts: RwSignal<Vec<Toast>>,

    api: Rc<dyn GristApi>,

    cache: Rc<RefCell<QueryCache>>,

    /// Bumped whenever a cached query changes
    revision: RwSignal<u64>,
}

impl AppState {
    pub fn new(api: Rc<dyn GristApi>) -> Self {
        let revision = create_rw_signal(0_u64);
        let cache = Rc::new(RefCell::new(QueryCache::new()));

        // Listeners run while the cache is borrowed; defer the signal update
        // so effects reading the cache run after the borrow ends.
        cache.borrow_mut().subscribe(move |key| {
            tracing::trace!(%key, "Query changed");
            spawn_local(async move {
                revision.update(|r| *r += 1);
            });
        });

        let collapsed = LocalStorage::get::<bool>(SIDEBAR_STORAGE_KEY).unwrap_or(false);

        Self {
            active_tab: create_rw_signal(Tab::Dashboard),
            selected_log_instance: create_rw_signal(None),
            show_create_modal: create_rw_signal(false),
            sidebar_collapsed: create_rw_signal(collapsed),
            toasts: create_rw_signal(Vec::new()),
            api,
            cache,
            revision,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current instance list query (reactive)
    pub fn instances(&self) -> QueryState<Vec<Instance>> {
        let _ = self.revision.get();
        self.cache.borrow().instances().clone()
    }

    /// Logs query for the selected instance (reactive)
    pub fn logs(&self) -> QueryState<Vec<DeploymentLog>> {
        let _ = self.revision.get();
        let selected = self.selected_log_instance.get();
        self.cache
            .borrow()
            .logs(selected.as_deref())
            .cloned()
            .unwrap_or_default()
    }

    /// Start whatever fetches the current view needs
    ///
    /// The instance list is always kept fresh; logs only while the Logs tab
    /// is open. Reads the tab, the log selection and the cache revision, so
    /// calling it from an effect re-runs it whenever any of them changes.
    pub fn sync_queries(&self) {
        let _ = self.revision.get();
        let tab = self.active_tab.get();
        let selected = self.selected_log_instance.get();

        if self.cache.borrow().needs_fetch(&QueryKey::Instances) {
            self.fetch_instances();
        }

        if tab == Tab::Logs && self.cache.borrow().needs_fetch(&QueryKey::Logs(selected)) {
            self.fetch_logs();
        }
    }

    pub fn fetch_instances(&self) {
        let ticket = self.cache.borrow_mut().begin_fetch(&QueryKey::Instances);
        let api = self.api.clone();
        let cache = self.cache.clone();

        spawn_local(async move {
            let result = with_retry("instances", || {
                let api = api.clone();
                async move { api.list_instances().await }
            })
            .await;
            cache.borrow_mut().settle_instances(ticket, result);
        });
    }

    /// Fetch logs for the currently selected instance
    pub fn fetch_logs(&self) {
        let selected = self.selected_log_instance.get_untracked();
        let ticket = self
            .cache
            .borrow_mut()
            .begin_fetch(&QueryKey::Logs(selected.clone()));
        let api = self.api.clone();
        let cache = self.cache.clone();

        spawn_local(async move {
            let result = with_retry("logs", || {
                let api = api.clone();
                let selected = selected.clone();
                async move { api.get_logs(selected.as_deref()).await }
            })
            .await;
            cache
                .borrow_mut()
                .settle_logs(selected.as_deref(), ticket, result);
        });
    }

    fn invalidate(&self) {
        self.cache.borrow_mut().invalidate_all();
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create_instance(&self, request: CreateInstanceRequest) -> Result<Instance, ApiError> {
        let instance = self.api.create_instance(request).await?;
        tracing::info!(id = %instance.id, name = %instance.name, "Instance created");
        self.invalidate();
        Ok(instance)
    }

    pub async fn run_action(&self, id: &str, action: InstanceAction) -> Result<(), ApiError> {
        match action {
            InstanceAction::Start => self.api.start_instance(id).await?,
            InstanceAction::Stop => self.api.stop_instance(id).await?,
        }
        tracing::info!(id, action = action.label(), "Instance action completed");
        self.invalidate();
        Ok(())
    }

    pub async fn delete_instance(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_instance(id).await?;
        tracing::info!(id, "Instance deleted");
        self.invalidate();
        Ok(())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Switch to the Logs tab narrowed to one instance
    pub fn show_logs_for(&self, id: &str) {
        self.selected_log_instance.set(Some(id.to_string()));
        self.active_tab.set(Tab::Logs);
    }

    pub fn toggle_sidebar(&self) {
        let collapsed = !self.sidebar_collapsed.get_untracked();
        self.sidebar_collapsed.set(collapsed);
        if let Err(e) = LocalStorage::set(SIDEBAR_STORAGE_KEY, collapsed) {
            tracing::warn!("Failed to persist sidebar state: {}", e);
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Log a failed operation and show it as a toast
    pub fn report_error(&self, context: &str, error: &ApiError) {
        tracing::error!("{}: {}", context, error);

        let toast = Toast {
            id: Uuid::new_v4(),
            message: format!("{}: {}", context, error),
        };
        let id = toast.id;
        self.toasts.update(|toasts| toasts.push(toast));

        let toasts = self.toasts;
        gloo_timers::callback::Timeout::new(TOAST_DISMISS_MS, move || {
            toasts.update(|toasts| toasts.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn dismiss_toast(&self, id: Uuid) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }
}

/// Run `call`, re-issuing it once if it fails with a retryable error
async fn with_retry<T, F, Fut>(query: &str, mut call: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Err(e) if should_retry(&e, attempt) => {
                tracing::warn!(query, attempt, "Fetch failed, retrying: {}", e);
                attempt += 1;
            }
            result => return result,
        }
    }
}

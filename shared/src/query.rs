//! Cached query results with invalidation and change notification
//!
//! Each query key holds a [`QueryState`]. A fetch is started with
//! [`QueryState::begin_fetch`], which hands out a [`FetchTicket`]; only the
//! result carrying the newest ticket is applied, so a slow response can never
//! overwrite a newer one. Mutations call [`QueryCache::invalidate_all`] so the
//! next read goes back to the data source.

use std::collections::HashMap;
use std::fmt;

use crate::error::ApiError;
use crate::models::{DeploymentLog, Instance};

/// Number of times a failed fetch is retried
pub const RETRY_LIMIT: u32 = 1;

/// Whether a fetch that failed on attempt `attempt` (0-based) should be re-issued
pub fn should_retry(error: &ApiError, attempt: u32) -> bool {
    attempt < RETRY_LIMIT && error.is_retryable()
}

/// Identifies a cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Instances,
    /// Logs of one instance, or of all instances when `None`
    Logs(Option<String>),
}

impl QueryKey {
    pub fn logs(instance_id: Option<&str>) -> Self {
        QueryKey::Logs(instance_id.map(str::to_string))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Instances => f.write_str("instances"),
            QueryKey::Logs(None) => f.write_str("logs"),
            QueryKey::Logs(Some(id)) => write!(f, "logs/{}", id),
        }
    }
}

/// Proof that a fetch was started; passed back when it settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// State of one cached query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    data: Option<T>,
    error: Option<ApiError>,
    loading: bool,
    stale: bool,
    generation: u64,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
            stale: true,
            generation: 0,
        }
    }
}

impl<T> QueryState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Invalidated (or never fetched) since the last fetch began
    pub fn needs_fetch(&self) -> bool {
        self.stale
    }

    /// Start a fetch, superseding any fetch still in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.stale = false;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result; returns `false` if the ticket was superseded
    ///
    /// On error the previous data is kept so the view can keep showing it.
    pub fn settle(&mut self, ticket: FetchTicket, result: Result<T, ApiError>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(error) => self.error = Some(error),
        }
        true
    }

    /// Mark the cached data out of date
    pub fn invalidate(&mut self) {
        self.stale = true;
    }
}

/// Handle returned by [`QueryCache::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&QueryKey)>;

/// All cached queries of the dashboard plus their change listeners
#[derive(Default)]
pub struct QueryCache {
    instances: QueryState<Vec<Instance>>,
    logs: HashMap<Option<String>, QueryState<Vec<DeploymentLog>>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &QueryState<Vec<Instance>> {
        &self.instances
    }

    /// Logs query for `instance_id`, if it was ever requested
    pub fn logs(&self, instance_id: Option<&str>) -> Option<&QueryState<Vec<DeploymentLog>>> {
        self.logs.get(&instance_id.map(str::to_string))
    }

    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        match key {
            QueryKey::Instances => self.instances.needs_fetch(),
            QueryKey::Logs(id) => self.logs.get(id).map_or(true, QueryState::needs_fetch),
        }
    }

    pub fn begin_fetch(&mut self, key: &QueryKey) -> FetchTicket {
        let ticket = match key {
            QueryKey::Instances => self.instances.begin_fetch(),
            QueryKey::Logs(id) => self.logs.entry(id.clone()).or_default().begin_fetch(),
        };
        self.notify(key);
        ticket
    }

    pub fn settle_instances(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Instance>, ApiError>,
    ) -> bool {
        let applied = self.instances.settle(ticket, result);
        if applied {
            self.notify(&QueryKey::Instances);
        }
        applied
    }

    pub fn settle_logs(
        &mut self,
        instance_id: Option<&str>,
        ticket: FetchTicket,
        result: Result<Vec<DeploymentLog>, ApiError>,
    ) -> bool {
        let key = QueryKey::logs(instance_id);
        let applied = match &key {
            QueryKey::Logs(id) => self.logs.entry(id.clone()).or_default().settle(ticket, result),
            QueryKey::Instances => false,
        };
        if applied {
            self.notify(&key);
        }
        applied
    }

    pub fn invalidate(&mut self, key: &QueryKey) {
        match key {
            QueryKey::Instances => self.instances.invalidate(),
            QueryKey::Logs(id) => {
                if let Some(state) = self.logs.get_mut(id) {
                    state.invalidate();
                }
            }
        }
        self.notify(key);
    }

    /// Invalidate the instance list and every logs query
    pub fn invalidate_all(&mut self) {
        self.instances.invalidate();
        let mut keys = vec![QueryKey::Instances];
        for (id, state) in self.logs.iter_mut() {
            state.invalidate();
            keys.push(QueryKey::Logs(id.clone()));
        }
        for key in &keys {
            self.notify(key);
        }
    }

    /// Register a listener called with the key of every changed query
    pub fn subscribe(&mut self, listener: impl Fn(&QueryKey) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sub, _)| *sub != id);
    }

    fn notify(&self, key: &QueryKey) {
        for (_, listener) in &self.listeners {
            listener(key);
        }
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("instances", &self.instances)
            .field("logs", &self.logs)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_new_state_needs_fetch() {
        let state: QueryState<u32> = QueryState::new();
        assert!(state.needs_fetch());
        assert!(state.data().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut state = QueryState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(state.settle(second, Ok(2)));
        assert!(!state.settle(first, Ok(1)));
        assert_eq!(state.data(), Some(&2));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_error_keeps_previous_data() {
        let mut state = QueryState::new();
        let ticket = state.begin_fetch();
        state.settle(ticket, Ok(vec![1, 2]));

        let ticket = state.begin_fetch();
        state.settle(ticket, Err(ApiError::Transport("offline".into())));
        assert_eq!(state.data(), Some(&vec![1, 2]));
        assert!(state.error().is_some());

        let ticket = state.begin_fetch();
        state.settle(ticket, Ok(vec![3]));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_invalidate_during_fetch_requires_refetch() {
        let mut state = QueryState::new();
        let ticket = state.begin_fetch();
        assert!(!state.needs_fetch());

        state.invalidate();
        assert!(state.needs_fetch());
        state.settle(ticket, Ok(1));
        assert!(state.needs_fetch());
    }

    #[test]
    fn test_retry_once_for_retryable_errors() {
        let transport = ApiError::Transport("reset".into());
        assert!(should_retry(&transport, 0));
        assert!(!should_retry(&transport, 1));
        assert!(!should_retry(&ApiError::not_found("1"), 0));
    }

    #[test]
    fn test_cache_notifies_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut cache = QueryCache::new();
        let sink = seen.clone();
        let sub = cache.subscribe(move |key| sink.borrow_mut().push(key.to_string()));

        let ticket = cache.begin_fetch(&QueryKey::Instances);
        cache.settle_instances(ticket, Ok(Vec::new()));
        let logs_key = QueryKey::logs(Some("2"));
        let ticket = cache.begin_fetch(&logs_key);
        cache.settle_logs(Some("2"), ticket, Ok(Vec::new()));

        cache.unsubscribe(sub);
        cache.invalidate_all();

        assert_eq!(
            *seen.borrow(),
            vec!["instances", "instances", "logs/2", "logs/2"]
        );
    }

    #[test]
    fn test_invalidate_all_marks_everything_stale() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch(&QueryKey::Instances);
        cache.settle_instances(ticket, Ok(Vec::new()));
        let ticket = cache.begin_fetch(&QueryKey::Logs(None));
        cache.settle_logs(None, ticket, Ok(Vec::new()));

        assert!(!cache.needs_fetch(&QueryKey::Instances));
        assert!(!cache.needs_fetch(&QueryKey::Logs(None)));
        assert!(cache.needs_fetch(&QueryKey::logs(Some("9"))));

        cache.invalidate_all();
        assert!(cache.needs_fetch(&QueryKey::Instances));
        assert!(cache.needs_fetch(&QueryKey::Logs(None)));
        assert_eq!(cache.instances().data(), Some(&Vec::new()));
    }
}

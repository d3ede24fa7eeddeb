//! Mock Client
//!
//! Serves the dashboard from an in-memory [`InstanceStore`] and sleeps before
//! every call so loading states are visible during development.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use grist_manager_shared::{ApiError, CreateInstanceRequest, DeploymentLog, Instance, InstanceStore};

use super::GristApi;

/// Artificial delay per operation, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub list: u32,
    pub get: u32,
    pub create: u32,
    pub start: u32,
    pub stop: u32,
    pub delete: u32,
    pub logs: u32,
}

impl Latency {
    /// Delays that make each operation feel like a real deployment call
    pub const DEMO: Latency = Latency {
        list: 500,
        get: 300,
        create: 1000,
        start: 2000,
        stop: 1500,
        delete: 1000,
        logs: 300,
    };

    pub const NONE: Latency = Latency {
        list: 0,
        get: 0,
        create: 0,
        start: 0,
        stop: 0,
        delete: 0,
        logs: 0,
    };
}

/// In-browser implementation of [`GristApi`]
#[derive(Clone)]
pub struct MockClient {
    store: Rc<RefCell<InstanceStore>>,
    latency: Latency,
}

impl MockClient {
    pub fn new(store: InstanceStore, latency: Latency) -> Self {
        Self::with_shared_store(Rc::new(RefCell::new(store)), latency)
    }

    /// Use a store owned elsewhere, e.g. by a test
    pub fn with_shared_store(store: Rc<RefCell<InstanceStore>>, latency: Latency) -> Self {
        Self { store, latency }
    }
}

async fn delay(millis: u32) {
    if millis > 0 {
        TimeoutFuture::new(millis).await;
    }
}

#[async_trait::async_trait(?Send)]
impl GristApi for MockClient {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiError> {
        delay(self.latency.list).await;
        Ok(self.store.borrow().list())
    }

    async fn get_instance(&self, id: &str) -> Result<Instance, ApiError> {
        delay(self.latency.get).await;
        self.store.borrow().get(id)
    }

    async fn create_instance(&self, request: CreateInstanceRequest) -> Result<Instance, ApiError> {
        delay(self.latency.create).await;
        let instance = self.store.borrow_mut().create(request);
        tracing::debug!(id = %instance.id, "Created mock instance");
        Ok(instance)
    }

    async fn start_instance(&self, id: &str) -> Result<(), ApiError> {
        delay(self.latency.start).await;
        if self.store.borrow_mut().start(id).is_none() {
            tracing::debug!(id, "Start ignored for unknown instance");
        }
        Ok(())
    }

    async fn stop_instance(&self, id: &str) -> Result<(), ApiError> {
        delay(self.latency.stop).await;
        if self.store.borrow_mut().stop(id).is_none() {
            tracing::debug!(id, "Stop ignored for unknown instance");
        }
        Ok(())
    }

    async fn delete_instance(&self, id: &str) -> Result<(), ApiError> {
        delay(self.latency.delete).await;
        self.store.borrow_mut().delete(id);
        Ok(())
    }

    async fn get_logs(&self, instance_id: Option<&str>) -> Result<Vec<DeploymentLog>, ApiError> {
        delay(self.latency.logs).await;
        Ok(self.store.borrow().logs(instance_id))
    }
}

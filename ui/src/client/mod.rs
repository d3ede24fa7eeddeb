//! Instance API Client Layer
//!
//! All data the dashboard shows goes through the [`GristApi`] trait. Two
//! implementations exist:
//!
//! - **MockClient**: an in-browser [`InstanceStore`] with simulated latency
//! - **HttpClient**: JSON over HTTP against `grist-manager serve`
//!
//! Both return [`ApiError`] so the UI handles failures identically in either
//! mode.

mod http;
mod mock;

pub use http::HttpClient;
pub use mock::{Latency, MockClient};

use std::rc::Rc;

use async_trait::async_trait;
use grist_manager_shared::{ApiError, CreateInstanceRequest, DeploymentLog, Instance, InstanceStore};

use crate::config::{Backend, UiConfig};

/// Data-access operations used by the dashboard
#[async_trait(?Send)]
pub trait GristApi {
    /// List every instance
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiError>;

    /// Fetch one instance; `ApiError::NotFound` for an unknown id
    async fn get_instance(&self, id: &str) -> Result<Instance, ApiError>;

    /// Create a pending instance from an already validated request
    async fn create_instance(&self, request: CreateInstanceRequest) -> Result<Instance, ApiError>;

    async fn start_instance(&self, id: &str) -> Result<(), ApiError>;

    async fn stop_instance(&self, id: &str) -> Result<(), ApiError>;

    async fn delete_instance(&self, id: &str) -> Result<(), ApiError>;

    /// Logs of one instance, or of all instances when `instance_id` is `None`
    async fn get_logs(&self, instance_id: Option<&str>) -> Result<Vec<DeploymentLog>, ApiError>;
}

/// Build the client selected by the configuration
pub fn client_from_config(config: &UiConfig) -> Rc<dyn GristApi> {
    match config.backend {
        Backend::Mock => {
            let latency = if config.mock_latency {
                Latency::DEMO
            } else {
                Latency::NONE
            };
            tracing::info!(?latency, "Using in-browser mock backend");
            Rc::new(MockClient::new(InstanceStore::seeded(), latency))
        }
        Backend::Http => {
            tracing::info!(base = %config.api_base, "Using HTTP backend");
            Rc::new(HttpClient::new(&config.api_base, config.request_timeout_ms))
        }
    }
}

//! Deployment log API endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use grist_manager_shared::DeploymentLog;
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;

/// Query parameters for the log listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    /// Narrow to one instance
    pub instance_id: Option<String>,
}

/// List deployment logs, newest first
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Json<Vec<DeploymentLog>> {
    state.simulate_latency().await;
    let logs = state.store.read().await.logs(query.instance_id.as_deref());
    Json(logs)
}

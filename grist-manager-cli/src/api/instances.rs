//! Instance management API endpoints
//!
//! Provides endpoints for:
//! - Listing and fetching instances
//! - Creating an instance from a validated payload
//! - Starting, stopping and deleting instances

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use grist_manager_shared::validation::validate_request;
use grist_manager_shared::{ApiError, CreateInstanceRequest, Instance};
use std::sync::Arc;
use tracing::{debug, info};

use super::HandlerError;
use crate::AppState;

/// List all instances
pub async fn list_instances(State(state): State<Arc<AppState>>) -> Json<Vec<Instance>> {
    state.simulate_latency().await;
    Json(state.store.read().await.list())
}

/// Get a specific instance
pub async fn get_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Instance>, HandlerError> {
    state.simulate_latency().await;
    let instance = state.store.read().await.get(&id)?;
    Ok(Json(instance))
}

/// Create a new instance in the Pending state
pub async fn create_instance(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateInstanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Instance>), HandlerError> {
    state.simulate_latency().await;

    let Json(request) = payload.map_err(|rejection| {
        debug!("Malformed instance payload: {}", rejection.body_text());
        HandlerError::from(rejection)
    })?;

    if let Err(fields) = validate_request(&request) {
        debug!("Rejected instance payload: {}", fields);
        return Err(ApiError::Validation(fields).into());
    }

    let instance = state.store.write().await.create(request);
    info!(id = %instance.id, name = %instance.name, "Created instance");
    Ok((StatusCode::CREATED, Json(instance)))
}

/// Mark an instance as running
pub async fn start_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Instance>, HandlerError> {
    state.simulate_latency().await;
    let instance = state
        .store
        .write()
        .await
        .start(&id)
        .ok_or_else(|| ApiError::not_found(&id))?;
    info!(id = %instance.id, "Started instance");
    Ok(Json(instance))
}

/// Mark an instance as stopped
pub async fn stop_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Instance>, HandlerError> {
    state.simulate_latency().await;
    let instance = state
        .store
        .write()
        .await
        .stop(&id)
        .ok_or_else(|| ApiError::not_found(&id))?;
    info!(id = %instance.id, "Stopped instance");
    Ok(Json(instance))
}

/// Delete an instance; deleting an unknown id is not an error
pub async fn delete_instance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    state.simulate_latency().await;
    if state.store.write().await.delete(&id) {
        info!(id = %id, "Deleted instance");
    } else {
        debug!(id = %id, "Delete ignored for unknown instance");
    }
    StatusCode::NO_CONTENT
}

//! API endpoints for the Grist Manager control plane
//!
//! Provides the REST API the dashboard's HTTP client talks to:
//! - Instances (list, get, create, start, stop, delete)
//! - Deployment logs (all, or narrowed to one instance)

pub mod instances;
pub mod logs;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use grist_manager_shared::{ApiError, ErrorBody};
use std::sync::Arc;

use crate::AppState;

/// Create the API router with all instance endpoints
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Instance endpoints
        .route("/instances", get(instances::list_instances).post(instances::create_instance))
        .route("/instances/:id", get(instances::get_instance).delete(instances::delete_instance))
        .route("/instances/:id/start", post(instances::start_instance))
        .route("/instances/:id/stop", post(instances::stop_instance))

        // Log endpoints
        .route("/logs", get(logs::list_logs))
}

/// Handler error, rendered as an [`ErrorBody`] with a matching status
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct HandlerError(#[from] ApiError);

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Server { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Transport(_) | ApiError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ApiError::Server {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        })
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grist_manager_shared::FieldErrors;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            HandlerError::from(ApiError::not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HandlerError::from(ApiError::Validation(FieldErrors::default())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            HandlerError::from(ApiError::Server {
                status: 503,
                message: "busy".to_string()
            })
            .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HandlerError::from(ApiError::Decode("bad".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

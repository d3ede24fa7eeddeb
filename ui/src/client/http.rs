//! HTTP Client
//!
//! Talks JSON to the control plane's `/api` routes. Each request races a
//! timer; when the timer wins the fetch is aborted through an
//! `AbortController` and the call fails with `ApiError::Timeout`.

use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use grist_manager_shared::{
    ApiError, CreateInstanceRequest, DeploymentLog, ErrorBody, Instance,
};
use serde::de::DeserializeOwned;
use web_sys::AbortController;

use super::GristApi;

/// Client for the control plane's instance API
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// API base URL, without trailing slash
    base_url: String,
    timeout_ms: u32,
}

impl HttpClient {
    /// Create a client for `api_base`; a path such as `/api` is resolved
    /// against the page origin.
    pub fn new(api_base: &str, timeout_ms: u32) -> Self {
        let api_base = api_base.trim_end_matches('/');
        let base_url = if api_base.starts_with('/') {
            format!("{}{}", get_origin(), api_base)
        } else {
            api_base.to_string()
        };
        Self {
            base_url,
            timeout_ms,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn instance_url(&self, id: &str, action: Option<&str>) -> String {
        match action {
            Some(action) => self.url(&format!("/instances/{}/{}", id, action)),
            None => self.url(&format!("/instances/{}", id)),
        }
    }

    /// Send a request, enforcing the timeout and mapping error statuses
    async fn execute(
        &self,
        builder: RequestBuilder,
        body: Option<String>,
        id: Option<&str>,
    ) -> Result<Response, ApiError> {
        let controller = AbortController::new()
            .map_err(|_| ApiError::Transport("AbortController unavailable".to_string()))?;
        let signal = controller.signal();
        let builder = builder.abort_signal(Some(&signal));

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(json),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let send = Box::pin(request.send());
        let timer = Box::pin(TimeoutFuture::new(self.timeout_ms));

        let response = match select(send, timer).await {
            Either::Left((result, _)) => result.map_err(|e| ApiError::Transport(e.to_string()))?,
            Either::Right(_) => {
                controller.abort();
                tracing::warn!(url = %request.url(), "Request timed out");
                return Err(ApiError::Timeout {
                    millis: self.timeout_ms,
                });
            }
        };

        if response.ok() {
            Ok(response)
        } else {
            Err(error_from_response(response, id).await)
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: Option<String>,
        id: Option<&str>,
    ) -> Result<T, ApiError> {
        let response = self.execute(builder, body, id).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

async fn error_from_response(response: Response, id: Option<&str>) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    map_error(status, &text, id)
}

/// Map a failed response's status and body to an [`ApiError`]
fn map_error(status: u16, text: &str, id: Option<&str>) -> ApiError {
    let body: Option<ErrorBody> = serde_json::from_str(text).ok();

    match status {
        404 => ApiError::not_found(id.unwrap_or_default()),
        400 | 422 => match body {
            Some(ErrorBody {
                fields: Some(fields),
                ..
            }) => ApiError::Validation(fields),
            Some(ErrorBody { error, .. }) => ApiError::Server {
                status,
                message: error,
            },
            None => ApiError::Server {
                status,
                message: text.to_string(),
            },
        },
        _ => ApiError::Server {
            status,
            message: body.map(|b| b.error).unwrap_or_else(|| text.to_string()),
        },
    }
}

fn get_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string())
}

#[async_trait::async_trait(?Send)]
impl GristApi for HttpClient {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiError> {
        self.fetch_json(Request::get(&self.url("/instances")), None, None)
            .await
    }

    async fn get_instance(&self, id: &str) -> Result<Instance, ApiError> {
        self.fetch_json(Request::get(&self.instance_url(id, None)), None, Some(id))
            .await
    }

    async fn create_instance(&self, request: CreateInstanceRequest) -> Result<Instance, ApiError> {
        let body =
            serde_json::to_string(&request).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.fetch_json(Request::post(&self.url("/instances")), Some(body), None)
            .await
    }

    async fn start_instance(&self, id: &str) -> Result<(), ApiError> {
        self.execute(Request::post(&self.instance_url(id, Some("start"))), None, Some(id))
            .await?;
        Ok(())
    }

    async fn stop_instance(&self, id: &str) -> Result<(), ApiError> {
        self.execute(Request::post(&self.instance_url(id, Some("stop"))), None, Some(id))
            .await?;
        Ok(())
    }

    async fn delete_instance(&self, id: &str) -> Result<(), ApiError> {
        self.execute(Request::delete(&self.instance_url(id, None)), None, Some(id))
            .await?;
        Ok(())
    }

    async fn get_logs(&self, instance_id: Option<&str>) -> Result<Vec<DeploymentLog>, ApiError> {
        let mut builder = Request::get(&self.url("/logs"));
        if let Some(id) = instance_id {
            builder = builder.query([("instanceId", id)]);
        }
        self.fetch_json(builder, None, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_requested_id() {
        let error = map_error(404, r#"{"error":"Instance not found: 9"}"#, Some("9"));
        assert_eq!(error, ApiError::not_found("9"));
    }

    #[test]
    fn test_unprocessable_with_fields_is_validation() {
        let text = r#"{"error":"Validation failed","fields":{"team":"Team is required"}}"#;
        match map_error(422, text, None) {
            ApiError::Validation(fields) => {
                assert_eq!(fields.team.as_deref(), Some("Team is required"));
                assert!(fields.name.is_none());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unprocessable_without_fields_keeps_message() {
        let error = map_error(422, r#"{"error":"missing field `url`"}"#, None);
        assert_eq!(
            error,
            ApiError::Server {
                status: 422,
                message: "missing field `url`".to_string()
            }
        );

        let error = map_error(400, "not json", None);
        assert_eq!(
            error,
            ApiError::Server {
                status: 400,
                message: "not json".to_string()
            }
        );
    }

    #[test]
    fn test_unavailable_is_retryable_server_error() {
        let error = map_error(503, r#"{"error":"busy"}"#, Some("1"));
        assert_eq!(
            error,
            ApiError::Server {
                status: 503,
                message: "busy".to_string()
            }
        );
        assert!(error.is_retryable());

        let error = map_error(502, "Bad Gateway", None);
        assert_eq!(
            error,
            ApiError::Server {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }
}

//! Error types shared by every data-access implementation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::FieldErrors;

/// Errors returned by the instance API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Instance not found: {id}")]
    NotFound { id: String },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {millis} ms")]
    Timeout { millis: u32 },

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::Server { status, .. } => *status >= 500,
            Self::NotFound { .. } | Self::Validation(_) | Self::Decode(_) => false,
        }
    }
}

/// JSON body of a failed API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    /// Per-field messages, present when validation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

impl From<&ApiError> for ErrorBody {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Validation(fields) => Self {
                error: "Validation failed".to_string(),
                fields: Some(fields.clone()),
            },
            ApiError::Server { message, .. } => Self::new(message.clone()),
            other => Self::new(other.to_string()),
        }
    }
}

/// A string did not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Transport("reset".into()).is_retryable());
        assert!(ApiError::Timeout { millis: 10_000 }.is_retryable());
        assert!(ApiError::Server { status: 503, message: String::new() }.is_retryable());
        assert!(!ApiError::Server { status: 409, message: String::new() }.is_retryable());
        assert!(!ApiError::not_found("42").is_retryable());
    }

    #[test]
    fn test_error_body_carries_fields() {
        let fields = FieldErrors {
            team: Some("Team is required".to_string()),
            ..Default::default()
        };
        let body = ErrorBody::from(&ApiError::Validation(fields));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["fields"]["team"], "Team is required");
        assert!(json["fields"].get("name").is_none());

        let body = ErrorBody::from(&ApiError::not_found("7"));
        assert!(!serde_json::to_string(&body).unwrap().contains("fields"));
    }

    #[test]
    fn test_error_body_for_server_error_is_bare_message() {
        let error = ApiError::Server {
            status: 422,
            message: "missing field `url`".to_string(),
        };
        assert_eq!(ErrorBody::from(&error), ErrorBody::new("missing field `url`"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiError::not_found("42").to_string(), "Instance not found: 42");
    }
}

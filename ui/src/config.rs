//! Build-time UI configuration
//!
//! `config.toml` next to `Cargo.toml` is embedded into the binary and parsed
//! once at startup. A missing key takes its default; `main` falls back to
//! defaults entirely when the file does not parse.

use serde::Deserialize;

const EMBEDDED_CONFIG: &str = include_str!("../config.toml");

/// Which data-access implementation backs the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-browser store with simulated latency
    #[default]
    Mock,
    /// JSON over HTTP against the control plane
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub backend: Backend,
    pub api_base: String,
    pub request_timeout_ms: u32,
    pub mock_latency: bool,
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Mock,
            api_base: "/api".to_string(),
            request_timeout_ms: 10_000,
            mock_latency: true,
            log_level: "debug".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid UI configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl UiConfig {
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// The configuration compiled into this build
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(EMBEDDED_CONFIG)
    }

    pub fn max_level(&self) -> tracing::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = UiConfig::embedded().unwrap();
        assert_eq!(config.api_base, "/api");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = UiConfig::parse("backend = \"http\"\nlog_level = \"WARN\"").unwrap();
        assert_eq!(config.backend, Backend::Http);
        assert!(config.mock_latency);
        assert_eq!(config.max_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(UiConfig::parse("backend = \"grpc\"").is_err());
    }
}

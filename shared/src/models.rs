//! Instance and log types exchanged between the UI and the control plane
//!
//! Field names follow the JSON shape served under `/api` (camelCase keys,
//! lowercase enum values).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// A managed Grist deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Opaque identifier assigned by the backend
    pub id: String,

    /// Display name
    pub name: String,

    /// Owning team slug
    pub team: String,

    /// Public URL the instance is reachable at
    pub url: String,

    /// Admin email
    pub email: String,

    /// Lifecycle status as last reported by the backend
    pub status: InstanceStatus,

    pub created_at: DateTime<Utc>,

    pub last_updated: DateTime<Utc>,

    pub config: InstanceConfig,

    /// Runtime metrics, absent until the backend reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<InstanceMetrics>,
}

impl Instance {
    pub fn is_running(&self) -> bool {
        self.status == InstanceStatus::Running
    }
}

/// Instance lifecycle status
///
/// Transitions are driven by the backend; the client renders whatever value
/// it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Pending,
    Running,
    Stopped,
    Error,
}

impl InstanceStatus {
    pub fn all() -> &'static [InstanceStatus] {
        &[
            InstanceStatus::Pending,
            InstanceStatus::Running,
            InstanceStatus::Stopped,
            InstanceStatus::Error,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Pending => "pending",
            InstanceStatus::Running => "running",
            InstanceStatus::Stopped => "stopped",
            InstanceStatus::Error => "error",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InstanceStatus::Pending => "Pending",
            InstanceStatus::Running => "Running",
            InstanceStatus::Stopped => "Stopped",
            InstanceStatus::Error => "Error",
        }
    }

    /// The lifecycle action offered for this status: stop a running
    /// instance, start anything else.
    pub fn primary_action(&self) -> InstanceAction {
        match self {
            InstanceStatus::Running => InstanceAction::Stop,
            InstanceStatus::Pending | InstanceStatus::Stopped | InstanceStatus::Error => {
                InstanceAction::Start
            }
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstanceStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("instance status", s))
    }
}

/// Lifecycle actions a user can request on an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAction {
    Start,
    Stop,
}

impl InstanceAction {
    pub fn label(&self) -> &'static str {
        match self {
            InstanceAction::Start => "Start",
            InstanceAction::Stop => "Stop",
        }
    }

    /// Status the backend moves the instance to
    pub fn target_status(&self) -> InstanceStatus {
        match self {
            InstanceAction::Start => InstanceStatus::Running,
            InstanceAction::Stop => InstanceStatus::Stopped,
        }
    }
}

/// How HTTPS is provided for an instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpsMode {
    /// Certificates obtained automatically (Let's Encrypt)
    #[default]
    Auto,
    /// TLS terminated by an external reverse proxy
    External,
    /// Custom certificate supplied by the operator
    Manual,
}

impl HttpsMode {
    pub fn all() -> &'static [HttpsMode] {
        &[HttpsMode::Auto, HttpsMode::External, HttpsMode::Manual]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpsMode::Auto => "auto",
            HttpsMode::External => "external",
            HttpsMode::Manual => "manual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HttpsMode::Auto => "Auto (Let's Encrypt)",
            HttpsMode::External => "External (Reverse Proxy)",
            HttpsMode::Manual => "Manual (Custom Certificate)",
        }
    }

    /// Whether the trusted proxy list applies to this mode
    pub fn uses_trusted_proxies(&self) -> bool {
        matches!(self, HttpsMode::External)
    }
}

impl fmt::Display for HttpsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpsMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpsMode::all()
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("https mode", s))
    }
}

/// Deployment configuration of an instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfig {
    pub https: HttpsMode,

    /// Comma-separated CIDR ranges trusted as reverse proxies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_proxy_ips: Option<String>,

    /// UI elements hidden from Grist users (e.g. "billing")
    #[serde(
        default,
        rename = "hideUIElements",
        skip_serializing_if = "Option::is_none"
    )]
    pub hide_ui_elements: Option<Vec<String>>,

    /// Whether a custom Dex identity configuration is mounted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_dex_config: Option<bool>,

    /// Extra environment passed to the Grist process
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl InstanceConfig {
    /// Trusted proxy ranges split into individual entries
    pub fn trusted_proxies(&self) -> Vec<&str> {
        self.trusted_proxy_ips
            .as_deref()
            .map(|ips| {
                ips.split(',')
                    .map(str::trim)
                    .filter(|ip| !ip.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Point-in-time runtime metrics reported for an instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceMetrics {
    /// Seconds since the process started
    pub uptime: u64,

    /// Resident memory in megabytes
    pub memory_usage: u64,

    /// CPU usage in percent
    pub cpu_usage: f64,

    pub active_users: u32,

    pub documents_count: u32,
}

/// A log line emitted while deploying or running an instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentLog {
    pub id: String,

    pub instance_id: String,

    pub timestamp: DateTime<Utc>,

    pub level: LogLevel,

    pub message: String,

    pub source: LogSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn all() -> &'static [LogLevel] {
        &[LogLevel::Info, LogLevel::Warn, LogLevel::Error]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "Info",
            LogLevel::Warn => "Warning",
            LogLevel::Error => "Error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::all()
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("log level", s))
    }
}

/// Process that produced a log line: Grist itself or one of its sidecars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Grist,
    Traefik,
    Dex,
    Tfa,
}

impl LogSource {
    pub fn all() -> &'static [LogSource] {
        &[LogSource::Grist, LogSource::Traefik, LogSource::Dex, LogSource::Tfa]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::Grist => "grist",
            LogSource::Traefik => "traefik",
            LogSource::Dex => "dex",
            LogSource::Tfa => "tfa",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogSource::Grist => "Grist",
            LogSource::Traefik => "Traefik",
            LogSource::Dex => "Dex",
            LogSource::Tfa => "TFA",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogSource::all()
            .iter()
            .copied()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("log source", s))
    }
}

/// Payload for creating a new instance
///
/// The backend answers with a full [`Instance`] in `pending` state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceRequest {
    pub name: String,

    pub team: String,

    pub url: String,

    pub email: String,

    pub password: String,

    #[serde(default)]
    pub https: HttpsMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_proxy_ips: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_users: Vec<UserCredential>,
}

/// Extra Grist login created alongside the admin account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    pub email: String,
    pub password: String,
}

impl UserCredential {
    /// Both fields filled in
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_action_follows_status() {
        for status in InstanceStatus::all() {
            let action = status.primary_action();
            if *status == InstanceStatus::Running {
                assert_eq!(action, InstanceAction::Stop);
            } else {
                assert_eq!(action, InstanceAction::Start);
            }
        }
    }

    #[test]
    fn test_instance_json_shape() {
        let json = serde_json::json!({
            "id": "1",
            "name": "Production Grist",
            "team": "acme-corp",
            "url": "https://grist.acme-corp.com",
            "email": "admin@acme-corp.com",
            "status": "running",
            "createdAt": "2024-01-15T10:30:00Z",
            "lastUpdated": "2024-01-20T14:22:00Z",
            "config": {
                "https": "auto",
                "trustedProxyIps": "192.168.1.0/24",
                "hideUIElements": ["billing", "templates"],
                "environment": { "GRIST_SANDBOX_FLAVOR": "gvisor" }
            },
            "metrics": {
                "uptime": 432000,
                "memoryUsage": 512,
                "cpuUsage": 15,
                "activeUsers": 12,
                "documentsCount": 45
            }
        });

        let instance: Instance = serde_json::from_value(json).unwrap();
        assert_eq!(instance.status, InstanceStatus::Running);
        assert_eq!(instance.config.hide_ui_elements.as_ref().unwrap().len(), 2);
        assert_eq!(instance.metrics.unwrap().active_users, 12);

        let back = serde_json::to_value(&instance).unwrap();
        assert!(back.get("lastUpdated").is_some());
        assert!(back["config"].get("hideUIElements").is_some());
    }

    #[test]
    fn test_missing_metrics_is_none() {
        let json = r#"{
            "id": "3", "name": "Staging", "team": "staging",
            "url": "https://staging.example.com", "email": "s@example.com",
            "status": "stopped",
            "createdAt": "2024-01-10T14:20:00Z", "lastUpdated": "2024-01-19T11:30:00Z",
            "config": { "https": "auto", "environment": {} }
        }"#;
        let instance: Instance = serde_json::from_str(json).unwrap();
        assert!(instance.metrics.is_none());
        assert!(!serde_json::to_string(&instance).unwrap().contains("metrics"));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("tfa".parse::<LogSource>().unwrap(), LogSource::Tfa);
        assert_eq!("external".parse::<HttpsMode>().unwrap(), HttpsMode::External);
        assert!("paused".parse::<InstanceStatus>().is_err());
    }

    #[test]
    fn test_trusted_proxies_split() {
        let config = InstanceConfig {
            trusted_proxy_ips: Some("192.168.1.0/24, 127.0.0.1/32,".to_string()),
            ..Default::default()
        };
        assert_eq!(config.trusted_proxies(), vec!["192.168.1.0/24", "127.0.0.1/32"]);
    }
}

//! Canonical in-memory collection of instances and their logs
//!
//! The store is synchronous and owned by whoever serves the data: the mock
//! client in the browser and the control plane on the server both wrap one.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ApiError;
use crate::models::{
    CreateInstanceRequest, DeploymentLog, HttpsMode, Instance, InstanceConfig, InstanceMetrics,
    InstanceStatus, LogLevel, LogSource,
};

type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// Instances and deployment logs held in memory
pub struct InstanceStore {
    instances: Vec<Instance>,
    logs: Vec<DeploymentLog>,
    next_id: IdGenerator,
}

impl Default for InstanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstanceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceStore")
            .field("instances", &self.instances.len())
            .field("logs", &self.logs.len())
            .finish()
    }
}

impl InstanceStore {
    /// An empty store assigning UUID v4 ids
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            logs: Vec::new(),
            next_id: Box::new(|| uuid::Uuid::new_v4().to_string()),
        }
    }

    /// A store holding the demo instances and logs
    pub fn seeded() -> Self {
        Self::new().with_data(demo_instances(), demo_logs())
    }

    pub fn with_data(mut self, instances: Vec<Instance>, logs: Vec<DeploymentLog>) -> Self {
        self.instances = instances;
        self.logs = logs;
        self
    }

    /// Replace the id generator used by [`InstanceStore::create`]
    pub fn with_id_generator(mut self, next_id: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.next_id = Box::new(next_id);
        self
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn list(&self) -> Vec<Instance> {
        self.instances.clone()
    }

    pub fn get(&self, id: &str) -> Result<Instance, ApiError> {
        self.instances
            .iter()
            .find(|instance| instance.id == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(id))
    }

    /// Store a new pending instance built from `request`
    ///
    /// No validation happens here; callers validate first.
    pub fn create(&mut self, request: CreateInstanceRequest) -> Instance {
        let now = Utc::now();
        let instance = Instance {
            id: (self.next_id)(),
            name: request.name,
            team: request.team,
            url: request.url,
            email: request.email,
            status: InstanceStatus::Pending,
            created_at: now,
            last_updated: now,
            config: InstanceConfig {
                https: request.https,
                trusted_proxy_ips: request.trusted_proxy_ips,
                environment: BTreeMap::new(),
                ..Default::default()
            },
            metrics: None,
        };

        self.instances.push(instance.clone());
        instance
    }

    /// Mark an instance running; `None` if the id is unknown
    pub fn start(&mut self, id: &str) -> Option<Instance> {
        self.set_status(id, InstanceStatus::Running)
    }

    /// Mark an instance stopped; `None` if the id is unknown
    pub fn stop(&mut self, id: &str) -> Option<Instance> {
        self.set_status(id, InstanceStatus::Stopped)
    }

    fn set_status(&mut self, id: &str, status: InstanceStatus) -> Option<Instance> {
        let instance = self.instances.iter_mut().find(|instance| instance.id == id)?;
        instance.status = status;
        instance.last_updated = Utc::now();
        Some(instance.clone())
    }

    /// Remove an instance; returns whether it existed
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.instances.len();
        self.instances.retain(|instance| instance.id != id);
        self.instances.len() != before
    }

    /// Logs of one instance (or all), newest first
    pub fn logs(&self, instance_id: Option<&str>) -> Vec<DeploymentLog> {
        let mut logs: Vec<_> = self
            .logs
            .iter()
            .filter(|log| instance_id.map_or(true, |id| log.instance_id == id))
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .unwrap_or_default()
}

fn environment(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn demo_instances() -> Vec<Instance> {
    vec![
        Instance {
            id: "1".to_string(),
            name: "Production Grist".to_string(),
            team: "acme-corp".to_string(),
            url: "https://grist.acme-corp.com".to_string(),
            email: "admin@acme-corp.com".to_string(),
            status: InstanceStatus::Running,
            created_at: at(2024, 1, 15, 10, 30, 0),
            last_updated: at(2024, 1, 20, 14, 22, 0),
            config: InstanceConfig {
                https: HttpsMode::Auto,
                trusted_proxy_ips: Some("192.168.1.0/24".to_string()),
                hide_ui_elements: Some(vec!["billing".to_string(), "templates".to_string()]),
                custom_dex_config: None,
                environment: environment(&[
                    ("GRIST_SANDBOX_FLAVOR", "gvisor"),
                    ("GRIST_HIDE_UI_ELEMENTS", "billing,templates"),
                ]),
            },
            metrics: Some(InstanceMetrics {
                uptime: 432_000,
                memory_usage: 512,
                cpu_usage: 15.0,
                active_users: 12,
                documents_count: 45,
            }),
        },
        Instance {
            id: "2".to_string(),
            name: "Development Grist".to_string(),
            team: "dev-team".to_string(),
            url: "http://localhost:9999".to_string(),
            email: "dev@acme-corp.com".to_string(),
            status: InstanceStatus::Running,
            created_at: at(2024, 1, 18, 9, 15, 0),
            last_updated: at(2024, 1, 20, 16, 45, 0),
            config: InstanceConfig {
                https: HttpsMode::External,
                trusted_proxy_ips: None,
                hide_ui_elements: Some(vec!["billing".to_string()]),
                custom_dex_config: None,
                environment: environment(&[("GRIST_SANDBOX_FLAVOR", "unsandboxed")]),
            },
            metrics: Some(InstanceMetrics {
                uptime: 86_400,
                memory_usage: 256,
                cpu_usage: 8.0,
                active_users: 3,
                documents_count: 12,
            }),
        },
        Instance {
            id: "3".to_string(),
            name: "Staging Environment".to_string(),
            team: "staging".to_string(),
            url: "https://staging.grist.acme-corp.com".to_string(),
            email: "staging@acme-corp.com".to_string(),
            status: InstanceStatus::Stopped,
            created_at: at(2024, 1, 10, 14, 20, 0),
            last_updated: at(2024, 1, 19, 11, 30, 0),
            config: InstanceConfig {
                https: HttpsMode::Auto,
                environment: environment(&[("GRIST_SANDBOX_FLAVOR", "gvisor")]),
                ..Default::default()
            },
            metrics: None,
        },
    ]
}

fn demo_logs() -> Vec<DeploymentLog> {
    vec![
        DeploymentLog {
            id: "1".to_string(),
            instance_id: "1".to_string(),
            timestamp: at(2024, 1, 20, 16, 45, 0),
            level: LogLevel::Info,
            message: "Grist instance started successfully".to_string(),
            source: LogSource::Grist,
        },
        DeploymentLog {
            id: "2".to_string(),
            instance_id: "1".to_string(),
            timestamp: at(2024, 1, 20, 16, 44, 30),
            level: LogLevel::Info,
            message: "Traefik configuration updated".to_string(),
            source: LogSource::Traefik,
        },
        DeploymentLog {
            id: "3".to_string(),
            instance_id: "2".to_string(),
            timestamp: at(2024, 1, 20, 16, 30, 0),
            level: LogLevel::Warn,
            message: "High memory usage detected".to_string(),
            source: LogSource::Grist,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserCredential;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn request() -> CreateInstanceRequest {
        CreateInstanceRequest {
            name: "X".to_string(),
            team: "x".to_string(),
            url: "https://x".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            https: HttpsMode::External,
            trusted_proxy_ips: Some("10.0.0.0/8".to_string()),
            additional_users: vec![UserCredential {
                email: "c@d.com".to_string(),
                password: "another".to_string(),
            }],
        }
    }

    fn sequential_store() -> InstanceStore {
        let counter = AtomicU64::new(100);
        InstanceStore::seeded()
            .with_id_generator(move || counter.fetch_add(1, Ordering::SeqCst).to_string())
    }

    #[test]
    fn test_seeded_demo_data() {
        let store = InstanceStore::seeded();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("1").unwrap().name, "Production Grist");
        assert!(store.get("3").unwrap().metrics.is_none());
        assert_eq!(store.logs(None).len(), 3);
    }

    #[test]
    fn test_create_round_trip() {
        let mut store = sequential_store();
        let created = store.create(request());

        assert_eq!(created.id, "100");
        assert_eq!(created.status, InstanceStatus::Pending);
        assert_eq!(created.created_at, created.last_updated);
        assert!(created.config.environment.is_empty());
        assert_eq!(created.config.trusted_proxy_ips.as_deref(), Some("10.0.0.0/8"));

        let listed = store.list();
        let found = listed.iter().find(|i| i.id == "100").unwrap();
        assert_eq!(found, &created);
        assert_eq!(found.name, "X");
        assert_eq!(found.team, "x");
        assert_eq!(found.url, "https://x");
        assert_eq!(found.email, "a@b.com");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = InstanceStore::new();
        let a = store.create(request());
        let b = store.create(request());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let store = InstanceStore::seeded();
        assert_eq!(store.get("nope"), Err(ApiError::not_found("nope")));
    }

    #[test]
    fn test_start_and_stop() {
        let mut store = InstanceStore::seeded();
        let before = store.get("3").unwrap().last_updated;

        let started = store.start("3").unwrap();
        assert_eq!(started.status, InstanceStatus::Running);
        assert!(started.last_updated > before);

        let stopped = store.stop("1").unwrap();
        assert_eq!(stopped.status, InstanceStatus::Stopped);
    }

    #[test]
    fn test_unknown_ids_leave_collection_unchanged() {
        let mut store = InstanceStore::seeded();
        let before = store.list();

        assert!(store.start("missing").is_none());
        assert!(store.stop("missing").is_none());
        assert!(!store.delete("missing"));

        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_delete() {
        let mut store = InstanceStore::seeded();
        assert!(store.delete("2"));
        assert_eq!(store.len(), 2);
        assert!(store.get("2").unwrap_err().is_not_found());
    }

    #[test]
    fn test_logs_filtered_and_newest_first() {
        let store = InstanceStore::seeded();

        let logs = store.logs(Some("1"));
        assert_eq!(logs.len(), 2);
        assert!(logs[0].timestamp > logs[1].timestamp);

        assert!(store.logs(Some("3")).is_empty());
        let all: Vec<_> = store.logs(None).into_iter().map(|l| l.id).collect();
        assert_eq!(all, vec!["1", "2", "3"]);
    }
}

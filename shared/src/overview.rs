//! Aggregate figures shown on the dashboard

use crate::models::Instance;

/// Number of entries in the "Recent Activity" list
pub const RECENT_LIMIT: usize = 5;

/// Summary of the instance collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewStats {
    pub total_instances: usize,
    pub running_instances: usize,
    pub total_users: u64,
    pub total_documents: u64,
    /// Mean uptime in seconds over instances that report one
    pub average_uptime: Option<u64>,
    /// Most recently updated instances, newest first
    pub recent: Vec<Instance>,
}

impl OverviewStats {
    pub fn from_instances(instances: &[Instance]) -> Self {
        let running_instances = instances.iter().filter(|i| i.is_running()).count();

        let metrics: Vec<_> = instances.iter().filter_map(|i| i.metrics).collect();
        let total_users = metrics.iter().map(|m| u64::from(m.active_users)).sum();
        let total_documents = metrics.iter().map(|m| u64::from(m.documents_count)).sum();

        let uptimes: Vec<u64> = metrics
            .iter()
            .map(|m| m.uptime)
            .filter(|uptime| *uptime > 0)
            .collect();
        let average_uptime = if uptimes.is_empty() {
            None
        } else {
            Some(uptimes.iter().sum::<u64>() / uptimes.len() as u64)
        };

        let mut recent = instances.to_vec();
        recent.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        recent.truncate(RECENT_LIMIT);

        Self {
            total_instances: instances.len(),
            running_instances,
            total_users,
            total_documents,
            average_uptime,
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstanceConfig, InstanceMetrics, InstanceStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn instance(id: &str, status: InstanceStatus, hours: i64, uptime: Option<u64>) -> Instance {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Instance {
            id: id.to_string(),
            name: format!("Instance {}", id),
            team: "team".to_string(),
            url: "https://grist.example.com".to_string(),
            email: "admin@example.com".to_string(),
            status,
            created_at: base,
            last_updated: base + Duration::hours(hours),
            config: InstanceConfig::default(),
            metrics: uptime.map(|uptime| InstanceMetrics {
                uptime,
                memory_usage: 256,
                cpu_usage: 10.0,
                active_users: 2,
                documents_count: 5,
            }),
        }
    }

    #[test]
    fn test_running_count() {
        let instances = vec![
            instance("1", InstanceStatus::Running, 0, None),
            instance("2", InstanceStatus::Stopped, 1, None),
            instance("3", InstanceStatus::Running, 2, None),
        ];
        let stats = OverviewStats::from_instances(&instances);
        assert_eq!(stats.running_instances, 2);
        assert_eq!(stats.total_instances, 3);
    }

    #[test]
    fn test_average_uptime_counts_only_reporting_instances() {
        let instances = vec![
            instance("1", InstanceStatus::Running, 0, Some(432_000)),
            instance("2", InstanceStatus::Running, 1, Some(86_400)),
            instance("3", InstanceStatus::Stopped, 2, None),
        ];
        let stats = OverviewStats::from_instances(&instances);
        assert_eq!(stats.average_uptime, Some(259_200));
        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.total_documents, 10);
    }

    #[test]
    fn test_no_metrics_means_no_average() {
        let instances = vec![instance("1", InstanceStatus::Pending, 0, Some(0))];
        let stats = OverviewStats::from_instances(&instances);
        assert_eq!(stats.average_uptime, None);
        assert_eq!(OverviewStats::from_instances(&[]), OverviewStats::default());
    }

    #[test]
    fn test_recent_is_sorted_and_capped() {
        let instances: Vec<_> = (0..7)
            .map(|h| instance(&h.to_string(), InstanceStatus::Running, h, None))
            .collect();
        let stats = OverviewStats::from_instances(&instances);

        let ids: Vec<_> = stats.recent.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["6", "5", "4", "3", "2"]);
        assert_eq!(instances[0].id, "0");
    }
}

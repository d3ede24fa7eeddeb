//! Client-side filtering and export of deployment logs

use crate::format::format_date;
use crate::models::{DeploymentLog, LogLevel, LogSource};

/// Filters applied by the logs viewer
///
/// All three predicates must hold for a log to be kept. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Case-insensitive substring matched against the message
    pub search: String,
    pub level: Option<LogLevel>,
    pub source: Option<LogSource>,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_level(mut self, level: Option<LogLevel>) -> Self {
        self.level = level;
        self
    }

    pub fn with_source(mut self, source: Option<LogSource>) -> Self {
        self.source = source;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.level.is_none() && self.source.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, log: &DeploymentLog) -> bool {
        self.matches_search(log) && self.matches_level(log) && self.matches_source(log)
    }

    fn matches_search(&self, log: &DeploymentLog) -> bool {
        self.search.is_empty()
            || log
                .message
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    fn matches_level(&self, log: &DeploymentLog) -> bool {
        self.level.map_or(true, |level| log.level == level)
    }

    fn matches_source(&self, log: &DeploymentLog) -> bool {
        self.source.map_or(true, |source| log.source == source)
    }

    /// Keep matching logs, preserving their order
    pub fn apply(&self, logs: &[DeploymentLog]) -> Vec<DeploymentLog> {
        logs.iter().filter(|log| self.matches(log)).cloned().collect()
    }
}

/// Parse a `<select>` value where `"all"` (or empty) means no filter
pub fn parse_choice<T: std::str::FromStr>(value: &str) -> Option<T> {
    match value {
        "" | "all" => None,
        other => other.parse().ok(),
    }
}

/// Render logs as CSV with a header row
pub fn to_csv(logs: &[DeploymentLog]) -> String {
    let mut csv = String::from("ID,Instance ID,Timestamp,Level,Source,Message\n");

    for log in logs {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            escape_csv(&log.id),
            escape_csv(&log.instance_id),
            escape_csv(&format_date(&log.timestamp)),
            log.level.as_str(),
            log.source.as_str(),
            escape_csv(&log.message),
        ));
    }

    csv
}

fn escape_csv(s: &str) -> String {
    if s.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn log(id: &str, level: LogLevel, source: LogSource, message: &str) -> DeploymentLog {
        DeploymentLog {
            id: id.to_string(),
            instance_id: "2".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 20, 16, 30, 0).unwrap(),
            level,
            message: message.to_string(),
            source,
        }
    }

    fn sample_logs() -> Vec<DeploymentLog> {
        vec![
            log("1", LogLevel::Info, LogSource::Grist, "Grist instance started successfully"),
            log("2", LogLevel::Info, LogSource::Traefik, "Traefik configuration updated"),
            log("3", LogLevel::Warn, LogSource::Grist, "High memory usage detected"),
            log("4", LogLevel::Error, LogSource::Dex, "Memory limit exceeded in dex"),
        ]
    }

    #[test]
    fn test_memory_warning_example() {
        let logs = vec![log("3", LogLevel::Warn, LogSource::Grist, "High memory usage detected")];

        let filter = LogFilter::new()
            .with_level(Some(LogLevel::Warn))
            .with_search("memory");
        assert_eq!(filter.apply(&logs), logs);

        let filter = filter.with_search("disk");
        assert!(filter.apply(&logs).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = LogFilter::new().with_search("MEMORY");
        let ids: Vec<_> = filter.apply(&sample_logs()).into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[test]
    fn test_predicates_are_anded() {
        let filter = LogFilter::new()
            .with_search("memory")
            .with_source(Some(LogSource::Dex));
        let result = filter.apply(&sample_logs());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "4");
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = LogFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&sample_logs()), sample_logs());
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice::<LogLevel>("all"), None);
        assert_eq!(parse_choice::<LogLevel>("error"), Some(LogLevel::Error));
        assert_eq!(parse_choice::<LogSource>("traefik"), Some(LogSource::Traefik));
        assert_eq!(parse_choice::<LogSource>("nginx"), None);
    }

    #[test]
    fn test_csv_escaping() {
        let logs = vec![log("1", LogLevel::Info, LogSource::Grist, "said \"hi\", twice")];
        let csv = to_csv(&logs);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID,Instance ID,Timestamp,Level,Source,Message"));
        assert_eq!(
            lines.next(),
            Some("1,2,\"Jan 20, 2024 16:30\",info,grist,\"said \"\"hi\"\", twice\"")
        );
    }

    #[test]
    fn test_csv_quotes_line_breaks() {
        let logs = vec![
            log("1", LogLevel::Error, LogSource::Traefik, "exit\r\nrestart"),
            log("2", LogLevel::Error, LogSource::Traefik, "bare\rreturn"),
        ];
        let csv = to_csv(&logs);
        assert!(csv.contains(",\"exit\r\nrestart\"\n"));
        assert!(csv.contains(",\"bare\rreturn\"\n"));
    }

    fn arb_log() -> impl Strategy<Value = DeploymentLog> {
        (
            prop::sample::select(LogLevel::all().to_vec()),
            prop::sample::select(LogSource::all().to_vec()),
            "[a-zA-Z ]{0,12}",
        )
            .prop_map(|(level, source, message)| log("x", level, source, &message))
    }

    fn arb_filter() -> impl Strategy<Value = LogFilter> {
        (
            "[a-zA-Z]{0,3}",
            prop::option::of(prop::sample::select(LogLevel::all().to_vec())),
            prop::option::of(prop::sample::select(LogSource::all().to_vec())),
        )
            .prop_map(|(search, level, source)| LogFilter { search, level, source })
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(logs in prop::collection::vec(arb_log(), 0..20), filter in arb_filter()) {
            let once = filter.apply(&logs);
            let twice = filter.apply(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_filters_commute(logs in prop::collection::vec(arb_log(), 0..20), filter in arb_filter()) {
            let search_only = LogFilter::new().with_search(filter.search.clone());
            let level_only = LogFilter::new().with_level(filter.level);
            let source_only = LogFilter::new().with_source(filter.source);

            let forward = source_only.apply(&level_only.apply(&search_only.apply(&logs)));
            let backward = search_only.apply(&source_only.apply(&level_only.apply(&logs)));

            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(forward, filter.apply(&logs));
        }
    }
}

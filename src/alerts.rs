//! Alert engine
//!
//! A pure decision layer over the most recent monitoring reports. It never
//! recomputes statistics, only interprets already-produced reports, and the
//! caller owns persistence of the generated alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MonitorConfig;
use crate::drift::{ConceptDriftReport, DataDriftReport};
use crate::error::Result;
use crate::monitor::PerformanceHistory;
use crate::storage;

/// Alert severity, serialized uppercase in the on-disk log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Info => write!(f, "INFO"),
            AlertLevel::Warning => write!(f, "WARNING"),
            AlertLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A timestamped, leveled, sourced notification. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub level: AlertLevel,
    /// Producer tag, e.g. "data_drift"
    pub source: String,
    pub message: String,
}

impl Alert {
    fn new(timestamp: DateTime<Utc>, level: AlertLevel, source: &str, message: String) -> Self {
        Self {
            timestamp,
            level,
            source: source.to_string(),
            message,
        }
    }
}

/// The monitoring reports available to one alert engine run.
/// `None` means the source report file was absent, which skips that rule.
#[derive(Debug, Clone, Default)]
pub struct MonitoringReports {
    pub data_drift: Option<DataDriftReport>,
    pub concept_drift: Option<ConceptDriftReport>,
    pub performance_history: Option<PerformanceHistory>,
}

/// Apply the alert rules to the available reports.
///
/// Each rule emits exactly one alert when its source report is present and
/// nothing at all when it is absent. All alerts from one run carry the same
/// creation timestamp.
pub fn generate_alerts(reports: &MonitoringReports, now: DateTime<Utc>) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(report) = &reports.data_drift {
        let n_drifted = report.n_drifted();
        if n_drifted > 0 {
            alerts.push(Alert::new(
                now,
                AlertLevel::Warning,
                "data_drift",
                format!("Data drift detected in {} features.", n_drifted),
            ));
        } else {
            alerts.push(Alert::new(
                now,
                AlertLevel::Info,
                "data_drift",
                "No significant data drift detected.".to_string(),
            ));
        }
    }

    if let Some(report) = &reports.concept_drift {
        if report.concept_drift_detected {
            alerts.push(Alert::new(
                now,
                AlertLevel::Warning,
                "concept_drift",
                "Concept drift detected based on prediction distribution.".to_string(),
            ));
        } else {
            alerts.push(Alert::new(
                now,
                AlertLevel::Info,
                "concept_drift",
                "No concept drift detected.".to_string(),
            ));
        }
    }

    if let Some(history) = &reports.performance_history {
        let n_degraded = history.iter().filter(|b| b.performance_degraded).count();
        if n_degraded > 0 {
            alerts.push(Alert::new(
                now,
                AlertLevel::Critical,
                "performance_monitor",
                format!("Performance degraded in {} batches.", n_degraded),
            ));
        } else {
            alerts.push(Alert::new(
                now,
                AlertLevel::Info,
                "performance_monitor",
                "Model performance within acceptable range.".to_string(),
            ));
        }
    }

    alerts
}

/// Alert engine pipeline stage
pub struct AlertEngine;

impl AlertEngine {
    /// Load whichever reports exist, generate alerts, and append them to the
    /// persistent alert log. Returns the alerts generated by this run.
    pub fn run(config: &MonitorConfig) -> Result<Vec<Alert>> {
        let reports = MonitoringReports {
            data_drift: storage::load_optional(&config.data_drift_path())?,
            concept_drift: storage::load_optional(&config.concept_drift_path())?,
            performance_history: storage::load_optional(&config.performance_history_path())?,
        };

        let alerts = generate_alerts(&reports, Utc::now());
        storage::append_log(&config.alerts_log_path(), &alerts)?;

        for alert in &alerts {
            info!(level = %alert.level, source = %alert.source, "{}", alert.message);
        }
        info!(n_alerts = alerts.len(), "alert engine run complete");
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::FeatureDriftResult;
    use crate::monitor::PerformanceSnapshot;
    use std::collections::BTreeMap;

    fn drift_report(flags: &[(&str, bool)]) -> DataDriftReport {
        let map: BTreeMap<String, FeatureDriftResult> = flags
            .iter()
            .map(|(name, drifted)| {
                (
                    name.to_string(),
                    FeatureDriftResult {
                        ks_statistic: 0.2,
                        p_value: if *drifted { 0.01 } else { 0.5 },
                        drift_detected: *drifted,
                    },
                )
            })
            .collect();
        DataDriftReport(map)
    }

    fn snapshot(degraded: bool) -> PerformanceSnapshot {
        PerformanceSnapshot {
            timestamp: Utc::now(),
            accuracy: 0.9,
            precision: 0.9,
            recall: 0.9,
            roc_auc: 0.95,
            performance_degraded: degraded,
        }
    }

    #[test]
    fn test_no_reports_no_alerts() {
        let alerts = generate_alerts(&MonitoringReports::default(), Utc::now());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_one_drifted_feature_one_warning() {
        let reports = MonitoringReports {
            data_drift: Some(drift_report(&[("f1", true), ("f2", false)])),
            ..Default::default()
        };
        let alerts = generate_alerts(&reports, Utc::now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_eq!(alerts[0].source, "data_drift");
        assert!(alerts[0].message.contains("1 features"));
    }

    #[test]
    fn test_clean_drift_report_is_info() {
        let reports = MonitoringReports {
            data_drift: Some(drift_report(&[("f1", false)])),
            ..Default::default()
        };
        let alerts = generate_alerts(&reports, Utc::now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Info);
    }

    #[test]
    fn test_degraded_batches_are_critical_with_count() {
        let reports = MonitoringReports {
            performance_history: Some(vec![snapshot(true), snapshot(false), snapshot(true)]),
            ..Default::default()
        };
        let alerts = generate_alerts(&reports, Utc::now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[0].source, "performance_monitor");
        assert!(alerts[0].message.contains("2 batches"));
    }

    #[test]
    fn test_healthy_history_is_info_not_critical() {
        let reports = MonitoringReports {
            performance_history: Some(vec![snapshot(false), snapshot(false)]),
            ..Default::default()
        };
        let alerts = generate_alerts(&reports, Utc::now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Info);
        assert!(alerts.iter().all(|a| a.level != AlertLevel::Critical));
    }

    #[test]
    fn test_all_reports_present_three_alerts_same_timestamp() {
        let reports = MonitoringReports {
            data_drift: Some(drift_report(&[("f1", false)])),
            concept_drift: Some(ConceptDriftReport {
                ks_statistic: 0.4,
                p_value: 0.01,
                concept_drift_detected: true,
            }),
            performance_history: Some(vec![snapshot(false)]),
        };
        let now = Utc::now();
        let alerts = generate_alerts(&reports, now);

        assert_eq!(alerts.len(), 3);
        assert!(alerts.iter().all(|a| a.timestamp == now));
        assert_eq!(alerts[1].level, AlertLevel::Warning);
        assert_eq!(alerts[1].source, "concept_drift");
    }

    #[test]
    fn test_level_serializes_uppercase() {
        let json = serde_json::to_string(&AlertLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let parsed: AlertLevel = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(parsed, AlertLevel::Warning);
    }
}

//! Retraining decision controller
//!
//! Scans the alert log for recent CRITICAL entries and decides whether
//! retraining should be triggered. Decisions are appended to their own log,
//! never overwritten.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alerts::{Alert, AlertLevel};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::storage;

/// Reason recorded when retraining is triggered
pub const REASON_TRIGGERED: &str = "CRITICAL performance degradation detected";
/// Reason recorded when the system is healthy
pub const REASON_NOT_TRIGGERED: &str = "System performance within acceptable limits";

/// One retraining decision; the decision log is an append-only sequence of these
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrainDecision {
    pub timestamp: DateTime<Utc>,
    pub retrain_required: bool,
    pub reason: String,
}

/// Decides whether retraining is required based on recent alert history.
/// All timestamps are UTC-aware, so window comparisons are always valid.
#[derive(Debug, Clone)]
pub struct RetrainController {
    critical_alert_threshold: usize,
    lookback_hours: i64,
}

impl RetrainController {
    /// Create a controller with the given threshold and trailing window
    pub fn new(critical_alert_threshold: usize, lookback_hours: i64) -> Self {
        Self {
            critical_alert_threshold,
            lookback_hours: lookback_hours.max(0),
        }
    }

    /// Count CRITICAL alerts inside the trailing window ending at `now`.
    /// Inclusive lower bound: an alert stamped exactly `now - window` counts.
    pub fn recent_critical_count(&self, alerts: &[Alert], now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::hours(self.lookback_hours);
        alerts
            .iter()
            .filter(|a| a.level == AlertLevel::Critical && a.timestamp >= cutoff)
            .count()
    }

    /// Retrain decision for the given alert history at time `now`
    pub fn should_retrain(&self, alerts: &[Alert], now: DateTime<Utc>) -> bool {
        self.recent_critical_count(alerts, now) >= self.critical_alert_threshold
    }

    /// Build the decision record, with the fixed reason strings
    pub fn decide(&self, alerts: &[Alert], now: DateTime<Utc>) -> RetrainDecision {
        let retrain_required = self.should_retrain(alerts, now);
        RetrainDecision {
            timestamp: now,
            retrain_required,
            reason: if retrain_required {
                REASON_TRIGGERED.to_string()
            } else {
                REASON_NOT_TRIGGERED.to_string()
            },
        }
    }

    /// Pipeline stage: read the alert log (absent log means no alerts),
    /// decide, and append the decision to the decision log.
    pub fn run(config: &MonitorConfig) -> Result<RetrainDecision> {
        let alerts: Vec<Alert> =
            storage::load_optional(&config.alerts_log_path())?.unwrap_or_default();

        let controller = Self::new(config.critical_alert_threshold, config.lookback_hours);
        let decision = controller.decide(&alerts, Utc::now());

        storage::append_log(&config.retrain_decisions_path(), std::slice::from_ref(&decision))?;

        info!(
            retrain_required = decision.retrain_required,
            reason = %decision.reason,
            "retraining decision evaluated"
        );
        Ok(decision)
    }
}

//! Status snapshot and online/outage classification.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::device::DeviceStatus;
use crate::telemetry::{Delta, TelemetryPaths};
use crate::time::{format_elapsed, nanos_to_secs, timestamp_from_nanos, to_rfc3339};

/// Outage cause reported while the antenna is stowed.
pub const STOWED_CAUSE: &str = "STOWED";

/// Health classification derived from the latest successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkHealth {
    Online,
    Outage { cause: String },
}

impl LinkHealth {
    pub fn is_online(&self) -> bool {
        matches!(self, LinkHealth::Online)
    }

    /// Whether the terminal reports itself as stowed.
    pub fn is_stowed(&self) -> bool {
        matches!(self, LinkHealth::Outage { cause } if cause == STOWED_CAUSE)
    }

    /// Value published at `<root>.status`.
    pub fn status_label(&self) -> &'static str {
        match self {
            LinkHealth::Online => "online",
            LinkHealth::Outage { .. } if self.is_stowed() => "stowed",
            LinkHealth::Outage { .. } => "offline",
        }
    }
}

impl std::fmt::Display for LinkHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkHealth::Online => write!(f, "online"),
            LinkHealth::Outage { cause } => write!(f, "outage ({})", cause),
        }
    }
}

/// Everything learned from one successful status poll.
///
/// Outage fields are only set while in an outage; throughput and latency are
/// only meaningful while online.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub is_outage: bool,
    pub cause: Option<String>,
    pub outage_start: Option<DateTime<Utc>>,
    pub outage_duration_secs: Option<u64>,
    pub uptime_secs: u64,
    pub hardware_version: String,
    pub software_version: String,
    pub downlink_bps: f64,
    pub uplink_bps: f64,
    pub latency_ms: Option<f64>,
    pub alerts: BTreeSet<String>,
}

impl StatusSnapshot {
    pub fn from_device(status: &DeviceStatus) -> Self {
        let outage = status.outage.as_ref();
        Self {
            is_outage: outage.is_some(),
            cause: outage.map(|o| o.cause.clone()),
            outage_start: outage.and_then(|o| timestamp_from_nanos(o.start_timestamp_ns)),
            outage_duration_secs: outage.map(|o| nanos_to_secs(o.duration_ns)),
            uptime_secs: status.device_state.uptime_s,
            hardware_version: status.device_info.hardware_version.clone(),
            software_version: status.device_info.software_version.clone(),
            downlink_bps: status.downlink_throughput_bps.unwrap_or(0.0),
            uplink_bps: status.uplink_throughput_bps.unwrap_or(0.0),
            latency_ms: status.pop_ping_latency_ms,
            alerts: status.active_alerts().into_iter().collect(),
        }
    }

    pub fn health(&self) -> LinkHealth {
        match &self.cause {
            Some(cause) if self.is_outage => LinkHealth::Outage {
                cause: cause.clone(),
            },
            _ => LinkHealth::Online,
        }
    }

    /// Human-readable outage duration, e.g. `"3 minutes"`.
    pub fn outage_duration_text(&self) -> Option<String> {
        self.outage_duration_secs.map(format_elapsed)
    }

    /// Persisted status line: `Online` or `Offline since <start> (<cause>)`.
    pub fn status_message(&self) -> String {
        match (&self.cause, &self.outage_start) {
            (Some(cause), Some(start)) if self.is_outage => {
                format!("Offline since {} ({})", to_rfc3339(start), cause)
            }
            (Some(cause), None) if self.is_outage => format!("Offline ({})", cause),
            _ => "Online".to_string(),
        }
    }

    /// Telemetry values for this snapshot.
    pub fn to_delta(&self, paths: &TelemetryPaths) -> Delta {
        let health = self.health();
        let mut delta = Delta::new().with(&paths.status, health.status_label());

        if let LinkHealth::Outage { cause } = &health {
            delta.push(&paths.outage_cause, cause.as_str());
            delta.push(
                &paths.outage_start,
                self.outage_start
                    .as_ref()
                    .map(|s| Value::from(to_rfc3339(s)))
                    .unwrap_or(Value::Null),
            );
            delta.push(
                &paths.outage_duration,
                self.outage_duration_text()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );
        } else {
            delta.push(&paths.downlink_throughput, self.downlink_bps);
            delta.push(&paths.uplink_throughput, self.uplink_bps);
            delta.push(
                &paths.latency,
                self.latency_ms.map(Value::from).unwrap_or(Value::Null),
            );
        }

        delta.push(&paths.uptime, self.uptime_secs);
        delta.push(&paths.hardware, self.hardware_version.as_str());
        delta.push(&paths.software, self.software_version.as_str());
        delta.push(
            &paths.alerts,
            self.alerts.iter().cloned().collect::<Vec<String>>(),
        );

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceInfo, DeviceOutage, DeviceState};
    use serde_json::json;

    fn online_status() -> DeviceStatus {
        DeviceStatus {
            device_info: DeviceInfo {
                hardware_version: "rev3_proto2".into(),
                software_version: "2024.04.1".into(),
            },
            device_state: DeviceState { uptime_s: 3600 },
            downlink_throughput_bps: Some(2_000_000.0),
            uplink_throughput_bps: None,
            pop_ping_latency_ms: Some(42.0),
            ..Default::default()
        }
    }

    fn outage_status(cause: &str) -> DeviceStatus {
        let mut status = online_status();
        status.outage = Some(DeviceOutage {
            cause: cause.into(),
            start_timestamp_ns: 1_714_564_800_000_000_000,
            duration_ns: 185_000_000_000,
        });
        status.alerts.insert("motors_stuck".into(), true);
        status.alerts.insert("slow_ethernet".into(), false);
        status
    }

    #[test]
    fn test_online_snapshot() {
        let snapshot = StatusSnapshot::from_device(&online_status());

        assert!(!snapshot.is_outage);
        assert!(snapshot.cause.is_none());
        assert!(snapshot.outage_start.is_none());
        assert!(snapshot.outage_duration_secs.is_none());
        assert_eq!(snapshot.uplink_bps, 0.0);
        assert_eq!(snapshot.health(), LinkHealth::Online);
        assert_eq!(snapshot.status_message(), "Online");
    }

    #[test]
    fn test_outage_snapshot() {
        let snapshot = StatusSnapshot::from_device(&outage_status("OBSTRUCTED"));

        assert!(snapshot.is_outage);
        assert_eq!(
            snapshot.health(),
            LinkHealth::Outage {
                cause: "OBSTRUCTED".into()
            }
        );
        assert_eq!(snapshot.outage_duration_secs, Some(185));
        assert_eq!(snapshot.outage_duration_text().as_deref(), Some("3 minutes"));
        assert_eq!(
            snapshot.status_message(),
            "Offline since 2024-05-01T12:00:00Z (OBSTRUCTED)"
        );
        assert_eq!(
            snapshot.alerts.iter().collect::<Vec<_>>(),
            vec!["motors_stuck"]
        );
    }

    #[test]
    fn test_stowed_classification() {
        let health = StatusSnapshot::from_device(&outage_status(STOWED_CAUSE)).health();
        assert!(health.is_stowed());
        assert!(!health.is_online());
        assert_eq!(health.status_label(), "stowed");

        let obstructed = LinkHealth::Outage {
            cause: "OBSTRUCTED".into(),
        };
        assert!(!obstructed.is_stowed());
        assert_eq!(obstructed.status_label(), "offline");
    }

    #[test]
    fn test_online_delta() {
        let paths = TelemetryPaths::default();
        let delta = StatusSnapshot::from_device(&online_status()).to_delta(&paths);

        assert_eq!(delta.get(&paths.status), Some(&json!("online")));
        assert_eq!(delta.get(&paths.downlink_throughput), Some(&json!(2_000_000.0)));
        assert_eq!(delta.get(&paths.uplink_throughput), Some(&json!(0.0)));
        assert_eq!(delta.get(&paths.latency), Some(&json!(42.0)));
        assert_eq!(delta.get(&paths.uptime), Some(&json!(3600)));
        assert!(delta.get(&paths.outage_cause).is_none());
    }

    #[test]
    fn test_outage_delta() {
        let paths = TelemetryPaths::default();
        let delta = StatusSnapshot::from_device(&outage_status("NO_SCHEDULE")).to_delta(&paths);

        assert_eq!(delta.get(&paths.status), Some(&json!("offline")));
        assert_eq!(delta.get(&paths.outage_cause), Some(&json!("NO_SCHEDULE")));
        assert_eq!(
            delta.get(&paths.outage_start),
            Some(&json!("2024-05-01T12:00:00Z"))
        );
        assert_eq!(delta.get(&paths.outage_duration), Some(&json!("3 minutes")));
        assert_eq!(delta.get(&paths.hardware), Some(&json!("rev3_proto2")));
        assert_eq!(delta.get(&paths.alerts), Some(&json!(["motors_stuck"])));
        assert!(delta.get(&paths.downlink_throughput).is_none());
    }
}

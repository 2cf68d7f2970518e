//! Wire model for terminal responses.
//!
//! 64-bit integers may arrive either as JSON numbers or as decimal strings
//! (the gateway follows the protobuf JSON mapping), so those fields go through
//! lenient deserializers. Every field is defaulted; older firmware omits many.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Raw status as reported by the terminal.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceStatus {
    /// Present only while the terminal is in an outage.
    pub outage: Option<DeviceOutage>,
    pub device_info: DeviceInfo,
    pub device_state: DeviceState,
    pub downlink_throughput_bps: Option<f64>,
    pub uplink_throughput_bps: Option<f64>,
    pub pop_ping_latency_ms: Option<f64>,
    /// Alert flags; an alert is active when its value is `true`.
    pub alerts: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceOutage {
    pub cause: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub start_timestamp_ns: i64,
    #[serde(deserialize_with = "lenient_u64")]
    pub duration_ns: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub hardware_version: String,
    pub software_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceState {
    #[serde(deserialize_with = "lenient_u64")]
    pub uptime_s: u64,
}

/// Position fix from the terminal's own GPS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

impl DeviceStatus {
    /// Names of alerts currently raised, sorted.
    pub fn active_alerts(&self) -> Vec<String> {
        self.alerts
            .iter()
            .filter(|(_, active)| **active)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Signed(v) => Ok(v),
        NumberOrString::Unsigned(v) => i64::try_from(v).map_err(serde::de::Error::custom),
        NumberOrString::Float(v) => Ok(v as i64),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Signed(v) => Ok(v.max(0) as u64),
        NumberOrString::Unsigned(v) => Ok(v),
        NumberOrString::Float(v) => Ok(v.max(0.0) as u64),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_status_deserialize() {
        let json = r#"{
            "device_info": {"hardware_version": "rev4_prod1", "software_version": "2024.05.0.mr1"},
            "device_state": {"uptime_s": "86400"},
            "downlink_throughput_bps": 1250000.5,
            "uplink_throughput_bps": 48000,
            "pop_ping_latency_ms": 31.2,
            "alerts": {"motors_stuck": false, "thermal_throttle": true}
        }"#;

        let status: DeviceStatus = serde_json::from_str(json).unwrap();
        assert!(status.outage.is_none());
        assert_eq!(status.device_state.uptime_s, 86_400);
        assert_eq!(status.device_info.hardware_version, "rev4_prod1");
        assert_eq!(status.uplink_throughput_bps, Some(48_000.0));
        assert_eq!(status.active_alerts(), vec!["thermal_throttle".to_string()]);
    }

    #[test]
    fn test_outage_status_deserialize_string_longs() {
        let json = r#"{
            "outage": {
                "cause": "STOWED",
                "start_timestamp_ns": "1714564800000000000",
                "duration_ns": "125000000000"
            },
            "device_state": {"uptime_s": 12}
        }"#;

        let status: DeviceStatus = serde_json::from_str(json).unwrap();
        let outage = status.outage.unwrap();
        assert_eq!(outage.cause, "STOWED");
        assert_eq!(outage.start_timestamp_ns, 1_714_564_800_000_000_000);
        assert_eq!(outage.duration_ns, 125_000_000_000);
        assert!(status.downlink_throughput_bps.is_none());
    }

    #[test]
    fn test_empty_status_defaults() {
        let status: DeviceStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status, DeviceStatus::default());
        assert!(status.active_alerts().is_empty());
    }

    #[test]
    fn test_bad_long_is_error() {
        let json = r#"{"device_state": {"uptime_s": "soon"}}"#;
        assert!(serde_json::from_str::<DeviceStatus>(json).is_err());
    }
}

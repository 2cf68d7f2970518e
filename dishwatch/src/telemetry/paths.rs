//! Data-bus key table.
//!
//! Terminal keys hang off a configurable provider root; navigation keys are
//! fixed by the bus schema.

/// Default provider root for terminal telemetry.
pub const DEFAULT_PROVIDER_PATH: &str = "network.providers.starlink";

/// Raw position from the terminal's own GPS.
pub const POSITION_PATH: &str = "navigation.position";

/// Derived course over ground, radians true.
pub const COURSE_OVER_GROUND_PATH: &str = "navigation.courseOverGroundTrue";

/// Smoothed speed over ground, meters per second.
pub const SPEED_OVER_GROUND_PATH: &str = "navigation.speedOverGround";

/// Fully qualified keys for one provider root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryPaths {
    pub status: String,
    pub outage_cause: String,
    pub outage_start: String,
    pub outage_duration: String,
    pub uptime: String,
    pub hardware: String,
    pub software: String,
    pub downlink_throughput: String,
    pub uplink_throughput: String,
    pub latency: String,
    pub alerts: String,
    pub notification: String,
}

impl TelemetryPaths {
    pub fn new(root: &str) -> Self {
        let key = |leaf: &str| format!("{}.{}", root, leaf);
        Self {
            status: key("status"),
            outage_cause: key("outage.cause"),
            outage_start: key("outage.start"),
            outage_duration: key("outage.duration"),
            uptime: key("uptime"),
            hardware: key("hardware"),
            software: key("software"),
            downlink_throughput: key("downlink_throughput"),
            uplink_throughput: key("uplink_throughput"),
            latency: key("latency"),
            alerts: key("alerts"),
            notification: format!("notifications.{}.state", root),
        }
    }
}

impl Default for TelemetryPaths {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_PATH)
    }
}

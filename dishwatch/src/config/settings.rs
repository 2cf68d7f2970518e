//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;
use std::time::Duration;

use crate::geo::CourseMode;
use crate::status::NotificationLevel;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub device: DeviceSettings,
    pub status: StatusSettings,
    pub gps: GpsSettings,
    pub movement: MovementSettings,
    pub logging: LoggingSettings,
}

/// `[device]`
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSettings {
    /// Gateway endpoint
    pub url: String,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Consecutive failures before the connection is recreated
    pub reconnect_threshold: u32,
}

/// `[status]`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSettings {
    /// Seconds between status polls
    pub poll_interval: u64,
    pub enable_notification: bool,
    /// Level raised while the terminal is offline
    pub notification_state: NotificationLevel,
    /// Root of the published status keys
    pub provider_path: String,
    /// Product name in notification messages
    pub provider_name: String,
}

/// `[gps]`
#[derive(Debug, Clone, PartialEq)]
pub struct GpsSettings {
    /// Poll the terminal's own GPS
    pub retrieve: bool,
    /// Seconds between location polls (under one minute)
    pub poll_interval: u64,
    /// Speed samples averaged for speed over ground
    pub smoothing_window: usize,
    pub course_mode: CourseMode,
}

/// `[movement]`
#[derive(Debug, Clone, PartialEq)]
pub struct MovementSettings {
    pub stow_while_moving: bool,
    /// Feed source to track; `None` latches the first one seen
    pub source: Option<String>,
    /// Seconds between movement samples
    pub sample_interval: u64,
    /// Samples in the movement window
    pub window: usize,
    pub stow_distance_nm: f64,
    /// NMEA UDP port, 0 disables the receiver
    pub feed_port: u16,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl DeviceSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl StatusSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

impl GpsSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

impl MovementSettings {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval)
    }
}

//! Runtime configuration for the monitor.

use std::time::Duration;

use crate::config::ConfigFile;
use crate::gps::GpsPollerConfig;
use crate::movement::{MovementTaskConfig, StowPolicy};
use crate::status::{NotificationLevel, StatusPollerConfig};
use crate::telemetry::TelemetryPaths;

/// Everything the monitor's tasks need, resolved from the config file.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub paths: TelemetryPaths,
    pub status: StatusPollerConfig,
    /// Notification level while offline.
    pub notification_level: NotificationLevel,
    /// Product name in notification messages.
    pub provider_name: String,
    /// Terminal GPS polling; `None` when disabled.
    pub gps: Option<GpsPollerConfig>,
    pub movement: MovementTaskConfig,
}

impl MonitorConfig {
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            paths: TelemetryPaths::new(&config.status.provider_path),
            status: StatusPollerConfig {
                interval: config.status.poll_interval(),
                enable_notification: config.status.enable_notification,
            },
            notification_level: config.status.notification_state,
            provider_name: config.status.provider_name.clone(),
            gps: config.gps.retrieve.then(|| GpsPollerConfig {
                interval: config.gps.poll_interval(),
                smoothing_window: config.gps.smoothing_window,
                course_mode: config.gps.course_mode,
            }),
            movement: MovementTaskConfig {
                sample_interval: config.movement.sample_interval(),
                window: config.movement.window,
                source: config.movement.source.clone(),
                policy: StowPolicy {
                    stow_while_moving: config.movement.stow_while_moving,
                    distance_threshold_nm: config.movement.stow_distance_nm,
                },
            },
        }
    }

    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status.interval = interval;
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::from_config_file(&ConfigFile::default())
    }
}

//! Default values for every setting.

use super::file::config_directory;
use super::settings::*;
use crate::device::{ConnectionBreaker, DEFAULT_DEVICE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::feed::DEFAULT_FEED_PORT;
use crate::geo::CourseMode;
use crate::gps::{DEFAULT_GPS_POLL_INTERVAL, DEFAULT_SMOOTHING_WINDOW};
use crate::movement::{DEFAULT_MOVEMENT_WINDOW, DEFAULT_SAMPLE_INTERVAL, DEFAULT_STOW_DISTANCE_NM};
use crate::status::{NotificationLevel, DEFAULT_PROVIDER_NAME, DEFAULT_STATUS_POLL_INTERVAL};
use crate::telemetry::DEFAULT_PROVIDER_PATH;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = DEFAULT_REQUEST_TIMEOUT.as_secs();
pub const DEFAULT_STATUS_POLL_SECS: u64 = DEFAULT_STATUS_POLL_INTERVAL.as_secs();
pub const DEFAULT_GPS_POLL_SECS: u64 = DEFAULT_GPS_POLL_INTERVAL.as_secs();
/// Location polls must be more frequent than this.
pub const MAX_GPS_POLL_SECS: u64 = 60;
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = DEFAULT_SAMPLE_INTERVAL.as_secs();
pub const DEFAULT_LOG_FILE_NAME: &str = "dishwatch.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            device: DeviceSettings {
                url: DEFAULT_DEVICE_URL.to_string(),
                request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
                reconnect_threshold: ConnectionBreaker::DEFAULT_THRESHOLD,
            },
            status: StatusSettings {
                poll_interval: DEFAULT_STATUS_POLL_SECS,
                enable_notification: true,
                notification_state: NotificationLevel::Warn,
                provider_path: DEFAULT_PROVIDER_PATH.to_string(),
                provider_name: DEFAULT_PROVIDER_NAME.to_string(),
            },
            gps: GpsSettings {
                retrieve: false,
                poll_interval: DEFAULT_GPS_POLL_SECS,
                smoothing_window: DEFAULT_SMOOTHING_WINDOW,
                course_mode: CourseMode::Planar,
            },
            movement: MovementSettings {
                stow_while_moving: false,
                source: None,
                sample_interval: DEFAULT_SAMPLE_INTERVAL_SECS,
                window: DEFAULT_MOVEMENT_WINDOW,
                stow_distance_nm: DEFAULT_STOW_DISTANCE_NM,
                feed_port: DEFAULT_FEED_PORT,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}

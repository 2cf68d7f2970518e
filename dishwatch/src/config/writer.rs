//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Render the commented INI written to `config.ini`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[device]
; Gateway endpoint in front of the terminal's Handle RPC
url = {}
; Seconds before a single request is abandoned
request_timeout = {}
; Consecutive failed requests before the connection is recreated
reconnect_threshold = {}

[status]
; Seconds between status polls
poll_interval = {}
; Publish a health notification while the terminal is offline
enable_notification = {}
; Notification level while offline: alert, warn, alarm, emergency
notification_state = {}
; Root of the published status keys
provider_path = {}
; Product name in notification messages
provider_name = {}

[gps]
; Poll the terminal's own GPS and publish position, course and speed
; (location access must be enabled on the terminal)
retrieve = {}
; Seconds between location polls (less than 60)
poll_interval = {}
; Number of speed samples averaged for speed over ground
smoothing_window = {}
; Course formula: planar (atan2 of degree deltas) or great_circle
course_mode = {}

[movement]
; Stow the antenna while the vessel is under way, unstow when stationary
stow_while_moving = {}
; Position source to track, e.g. 192.168.1.20.GP
; Leave empty to track the first source seen
source = {}
; Seconds between movement samples
sample_interval = {}
; Samples in the movement window; distance is judged over a full window
window = {}
; Distance over the window (nautical miles) at which the vessel is moving
stow_distance_nm = {}
; UDP port for NMEA 0183 position sentences (0 disables the receiver)
feed_port = {}

[logging]
; Log file, cleared at each start
file = {}
"#,
        config.device.url,
        config.device.request_timeout,
        config.device.reconnect_threshold,
        config.status.poll_interval,
        config.status.enable_notification,
        config.status.notification_state,
        config.status.provider_path,
        config.status.provider_name,
        config.gps.retrieve,
        config.gps.poll_interval,
        config.gps.smoothing_window,
        config.gps.course_mode,
        config.movement.stow_while_moving,
        config.movement.source.as_deref().unwrap_or(""),
        config.movement.sample_interval,
        config.movement.window,
        config.movement.stow_distance_nm,
        config.movement.feed_port,
        path_to_string(&config.logging.file),
    )
}

/// Display a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::CourseMode;
    use crate::status::NotificationLevel;
    use tempfile::TempDir;

    #[test]
    fn test_default_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");

        let config = ConfigFile::default();
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_custom_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.status.notification_state = NotificationLevel::Emergency;
        config.gps.retrieve = true;
        config.gps.course_mode = CourseMode::GreatCircle;
        config.movement.stow_while_moving = true;
        config.movement.source = Some("10.1.1.1.GN".into());
        config.movement.stow_distance_nm = 0.25;
        config.status.provider_name = "Mast unit".into();
        config.logging.file = temp_dir.path().join("custom.log");
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_written_file_is_commented() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("[movement]"));
        assert!(text.contains("; Stow the antenna while the vessel is under way"));
        assert!(text.contains("notification_state = warn"));
        assert!(text.contains("course_mode = planar"));
    }
}

//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names map to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::MAX_GPS_POLL_SECS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::geo::CourseMode;
use crate::status::NotificationLevel;

/// Parse an `Ini` into a `ConfigFile`, overlaying defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [device] section
    if let Some(section) = ini.section(Some("device")) {
        if let Some(v) = non_empty(section, "url") {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid("device", "url", v, "must be an http:// or https:// URL"));
            }
            config.device.url = v.to_string();
        }
        if let Some(v) = section.get("request_timeout") {
            config.device.request_timeout =
                positive(parse_number(v, "device", "request_timeout")?, "device", "request_timeout", v)?;
        }
        if let Some(v) = section.get("reconnect_threshold") {
            config.device.reconnect_threshold = positive(
                parse_number(v, "device", "reconnect_threshold")?,
                "device",
                "reconnect_threshold",
                v,
            )?;
        }
    }

    // [status] section
    if let Some(section) = ini.section(Some("status")) {
        if let Some(v) = section.get("poll_interval") {
            config.status.poll_interval =
                positive(parse_number(v, "status", "poll_interval")?, "status", "poll_interval", v)?;
        }
        if let Some(v) = section.get("enable_notification") {
            config.status.enable_notification = parse_bool(v);
        }
        if let Some(v) = section.get("notification_state") {
            config.status.notification_state = NotificationLevel::from_str(v).map_err(|_| {
                invalid(
                    "status",
                    "notification_state",
                    v,
                    "must be one of: alert, warn, alarm, emergency",
                )
            })?;
        }
        if let Some(v) = non_empty(section, "provider_path") {
            config.status.provider_path = v.trim_matches('.').to_string();
        }
        if let Some(v) = non_empty(section, "provider_name") {
            config.status.provider_name = v.to_string();
        }
    }

    // [gps] section
    if let Some(section) = ini.section(Some("gps")) {
        if let Some(v) = section.get("retrieve") {
            config.gps.retrieve = parse_bool(v);
        }
        if let Some(v) = section.get("poll_interval") {
            let secs: u64 = positive(parse_number(v, "gps", "poll_interval")?, "gps", "poll_interval", v)?;
            if secs >= MAX_GPS_POLL_SECS {
                return Err(invalid("gps", "poll_interval", v, "must be less than 60 seconds"));
            }
            config.gps.poll_interval = secs;
        }
        if let Some(v) = section.get("smoothing_window") {
            config.gps.smoothing_window = positive(
                parse_number(v, "gps", "smoothing_window")?,
                "gps",
                "smoothing_window",
                v,
            )?;
        }
        if let Some(v) = section.get("course_mode") {
            config.gps.course_mode = CourseMode::from_str(v)
                .map_err(|_| invalid("gps", "course_mode", v, "must be 'planar' or 'great_circle'"))?;
        }
    }

    // [movement] section
    if let Some(section) = ini.section(Some("movement")) {
        if let Some(v) = section.get("stow_while_moving") {
            config.movement.stow_while_moving = parse_bool(v);
        }
        if let Some(v) = section.get("source") {
            let v = v.trim();
            config.movement.source = (!v.is_empty()).then(|| v.to_string());
        }
        if let Some(v) = section.get("sample_interval") {
            config.movement.sample_interval = positive(
                parse_number(v, "movement", "sample_interval")?,
                "movement",
                "sample_interval",
                v,
            )?;
        }
        if let Some(v) = section.get("window") {
            let window: usize = parse_number(v, "movement", "window")?;
            if window < 2 {
                return Err(invalid("movement", "window", v, "must be at least 2"));
            }
            config.movement.window = window;
        }
        if let Some(v) = section.get("stow_distance_nm") {
            let distance: f64 = parse_number(v, "movement", "stow_distance_nm")?;
            if !distance.is_finite() || distance <= 0.0 {
                return Err(invalid(
                    "movement",
                    "stow_distance_nm",
                    v,
                    "must be a positive number of nautical miles",
                ));
            }
            config.movement.stow_distance_nm = distance;
        }
        if let Some(v) = section.get("feed_port") {
            config.movement.feed_port = parse_number(v, "movement", "feed_port")?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(value: &str, section: &str, key: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a number"))
}

fn positive<T: PartialOrd + Default>(
    number: T,
    section: &str,
    key: &str,
    value: &str,
) -> Result<T, ConfigFileError> {
    if number > T::default() {
        Ok(number)
    } else {
        Err(invalid(section, key, value, "must be greater than zero"))
    }
}

pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

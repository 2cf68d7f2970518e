//! Loading and saving `~/.dishwatch/config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load from the default path; defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from a specific path; defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Write a default config file at `path` unless one is already there.
    ///
    /// Returns `true` if a file was written.
    pub fn ensure_exists(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }
}

/// `~/.dishwatch`
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dishwatch")
}

/// `~/.dishwatch/config.ini`
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_LOG_FILE_NAME, DEFAULT_STATUS_POLL_SECS};
    use crate::status::NotificationLevel;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.device.url, "http://192.168.100.1:9201/handle");
        assert_eq!(config.device.request_timeout, 10);
        assert_eq!(config.device.reconnect_threshold, 10);
        assert_eq!(config.status.poll_interval, DEFAULT_STATUS_POLL_SECS);
        assert!(config.status.enable_notification);
        assert_eq!(config.status.notification_state, NotificationLevel::Warn);
        assert!(!config.gps.retrieve);
        assert!(!config.movement.stow_while_moving);
        assert!(config.movement.source.is_none());
        assert_eq!(config.movement.window, 10);
        assert_eq!(config.movement.stow_distance_nm, 0.15);
        assert_eq!(config.movement.feed_port, 10110);
        assert!(config.logging.file.ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_ensure_exists_writes_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        assert!(ConfigFile::ensure_exists(&path).unwrap());
        std::fs::write(&path, "[status]\npoll_interval = 7\n").unwrap();
        assert!(!ConfigFile::ensure_exists(&path).unwrap());

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.status.poll_interval, 7);
    }
}

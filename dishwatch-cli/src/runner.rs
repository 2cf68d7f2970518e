//! CLI runner for common setup.
//!
//! Loads the config, initializes logging and builds the device link so the
//! command handlers don't repeat it.

use std::path::PathBuf;
use std::sync::Arc;

use dishwatch::config::{config_file_path, ConfigFile};
use dishwatch::device::{DeviceLink, HttpConnector};
use dishwatch::logging::{init_logging, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Options shared by every command that talks to the terminal.
#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    pub config_path: Option<PathBuf>,
    pub debug: bool,
    /// Mirror logs to stderr
    pub console_log: bool,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    pub fn new(options: &RunnerOptions) -> Result<Self, CliError> {
        let config_path = options.config_path.clone().unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&config_path)?;

        let logging_guard = init_logging(&config.logging.file, options.console_log, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!("dishwatch v{}", dishwatch::VERSION);
        info!(config = %self.config_path.display(), "dishwatch CLI: {} command", command);
    }

    /// Link to the terminal described by `[device]`.
    pub fn device_link(&self) -> Arc<DeviceLink<HttpConnector>> {
        let device = &self.config.device;
        let connector = HttpConnector::new(&device.url, device.request_timeout());
        Arc::new(DeviceLink::new(connector, device.reconnect_threshold))
    }

    pub fn runtime(&self) -> Result<Runtime, CliError> {
        Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))
    }
}

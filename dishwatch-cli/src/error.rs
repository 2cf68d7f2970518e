//! CLI error handling with user-friendly messages.
//!
//! Centralizes error formatting and exit codes for every command.

use std::fmt;
use std::path::PathBuf;
use std::process;

use dishwatch::config::ConfigFileError;
use dishwatch::device::DeviceError;
use dishwatch::feed::FeedError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Config file could not be read, parsed or written
    Config(ConfigFileError),
    /// `init` would overwrite an existing file
    ConfigExists(PathBuf),
    /// Failed to start the async runtime or signal handler
    Runtime(String),
    /// A one-shot device request failed
    Device(DeviceError),
    /// Position feed receiver could not start
    Feed(FeedError),
}

impl CliError {
    /// Exit the process with an error message and code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Device(e) if e.counts_as_link_failure() => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The terminal is not reachable: check you are on its network");
                eprintln!("  2. The gateway URL is wrong: see [device] url in config.ini");
            }
            CliError::Device(DeviceError::Rejected { .. }) => {
                eprintln!();
                eprintln!("The terminal refused the request. Location requests need");
                eprintln!("\"Allow access on local network\" enabled in the Starlink app.");
            }
            CliError::Feed(_) => {
                eprintln!();
                eprintln!("Another program may already be listening for NMEA on that port.");
                eprintln!("Change [movement] feed_port, or set it to 0 to disable the receiver.");
            }
            CliError::ConfigExists(_) => {
                eprintln!();
                eprintln!("Use --force to overwrite it with defaults.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ConfigExists(path) => {
                write!(f, "Config file already exists: {}", path.display())
            }
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            CliError::Device(e) => write!(f, "Device request failed: {}", e),
            CliError::Feed(e) => write!(f, "Position feed error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Device(e) => Some(e),
            CliError::Feed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<DeviceError> for CliError {
    fn from(e: DeviceError) -> Self {
        CliError::Device(e)
    }
}

impl From<FeedError> for CliError {
    fn from(e: FeedError) -> Self {
        CliError::Feed(e)
    }
}

//! Dishwatch - satellite terminal monitor for vessel data buses
//!
//! Polls a satellite terminal's status and GPS, republishes what it learns as
//! Signal K style deltas, and stows or unstows the antenna as the vessel
//! starts and stops moving.
//!
//! # High-Level API
//!
//! The [`service`] module wires everything together:
//!
//! ```ignore
//! use dishwatch::config::ConfigFile;
//! use dishwatch::device::{DeviceLink, HttpConnector};
//! use dishwatch::service::{Monitor, MonitorConfig};
//! use dishwatch::telemetry::JsonLinesSink;
//!
//! let config = ConfigFile::load()?;
//! let connector = HttpConnector::new(&config.device.url, config.device.request_timeout());
//! let link = Arc::new(DeviceLink::new(connector, config.device.reconnect_threshold));
//! let sink = Arc::new(JsonLinesSink::new(std::io::stdout()));
//!
//! let handle = Monitor::new(MonitorConfig::from_config_file(&config), link, sink).start();
//! ```

pub mod config;
pub mod device;
pub mod feed;
pub mod geo;
pub mod gps;
pub mod logging;
pub mod movement;
pub mod runtime;
pub mod service;
pub mod status;
pub mod telemetry;
pub mod time;

/// Version of the library and CLI, from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

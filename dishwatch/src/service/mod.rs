//! Monitor controller.
//!
//! [`Monitor`] owns the device link, the telemetry sink and the
//! [`SharedState`]; [`Monitor::start`] spawns the status poller, the optional
//! GPS poller and the movement task, and returns a [`MonitorHandle`] used to
//! stop them.
//!
//! # Example
//!
//! ```ignore
//! let link = Arc::new(DeviceLink::new(HttpConnector::default(), 10));
//! let sink = Arc::new(JsonLinesSink::new(std::io::stdout()));
//! let (tx, rx) = mpsc::channel(16);
//!
//! let handle = Monitor::new(MonitorConfig::default(), link, sink)
//!     .with_position_feed(rx)
//!     .start();
//!
//! handle.stop();
//! handle.join().await;
//! ```

mod config;
mod monitor;
mod state;

pub use config::MonitorConfig;
pub use monitor::{Monitor, MonitorHandle};
pub use state::{MonitorCounters, MonitorState, SharedState};

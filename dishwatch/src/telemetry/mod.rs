//! Telemetry emission to the vessel data bus.
//!
//! Every component publishes through a [`TelemetrySink`]; nothing in the
//! core knows how values reach the bus. A publication is a [`Delta`]: a batch
//! of path/value pairs that a Signal K style consumer applies atomically.
//!
//! # Components
//!
//! - [`delta`] - `PathValue` and `Delta`, the serialized shape on the bus
//! - [`paths`] - `TelemetryPaths`, every key rooted at a provider path
//! - [`sink`] - `TelemetrySink` trait with channel and JSON-lines implementations

mod delta;
mod paths;
mod sink;

pub use delta::{Delta, PathValue};
pub use paths::{
    TelemetryPaths, COURSE_OVER_GROUND_PATH, DEFAULT_PROVIDER_PATH, POSITION_PATH,
    SPEED_OVER_GROUND_PATH,
};
pub use sink::{ChannelSink, JsonLinesSink, SinkEvent, TelemetryError, TelemetrySink};

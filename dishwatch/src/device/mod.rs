//! Device link to the satellite terminal.
//!
//! The terminal exposes a single request/response endpoint that is known to
//! stall and drop connections. This module wraps it so the pollers above only
//! ever see `Result<T, DeviceError>`:
//!
//! ```text
//! StatusPoller ─┐
//! GpsPoller ────┼──► DeviceLink (mutex, ConnectionBreaker) ──► DeviceClient
//! StowController┘                                  │
//!                                                  └─ DeviceConnector::connect() on trip
//! ```
//!
//! # Components
//!
//! - [`DeviceClient`] / [`DeviceConnector`] - transport traits
//! - [`HttpConnector`] / [`HttpDeviceClient`] - JSON gateway transport
//! - [`ConnectionBreaker`] - Closed/Open failure accounting
//! - [`DeviceLink`] - serialized access plus reconnect-on-trip

mod breaker;
mod client;
mod error;
mod link;
mod model;

#[cfg(test)]
pub(crate) mod testing;

pub use breaker::{BreakerState, ConnectionBreaker};
pub use client::{
    DeviceClient, DeviceConnector, HttpConnector, HttpDeviceClient, DEFAULT_DEVICE_URL,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use error::DeviceError;
pub use link::DeviceLink;
pub use model::{DeviceInfo, DeviceLocation, DeviceOutage, DeviceState, DeviceStatus};

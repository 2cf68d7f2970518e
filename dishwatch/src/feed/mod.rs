//! External position feed.
//!
//! The movement tracker deliberately does not use the terminal's own GPS; it
//! consumes positions from the vessel's navigation system. Positions arrive
//! as [`SourcedPosition`] values on a channel. [`NmeaFeedReceiver`] fills that
//! channel from NMEA 0183 sentences broadcast over UDP, but anything that can
//! send a `SourcedPosition` can act as the feed.
//!
//! # Setup
//!
//! Most chartplotters and multiplexers can forward NMEA over UDP; point them
//! at port 10110 on the host running the monitor.

mod nmea;
mod receiver;

pub use nmea::{parse_sentence, NmeaError, NmeaFix};
pub use receiver::{NmeaFeedReceiver, NmeaFeedReceiverConfig, DEFAULT_FEED_PORT};

use crate::geo::PositionFix;

/// A position tagged with the identity of whoever produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedPosition {
    /// Producer identity, e.g. `192.168.1.10.GP`.
    pub source: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SourcedPosition {
    pub fn new(source: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            source: source.into(),
            latitude,
            longitude,
        }
    }

    pub fn fix(&self) -> PositionFix {
        PositionFix::new(self.latitude, self.longitude)
    }
}

/// Errors from the position feed receiver.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Failed to bind UDP socket on port {port}: {source}")]
    SocketBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

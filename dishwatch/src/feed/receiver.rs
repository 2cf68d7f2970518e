//! UDP listener for NMEA 0183 broadcasts.

use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::nmea::{parse_sentence, NmeaError};
use super::{FeedError, SourcedPosition};

/// Conventional port for NMEA 0183 over UDP.
pub const DEFAULT_FEED_PORT: u16 = 10110;

/// Largest datagram we read; NMEA sentences are at most 82 bytes each.
const MAX_DATAGRAM_SIZE: usize = 2048;

#[derive(Debug, Clone)]
pub struct NmeaFeedReceiverConfig {
    /// UDP port to listen on; 0 picks an ephemeral port.
    pub port: u16,
    pub bind_address: String,
}

impl Default for NmeaFeedReceiverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_FEED_PORT,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Receives NMEA position sentences and forwards them as [`SourcedPosition`]s.
///
/// The source id is the sender address plus talker id, so two GPS units on
/// the same multiplexer are still told apart.
pub struct NmeaFeedReceiver {
    socket: UdpSocket,
    port: u16,
    position_tx: mpsc::Sender<SourcedPosition>,
}

impl NmeaFeedReceiver {
    pub async fn bind(
        config: NmeaFeedReceiverConfig,
        position_tx: mpsc::Sender<SourcedPosition>,
    ) -> Result<Self, FeedError> {
        let socket = UdpSocket::bind((config.bind_address.as_str(), config.port))
            .await
            .map_err(|e| FeedError::SocketBind {
                port: config.port,
                source: e,
            })?;

        Ok(Self {
            socket,
            port: config.port,
            position_tx,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.local_addr().ok()
    }

    /// Spawn the receive loop.
    pub fn start(self, cancellation: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancellation))
    }

    async fn run(self, cancellation: CancellationToken) {
        info!(
            port = self.port,
            local_addr = ?self.local_addr(),
            "Position feed receiver started"
        );

        let mut buffer = [0u8; MAX_DATAGRAM_SIZE];
        let mut datagrams: u64 = 0;
        let mut positions: u64 = 0;

        loop {
            let received = tokio::select! {
                _ = cancellation.cancelled() => break,
                received = self.socket.recv_from(&mut buffer) => received,
            };

            match received {
                Ok((len, sender)) => {
                    datagrams += 1;
                    let text = String::from_utf8_lossy(&buffer[..len]);
                    for line in text.lines().filter(|l| !l.trim().is_empty()) {
                        if let Some(position) = Self::position_from(line, sender) {
                            positions += 1;
                            self.forward(position);
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "UDP receive error");
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                }
            }

            if self.position_tx.is_closed() {
                debug!("Position channel closed, stopping receiver");
                break;
            }
        }

        info!(datagrams, positions, "Position feed receiver stopped");
    }

    fn position_from(line: &str, sender: SocketAddr) -> Option<SourcedPosition> {
        match parse_sentence(line) {
            Ok(fix) => Some(SourcedPosition::new(
                format!("{}.{}", sender.ip(), fix.talker),
                fix.latitude,
                fix.longitude,
            )),
            Err(NmeaError::Unsupported(kind)) => {
                trace!(sentence = %kind, "Ignoring sentence");
                None
            }
            Err(e) => {
                debug!(error = %e, sender = %sender, "Dropping sentence");
                None
            }
        }
    }

    fn forward(&self, position: SourcedPosition) {
        if let Err(e) = self.position_tx.try_send(position) {
            debug!(error = %e, "Position channel full, dropping sample");
        }
    }
}

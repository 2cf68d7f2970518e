//! Telemetry sinks.

use std::io::Write;
use std::sync::Mutex;

use tokio::sync::mpsc;

use super::delta::Delta;

/// Errors raised while writing telemetry.
///
/// Sinks never propagate these to callers; they are logged and the record is
/// dropped.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to encode delta: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write delta: {0}")]
    Write(#[from] std::io::Error),
}

/// One-way output to the vessel data bus.
pub trait TelemetrySink: Send + Sync {
    /// Publish a batch of values.
    fn publish(&self, delta: Delta);

    /// Replace the human-readable status line shown for this provider.
    fn set_status_message(&self, message: &str);
}

/// Everything a [`ChannelSink`] forwards.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Delta(Delta),
    Status(String),
}

/// Sink that forwards events over a bounded channel.
///
/// Events are dropped (with a warning) when the receiver falls behind.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<SinkEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SinkEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SinkEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    fn forward(&self, event: SinkEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::warn!(error = %e, "Telemetry channel rejected event");
        }
    }
}

impl TelemetrySink for ChannelSink {
    fn publish(&self, delta: Delta) {
        self.forward(SinkEvent::Delta(delta));
    }

    fn set_status_message(&self, message: &str) {
        self.forward(SinkEvent::Status(message.to_string()));
    }
}

/// Sink that writes one JSON delta per line.
///
/// Status messages are not part of the delta stream and go to the log.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn write_delta(&self, delta: &Delta) -> Result<(), TelemetryError> {
        let line = delta.to_json()?;
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> TelemetrySink for JsonLinesSink<W> {
    fn publish(&self, delta: Delta) {
        if delta.is_empty() {
            return;
        }
        if let Err(e) = self.write_delta(&delta) {
            tracing::warn!(error = %e, "Dropping telemetry delta");
        }
    }

    fn set_status_message(&self, message: &str) {
        tracing::info!(status = message, "Provider status");
    }
}

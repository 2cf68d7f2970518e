//! Periodic status poll.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::snapshot::{LinkHealth, StatusSnapshot};
use crate::device::{DeviceConnector, DeviceLink};
use crate::runtime::PeriodicTask;
use crate::service::SharedState;
use crate::telemetry::{TelemetryPaths, TelemetrySink};

/// Default time between status polls.
pub const DEFAULT_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct StatusPollerConfig {
    pub interval: Duration,
    /// Publish the health notification alongside status values.
    pub enable_notification: bool,
}

impl Default for StatusPollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_STATUS_POLL_INTERVAL,
            enable_notification: true,
        }
    }
}

/// Polls terminal status, classifies it and publishes the result.
///
/// A failed poll is logged and skipped; the link does its own reconnect
/// bookkeeping. A successful poll replaces the shared classification, which
/// the stow controller reads on its next cycle.
pub struct StatusPoller<K: DeviceConnector> {
    link: Arc<DeviceLink<K>>,
    sink: Arc<dyn TelemetrySink>,
    state: SharedState,
    paths: TelemetryPaths,
    config: StatusPollerConfig,
}

impl<K: DeviceConnector + 'static> StatusPoller<K> {
    pub fn new(
        link: Arc<DeviceLink<K>>,
        sink: Arc<dyn TelemetrySink>,
        state: SharedState,
        paths: TelemetryPaths,
        config: StatusPollerConfig,
    ) -> Self {
        Self {
            link,
            sink,
            state,
            paths,
            config,
        }
    }

    async fn poll(&self, cancellation: &CancellationToken) {
        let result = self.link.status().await;
        if cancellation.is_cancelled() {
            return;
        }

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!(error = %e, "Status poll failed, skipping cycle");
                self.state.lock().await.counters.status_failures += 1;
                return;
            }
        };

        let snapshot = StatusSnapshot::from_device(&status);
        let health = snapshot.health();
        let mut delta = snapshot.to_delta(&self.paths);

        let mut state = self.state.lock().await;
        state.counters.status_polls += 1;

        let previous = state.health.replace(health.clone());
        if previous.as_ref() != Some(&health) {
            match &health {
                LinkHealth::Online => tracing::info!(
                    downlink_bps = snapshot.downlink_bps,
                    uplink_bps = snapshot.uplink_bps,
                    "Terminal online"
                ),
                LinkHealth::Outage { cause } => tracing::info!(
                    cause = %cause,
                    duration = snapshot.outage_duration_text().as_deref().unwrap_or("unknown"),
                    "Terminal outage"
                ),
            }
            self.sink.set_status_message(&snapshot.status_message());
        }

        if self.config.enable_notification {
            let record = state.notification.update(&health);
            match serde_json::to_value(record) {
                Ok(value) => delta.push(&self.paths.notification, value),
                Err(e) => tracing::warn!(error = %e, "Failed to encode notification"),
            }
        }

        tracing::trace!(health = %health, uptime_s = snapshot.uptime_secs, "Status poll");
        state.last_snapshot = Some(snapshot);
        drop(state);

        self.sink.publish(delta);
    }
}

impl<K: DeviceConnector + 'static> PeriodicTask for StatusPoller<K> {
    fn name(&self) -> &'static str {
        "status"
    }

    fn period(&self) -> Duration {
        self.config.interval
    }

    async fn tick(&mut self, cancellation: &CancellationToken) {
        self.poll(cancellation).await;
    }
}

//! The monitor: wires the periodic tasks around one device link and one
//! shared state.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::config::MonitorConfig;
use super::state::{MonitorState, SharedState};
use crate::device::{DeviceConnector, DeviceLink};
use crate::feed::SourcedPosition;
use crate::gps::GpsPoller;
use crate::movement::{MovementTask, StowState};
use crate::runtime::spawn_periodic;
use crate::status::{NotificationState, StatusPoller};
use crate::telemetry::TelemetrySink;

/// Owns the configuration and shared state until started.
pub struct Monitor<K: DeviceConnector> {
    config: MonitorConfig,
    link: Arc<DeviceLink<K>>,
    sink: Arc<dyn TelemetrySink>,
    state: SharedState,
    positions: Option<mpsc::Receiver<SourcedPosition>>,
}

impl<K: DeviceConnector + 'static> Monitor<K> {
    pub fn new(config: MonitorConfig, link: Arc<DeviceLink<K>>, sink: Arc<dyn TelemetrySink>) -> Self {
        let notification = NotificationState::new(config.notification_level)
            .with_provider_name(config.provider_name.as_str());
        let state = Arc::new(Mutex::new(MonitorState::with_notification(notification)));
        Self {
            config,
            link,
            sink,
            state,
            positions: None,
        }
    }

    /// Attach the external position feed driving movement detection.
    pub fn with_position_feed(mut self, positions: mpsc::Receiver<SourcedPosition>) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    pub async fn stow_state(&self) -> StowState {
        self.state.lock().await.stow_state()
    }

    /// Spawn all tasks.
    pub fn start(self) -> MonitorHandle {
        let cancellation = CancellationToken::new();
        let mut handles = Vec::new();

        handles.push(spawn_periodic(
            StatusPoller::new(
                Arc::clone(&self.link),
                Arc::clone(&self.sink),
                Arc::clone(&self.state),
                self.config.paths.clone(),
                self.config.status.clone(),
            ),
            cancellation.clone(),
        ));

        if let Some(gps) = self.config.gps.clone() {
            handles.push(spawn_periodic(
                GpsPoller::new(
                    Arc::clone(&self.link),
                    Arc::clone(&self.sink),
                    Arc::clone(&self.state),
                    gps,
                ),
                cancellation.clone(),
            ));
        }

        match self.positions {
            Some(positions) => {
                let task = MovementTask::new(
                    self.config.movement.clone(),
                    Arc::clone(&self.link),
                    Arc::clone(&self.state),
                    positions,
                );
                handles.push(task.start(cancellation.clone()));
            }
            None => tracing::info!("No position feed attached, movement tracking disabled"),
        }

        tracing::info!(
            tasks = handles.len(),
            gps = self.config.gps.is_some(),
            stow_while_moving = self.config.movement.policy.stow_while_moving,
            "Monitor started"
        );

        MonitorHandle {
            cancellation,
            handles,
            state: self.state,
        }
    }
}

/// Handle to a running monitor.
pub struct MonitorHandle {
    cancellation: CancellationToken,
    handles: Vec<JoinHandle<()>>,
    state: SharedState,
}

impl MonitorHandle {
    /// Stop all timers. Requests already in flight complete and their
    /// results are discarded.
    pub fn stop(&self) {
        self.cancellation.cancel();
    }

    /// Token cancelled by [`stop`](Self::stop); companion tasks such as the
    /// feed receiver can share it.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    pub async fn stow_state(&self) -> StowState {
        self.state.lock().await.stow_state()
    }

    /// Wait for every task to finish.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Monitor task ended abnormally");
            }
        }
        tracing::info!("Monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::device::testing::ScriptedDevice;
    use crate::device::DeviceStatus;
    use crate::telemetry::{ChannelSink, SinkEvent};

    #[tokio::test(start_paused = true)]
    async fn test_stop_quiesces_all_timers() {
        let device = ScriptedDevice::new();
        for _ in 0..100 {
            device.push_status(Ok(DeviceStatus::default()));
        }
        let link = Arc::new(DeviceLink::new(device.connector(), 5));
        let (sink, mut rx) = ChannelSink::channel(256);

        let monitor = Monitor::new(MonitorConfig::default(), link, Arc::new(sink));
        let handle = monitor.start();

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(handle.stow_state().await, StowState::Online);

        handle.stop();
        let state = handle.state();
        handle.join().await;

        let polls = state.lock().await.counters.status_polls;
        assert_eq!(polls, 3);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(state.lock().await.counters.status_polls, polls);

        let mut deltas = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SinkEvent::Delta(_)) {
                deltas += 1;
            }
        }
        assert_eq!(deltas, 3);
    }
}

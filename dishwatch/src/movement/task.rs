//! Movement sampling loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::stow::{StowController, StowPolicy};
use super::tracker::{MovementTracker, DEFAULT_MOVEMENT_WINDOW};
use crate::device::{DeviceConnector, DeviceLink};
use crate::feed::SourcedPosition;
use crate::service::SharedState;

/// Default time between movement samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct MovementTaskConfig {
    pub sample_interval: Duration,
    pub window: usize,
    /// Feed source to accept; `None` latches the first one seen.
    pub source: Option<String>,
    pub policy: StowPolicy,
}

impl Default for MovementTaskConfig {
    fn default() -> Self {
        Self {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            window: DEFAULT_MOVEMENT_WINDOW,
            source: None,
            policy: StowPolicy::default(),
        }
    }
}

/// Feeds the tracker from the position channel and runs the stow controller
/// once per sample interval.
///
/// Each decision holds the shared state lock from reading the classification
/// until the stow flag has been updated.
pub struct MovementTask<K: DeviceConnector> {
    tracker: MovementTracker,
    controller: StowController<K>,
    state: SharedState,
    positions: mpsc::Receiver<SourcedPosition>,
    sample_interval: Duration,
}

impl<K: DeviceConnector + 'static> MovementTask<K> {
    pub fn new(
        config: MovementTaskConfig,
        link: Arc<DeviceLink<K>>,
        state: SharedState,
        positions: mpsc::Receiver<SourcedPosition>,
    ) -> Self {
        Self {
            tracker: MovementTracker::new(config.window, config.source),
            controller: StowController::new(link, config.policy),
            state,
            positions,
            sample_interval: config.sample_interval,
        }
    }

    pub fn start(self, cancellation: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancellation))
    }

    async fn run(mut self, cancellation: CancellationToken) {
        // First sample one interval after start, once a position has had time to arrive
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.sample_interval, self.sample_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut feed_open = true;

        tracing::debug!(
            sample_interval_s = self.sample_interval.as_secs(),
            window = self.tracker.window().capacity(),
            stow_while_moving = self.controller.policy().stow_while_moving,
            "Movement task started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => break,
                position = self.positions.recv(), if feed_open => match position {
                    Some(position) => self.admit(position).await,
                    None => {
                        tracing::warn!("Position feed closed, movement tracking idle");
                        feed_open = false;
                    }
                },
                _ = ticker.tick() => self.sample(&cancellation).await,
            }
        }

        tracing::debug!(rejected = self.tracker.rejected(), "Movement task stopped");
    }

    async fn admit(&mut self, position: SourcedPosition) {
        let result = self.tracker.admit(position);
        let mut state = self.state.lock().await;
        match result {
            Ok(()) => state.counters.feed_samples += 1,
            Err(e) => {
                state.counters.feed_rejected += 1;
                tracing::debug!(error = %e, "Discarding position sample");
            }
        }
    }

    async fn sample(&mut self, cancellation: &CancellationToken) {
        let Some(distance_nm) = self.tracker.commit() else {
            tracing::trace!(
                samples = self.tracker.window().len(),
                "No movement distance this interval"
            );
            return;
        };

        let mut state = self.state.lock().await;
        if cancellation.is_cancelled() {
            return;
        }
        // Failures are logged by the controller and retried next cycle
        let _ = self.controller.evaluate(distance_nm, &mut state).await;
    }
}

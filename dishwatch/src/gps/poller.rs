//! Periodic terminal GPS poll.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use super::estimator::{CourseSpeedEstimator, DEFAULT_SMOOTHING_WINDOW};
use crate::device::{DeviceConnector, DeviceLink, DeviceLocation};
use crate::geo::{CourseMode, PositionFix};
use crate::runtime::PeriodicTask;
use crate::service::SharedState;
use crate::telemetry::{
    Delta, TelemetrySink, COURSE_OVER_GROUND_PATH, POSITION_PATH, SPEED_OVER_GROUND_PATH,
};

/// Default time between location polls.
pub const DEFAULT_GPS_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct GpsPollerConfig {
    /// Poll period; also the elapsed time assumed between fixes.
    pub interval: Duration,
    pub smoothing_window: usize,
    pub course_mode: CourseMode,
}

impl Default for GpsPollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_GPS_POLL_INTERVAL,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            course_mode: CourseMode::Planar,
        }
    }
}

/// Polls the terminal's own GPS and publishes navigation values.
pub struct GpsPoller<K: DeviceConnector> {
    link: Arc<DeviceLink<K>>,
    sink: Arc<dyn TelemetrySink>,
    state: SharedState,
    estimator: CourseSpeedEstimator,
    interval: Duration,
}

impl<K: DeviceConnector + 'static> GpsPoller<K> {
    pub fn new(
        link: Arc<DeviceLink<K>>,
        sink: Arc<dyn TelemetrySink>,
        state: SharedState,
        config: GpsPollerConfig,
    ) -> Self {
        Self {
            link,
            sink,
            state,
            estimator: CourseSpeedEstimator::new(
                config.interval,
                config.smoothing_window,
                config.course_mode,
            ),
            interval: config.interval,
        }
    }

    async fn poll(&mut self, cancellation: &CancellationToken) {
        let result = self.link.location().await;
        if cancellation.is_cancelled() {
            return;
        }

        let location = match result {
            Ok(location) => location,
            Err(e) => {
                tracing::debug!(error = %e, "Location poll failed, skipping cycle");
                self.state.lock().await.counters.gps_failures += 1;
                return;
            }
        };
        self.state.lock().await.counters.gps_polls += 1;

        let fix = PositionFix::new(location.latitude, location.longitude);
        let mut delta = Delta::new().with(POSITION_PATH, position_value(&location));

        if let Some(derived) = self.estimator.update(fix) {
            tracing::trace!(
                course_rad = derived.course_rad,
                speed_mps = derived.instantaneous_mps,
                smoothed_mps = derived.smoothed_mps,
                "Course and speed"
            );
            delta.push(COURSE_OVER_GROUND_PATH, derived.course_rad);
            delta.push(SPEED_OVER_GROUND_PATH, derived.smoothed_mps);
        }

        self.sink.publish(delta);
    }
}

fn position_value(location: &DeviceLocation) -> Value {
    let mut position = Map::new();
    position.insert("latitude".into(), json!(location.latitude));
    position.insert("longitude".into(), json!(location.longitude));
    if let Some(altitude) = location.altitude {
        position.insert("altitude".into(), json!(altitude));
    }
    Value::Object(position)
}

impl<K: DeviceConnector + 'static> PeriodicTask for GpsPoller<K> {
    fn name(&self) -> &'static str {
        "gps"
    }

    fn period(&self) -> Duration {
        self.interval
    }

    async fn tick(&mut self, cancellation: &CancellationToken) {
        self.poll(cancellation).await;
    }
}

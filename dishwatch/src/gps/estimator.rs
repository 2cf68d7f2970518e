//! Course and smoothed speed from consecutive fixes.

use std::collections::VecDeque;
use std::time::Duration;

use crate::geo::{course_rad, haversine_m, CourseMode, PositionFix};

/// Default number of speed samples averaged.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 10;

/// Fixed-capacity FIFO of instantaneous speeds, in m/s.
#[derive(Debug, Clone)]
pub struct SpeedWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SpeedWindow {
    /// Create a window. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, speed_mps: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(speed_mps);
    }

    /// Arithmetic mean of the held samples, 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SpeedWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}

/// Values derived from one pair of fixes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseSpeed {
    /// Course over ground, radians in `[0, 2π)`.
    pub course_rad: f64,
    /// Speed between the two fixes, m/s.
    pub instantaneous_mps: f64,
    /// Mean of the speed window after this sample, m/s.
    pub smoothed_mps: f64,
}

/// Turns a stream of fixes into course and smoothed speed.
///
/// Fixes are assumed to be one `interval` apart.
#[derive(Debug, Clone)]
pub struct CourseSpeedEstimator {
    previous: Option<PositionFix>,
    window: SpeedWindow,
    interval_secs: f64,
    mode: CourseMode,
}

impl CourseSpeedEstimator {
    pub fn new(interval: Duration, smoothing_window: usize, mode: CourseMode) -> Self {
        Self {
            previous: None,
            window: SpeedWindow::new(smoothing_window),
            interval_secs: interval.as_secs_f64(),
            mode,
        }
    }

    /// Record a fix.
    ///
    /// Returns `None` for the very first fix. The fix always becomes the new
    /// reference point.
    pub fn update(&mut self, fix: PositionFix) -> Option<CourseSpeed> {
        let derived = self.previous.map(|previous| {
            let distance_m = haversine_m(previous.lat_lon(), fix.lat_lon());
            let instantaneous_mps = if self.interval_secs > 0.0 {
                distance_m / self.interval_secs
            } else {
                0.0
            };
            self.window.push(instantaneous_mps);

            CourseSpeed {
                course_rad: course_rad(previous.lat_lon(), fix.lat_lon(), self.mode),
                instantaneous_mps,
                smoothed_mps: self.window.mean(),
            }
        });

        self.previous = Some(fix);
        derived
    }

    pub fn window(&self) -> &SpeedWindow {
        &self.window
    }
}

//! Terminal GPS polling and course/speed derivation.
//!
//! The terminal can report its own position. When enabled, [`GpsPoller`]
//! republishes every fix as `navigation.position` and feeds consecutive fixes
//! to [`CourseSpeedEstimator`], which publishes course over ground and a
//! moving-average speed over ground.

mod estimator;
mod poller;

pub use estimator::{CourseSpeed, CourseSpeedEstimator, SpeedWindow, DEFAULT_SMOOTHING_WINDOW};
pub use poller::{GpsPoller, GpsPollerConfig, DEFAULT_GPS_POLL_INTERVAL};

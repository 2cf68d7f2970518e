//! Movement detection and automatic stow/unstow.
//!
//! ```text
//! position feed ──► MovementTracker ──(once per sample interval)──► distance over window
//!                                                                        │
//!                         latest LinkHealth + stow_requested ──► decide() ──► StowController ──► DeviceLink
//! ```
//!
//! The vessel is judged to be moving when the distance covered across a full
//! window of samples reaches the policy threshold. While moving, a deployed
//! terminal is stowed; once stationary again, a terminal we stowed ourselves
//! is unstowed. A terminal stowed by someone else is left alone.

mod stow;
mod task;
mod tracker;

pub use stow::{decide, StowController, StowDecision, StowPolicy, StowState, DEFAULT_STOW_DISTANCE_NM};
pub use task::{MovementTask, MovementTaskConfig, DEFAULT_SAMPLE_INTERVAL};
pub use tracker::{MovementTracker, MovementWindow, DEFAULT_MOVEMENT_WINDOW};

/// Errors raised while admitting position samples.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    /// The sample came from a different producer than the latched one.
    #[error("Position from '{actual}' ignored, tracking '{expected}'")]
    SourceMismatch { expected: String, actual: String },
}

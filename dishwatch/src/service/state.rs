//! State shared between the monitor's periodic tasks.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::movement::StowState;
use crate::status::{LinkHealth, NotificationLevel, NotificationState, StatusSnapshot};

/// Handle to the monitor state.
///
/// One lock guards everything. The movement task holds it for the whole
/// stow decision so the classification it reads cannot change underneath it.
pub type SharedState = Arc<Mutex<MonitorState>>;

/// Running totals, mostly for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorCounters {
    pub status_polls: u64,
    pub status_failures: u64,
    pub gps_polls: u64,
    pub gps_failures: u64,
    pub feed_samples: u64,
    pub feed_rejected: u64,
    pub stow_commands: u64,
    pub unstow_commands: u64,
    pub command_failures: u64,
}

#[derive(Debug)]
pub struct MonitorState {
    /// Latest classification; `None` until the first successful poll.
    pub health: Option<LinkHealth>,
    pub last_snapshot: Option<StatusSnapshot>,
    /// Set when we issued the last stow, cleared when we issue an unstow.
    pub stow_requested: bool,
    pub notification: NotificationState,
    pub counters: MonitorCounters,
}

impl MonitorState {
    pub fn new(outage_level: NotificationLevel) -> Self {
        Self::with_notification(NotificationState::new(outage_level))
    }

    pub fn with_notification(notification: NotificationState) -> Self {
        Self {
            health: None,
            last_snapshot: None,
            stow_requested: false,
            notification,
            counters: MonitorCounters::default(),
        }
    }

    pub fn shared(outage_level: NotificationLevel) -> SharedState {
        Arc::new(Mutex::new(Self::new(outage_level)))
    }

    pub fn stow_state(&self) -> StowState {
        StowState::derive(self.health.as_ref(), self.stow_requested)
    }
}

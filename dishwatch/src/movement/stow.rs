//! Stow state machine.

use std::sync::Arc;

use crate::device::{DeviceConnector, DeviceError, DeviceLink};
use crate::service::MonitorState;
use crate::status::LinkHealth;

/// Default distance over a full window at which the vessel counts as moving.
pub const DEFAULT_STOW_DISTANCE_NM: f64 = 0.15;

/// Stow state as seen by the controller.
///
/// Derived from the latest classification plus our own stow flag; never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StowState {
    /// No successful status poll yet.
    Unknown,
    Online,
    /// Stowed, and the last stow command was ours.
    StowedBySelf,
    /// Stowed by someone else.
    StowedExternal,
    /// Any other outage.
    Outage(String),
}

impl StowState {
    pub fn derive(health: Option<&LinkHealth>, stow_requested: bool) -> Self {
        match health {
            None => Self::Unknown,
            Some(LinkHealth::Online) => Self::Online,
            Some(h) if h.is_stowed() && stow_requested => Self::StowedBySelf,
            Some(h) if h.is_stowed() => Self::StowedExternal,
            Some(LinkHealth::Outage { cause }) => Self::Outage(cause.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StowPolicy {
    /// Stow automatically while under way.
    pub stow_while_moving: bool,
    pub distance_threshold_nm: f64,
}

impl Default for StowPolicy {
    fn default() -> Self {
        Self {
            stow_while_moving: false,
            distance_threshold_nm: DEFAULT_STOW_DISTANCE_NM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StowDecision {
    Stow,
    Unstow,
    Hold,
}

/// Decide what to do given the distance over a full window.
///
/// | moving | state          | decision |
/// |--------|----------------|----------|
/// | yes    | Online         | Stow     |
/// | yes    | anything else  | Hold     |
/// | no     | StowedBySelf   | Unstow   |
/// | no     | anything else  | Hold     |
///
/// "Moving" requires `stow_while_moving`; with it disabled the vessel is
/// always treated as stationary, so a self-initiated stow is still undone.
pub fn decide(policy: &StowPolicy, distance_nm: f64, state: &StowState) -> StowDecision {
    let moving = policy.stow_while_moving && distance_nm >= policy.distance_threshold_nm;

    match (moving, state) {
        (true, StowState::Online) => StowDecision::Stow,
        (false, StowState::StowedBySelf) => StowDecision::Unstow,
        _ => StowDecision::Hold,
    }
}

/// Applies [`decide`] and issues the resulting command.
pub struct StowController<K: DeviceConnector> {
    link: Arc<DeviceLink<K>>,
    policy: StowPolicy,
}

impl<K: DeviceConnector> StowController<K> {
    pub fn new(link: Arc<DeviceLink<K>>, policy: StowPolicy) -> Self {
        Self { link, policy }
    }

    pub fn policy(&self) -> &StowPolicy {
        &self.policy
    }

    /// Run one decision cycle against the locked monitor state.
    ///
    /// The stow flag only changes when the command succeeds; a failed command
    /// is simply decided again next cycle.
    pub async fn evaluate(
        &self,
        distance_nm: f64,
        state: &mut MonitorState,
    ) -> Result<StowDecision, DeviceError> {
        let stow_state = state.stow_state();
        let decision = decide(&self.policy, distance_nm, &stow_state);

        tracing::debug!(
            distance_nm,
            threshold_nm = self.policy.distance_threshold_nm,
            state = ?stow_state,
            decision = ?decision,
            "Stow decision"
        );

        let unstow = match decision {
            StowDecision::Hold => return Ok(decision),
            StowDecision::Stow => false,
            StowDecision::Unstow => true,
        };

        match self.link.set_stow(unstow).await {
            Ok(()) => {
                state.stow_requested = !unstow;
                if unstow {
                    state.counters.unstow_commands += 1;
                    tracing::info!(distance_nm, "Vessel stationary, unstowing terminal");
                } else {
                    state.counters.stow_commands += 1;
                    tracing::info!(distance_nm, "Vessel moving, stowing terminal");
                }
                Ok(decision)
            }
            Err(e) => {
                state.counters.command_failures += 1;
                tracing::warn!(
                    error = %e,
                    command = if unstow { "unstow" } else { "stow" },
                    "Stow command failed"
                );
                Err(e)
            }
        }
    }
}

//! Failure accounting for the device connection.
//!
//! # State Machine
//!
//! ```text
//! Closed --[consecutive failures >= threshold]--> Open
//! Open   --[reset() after reconnect]-----------> Closed
//! any    --[success]---------------------------> Closed (counter = 0)
//! ```
//!
//! Open means "the current connection handle is presumed dead". The breaker
//! only keeps the books; [`DeviceLink`](super::DeviceLink) acts on the
//! transition by recreating the handle and calling [`ConnectionBreaker::reset`].

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Connection trusted; failures are being counted.
    Closed,
    /// Threshold reached; the connection must be recreated.
    Open,
}

/// Consecutive-failure counter with a trip threshold.
#[derive(Debug, Clone)]
pub struct ConnectionBreaker {
    threshold: u32,
    consecutive_failures: u32,
    state: BreakerState,
}

impl ConnectionBreaker {
    /// Default number of consecutive failures tolerated before reconnecting.
    pub const DEFAULT_THRESHOLD: u32 = 10;

    /// Create a breaker. A threshold of 0 is treated as 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive_failures: 0,
            state: BreakerState::Closed,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn state(&self) -> BreakerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == BreakerState::Open
    }

    /// Any success closes the breaker and clears the streak.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.state = BreakerState::Closed;
    }

    /// Count a failure and return the resulting state.
    pub fn record_failure(&mut self) -> BreakerState {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures >= self.threshold {
            self.state = BreakerState::Open;
        }
        self.state
    }

    /// Close the breaker after the connection has been recreated.
    pub fn reset(&mut self) {
        self.consecutive_failures = 0;
        self.state = BreakerState::Closed;
    }
}

impl Default for ConnectionBreaker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let breaker = ConnectionBreaker::default();
        assert_eq!(breaker.state(), BreakerState::Closed);
        assert_eq!(breaker.consecutive_failures(), 0);
        assert_eq!(breaker.threshold(), 10);
    }

    #[test]
    fn test_opens_at_threshold() {
        let mut breaker = ConnectionBreaker::new(3);
        assert_eq!(breaker.record_failure(), BreakerState::Closed);
        assert_eq!(breaker.record_failure(), BreakerState::Closed);
        assert_eq!(breaker.record_failure(), BreakerState::Open);
        assert!(breaker.is_open());
    }

    #[test]
    fn test_success_clears_streak() {
        let mut breaker = ConnectionBreaker::new(3);
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_success();
        assert_eq!(breaker.consecutive_failures(), 0);

        // Needs a full new streak to trip
        assert_eq!(breaker.record_failure(), BreakerState::Closed);
        assert_eq!(breaker.record_failure(), BreakerState::Closed);
        assert_eq!(breaker.record_failure(), BreakerState::Open);
    }

    #[test]
    fn test_reset_closes() {
        let mut breaker = ConnectionBreaker::new(1);
        assert_eq!(breaker.record_failure(), BreakerState::Open);
        breaker.reset();
        assert_eq!(breaker.state(), BreakerState::Closed);
        assert_eq!(breaker.consecutive_failures(), 0);
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let mut breaker = ConnectionBreaker::new(0);
        assert_eq!(breaker.threshold(), 1);
        assert_eq!(breaker.record_failure(), BreakerState::Open);
    }
}

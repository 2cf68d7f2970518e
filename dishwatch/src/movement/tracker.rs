//! Position history and distance over the window.

use std::collections::VecDeque;

use super::MovementError;
use crate::feed::SourcedPosition;
use crate::geo::{cosine_law_nm, PositionFix};

/// Default number of samples in the movement window.
pub const DEFAULT_MOVEMENT_WINDOW: usize = 10;

/// Fixed-capacity history of fixes, newest first.
#[derive(Debug, Clone)]
pub struct MovementWindow {
    fixes: VecDeque<PositionFix>,
    capacity: usize,
}

impl MovementWindow {
    /// Create a window. Capacities below 2 are raised to 2 so a distance can
    /// always be formed.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            fixes: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, fix: PositionFix) {
        self.fixes.push_front(fix);
        self.fixes.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.fixes.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest fix.
    pub fn latest(&self) -> Option<&PositionFix> {
        self.fixes.front()
    }

    /// Sum of distances between consecutive fixes, in nautical miles.
    ///
    /// `None` until the window is full.
    pub fn distance_nm(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        let total = self
            .fixes
            .iter()
            .zip(self.fixes.iter().skip(1))
            .map(|(newer, older)| cosine_law_nm(older.lat_lon(), newer.lat_lon()))
            .sum();
        Some(total)
    }
}

impl Default for MovementWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MOVEMENT_WINDOW)
    }
}

/// Samples the external feed into a [`MovementWindow`].
///
/// Samples may arrive at any rate; [`admit`](Self::admit) keeps only the most
/// recent one and [`commit`](Self::commit) moves it into the window once per
/// sample interval.
#[derive(Debug, Clone)]
pub struct MovementTracker {
    window: MovementWindow,
    source: Option<String>,
    pending: Option<PositionFix>,
    rejected: u64,
}

impl MovementTracker {
    /// Create a tracker. With `source` set, only that producer is accepted;
    /// otherwise the first producer seen is latched.
    pub fn new(window: usize, source: Option<String>) -> Self {
        Self {
            window: MovementWindow::new(window),
            source: source.filter(|s| !s.trim().is_empty()),
            pending: None,
            rejected: 0,
        }
    }

    /// Accept a sample from the feed.
    pub fn admit(&mut self, position: SourcedPosition) -> Result<(), MovementError> {
        match &self.source {
            Some(expected) if *expected != position.source => {
                self.rejected += 1;
                return Err(MovementError::SourceMismatch {
                    expected: expected.clone(),
                    actual: position.source,
                });
            }
            Some(_) => {}
            None => {
                tracing::info!(source = %position.source, "Latched position source");
                self.source = Some(position.source.clone());
            }
        }

        self.pending = Some(position.fix());
        Ok(())
    }

    /// Move the latest admitted sample into the window and return the
    /// distance over the window, if full.
    ///
    /// Without a new sample since the last commit the window is left as is
    /// and `None` is returned, so a silent feed never triggers a decision.
    pub fn commit(&mut self) -> Option<f64> {
        let fix = self.pending.take()?;
        self.window.push(fix);
        self.window.distance_nm()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn window(&self) -> &MovementWindow {
        &self.window
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

impl Default for MovementTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MOVEMENT_WINDOW, None)
    }
}

//! Periodic task runner.
//!
//! Each task gets its own `tokio::time::interval`. A tick is awaited to
//! completion before the timer is polled again, so a slow request only delays
//! its own timer (missed ticks are skipped, never queued). Cancellation is
//! checked between ticks; a tick already in flight finishes and is told about
//! the cancellation so it can discard its results.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// A unit of work repeated on a fixed period.
pub trait PeriodicTask: Send + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Time between tick starts.
    fn period(&self) -> Duration;

    /// Run one cycle.
    ///
    /// Implementations must not publish anything once `cancellation` has fired.
    fn tick(&mut self, cancellation: &CancellationToken) -> impl Future<Output = ()> + Send;
}

/// Spawn a task that ticks until `cancellation` fires.
///
/// The first tick runs immediately.
pub fn spawn_periodic<T: PeriodicTask>(mut task: T, cancellation: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = task.name();
        let mut ticker = tokio::time::interval(task.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::debug!(
            task = name,
            period_ms = task.period().as_millis() as u64,
            "Periodic task started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => break,
                _ = ticker.tick() => {}
            }

            task.tick(&cancellation).await;
        }

        tracing::debug!(task = name, "Periodic task stopped");
    })
}

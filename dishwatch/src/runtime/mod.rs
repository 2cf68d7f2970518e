//! Task scheduling for the long-running monitor.
//!
//! Every poller is a [`PeriodicTask`] driven by its own timer. Timers share
//! nothing but a [`CancellationToken`](tokio_util::sync::CancellationToken);
//! cross-task state lives in the service layer behind a single mutex.
//!
//! ```text
//! spawn_periodic(StatusPoller) ──┐
//! spawn_periodic(GpsPoller) ─────┼── cancellation.cancel() stops all timers
//! MovementTask::start() ─────────┘
//! ```

mod periodic;

pub use periodic::{spawn_periodic, PeriodicTask};

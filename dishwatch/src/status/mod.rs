//! Terminal status polling, classification and health notification.
//!
//! # Components
//!
//! - [`snapshot`] - `StatusSnapshot` built from each successful poll, and the
//!   `LinkHealth` classification (online / outage with cause)
//! - [`notification`] - `NotificationState`, the debounced health notification
//! - [`poller`] - `StatusPoller`, the periodic task tying them together

mod notification;
mod poller;
mod snapshot;

pub use notification::{
    AlertMethod, NotificationLevel, NotificationRecord, NotificationState, DEFAULT_PROVIDER_NAME,
};
pub use poller::{StatusPoller, StatusPollerConfig, DEFAULT_STATUS_POLL_INTERVAL};
pub use snapshot::{LinkHealth, StatusSnapshot, STOWED_CAUSE};

//! Serialized, self-healing access to the terminal.

use tokio::sync::Mutex;

use super::breaker::{BreakerState, ConnectionBreaker};
use super::client::{DeviceClient, DeviceConnector};
use super::error::DeviceError;
use super::model::{DeviceLocation, DeviceStatus};

struct LinkInner<C> {
    /// Current handle; `None` until first use or after a failed reconnect.
    client: Option<C>,
    breaker: ConnectionBreaker,
    reconnects: u64,
}

/// Shared link to the terminal.
///
/// All requests go through one async mutex, so at most one request is in
/// flight and the failure counter and connection handle are never updated
/// concurrently. There is no per-request retry: a failed request is reported
/// to the caller, which simply waits for its next tick.
pub struct DeviceLink<K: DeviceConnector> {
    connector: K,
    inner: Mutex<LinkInner<K::Client>>,
}

impl<K: DeviceConnector> DeviceLink<K> {
    /// Create a link. The first connection is made lazily on first request.
    pub fn new(connector: K, reconnect_threshold: u32) -> Self {
        Self {
            connector,
            inner: Mutex::new(LinkInner {
                client: None,
                breaker: ConnectionBreaker::new(reconnect_threshold),
                reconnects: 0,
            }),
        }
    }

    pub async fn status(&self) -> Result<DeviceStatus, DeviceError> {
        let mut inner = self.inner.lock().await;
        let result = match Self::client(&self.connector, &mut inner) {
            Ok(client) => client.get_status().await,
            Err(e) => Err(e),
        };
        self.settle(&mut inner, "get_status", &result);
        result
    }

    pub async fn location(&self) -> Result<DeviceLocation, DeviceError> {
        let mut inner = self.inner.lock().await;
        let result = match Self::client(&self.connector, &mut inner) {
            Ok(client) => client.get_location().await,
            Err(e) => Err(e),
        };
        self.settle(&mut inner, "get_location", &result);
        result
    }

    /// Stow (`unstow = false`) or deploy (`unstow = true`) the antenna.
    pub async fn set_stow(&self, unstow: bool) -> Result<(), DeviceError> {
        let mut inner = self.inner.lock().await;
        let result = match Self::client(&self.connector, &mut inner) {
            Ok(client) => client.set_stow(unstow).await,
            Err(e) => Err(e),
        };
        self.settle(&mut inner, if unstow { "unstow" } else { "stow" }, &result);
        result
    }

    /// Number of times the connection has been recreated after tripping.
    pub async fn reconnects(&self) -> u64 {
        self.inner.lock().await.reconnects
    }

    pub async fn consecutive_failures(&self) -> u32 {
        self.inner.lock().await.breaker.consecutive_failures()
    }

    fn client<'a>(
        connector: &K,
        inner: &'a mut LinkInner<K::Client>,
    ) -> Result<&'a K::Client, DeviceError> {
        let client = match inner.client.take() {
            Some(client) => client,
            None => connector.connect()?,
        };
        Ok(inner.client.insert(client))
    }

    fn settle<T>(
        &self,
        inner: &mut LinkInner<K::Client>,
        operation: &'static str,
        result: &Result<T, DeviceError>,
    ) {
        match result {
            Ok(_) => {
                if inner.breaker.consecutive_failures() > 0 {
                    tracing::debug!(
                        operation,
                        failures = inner.breaker.consecutive_failures(),
                        "Device link recovered"
                    );
                }
                inner.breaker.record_success();
            }
            Err(e) if e.counts_as_link_failure() => {
                let state = inner.breaker.record_failure();
                tracing::warn!(
                    operation,
                    error = %e,
                    consecutive_failures = inner.breaker.consecutive_failures(),
                    threshold = inner.breaker.threshold(),
                    "Device request failed"
                );

                if state == BreakerState::Open {
                    self.reconnect(inner);
                }
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "Device rejected request");
            }
        }
    }

    fn reconnect(&self, inner: &mut LinkInner<K::Client>) {
        inner.client = None;
        inner.reconnects += 1;
        inner.breaker.reset();

        match self.connector.connect() {
            Ok(client) => {
                inner.client = Some(client);
                tracing::info!(
                    reconnects = inner.reconnects,
                    "Recreated device connection after repeated failures"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Device reconnect failed, will retry on next request"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    /// Scripted outcomes shared by every client a connector hands out.
    #[derive(Clone, Default)]
    struct Script {
        outcomes: Arc<StdMutex<VecDeque<bool>>>,
        connects: Arc<AtomicUsize>,
        stow_calls: Arc<StdMutex<Vec<bool>>>,
    }

    impl Script {
        fn push(&self, ok: bool, times: usize) {
            let mut outcomes = self.outcomes.lock().unwrap();
            for _ in 0..times {
                outcomes.push_back(ok);
            }
        }

        fn next(&self) -> Result<(), DeviceError> {
            match self.outcomes.lock().unwrap().pop_front() {
                Some(true) | None => Ok(()),
                Some(false) => Err(DeviceError::Transport("connection reset".into())),
            }
        }

        fn connects(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }
    }

    struct ScriptClient(Script);

    impl DeviceClient for ScriptClient {
        async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
            self.0.next().map(|_| DeviceStatus::default())
        }

        async fn get_location(&self) -> Result<DeviceLocation, DeviceError> {
            self.0.next().map(|_| DeviceLocation {
                latitude: 1.0,
                longitude: 2.0,
                altitude: None,
            })
        }

        async fn set_stow(&self, unstow: bool) -> Result<(), DeviceError> {
            self.0.stow_calls.lock().unwrap().push(unstow);
            self.0.next()
        }
    }

    struct ScriptConnector(Script);

    impl DeviceConnector for ScriptConnector {
        type Client = ScriptClient;

        fn connect(&self) -> Result<ScriptClient, DeviceError> {
            self.0.connects.fetch_add(1, Ordering::SeqCst);
            Ok(ScriptClient(self.0.clone()))
        }
    }

    fn link(threshold: u32) -> (DeviceLink<ScriptConnector>, Script) {
        let script = Script::default();
        (
            DeviceLink::new(ScriptConnector(script.clone()), threshold),
            script,
        )
    }

    #[tokio::test]
    async fn test_connects_lazily_once() {
        let (link, script) = link(3);
        assert_eq!(script.connects(), 0);

        link.status().await.unwrap();
        link.location().await.unwrap();
        assert_eq!(script.connects(), 1);
        assert_eq!(link.reconnects().await, 0);
    }

    #[tokio::test]
    async fn test_reconnects_once_per_threshold_failures() {
        let (link, script) = link(5);
        script.push(false, 12);

        for _ in 0..12 {
            assert!(link.status().await.is_err());
        }

        // 12 failures with threshold 5: trips at 5 and 10
        assert_eq!(link.reconnects().await, 2);
        assert_eq!(link.consecutive_failures().await, 2);
        assert_eq!(script.connects(), 3);
    }

    #[tokio::test]
    async fn test_success_resets_counter() {
        let (link, script) = link(3);
        script.push(false, 2);
        script.push(true, 1);
        script.push(false, 2);

        for _ in 0..5 {
            let _ = link.status().await;
        }

        assert_eq!(link.consecutive_failures().await, 2);
        assert_eq!(link.reconnects().await, 0);
    }

    #[tokio::test]
    async fn test_failures_across_operations_share_counter() {
        let (link, script) = link(3);
        script.push(false, 3);

        let _ = link.status().await;
        let _ = link.location().await;
        let _ = link.set_stow(false).await;

        assert_eq!(link.reconnects().await, 1);
        assert_eq!(link.consecutive_failures().await, 0);
        assert_eq!(*script.stow_calls.lock().unwrap(), vec![false]);
    }

    /// Answers every location request with the given HTTP status.
    struct RejectingClient(u16);

    impl DeviceClient for RejectingClient {
        async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
            Ok(DeviceStatus::default())
        }

        async fn get_location(&self) -> Result<DeviceLocation, DeviceError> {
            Err(DeviceError::Rejected {
                status: self.0,
                message: "location access disabled".into(),
            })
        }

        async fn set_stow(&self, _unstow: bool) -> Result<(), DeviceError> {
            Ok(())
        }
    }

    struct RejectingConnector(u16);

    impl DeviceConnector for RejectingConnector {
        type Client = RejectingClient;

        fn connect(&self) -> Result<RejectingClient, DeviceError> {
            Ok(RejectingClient(self.0))
        }
    }

    #[tokio::test]
    async fn test_rejections_do_not_trip() {
        let link = DeviceLink::new(RejectingConnector(403), 2);

        for _ in 0..5 {
            assert!(matches!(
                link.location().await,
                Err(DeviceError::Rejected { status: 403, .. })
            ));
        }

        assert_eq!(link.reconnects().await, 0);
        assert_eq!(link.consecutive_failures().await, 0);
    }

    #[tokio::test]
    async fn test_gateway_error_streak_reconnects() {
        let link = DeviceLink::new(RejectingConnector(502), 3);

        for _ in 0..7 {
            assert!(matches!(
                link.location().await,
                Err(DeviceError::Rejected { status: 502, .. })
            ));
        }

        // Trips at 3 and 6
        assert_eq!(link.reconnects().await, 2);
        assert_eq!(link.consecutive_failures().await, 1);
    }
}

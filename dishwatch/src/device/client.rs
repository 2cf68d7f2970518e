//! Transport traits and the JSON gateway implementation.
//!
//! The [`DeviceClient`] trait is the whole contract the core relies on: three
//! operations that either answer or fail with a [`DeviceError`]. A
//! [`DeviceConnector`] produces fresh clients; dropping a client and asking
//! the connector for another is what "reconnect" means.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::error::DeviceError;
use super::model::{DeviceLocation, DeviceStatus};

/// Default gateway endpoint in front of the terminal's `Handle` RPC.
pub const DEFAULT_DEVICE_URL: &str = "http://192.168.100.1:9201/handle";

/// Default bound on a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Operations consumed from the terminal.
pub trait DeviceClient: Send + Sync {
    /// Fetch the current status.
    fn get_status(&self) -> impl Future<Output = Result<DeviceStatus, DeviceError>> + Send;

    /// Fetch the terminal's GPS position (requires location access enabled on the dish).
    fn get_location(&self) -> impl Future<Output = Result<DeviceLocation, DeviceError>> + Send;

    /// Stow (`unstow = false`) or deploy (`unstow = true`) the antenna.
    fn set_stow(&self, unstow: bool) -> impl Future<Output = Result<(), DeviceError>> + Send;
}

/// Factory for connection handles.
pub trait DeviceConnector: Send + Sync {
    type Client: DeviceClient;

    /// Create a new connection handle.
    fn connect(&self) -> Result<Self::Client, DeviceError>;
}

#[derive(Deserialize)]
struct StatusResponse {
    dish_get_status: DeviceStatus,
}

#[derive(Deserialize)]
struct LocationResponse {
    get_location: LocationBody,
}

#[derive(Deserialize)]
struct LocationBody {
    lla: Lla,
}

#[derive(Deserialize)]
struct Lla {
    lat: f64,
    lon: f64,
    #[serde(default)]
    alt: Option<f64>,
}

/// Connector for the JSON gateway.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    url: String,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_URL, DEFAULT_REQUEST_TIMEOUT)
    }
}

impl DeviceConnector for HttpConnector {
    type Client = HttpDeviceClient;

    fn connect(&self) -> Result<HttpDeviceClient, DeviceError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(|e| DeviceError::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(url = %self.url, "Created device connection");

        Ok(HttpDeviceClient {
            http,
            url: self.url.clone(),
        })
    }
}

/// Client that POSTs JSON requests to the gateway.
///
/// Owns its own `reqwest::Client`, so dropping it discards the connection pool.
pub struct HttpDeviceClient {
    http: reqwest::Client,
    url: String,
}

impl HttpDeviceClient {
    async fn call<T: DeserializeOwned>(&self, body: serde_json::Value) -> Result<T, DeviceError> {
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeviceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DeviceError::Rejected {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DeviceError::Transport(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| DeviceError::Decode(e.to_string()))
    }
}

impl DeviceClient for HttpDeviceClient {
    async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
        let response: StatusResponse = self.call(json!({ "get_status": {} })).await?;
        Ok(response.dish_get_status)
    }

    async fn get_location(&self) -> Result<DeviceLocation, DeviceError> {
        let response: LocationResponse = self.call(json!({ "get_location": {} })).await?;
        let lla = response.get_location.lla;
        Ok(DeviceLocation {
            latitude: lla.lat,
            longitude: lla.lon,
            altitude: lla.alt,
        })
    }

    async fn set_stow(&self, unstow: bool) -> Result<(), DeviceError> {
        let _: serde_json::Value = self
            .call(json!({ "dish_stow": { "unstow": unstow } }))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_creates_client() {
        let connector = HttpConnector::default();
        assert_eq!(connector.url(), DEFAULT_DEVICE_URL);

        let client = connector.connect().unwrap();
        assert_eq!(client.url, DEFAULT_DEVICE_URL);
    }

    #[test]
    fn test_status_response_deserialize() {
        let json = r#"{"dish_get_status": {"outage": {"cause": "OBSTRUCTED"}}}"#;
        let response: StatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.dish_get_status.outage.unwrap().cause, "OBSTRUCTED");
    }

    #[test]
    fn test_location_response_deserialize() {
        let json = r#"{"get_location": {"lla": {"lat": 47.6062, "lon": -122.3321, "alt": 12.5}, "source": "GNC_FUSED"}}"#;
        let response: LocationResponse = serde_json::from_str(json).unwrap();
        assert!((response.get_location.lla.lat - 47.6062).abs() < 1e-9);
        assert_eq!(response.get_location.lla.alt, Some(12.5));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let connector = HttpConnector::new("http://127.0.0.1:9/handle", Duration::from_secs(2));
        let client = connector.connect().unwrap();

        let err = client.get_status().await.unwrap_err();
        assert!(matches!(err, DeviceError::Transport(_)));
        assert!(err.counts_as_link_failure());
    }
}

//! Error types for device requests.

use thiserror::Error;

/// Errors returned by device requests.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The request never produced a response (refused, reset, timed out).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A connection handle could not be created.
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The terminal answered but refused the request.
    #[error("Device rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl DeviceError {
    /// Whether this failure says something about the health of the connection.
    ///
    /// A client-side refusal (4xx other than 408 and 429) proves the terminal
    /// is reachable, so it neither counts toward a reconnect nor resets the
    /// failure streak. Gateway errors (5xx), timeouts and throttling count
    /// like any transport failure.
    pub fn counts_as_link_failure(&self) -> bool {
        match self {
            DeviceError::Rejected { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_failure_classification() {
        assert!(DeviceError::Transport("reset".into()).counts_as_link_failure());
        assert!(DeviceError::Decode("eof".into()).counts_as_link_failure());
        assert!(DeviceError::Connect {
            url: "http://x".into(),
            reason: "tls".into()
        }
        .counts_as_link_failure());
        assert!(!DeviceError::Rejected {
            status: 403,
            message: "location disabled".into()
        }
        .counts_as_link_failure());
    }

    #[test]
    fn test_gateway_errors_count_as_link_failures() {
        let rejected = |status| DeviceError::Rejected {
            status,
            message: String::new(),
        };

        for status in [500, 502, 503, 504, 408, 429] {
            assert!(rejected(status).counts_as_link_failure(), "HTTP {}", status);
        }
        for status in [400, 401, 403, 404] {
            assert!(!rejected(status).counts_as_link_failure(), "HTTP {}", status);
        }
    }
}

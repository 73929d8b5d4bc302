//! Gateway trait and transport error type

use async_trait::async_trait;

use crate::domain::{ReferenceDataset, SaveAck, SolverResult};

use super::resource::{FetchParams, Resource};

/// Raw JSON body of a fetched resource
pub type Payload = serde_json::Value;

/// Body the local proxy returns when it cannot reach the backend
pub const BACKEND_UNAVAILABLE: &str = "Backend server not available";

/// Stateless gateway to the backend and the static origin.
///
/// Every failure resolves to a `TransportError` value so callers can build
/// fallback chains with plain matching.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch a snapshot or reference collection
    async fn fetch_resource(&self, resource: &Resource, params: &FetchParams) -> Result<Payload, TransportError>;

    /// Push all three reference collections (`POST /api/save-data`)
    async fn persist_reference_data(&self, dataset: &ReferenceDataset) -> Result<SaveAck, TransportError>;

    /// Ask the backend to recompute the schedule (`POST /api/generate`).
    /// `None` sends no payload and relies on server-held data.
    async fn request_regeneration(&self, dataset: Option<&ReferenceDataset>) -> Result<SolverResult, TransportError>;
}

/// Errors that can occur while talking to the backend or static origin
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// Backend process cannot be reached at all
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with a non-success status or `{success: false}`
    #[error("Request rejected (status {status:?}): {}", .message.as_deref().unwrap_or("no detail"))]
    Rejected { status: Option<u16>, message: Option<String> },

    /// Backend accepted the connection but did not answer in time
    #[error("Request timed out: {0}")]
    TimedOut(String),

    /// Resource does not exist on the origin
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    pub fn rejected(status: Option<u16>, message: Option<String>) -> Self {
        TransportError::Rejected { status, message }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Unreachable(_))
    }

    /// Classify a non-success HTTP answer. The proxy's "backend not
    /// available" body means the backend itself was unreachable.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match message.as_deref() {
            Some(BACKEND_UNAVAILABLE) => TransportError::Unreachable(BACKEND_UNAVAILABLE.to_string()),
            _ if status == 404 => TransportError::NotFound(message.unwrap_or_else(|| "404".to_string())),
            _ => TransportError::Rejected {
                status: Some(status),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            TransportError::Unreachable(e.to_string())
        } else if e.is_timeout() {
            TransportError::TimedOut(e.to_string())
        } else if e.is_decode() {
            TransportError::Malformed(e.to_string())
        } else if e.is_status() {
            TransportError::Rejected {
                status: e.status().map(|s| s.as_u16()),
                message: Some(e.to_string()),
            }
        } else if e.is_body() || e.is_request() {
            // connection was made, the exchange broke off midway
            TransportError::rejected(None, Some(e.to_string()))
        } else {
            TransportError::Unreachable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display_with_message() {
        let err = TransportError::rejected(Some(500), Some("solver timeout".to_string()));
        assert_eq!(err.to_string(), "Request rejected (status Some(500)): solver timeout");
    }

    #[test]
    fn test_rejected_display_without_message() {
        let err = TransportError::rejected(None, None);
        assert!(err.to_string().contains("no detail"));
    }

    #[test]
    fn test_from_status_proxy_unavailable() {
        let err = TransportError::from_status(500, Some(BACKEND_UNAVAILABLE.to_string()));
        assert!(err.is_unreachable());
    }

    #[test]
    fn test_from_status_not_found() {
        let err = TransportError::from_status(404, None);
        assert!(matches!(err, TransportError::NotFound(_)));
    }

    #[test]
    fn test_timed_out_is_not_unreachable() {
        let err = TransportError::TimedOut("operation timed out".to_string());
        assert!(!err.is_unreachable());
        assert_eq!(err.to_string(), "Request timed out: operation timed out");
    }

    #[test]
    fn test_from_status_other() {
        let err = TransportError::from_status(500, Some("disk full".to_string()));
        assert_eq!(err, TransportError::rejected(Some(500), Some("disk full".to_string())));
        assert!(!err.is_unreachable());
    }
}

//! reqwest-backed gateway
//!
//! Talks to the scheduling backend (`/api/data`, `/api/save-data`,
//! `/api/generate`) and reads static fallback files either from an HTTP
//! origin or from a local directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ReferenceDataset, SaveAck, SolverResult};
use crate::error::{Result, RotaError};

use super::client::{Gateway, Payload, TransportError};
use super::resource::{FetchParams, Resource, StaticResource};

/// Default backend base URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Where the static fallback files live
#[derive(Debug, Clone, PartialEq)]
pub enum StaticOrigin {
    /// Served over HTTP by the application's own origin
    Http(String),
    /// Read straight from a directory
    Dir(PathBuf),
}

/// Configuration for the HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub backend_url: String,
    /// Overrides `{backend_url}/api/generate`, e.g. to go through the local proxy
    pub generate_url: Option<String>,
    pub static_origin: StaticOrigin,
    pub timeout: Duration,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            generate_url: None,
            static_origin: StaticOrigin::Http("http://localhost:3000".to_string()),
            timeout: Duration::from_secs(300),
        }
    }
}

impl HttpGatewayConfig {
    /// Create a config pointing at a specific backend
    pub fn with_backend(url: impl Into<String>) -> Self {
        Self {
            backend_url: url.into(),
            ..Default::default()
        }
    }
}

/// Gateway implementation over HTTP
pub struct HttpGateway {
    client: Client,
    config: HttpGatewayConfig,
}

fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RotaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpGatewayConfig {
        &self.config
    }

    pub fn generate_url(&self) -> String {
        self.config
            .generate_url
            .clone()
            .unwrap_or_else(|| format!("{}/api/generate", trim_base(&self.config.backend_url)))
    }

    pub fn save_url(&self) -> String {
        format!("{}/api/save-data", trim_base(&self.config.backend_url))
    }

    /// Absolute URL of a resource, or `None` for a directory-backed static file
    pub fn resource_url(&self, resource: &Resource) -> Option<String> {
        match (resource, &self.config.static_origin) {
            (Resource::Api(_), _) => Some(format!("{}{}", trim_base(&self.config.backend_url), resource.path())),
            (Resource::Static(_), StaticOrigin::Http(origin)) => Some(format!("{}{}", trim_base(origin), resource.path())),
            (Resource::Static(_), StaticOrigin::Dir(_)) => None,
        }
    }

    async fn read_static_file(&self, dir: &Path, res: &StaticResource) -> std::result::Result<Payload, TransportError> {
        let path = dir.join(res.file_name());
        debug!("Reading static resource {}", path.display());
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TransportError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(TransportError::Unreachable(format!("{}: {}", path.display(), e))),
        };
        serde_json::from_str(&content).map_err(|e| TransportError::Malformed(format!("{}: {}", path.display(), e)))
    }

    /// Send a request and decode the JSON body, classifying failures
    async fn send(&self, request: RequestBuilder) -> std::result::Result<Value, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text);

        if !status.is_success() {
            let message = body
                .ok()
                .and_then(|b| b.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .or_else(|| (!text.is_empty()).then(|| text.clone()));
            return Err(TransportError::from_status(status.as_u16(), message));
        }

        body.map_err(|e| TransportError::Malformed(e.to_string()))
    }

    /// Decode a write-endpoint body, treating `{success: false}` as a rejection
    fn decode_outcome<T: DeserializeOwned>(body: Value) -> std::result::Result<T, TransportError> {
        if body.get("success").and_then(|s| s.as_bool()) == Some(false) {
            let message = body.get("error").and_then(|e| e.as_str()).map(str::to_string);
            return Err(TransportError::from_status(200, message));
        }
        serde_json::from_value(body).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_resource(&self, resource: &Resource, params: &FetchParams) -> std::result::Result<Payload, TransportError> {
        if let (Resource::Static(res), StaticOrigin::Dir(dir)) = (resource, &self.config.static_origin) {
            return self.read_static_file(dir, res).await;
        }

        let url = self
            .resource_url(resource)
            .ok_or_else(|| TransportError::NotFound(resource.path()))?;
        debug!("GET {} (cache_buster: {:?})", url, params.cache_buster);

        let mut request = self.client.get(&url);
        if let Some(buster) = params.cache_buster {
            request = request.query(&[buster.query()]);
        }
        self.send(request).await
    }

    async fn persist_reference_data(&self, dataset: &ReferenceDataset) -> std::result::Result<SaveAck, TransportError> {
        let url = self.save_url();
        debug!(
            "POST {} ({} employees, {} locations, {} shifts)",
            url,
            dataset.employees.len(),
            dataset.locations.len(),
            dataset.shifts.len()
        );
        let body = self.send(self.client.post(&url).json(dataset)).await?;
        Self::decode_outcome(body)
    }

    async fn request_regeneration(&self, dataset: Option<&ReferenceDataset>) -> std::result::Result<SolverResult, TransportError> {
        let url = self.generate_url();
        debug!("POST {} (inline dataset: {})", url, dataset.is_some());
        let mut request = self.client.post(&url);
        if let Some(dataset) = dataset {
            request = request.json(dataset);
        }
        let body = self.send(request).await?;
        Self::decode_outcome(body)
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("backend_url", &self.config.backend_url)
            .field("generate_url", &self.generate_url())
            .field("static_origin", &self.config.static_origin)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityKind;
    use serde_json::json;

    fn gateway(origin: StaticOrigin) -> HttpGateway {
        let config = HttpGatewayConfig {
            static_origin: origin,
            ..HttpGatewayConfig::with_backend("http://localhost:8000/")
        };
        HttpGateway::new(config).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = HttpGatewayConfig::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.generate_url.is_none());
    }

    #[test]
    fn test_endpoint_urls() {
        let gw = gateway(StaticOrigin::Http("http://localhost:3000".to_string()));
        assert_eq!(gw.generate_url(), "http://localhost:8000/api/generate");
        assert_eq!(gw.save_url(), "http://localhost:8000/api/save-data");
        assert_eq!(
            gw.resource_url(&Resource::Api(EntityKind::Employee)).as_deref(),
            Some("http://localhost:8000/api/data/employees.json")
        );
        assert_eq!(
            gw.resource_url(&Resource::Static(StaticResource::Schedule)).as_deref(),
            Some("http://localhost:3000/schedule.json")
        );
    }

    #[test]
    fn test_generate_url_override() {
        let config = HttpGatewayConfig {
            generate_url: Some("http://localhost:3000/api/generate".to_string()),
            ..Default::default()
        };
        let gw = HttpGateway::new(config).unwrap();
        assert_eq!(gw.generate_url(), "http://localhost:3000/api/generate");

        let debug = format!("{:?}", gw);
        assert!(debug.contains("http://localhost:3000/api/generate"));
        assert!(debug.contains("300s"));
    }

    #[test]
    fn test_dir_origin_has_no_static_url() {
        let gw = gateway(StaticOrigin::Dir(PathBuf::from("/tmp")));
        assert!(gw.resource_url(&Resource::Static(StaticResource::Schedule)).is_none());
        assert!(gw.resource_url(&Resource::Api(EntityKind::Shift)).is_some());
    }

    #[test]
    fn test_decode_outcome_success() {
        let ack: SaveAck = HttpGateway::decode_outcome(json!({"success": true, "message": "saved"})).unwrap();
        assert!(ack.success);
    }

    #[test]
    fn test_decode_outcome_rejection() {
        let err = HttpGateway::decode_outcome::<SolverResult>(json!({"success": false, "error": "solver timeout"})).unwrap_err();
        assert_eq!(err, TransportError::rejected(Some(200), Some("solver timeout".to_string())));
    }

    #[tokio::test]
    async fn test_static_dir_fetch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shifts.json"), r#"[{"id": "S1"}]"#).unwrap();
        std::fs::write(dir.path().join("schedule.json"), "not json").unwrap();
        let gw = gateway(StaticOrigin::Dir(dir.path().to_path_buf()));

        let shifts = gw
            .fetch_resource(&Resource::Static(StaticResource::Collection(EntityKind::Shift)), &FetchParams::default())
            .await
            .unwrap();
        assert_eq!(shifts[0]["id"], "S1");

        let missing = gw
            .fetch_resource(&Resource::Static(StaticResource::ScheduleWithAi), &FetchParams::default())
            .await;
        assert!(matches!(missing, Err(TransportError::NotFound(_))));

        let garbled = gw
            .fetch_resource(&Resource::Static(StaticResource::Schedule), &FetchParams::default())
            .await;
        assert!(matches!(garbled, Err(TransportError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 9 (discard) is essentially never listening on loopback
        let config = HttpGatewayConfig {
            timeout: Duration::from_secs(2),
            ..HttpGatewayConfig::with_backend("http://127.0.0.1:9")
        };
        let gw = HttpGateway::new(config).unwrap();
        let err = gw.request_regeneration(None).await.unwrap_err();
        assert!(err.is_unreachable());
    }
}

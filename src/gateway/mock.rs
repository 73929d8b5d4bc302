//! Scripted in-memory gateway for tests and offline demos.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{ReferenceDataset, SaveAck, SolverResult};

use super::client::{Gateway, Payload, TransportError};
use super::resource::{CacheBuster, FetchParams, Resource};

/// One observed gateway interaction, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Fetch {
        resource: Resource,
        cache_buster: Option<CacheBuster>,
    },
    PersistStarted(ReferenceDataset),
    PersistSettled,
    RegenerationRequested(Option<ReferenceDataset>),
    RegenerationSettled,
}

/// Mock gateway with canned responses.
///
/// Unscripted resources answer `NotFound`; persistence and regeneration
/// succeed unless scripted otherwise.
pub struct MockGateway {
    resources: Mutex<HashMap<Resource, Result<Payload, TransportError>>>,
    persist_result: Mutex<Result<SaveAck, TransportError>>,
    regeneration_result: Mutex<Result<SolverResult, TransportError>>,
    persist_delay: Duration,
    regeneration_delay: Duration,
    regeneration_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(HashMap::new()),
            persist_result: Mutex::new(Ok(SaveAck::ok("saved"))),
            regeneration_result: Mutex::new(Ok(SolverResult::ok("Schedule generated successfully"))),
            persist_delay: Duration::ZERO,
            regeneration_delay: Duration::ZERO,
            regeneration_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_resource(self, resource: Resource, response: Result<Payload, TransportError>) -> Self {
        self.set_resource(resource, response);
        self
    }

    pub fn with_persist_result(self, result: Result<SaveAck, TransportError>) -> Self {
        *lock(&self.persist_result) = result;
        self
    }

    pub fn with_regeneration_result(self, result: Result<SolverResult, TransportError>) -> Self {
        *lock(&self.regeneration_result) = result;
        self
    }

    pub fn with_persist_delay(mut self, delay: Duration) -> Self {
        self.persist_delay = delay;
        self
    }

    pub fn with_regeneration_delay(mut self, delay: Duration) -> Self {
        self.regeneration_delay = delay;
        self
    }

    /// Hold every regeneration request until the returned handle is notified
    pub fn with_regeneration_gate(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.regeneration_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Replace the scripted answer for a resource
    pub fn set_resource(&self, resource: Resource, response: Result<Payload, TransportError>) {
        lock(&self.resources).insert(resource, response);
    }

    pub fn set_regeneration_result(&self, result: Result<SolverResult, TransportError>) {
        *lock(&self.regeneration_result) = result;
    }

    /// Everything the gateway has been asked so far
    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    /// Fetches only, as `(resource, cache_buster)` pairs
    pub fn fetches(&self) -> Vec<(Resource, Option<CacheBuster>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::Fetch { resource, cache_buster } => Some((resource, cache_buster)),
                _ => None,
            })
            .collect()
    }

    /// Datasets pushed through `persist_reference_data`
    pub fn persisted(&self) -> Vec<ReferenceDataset> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::PersistStarted(ds) => Some(ds),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GatewayCall) {
        lock(&self.calls).push(call);
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_resource(&self, resource: &Resource, params: &FetchParams) -> Result<Payload, TransportError> {
        self.record(GatewayCall::Fetch {
            resource: *resource,
            cache_buster: params.cache_buster,
        });
        lock(&self.resources)
            .get(resource)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::NotFound(resource.path())))
    }

    async fn persist_reference_data(&self, dataset: &ReferenceDataset) -> Result<SaveAck, TransportError> {
        self.record(GatewayCall::PersistStarted(dataset.clone()));
        if !self.persist_delay.is_zero() {
            tokio::time::sleep(self.persist_delay).await;
        }
        let result = lock(&self.persist_result).clone();
        self.record(GatewayCall::PersistSettled);
        result
    }

    async fn request_regeneration(&self, dataset: Option<&ReferenceDataset>) -> Result<SolverResult, TransportError> {
        self.record(GatewayCall::RegenerationRequested(dataset.cloned()));
        if let Some(gate) = &self.regeneration_gate {
            gate.notified().await;
        }
        if !self.regeneration_delay.is_zero() {
            tokio::time::sleep(self.regeneration_delay).await;
        }
        let result = lock(&self.regeneration_result).clone();
        self.record(GatewayCall::RegenerationSettled);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_unscripted_resource_is_not_found() {
        let mock = MockGateway::new();
        let result = mock
            .fetch_resource(&Resource::Api(EntityKind::Employee), &FetchParams::default())
            .await;
        assert!(matches!(result, Err(TransportError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_scripted_resource_and_call_log() {
        let resource = Resource::Api(EntityKind::Shift);
        let mock = MockGateway::new().with_resource(resource, Ok(json!([{"id": "S1"}])));
        let params = FetchParams::fresh(CacheBuster(42));

        let payload = mock.fetch_resource(&resource, &params).await.unwrap();
        assert_eq!(payload[0]["id"], "S1");
        assert_eq!(mock.fetches(), vec![(resource, Some(CacheBuster(42)))]);
    }

    #[tokio::test]
    async fn test_persist_records_start_and_settle() {
        let mock = MockGateway::new().with_persist_result(Err(TransportError::Unreachable("down".into())));
        let result = mock.persist_reference_data(&ReferenceDataset::default()).await;
        assert!(result.is_err());
        assert_eq!(
            mock.calls(),
            vec![GatewayCall::PersistStarted(ReferenceDataset::default()), GatewayCall::PersistSettled]
        );
        assert_eq!(mock.persisted().len(), 1);
    }

    #[tokio::test]
    async fn test_default_regeneration_succeeds() {
        let mock = MockGateway::new();
        let result = mock.request_regeneration(None).await.unwrap();
        assert!(result.success);
        assert_eq!(mock.calls()[0], GatewayCall::RegenerationRequested(None));
    }
}

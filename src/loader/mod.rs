//! Dataset Loader - resolves view data through prioritized source chains
//!
//! - Schedule view: AI-augmented snapshot, then plain snapshot, else a
//!   terminal `DataUnavailable`
//! - Management view: each reference collection from the API, then its
//!   static file, else empty

pub mod outcome;
pub mod reference;
pub mod schedule;

use std::sync::Arc;

use crate::gateway::{CacheBuster, FetchParams, Gateway};

pub use outcome::{SourceOutcome, SourceStatus};
pub use reference::{CollectionLoad, CollectionOrigin, LoadedReference, load_collection, load_reference_data};
pub use schedule::{LoadedSchedule, SCHEDULE_CHAIN, load_schedule};

/// Errors surfaced by the loader
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// Every source in a chain failed
    #[error("No data available for {0}")]
    DataUnavailable(String),
}

/// How fresh a load must be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reload {
    /// Plain requests; caches may answer
    #[default]
    Normal,
    /// Attach a fresh cache-defeating token to every request
    Forced,
    /// Attach this specific token (e.g. from a post-regeneration redirect)
    With(CacheBuster),
}

impl Reload {
    pub fn params(self) -> FetchParams {
        match self {
            Reload::Normal => FetchParams::default(),
            Reload::Forced => FetchParams::fresh(CacheBuster::now()),
            Reload::With(buster) => FetchParams::fresh(buster),
        }
    }
}

/// Loader bound to one gateway
#[derive(Clone)]
pub struct DatasetLoader {
    gateway: Arc<dyn Gateway>,
}

impl DatasetLoader {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn load_schedule(&self, reload: Reload) -> Result<LoadedSchedule, LoadError> {
        load_schedule(self.gateway.as_ref(), &reload.params()).await
    }

    pub async fn load_reference(&self, reload: Reload) -> LoadedReference {
        load_reference_data(self.gateway.as_ref(), &reload.params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;

    #[test]
    fn test_reload_params() {
        assert!(Reload::Normal.params().cache_buster.is_none());
        assert!(Reload::Forced.params().cache_buster.is_some());
        assert_eq!(Reload::With(CacheBuster(5)).params().cache_buster, Some(CacheBuster(5)));
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::DataUnavailable("schedule".to_string());
        assert_eq!(err.to_string(), "No data available for schedule");
    }

    #[tokio::test]
    async fn test_loader_forced_reload() {
        let mock = Arc::new(MockGateway::new());
        let loader = DatasetLoader::new(mock.clone());
        let _ = loader.load_reference(Reload::Forced).await;
        assert!(mock.fetches().iter().all(|(_, b)| b.is_some()));
    }
}

//! Management view data: each reference collection from the API, with a
//! per-collection static fallback.
//!
//! The three chains run concurrently and never wait on one another. A
//! collection that fails everywhere degrades to empty without affecting
//! the other two.

use std::fmt;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::domain::{Employee, EntityKind, Location, ReferenceDataset, Shift};
use crate::gateway::{FetchParams, Gateway, Resource, StaticResource};

use super::outcome::{SourceStatus, classify_collection};

/// Which source a collection ended up coming from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOrigin {
    Api,
    StaticFallback,
    /// Neither source had data; the collection is empty
    Unavailable,
}

impl fmt::Display for CollectionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionOrigin::Api => write!(f, "api"),
            CollectionOrigin::StaticFallback => write!(f, "static"),
            CollectionOrigin::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// One collection's load result
#[derive(Debug, Clone)]
pub struct CollectionLoad<T> {
    pub kind: EntityKind,
    pub items: Vec<T>,
    pub origin: CollectionOrigin,
    pub attempts: Vec<(Resource, SourceStatus)>,
}

/// Reference dataset plus per-collection provenance
#[derive(Debug, Clone)]
pub struct LoadedReference {
    pub dataset: ReferenceDataset,
    pub origins: Vec<(EntityKind, CollectionOrigin)>,
}

impl LoadedReference {
    pub fn origin(&self, kind: EntityKind) -> CollectionOrigin {
        self.origins
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, o)| *o)
            .unwrap_or(CollectionOrigin::Unavailable)
    }
}

/// API first, static file second; empty and unreachable both fall through
pub async fn load_collection<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    kind: EntityKind,
    params: &FetchParams,
) -> CollectionLoad<T> {
    let chain = [
        (Resource::Api(kind), CollectionOrigin::Api),
        (Resource::Static(StaticResource::Collection(kind)), CollectionOrigin::StaticFallback),
    ];
    let mut attempts = Vec::new();

    for (resource, origin) in chain {
        let outcome = classify_collection::<T>(gateway.fetch_resource(&resource, params).await);
        debug!("{} source {}: {}", kind, resource, outcome.status());
        attempts.push((resource, outcome.status()));
        if let Some(items) = outcome.loaded() {
            return CollectionLoad {
                kind,
                items,
                origin,
                attempts,
            };
        }
    }

    warn!("No {} data from any source, continuing with an empty collection", kind.collection());
    CollectionLoad {
        kind,
        items: Vec::new(),
        origin: CollectionOrigin::Unavailable,
        attempts,
    }
}

/// Load all three collections concurrently
pub async fn load_reference_data(gateway: &dyn Gateway, params: &FetchParams) -> LoadedReference {
    let (employees, locations, shifts) = futures::join!(
        load_collection::<Employee>(gateway, EntityKind::Employee, params),
        load_collection::<Location>(gateway, EntityKind::Location, params),
        load_collection::<Shift>(gateway, EntityKind::Shift, params),
    );

    let origins = vec![
        (employees.kind, employees.origin),
        (locations.kind, locations.origin),
        (shifts.kind, shifts.origin),
    ];
    let dataset = ReferenceDataset::new(employees.items, locations.items, shifts.items);

    for (kind, id) in dataset.duplicate_ids() {
        warn!("Duplicate {} id in loaded data: {}", kind, id);
    }
    info!(
        "Loaded reference data: {} employees ({}), {} locations ({}), {} shifts ({})",
        dataset.employees.len(),
        origins[0].1,
        dataset.locations.len(),
        origins[1].1,
        dataset.shifts.len(),
        origins[2].1
    );

    LoadedReference { dataset, origins }
}

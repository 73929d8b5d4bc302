//! Schedule view data: AI-augmented snapshot first, plain snapshot second.

use log::{debug, info, warn};

use crate::domain::ScheduleSnapshot;
use crate::gateway::{FetchParams, Gateway, Resource, StaticResource};

use super::LoadError;
use super::outcome::{SourceStatus, classify_document};

/// Sources tried for the schedule view, in priority order
pub const SCHEDULE_CHAIN: [StaticResource; 2] = [StaticResource::ScheduleWithAi, StaticResource::Schedule];

/// A snapshot plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedSchedule {
    pub snapshot: ScheduleSnapshot,
    pub source: StaticResource,
    /// Every attempt made, including the successful one
    pub attempts: Vec<(StaticResource, SourceStatus)>,
}

/// Walk the schedule chain. Any non-success falls through to the next
/// source; if every source fails the view gets a terminal error.
pub async fn load_schedule(gateway: &dyn Gateway, params: &FetchParams) -> Result<LoadedSchedule, LoadError> {
    let mut attempts = Vec::new();

    for source in SCHEDULE_CHAIN {
        let resource = Resource::Static(source);
        let outcome = classify_document::<ScheduleSnapshot>(gateway.fetch_resource(&resource, params).await);
        let status = outcome.status();
        debug!("Schedule source {}: {}", resource, status);
        attempts.push((source, status));

        if let Some(snapshot) = outcome.loaded() {
            let dangling = snapshot.dangling_references();
            if !dangling.is_empty() {
                warn!(
                    "Snapshot from {} has {} dangling references (first: {} {})",
                    resource,
                    dangling.len(),
                    dangling[0].kind,
                    dangling[0].id
                );
            }
            info!(
                "Loaded schedule from {} ({} assignments)",
                resource,
                snapshot.assignments.len()
            );
            return Ok(LoadedSchedule {
                snapshot,
                source,
                attempts,
            });
        }
    }

    let tried = attempts
        .iter()
        .map(|(source, status)| format!("{}: {}", source.file_name(), status))
        .collect::<Vec<_>>()
        .join("; ");
    warn!("No schedule source available ({})", tried);
    Err(LoadError::DataUnavailable(format!("schedule ({})", tried)))
}

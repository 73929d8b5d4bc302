//! Edit & Auto-Persist Manager
//!
//! An edit is applied to the in-memory dataset first and is visible
//! immediately. The whole dataset is then pushed to the backend in the
//! background. A failed push is logged and remembered, never rolled back.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::domain::{EntityKind, EntityRecord, ReferenceDataset, SaveAck};
use crate::gateway::{Gateway, TransportError};

use super::EditError;
use super::slots::EditSlots;

type PersistHandle = JoinHandle<Result<SaveAck, TransportError>>;

/// Owns the management view's reference dataset and its auto-save
pub struct EditManager {
    gateway: Arc<dyn Gateway>,
    dataset: ReferenceDataset,
    slots: EditSlots,
    pending: Option<PersistHandle>,
    last_persist_error: Arc<Mutex<Option<TransportError>>>,
}

fn warn_on_suspicious(record: &EntityRecord) {
    match record {
        EntityRecord::Location(l) if !l.has_positive_capacity() => {
            warn!("Location {} saved with non-positive capacity {}", l.id, l.capacity);
        }
        EntityRecord::Shift(s) if !s.is_well_formed() => {
            warn!("Shift {} saved with start {} / end {}", s.id, s.start_time, s.end_time);
        }
        EntityRecord::Employee(e) if !e.email.is_empty() && !e.email.contains('@') => {
            warn!("Employee {} saved with unusual email {:?}", e.id, e.email);
        }
        _ => {}
    }
}

impl EditManager {
    pub fn new(gateway: Arc<dyn Gateway>, dataset: ReferenceDataset) -> Self {
        Self {
            gateway,
            dataset,
            slots: EditSlots::default(),
            pending: None,
            last_persist_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Current local state, including edits not yet confirmed remotely
    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    /// Open the edit form for one record, returning its current values
    pub fn begin_edit(&mut self, kind: EntityKind, id: &str) -> Result<EntityRecord, EditError> {
        let record = self.dataset.get(kind, id).ok_or_else(|| EditError::UnknownEntity {
            kind,
            id: id.to_string(),
        })?;
        if let Some(previous) = self.slots.open(kind, id) {
            debug!("Closing {} form for {} in favour of {}", kind, previous, id);
        }
        Ok(record)
    }

    pub fn cancel_edit(&mut self, kind: EntityKind) {
        self.slots.close(kind);
    }

    /// Id of the record whose form is open for `kind`
    pub fn editing(&self, kind: EntityKind) -> Option<&str> {
        self.slots.current(kind)
    }

    /// Replace the matching record locally, then auto-save the whole dataset.
    /// Returns once the local change is applied; the save continues in the
    /// background.
    pub async fn apply_edit(&mut self, record: EntityRecord) -> Result<(), EditError> {
        let kind = record.kind();
        let id = record.id().to_string();
        warn_on_suspicious(&record);

        if self.dataset.replace(record).is_none() {
            return Err(EditError::UnknownEntity { kind, id });
        }
        if self.slots.current(kind) == Some(id.as_str()) {
            self.slots.close(kind);
        }
        info!("Applied {} edit for {}", kind, id);
        self.schedule_persist();
        Ok(())
    }

    /// Append a new record locally, then auto-save the whole dataset
    pub async fn add_entity(&mut self, record: EntityRecord) -> Result<(), EditError> {
        let kind = record.kind();
        let id = record.id().to_string();
        warn_on_suspicious(&record);

        if !self.dataset.insert(record) {
            return Err(EditError::DuplicateId { kind, id });
        }
        info!("Added {} {}", kind, id);
        self.schedule_persist();
        Ok(())
    }

    /// Spawn a save of the current dataset, queued behind any earlier save
    /// so the most recent dataset is always written last.
    fn schedule_persist(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        let dataset = self.dataset.clone();
        let previous = self.pending.take();
        let last_error = Arc::clone(&self.last_persist_error);

        self.pending = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            let result = gateway.persist_reference_data(&dataset).await;
            let mut slot = last_error.lock().unwrap_or_else(|p| p.into_inner());
            match &result {
                Ok(_) => {
                    debug!("Auto-save succeeded");
                    *slot = None;
                }
                Err(e) => {
                    warn!("Auto-save failed, local edits kept: {}", e);
                    *slot = Some(e.clone());
                }
            }
            result
        }));
    }

    pub fn has_pending_persist(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for any in-flight auto-save to finish. Returns its result, or
    /// `None` if nothing was pending.
    pub async fn settle(&mut self) -> Option<Result<SaveAck, TransportError>> {
        let handle = self.pending.take()?;
        match handle.await {
            Ok(result) => Some(result),
            Err(e) => Some(Err(TransportError::Unreachable(format!("auto-save task failed: {}", e)))),
        }
    }

    /// Let pending auto-saves settle, then push the current dataset and wait
    /// for the answer. Used before regeneration.
    pub async fn persist_now(&mut self) -> Result<SaveAck, TransportError> {
        if let Some(Err(e)) = self.settle().await {
            debug!("Earlier auto-save had failed: {}", e);
        }
        let result = self.gateway.persist_reference_data(&self.dataset).await;
        self.record_result(&result);
        result
    }

    fn record_result(&self, result: &Result<SaveAck, TransportError>) {
        let mut slot = self.last_persist_error.lock().unwrap_or_else(|p| p.into_inner());
        *slot = result.as_ref().err().cloned();
    }

    /// Most recent persistence failure, cleared by the next success
    pub fn last_persist_error(&self) -> Option<TransportError> {
        self.last_persist_error
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, Location, Shift};
    use crate::gateway::{GatewayCall, MockGateway};

    fn dataset() -> ReferenceDataset {
        ReferenceDataset::new(
            vec![
                Employee::new("E1", "An").with_skills(["cashier"]),
                Employee::new("E2", "Binh").with_email("binh@example.com"),
            ],
            vec![Location::new("L1", "Downtown", 3)],
            vec![Shift::new("S1", "Morning", "06:00", "14:00")],
        )
    }

    fn manager(mock: &Arc<MockGateway>) -> EditManager {
        EditManager::new(mock.clone(), dataset())
    }

    #[tokio::test]
    async fn test_edit_is_visible_before_persist_settles() {
        let mock = Arc::new(MockGateway::new().with_persist_delay(std::time::Duration::from_millis(50)));
        let mut mgr = manager(&mock);

        mgr.apply_edit(Employee::new("E1", "An Nguyen").into()).await.unwrap();
        assert_eq!(mgr.dataset().employees[0].name, "An Nguyen");
        assert!(mgr.has_pending_persist());

        let result = mgr.settle().await.unwrap();
        assert!(result.is_ok());
        assert!(!mgr.has_pending_persist());
    }

    #[tokio::test]
    async fn test_persist_sends_full_dataset() {
        let mock = Arc::new(MockGateway::new());
        let mut mgr = manager(&mock);

        mgr.apply_edit(Location::new("L1", "Uptown", 5).into()).await.unwrap();
        mgr.settle().await;

        let persisted = mock.persisted();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].employees.len(), 2);
        assert_eq!(persisted[0].shifts.len(), 1);
        assert_eq!(persisted[0].locations[0].name, "Uptown");
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_local_edit() {
        let mock = Arc::new(MockGateway::new().with_persist_result(Err(TransportError::Unreachable("down".into()))));
        let mut mgr = manager(&mock);

        mgr.apply_edit(Shift::new("S1", "Early", "05:00", "13:00").into()).await.unwrap();
        let result = mgr.settle().await.unwrap();

        assert!(result.is_err());
        assert_eq!(mgr.dataset().shifts[0].name, "Early");
        assert!(matches!(mgr.last_persist_error(), Some(TransportError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_edit_does_not_touch_other_entities() {
        let mock = Arc::new(MockGateway::new());
        let mut mgr = manager(&mock);
        let before = mgr.dataset().clone();

        mgr.apply_edit(Employee::new("E2", "Binh Tran").into()).await.unwrap();
        mgr.settle().await;

        let after = mgr.dataset();
        assert_eq!(after.employees[0], before.employees[0]);
        assert_eq!(after.locations, before.locations);
        assert_eq!(after.shifts, before.shifts);
        assert_eq!(after.employees[1].name, "Binh Tran");
        assert_eq!(after.employees[1].id, "E2");
    }

    #[tokio::test]
    async fn test_unknown_entity_is_rejected_without_persist() {
        let mock = Arc::new(MockGateway::new());
        let mut mgr = manager(&mock);

        let err = mgr.apply_edit(Employee::new("E9", "Ghost").into()).await.unwrap_err();
        assert_eq!(
            err,
            EditError::UnknownEntity {
                kind: EntityKind::Employee,
                id: "E9".to_string()
            }
        );
        assert!(!mgr.has_pending_persist());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_entity() {
        let mock = Arc::new(MockGateway::new());
        let mut mgr = manager(&mock);

        mgr.add_entity(Employee::new("E3", "Chi").into()).await.unwrap();
        assert_eq!(mgr.dataset().employees.len(), 3);
        let dup = mgr.add_entity(Employee::new("E3", "Chi again").into()).await;
        assert!(matches!(dup, Err(EditError::DuplicateId { .. })));
        mgr.settle().await;
        assert_eq!(mock.persisted().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_form_slots() {
        let mock = Arc::new(MockGateway::new());
        let mut mgr = manager(&mock);

        let form = mgr.begin_edit(EntityKind::Employee, "E1").unwrap();
        assert_eq!(form.name(), "An");
        mgr.begin_edit(EntityKind::Location, "L1").unwrap();
        mgr.begin_edit(EntityKind::Employee, "E2").unwrap();
        assert_eq!(mgr.editing(EntityKind::Employee), Some("E2"));
        assert_eq!(mgr.editing(EntityKind::Location), Some("L1"));

        mgr.apply_edit(Employee::new("E2", "Binh").into()).await.unwrap();
        assert_eq!(mgr.editing(EntityKind::Employee), None);
        assert_eq!(mgr.editing(EntityKind::Location), Some("L1"));

        mgr.cancel_edit(EntityKind::Location);
        assert_eq!(mgr.editing(EntityKind::Location), None);
        assert!(mgr.begin_edit(EntityKind::Shift, "S9").is_err());
    }

    #[tokio::test]
    async fn test_consecutive_saves_are_ordered() {
        let mock = Arc::new(MockGateway::new().with_persist_delay(std::time::Duration::from_millis(20)));
        let mut mgr = manager(&mock);

        mgr.apply_edit(Employee::new("E1", "First").into()).await.unwrap();
        mgr.apply_edit(Employee::new("E1", "Second").into()).await.unwrap();
        mgr.settle().await;

        let persisted = mock.persisted();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[1].employees[0].name, "Second");

        // second save starts only after the first settled
        let calls = mock.calls();
        assert!(matches!(calls[0], GatewayCall::PersistStarted(_)));
        assert_eq!(calls[1], GatewayCall::PersistSettled);
        assert!(matches!(calls[2], GatewayCall::PersistStarted(_)));
    }

    #[tokio::test]
    async fn test_persist_now_waits_for_pending_save() {
        let mock = Arc::new(MockGateway::new().with_persist_delay(std::time::Duration::from_millis(20)));
        let mut mgr = manager(&mock);

        mgr.apply_edit(Employee::new("E1", "An N.").into()).await.unwrap();
        mgr.persist_now().await.unwrap();

        assert_eq!(
            mock.calls().iter().filter(|c| **c == GatewayCall::PersistSettled).count(),
            2
        );
        assert!(mgr.last_persist_error().is_none());
    }
}

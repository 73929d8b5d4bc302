//! The three reference collections handled as one unit.
//!
//! Persistence always sends the whole dataset, never a single collection,
//! so this is also the wire shape of `/api/save-data` and the inline
//! `/api/generate` payload.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entity::{Employee, EntityKind, EntityRecord, Location, Shift};

/// In-memory reference data: employees, locations and shifts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDataset {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

/// Replace the record whose id matches, returning the previous value
fn replace_by_id<T, F>(items: &mut [T], id: &str, id_of: F, new: T) -> Option<T>
where
    F: Fn(&T) -> &str,
{
    let slot = items.iter_mut().find(|item| id_of(item) == id)?;
    Some(std::mem::replace(slot, new))
}

impl ReferenceDataset {
    pub fn new(employees: Vec<Employee>, locations: Vec<Location>, shifts: Vec<Shift>) -> Self {
        Self {
            employees,
            locations,
            shifts,
        }
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Employee => self.employees.len(),
            EntityKind::Location => self.locations.len(),
            EntityKind::Shift => self.shifts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty() && self.locations.is_empty() && self.shifts.is_empty()
    }

    /// Identifiers of one collection, in stored order
    pub fn ids(&self, kind: EntityKind) -> Vec<&str> {
        match kind {
            EntityKind::Employee => self.employees.iter().map(|e| e.id.as_str()).collect(),
            EntityKind::Location => self.locations.iter().map(|l| l.id.as_str()).collect(),
            EntityKind::Shift => self.shifts.iter().map(|s| s.id.as_str()).collect(),
        }
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.ids(kind).contains(&id)
    }

    /// Look up a single record by kind and id
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<EntityRecord> {
        match kind {
            EntityKind::Employee => self.employees.iter().find(|e| e.id == id).cloned().map(Into::into),
            EntityKind::Location => self.locations.iter().find(|l| l.id == id).cloned().map(Into::into),
            EntityKind::Shift => self.shifts.iter().find(|s| s.id == id).cloned().map(Into::into),
        }
    }

    /// Replace the record with the same kind and id. Returns the previous
    /// record, or `None` (and changes nothing) when no record matched.
    pub fn replace(&mut self, record: EntityRecord) -> Option<EntityRecord> {
        match record {
            EntityRecord::Employee(e) => {
                let id = e.id.clone();
                replace_by_id(&mut self.employees, &id, |x| x.id.as_str(), e).map(Into::into)
            }
            EntityRecord::Location(l) => {
                let id = l.id.clone();
                replace_by_id(&mut self.locations, &id, |x| x.id.as_str(), l).map(Into::into)
            }
            EntityRecord::Shift(s) => {
                let id = s.id.clone();
                replace_by_id(&mut self.shifts, &id, |x| x.id.as_str(), s).map(Into::into)
            }
        }
    }

    /// Append a new record. Returns false (and changes nothing) if the id is taken.
    pub fn insert(&mut self, record: EntityRecord) -> bool {
        if self.contains(record.kind(), record.id()) {
            return false;
        }
        match record {
            EntityRecord::Employee(e) => self.employees.push(e),
            EntityRecord::Location(l) => self.locations.push(l),
            EntityRecord::Shift(s) => self.shifts.push(s),
        }
        true
    }

    /// Identifiers that occur more than once within their collection
    pub fn duplicate_ids(&self) -> Vec<(EntityKind, String)> {
        let mut dups = Vec::new();
        for kind in EntityKind::ALL {
            let mut seen = HashSet::new();
            for id in self.ids(kind) {
                if !seen.insert(id) {
                    dups.push((kind, id.to_string()));
                }
            }
        }
        dups
    }
}

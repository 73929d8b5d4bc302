//! Edit & Auto-Persist Manager
//!
//! Single-entity edits against the in-memory reference dataset with an
//! optimistic, no-rollback background save of the full dataset.

pub mod manager;
pub mod slots;

use crate::domain::EntityKind;

pub use manager::EditManager;
pub use slots::EditSlots;

/// Errors raised when an edit cannot be applied locally
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("No {kind} with id {id}")]
    UnknownEntity { kind: EntityKind, id: String },

    #[error("A {kind} with id {id} already exists")]
    DuplicateId { kind: EntityKind, id: String },
}

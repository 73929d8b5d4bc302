//! Domain types for Rota
//!
//! This module contains the scheduling data model:
//! - Employee, Location, Shift: editable reference entities
//! - ReferenceDataset: the three reference collections as one unit
//! - Assignment, ScheduleSnapshot: read-only solver output
//! - SolverResult, SaveAck: backend call outcomes

pub mod dataset;
pub mod entity;
pub mod outcome;
pub mod snapshot;

pub use dataset::ReferenceDataset;
pub use entity::{Employee, EntityKind, EntityRecord, Location, Shift};
pub use outcome::{SaveAck, SolverResult};
pub use snapshot::{AiAnalysis, Assignment, DanglingReference, OptimizationSuggestions, ScheduleSnapshot, Statistics};

use serde::{Deserialize, Deserializer};

/// Deserialize an identifier that the backend may emit as a string or an integer.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "de_id")]
        id: String,
    }

    #[test]
    fn test_de_id_accepts_string() {
        let h: Holder = serde_json::from_str(r#"{"id": "E1"}"#).unwrap();
        assert_eq!(h.id, "E1");
    }

    #[test]
    fn test_de_id_accepts_integer() {
        let h: Holder = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(h.id, "7");
    }

    #[test]
    fn test_de_id_rejects_object() {
        let result = serde_json::from_str::<Holder>(r#"{"id": {"x": 1}}"#);
        assert!(result.is_err());
    }
}

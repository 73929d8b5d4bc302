//! Classification of a single source attempt.
//!
//! Callers currently fall back on anything but `Loaded`, but the variants stay
//! distinct so logs and tests can tell "zero records" from "unreachable".

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::gateway::{Payload, TransportError};

/// Result of asking one source in a fallback chain
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    /// Source answered with usable data
    Loaded(T),
    /// Source answered, but with nothing in it
    Empty,
    /// Source does not have the resource
    NotFound,
    /// Source could not be reached or answered garbage
    Failed(TransportError),
}

impl<T> SourceOutcome<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceOutcome::Loaded(_))
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            SourceOutcome::Loaded(v) => Some(v),
            _ => None,
        }
    }

    /// Short status for logs and error messages, without the payload
    pub fn status(&self) -> SourceStatus {
        match self {
            SourceOutcome::Loaded(_) => SourceStatus::Loaded,
            SourceOutcome::Empty => SourceStatus::Empty,
            SourceOutcome::NotFound => SourceStatus::NotFound,
            SourceOutcome::Failed(e) => SourceStatus::Failed(e.to_string()),
        }
    }
}

/// Payload-free view of a `SourceOutcome`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Loaded,
    Empty,
    NotFound,
    Failed(String),
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Loaded => write!(f, "loaded"),
            SourceStatus::Empty => write!(f, "empty"),
            SourceStatus::NotFound => write!(f, "not found"),
            SourceStatus::Failed(e) => write!(f, "failed ({})", e),
        }
    }
}

fn from_transport<T>(err: TransportError) -> SourceOutcome<T> {
    match err {
        TransportError::NotFound(_) => SourceOutcome::NotFound,
        other => SourceOutcome::Failed(other),
    }
}

/// Classify a collection fetch: an empty array counts as `Empty`
pub fn classify_collection<T: DeserializeOwned>(result: Result<Payload, TransportError>) -> SourceOutcome<Vec<T>> {
    let payload = match result {
        Ok(p) => p,
        Err(e) => return from_transport(e),
    };
    match payload {
        Value::Null => SourceOutcome::Empty,
        Value::Array(ref items) if items.is_empty() => SourceOutcome::Empty,
        other => match serde_json::from_value::<Vec<T>>(other) {
            Ok(items) => SourceOutcome::Loaded(items),
            Err(e) => SourceOutcome::Failed(TransportError::Malformed(e.to_string())),
        },
    }
}

/// Classify a single-document fetch: `null` or `{}` counts as `Empty`
pub fn classify_document<T: DeserializeOwned>(result: Result<Payload, TransportError>) -> SourceOutcome<T> {
    let payload = match result {
        Ok(p) => p,
        Err(e) => return from_transport(e),
    };
    match payload {
        Value::Null => SourceOutcome::Empty,
        Value::Object(ref map) if map.is_empty() => SourceOutcome::Empty,
        other => match serde_json::from_value::<T>(other) {
            Ok(doc) => SourceOutcome::Loaded(doc),
            Err(e) => SourceOutcome::Failed(TransportError::Malformed(e.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, ScheduleSnapshot};
    use serde_json::json;

    #[test]
    fn test_collection_loaded() {
        let outcome = classify_collection::<Employee>(Ok(json!([{"id": "E1", "name": "An"}])));
        assert!(outcome.is_loaded());
        assert_eq!(outcome.loaded().unwrap()[0].name, "An");
    }

    #[test]
    fn test_collection_empty_array() {
        let outcome = classify_collection::<Employee>(Ok(json!([])));
        assert_eq!(outcome, SourceOutcome::Empty);
    }

    #[test]
    fn test_collection_not_found() {
        let outcome = classify_collection::<Employee>(Err(TransportError::NotFound("/x".into())));
        assert_eq!(outcome, SourceOutcome::NotFound);
    }

    #[test]
    fn test_collection_wrong_shape() {
        let outcome = classify_collection::<Employee>(Ok(json!({"employees": []})));
        assert!(matches!(outcome, SourceOutcome::Failed(TransportError::Malformed(_))));
    }

    #[test]
    fn test_document_empty_object() {
        let outcome = classify_document::<ScheduleSnapshot>(Ok(json!({})));
        assert_eq!(outcome.status(), SourceStatus::Empty);
    }

    #[test]
    fn test_document_unreachable() {
        let outcome = classify_document::<ScheduleSnapshot>(Err(TransportError::Unreachable("refused".into())));
        assert_eq!(outcome.status().to_string(), "failed (Backend unreachable: refused)");
    }
}

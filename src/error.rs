//! Error types for Rota
//!
//! Centralized error handling using thiserror. Component-specific errors
//! (transport, load, edit, regeneration) live next to their component and convert into
//! `RotaError` at the crate boundary.

use thiserror::Error;

use crate::edit::EditError;
use crate::gateway::TransportError;
use crate::loader::LoadError;
use crate::regen::RegenFailure;

/// All error types that can occur in Rota
#[derive(Debug, Error)]
pub enum RotaError {
    /// Network call to the backend or static origin failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// No data obtainable from any source in a fallback chain
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Edit could not be applied to the in-memory dataset
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Regeneration did not complete
    #[error("Regeneration error: {0}")]
    Regen(#[from] RegenFailure),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Rota operations
pub type Result<T> = std::result::Result<T, RotaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityKind;

    #[test]
    fn test_transport_error_conversion() {
        let err: RotaError = TransportError::Unreachable("connection refused".to_string()).into();
        assert!(matches!(err, RotaError::Transport(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_load_error_conversion() {
        let err: RotaError = LoadError::DataUnavailable("schedule".to_string()).into();
        assert!(matches!(err, RotaError::Load(_)));
        assert!(err.to_string().contains("schedule"));
    }

    #[test]
    fn test_edit_error_conversion() {
        let err: RotaError = EditError::UnknownEntity {
            kind: EntityKind::Employee,
            id: "E99".to_string(),
        }
        .into();
        assert!(err.to_string().contains("E99"));
    }

    #[test]
    fn test_regen_failure_conversion() {
        let err: RotaError = RegenFailure::InFlight.into();
        assert!(matches!(err, RotaError::Regen(RegenFailure::InFlight)));
        assert_eq!(err.to_string(), "Regeneration error: Regeneration already in progress");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RotaError = io_err.into();
        assert!(matches!(err, RotaError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: RotaError = json_err.into();
        assert!(matches!(err, RotaError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(RotaError::Config("bad".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}

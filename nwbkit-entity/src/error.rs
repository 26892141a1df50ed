//! Error types for container construction

use nwbkit_common::{ErrorSeverity, Severity};
use nwbkit_config::ConfigError;
use nwbkit_fields::{DefinitionError, FieldsError, ValidationError};
use thiserror::Error;

/// Result type for entity operations
pub type Result<T> = std::result::Result<T, EntityError>;

/// Errors raised while registering, constructing, or attaching containers.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A container's parent can be set once
    #[error("{type_name} '{name}' already has a parent")]
    AlreadyAttached { type_name: String, name: String },

    #[error("{names} ROI names given for {rows} rows of data")]
    RoiCountMismatch { names: usize, rows: usize },

    /// A link path does not name the linked container
    #[error("link '{field}' points at '{target}' but its path is '{path}'")]
    LinkMismatch {
        field: String,
        path: String,
        target: String,
    },

    #[error("'{supplied}' was given without '{missing}'")]
    IncompleteTiming { supplied: String, missing: String },

    /// Sampling rates must be finite and positive
    #[error("invalid sampling rate {rate}")]
    InvalidRate { rate: f64 },

    #[error("both timestamps and starting_time/rate were given")]
    AmbiguousTiming,

    #[error("expected a {expected}, got a {actual}")]
    WrongType { expected: String, actual: String },

    #[error("the process-wide type registry is already initialized")]
    AlreadyInitialized,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<FieldsError> for EntityError {
    fn from(error: FieldsError) -> Self {
        match error {
            FieldsError::Definition(e) => EntityError::Definition(e),
            FieldsError::Validation(e) => EntityError::Validation(e),
            FieldsError::AlreadyInitialized => EntityError::AlreadyInitialized,
        }
    }
}

impl Severity for EntityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EntityError::Definition(e) => e.severity(),
            EntityError::Validation(e) => e.severity(),
            EntityError::Config(e) => e.severity(),
            EntityError::AlreadyInitialized => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_errors_unwrap_into_entity_variants() {
        let err: EntityError = FieldsError::Validation(ValidationError::UnknownField {
            type_name: "TimeSeries".into(),
            name: "colour".into(),
        })
        .into();
        assert!(matches!(err, EntityError::Validation(ValidationError::UnknownField { .. })));
        assert_eq!(err.severity(), ErrorSeverity::Error);

        let err: EntityError = FieldsError::AlreadyInitialized.into();
        assert!(matches!(err, EntityError::AlreadyInitialized));
        assert!(err.is_critical());
    }

    #[test]
    fn test_definition_errors_are_critical() {
        let err = EntityError::from(DefinitionError::DuplicateType {
            name: "ImageSeries".into(),
        });
        assert!(err.is_critical());
    }

    #[test]
    fn test_display() {
        let err = EntityError::RoiCountMismatch { names: 3, rows: 2 };
        assert_eq!(err.to_string(), "3 ROI names given for 2 rows of data");
    }
}

//! Error types for the schema registry and validator

use nwbkit_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors raised while declaring or composing a type.
///
/// These surface at registration time (or, for forward references, at the
/// first validation against the sealed registry) and mean the type itself is
/// unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    /// Type name was empty
    #[error("type name must not be empty")]
    EmptyTypeName,

    /// Field name was empty
    #[error("field name must not be empty in type '{type_name}'")]
    EmptyFieldName { type_name: String },

    /// Field declared without any allowed type
    #[error("field '{name}' declares no allowed types")]
    EmptyTypeSet { name: String },

    /// Field name collides with another field of the composed schema
    #[error("duplicate field name '{name}' in type '{type_name}'")]
    DuplicateFieldName { type_name: String, name: String },

    /// A required field was declared after an optional one
    #[error(
        "required field '{required}' declared after optional field '{optional}' in type '{type_name}'"
    )]
    OrderingViolation {
        type_name: String,
        required: String,
        optional: String,
    },

    /// Type name registered twice
    #[error("type already registered: {name}")]
    DuplicateType { name: String },

    /// Parent type has not been registered
    #[error("type '{name}' extends unknown type '{parent}'")]
    UnknownParent { name: String, parent: String },

    /// Alternative groups reference fields they cannot govern
    #[error("alternative '{alternative}' in type '{type_name}' is invalid: {reason}")]
    InvalidAlternative {
        type_name: String,
        alternative: String,
        reason: String,
    },

    /// A field is typed by a name that is not in the registry
    #[error("field '{field}' of type '{type_name}' references unresolved type '{reference}'")]
    UnresolvedType {
        type_name: String,
        field: String,
        reference: String,
    },
}

/// Errors raised while checking construction arguments against a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field was not supplied
    #[error("missing required field '{name}' for type '{type_name}'")]
    MissingRequiredField { type_name: String, name: String },

    /// A supplied name is not part of the schema
    #[error("unknown field '{name}' for type '{type_name}'")]
    UnknownField { type_name: String, name: String },

    /// A supplied value is not one of the field's allowed types
    #[error("field '{name}' expects one of [{}], got {actual}", expected.join(", "))]
    TypeMismatch {
        name: String,
        expected: Vec<String>,
        actual: String,
    },

    /// None of an alternative's groups was supplied
    #[error("type '{type_name}' requires one of {options:?} for '{alternative}'")]
    MissingAlternative {
        type_name: String,
        alternative: String,
        options: Vec<Vec<String>>,
    },

    /// More than one of an alternative's groups was supplied
    #[error("type '{type_name}' accepts only one of {supplied:?} for '{alternative}'")]
    ConflictingAlternatives {
        type_name: String,
        alternative: String,
        supplied: Vec<Vec<String>>,
    },

    /// Part of an alternative's group was supplied
    #[error("type '{type_name}' is missing {missing:?} to complete '{alternative}'")]
    IncompleteAlternative {
        type_name: String,
        alternative: String,
        missing: Vec<String>,
    },

    /// Construction requested for a type that was never registered
    #[error("unknown type: {name}")]
    UnknownType { name: String },
}

/// Errors that can occur in registry operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldsError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The process-wide registry was installed twice
    #[error("type registry already initialized")]
    AlreadyInitialized,
}

impl Severity for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

impl Severity for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

impl Severity for FieldsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FieldsError::Definition(e) => e.severity(),
            FieldsError::Validation(e) => e.severity(),
            FieldsError::AlreadyInitialized => ErrorSeverity::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::UnknownField {
            type_name: "TimeSeries".into(),
            name: "colour".into(),
        };
        assert_eq!(err.to_string(), "unknown field 'colour' for type 'TimeSeries'");
    }

    #[test]
    fn test_type_mismatch_lists_expected_types() {
        let err = ValidationError::TypeMismatch {
            name: "data".into(),
            expected: vec!["sequence".into(), "array".into(), "TimeSeries".into()],
            actual: "str".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sequence, array, TimeSeries"));
        assert!(msg.contains("got str"));
    }

    #[test]
    fn test_severity_split() {
        let def: FieldsError = DefinitionError::DuplicateType {
            name: "ImageSeries".into(),
        }
        .into();
        let val: FieldsError = ValidationError::UnknownType { name: "X".into() }.into();
        assert_eq!(def.severity(), ErrorSeverity::Critical);
        assert_eq!(val.severity(), ErrorSeverity::Error);
    }
}

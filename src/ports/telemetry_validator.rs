//! Telemetry Validator Port - Schema validation of decoded stream payloads.
//!
//! This port defines the contract for turning the untyped `data` field of an
//! envelope into a fully-typed [`TelemetryTick`]. The stream client depends
//! on this trait, while adapters (like `TelemetrySchemaValidator`) provide
//! the implementation.

use serde_json::Value;
use thiserror::Error;

use crate::domain::telemetry::TelemetryTick;

/// Port for validating telemetry payloads.
///
/// # Contract
///
/// Implementations must:
/// - Return a complete tick or an error, never a partially filled one
/// - Reject unknown phase and lane tags
/// - Reject non-finite numbers and negatives where the schema disallows them
/// - Name the offending field with its full path (`intersection.vehicles[2].lane`)
///
/// # Usage
///
/// ```rust,ignore
/// let validator: &dyn TelemetryValidator = get_validator();
/// let tick = validator.validate(&envelope_data)?;
/// ```
pub trait TelemetryValidator: Send + Sync {
    /// Validate a payload and convert it into a typed tick.
    fn validate(&self, payload: &Value) -> Result<TelemetryTick, SchemaValidationError>;
}

/// Errors that can occur during schema validation.
#[derive(Debug, Clone, Error)]
pub enum SchemaValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Value out of range for field {field}: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Field {field} must be a finite number")]
    NotFinite { field: String },

    #[error("Field {field} must be one of {allowed:?}, got '{value}'")]
    UnknownVariant {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Validation errors: {0:?}")]
    Multiple(Vec<SchemaValidationError>),
}

impl SchemaValidationError {
    /// The path of the (first) offending field.
    pub fn field(&self) -> &str {
        match self {
            SchemaValidationError::MissingRequired { field }
            | SchemaValidationError::InvalidType { field, .. }
            | SchemaValidationError::OutOfRange { field, .. }
            | SchemaValidationError::NotFinite { field }
            | SchemaValidationError::UnknownVariant { field, .. } => field,
            SchemaValidationError::Multiple(errors) => {
                errors.first().map(|e| e.field()).unwrap_or("")
            }
        }
    }

    /// Returns true if this error contains multiple validation failures.
    pub fn is_multiple(&self) -> bool {
        matches!(self, SchemaValidationError::Multiple(_))
    }

    /// Get the count of validation errors.
    pub fn error_count(&self) -> usize {
        match self {
            SchemaValidationError::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }
}

impl PartialEq for SchemaValidationError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by error message for testing purposes
        self.to_string() == other.to_string()
    }
}

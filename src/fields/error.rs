use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Code of the aggregate error raised when one or more fields are invalid.
pub const VALIDATION_FAILED_INVALID_FIELDS: &str = "VALIDATION_FAILED_INVALID_FIELDS";

/// Code assigned to a field failure that did not carry a code of its own.
pub const VALIDATION_FAILED_INVALID_FIELD: &str = "VALIDATION_FAILED_INVALID_FIELD";

/// Code of a field failure caused by a value of the wrong data type.
pub const FIELD_DATA_TYPE_ERROR: &str = "FIELD_DATA_TYPE_ERROR";

/// Descriptor of a single invalid field inside [`WithFieldsError::ValidationFailed`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvalidField {
    /// Error code, [`VALIDATION_FAILED_INVALID_FIELD`] unless the field supplied one.
    pub code: String,
    /// Additional error data, `null` unless the field supplied some.
    pub data: Value,
    /// Human-readable message.
    pub message: String,
}

/// Errors raised by fields-models.
///
/// ```rust
/// use dynamodb_fields::fields::error;
/// use indexmap::IndexMap;
///
/// let err = error::WithFieldsError::ValidationFailed {
///     invalid_fields: IndexMap::new(),
/// };
/// assert_eq!(err.to_string(), "Validation failed.");
/// assert_eq!(err.code(), error::VALIDATION_FAILED_INVALID_FIELDS);
/// ```
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WithFieldsError {
    /// One or more fields failed validation.
    #[error("Validation failed.")]
    ValidationFailed {
        /// Invalid fields keyed by field name, in declaration order.
        invalid_fields: IndexMap<String, InvalidField>,
    },
}

impl WithFieldsError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => VALIDATION_FAILED_INVALID_FIELDS,
        }
    }

    /// The per-field failures carried by the error.
    pub fn invalid_fields(&self) -> &IndexMap<String, InvalidField> {
        match self {
            Self::ValidationFailed { invalid_fields } => invalid_fields,
        }
    }

    /// Error data in the `{"invalidFields": {...}}` shape.
    pub fn data(&self) -> Value {
        let invalid_fields = serde_json::to_value(self.invalid_fields()).unwrap_or(Value::Null);
        serde_json::json!({ "invalidFields": invalid_fields })
    }
}

/// Result of fields-model operations.
pub type Result<T, E = WithFieldsError> = std::result::Result<T, E>;

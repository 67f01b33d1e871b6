use async_trait::async_trait;
use serde_json::Value;

/// Failure reported by a single field's validation.
///
/// A missing `code` becomes
/// [`VALIDATION_FAILED_INVALID_FIELD`](crate::fields::error::VALIDATION_FAILED_INVALID_FIELD) and
/// missing `data` becomes `null` once the failure is collected by the owning model.
#[derive(Clone, Debug, Default, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    /// Optional machine-readable code.
    pub code: Option<String>,
    /// Optional additional data.
    pub data: Option<Value>,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Create an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the error code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the error data.
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Capability of a single named value with dirty-tracking and validation.
///
/// A field is owned by exactly one model instance, whose registry keys it by the name it was
/// declared under. Its dirty flag reflects whether
/// [`set_value`](Field::set_value) was called since the last [`clean`](Field::clean).
///
/// The provided methods are the fallbacks used by the owning model:
/// - [`json_value`](Field::json_value) serializes through [`value`](Field::value)
/// - [`get`](Field::get) / [`set`](Field::set) are the accessor hooks and read/write the raw value
///
/// Override them to transform values on their way in or out.
#[async_trait(?Send)]
pub trait Field {
    /// Current raw value.
    fn value(&self) -> Value;

    /// Store a new raw value and mark the field dirty.
    fn set_value(&mut self, value: Value);

    /// Whether the value was set since the last clean.
    fn is_dirty(&self) -> bool;

    /// Reset the dirty flag.
    fn clean(&mut self);

    /// Validate the current value.
    async fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }

    /// Serialized value used by [`FieldRegistry::to_json`](crate::fields::registry::FieldRegistry::to_json).
    async fn json_value(&self) -> Value {
        self.value()
    }

    /// Accessor read hook.
    fn get(&self) -> Value {
        self.value()
    }

    /// Accessor write hook.
    fn set(&mut self, value: Value) {
        self.set_value(value);
    }

    /// Whether populating a model from raw data skips this field.
    fn skip_on_populate(&self) -> bool {
        false
    }
}

use crate::fields::{
    error,
    field::{Field, FieldError},
};

use async_trait::async_trait;
use serde_json::Value;
use std::{fmt, rc};

/// Data type accepted by a [`ValueField`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum FieldKind {
    /// Any JSON value.
    #[default]
    Any,
    /// JSON arrays.
    Array,
    /// Booleans.
    Boolean,
    /// Numbers.
    Number,
    /// JSON objects.
    Object,
    /// Strings.
    String,
}

impl FieldKind {
    /// Whether `value` is acceptable. `null` is accepted by every kind.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::Any, _)
                | (Self::Array, Value::Array(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::Number, Value::Number(_))
                | (Self::Object, Value::Object(_))
                | (Self::String, Value::String(_))
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Any => "any",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
        };
        f.write_str(kind)
    }
}

type Validation = rc::Rc<dyn Fn(&Value) -> Result<(), FieldError>>;
type Getter = rc::Rc<dyn Fn(&ValueField) -> Value>;
type Setter = rc::Rc<dyn Fn(&mut ValueField, Value)>;

/// Stock field holding a single JSON value of a given [`FieldKind`].
///
/// ```rust
/// use dynamodb_fields::fields::{field::{Field, FieldError}, value::ValueField};
/// use serde_json::{Value, json};
///
/// let email = ValueField::string("email")
///     .validation(|value| match value {
///         Value::String(email) if !email.contains('@') => Err(FieldError::new("Invalid e-mail.")),
///         _ => Ok(()),
///     })
///     .getter(|field| match field.value() {
///         Value::String(email) => json!(email.to_lowercase()),
///         other => other,
///     });
/// # let _ = email;
/// ```
#[derive(Clone)]
pub struct ValueField {
    name: String,
    kind: FieldKind,
    current: Value,
    dirty: bool,
    skip_on_populate: bool,
    validation: Option<Validation>,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl fmt::Debug for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("current", &self.current)
            .field("dirty", &self.dirty)
            .field("skip_on_populate", &self.skip_on_populate)
            .finish()
    }
}

impl ValueField {
    /// Create a field of the given kind holding `null`.
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            current: Value::Null,
            dirty: false,
            skip_on_populate: false,
            validation: None,
            getter: None,
            setter: None,
        }
    }

    /// Field accepting any value.
    pub fn any(name: &str) -> Self {
        Self::new(name, FieldKind::Any)
    }

    /// Field accepting arrays.
    pub fn array(name: &str) -> Self {
        Self::new(name, FieldKind::Array)
    }

    /// Field accepting booleans.
    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Field accepting numbers.
    pub fn number(name: &str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Field accepting objects.
    pub fn object(name: &str) -> Self {
        Self::new(name, FieldKind::Object)
    }

    /// Field accepting strings.
    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Initial value. It does not make the field dirty.
    pub fn default_value(mut self, value: Value) -> Self {
        self.current = value;
        self
    }

    /// Exclude the field from `populate`.
    pub fn exclude_from_populate(mut self) -> Self {
        self.skip_on_populate = true;
        self
    }

    /// Custom validation, run after the data type check.
    pub fn validation(
        mut self,
        validation: impl Fn(&Value) -> Result<(), FieldError> + 'static,
    ) -> Self {
        self.validation = Some(rc::Rc::new(validation));
        self
    }

    /// Accessor read hook.
    pub fn getter(mut self, getter: impl Fn(&ValueField) -> Value + 'static) -> Self {
        self.getter = Some(rc::Rc::new(getter));
        self
    }

    /// Accessor write hook. It decides itself whether and how to call `set_value`.
    pub fn setter(mut self, setter: impl Fn(&mut ValueField, Value) + 'static) -> Self {
        self.setter = Some(rc::Rc::new(setter));
        self
    }

    /// The accepted data type.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

#[async_trait(?Send)]
impl Field for ValueField {
    fn value(&self) -> Value {
        self.current.clone()
    }

    fn set_value(&mut self, value: Value) {
        self.current = value;
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clean(&mut self) {
        self.dirty = false;
    }

    async fn validate(&self) -> Result<(), FieldError> {
        if !self.kind.accepts(&self.current) {
            let message = format!(
                "Invalid data type: {} field \"{}\" cannot accept value {}.",
                self.kind, self.name, self.current
            );
            return Err(FieldError::new(message).code(error::FIELD_DATA_TYPE_ERROR));
        }
        match &self.validation {
            Some(validation) => validation(&self.current),
            None => Ok(()),
        }
    }

    fn get(&self) -> Value {
        match &self.getter {
            Some(getter) => getter(self),
            None => self.value(),
        }
    }

    fn set(&mut self, value: Value) {
        match self.setter.clone() {
            Some(setter) => setter(self, value),
            None => self.set_value(value),
        }
    }

    fn skip_on_populate(&self) -> bool {
        self.skip_on_populate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::any_string(FieldKind::Any, json!("a"), true)]
    #[case::null_always(FieldKind::Number, Value::Null, true)]
    #[case::string(FieldKind::String, json!("a"), true)]
    #[case::string_rejects_number(FieldKind::String, json!(1), false)]
    #[case::number(FieldKind::Number, json!(1.5), true)]
    #[case::number_rejects_string(FieldKind::Number, json!("1"), false)]
    #[case::boolean(FieldKind::Boolean, json!(false), true)]
    #[case::array(FieldKind::Array, json!([1, 2]), true)]
    #[case::object(FieldKind::Object, json!({"a": 1}), true)]
    #[case::object_rejects_array(FieldKind::Object, json!([]), false)]
    fn test_accepts(#[case] kind: FieldKind, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(kind.accepts(&value), expected);
    }

    #[test]
    fn test_dirty_flag() {
        let mut field = ValueField::number("age").default_value(json!(18));
        assert!(!field.is_dirty());
        assert_eq!(field.value(), json!(18));
        field.set_value(json!(18));
        assert!(field.is_dirty());
        field.clean();
        assert!(!field.is_dirty());
    }

    #[tokio::test]
    async fn test_validate_data_type() {
        let mut field = ValueField::number("age");
        field.set_value(json!("old"));
        let err = field.validate().await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some(error::FIELD_DATA_TYPE_ERROR));
        assert_eq!(
            err.message,
            "Invalid data type: number field \"age\" cannot accept value \"old\"."
        );
    }

    #[tokio::test]
    async fn test_custom_validation() {
        let mut field = ValueField::string("email").validation(|value| match value {
            Value::String(email) if !email.contains('@') => {
                Err(FieldError::new("Invalid e-mail.").data(json!({"value": email})))
            }
            _ => Ok(()),
        });
        assert_eq!(field.validate().await, Ok(()));
        field.set_value(json!("nope"));
        assert_eq!(
            field.validate().await,
            Err(FieldError {
                code: None,
                data: Some(json!({"value": "nope"})),
                message: "Invalid e-mail.".to_string(),
            })
        );
    }

    #[test]
    fn test_accessor_hooks() {
        let mut field = ValueField::string("slug")
            .getter(|field| match field.value() {
                Value::String(slug) => json!(slug.to_uppercase()),
                other => other,
            })
            .setter(|field, value| {
                if let Value::String(slug) = value {
                    field.set_value(json!(slug.trim().replace(' ', "-")));
                }
            });
        field.set(json!(" hello world "));
        assert_eq!(field.value(), json!("hello-world"));
        assert_eq!(field.get(), json!("HELLO-WORLD"));
        field.clean();
        field.set(json!(1));
        assert!(!field.is_dirty());
    }

    #[test]
    fn test_exclude_from_populate() {
        assert!(!ValueField::any("a").skip_on_populate());
        assert!(ValueField::any("a").exclude_from_populate().skip_on_populate());
    }

    #[tokio::test]
    async fn test_json_value_defaults_to_value() {
        let mut field = ValueField::any("meta");
        field.set_value(json!({"a": [1]}));
        assert_eq!(field.json_value().await, json!({"a": [1]}));
    }
}

use crate::fields::{
    error,
    field::{Field, FieldError},
    registry::ToJsonOptions,
    value::FieldKind,
    with_fields::{HasFields, WithFields},
};

use async_trait::async_trait;
use serde_json::Value;
use std::{fmt, rc};

/// Field holding another fields-model.
///
/// Setting an object builds a fresh nested model and populates it, `null` removes it.
/// Dirtiness, cleaning, serialization and validation are delegated to the nested model.
pub struct NestedField<B> {
    name: String,
    factory: rc::Rc<dyn Fn() -> WithFields<B>>,
    model: Option<WithFields<B>>,
    rejected: Option<Value>,
    dirty: bool,
}

impl<B: fmt::Debug> fmt::Debug for NestedField<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedField")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("rejected", &self.rejected)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<B> NestedField<B> {
    /// Create an empty nested field building its models with `factory`.
    pub fn new(name: &str, factory: impl Fn() -> WithFields<B> + 'static) -> Self {
        Self {
            name: name.to_string(),
            factory: rc::Rc::new(factory),
            model: None,
            rejected: None,
            dirty: false,
        }
    }

    /// The nested model, if any.
    pub fn model(&self) -> Option<&WithFields<B>> {
        self.model.as_ref()
    }

    /// The nested model, mutably.
    pub fn model_mut(&mut self) -> Option<&mut WithFields<B>> {
        self.model.as_mut()
    }
}

#[async_trait(?Send)]
impl<B: 'static> Field for NestedField<B> {
    fn value(&self) -> Value {
        if let Some(rejected) = &self.rejected {
            return rejected.clone();
        }
        match &self.model {
            Some(model) => Value::Object(model.registry().values()),
            None => Value::Null,
        }
    }

    fn set_value(&mut self, value: Value) {
        self.dirty = true;
        self.rejected = None;
        self.model = match value {
            Value::Null => None,
            Value::Object(_) => {
                let mut model = (self.factory)();
                model.populate(&value);
                Some(model)
            }
            other => {
                self.rejected = Some(other);
                None
            }
        };
    }

    fn is_dirty(&self) -> bool {
        self.dirty || self.model.as_ref().is_some_and(|model| model.is_dirty())
    }

    fn clean(&mut self) {
        self.dirty = false;
        if let Some(model) = &mut self.model {
            model.clean();
        }
    }

    async fn validate(&self) -> Result<(), FieldError> {
        if let Some(rejected) = &self.rejected {
            let message = format!(
                "Invalid data type: {} field \"{}\" cannot accept value {}.",
                FieldKind::Object,
                self.name,
                rejected
            );
            return Err(FieldError::new(message).code(error::FIELD_DATA_TYPE_ERROR));
        }
        match &self.model {
            Some(model) => model.validate().await.map_err(|err| {
                FieldError::new(err.to_string())
                    .code(err.code())
                    .data(err.data())
            }),
            None => Ok(()),
        }
    }

    async fn json_value(&self) -> Value {
        match &self.model {
            Some(model) => Value::Object(
                model
                    .to_json(ToJsonOptions::default())
                    .await
                    .into_iter()
                    .collect(),
            ),
            None => self.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fields::{
        definitions::{FieldDefinitions, FieldMap},
        value::ValueField,
        with_fields::Entity,
    };
    use serde_json::json;

    struct Address;

    impl Entity for Address {}

    struct Customer;

    impl Entity for Customer {}

    fn address() -> WithFields<Address> {
        let definitions: FieldDefinitions<Address> = FieldMap::new()
            .field("street", ValueField::string)
            .field("zip", |name: &str| {
                ValueField::string(name).validation(|value| match value {
                    Value::Null => Err(FieldError::new("Value is required.")),
                    _ => Ok(()),
                })
            })
            .into();
        WithFields::new(Address, &definitions)
    }

    fn customer() -> WithFields<Customer> {
        let definitions: FieldDefinitions<Customer> = FieldMap::new()
            .field("name", ValueField::string)
            .field("address", |name: &str| NestedField::new(name, address))
            .into();
        WithFields::new(Customer, &definitions)
    }

    #[tokio::test]
    async fn test_nested_validation() {
        let mut customer = customer();
        customer.populate(&json!({"name": "A", "address": {"street": "Main"}}));
        let err = customer.validate().await.unwrap_err();
        let invalid = &err.invalid_fields()["address"];
        assert_eq!(invalid.code, error::VALIDATION_FAILED_INVALID_FIELDS);
        assert_eq!(invalid.message, "Validation failed.");
        assert_eq!(
            invalid.data,
            json!({
                "invalidFields": {
                    "zip": {
                        "code": "VALIDATION_FAILED_INVALID_FIELD",
                        "data": null,
                        "message": "Value is required.",
                    },
                },
            })
        );

        customer.populate(&json!({"address": {"street": "Main", "zip": "0001"}}));
        assert_eq!(customer.validate().await, Ok(()));
    }

    #[tokio::test]
    async fn test_nested_rejects_non_objects() {
        let mut customer = customer();
        customer.populate(&json!({"address": "Main street"}));
        assert_eq!(customer.get("address"), Some(json!("Main street")));
        let err = customer.validate().await.unwrap_err();
        assert_eq!(
            err.invalid_fields()["address"].code,
            error::FIELD_DATA_TYPE_ERROR
        );
    }

    #[tokio::test]
    async fn test_nested_dirty_and_json() {
        let mut customer = customer();
        customer
            .populate(&json!({"name": "A", "address": {"street": "Main", "zip": "1"}}))
            .clean();
        assert!(!customer.is_dirty());

        assert_eq!(
            customer.to_json(ToJsonOptions::default()).await,
            indexmap::IndexMap::from([
                ("name".to_string(), json!("A")),
                (
                    "address".to_string(),
                    json!({"street": "Main", "zip": "1"})
                ),
            ])
        );

        customer.populate(&json!({"address": null}));
        assert!(customer.is_dirty());
        assert_eq!(customer.get("address"), Some(Value::Null));
    }

    #[test]
    fn test_nested_changes_make_field_dirty() {
        let mut field = NestedField::new("address", address);
        assert!(!field.is_dirty());
        field.set_value(json!({"street": "Main"}));
        field.clean();
        assert!(!field.is_dirty());
        assert!(!field.model().unwrap().is_dirty());

        field.model_mut().unwrap().set("zip", json!("2"));
        assert!(field.is_dirty());
        assert_eq!(field.value(), json!({"street": "Main", "zip": "2"}));
    }
}

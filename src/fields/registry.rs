use crate::{
    common,
    fields::{error, field::Field},
};

use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{cell, fmt};

/// Sets a flag for the lifetime of the guard, refusing to enter while it is already set.
struct ReentrancyGuard<'a>(&'a cell::Cell<bool>);

impl<'a> ReentrancyGuard<'a> {
    fn enter(flag: &'a cell::Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Options of [`FieldRegistry::to_json`].
///
/// `only_dirty` and `only_clean` are meant to be used one at a time; when both are set
/// `only_dirty` takes precedence.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ToJsonOptions {
    /// Serialize only fields that are dirty.
    pub only_dirty: bool,
    /// Serialize only fields that are clean.
    pub only_clean: bool,
}

/// Ordered field storage of a single model instance.
///
/// Fields are kept in declaration order, which is the order used by [`populate`](Self::populate),
/// [`to_json`](Self::to_json), [`validate`](Self::validate) and [`is_dirty`](Self::is_dirty).
/// Two flags guard `validate` and `is_dirty` against re-entry from within a field:
/// a nested `validate` succeeds immediately and a nested `is_dirty` reports `false`.
#[derive(Default)]
pub struct FieldRegistry {
    fields: IndexMap<String, Box<dyn Field>>,
    validating: cell::Cell<bool>,
    computing_dirty: cell::Cell<bool>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: IndexMap<&str, Value> = self
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.value()))
            .collect();
        f.debug_struct("FieldRegistry")
            .field("fields", &values)
            .field("validating", &self.validating.get())
            .field("computing_dirty", &self.computing_dirty.get())
            .finish()
    }
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn install(&mut self, name: String, field: Box<dyn Field>) {
        self.fields.insert(name, field);
    }

    /// All fields, keyed by name, in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Box<dyn Field>> {
        &self.fields
    }

    /// The field declared as `name`.
    pub fn field(&self, name: &str) -> Option<&dyn Field> {
        self.fields.get(name).map(|field| field.as_ref())
    }

    /// The field declared as `name`, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut dyn Field> {
        match self.fields.get_mut(name) {
            Some(field) => Some(field.as_mut()),
            None => None,
        }
    }

    /// Read a field through its accessor hook.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.get(name).map(|field| field.get())
    }

    /// Write a field through its accessor hook.
    ///
    /// Returns `false` when no field is declared as `name`.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.fields.get_mut(name) {
            Some(field) => {
                field.set(value);
                true
            }
            None => false,
        }
    }

    /// Read a field through its accessor hook and deserialize it.
    ///
    /// Returns `None` when the field is missing or holds a value of another shape.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get(name)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Serialize `value` and write it through the field's accessor hook.
    pub fn set_as<T: Serialize>(&mut self, name: &str, value: T) -> serde_json::Result<bool> {
        let value = serde_json::to_value(value)?;
        Ok(self.set(name, value))
    }

    /// Snapshot of every raw field value.
    pub fn values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value()))
            .collect()
    }

    /// Set every field that is present in the `data` object.
    ///
    /// Fields missing from `data` and fields flagged `skip_on_populate` are left untouched,
    /// and anything other than an object is ignored. `null` is a value like any other.
    pub fn populate(&mut self, data: &Value) -> &mut Self {
        if let Value::Object(data) = data {
            self.populate_from(|name| data.get(name));
        }
        self
    }

    /// Like [`populate`](Self::populate), with `None` standing for an explicitly undefined value,
    /// which leaves the field untouched.
    pub fn populate_with(&mut self, data: &IndexMap<String, Option<Value>>) -> &mut Self {
        self.populate_from(|name| data.get(name).and_then(Option::as_ref));
        self
    }

    fn populate_from<'a>(&mut self, lookup: impl Fn(&str) -> Option<&'a Value>) {
        for (name, field) in self.fields.iter_mut() {
            if field.skip_on_populate() {
                continue;
            }
            if let Some(value) = lookup(name.as_str()) {
                field.set_value(value.clone());
            }
        }
    }

    /// Serialize fields in declaration order.
    ///
    /// Each field is serialized through its JSON hook, one after the other.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fields.to_json", skip(self))
    )]
    pub async fn to_json(&self, options: ToJsonOptions) -> IndexMap<String, Value> {
        let mut output = IndexMap::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            if options.only_dirty || options.only_clean {
                let is_dirty = field.is_dirty();
                if options.only_dirty {
                    if !is_dirty {
                        continue;
                    }
                } else if is_dirty {
                    continue;
                }
            }
            output.insert(name.clone(), field.json_value().await);
        }
        output
    }

    /// Validate every field, collecting all failures.
    ///
    /// A failing field never prevents the following ones from being validated.
    /// An empty failure code falls back to
    /// [`VALIDATION_FAILED_INVALID_FIELD`](error::VALIDATION_FAILED_INVALID_FIELD) and falsy
    /// failure data to `null`.
    /// Re-entering while a validation is in progress succeeds without doing anything.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fields.validate", skip(self), err)
    )]
    pub async fn validate(&self) -> error::Result<()> {
        let Some(_guard) = ReentrancyGuard::enter(&self.validating) else {
            return Ok(());
        };
        let mut invalid_fields = IndexMap::new();
        for (name, field) in &self.fields {
            if let Err(err) = field.validate().await {
                let invalid_field = error::InvalidField {
                    code: err
                        .code
                        .filter(|code| !code.is_empty())
                        .unwrap_or_else(|| error::VALIDATION_FAILED_INVALID_FIELD.to_string()),
                    data: err.data.filter(common::is_truthy).unwrap_or(Value::Null),
                    message: err.message,
                };
                invalid_fields.insert(name.clone(), invalid_field);
            }
        }
        if invalid_fields.is_empty() {
            Ok(())
        } else {
            Err(error::WithFieldsError::ValidationFailed { invalid_fields })
        }
    }

    /// Clean every dirty field.
    pub fn clean(&mut self) {
        for field in self.fields.values_mut() {
            if field.is_dirty() {
                field.clean();
            }
        }
    }

    /// Whether any field is dirty.
    ///
    /// Re-entering while a check is in progress reports `false`.
    pub fn is_dirty(&self) -> bool {
        let Some(_guard) = ReentrancyGuard::enter(&self.computing_dirty) else {
            return false;
        };
        self.fields.values().any(|field| field.is_dirty())
    }
}

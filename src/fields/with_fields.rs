use crate::fields::{
    definitions::{FieldDefinitions, FieldMap},
    error,
    field::Field,
    registry::{FieldRegistry, ToJsonOptions},
};

use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::ops;

/// Capability of carrying a field registry.
///
/// Use it as a bound to require fields-models without knowing their concrete type.
pub trait HasFields {
    /// The field registry.
    fn registry(&self) -> &FieldRegistry;

    /// The field registry, mutably.
    fn registry_mut(&mut self) -> &mut FieldRegistry;

    /// Install another layer of fields into the existing registry.
    ///
    /// A name declared again replaces the earlier field in place.
    fn install_fields(&mut self, fields: &FieldMap) {
        for (name, field) in fields.build() {
            self.registry_mut().install(name, field);
        }
    }
}

/// Plain entity that fields can be composed with.
///
/// Fields-models do not implement it, so composing a fields-model again is rejected at compile
/// time instead of hiding its registry behind a second one. Add layers to an existing
/// fields-model with [`WithFields::with_fields`] or [`HasFields::install_fields`].
///
/// ```compile_fail
/// use dynamodb_fields::fields::{
///     definitions::FieldMap,
///     value::ValueField,
///     with_fields::{Entity, WithFields},
/// };
///
/// struct User;
///
/// impl Entity for User {}
///
/// let ids = FieldMap::new().field("id", ValueField::string).into();
/// let names = FieldMap::new().field("name", ValueField::string).into();
/// let user = WithFields::new(WithFields::new(User, &ids), &names);
/// ```
pub trait Entity {}

/// A base entity composed with a field registry.
///
/// Every declared field is reachable by name through [`get`](Self::get) / [`set`](Self::set),
/// which go through the field's accessor hooks. Typed wrappers usually sit on top of those.
///
/// ```rust
/// use dynamodb_fields::fields::{
///     definitions::FieldMap,
///     value::ValueField,
///     with_fields::{Entity, WithFields},
/// };
/// use serde_json::json;
///
/// struct User;
///
/// impl Entity for User {}
///
/// fn name(user: &WithFields<User>) -> Option<String> {
///     user.get_as("name")
/// }
///
/// let definitions = FieldMap::new()
///     .field("id", ValueField::string)
///     .field("name", ValueField::string)
///     .into();
/// let mut user = WithFields::new(User, &definitions);
/// user.populate(&json!({"id": "u1", "name": "A"}));
/// assert_eq!(name(&user).as_deref(), Some("A"));
/// assert!(user.is_dirty());
/// ```
#[derive(Debug)]
pub struct WithFields<B> {
    base: B,
    fields: FieldRegistry,
}

impl<B> HasFields for WithFields<B> {
    fn registry(&self) -> &FieldRegistry {
        &self.fields
    }

    fn registry_mut(&mut self) -> &mut FieldRegistry {
        &mut self.fields
    }
}

impl<B> ops::Deref for WithFields<B> {
    type Target = B;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<B> ops::DerefMut for WithFields<B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl<B: Entity> WithFields<B> {
    /// Compose `base` with the fields of `definitions`.
    pub fn new(base: B, definitions: &FieldDefinitions<B>) -> Self {
        let instance = Self {
            base,
            fields: FieldRegistry::new(),
        };
        instance.with_fields(definitions)
    }
}

impl<B> WithFields<B> {
    /// Install another layer of fields into the existing registry.
    ///
    /// Layers share the single registry of the instance, so applying several of them never
    /// creates a second one. A name declared again replaces the earlier field in place.
    pub fn with_fields(mut self, definitions: &FieldDefinitions<B>) -> Self {
        for (name, field) in definitions.build(&self) {
            self.fields.install(name, field);
        }
        self
    }

    /// The base entity.
    pub fn base(&self) -> &B {
        &self.base
    }

    /// The base entity, mutably.
    pub fn base_mut(&mut self) -> &mut B {
        &mut self.base
    }

    /// Drop the fields and return the base entity.
    pub fn into_base(self) -> B {
        self.base
    }

    /// All fields, keyed by name, in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Box<dyn Field>> {
        self.fields.fields()
    }

    /// The field declared as `name`.
    pub fn field(&self, name: &str) -> Option<&dyn Field> {
        self.fields.field(name)
    }

    /// The field declared as `name`, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut dyn Field> {
        self.fields.field_mut(name)
    }

    /// Read a field through its accessor hook.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.get(name)
    }

    /// Write a field through its accessor hook. Returns `false` for an undeclared name.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        self.fields.set(name, value)
    }

    /// Read and deserialize a field.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.fields.get_as(name)
    }

    /// Serialize and write a field.
    pub fn set_as<T: Serialize>(&mut self, name: &str, value: T) -> serde_json::Result<bool> {
        self.fields.set_as(name, value)
    }

    /// Set every field present in the `data` object.
    pub fn populate(&mut self, data: &Value) -> &mut Self {
        self.fields.populate(data);
        self
    }

    /// Set every field present in `data`, leaving `None` entries untouched.
    pub fn populate_with(&mut self, data: &IndexMap<String, Option<Value>>) -> &mut Self {
        self.fields.populate_with(data);
        self
    }

    /// Serialize fields in declaration order.
    pub async fn to_json(&self, options: ToJsonOptions) -> IndexMap<String, Value> {
        self.fields.to_json(options).await
    }

    /// Validate every field, failing with all per-field failures at once.
    pub async fn validate(&self) -> error::Result<()> {
        self.fields.validate().await
    }

    /// Clean every dirty field.
    pub fn clean(&mut self) {
        self.fields.clean();
    }

    /// Whether any field is dirty.
    pub fn is_dirty(&self) -> bool {
        self.fields.is_dirty()
    }
}

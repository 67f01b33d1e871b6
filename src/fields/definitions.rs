use crate::fields::{field::Field, with_fields::WithFields};

use indexmap::IndexMap;
use std::fmt;

/// Builds a field instance for the given field name.
pub type FieldFactory = Box<dyn Fn(&str) -> Box<dyn Field>>;

/// Static mapping of field names to field factories, in declaration order.
///
/// ```rust
/// use dynamodb_fields::fields::{definitions::FieldMap, value::ValueField};
///
/// let fields = FieldMap::new()
///     .field("id", ValueField::string)
///     .field("age", ValueField::number);
/// assert_eq!(fields.names().collect::<Vec<_>>(), ["id", "age"]);
/// ```
#[derive(Default)]
pub struct FieldMap {
    factories: IndexMap<String, FieldFactory>,
}

impl fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

impl FieldMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Declaring the same name twice replaces the factory but keeps its position.
    pub fn field<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Field + 'static,
        F: Fn(&str) -> T + 'static,
    {
        let factory: FieldFactory =
            Box::new(move |name: &str| -> Box<dyn Field> { Box::new(factory(name)) });
        self.factories.insert(name.into(), factory);
        self
    }

    /// Declared field names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no field is declared.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub(crate) fn build(&self) -> Vec<(String, Box<dyn Field>)> {
        self.factories
            .iter()
            .map(|(name, factory)| (name.clone(), factory(name.as_str())))
            .collect()
    }
}

/// Field definitions of a model type.
///
/// Either a static [`FieldMap`], or a function of the partially built instance returning one,
/// for fields whose shape depends on the base entity or on fields installed by earlier layers.
pub enum FieldDefinitions<B> {
    /// The same fields for every instance.
    Static(FieldMap),
    /// Fields computed from the instance being built.
    Dynamic(Box<dyn Fn(&WithFields<B>) -> FieldMap>),
}

impl<B> fmt::Debug for FieldDefinitions<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(fields) => f.debug_tuple("Static").field(fields).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

impl<B> From<FieldMap> for FieldDefinitions<B> {
    fn from(fields: FieldMap) -> Self {
        Self::Static(fields)
    }
}

impl<B> FieldDefinitions<B> {
    /// Definitions computed from the instance being built.
    pub fn dynamic(resolve: impl Fn(&WithFields<B>) -> FieldMap + 'static) -> Self {
        Self::Dynamic(Box::new(resolve))
    }

    pub(crate) fn build(&self, instance: &WithFields<B>) -> Vec<(String, Box<dyn Field>)> {
        match self {
            Self::Static(fields) => fields.build(),
            Self::Dynamic(resolve) => resolve(instance).build(),
        }
    }
}

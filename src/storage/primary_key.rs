/// A single identifying field.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PrimaryKeyField {
    /// The field name.
    pub name: String,
}

/// Ordered identifying fields of a model type.
///
/// The default primary key is made of the single field `id`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PrimaryKey {
    /// The identifying fields, in declaration order.
    pub fields: Vec<PrimaryKeyField>,
}

impl Default for PrimaryKey {
    fn default() -> Self {
        Self::new(["id"])
    }
}

impl PrimaryKey {
    /// A key made of `fields`, in the given order.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|name| PrimaryKeyField { name: name.into() })
                .collect(),
        }
    }

    /// Field names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

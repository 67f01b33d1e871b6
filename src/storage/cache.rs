use crate::{common, fields::with_fields::HasFields, storage::Storable};

use serde_json::Value;
use std::{any, collections, fmt, rc};

/// A cached model snapshot.
#[derive(Clone)]
pub struct StorageCacheEntry {
    model: rc::Rc<dyn any::Any>,
}

impl fmt::Debug for StorageCacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCacheEntry").finish_non_exhaustive()
    }
}

impl StorageCacheEntry {
    /// Wrap `model`.
    pub fn new<M: 'static>(model: rc::Rc<M>) -> Self {
        Self { model }
    }

    /// The cached model, if it is an `M`.
    pub fn model<M: 'static>(&self) -> Option<rc::Rc<M>> {
        rc::Rc::clone(&self.model).downcast::<M>().ok()
    }
}

/// Cache entries keyed by storage name, then by composite id.
pub type StoragePool =
    collections::HashMap<String, collections::HashMap<String, StorageCacheEntry>>;

struct PoolItemId {
    namespace: &'static str,
    id: String,
}

/// Integral numbers are written without a fractional part whatever their JSON form,
/// so `1` and `1.0` make the same id.
fn id_part(value: Value) -> String {
    match value {
        Value::String(value) => value,
        Value::Number(number) => match (number.as_i64(), number.as_u64(), number.as_f64()) {
            (Some(number), _, _) => number.to_string(),
            (_, Some(number), _) => number.to_string(),
            (_, _, Some(number)) => number.to_string(),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

/// Namespace and composite id of `model`, reading key fields from `data` when given.
///
/// Falsy key values are skipped, the remaining ones joined with `:`.
fn get_pool_item_id<M: Storable + HasFields>(model: &M, data: Option<&Value>) -> PoolItemId {
    let primary_key = M::primary_key();
    let id: Vec<String> = primary_key
        .fields
        .iter()
        .filter_map(|field| {
            let part = match data {
                Some(data) => data.get(field.name.as_str()).cloned(),
                None => model.registry().get(&field.name),
            };
            part.filter(common::is_truthy).map(id_part)
        })
        .collect();
    PoolItemId {
        namespace: M::storage_name(),
        id: id.join(":"),
    }
}

/// Process-local identity map of models.
///
/// Models are keyed by their storage name and their composite id, the `:`-joined values of
/// their primary key fields. Construct one per scope, hand it to whatever loads models and
/// [`flush`](Self::flush) it when the scope ends.
///
/// ```rust
/// use dynamodb_fields::{
///     fields::{
///         definitions::FieldMap,
///         value::ValueField,
///         with_fields::{Entity, WithFields},
///     },
///     storage::{Storable, cache::StorageCache},
/// };
/// use serde_json::json;
/// use std::rc::Rc;
///
/// struct User;
///
/// impl Entity for User {}
///
/// impl Storable for User {
///     fn storage_name() -> &'static str {
///         "users"
///     }
/// }
///
/// let definitions = FieldMap::new()
///     .field("id", ValueField::string)
///     .field("name", ValueField::string)
///     .into();
/// let mut user = WithFields::new(User, &definitions);
/// user.populate(&json!({"id": "u1", "name": "A"}));
///
/// let mut cache = StorageCache::new();
/// cache.add(Rc::new(user));
///
/// let lookup = WithFields::new(User, &definitions);
/// let cached = cache.get(&lookup, Some(&json!({"id": "u1"}))).unwrap();
/// assert_eq!(cached.get("name"), Some(json!("A")));
/// ```
#[derive(Debug, Default)]
pub struct StorageCache {
    pool: StoragePool,
}

impl StorageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of the cache entries.
    pub fn pool(&self) -> &StoragePool {
        &self.pool
    }

    /// Cache `model` under its current primary key values, replacing any previous entry.
    pub fn add<M: Storable + HasFields + 'static>(&mut self, model: rc::Rc<M>) -> &mut Self {
        let PoolItemId { namespace, id } = get_pool_item_id(&*model, None);
        #[cfg(feature = "tracing")]
        tracing::trace!(namespace, id = %id, "storage cache add");
        self.pool
            .entry(namespace.to_string())
            .or_default()
            .insert(id, StorageCacheEntry::new(model));
        self
    }

    /// Drop the entry of `model`, if any.
    pub fn remove<M: Storable + HasFields>(&mut self, model: &M) -> &mut Self {
        let PoolItemId { namespace, id } = get_pool_item_id(model, None);
        if let Some(entries) = self.pool.get_mut(namespace) {
            #[cfg(feature = "tracing")]
            tracing::trace!(namespace, id = %id, "storage cache remove");
            entries.remove(&id);
        }
        self
    }

    /// The cached model with the identity of `model`.
    ///
    /// When `data` is given, key values are read from it instead of from `model`, so a raw
    /// record can be probed before a model is populated. An empty composite id never matches.
    pub fn get<M: Storable + HasFields + 'static>(
        &self,
        model: &M,
        data: Option<&Value>,
    ) -> Option<rc::Rc<M>> {
        let PoolItemId { namespace, id } = get_pool_item_id(model, data);
        if namespace.is_empty() || id.is_empty() {
            return None;
        }
        let cached = self
            .pool
            .get(namespace)
            .and_then(|entries| entries.get(&id))
            .and_then(StorageCacheEntry::model::<M>);
        #[cfg(feature = "tracing")]
        tracing::trace!(namespace, id = %id, hit = cached.is_some(), "storage cache get");
        cached
    }

    /// Drop every entry of every namespace.
    pub fn flush(&mut self) -> &mut Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(namespaces = self.pool.len(), "storage cache flush");
        self.pool.clear();
        self
    }
}

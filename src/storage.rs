//! Storage-side helpers for fields-models.
//!
//! This module provides:
//! - [`Storable`], the storage name and primary key of a model type
//! - [`primary_key::PrimaryKey`], the ordered identifying fields of a model type
//! - [`cache::StorageCache`], a process-local identity map of loaded models

/// Identity map of models keyed by storage name and composite id.
pub mod cache;

/// Primary key description of a model type.
pub mod primary_key;

use crate::fields::with_fields::WithFields;

/// A model type persisted under a storage name.
///
/// ```rust
/// use dynamodb_fields::storage::{Storable, primary_key::PrimaryKey};
///
/// struct Order;
///
/// impl Storable for Order {
///     fn storage_name() -> &'static str {
///         "orders"
///     }
///
///     fn primary_key() -> PrimaryKey {
///         PrimaryKey::new(["customer_id", "order_id"])
///     }
/// }
///
/// assert_eq!(Order::primary_key().names().collect::<Vec<_>>(), ["customer_id", "order_id"]);
/// ```
pub trait Storable {
    /// Name of the table (or namespace) the type is stored in.
    fn storage_name() -> &'static str;

    /// Identifying fields of the type, `id` unless overridden.
    fn primary_key() -> primary_key::PrimaryKey {
        primary_key::PrimaryKey::default()
    }
}

impl<B: Storable> Storable for WithFields<B> {
    fn storage_name() -> &'static str {
        B::storage_name()
    }

    fn primary_key() -> primary_key::PrimaryKey {
        B::primary_key()
    }
}

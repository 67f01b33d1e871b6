#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB Fields
//!
//! Typed, validating, dirty-tracking fields for models stored in Amazon DynamoDB.
//!
//! ## Overview
//!
//! This library composes plain entity types with a set of fields that:
//! - Are declared once per model type, statically or from the instance being built
//! - Track whether they changed since the last clean
//! - Validate independently and report every failure at once
//! - Serialize to JSON, optionally only the dirty or only the clean ones
//!
//! Next to the fields, it provides a process-local cache of loaded models keyed by primary key,
//! and filter operators producing DynamoDB expression fragments.
//!
//! ## Quick Example
//!
//! ```rust
//! use dynamodb_fields::fields::{
//!     definitions::FieldMap,
//!     field::FieldError,
//!     registry::ToJsonOptions,
//!     value::ValueField,
//!     with_fields::{Entity, WithFields},
//! };
//! use serde_json::{Value, json};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! struct User;
//!
//! impl Entity for User {}
//!
//! let definitions = FieldMap::new()
//!     .field("id", ValueField::string)
//!     .field("email", |name: &str| {
//!         ValueField::string(name).validation(|value| match value {
//!             Value::Null => Err(FieldError::new("Value is required.")),
//!             _ => Ok(()),
//!         })
//!     })
//!     .into();
//!
//! let mut user = WithFields::new(User, &definitions);
//! user.populate(&json!({"id": "u1"}));
//! // "email" is missing: the error lists it under its field name
//! let err = user.validate().await.unwrap_err();
//! assert!(err.invalid_fields().contains_key("email"));
//!
//! user.set("email", json!("a@b.c"));
//! user.validate().await?;
//! let dirty = user
//!     .to_json(ToJsonOptions {
//!         only_dirty: true,
//!         ..Default::default()
//!     })
//!     .await;
//! assert_eq!(dirty.len(), 2);
//! user.clean();
//! assert!(!user.is_dirty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Query-expression fragments
//! - [`mod@fields`] - Fields, field registries and their composition with entities
//! - [`mod@operators`] - Filter operators
//! - [`mod@storage`] - Storage names, primary keys and the storage cache

/// Query-expression fragments shared by filter operators.
pub mod common;

/// Fields attached to model entities.
///
/// This module provides:
/// - The field capability and stock field implementations
/// - Population from raw data, validation, dirty-tracking and JSON serialization
pub mod fields;

/// Filter operators producing DynamoDB expression fragments.
pub mod operators;

/// Storage names, primary keys and the storage cache.
pub mod storage;

//! Typed, validating, dirty-tracking fields attached to model entities.
//!
//! This module provides:
//! - The [`field::Field`] capability every field implements
//! - [`registry::FieldRegistry`], the ordered per-instance field storage and its aggregate operations
//! - [`with_fields::WithFields`], the composition of a base entity with a field registry
//! - Stock field implementations ([`value::ValueField`], [`nested::NestedField`])

/// Field definitions: static mappings or mappings computed from a partially built instance.
pub mod definitions;

/// Error types for aggregate validation.
pub mod error;

/// The field capability trait and per-field errors.
pub mod field;

/// A field holding another fields-model.
pub mod nested;

/// Ordered field storage with validation, dirty-tracking and serialization.
pub mod registry;

/// The stock value field.
pub mod value;

/// Composition of a base entity with a field registry.
pub mod with_fields;

//! Schema and field type system
//!
//! This module defines the entity schema used to validate selectors:
//! - Field types (Boolean, Long, Double, String, Date, Enum, Reference, ...)
//! - Entity mappings (stored names, arrays, embedded documents)
//! - The validated `Schema` registry and the `SchemaResolver`

mod field_type;
mod mapping;
mod registry;
mod resolver;

pub use field_type::{EnumType, FieldType, ValueType};
pub use mapping::{EntitySchema, FieldMapping};
pub use registry::{Schema, SchemaBuilder};
pub use resolver::{FieldDescriptor, SchemaResolver};

//! Field type definitions
//!
//! `FieldType` is what a schema declares for a field; `ValueType` is the
//! scalar type a query argument is converted to once a selector is resolved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Declared field data type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    String,
    /// Date/time instant
    Date,
    /// Backend object identifier (24 hex digits)
    ObjectId,
    /// Member of an enum declared in the schema
    Enum { name: String },
    /// Type converted by a registered parse function
    Custom { name: String },
    /// Embedded document with its own field mappings
    Object,
    /// Reference to a document of another entity
    Reference { entity: String },
    /// Field without a declared element type
    Untyped,
}

impl FieldType {
    /// Create an enum field type
    pub fn enumeration(name: impl Into<String>) -> Self {
        FieldType::Enum { name: name.into() }
    }

    /// Create a custom field type
    pub fn custom(name: impl Into<String>) -> Self {
        FieldType::Custom { name: name.into() }
    }

    /// Create a reference field type
    pub fn reference(entity: impl Into<String>) -> Self {
        FieldType::Reference {
            entity: entity.into(),
        }
    }

    /// Check if this field type holds a single scalar value
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            FieldType::Object | FieldType::Reference { .. } | FieldType::Untyped
        )
    }

    /// Check if selectors may continue past this field
    pub fn is_traversable(&self) -> bool {
        matches!(self, FieldType::Object)
    }

    /// Get the type name used in schema documents
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::ObjectId => "object_id",
            FieldType::Enum { .. } => "enum",
            FieldType::Custom { .. } => "custom",
            FieldType::Object => "object",
            FieldType::Reference { .. } => "reference",
            FieldType::Untyped => "untyped",
        }
    }
}

/// Enum declared in a schema
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Find the member matching `value`, ignoring case
    pub fn member(&self, value: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.eq_ignore_ascii_case(value))
            .map(String::as_str)
    }
}

/// Scalar type that query arguments are converted to
#[derive(Clone, Debug, PartialEq)]
pub enum ValueType {
    Boolean,
    Integer,
    Long,
    Float,
    Double,
    String,
    Date,
    ObjectId,
    Enum(Arc<EnumType>),
    Custom(String),
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Long => write!(f, "long"),
            ValueType::Float => write!(f, "float"),
            ValueType::Double => write!(f, "double"),
            ValueType::String => write!(f, "string"),
            ValueType::Date => write!(f, "date"),
            ValueType::ObjectId => write!(f, "object_id"),
            ValueType::Enum(e) => write!(f, "enum {}", e.name),
            ValueType::Custom(name) => write!(f, "{}", name),
        }
    }
}

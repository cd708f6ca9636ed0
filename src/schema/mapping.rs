//! Entity mapping definitions
//!
//! Mappings describe how an entity is stored: field types, stored names,
//! multiplicity and embedded documents.

use super::field_type::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field mapping configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field data type (element type for multi-valued fields)
    #[serde(flatten)]
    pub field_type: FieldType,

    /// Whether the field holds an array of values
    #[serde(default, rename = "array")]
    pub multi_valued: bool,

    /// Name of the field in the stored document, if different
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_as: Option<String>,

    /// Nested field mappings (for object types)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, FieldMapping>>,
}

impl FieldMapping {
    /// Create a new field mapping with the given type
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            multi_valued: false,
            stored_as: None,
            properties: None,
        }
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    pub fn long() -> Self {
        Self::new(FieldType::Long)
    }

    pub fn float() -> Self {
        Self::new(FieldType::Float)
    }

    pub fn double() -> Self {
        Self::new(FieldType::Double)
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    pub fn object_id() -> Self {
        Self::new(FieldType::ObjectId)
    }

    /// Create an enum field mapping
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(FieldType::enumeration(name))
    }

    /// Create a custom-typed field mapping
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(FieldType::custom(name))
    }

    /// Create a reference to another entity
    pub fn reference(entity: impl Into<String>) -> Self {
        Self::new(FieldType::reference(entity))
    }

    /// Create an embedded document mapping
    pub fn object(properties: HashMap<String, FieldMapping>) -> Self {
        Self::new(FieldType::Object).with_properties(properties)
    }

    /// Mark the field as an array of values
    pub fn array(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Set the stored field name
    pub fn stored_as(mut self, name: impl Into<String>) -> Self {
        self.stored_as = Some(name.into());
        self
    }

    /// Set nested field properties (for object types)
    pub fn with_properties(mut self, properties: HashMap<String, FieldMapping>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Add a nested field (for object types)
    pub fn field(mut self, name: impl Into<String>, mapping: FieldMapping) -> Self {
        self.properties
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), mapping);
        self
    }

    /// Name of this field in the stored document
    pub fn storage_name<'a>(&'a self, declared: &'a str) -> &'a str {
        self.stored_as.as_deref().unwrap_or(declared)
    }
}

/// Entity schema definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity name
    pub name: String,

    /// Name of the identifier field
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Field mappings
    #[serde(default)]
    pub properties: HashMap<String, FieldMapping>,
}

fn default_id_field() -> String {
    "id".to_string()
}

impl EntitySchema {
    /// Create a new entity with an `id` identifier field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: default_id_field(),
            properties: HashMap::new(),
        }
    }

    /// Add a field mapping
    pub fn field(mut self, name: impl Into<String>, mapping: FieldMapping) -> Self {
        self.properties.insert(name.into(), mapping);
        self
    }

    /// Set the identifier field name
    pub fn with_id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    /// Get the identifier field mapping
    pub fn id_mapping(&self) -> Option<&FieldMapping> {
        self.properties.get(&self.id_field)
    }

    /// Walk a dotted path, returning each segment with its mapping
    ///
    /// Only embedded objects are traversed. Empty segments never match.
    pub fn lookup_path<'a>(&'a self, path: &'a str) -> Option<Vec<(&'a str, &'a FieldMapping)>> {
        let mut props = &self.properties;
        let mut chain = Vec::new();
        let mut parts = path.split('.').peekable();

        while let Some(part) = parts.next() {
            if part.is_empty() {
                return None;
            }
            let field = props.get(part)?;
            chain.push((part, field));

            if parts.peek().is_some() {
                if !field.field_type.is_traversable() {
                    return None;
                }
                props = field.properties.as_ref()?;
            }
        }

        Some(chain)
    }
}

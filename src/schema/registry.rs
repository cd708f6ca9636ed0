//! Validated schema registry
//!
//! A `Schema` is built once, validated at construction and then shared
//! immutably (usually behind an `Arc`) by every compilation.

use super::field_type::{EnumType, FieldType};
use super::mapping::{EntitySchema, FieldMapping};
use crate::error::{FilterError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Immutable set of entity mappings and enum declarations
#[derive(Debug, Clone)]
pub struct Schema {
    entities: HashMap<String, EntitySchema>,
    enums: HashMap<String, Arc<EnumType>>,
}

/// On-disk schema document
#[derive(Debug, Default, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    entities: Vec<EntitySchema>,
    #[serde(default)]
    enums: HashMap<String, Vec<String>>,
}

impl Schema {
    /// Start building a schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Parse and validate a schema document
    ///
    /// ```json
    /// {
    ///   "enums": { "Status": ["ACTIVE", "PENDING"] },
    ///   "entities": [
    ///     { "name": "Person", "properties": { "id": { "type": "long" } } }
    ///   ]
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: SchemaDocument = serde_json::from_str(json)?;
        let mut builder = Schema::builder();
        for entity in doc.entities {
            builder = builder.entity(entity);
        }
        for (name, members) in doc.enums {
            builder = builder.enumeration(name, members);
        }
        builder.build()
    }

    /// Read a schema document from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Get an entity by name
    pub fn entity(&self, name: &str) -> Result<&EntitySchema> {
        self.entities
            .get(name)
            .ok_or_else(|| FilterError::UnknownEntity(name.to_string()))
    }

    /// Get a declared enum by name
    pub fn enumeration(&self, name: &str) -> Option<&Arc<EnumType>> {
        self.enums.get(name)
    }

    /// Names of all entities, sorted
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn validate(&self) -> Result<()> {
        for entity in self.entities.values() {
            if entity.id_mapping().is_none() {
                return Err(FilterError::InvalidSchema(format!(
                    "entity '{}' has no identifier field '{}'",
                    entity.name, entity.id_field
                )));
            }
            self.validate_properties(&entity.name, "", &entity.properties)?;
            self.validate_id_chain(entity)?;
        }
        Ok(())
    }

    fn validate_properties(
        &self,
        entity: &str,
        prefix: &str,
        props: &HashMap<String, FieldMapping>,
    ) -> Result<()> {
        for (name, mapping) in props {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            let invalid = |msg: String| {
                FilterError::InvalidSchema(format!("{}.{}: {}", entity, path, msg))
            };

            if name.is_empty() || name.contains('.') {
                return Err(invalid("field names must be non-empty and contain no '.'".into()));
            }
            if let Some(stored) = &mapping.stored_as {
                if stored.is_empty() || stored.contains('.') {
                    return Err(invalid(format!("invalid stored name '{}'", stored)));
                }
            }

            match &mapping.field_type {
                FieldType::Object => match &mapping.properties {
                    Some(nested) => self.validate_properties(entity, &path, nested)?,
                    None => return Err(invalid("object field has no properties".into())),
                },
                FieldType::Reference { entity: target } => {
                    if !self.entities.contains_key(target) {
                        return Err(invalid(format!("reference to unknown entity '{}'", target)));
                    }
                }
                FieldType::Enum { name } => {
                    if !self.enums.contains_key(name) {
                        return Err(invalid(format!("undeclared enum '{}'", name)));
                    }
                }
                _ => {}
            }

            if mapping.properties.is_some() && !mapping.field_type.is_traversable() {
                return Err(invalid(format!(
                    "{} field cannot declare properties",
                    mapping.field_type.type_name()
                )));
            }
        }
        Ok(())
    }

    /// Identifier fields must end in a scalar, following references without cycles
    fn validate_id_chain(&self, entity: &EntitySchema) -> Result<()> {
        let mut seen = HashSet::new();
        let mut current = entity;
        loop {
            if !seen.insert(current.name.as_str()) {
                return Err(FilterError::InvalidSchema(format!(
                    "identifier of entity '{}' references itself through '{}'",
                    entity.name, current.name
                )));
            }
            let id = current.id_mapping().ok_or_else(|| {
                FilterError::InvalidSchema(format!(
                    "entity '{}' has no identifier field '{}'",
                    current.name, current.id_field
                ))
            })?;
            match &id.field_type {
                FieldType::Reference { entity: target } => {
                    current = self.entity(target).map_err(|_| {
                        FilterError::InvalidSchema(format!(
                            "identifier of '{}' references unknown entity '{}'",
                            current.name, target
                        ))
                    })?;
                }
                t if t.is_scalar() => return Ok(()),
                t => {
                    return Err(FilterError::InvalidSchema(format!(
                        "identifier of entity '{}' must be scalar, got {}",
                        current.name,
                        t.type_name()
                    )))
                }
            }
        }
    }
}

/// Builder for `Schema`
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entities: Vec<EntitySchema>,
    enums: Vec<EnumType>,
}

impl SchemaBuilder {
    /// Add an entity
    pub fn entity(mut self, entity: EntitySchema) -> Self {
        self.entities.push(entity);
        self
    }

    /// Declare an enum
    pub fn enumeration<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums.push(EnumType::new(name, members));
        self
    }

    /// Validate and freeze the schema
    pub fn build(self) -> Result<Schema> {
        let mut entities = HashMap::new();
        for entity in self.entities {
            if entity.name.is_empty() {
                return Err(FilterError::InvalidSchema(
                    "entity name must not be empty".to_string(),
                ));
            }
            if entities.contains_key(&entity.name) {
                return Err(FilterError::InvalidSchema(format!(
                    "duplicate entity '{}'",
                    entity.name
                )));
            }
            entities.insert(entity.name.clone(), entity);
        }

        let mut enums = HashMap::new();
        for e in self.enums {
            if e.members.is_empty() {
                return Err(FilterError::InvalidSchema(format!(
                    "enum '{}' has no members",
                    e.name
                )));
            }
            if enums.contains_key(&e.name) {
                return Err(FilterError::InvalidSchema(format!(
                    "duplicate enum '{}'",
                    e.name
                )));
            }
            enums.insert(e.name.clone(), Arc::new(e));
        }

        let schema = Schema { entities, enums };
        schema.validate()?;
        Ok(schema)
    }
}

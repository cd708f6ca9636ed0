//! Selector resolution
//!
//! Turns a dotted selector into a `FieldDescriptor`: where the value is
//! stored and which scalar type query arguments must be converted to.

use super::field_type::{FieldType, ValueType};
use super::mapping::EntitySchema;
use super::registry::Schema;
use crate::config::CompilerSettings;
use crate::error::{FilterError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Resolved description of where and how a selector is stored
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    /// Dotted path in the stored document
    pub storage_path: String,
    /// Scalar type of the values (element type for arrays)
    pub value_type: ValueType,
    /// Whether the path addresses more than one value per document
    pub is_multi_valued: bool,
    /// Whether the field references another entity
    pub is_reference: bool,
}

/// Resolution cache keyed by (entity, selector)
type ResolutionCache = RwLock<HashMap<(String, String), FieldDescriptor>>;

/// Resolves selectors against a schema
pub struct SchemaResolver {
    schema: Arc<Schema>,
    reference_id_suffix: String,
    cache: Option<ResolutionCache>,
}

impl SchemaResolver {
    pub fn new(schema: Arc<Schema>, settings: &CompilerSettings) -> Self {
        Self {
            schema,
            reference_id_suffix: settings.reference_id_suffix.clone(),
            cache: settings
                .memoize_resolution
                .then(|| RwLock::new(HashMap::new())),
        }
    }

    /// The schema selectors are resolved against
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Resolve `selector` on `entity`
    pub fn resolve(&self, selector: &str, entity: &str) -> Result<FieldDescriptor> {
        let Some(cache) = &self.cache else {
            return self.resolve_uncached(selector, entity);
        };

        let key = (entity.to_string(), selector.to_string());
        if let Some(descriptor) = cache.read().get(&key) {
            trace!(entity, selector, "selector resolved from cache");
            return Ok(descriptor.clone());
        }

        let descriptor = self.resolve_uncached(selector, entity)?;
        cache.write().insert(key, descriptor.clone());
        Ok(descriptor)
    }

    /// Number of cached resolutions
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.read().len())
    }

    fn resolve_uncached(&self, selector: &str, entity: &str) -> Result<FieldDescriptor> {
        let entity = self.schema.entity(entity)?;
        let unresolved = || FilterError::UnresolvedSelector {
            selector: selector.to_string(),
        };

        let chain = entity.lookup_path(selector).ok_or_else(unresolved)?;
        let (_, field) = *chain.last().ok_or_else(unresolved)?;
        let mut path: Vec<&str> = chain
            .iter()
            .map(|&(part, mapping)| mapping.storage_name(part))
            .collect();
        let multi_valued = chain.iter().any(|(_, mapping)| mapping.multi_valued);

        let (value_type, is_reference) = match &field.field_type {
            FieldType::Reference { entity: target } => {
                path.push(&self.reference_id_suffix);
                (self.referenced_id_type(target, selector)?, true)
            }
            other => (self.value_type(other, selector)?, false),
        };

        let descriptor = FieldDescriptor {
            storage_path: path.join("."),
            value_type,
            is_multi_valued: multi_valued,
            is_reference,
        };
        trace!(
            entity = %entity.name,
            selector,
            storage_path = %descriptor.storage_path,
            value_type = %descriptor.value_type,
            "selector resolved"
        );
        Ok(descriptor)
    }

    /// Value type of the referenced entity's identifier
    fn referenced_id_type(&self, target: &str, selector: &str) -> Result<ValueType> {
        // the schema rejects cyclic identifier chains, so this terminates
        let mut entity: &EntitySchema = self.schema.entity(target)?;
        loop {
            let id = entity.id_mapping().ok_or_else(|| {
                FilterError::Internal(format!("entity '{}' lost its identifier", entity.name))
            })?;
            match &id.field_type {
                FieldType::Reference { entity: next } => entity = self.schema.entity(next)?,
                other => return self.value_type(other, selector),
            }
        }
    }

    fn value_type(&self, field_type: &FieldType, selector: &str) -> Result<ValueType> {
        let unsupported = || FilterError::UnsupportedType {
            type_name: field_type.type_name().to_string(),
            selector: Some(selector.to_string()),
        };

        Ok(match field_type {
            FieldType::Boolean => ValueType::Boolean,
            FieldType::Integer => ValueType::Integer,
            FieldType::Long => ValueType::Long,
            FieldType::Float => ValueType::Float,
            FieldType::Double => ValueType::Double,
            FieldType::String => ValueType::String,
            FieldType::Date => ValueType::Date,
            FieldType::ObjectId => ValueType::ObjectId,
            FieldType::Enum { name } => {
                ValueType::Enum(self.schema.enumeration(name).ok_or_else(unsupported)?.clone())
            }
            FieldType::Custom { name } => ValueType::Custom(name.clone()),
            FieldType::Object | FieldType::Reference { .. } | FieldType::Untyped => {
                return Err(unsupported())
            }
        })
    }
}

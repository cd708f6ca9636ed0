//! Registry of custom "parse from string" conversions
//!
//! Schema fields of type `custom { name }` are converted by the function
//! registered under `name`. The registry is filled once and then shared.

use crate::models::TypedValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a custom parse function
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseFault {
    /// The input is not a valid literal of the type
    #[error("{0}")]
    Format(String),
    /// The parser itself failed; treated as a defect, not a user error
    #[error("{0}")]
    Internal(String),
}

/// Parse function for a custom type
pub type ParseFn = Arc<dyn Fn(&str) -> Result<TypedValue, ParseFault> + Send + Sync>;

/// Closed mapping from custom type names to parse functions
#[derive(Clone, Default)]
pub struct TypeRegistry {
    parsers: HashMap<String, ParseFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the parse function for `name`, replacing any previous one
    pub fn with_parser<F>(mut self, name: impl Into<String>, parser: F) -> Self
    where
        F: Fn(&str) -> Result<TypedValue, ParseFault> + Send + Sync + 'static,
    {
        self.parsers.insert(name.into(), Arc::new(parser));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParseFn> {
        self.parsers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Registered type names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

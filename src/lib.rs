//! RSQL filter compiler
//!
//! Turns RSQL/FIQL filter expressions such as `age>=18;(city==Prague,city==Brno)`
//! into typed, schema-checked filter trees, and renders them as MongoDB
//! filter documents.
//!
//! ```rust
//! use rsql_filter::{CompilerSettings, EntitySchema, FieldMapping, FilterEngine, Schema};
//! use std::sync::Arc;
//!
//! let schema = Schema::builder()
//!     .entity(
//!         EntitySchema::new("Person")
//!             .field("id", FieldMapping::long())
//!             .field("age", FieldMapping::long()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let engine = FilterEngine::new(Arc::new(schema), CompilerSettings::default()).unwrap();
//! let query = engine.create_query("age=ge=18", "Person").unwrap();
//! assert_eq!(query.to_string(), r#"{"age":{"$gte":18}}"#);
//! ```

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod models;
pub mod query;
pub mod schema;

pub use config::CompilerSettings;
pub use convert::{ParseFault, TypeRegistry, ValueConverter};
pub use engine::FilterEngine;
pub use error::{FilterError, Result};
pub use models::*;
pub use query::{ComparisonOperator, FilterCompiler, LogicalOperator, MongoRenderer, SyntaxNode};
pub use schema::{EntitySchema, FieldDescriptor, FieldMapping, FieldType, Schema, SchemaResolver, ValueType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

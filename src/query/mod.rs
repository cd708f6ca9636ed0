//! Filter query language and compilation
//!
//! This module takes a filter from text to a backend document:
//! - RSQL parsing into a `SyntaxNode` tree (`rsql`)
//! - The comparison operator table (`operator`)
//! - Compilation against a schema into a typed `FilterNode` (`compiler`)
//! - MongoDB-style rendering (`render`)
//!
//! # Example
//!
//! ```text
//! age>=18;(city==Prague,city==Brno)
//!   => { "$and": [ { "age": { "$gte": 18 } },
//!                  { "$or": [ { "city": "Prague" }, { "city": "Brno" } ] } ] }
//! ```

pub mod ast;
pub mod compiler;
pub mod operator;
pub mod render;
pub mod rsql;

pub use ast::{ComparisonNode, LogicalOperator, SyntaxNode};
pub use compiler::FilterCompiler;
pub use operator::{Arity, ComparisonOperator, OperatorDef, OPERATORS};
pub use render::MongoRenderer;
pub use rsql::RsqlParser;

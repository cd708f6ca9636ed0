//! RSQL / FIQL filter expression parser
//!
//! Supports syntax like:
//! - `name==John;age=gt=30`
//! - `status=in=(active,pending),vip==true`
//! - `address.city=="Hradec Kralove" and born<2000-01-01`
//!
//! # Example
//!
//! ```rust
//! use rsql_filter::query::rsql::RsqlParser;
//!
//! let mut parser = RsqlParser::new("name==John;age=gt=30").unwrap();
//! let tree = parser.parse().unwrap();
//! assert_eq!(tree.depth(), 2);
//! ```

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token};
pub use parser::{parse, RsqlParser, DEFAULT_MAX_DEPTH};

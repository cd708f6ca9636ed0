//! Argument conversion
//!
//! Turns the raw strings of a query clause into `TypedValue`s of the field's
//! value type: booleans, numbers, dates, enum members, object ids and
//! registered custom types.

mod converter;
pub mod date;
mod registry;

pub use converter::ValueConverter;
pub use registry::{ParseFault, ParseFn, TypeRegistry};

pub mod filter;
pub mod value;

pub use filter::{FieldFilter, FilterNode, FilterValue, LogicalJoin, LogicalNode};
pub use value::TypedValue;

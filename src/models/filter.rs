//! Compiled filter tree
//!
//! A `FilterNode` is the backend-neutral output of compilation: every path
//! is a storage path and every value is already typed.

use super::value::TypedValue;
use crate::query::{Arity, ComparisonOperator, LogicalOperator};
use std::fmt;

/// Join applied to the children of a logical filter node
pub type LogicalJoin = LogicalOperator;

/// Compiled, fully typed filter
#[derive(Clone, Debug, PartialEq)]
pub enum FilterNode {
    Logical(LogicalNode),
    Field(FieldFilter),
}

/// AND/OR over compiled children, in query order
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalNode {
    pub join: LogicalJoin,
    pub children: Vec<FilterNode>,
}

/// Comparison against a single storage path
#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    pub path: String,
    pub operator: ComparisonOperator,
    pub value: FilterValue,
}

/// Argument of a field filter
///
/// `Multiple` is used exactly for multi-value operators.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Single(TypedValue),
    Multiple(Vec<TypedValue>),
}

impl FilterNode {
    /// Create an AND node
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Logical(LogicalNode {
            join: LogicalJoin::And,
            children,
        })
    }

    /// Create an OR node
    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Logical(LogicalNode {
            join: LogicalJoin::Or,
            children,
        })
    }

    /// Create a single-value field filter
    pub fn field(path: impl Into<String>, operator: ComparisonOperator, value: TypedValue) -> Self {
        FilterNode::Field(FieldFilter {
            path: path.into(),
            operator,
            value: FilterValue::Single(value),
        })
    }

    /// Create a multi-value field filter
    pub fn field_multi(
        path: impl Into<String>,
        operator: ComparisonOperator,
        values: Vec<TypedValue>,
    ) -> Self {
        FilterNode::Field(FieldFilter {
            path: path.into(),
            operator,
            value: FilterValue::Multiple(values),
        })
    }

    /// Number of field filters in the tree
    pub fn field_count(&self) -> usize {
        match self {
            FilterNode::Field(_) => 1,
            FilterNode::Logical(node) => node.children.iter().map(FilterNode::field_count).sum(),
        }
    }

    /// Depth of the tree (a single field filter has depth 1)
    pub fn depth(&self) -> usize {
        match self {
            FilterNode::Field(_) => 1,
            FilterNode::Logical(node) => {
                1 + node.children.iter().map(FilterNode::depth).max().unwrap_or(0)
            }
        }
    }
}

impl FieldFilter {
    /// Check that the value shape matches the operator's arity
    pub fn is_well_formed(&self) -> bool {
        match (&self.value, self.operator.arity()) {
            (FilterValue::Single(_), Arity::Single) => true,
            (FilterValue::Multiple(values), Arity::Multi) => !values.is_empty(),
            _ => false,
        }
    }
}

impl FilterValue {
    /// Values in argument order
    pub fn values(&self) -> &[TypedValue] {
        match self {
            FilterValue::Single(value) => std::slice::from_ref(value),
            FilterValue::Multiple(values) => values,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Single(value) => write!(f, "{}", value),
            FilterValue::Multiple(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::Field(field) => {
                write!(f, "{} {} {}", field.path, field.operator, field.value)
            }
            FilterNode::Logical(node) => {
                write!(f, "{}(", node.join)?;
                for (i, child) in node.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterNode {
        FilterNode::and(vec![
            FilterNode::field(
                "age",
                ComparisonOperator::GreaterThanOrEqual,
                TypedValue::Integer(18),
            ),
            FilterNode::or(vec![
                FilterNode::field("city", ComparisonOperator::Equal, TypedValue::String("Prague".into())),
                FilterNode::field("city", ComparisonOperator::Equal, TypedValue::String("Brno".into())),
            ]),
        ])
    }

    #[test]
    fn test_tree_metrics() {
        let tree = sample();
        assert_eq!(tree.field_count(), 3);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "AND(age >= 18, OR(city == \"Prague\", city == \"Brno\"))"
        );
        let node = FilterNode::field_multi(
            "n",
            ComparisonOperator::In,
            vec![TypedValue::Integer(1), TypedValue::Integer(2)],
        );
        assert_eq!(node.to_string(), "n =in= [1, 2]");
    }

    #[test]
    fn test_well_formed() {
        let single = FieldFilter {
            path: "a".into(),
            operator: ComparisonOperator::Equal,
            value: FilterValue::Single(TypedValue::Integer(1)),
        };
        assert!(single.is_well_formed());

        let wrong = FieldFilter {
            operator: ComparisonOperator::In,
            ..single.clone()
        };
        assert!(!wrong.is_well_formed());

        let empty = FieldFilter {
            operator: ComparisonOperator::All,
            value: FilterValue::Multiple(vec![]),
            ..single
        };
        assert!(!empty.is_well_formed());
    }

    #[test]
    fn test_values() {
        let v = FilterValue::Single(TypedValue::Boolean(true));
        assert_eq!(v.values(), &[TypedValue::Boolean(true)]);
    }
}

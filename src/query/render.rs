//! MongoDB-style rendering of compiled filters
//!
//! Produces the JSON filter document a MongoDB driver accepts, using
//! extended JSON for dates, object ids and non-finite doubles.

use crate::models::{FieldFilter, FilterNode, FilterValue, LogicalJoin, TypedValue};
use chrono::SecondsFormat;
use serde_json::{json, Number, Value};

/// Renders `FilterNode` trees as MongoDB filter documents
#[derive(Clone, Copy, Debug, Default)]
pub struct MongoRenderer;

impl MongoRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a filter tree
    pub fn render(&self, node: &FilterNode) -> Value {
        match node {
            FilterNode::Logical(logical) => {
                let key = match logical.join {
                    LogicalJoin::And => "$and",
                    LogicalJoin::Or => "$or",
                };
                let children: Vec<Value> = logical.children.iter().map(|c| self.render(c)).collect();
                json!({ key: children })
            }
            FilterNode::Field(field) => self.render_field(field),
        }
    }

    fn render_field(&self, field: &FieldFilter) -> Value {
        let value = match &field.value {
            FilterValue::Single(v) => self.render_value(v),
            FilterValue::Multiple(values) => {
                Value::Array(values.iter().map(|v| self.render_value(v)).collect())
            }
        };
        field.operator.render(&field.path, value)
    }

    /// Render a single typed value
    pub fn render_value(&self, value: &TypedValue) -> Value {
        match value {
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::Integer(i) => Value::from(*i),
            TypedValue::Double(d) => match Number::from_f64(*d) {
                Some(n) => Value::Number(n),
                None => json!({ "$numberDouble": non_finite_name(*d) }),
            },
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::DateTime(dt) => {
                json!({ "$date": dt.to_rfc3339_opts(SecondsFormat::Millis, true) })
            }
            TypedValue::Enum { member, .. } => Value::String(member.clone()),
            TypedValue::ObjectId(oid) => json!({ "$oid": oid }),
        }
    }
}

fn non_finite_name(d: f64) -> &'static str {
    if d.is_nan() {
        "NaN"
    } else if d.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fmt;

/// A converted query argument
///
/// Values only compare with values of the same variant.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Enum { enum_name: String, member: String },
    /// Backend object identifier, lowercase hex
    ObjectId(String),
}

impl TypedValue {
    /// Create an enum member value
    pub fn enum_member(enum_name: impl Into<String>, member: impl Into<String>) -> Self {
        TypedValue::Enum {
            enum_name: enum_name.into(),
            member: member.into(),
        }
    }

    /// Get the variant name for debugging and logging
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Boolean(_) => "boolean",
            TypedValue::Integer(_) => "integer",
            TypedValue::Double(_) => "double",
            TypedValue::String(_) => "string",
            TypedValue::DateTime(_) => "date",
            TypedValue::Enum { .. } => "enum",
            TypedValue::ObjectId(_) => "object_id",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) | TypedValue::ObjectId(s) => Some(s),
            TypedValue::Enum { member, .. } => Some(member),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialOrd for TypedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::Boolean(a), TypedValue::Boolean(b)) => a.partial_cmp(b),
            (TypedValue::Integer(a), TypedValue::Integer(b)) => a.partial_cmp(b),
            (TypedValue::Double(a), TypedValue::Double(b)) => a.partial_cmp(b),
            (TypedValue::String(a), TypedValue::String(b)) => a.partial_cmp(b),
            (TypedValue::DateTime(a), TypedValue::DateTime(b)) => a.partial_cmp(b),
            (TypedValue::ObjectId(a), TypedValue::ObjectId(b)) => a.partial_cmp(b),
            (
                TypedValue::Enum {
                    enum_name: a_name,
                    member: a,
                },
                TypedValue::Enum {
                    enum_name: b_name,
                    member: b,
                },
            ) if a_name == b_name => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Boolean(v) => write!(f, "{}", v),
            TypedValue::Integer(v) => write!(f, "{}", v),
            TypedValue::Double(v) => write!(f, "{}", v),
            TypedValue::String(v) => write!(f, "\"{}\"", v),
            TypedValue::DateTime(v) => write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::Secs, true)),
            TypedValue::Enum { enum_name, member } => write!(f, "{}.{}", enum_name, member),
            TypedValue::ObjectId(v) => write!(f, "ObjectId({})", v),
        }
    }
}

//! Conversion of raw query arguments to typed values
//!
//! Conversion is pure: the same `(raw, type)` pair always produces the same
//! value or the same kind of error.

use super::date::{parse_date_time, ACCEPTED_FORMATS};
use super::registry::{ParseFault, TypeRegistry};
use crate::config::CompilerSettings;
use crate::error::{FilterError, Result};
use crate::models::TypedValue;
use crate::schema::ValueType;
use chrono::FixedOffset;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

const TRUE_VALUES: [&str; 3] = ["true", "yes", "y"];
const FALSE_VALUES: [&str; 3] = ["false", "no", "n"];

/// Converts argument strings to the value type of a resolved field
#[derive(Clone, Debug)]
pub struct ValueConverter {
    types: Arc<TypeRegistry>,
    local_offset: FixedOffset,
}

impl ValueConverter {
    /// Create a converter without custom types
    pub fn new(settings: &CompilerSettings) -> Result<Self> {
        Self::with_type_registry(settings, Arc::new(TypeRegistry::new()))
    }

    /// Create a converter that resolves custom types through `types`
    pub fn with_type_registry(settings: &CompilerSettings, types: Arc<TypeRegistry>) -> Result<Self> {
        settings.validate()?;
        let local_offset = FixedOffset::east_opt(settings.local_offset_seconds).ok_or_else(|| {
            FilterError::InvalidSettings(format!(
                "invalid local offset {}",
                settings.local_offset_seconds
            ))
        })?;
        Ok(Self {
            types,
            local_offset,
        })
    }

    /// Convert a single argument
    pub fn convert(&self, raw: &str, target: &ValueType) -> Result<TypedValue> {
        trace!(raw, target = %target, "converting argument");

        match target {
            ValueType::String => Ok(TypedValue::String(raw.to_string())),
            ValueType::Boolean => parse_boolean(raw).map(TypedValue::Boolean),
            ValueType::Integer => parse_number::<i32>(raw, target).map(|v| TypedValue::Integer(v.into())),
            ValueType::Long => parse_number::<i64>(raw, target).map(TypedValue::Integer),
            ValueType::Float => parse_float(raw, target).map(|v| TypedValue::Double(v.into())),
            ValueType::Double => parse_number::<f64>(raw, target).map(TypedValue::Double),
            ValueType::Date => parse_date_time(raw, self.local_offset)
                .map(TypedValue::DateTime)
                .ok_or_else(|| FilterError::argument_format(raw, "date").with_detail(ACCEPTED_FORMATS)),
            ValueType::ObjectId => parse_object_id(raw),
            ValueType::Enum(enum_type) => enum_type
                .member(raw)
                .map(|member| TypedValue::enum_member(&enum_type.name, member))
                .ok_or_else(|| {
                    FilterError::argument_format(raw, target.to_string()).with_detail(format!(
                        "expected one of {}",
                        enum_type.members.join(", ")
                    ))
                }),
            ValueType::Custom(name) => self.convert_custom(raw, name),
        }
    }

    /// Convert every argument, failing on the first one that does not convert
    pub fn convert_all<S: AsRef<str>>(&self, raw: &[S], target: &ValueType) -> Result<Vec<TypedValue>> {
        raw.iter().map(|r| self.convert(r.as_ref(), target)).collect()
    }

    fn convert_custom(&self, raw: &str, name: &str) -> Result<TypedValue> {
        let parser = self.types.get(name).ok_or_else(|| FilterError::UnsupportedType {
            type_name: name.to_string(),
            selector: None,
        })?;

        parser(raw).map_err(|fault| match fault {
            ParseFault::Format(detail) => FilterError::argument_format(raw, name).with_detail(detail),
            ParseFault::Internal(detail) => {
                FilterError::Internal(format!("parser for type '{}' failed: {}", name, detail))
            }
        })
    }
}

fn parse_boolean(raw: &str) -> Result<bool> {
    let value = raw.trim().to_lowercase();
    if TRUE_VALUES.contains(&value.as_str()) {
        Ok(true)
    } else if FALSE_VALUES.contains(&value.as_str()) {
        Ok(false)
    } else {
        Err(FilterError::argument_format(raw, "boolean")
            .with_detail("expected one of true, yes, y, false, no, n"))
    }
}

fn parse_number<T>(raw: &str, target: &ValueType) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| FilterError::argument_format(raw, target.to_string()).with_detail(e.to_string()))
}

/// Parse an `f32`, rejecting finite input that overflows to infinity
fn parse_float(raw: &str, target: &ValueType) -> Result<f32> {
    let value = parse_number::<f32>(raw, target)?;
    if value.is_finite() || is_non_finite_literal(raw) {
        Ok(value)
    } else {
        Err(FilterError::argument_format(raw, target.to_string())
            .with_detail(format!("out of range, magnitude above {:e}", f32::MAX)))
    }
}

fn is_non_finite_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    ["inf", "infinity", "nan"]
        .iter()
        .any(|literal| unsigned.eq_ignore_ascii_case(literal))
}

fn parse_object_id(raw: &str) -> Result<TypedValue> {
    if raw.len() == 24 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(TypedValue::ObjectId(raw.to_ascii_lowercase()))
    } else {
        Err(FilterError::argument_format(raw, "object_id").with_detail("expected 24 hexadecimal digits"))
    }
}

use thiserror::Error;

use crate::query::ComparisonOperator;

/// Main error type for filter parsing and compilation
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Could not find matching field for selector: {selector}")]
    UnresolvedSelector { selector: String },

    #[error("Operator {operator} on '{selector}' expects {expected} argument(s), got {got}")]
    Arity {
        selector: String,
        operator: ComparisonOperator,
        got: usize,
        expected: usize,
    },

    #[error("Cannot convert '{raw}' to {target}{}{}",
        .selector.as_ref().map(|s| format!(" for '{}'", s)).unwrap_or_default(),
        .detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
    ArgumentFormat {
        raw: String,
        target: String,
        detail: Option<String>,
        selector: Option<String>,
    },

    #[error("Unsupported target type: {type_name}{}",
        .selector.as_ref().map(|s| format!(" (selector '{}')", s)).unwrap_or_default())]
    UnsupportedType {
        type_name: String,
        selector: Option<String>,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    /// Build an argument format error without a selector or detail
    pub fn argument_format(raw: impl Into<String>, target: impl Into<String>) -> Self {
        FilterError::ArgumentFormat {
            raw: raw.into(),
            target: target.into(),
            detail: None,
            selector: None,
        }
    }

    /// Attach the underlying parse failure to an argument format error
    pub fn with_detail(mut self, message: impl Into<String>) -> Self {
        if let FilterError::ArgumentFormat { ref mut detail, .. } = self {
            *detail = Some(message.into());
        }
        self
    }

    /// Attach the offending selector for user-facing context
    pub fn with_selector(mut self, name: &str) -> Self {
        match self {
            FilterError::ArgumentFormat {
                ref mut selector, ..
            }
            | FilterError::UnsupportedType {
                ref mut selector, ..
            } => {
                if selector.is_none() {
                    *selector = Some(name.to_string());
                }
            }
            _ => {}
        }
        self
    }

    /// Whether the error was caused by the query itself (a "bad request")
    /// rather than by configuration or a defect
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FilterError::Syntax(_)
                | FilterError::UnknownEntity(_)
                | FilterError::UnresolvedSelector { .. }
                | FilterError::Arity { .. }
                | FilterError::ArgumentFormat { .. }
                | FilterError::UnsupportedType { .. }
        )
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::Syntax(_) => "syntax",
            FilterError::UnknownEntity(_) => "unknown_entity",
            FilterError::UnresolvedSelector { .. } => "unresolved_selector",
            FilterError::Arity { .. } => "arity",
            FilterError::ArgumentFormat { .. } => "argument_format",
            FilterError::UnsupportedType { .. } => "unsupported_type",
            FilterError::InvalidSchema(_) => "invalid_schema",
            FilterError::InvalidSettings(_) => "invalid_settings",
            FilterError::Internal(_) => "internal",
            FilterError::Io(_) => "io",
            FilterError::Json(_) => "json",
        }
    }
}

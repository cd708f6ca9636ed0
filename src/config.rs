use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Suffix addressing the identifier inside a stored document reference
pub const DEFAULT_REFERENCE_ID_SUFFIX: &str = "$id";

/// Settings shared by the parser, the schema resolver and the value converter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Appended to the storage path of reference fields
    pub reference_id_suffix: String,
    /// Offset (seconds east of UTC) applied to local date-times and plain dates
    pub local_offset_seconds: i32,
    /// Cache successful selector resolutions per entity
    pub memoize_resolution: bool,
    /// Maximum nesting of logical nodes, checked by the parser and the compiler
    pub max_depth: usize,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            reference_id_suffix: DEFAULT_REFERENCE_ID_SUFFIX.to_string(),
            local_offset_seconds: 0,
            memoize_resolution: true,
            max_depth: 64,
        }
    }
}

impl CompilerSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON document; missing keys fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: CompilerSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Set the reference identifier suffix
    pub fn with_reference_id_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.reference_id_suffix = suffix.into();
        self
    }

    /// Set the offset used for local date-times
    pub fn with_local_offset_seconds(mut self, seconds: i32) -> Self {
        self.local_offset_seconds = seconds;
        self
    }

    /// Enable or disable the resolution cache
    pub fn with_memoize_resolution(mut self, enabled: bool) -> Self {
        self.memoize_resolution = enabled;
        self
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.local_offset_seconds.abs() >= 86_400 {
            return Err(FilterError::InvalidSettings(format!(
                "local_offset_seconds must be within a day, got {}",
                self.local_offset_seconds
            )));
        }
        if self.reference_id_suffix.is_empty() || self.reference_id_suffix.contains('.') {
            return Err(FilterError::InvalidSettings(format!(
                "reference_id_suffix must be a single path segment, got '{}'",
                self.reference_id_suffix
            )));
        }
        if self.max_depth == 0 {
            return Err(FilterError::InvalidSettings(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

use crate::types::*;
use std::ffi::OsString;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Environment variable naming the handwriting font file
pub const HANDWRITING_FONT_ENV: &str = "PDF_FIELDS_HANDWRITING_FONT";

/// Field insertion configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InsertOptions {
    /// TrueType font for signature fields; Helvetica is used without one
    pub handwriting_font: Option<PathBuf>,

    // Font size bounds per field category
    pub standard_font_sizes: FontSizeRange,
    pub handwriting_font_sizes: FontSizeRange,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            handwriting_font: None,
            standard_font_sizes: FontSizeRange::STANDARD,
            handwriting_font_sizes: FontSizeRange::HANDWRITING,
        }
    }
}

impl InsertOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| FieldError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| FieldError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Apply the `PDF_FIELDS_HANDWRITING_FONT` override, if set
    pub fn with_env(self) -> Self {
        self.with_handwriting_font_override(std::env::var_os(HANDWRITING_FONT_ENV))
    }

    /// Replace the handwriting font path with a non-empty override
    pub fn with_handwriting_font_override(mut self, value: Option<OsString>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.handwriting_font = Some(PathBuf::from(value));
        }
        self
    }

    /// Size bounds for a field type
    pub fn font_sizes(&self, field_type: FieldType) -> FontSizeRange {
        if field_type.is_signature() {
            self.handwriting_font_sizes
        } else {
            self.standard_font_sizes
        }
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.handwriting_font {
            if path.as_os_str().is_empty() {
                return Err(FieldError::Config(
                    "Handwriting font path is empty".to_string(),
                ));
            }
        }

        for (label, range) in [
            ("standard", self.standard_font_sizes),
            ("handwriting", self.handwriting_font_sizes),
        ] {
            if !(range.min > 0.0 && range.min.is_finite() && range.max.is_finite()) {
                return Err(FieldError::Config(format!(
                    "{} font sizes must be positive, got {}..{}",
                    label, range.min, range.max
                )));
            }
            if range.min > range.max {
                return Err(FieldError::Config(format!(
                    "{} minimum font size {} exceeds maximum {}",
                    label, range.min, range.max
                )));
            }
        }

        Ok(())
    }
}

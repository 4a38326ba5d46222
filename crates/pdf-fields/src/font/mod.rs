//! Fonts for text fields
//!
//! Standard fields use the built-in Helvetica; signature fields use a
//! TrueType handwriting font when one is configured. Both are encoded with
//! WinAnsiEncoding, so measuring and drawing agree on the same byte codes.

mod encoding;
mod standard;
mod truetype;

pub use encoding::{encode_win_ansi, win_ansi_char, win_ansi_code};
pub use standard::StandardFont;
pub use truetype::TrueTypeFont;

use crate::options::InsertOptions;
use crate::types::{FieldType, Result};
use lopdf::{Document, ObjectId};
use std::path::Path;

/// Text measurement in points
pub trait FontMetrics {
    /// Advance width of a single line of text
    fn width_of_text_at_size(&self, text: &str, size: f32) -> f32;

    /// Height of a line box (ascender to descender)
    fn height_at_size(&self, size: f32) -> f32;

    /// Depth of the descender below the baseline, as a positive number
    fn descent_at_size(&self, size: f32) -> f32;
}

/// A font that can be measured and embedded into a document
#[derive(Debug, Clone)]
pub enum FieldFont {
    Standard(StandardFont),
    TrueType(TrueTypeFont),
}

impl FieldFont {
    /// Add the font dictionary (and any font program) to the document
    pub fn embed(&self, doc: &mut Document) -> Result<ObjectId> {
        match self {
            FieldFont::Standard(font) => Ok(font.embed(doc)),
            FieldFont::TrueType(font) => font.embed(doc),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldFont::Standard(font) => font.base_font(),
            FieldFont::TrueType(font) => font.name(),
        }
    }
}

impl FontMetrics for FieldFont {
    fn width_of_text_at_size(&self, text: &str, size: f32) -> f32 {
        match self {
            FieldFont::Standard(font) => font.width_of_text_at_size(text, size),
            FieldFont::TrueType(font) => font.width_of_text_at_size(text, size),
        }
    }

    fn height_at_size(&self, size: f32) -> f32 {
        match self {
            FieldFont::Standard(font) => font.height_at_size(size),
            FieldFont::TrueType(font) => font.height_at_size(size),
        }
    }

    fn descent_at_size(&self, size: f32) -> f32 {
        match self {
            FieldFont::Standard(font) => font.descent_at_size(size),
            FieldFont::TrueType(font) => font.descent_at_size(size),
        }
    }
}

/// The fonts available while inserting fields
#[derive(Debug, Clone)]
pub struct FieldFonts {
    standard: FieldFont,
    handwriting: Option<FieldFont>,
}

impl Default for FieldFonts {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FieldFonts {
    pub fn new(handwriting: Option<TrueTypeFont>) -> Self {
        Self {
            standard: FieldFont::Standard(StandardFont::helvetica()),
            handwriting: handwriting.map(FieldFont::TrueType),
        }
    }

    /// Load the fonts named by the options
    pub async fn load(options: &InsertOptions) -> Result<Self> {
        let handwriting = match &options.handwriting_font {
            Some(path) => {
                let name = font_name_from_path(path);
                let bytes = tokio::fs::read(path).await?;
                let font =
                    tokio::task::spawn_blocking(move || TrueTypeFont::from_bytes(name, bytes))
                        .await??;
                log::debug!("Loaded handwriting font {} from {}", font.name(), path.display());
                Some(font)
            }
            None => None,
        };

        Ok(Self::new(handwriting))
    }

    pub fn has_handwriting(&self) -> bool {
        self.handwriting.is_some()
    }

    /// Font for a field: handwriting for signatures, Helvetica otherwise
    pub fn for_field(&self, field_type: FieldType) -> &FieldFont {
        if !field_type.is_signature() {
            return &self.standard;
        }

        match &self.handwriting {
            Some(font) => font,
            None => {
                log::warn!(
                    "No handwriting font configured, drawing {:?} field with {}",
                    field_type,
                    self.standard.name()
                );
                &self.standard
            }
        }
    }
}

/// PDF font name derived from a font file name, e.g. `Caveat-Regular`
fn font_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

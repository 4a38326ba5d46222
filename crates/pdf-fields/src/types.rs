use crate::constants::{
    DEFAULT_HANDWRITING_FONT_SIZE, DEFAULT_STANDARD_FONT_SIZE, MIN_HANDWRITING_FONT_SIZE,
    MIN_STANDARD_FONT_SIZE,
};
use crate::geometry::{ImagePlacement, TextPlacement};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Page {page} does not exist (document has {page_count} pages)")]
    PageNotFound { page: u32, page_count: usize },
    #[error("Unsupported page rotation: {0} degrees")]
    InvalidRotation(i64),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] ::image::ImageError),
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, FieldError>;

/// Kind of field placed on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FieldType {
    Signature,
    FreeSignature,
    Name,
    Email,
    Date,
    Text,
}

impl FieldType {
    /// Signature fields are drawn with the handwriting font, or as an image
    /// when a signature image is attached.
    pub fn is_signature(self) -> bool {
        matches!(self, FieldType::Signature | FieldType::FreeSignature)
    }
}

/// Signature data attached to a signature field
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Signature {
    /// PNG/JPEG image as plain base64 or a `data:` URI
    pub signature_image_as_base64: Option<String>,
    pub typed_signature: Option<String>,
}

impl Signature {
    /// Wrap encoded image bytes (as read from a PNG or JPEG file)
    pub fn from_image_bytes(bytes: &[u8]) -> Self {
        use base64::Engine;

        Self {
            signature_image_as_base64: Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            typed_signature: None,
        }
    }
}

/// A field to insert, positioned in percentages of the visible page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Field {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub field_type: FieldType,
    /// 1-based page number
    pub page: u32,
    /// Left edge, percent of the page width (0 = left)
    pub position_x: f32,
    /// Top edge, percent of the page height (0 = top)
    pub position_y: f32,
    pub width: f32,
    pub height: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub custom_text: String,
    #[cfg_attr(feature = "serde", serde(default, alias = "Signature"))]
    pub signature: Option<Signature>,
}

impl Field {
    /// Load a field description from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| FieldError::Config(format!("Failed to parse field: {}", e)))
    }

    /// The signature image to draw, if this is a signature field carrying one
    pub fn signature_image(&self) -> Option<&str> {
        if !self.field_type.is_signature() {
            return None;
        }
        self.signature
            .as_ref()
            .and_then(|s| s.signature_image_as_base64.as_deref())
    }
}

/// Page rotation as stored in the page's `/Rotate` entry (clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl PageRotation {
    /// Normalize a `/Rotate` value. Only right angles are valid.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(PageRotation::None),
            90 => Ok(PageRotation::Clockwise90),
            180 => Ok(PageRotation::Clockwise180),
            270 => Ok(PageRotation::Clockwise270),
            _ => Err(FieldError::InvalidRotation(degrees)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            PageRotation::None => 0,
            PageRotation::Clockwise90 => 90,
            PageRotation::Clockwise180 => 180,
            PageRotation::Clockwise270 => 270,
        }
    }

    /// Whether the page is displayed with width and height swapped
    pub fn is_landscape(self) -> bool {
        matches!(self, PageRotation::Clockwise90 | PageRotation::Clockwise270)
    }
}

/// Inclusive font size bounds in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSizeRange {
    pub min: f32,
    pub max: f32,
}

impl FontSizeRange {
    pub const STANDARD: Self = Self {
        min: MIN_STANDARD_FONT_SIZE,
        max: DEFAULT_STANDARD_FONT_SIZE,
    };

    pub const HANDWRITING: Self = Self {
        min: MIN_HANDWRITING_FONT_SIZE,
        max: DEFAULT_HANDWRITING_FONT_SIZE,
    };

    pub fn clamp(self, size: f32) -> f32 {
        size.min(self.max).max(self.min)
    }
}

/// Where a field ended up, in visual page coordinates (bottom-left origin)
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Text(TextPlacement),
    Image(ImagePlacement),
}

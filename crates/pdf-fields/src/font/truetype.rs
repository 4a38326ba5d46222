use super::FontMetrics;
use super::encoding::{encode_win_ansi, win_ansi_char};
use crate::render::deflate;
use crate::types::{FieldError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::fmt;
use std::sync::Arc;
use ttf_parser::{Face, GlyphId};

/// First and last WinAnsi codes written to the `Widths` array
const FIRST_CHAR: u8 = 0x20;
const LAST_CHAR: u8 = 0xFF;

/// Symbolic flag clear, nonsymbolic flag set
const FLAG_NONSYMBOLIC: i64 = 1 << 5;

/// A TrueType font program, measured in 1000 units per em
#[derive(Clone)]
pub struct TrueTypeFont {
    name: String,
    data: Arc<Vec<u8>>,
    /// Advance widths indexed by WinAnsi code
    widths: Vec<u16>,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    bbox: [f32; 4],
}

impl fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .finish()
    }
}

impl TrueTypeFont {
    /// Parse a font program. `name` becomes the PDF `BaseFont`.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0).map_err(|e| FieldError::Font(e.to_string()))?;

        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return Err(FieldError::Font("Font has no units per em".to_string()));
        }
        let scale = 1000.0 / units_per_em;
        let to_pdf = |units: f32| (units * scale).round();

        let missing_width = face.glyph_hor_advance(GlyphId(0)).unwrap_or(0);
        let widths = (0..=LAST_CHAR)
            .map(|code| {
                let advance = win_ansi_char(code)
                    .and_then(|c| face.glyph_index(c))
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .unwrap_or(missing_width);
                to_pdf(advance as f32) as u16
            })
            .collect();

        let ascent = to_pdf(face.ascender() as f32);
        let descent = to_pdf(face.descender() as f32);
        let cap_height = face
            .capital_height()
            .map(|h| to_pdf(h as f32))
            .unwrap_or(ascent);
        let global = face.global_bounding_box();
        let bbox = [
            to_pdf(global.x_min as f32),
            to_pdf(global.y_min as f32),
            to_pdf(global.x_max as f32),
            to_pdf(global.y_max as f32),
        ];

        Ok(Self {
            name: sanitize_font_name(&name.into()),
            data: Arc::new(data),
            widths,
            ascent,
            descent,
            cap_height,
            bbox,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn code_width(&self, code: u8) -> u16 {
        self.widths.get(code as usize).copied().unwrap_or(0)
    }

    /// Embed as a simple TrueType font with its program in `FontFile2`
    pub fn embed(&self, doc: &mut Document) -> Result<ObjectId> {
        let mut file_dict = Dictionary::new();
        file_dict.set("Length1", Object::Integer(self.data.len() as i64));
        file_dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        let file_id = doc.add_object(
            Stream::new(file_dict, deflate(&self.data)?).with_compression(false),
        );

        let mut descriptor = Dictionary::new();
        descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
        descriptor.set("FontName", Object::Name(self.name.as_bytes().to_vec()));
        descriptor.set("Flags", Object::Integer(FLAG_NONSYMBOLIC));
        descriptor.set(
            "FontBBox",
            Object::Array(self.bbox.iter().map(|&v| Object::Real(v)).collect()),
        );
        descriptor.set("ItalicAngle", Object::Integer(0));
        descriptor.set("Ascent", Object::Real(self.ascent));
        descriptor.set("Descent", Object::Real(self.descent));
        descriptor.set("CapHeight", Object::Real(self.cap_height));
        descriptor.set("StemV", Object::Integer(80));
        descriptor.set("FontFile2", Object::Reference(file_id));
        let descriptor_id = doc.add_object(descriptor);

        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| Object::Integer(self.code_width(code) as i64))
            .collect();

        let mut font_dict = Dictionary::new();
        font_dict.set("Type", Object::Name(b"Font".to_vec()));
        font_dict.set("Subtype", Object::Name(b"TrueType".to_vec()));
        font_dict.set("BaseFont", Object::Name(self.name.as_bytes().to_vec()));
        font_dict.set("FirstChar", Object::Integer(FIRST_CHAR as i64));
        font_dict.set("LastChar", Object::Integer(LAST_CHAR as i64));
        font_dict.set("Widths", Object::Array(widths));
        font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        font_dict.set("FontDescriptor", Object::Reference(descriptor_id));

        Ok(doc.add_object(font_dict))
    }
}

impl FontMetrics for TrueTypeFont {
    fn width_of_text_at_size(&self, text: &str, size: f32) -> f32 {
        let (codes, _) = encode_win_ansi(text);
        let units: u32 = codes.iter().map(|&c| self.code_width(c) as u32).sum();
        units as f32 / 1000.0 * size
    }

    fn height_at_size(&self, size: f32) -> f32 {
        (self.ascent - self.descent) / 1000.0 * size
    }

    fn descent_at_size(&self, size: f32) -> f32 {
        -self.descent / 1000.0 * size
    }
}

/// PDF names here may only hold printable ASCII without delimiters
fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .collect();

    if cleaned.is_empty() {
        "Handwriting".to_string()
    } else {
        cleaned
    }
}

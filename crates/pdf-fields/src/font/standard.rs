use super::FontMetrics;
use super::encoding::encode_win_ansi;
use crate::constants::{
    HELVETICA_ASCENDER, HELVETICA_ASCII_WIDTHS, HELVETICA_DEFAULT_WIDTH, HELVETICA_DESCENDER,
    HELVETICA_HIGH_WIDTHS,
};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// One of the standard 14 fonts, which viewers supply themselves
#[derive(Debug, Clone, PartialEq)]
pub struct StandardFont {
    base_font: &'static str,
}

impl StandardFont {
    pub fn helvetica() -> Self {
        Self {
            base_font: "Helvetica",
        }
    }

    pub fn base_font(&self) -> &str {
        self.base_font
    }

    fn code_width(code: u8) -> u16 {
        match code {
            0x20..=0x7E => HELVETICA_ASCII_WIDTHS[(code - 0x20) as usize],
            0x80..=0xFF => HELVETICA_HIGH_WIDTHS[(code - 0x80) as usize],
            _ => HELVETICA_DEFAULT_WIDTH,
        }
    }

    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut font_dict = Dictionary::new();
        font_dict.set("Type", Object::Name(b"Font".to_vec()));
        font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        font_dict.set("BaseFont", Object::Name(self.base_font.as_bytes().to_vec()));
        font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        doc.add_object(font_dict)
    }
}

impl FontMetrics for StandardFont {
    fn width_of_text_at_size(&self, text: &str, size: f32) -> f32 {
        let (codes, _) = encode_win_ansi(text);
        let units: u32 = codes.iter().map(|&c| Self::code_width(c) as u32).sum();
        units as f32 / 1000.0 * size
    }

    fn height_at_size(&self, size: f32) -> f32 {
        (HELVETICA_ASCENDER - HELVETICA_DESCENDER) / 1000.0 * size
    }

    fn descent_at_size(&self, size: f32) -> f32 {
        -HELVETICA_DESCENDER / 1000.0 * size
    }
}

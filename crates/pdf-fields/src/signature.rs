//! Signature images
//!
//! Signature images arrive as base64 (often a `data:image/png;base64,` URI)
//! and are embedded as an RGB image XObject. Transparency is kept as a soft
//! mask so the signature does not cover what is already on the page.

use crate::render::deflate;
use crate::types::Result;
use ::image::DynamicImage;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// A decoded signature image, split into color and alpha planes
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl SignatureImage {
    /// Decode plain base64 or a `data:` URI
    pub fn from_base64(data: &str) -> Result<Self> {
        let payload = match data.trim_start().strip_prefix("data:") {
            Some(uri) => uri.split_once(',').map(|(_, b64)| b64).unwrap_or(""),
            None => data,
        };
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD.decode(cleaned)?;
        Self::from_bytes(&bytes)
    }

    /// Decode encoded image bytes (PNG, JPEG, ...)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = ::image::load_from_memory(bytes)?;
        Ok(Self::from_image(&image))
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixel_count = (width * height) as usize;
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        // Fully opaque images need no mask
        let alpha = if image.color().has_alpha() && alpha.iter().any(|&a| a < u8::MAX) {
            Some(alpha)
        } else {
            None
        };

        Self {
            width,
            height,
            rgb,
            alpha,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Add the image (and its soft mask) to the document as an XObject
    pub(crate) fn embed(&self, doc: &mut Document) -> Result<ObjectId> {
        let rgb = deflate(&self.rgb)?;
        let alpha = self.alpha.as_deref().map(deflate).transpose()?;

        let mut dict = self.image_dict(b"DeviceRGB");
        if let Some(alpha) = alpha {
            let mask_id = doc.add_object(
                Stream::new(self.image_dict(b"DeviceGray"), alpha).with_compression(false),
            );
            dict.set("SMask", Object::Reference(mask_id));
        }

        Ok(doc.add_object(Stream::new(dict, rgb).with_compression(false)))
    }

    fn image_dict(&self, color_space: &[u8]) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", Object::Integer(self.width as i64));
        dict.set("Height", Object::Integer(self.height as i64));
        dict.set("ColorSpace", Object::Name(color_space.to_vec()));
        dict.set("BitsPerComponent", Object::Integer(8));
        dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldError;
    use ::image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_data_uri_with_transparency() {
        let mut image = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255]));
        image.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let png = encode_png(DynamicImage::ImageRgba8(image));
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&png));

        let decoded = SignatureImage::from_base64(&uri).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
        assert!(decoded.has_alpha());
        assert_eq!(decoded.rgb.len(), 4 * 2 * 3);
        assert_eq!(&decoded.rgb[3..6], &[0, 0, 255]);
    }

    #[test]
    fn test_opaque_image_has_no_mask() {
        let png = encode_png(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            3,
            3,
            Rgb([10, 20, 30]),
        )));
        let decoded = SignatureImage::from_base64(&STANDARD.encode(&png)).unwrap();
        assert!(!decoded.has_alpha());

        let opaque_rgba = encode_png(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([1, 2, 3, 255]),
        )));
        assert!(!SignatureImage::from_bytes(&opaque_rgba).unwrap().has_alpha());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            SignatureImage::from_base64("data:image/png;base64,@@@"),
            Err(FieldError::Base64(_))
        ));
        assert!(matches!(
            SignatureImage::from_bytes(b"definitely not an image"),
            Err(FieldError::Image(_))
        ));
    }

    #[test]
    fn test_embed_with_soft_mask() {
        let image = SignatureImage::from_image(&DynamicImage::ImageRgba8(
            RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 128])),
        ));
        let mut doc = Document::with_version("1.7");
        let id = image.embed(&mut doc).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Image");
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 2);
        assert_eq!(stream.decompressed_content().unwrap(), vec![0; 12]);

        let mask_id = stream.dict.get(b"SMask").unwrap().as_reference().unwrap();
        let mask = doc.get_object(mask_id).unwrap().as_stream().unwrap();
        assert_eq!(
            mask.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceGray"
        );
        assert_eq!(mask.decompressed_content().unwrap(), vec![128; 4]);
    }
}

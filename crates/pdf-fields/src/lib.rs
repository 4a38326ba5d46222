pub mod constants;
pub mod font;
pub mod geometry;
mod insert;
mod options;
mod page;
mod render;
mod signature;
mod types;

pub use font::{FieldFonts, FontMetrics, StandardFont, TrueTypeFont};
pub use geometry::{ImagePlacement, Matrix, PageGeometry, Rect, TextPlacement};
pub use insert::{insert_field, insert_field_in_pdf, insert_field_in_pdf_bytes, load_pdf, save_pdf};
pub use options::*;
pub use signature::SignatureImage;
pub use types::*;

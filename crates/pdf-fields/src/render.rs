//! Content stream generation for fields

use crate::geometry::{ImagePlacement, Matrix, TextPlacement};
use crate::types::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::fmt::Write as _;
use std::io::Write;

/// Draw encoded text lines, top line first, in black.
pub(crate) fn text_operations(
    font_name: &str,
    placement: &TextPlacement,
    lines: &[Vec<u8>],
) -> String {
    let mut ops = String::from("BT\n0 g\n");
    let _ = writeln!(ops, "/{} {} Tf", font_name, placement.font_size);

    for (line, baseline) in lines.iter().zip(placement.baselines()) {
        if line.is_empty() {
            continue;
        }
        let _ = writeln!(
            ops,
            "1 0 0 1 {} {} Tm\n<{}> Tj",
            placement.x,
            baseline,
            hex_string(line)
        );
    }

    ops.push_str("ET\n");
    ops
}

/// Draw an image XObject into its placement rectangle
pub(crate) fn image_operations(xobject_name: &str, placement: &ImagePlacement) -> String {
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
        placement.width, placement.height, placement.x, placement.y, xobject_name
    )
}

/// Wrap operations drawn in visual space so they land on the rotated page
pub(crate) fn in_visual_space(matrix: &Matrix, body: &str) -> String {
    format!("q\n{}\n{}Q\n", matrix.to_cm(), body)
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02X}", b);
        s
    })
}

/// Zlib-compress stream data for a `FlateDecode` filter
pub(crate) fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

//! Placement geometry for fields
//!
//! All placements are computed in the page's *visual* space: the page as a
//! viewer displays it after applying `/Rotate`, measured in points with a
//! bottom-left origin. [`PageGeometry::visual_to_user`] maps that space back
//! onto the unrotated page so content drawn through it appears upright.

use crate::font::FontMetrics;
use crate::types::{Field, FontSizeRange, PageRotation};

// =============================================================================
// Primitives
// =============================================================================

/// Axis-aligned rectangle in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Affine transform with the component order of the PDF `cm` operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Content stream operator concatenating this matrix
    pub fn to_cm(&self) -> String {
        format!(
            "{} {} {} {} {} {} cm",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

// =============================================================================
// Page Geometry
// =============================================================================

/// MediaBox and rotation of one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub media_box: Rect,
    pub rotation: PageRotation,
}

impl PageGeometry {
    pub fn new(media_box: Rect, rotation: PageRotation) -> Self {
        Self {
            media_box,
            rotation,
        }
    }

    /// Width and height of the page as displayed.
    ///
    /// Pages rotated by 90 or 270 degrees show their MediaBox sideways, so
    /// the raw width and height swap.
    pub fn effective_dimensions(&self) -> (f32, f32) {
        let (w, h) = (self.media_box.width, self.media_box.height);
        if self.rotation.is_landscape() {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Absolute field box, still with a top-left origin as the percentages
    /// are given.
    pub fn field_rect(&self, field: &Field) -> Rect {
        let (page_width, page_height) = self.effective_dimensions();
        Rect::new(
            page_width * (field.position_x / 100.0),
            page_height * (field.position_y / 100.0),
            page_width * (field.width / 100.0),
            page_height * (field.height / 100.0),
        )
    }

    /// Transform from visual space into the page's user space.
    ///
    /// Rotates by the page rotation, then translates so the rotated visual
    /// rectangle lands exactly on the MediaBox.
    pub fn visual_to_user(&self) -> Matrix {
        let Rect {
            x: x0,
            y: y0,
            width: w,
            height: h,
        } = self.media_box;

        match self.rotation {
            PageRotation::None => Matrix::new(1.0, 0.0, 0.0, 1.0, x0, y0),
            PageRotation::Clockwise90 => Matrix::new(0.0, 1.0, -1.0, 0.0, x0 + w, y0),
            PageRotation::Clockwise180 => Matrix::new(-1.0, 0.0, 0.0, -1.0, x0 + w, y0 + h),
            PageRotation::Clockwise270 => Matrix::new(0.0, -1.0, 1.0, 0.0, x0, y0 + h),
        }
    }
}

// =============================================================================
// Fitting
// =============================================================================

/// Uniform scale that fits content inside a box without enlarging it.
///
/// Degenerate content (zero width or height) leaves that axis
/// unconstrained. The result is always within `[0, 1]`.
pub fn scale_to_fit(
    content_width: f32,
    content_height: f32,
    box_width: f32,
    box_height: f32,
) -> f32 {
    // f32::min ignores NaN, so 0/0 drops out of the comparison
    (box_width / content_width)
        .min(box_height / content_height)
        .min(1.0)
        .max(0.0)
}

/// Lines of a text field, split on `\n`
pub fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.trim_end_matches('\r'))
}

/// Longest line by character count; the first one wins ties
pub fn longest_line(text: &str) -> &str {
    text_lines(text).fold("", |longest, line| {
        if line.chars().count() > longest.chars().count() {
            line
        } else {
            longest
        }
    })
}

/// Text block placement
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    /// Left edge of the block
    pub x: f32,
    /// Bottom edge of the block
    pub y: f32,
    /// Width of the longest line
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub line_height: f32,
    /// Distance from the bottom of a line box to its baseline
    pub descent: f32,
    pub line_count: usize,
    /// Scale applied to the maximum font size before clamping
    pub scale: f32,
}

impl TextPlacement {
    /// Baseline of each line, top line first
    pub fn baselines(&self) -> Vec<f32> {
        (0..self.line_count)
            .map(|i| self.y + self.height - (i as f32 + 1.0) * self.line_height + self.descent)
            .collect()
    }
}

/// Fit text into a field box.
///
/// The longest line is measured at the maximum font size, scaled down to
/// fit, clamped to `sizes`, then measured again to center the block.
/// `page_height` is the effective (visual) page height used to flip the
/// top-left field box into bottom-left coordinates.
pub fn fit_text(
    font: &impl FontMetrics,
    text: &str,
    field: &Rect,
    page_height: f32,
    sizes: FontSizeRange,
) -> TextPlacement {
    let line_count = text_lines(text).count();
    let longest = longest_line(text);

    let max_width = font.width_of_text_at_size(longest, sizes.max);
    let max_height = font.height_at_size(sizes.max) * line_count as f32;
    let scale = scale_to_fit(max_width, max_height, field.width, field.height);

    let font_size = sizes.clamp(sizes.max * scale);
    let width = font.width_of_text_at_size(longest, font_size);
    let line_height = font.height_at_size(font_size);
    let height = line_height * line_count as f32;

    let x = field.x + (field.width - width) / 2.0;
    let top = field.y + (field.height - height) / 2.0;

    TextPlacement {
        x,
        y: page_height - top - height,
        width,
        height,
        font_size,
        line_height,
        descent: font.descent_at_size(font_size),
        line_count,
        scale,
    }
}

/// Image placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

/// Fit an image into a field box, centered and never enlarged.
///
/// One image pixel is one point before scaling.
pub fn fit_image(
    image_width: f32,
    image_height: f32,
    field: &Rect,
    page_height: f32,
) -> ImagePlacement {
    let scale = scale_to_fit(image_width, image_height, field.width, field.height);
    let width = image_width * scale;
    let height = image_height * scale;

    let x = field.x + (field.width - width) / 2.0;
    let top = field.y + (field.height - height) / 2.0;

    ImagePlacement {
        x,
        y: page_height - top - height,
        width,
        height,
        scale,
    }
}

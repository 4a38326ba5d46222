//! Shared constants for field insertion
//!
//! Font size limits, built-in font metrics and page defaults.

// =============================================================================
// Font Sizes
// =============================================================================

/// Largest font size for standard (Helvetica) fields, in points
pub const DEFAULT_STANDARD_FONT_SIZE: f32 = 15.0;

/// Smallest font size for standard fields, in points
pub const MIN_STANDARD_FONT_SIZE: f32 = 8.0;

/// Largest font size for handwriting (signature) fields, in points
pub const DEFAULT_HANDWRITING_FONT_SIZE: f32 = 50.0;

/// Smallest font size for handwriting fields, in points
pub const MIN_HANDWRITING_FONT_SIZE: f32 = 20.0;

// =============================================================================
// Helvetica Metrics (AFM, 1000 units per em)
// =============================================================================

pub const HELVETICA_ASCENDER: f32 = 718.0;

pub const HELVETICA_DESCENDER: f32 = -207.0;

/// Advance width for codes outside the width tables
pub const HELVETICA_DEFAULT_WIDTH: u16 = 556;

/// Advance widths for the printable ASCII range, starting at U+0020
pub const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance widths for WinAnsi codes 0x80..=0xFF; unassigned codes use 556
pub const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 556, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 556, 611, 556, // 0x80
    556, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 556, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

// =============================================================================
// Page Defaults
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Limit on `/Parent` hops when resolving inherited page attributes
pub const MAX_PAGE_TREE_DEPTH: usize = 64;

//! Shared constants for card sheet layout
//!
//! This module centralizes the physical sizes and mark geometry used
//! throughout layout and rendering.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Pixel count covering `mm` at `dpi`, truncated toward zero.
#[inline]
pub fn mm_to_px(mm: f32, dpi: f32) -> u32 {
    (mm / MM_PER_INCH * dpi) as u32
}

// =============================================================================
// Default Card Grid
// =============================================================================

/// Default card width (mm)
pub const DEFAULT_CARD_WIDTH_MM: f32 = 57.0;

/// Default card height (mm)
pub const DEFAULT_CARD_HEIGHT_MM: f32 = 85.0;

/// Default grid rows per page
pub const DEFAULT_ROWS: usize = 3;

/// Default grid columns per page
pub const DEFAULT_COLUMNS: usize = 3;

/// Default gap between neighbouring cards (mm)
pub const DEFAULT_SPACING_MM: f32 = 5.0;

/// Bleed used by the cut-guide sheet (mm)
pub const CUT_GUIDE_BLEED_MM: f32 = 3.0;

/// Slack allowed when checking that the grid fits the page (mm)
pub const FIT_TOLERANCE_MM: f32 = 1e-3;

// =============================================================================
// Printer's Marks
// =============================================================================

/// Length of crop marks (mm)
pub const CROP_MARK_LENGTH_MM: f32 = 3.0;

/// Gap between crop mark and trim line (mm)
pub const CROP_MARK_GAP_MM: f32 = 0.5;

/// Line width for crop marks (points)
pub const CROP_MARK_WIDTH: f32 = 0.25;

/// Line width for trim outlines (points)
pub const TRIM_OUTLINE_WIDTH: f32 = 1.0;

// =============================================================================
// Page Numbers
// =============================================================================

/// Font size for page numbers (points)
pub const PAGE_NUMBER_FONT_SIZE: f32 = 7.0;

/// Distance from the right page edge to the end of the page number (mm)
pub const PAGE_NUMBER_RIGHT_MARGIN_MM: f32 = 15.0;

/// Distance from the bottom page edge to the page number baseline (mm)
pub const PAGE_NUMBER_BOTTOM_MARGIN_MM: f32 = 10.0;

/// Advance width of a Helvetica digit as a fraction of the font size
pub const HELVETICA_DIGIT_WIDTH_RATIO: f32 = 0.556;

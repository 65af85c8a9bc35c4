//! Printer's marks for card sheets
//!
//! This module computes crop-mark and trim-outline geometry and turns it
//! into PDF content stream operations.

use crate::constants::{
    CROP_MARK_GAP_MM, CROP_MARK_LENGTH_MM, CROP_MARK_WIDTH, TRIM_OUTLINE_WIDTH, mm_to_pt,
};
use crate::layout::{LineSegment, Rect};

/// Which marks to draw around each placed cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarksConfig {
    /// L-shaped marks at the four corners of each trim rectangle
    pub crop_marks: bool,
    /// Stroked outline of each trim rectangle
    pub trim_outlines: bool,
}

impl MarksConfig {
    pub fn any_enabled(&self) -> bool {
        self.crop_marks || self.trim_outlines
    }
}

/// The eight crop-mark strokes around a trim rectangle.
///
/// Each corner gets one horizontal and one vertical stroke pointing away
/// from the card, starting `gap` away from the trim line.
pub fn crop_mark_segments(trim: &Rect, length: f32, gap: f32) -> [LineSegment; 8] {
    let (left, right, bottom, top) = (trim.x, trim.right(), trim.y, trim.top());

    [
        // Horizontal marks
        LineSegment::new(left - gap, bottom, left - gap - length, bottom),
        LineSegment::new(right + gap, bottom, right + gap + length, bottom),
        LineSegment::new(left - gap, top, left - gap - length, top),
        LineSegment::new(right + gap, top, right + gap + length, top),
        // Vertical marks
        LineSegment::new(left, bottom - gap, left, bottom - gap - length),
        LineSegment::new(left, top + gap, left, top + gap + length),
        LineSegment::new(right, bottom - gap, right, bottom - gap - length),
        LineSegment::new(right, top + gap, right, top + gap + length),
    ]
}

/// Crop marks using the standard length and gap
pub fn default_crop_mark_segments(trim: &Rect) -> [LineSegment; 8] {
    crop_mark_segments(
        trim,
        mm_to_pt(CROP_MARK_LENGTH_MM),
        mm_to_pt(CROP_MARK_GAP_MM),
    )
}

/// Generate all requested marks for a page as content stream operations
pub fn generate_marks(config: &MarksConfig, trims: &[Rect]) -> String {
    let mut ops = String::new();

    if !config.any_enabled() || trims.is_empty() {
        return ops;
    }

    // Save graphics state
    ops.push_str("q\n");

    // Set default stroke color to black
    ops.push_str("0 0 0 RG\n");
    ops.push_str("[] 0 d\n");

    if config.trim_outlines {
        ops.push_str(&generate_trim_outlines(trims));
    }

    if config.crop_marks {
        ops.push_str(&generate_crop_marks(trims));
    }

    // Restore graphics state
    ops.push_str("Q\n");

    ops
}

fn generate_crop_marks(trims: &[Rect]) -> String {
    let mut ops = format!("{} w\n", CROP_MARK_WIDTH);

    for trim in trims {
        for seg in default_crop_mark_segments(trim) {
            ops.push_str(&format!(
                "{} {} m {} {} l S\n",
                seg.x1, seg.y1, seg.x2, seg.y2
            ));
        }
    }

    ops
}

fn generate_trim_outlines(trims: &[Rect]) -> String {
    let mut ops = format!("{} w\n", TRIM_OUTLINE_WIDTH);

    for trim in trims {
        ops.push_str(&format!(
            "{} {} {} {} re S\n",
            trim.x, trim.y, trim.width, trim.height
        ));
    }

    ops
}

//! Layout data types for card sheets
//!
//! These types carry the geometry computed from a `LayoutSpec` to the
//! pagination and rendering stages. All coordinates are PDF points with
//! the origin at the bottom-left corner of the page.

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Bottom-left corner of the full grid once centered on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOrigin {
    pub x: f32,
    pub y: f32,
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
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

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink the rectangle by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }
}

/// A straight stroke between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl LineSegment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn length(&self) -> f32 {
        ((self.x2 - self.x1).powi(2) + (self.y2 - self.y1).powi(2)).sqrt()
    }
}

/// Where one card lands on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    /// Zero-based cell index within the page, in reading order
    pub slot: usize,
    /// Grid position of the slot before any mirroring
    pub grid_pos: GridPosition,
    /// Full cell rectangle (image bounds)
    pub cell: Rect,
    /// Cell rectangle inset by the bleed (trim line)
    pub trim: Rect,
}

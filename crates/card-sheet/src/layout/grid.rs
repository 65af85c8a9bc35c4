//! Grid layout calculation
//!
//! This module converts a millimeter `LayoutSpec` into point geometry,
//! centers the grid on the page and places individual cells.

use crate::constants::mm_to_pt;
use crate::options::LayoutSpec;
use crate::types::Result;

use super::{CellPlacement, GridOrigin, GridPosition, Rect};

// =============================================================================
// Grid Creation
// =============================================================================

/// Validated, point-based grid geometry.
///
/// Pure geometry: the same layout and index always produce the same
/// placement.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Number of rows in the card grid
    pub rows: usize,
    /// Number of columns in the card grid
    pub cols: usize,
    /// Page width in points
    pub page_width_pt: f32,
    /// Page height in points
    pub page_height_pt: f32,
    /// Width of each cell in points
    pub cell_width_pt: f32,
    /// Height of each cell in points
    pub cell_height_pt: f32,
    /// Gap between neighbouring cells in points
    pub spacing_pt: f32,
    /// Inset from each cell edge to the trim line in points
    pub bleed_pt: f32,
    /// Reflect columns so a back sheet registers with its front
    pub mirror_horizontal: bool,
}

impl GridLayout {
    /// Build the grid for a layout, rejecting geometry that does not fit.
    pub fn from_spec(spec: &LayoutSpec) -> Result<Self> {
        spec.validate()?;

        let (page_width_mm, page_height_mm) = spec.paper_size.dimensions_mm();

        Ok(Self {
            rows: spec.rows,
            cols: spec.columns,
            page_width_pt: mm_to_pt(page_width_mm),
            page_height_pt: mm_to_pt(page_height_mm),
            cell_width_pt: mm_to_pt(spec.card_width_mm),
            cell_height_pt: mm_to_pt(spec.card_height_mm),
            spacing_pt: mm_to_pt(spec.spacing_mm),
            bleed_pt: mm_to_pt(spec.bleed_mm),
            mirror_horizontal: spec.mirror_horizontal,
        })
    }

    /// The same grid with the mirror flag set
    pub fn mirrored(&self) -> Self {
        Self {
            mirror_horizontal: true,
            ..self.clone()
        }
    }

    /// Total number of cells on a page
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Width of the whole grid including inner spacing
    pub fn grid_width(&self) -> f32 {
        self.cols as f32 * self.cell_width_pt
            + self.cols.saturating_sub(1) as f32 * self.spacing_pt
    }

    /// Height of the whole grid including inner spacing
    pub fn grid_height(&self) -> f32 {
        self.rows as f32 * self.cell_height_pt
            + self.rows.saturating_sub(1) as f32 * self.spacing_pt
    }

    /// Bottom-left corner of the grid, centered on the page
    pub fn origin(&self) -> GridOrigin {
        GridOrigin {
            x: self.page_width_pt / 2.0 - self.grid_width() / 2.0,
            y: self.page_height_pt / 2.0 - self.grid_height() / 2.0,
        }
    }

    /// Grid position of a zero-based cell index, in reading order
    pub fn position(&self, index: usize) -> Option<GridPosition> {
        if index >= self.cell_count() {
            return None;
        }
        Some(GridPosition::new(index / self.cols, index % self.cols))
    }

    /// Cell rectangle for a grid position, `None` outside the grid.
    ///
    /// Row 0 is the top row; PDF space grows upwards so the row is
    /// inverted. With mirroring the column is reflected as well.
    pub fn cell_bounds(&self, pos: GridPosition) -> Option<Rect> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        let origin = self.origin();

        let effective_col = if self.mirror_horizontal {
            self.cols - 1 - pos.col
        } else {
            pos.col
        };
        let inverted_row = self.rows - 1 - pos.row;

        let x = origin.x + effective_col as f32 * (self.cell_width_pt + self.spacing_pt);
        let y = origin.y + inverted_row as f32 * (self.cell_height_pt + self.spacing_pt);

        Some(Rect::new(x, y, self.cell_width_pt, self.cell_height_pt))
    }

    /// Full placement (cell and trim rectangles) for a cell index
    pub fn place(&self, index: usize) -> Option<CellPlacement> {
        let grid_pos = self.position(index)?;
        let cell = self.cell_bounds(grid_pos)?;
        Some(CellPlacement {
            slot: index,
            grid_pos,
            cell,
            trim: cell.inset(self.bleed_pt),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaperSize, SheetError};

    const EPS: f32 = 1e-3;

    fn default_grid() -> GridLayout {
        GridLayout::from_spec(&LayoutSpec::default()).unwrap()
    }

    #[test]
    fn test_default_grid_dimensions() {
        let grid = default_grid();

        assert_eq!(grid.cols, 3);
        assert_eq!(grid.rows, 3);
        assert_eq!(grid.cell_count(), 9);
        assert!((grid.grid_width() - mm_to_pt(181.0)).abs() < EPS);
        assert!((grid.grid_height() - mm_to_pt(265.0)).abs() < EPS);
    }

    #[test]
    fn test_origin_centers_grid() {
        let grid = default_grid();
        let origin = grid.origin();

        assert!((origin.x + grid.grid_width() / 2.0 - grid.page_width_pt / 2.0).abs() < EPS);
        assert!((origin.y + grid.grid_height() / 2.0 - grid.page_height_pt / 2.0).abs() < EPS);
        // A4 is 210 mm wide, grid is 181 mm: 14.5 mm on each side
        assert!((origin.x - mm_to_pt(14.5)).abs() < EPS);
        assert!((origin.y - mm_to_pt(16.0)).abs() < EPS);
    }

    #[test]
    fn test_position_reading_order() {
        let grid = default_grid();

        assert_eq!(grid.position(0), Some(GridPosition::new(0, 0)));
        assert_eq!(grid.position(2), Some(GridPosition::new(0, 2)));
        assert_eq!(grid.position(3), Some(GridPosition::new(1, 0)));
        assert_eq!(grid.position(8), Some(GridPosition::new(2, 2)));
        assert_eq!(grid.position(9), None);
    }

    #[test]
    fn test_cell_bounds_top_left_and_bottom_right() {
        let grid = default_grid();
        let origin = grid.origin();

        // Top-left cell sits on the top row of the grid
        let top_left = grid.cell_bounds(GridPosition::new(0, 0)).unwrap();
        assert!((top_left.x - origin.x).abs() < EPS);
        assert!((top_left.top() - (origin.y + grid.grid_height())).abs() < EPS);

        // Bottom-right cell touches the grid origin row and right edge
        let bottom_right = grid.cell_bounds(GridPosition::new(2, 2)).unwrap();
        assert!((bottom_right.y - origin.y).abs() < EPS);
        assert!((bottom_right.right() - (origin.x + grid.grid_width())).abs() < EPS);
    }

    #[test]
    fn test_mirror_reflects_columns() {
        let front = default_grid();
        let back = front.mirrored();

        let sum_target = 2.0 * front.origin().x + front.grid_width() - front.cell_width_pt;
        for index in 0..front.cell_count() {
            let f = front.place(index).unwrap().cell;
            let b = back.place(index).unwrap().cell;
            assert!((f.x + b.x - sum_target).abs() < EPS, "index {}", index);
            assert!((f.y - b.y).abs() < EPS);
        }

        // The first card of the back lands in the rightmost column
        let first = back.place(0).unwrap().cell;
        assert!((first.right() - (back.origin().x + back.grid_width())).abs() < EPS);
    }

    #[test]
    fn test_cell_bounds_outside_grid() {
        let grid = default_grid();
        assert_eq!(grid.cell_bounds(GridPosition::new(3, 0)), None);
        assert_eq!(grid.cell_bounds(GridPosition::new(0, 3)), None);
        assert_eq!(grid.mirrored().cell_bounds(GridPosition::new(0, 5)), None);
        assert!(grid.cell_bounds(GridPosition::new(2, 2)).is_some());
    }

    fn fitting_specs() -> Vec<LayoutSpec> {
        vec![
            LayoutSpec::default(),
            LayoutSpec {
                paper_size: PaperSize::Letter,
                ..Default::default()
            },
            LayoutSpec {
                paper_size: PaperSize::A3,
                ..Default::default()
            },
            LayoutSpec {
                rows: 2,
                columns: 4,
                card_width_mm: 45.0,
                card_height_mm: 70.0,
                spacing_mm: 4.0,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_every_fitting_grid_is_centered() {
        for spec in fitting_specs() {
            let grid = GridLayout::from_spec(&spec).unwrap();
            let origin = grid.origin();
            let center_x = origin.x + grid.grid_width() / 2.0;
            let center_y = origin.y + grid.grid_height() / 2.0;
            assert!((center_x - grid.page_width_pt / 2.0).abs() < EPS, "{:?}", spec);
            assert!((center_y - grid.page_height_pt / 2.0).abs() < EPS, "{:?}", spec);
        }
    }

    #[test]
    fn test_every_fitting_grid_mirrors_into_registration() {
        for spec in fitting_specs() {
            let front = GridLayout::from_spec(&spec).unwrap();
            let back = front.mirrored();
            let sum_target = 2.0 * front.origin().x + front.grid_width() - front.cell_width_pt;

            for index in 0..front.cell_count() {
                let f = front.place(index).unwrap().cell;
                let b = back.place(index).unwrap().cell;
                assert!((f.x + b.x - sum_target).abs() < EPS, "{:?} index {}", spec, index);
                assert!((f.y - b.y).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_cells_do_not_overlap() {
        let grid = default_grid();
        let cells: Vec<Rect> = (0..grid.cell_count())
            .map(|i| grid.place(i).unwrap().cell)
            .collect();

        for (i, a) in cells.iter().enumerate() {
            for b in cells.iter().skip(i + 1) {
                let separated = a.right() <= b.x + EPS
                    || b.right() <= a.x + EPS
                    || a.top() <= b.y + EPS
                    || b.top() <= a.y + EPS;
                assert!(separated, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_trim_rect_is_inset_by_bleed() {
        let spec = LayoutSpec {
            bleed_mm: 3.0,
            ..Default::default()
        };
        let grid = GridLayout::from_spec(&spec).unwrap();
        let placement = grid.place(4).unwrap();

        assert!((placement.trim.x - placement.cell.x - mm_to_pt(3.0)).abs() < EPS);
        assert!((placement.trim.width - mm_to_pt(51.0)).abs() < EPS);
        assert!((placement.trim.height - mm_to_pt(79.0)).abs() < EPS);
    }

    #[test]
    fn test_overflowing_grid_is_rejected() {
        let spec = LayoutSpec {
            paper_size: PaperSize::A5,
            ..Default::default()
        };
        match GridLayout::from_spec(&spec) {
            Err(SheetError::Geometry(msg)) => assert!(msg.contains("wide")),
            other => panic!("Expected geometry error, got {:?}", other),
        }
    }
}

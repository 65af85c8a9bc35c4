use crate::constants::*;
use crate::marks::MarksConfig;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical description of a card sheet.
///
/// All lengths are millimeters. The grid is centered on the page; it must
/// fit inside the page in both directions or [`LayoutSpec::validate`]
/// rejects it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutSpec {
    // Page
    pub paper_size: PaperSize,

    // Cells
    pub card_width_mm: f32,
    pub card_height_mm: f32,
    pub rows: usize,
    pub columns: usize,
    pub spacing_mm: f32,
    pub bleed_mm: f32,

    // Variants
    pub mirror_horizontal: bool,
    pub crop_marks: bool,
    pub trim_outlines: bool,
    pub page_numbers: bool,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            card_width_mm: DEFAULT_CARD_WIDTH_MM,
            card_height_mm: DEFAULT_CARD_HEIGHT_MM,
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            spacing_mm: DEFAULT_SPACING_MM,
            bleed_mm: 0.0,
            mirror_horizontal: false,
            crop_marks: false,
            trim_outlines: false,
            page_numbers: false,
        }
    }
}

impl LayoutSpec {
    /// Cells on one page
    pub fn cards_per_page(&self) -> usize {
        self.rows * self.columns
    }

    /// Width of the whole grid including inner spacing (mm)
    pub fn grid_width_mm(&self) -> f32 {
        self.columns as f32 * self.card_width_mm
            + self.columns.saturating_sub(1) as f32 * self.spacing_mm
    }

    /// Height of the whole grid including inner spacing (mm)
    pub fn grid_height_mm(&self) -> f32 {
        self.rows as f32 * self.card_height_mm
            + self.rows.saturating_sub(1) as f32 * self.spacing_mm
    }

    /// Marks requested by this layout
    pub fn marks(&self) -> MarksConfig {
        MarksConfig {
            crop_marks: self.crop_marks,
            trim_outlines: self.trim_outlines,
        }
    }

    /// Validate the geometry.
    ///
    /// A grid wider or taller than the page would silently overflow, so it
    /// is rejected here rather than discovered on paper.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SheetError::Geometry(format!(
                "Grid must have at least one row and column (got {}x{})",
                self.rows, self.columns
            )));
        }

        let (page_width, page_height) = self.paper_size.dimensions_mm();
        let all_positive = [page_width, page_height, self.card_width_mm, self.card_height_mm]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !all_positive {
            return Err(SheetError::Geometry(
                "Page and card dimensions must be positive".to_string(),
            ));
        }

        if !(self.spacing_mm.is_finite() && self.spacing_mm >= 0.0) {
            return Err(SheetError::Geometry(format!(
                "Spacing must be non-negative (got {} mm)",
                self.spacing_mm
            )));
        }

        if !(self.bleed_mm.is_finite() && self.bleed_mm >= 0.0) {
            return Err(SheetError::Geometry(format!(
                "Bleed inset must be non-negative (got {} mm)",
                self.bleed_mm
            )));
        }

        if 2.0 * self.bleed_mm >= self.card_width_mm.min(self.card_height_mm) {
            return Err(SheetError::Geometry(format!(
                "Bleed inset of {} mm leaves no trim area on a {}x{} mm card",
                self.bleed_mm, self.card_width_mm, self.card_height_mm
            )));
        }

        let grid_width = self.grid_width_mm();
        if grid_width > page_width + FIT_TOLERANCE_MM {
            return Err(SheetError::Geometry(format!(
                "Grid is {:.2} mm wide but the page is only {:.2} mm",
                grid_width, page_width
            )));
        }

        let grid_height = self.grid_height_mm();
        if grid_height > page_height + FIT_TOLERANCE_MM {
            return Err(SheetError::Geometry(format!(
                "Grid is {:.2} mm tall but the page is only {:.2} mm",
                grid_height, page_height
            )));
        }

        Ok(())
    }

    /// Load a layout from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let spec = serde_json::from_slice(&bytes)
            .map_err(|e| SheetError::Config(format!("Failed to parse layout: {}", e)))?;
        Ok(spec)
    }

    /// Save the layout to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::Config(format!("Failed to serialize layout: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

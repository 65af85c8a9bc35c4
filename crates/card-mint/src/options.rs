use crate::color::ColorTransform;
use crate::types::*;
use card_sheet::LayoutSpec;
use card_sheet::constants::mm_to_px;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a single card raster is composed.
///
/// Pixel values refer to the template raster; physical values are converted
/// with `dpi`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MintOptions {
    // Symbol
    pub symbol_size: u32,
    pub symbol_x: u32,
    pub symbol_y: u32,

    // Text
    pub code_gap: u32,
    pub code_font_size: f32,
    pub counter: bool,
    pub counter_font_size: f32,
    pub counter_margin_mm: f32,
    pub font_path: Option<PathBuf>,

    // Output raster
    pub dpi: u32,
    pub color_transform: Option<ColorTransform>,
}

impl Default for MintOptions {
    fn default() -> Self {
        Self {
            symbol_size: 294,
            symbol_x: 214,
            symbol_y: 528,
            code_gap: 50,
            code_font_size: 25.0,
            counter: true,
            counter_font_size: 20.0,
            counter_margin_mm: 5.0,
            font_path: None,
            dpi: 300,
            color_transform: None,
        }
    }
}

impl MintOptions {
    pub fn validate(&self) -> Result<()> {
        if self.symbol_size == 0 {
            return Err(MintError::Config("Symbol size must be positive".to_string()));
        }
        if self.dpi == 0 {
            return Err(MintError::Config("Resolution must be positive".to_string()));
        }
        let sizes = [self.code_font_size, self.counter_font_size];
        if !sizes.iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(MintError::Config("Font sizes must be positive".to_string()));
        }
        if !(self.counter_margin_mm.is_finite() && self.counter_margin_mm >= 0.0) {
            return Err(MintError::Config(
                "Counter margin must be non-negative".to_string(),
            ));
        }
        if let Some(transform) = &self.color_transform {
            transform.validate()?;
        }
        Ok(())
    }

    /// Counter margin above the bottom edge, in template pixels
    pub fn counter_margin_px(&self) -> f32 {
        self.counter_margin_mm * (self.dpi as f32 / card_sheet::constants::MM_PER_INCH)
    }
}

/// Everything one pipeline run needs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineOptions {
    pub layout: LayoutSpec,
    pub mint: MintOptions,
    /// Cards composed concurrently
    pub workers: usize,
    /// Where per-card PNGs are written, if anywhere
    pub export_dir: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::front_rgb()
    }
}

impl PipelineOptions {
    /// Numbered RGB fronts with a counter on every card
    pub fn front_rgb() -> Self {
        Self {
            layout: LayoutSpec {
                page_numbers: true,
                ..Default::default()
            },
            mint: MintOptions::default(),
            workers: default_workers(),
            export_dir: None,
        }
    }

    /// Print-direct CMYK fronts with magenta correction
    pub fn front_cmyk() -> Self {
        Self {
            layout: LayoutSpec::default(),
            mint: MintOptions {
                color_transform: Some(ColorTransform::default()),
                ..Default::default()
            },
            ..Self::front_rgb()
        }
    }

    /// Single-sided catalog sheet with crop marks and no counter
    pub fn catalog() -> Self {
        Self {
            layout: LayoutSpec {
                crop_marks: true,
                ..Default::default()
            },
            mint: MintOptions {
                code_font_size: 20.0,
                code_gap: 45,
                counter: false,
                ..Default::default()
            },
            ..Self::front_rgb()
        }
    }

    /// Mirrored back sheet
    pub fn back_rgb() -> Self {
        Self {
            layout: LayoutSpec {
                mirror_horizontal: true,
                ..Default::default()
            },
            ..Self::front_rgb()
        }
    }

    /// Mirrored back sheet in CMYK with magenta correction
    pub fn back_cmyk() -> Self {
        let mut options = Self::back_rgb();
        options.mint.color_transform = Some(ColorTransform::default());
        options
    }

    /// Trim outlines inset 3 mm from each cell
    pub fn cut_guides() -> Self {
        Self {
            layout: LayoutSpec {
                bleed_mm: card_sheet::constants::CUT_GUIDE_BLEED_MM,
                trim_outlines: true,
                ..Default::default()
            },
            ..Self::front_rgb()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.mint.validate()?;
        if self.workers == 0 {
            return Err(MintError::Config(
                "At least one worker is required".to_string(),
            ));
        }
        let (width, height) = self.cell_size_px();
        if width == 0 || height == 0 {
            return Err(MintError::Config(format!(
                "Cells of {}x{} mm have no pixels at {} dpi",
                self.layout.card_width_mm, self.layout.card_height_mm, self.mint.dpi
            )));
        }
        Ok(())
    }

    /// Pixel size of one cell at the configured resolution
    pub fn cell_size_px(&self) -> (u32, u32) {
        (
            mm_to_px(self.layout.card_width_mm, self.mint.dpi as f32),
            mm_to_px(self.layout.card_height_mm, self.mint.dpi as f32),
        )
    }

    /// Load options from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MintError::ResourceMissing {
                    what: "Configuration file",
                    path: path.to_owned(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| MintError::Config(format!("Failed to parse options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MintError::Config(format!("Failed to serialize options: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

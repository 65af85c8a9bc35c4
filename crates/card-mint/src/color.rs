//! Additive to subtractive color conversion
//!
//! The conversion is the plain complement used by print-direct rasters:
//! `C = 255 - R`, `M = 255 - G`, `Y = 255 - B`, `K = 0`. It is not color
//! managed. The magenta channel is then scaled by a fixed factor to
//! compensate for a press that prints magenta heavy.

use crate::types::{MintError, Result};
use card_sheet::{ColorModel, SheetImage};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default magenta attenuation (5% reduction)
pub const DEFAULT_MAGENTA_FACTOR: f64 = 0.95;

/// Manual magenta correction applied during CMYK conversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorTransform {
    magenta_factor: f64,
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self {
            magenta_factor: DEFAULT_MAGENTA_FACTOR,
        }
    }
}

impl ColorTransform {
    /// Create a transform; the factor must lie in (0, 1].
    pub fn new(magenta_factor: f64) -> Result<Self> {
        let transform = Self { magenta_factor };
        transform.validate()?;
        Ok(transform)
    }

    pub fn magenta_factor(&self) -> f64 {
        self.magenta_factor
    }

    /// Reject factors outside (0, 1] instead of clamping them
    pub fn validate(&self) -> Result<()> {
        if self.magenta_factor.is_finite() && self.magenta_factor > 0.0 && self.magenta_factor <= 1.0
        {
            Ok(())
        } else {
            Err(MintError::InvalidColorTransform(self.magenta_factor))
        }
    }

    /// Convert an opaque RGB raster and attenuate its magenta channel
    pub fn apply(&self, rgb: &RgbImage) -> CmykPlanes {
        let mut planes = CmykPlanes::from_rgb(rgb);
        attenuate(&mut planes.magenta, self.magenta_factor);
        planes
    }
}

/// Multiply every sample by `factor`, truncating toward zero
pub fn attenuate(channel: &mut GrayImage, factor: f64) {
    for Luma([v]) in channel.pixels_mut() {
        *v = (*v as f64 * factor) as u8;
    }
}

/// A CMYK raster held as four separate channels
#[derive(Debug, Clone, PartialEq)]
pub struct CmykPlanes {
    pub cyan: GrayImage,
    pub magenta: GrayImage,
    pub yellow: GrayImage,
    pub black: GrayImage,
}

impl CmykPlanes {
    /// Naive complement conversion from RGB
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        let plane = |channel: usize| {
            GrayImage::from_fn(width, height, |x, y| {
                Luma([255 - rgb.get_pixel(x, y).0[channel]])
            })
        };

        Self {
            cyan: plane(0),
            magenta: plane(1),
            yellow: plane(2),
            black: GrayImage::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.cyan.dimensions()
    }

    /// Resample each channel independently
    pub fn resize(&self, width: u32, height: u32, filter: FilterType) -> Self {
        Self {
            cyan: imageops::resize(&self.cyan, width, height, filter),
            magenta: imageops::resize(&self.magenta, width, height, filter),
            yellow: imageops::resize(&self.yellow, width, height, filter),
            black: imageops::resize(&self.black, width, height, filter),
        }
    }

    /// Recombine the planes into interleaved CMYK samples
    pub fn merge(&self) -> Vec<u8> {
        self.cyan
            .as_raw()
            .iter()
            .zip(self.magenta.as_raw())
            .zip(self.yellow.as_raw())
            .zip(self.black.as_raw())
            .flat_map(|(((c, m), y), k)| [*c, *m, *y, *k])
            .collect()
    }

    pub fn into_sheet_image(self) -> card_sheet::Result<SheetImage> {
        let (width, height) = self.dimensions();
        SheetImage::new(width, height, ColorModel::Cmyk, self.merge())
    }
}

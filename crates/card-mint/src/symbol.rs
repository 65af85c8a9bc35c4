//! Scannable symbol encoding

use crate::types::{MintError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Luma, RgbImage};
use qrcode::{EcLevel, QrCode};

/// Modules of white border the symbol carries on each side
pub const QUIET_ZONE_MODULES: u32 = 4;

/// Encode `identifier` as a QR symbol of exactly `size`×`size` pixels.
///
/// Low error correction keeps the module count small for a ~20 mm print.
/// The symbol is rendered at one pixel per module and scaled up with
/// nearest-neighbour sampling so module edges stay hard.
pub fn encode_symbol(index: usize, identifier: &str, size: u32) -> Result<RgbImage> {
    let code = QrCode::with_error_correction_level(identifier.as_bytes(), EcLevel::L).map_err(
        |e| MintError::CapacityExceeded {
            index,
            identifier: identifier.to_string(),
            reason: e.to_string(),
        },
    )?;

    let modules = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(1, 1)
        .build();

    let rgb = DynamicImage::ImageLuma8(modules).to_rgb8();
    Ok(imageops::resize(&rgb, size, size, FilterType::Nearest))
}

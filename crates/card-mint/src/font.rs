//! Font loading and text rasterization
//!
//! A configured font that is missing or unreadable is not fatal: the run
//! continues with the embedded DejaVu Sans and logs a warning.

use crate::types::{MintError, Result};
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::path::{Path, PathBuf};

static FALLBACK_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

/// The font bundled with the crate
pub fn fallback_font() -> Result<Font<'static>> {
    Font::try_from_bytes(FALLBACK_FONT).ok_or(MintError::ResourceMissing {
        what: "Embedded font",
        path: PathBuf::from("fonts/DejaVuSans.ttf"),
    })
}

/// Load the font at `path`, falling back to the embedded font.
pub async fn load_font(path: Option<&Path>) -> Result<Font<'static>> {
    let Some(path) = path else {
        return fallback_font();
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => match Font::try_from_vec(bytes) {
            Some(font) => {
                log::info!("Loaded font from {}", path.display());
                Ok(font)
            }
            None => {
                log::warn!(
                    "Font {} is not a usable TrueType font, falling back to the default font",
                    path.display()
                );
                fallback_font()
            }
        },
        Err(e) => {
            log::warn!(
                "Failed to load font {}: {}; falling back to the default font",
                path.display(),
                e
            );
            fallback_font()
        }
    }
}

/// Scale for a font size given in pixels per em.
///
/// `rusttype` scales by line height (ascent minus descent), while sizes in
/// card options are em sizes, so the two are converted here.
pub fn em_scale(font: &Font<'_>, size_px: f32) -> Scale {
    let units_per_em = font.units_per_em() as f32;
    let metrics = font.v_metrics_unscaled();
    let line_height = metrics.ascent - metrics.descent;
    if units_per_em <= 0.0 || line_height <= 0.0 {
        return Scale::uniform(size_px);
    }
    Scale::uniform(size_px * line_height / units_per_em)
}

/// Inked extent of a string drawn with its ascent line at y = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// Measure the inked bounding box of `text` drawn at the origin
pub fn measure_text(font: &Font<'_>, scale: Scale, text: &str) -> TextBounds {
    let ascent = font.v_metrics(scale).ascent;
    let mut bounds: Option<TextBounds> = None;

    for glyph in font.layout(text, scale, point(0.0, ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        bounds = Some(match bounds {
            None => TextBounds {
                min_x: bb.min.x,
                min_y: bb.min.y,
                max_x: bb.max.x,
                max_y: bb.max.y,
            },
            Some(b) => TextBounds {
                min_x: b.min_x.min(bb.min.x),
                min_y: b.min_y.min(bb.min.y),
                max_x: b.max_x.max(bb.max.x),
                max_y: b.max_y.max(bb.max.y),
            },
        });
    }

    bounds.unwrap_or_default()
}

/// Draw `text` with its ascent line at `y`, blending `color` over the canvas.
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'_>,
    scale: Scale,
    x: f32,
    y: f32,
    color: Rgba<u8>,
    text: &str,
) {
    let baseline_y = y + font.v_metrics(scale).ascent;

    for glyph in font.layout(text, scale, point(x, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px as u32 >= img.width() || py as u32 >= img.height() {
                return;
            }
            let sa = coverage.clamp(0.0, 1.0) * (color.0[3] as f32 / 255.0);
            if sa <= 0.0 {
                return;
            }
            let inv = 1.0 - sa;
            let dst = img.get_pixel_mut(px as u32, py as u32);
            for c in 0..3 {
                dst.0[c] = (color.0[c] as f32 * sa + dst.0[c] as f32 * inv).round() as u8;
            }
            dst.0[3] = (255.0 * sa + dst.0[3] as f32 * inv).round() as u8;
        });
    }
}

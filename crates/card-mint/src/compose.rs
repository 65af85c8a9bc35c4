//! Card compositing
//!
//! A card is the template with the symbol pasted at a fixed offset, the
//! derived code centered under the symbol and, optionally, the sequence
//! counter centered near the bottom edge. The result is flattened onto
//! white and then either kept as RGB or converted to CMYK.

use crate::color::{CmykPlanes, ColorTransform};
use crate::font::{draw_text, em_scale, measure_text};
use crate::options::MintOptions;
use crate::types::{MintError, Result};
use card_sheet::SheetImage;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use rusttype::Font;

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Composes cards from one template
pub struct Compositor<'a> {
    template: &'a RgbaImage,
    font: &'a Font<'static>,
    options: &'a MintOptions,
}

impl<'a> Compositor<'a> {
    /// The symbol region must lie inside the template.
    pub fn new(
        template: &'a RgbaImage,
        font: &'a Font<'static>,
        options: &'a MintOptions,
    ) -> Result<Self> {
        let right = options.symbol_x as u64 + options.symbol_size as u64;
        let bottom = options.symbol_y as u64 + options.symbol_size as u64;
        if right > template.width() as u64 || bottom > template.height() as u64 {
            return Err(MintError::Config(format!(
                "Symbol at ({}, {}) of size {} does not fit a {}x{} template",
                options.symbol_x,
                options.symbol_y,
                options.symbol_size,
                template.width(),
                template.height()
            )));
        }

        Ok(Self {
            template,
            font,
            options,
        })
    }

    /// Paste the symbol, draw the code and the optional counter.
    pub fn compose(&self, symbol: &RgbImage, code: &str, counter: Option<usize>) -> RgbaImage {
        let mut card = self.template.clone();
        let (symbol_x, symbol_y) = (self.options.symbol_x, self.options.symbol_y);

        let symbol = DynamicImage::ImageRgb8(symbol.clone()).to_rgba8();
        imageops::replace(&mut card, &symbol, symbol_x as i64, symbol_y as i64);

        // Code, centered under the symbol
        let code_scale = em_scale(self.font, self.options.code_font_size);
        let code_bounds = measure_text(self.font, code_scale, code);
        let code_x = symbol_x as i32 + (symbol.width() as i32 - code_bounds.width()).div_euclid(2);
        let code_y = symbol_y + symbol.height() + self.options.code_gap;
        draw_text(
            &mut card,
            self.font,
            code_scale,
            code_x as f32,
            code_y as f32,
            TEXT_COLOR,
            code,
        );

        if let Some(counter) = counter {
            let text = counter.to_string();
            let scale = em_scale(self.font, self.options.counter_font_size);
            let bounds = measure_text(self.font, scale, &text);
            let x = (card.width() as f32 - bounds.width() as f32) / 2.0;
            let y = card.height() as f32 - self.options.counter_margin_px() - bounds.height() as f32;
            draw_text(&mut card, self.font, scale, x, y, TEXT_COLOR, &text);
        }

        card
    }
}

/// Composite over an opaque white background
pub fn flatten_on_white(img: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// A finished card in its output color model
#[derive(Debug, Clone, PartialEq)]
pub enum CardRaster {
    Rgb(RgbImage),
    Cmyk(CmykPlanes),
}

impl CardRaster {
    /// Apply the optional color transform to a flattened card
    pub fn finish(flattened: RgbImage, transform: Option<&ColorTransform>) -> Self {
        match transform {
            Some(transform) => CardRaster::Cmyk(transform.apply(&flattened)),
            None => CardRaster::Rgb(flattened),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            CardRaster::Rgb(img) => img.dimensions(),
            CardRaster::Cmyk(planes) => planes.dimensions(),
        }
    }

    /// Lanczos resample to the cell's pixel size
    pub fn resample(self, width: u32, height: u32) -> Self {
        if self.dimensions() == (width, height) {
            return self;
        }
        match self {
            CardRaster::Rgb(img) => {
                CardRaster::Rgb(imageops::resize(&img, width, height, FilterType::Lanczos3))
            }
            CardRaster::Cmyk(planes) => {
                CardRaster::Cmyk(planes.resize(width, height, FilterType::Lanczos3))
            }
        }
    }

    pub fn into_sheet_image(self) -> Result<SheetImage> {
        match self {
            CardRaster::Rgb(img) => Ok(SheetImage::try_from(img)?),
            CardRaster::Cmyk(planes) => Ok(planes.into_sheet_image()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fallback_font;
    use card_sheet::ColorModel;

    fn small_options() -> MintOptions {
        MintOptions {
            symbol_size: 40,
            symbol_x: 30,
            symbol_y: 20,
            code_gap: 5,
            code_font_size: 14.0,
            counter_font_size: 12.0,
            counter_margin_mm: 1.0,
            dpi: 100,
            ..Default::default()
        }
    }

    fn dark_pixels(img: &RgbaImage, y_range: std::ops::Range<u32>) -> usize {
        img.enumerate_pixels()
            .filter(|(_, y, p)| y_range.contains(y) && p.0[0] < 128)
            .count()
    }

    #[test]
    fn test_flatten_on_white() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 0, Rgba([0, 100, 200, 128]));

        let flat = flatten_on_white(&img);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);
        // 127 of 255 parts white
        assert_eq!(flat.get_pixel(2, 0).0, [127, 177, 227]);
    }

    #[test]
    fn test_symbol_replaces_template_region() {
        let template = RgbaImage::from_pixel(100, 140, Rgba([200, 0, 0, 0]));
        let font = fallback_font().unwrap();
        let options = small_options();
        let compositor = Compositor::new(&template, &font, &options).unwrap();

        let symbol = RgbImage::from_fn(40, 40, |x, _| Rgb([(x * 6) as u8, 0, 0]));
        let card = compositor.compose(&symbol, "ABC123", None);

        for y in 0..40 {
            for x in 0..40 {
                let p = card.get_pixel(30 + x, 20 + y).0;
                assert_eq!(p, [(x * 6) as u8, 0, 0, 255]);
            }
        }
        // Outside the symbol the template is untouched
        assert_eq!(card.get_pixel(5, 5).0, [200, 0, 0, 0]);
    }

    #[test]
    fn test_code_is_drawn_below_symbol() {
        let template = RgbaImage::from_pixel(100, 140, Rgba([255, 255, 255, 255]));
        let font = fallback_font().unwrap();
        let options = small_options();
        let compositor = Compositor::new(&template, &font, &options).unwrap();
        let symbol = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));

        let card = compositor.compose(&symbol, "ABC123", None);
        assert!(dark_pixels(&card, 65..90) > 0);
        assert_eq!(dark_pixels(&card, 0..65), 0);
    }

    #[test]
    fn test_counter_is_optional() {
        let template = RgbaImage::from_pixel(100, 140, Rgba([255, 255, 255, 255]));
        let font = fallback_font().unwrap();
        let options = small_options();
        let compositor = Compositor::new(&template, &font, &options).unwrap();
        let symbol = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));

        let without = compositor.compose(&symbol, "ABC123", None);
        let with = compositor.compose(&symbol, "ABC123", Some(7));

        assert_eq!(dark_pixels(&without, 100..140), 0);
        assert!(dark_pixels(&with, 100..140) > 0);
    }

    #[test]
    fn test_symbol_outside_template_is_rejected() {
        let template = RgbaImage::new(50, 50);
        let font = fallback_font().unwrap();
        let options = small_options();
        assert!(matches!(
            Compositor::new(&template, &font, &options),
            Err(MintError::Config(_))
        ));
    }

    #[test]
    fn test_cmyk_raster_resamples_per_channel() {
        let flat = RgbImage::from_pixel(20, 30, Rgb([255, 0, 255]));
        let raster = CardRaster::finish(flat, Some(&ColorTransform::default())).resample(10, 15);

        assert_eq!(raster.dimensions(), (10, 15));
        let image = raster.into_sheet_image().unwrap();
        assert_eq!(image.color(), ColorModel::Cmyk);
        // Uniform planes stay uniform: C=0, M=floor(255*0.95), Y=0, K=0
        for pixel in image.samples().chunks(4) {
            assert_eq!(pixel[0], 0);
            assert!(pixel[1].abs_diff(242) <= 1);
            assert_eq!(pixel[2], 0);
            assert_eq!(pixel[3], 0);
        }
    }

    #[test]
    fn test_rgb_raster_keeps_size_when_already_matching() {
        let flat = RgbImage::from_pixel(10, 15, Rgb([1, 2, 3]));
        let raster = CardRaster::finish(flat.clone(), None).resample(10, 15);
        assert_eq!(raster, CardRaster::Rgb(flat));
    }
}

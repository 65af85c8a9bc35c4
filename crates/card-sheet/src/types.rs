use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid geometry: {0}")]
    Geometry(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("No cards to lay out")]
    NoCards,
    #[error("Sheet references {expected} images but {actual} were supplied")]
    ImageCount { expected: usize, actual: usize },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SheetError>;

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Portrait dimensions (width, height) in millimeters
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }
}

/// Color model of a raster handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    /// Additive, three samples per pixel
    Rgb,
    /// Subtractive, four samples per pixel (0 = no ink)
    Cmyk,
}

impl ColorModel {
    pub fn channels(self) -> usize {
        match self {
            ColorModel::Rgb => 3,
            ColorModel::Cmyk => 4,
        }
    }

    /// PDF device color space name
    pub fn pdf_color_space(self) -> &'static [u8] {
        match self {
            ColorModel::Rgb => b"DeviceRGB",
            ColorModel::Cmyk => b"DeviceCMYK",
        }
    }
}

/// A finished, opaque raster ready to be placed into a cell.
///
/// Samples are 8-bit and interleaved, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetImage {
    width: u32,
    height: u32,
    color: ColorModel,
    samples: Vec<u8>,
}

impl SheetImage {
    /// Wrap raw interleaved samples, checking the buffer length.
    pub fn new(width: u32, height: u32, color: ColorModel, samples: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * color.channels();
        if samples.len() != expected || width == 0 || height == 0 {
            return Err(SheetError::Config(format!(
                "{}x{} {:?} raster needs {} samples, got {}",
                width,
                height,
                color,
                expected,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            color,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color(&self) -> ColorModel {
        self.color
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}

impl TryFrom<image::RgbImage> for SheetImage {
    type Error = SheetError;

    fn try_from(img: image::RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, ColorModel::Rgb, img.into_raw())
    }
}

/// Pagination figures for a card run
#[derive(Debug, Clone, PartialEq)]
pub struct SheetStatistics {
    /// Number of cards in the run
    pub cards: usize,
    /// Cells on one page (rows × columns)
    pub cards_per_page: usize,
    /// Pages in the output document
    pub pages: usize,
    /// Cards placed on the final (possibly partial) page
    pub cards_on_last_page: usize,
    /// Empty cells left on the final page
    pub empty_cells: usize,
}

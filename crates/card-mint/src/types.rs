use card_sheet::{SheetError, SheetImage};
use image::RgbImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("{what} not found: {}", path.display())]
    ResourceMissing { what: &'static str, path: PathBuf },
    #[error("Record {index} ({identifier}) does not fit in a symbol: {reason}")]
    CapacityExceeded {
        index: usize,
        identifier: String,
        reason: String,
    },
    #[error("Magenta factor must be in (0, 1], got {0}")]
    InvalidColorTransform(f64),
    #[error("No identifiers to mint")]
    EmptyInput,
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, MintError>;

/// One minted card, created per input line.
#[derive(Debug, Clone)]
pub struct CardRecord {
    /// One-based position in the input list
    pub sequence_index: usize,
    pub source_identifier: String,
    /// Printed label, derived once from the identifier
    pub derived_code: String,
    /// Encoded symbol at its final pixel size
    pub symbol: RgbImage,
    /// Finished raster, handed to the sheet renderer
    pub composited: Option<SheetImage>,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub cards: usize,
    pub pages: usize,
    pub output: PathBuf,
}

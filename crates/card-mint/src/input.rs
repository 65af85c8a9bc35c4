//! Reading run inputs: identifier lists and template rasters

use crate::types::{MintError, Result};
use image::RgbaImage;
use std::path::Path;

/// Split newline-delimited identifiers, trimming each and skipping blanks.
pub fn parse_identifiers(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the identifier list at `path`, preserving order.
pub async fn load_identifiers(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = read_resource(path, "Identifier list").await?;
    let contents = String::from_utf8_lossy(&contents);

    let identifiers = parse_identifiers(&contents);
    if identifiers.is_empty() {
        return Err(MintError::EmptyInput);
    }

    log::info!(
        "Loaded {} identifier(s) from {}",
        identifiers.len(),
        path.display()
    );
    Ok(identifiers)
}

/// Load and decode a template raster as RGBA.
pub async fn load_template(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let bytes = read_resource(path, "Template").await?;

    // Decoding is CPU-bound, spawn blocking
    let template = tokio::task::spawn_blocking(move || {
        let img = image::load_from_memory(&bytes)?;
        Ok::<_, MintError>(img.to_rgba8())
    })
    .await??;

    log::debug!(
        "Loaded template {} ({}x{})",
        path.display(),
        template.width(),
        template.height()
    );
    Ok(template)
}

async fn read_resource(path: &Path, what: &'static str) -> Result<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(MintError::ResourceMissing {
            what,
            path: path.to_owned(),
        }),
        Err(e) => Err(e.into()),
    }
}

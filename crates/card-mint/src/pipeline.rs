//! The parameterized minting pipeline
//!
//! Identifier → symbol → composited card runs once per record on a bounded
//! pool of blocking tasks. Results are collected in input order before they
//! reach the sheet renderer, because the counter and the placement slot are
//! both positional.

use crate::code::derive_code_or_placeholder;
use crate::compose::{CardRaster, Compositor, flatten_on_white};
use crate::font::load_font;
use crate::input::load_template;
use crate::options::{MintOptions, PipelineOptions};
use crate::symbol::encode_symbol;
use crate::types::*;
use card_sheet::{GridLayout, SheetDocument, SheetImage, calculate_statistics, write_sheet};
use image::{ImageFormat, RgbImage, RgbaImage};
use rusttype::Font;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A minted record plus the PNG files requested for export
struct MintedCard {
    record: CardRecord,
    exports: Vec<(String, Vec<u8>)>,
}

/// Shared, read-only inputs for every record of a run
struct MintContext {
    template: RgbaImage,
    font: Font<'static>,
    options: MintOptions,
    cell_size: (u32, u32),
    export: bool,
}

pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Mint one card per identifier, in input order.
    ///
    /// Sequence indices start at 1. Any record that fails aborts the run.
    pub async fn mint(
        &self,
        identifiers: Vec<String>,
        template: RgbaImage,
    ) -> Result<Vec<CardRecord>> {
        if identifiers.is_empty() {
            return Err(MintError::EmptyInput);
        }

        let font = load_font(self.options.mint.font_path.as_deref()).await?;
        let context = Arc::new(MintContext {
            template,
            font,
            options: self.options.mint.clone(),
            cell_size: self.options.cell_size_px(),
            export: self.options.export_dir.is_some(),
        });

        // Reject a template the symbol does not fit before spawning anything
        Compositor::new(&context.template, &context.font, &context.options)?;

        log::info!(
            "Minting {} card(s) on {} worker(s)",
            identifiers.len(),
            self.options.workers
        );

        let semaphore = Arc::new(Semaphore::new(self.options.workers));
        let mut handles = Vec::with_capacity(identifiers.len());

        for (i, identifier) in identifiers.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| MintError::Config(format!("Worker pool closed: {}", e)))?;
            let context = Arc::clone(&context);

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                mint_card(&context, i + 1, identifier)
            }));
        }

        let mut minted = Vec::with_capacity(handles.len());
        for handle in handles {
            minted.push(handle.await??);
        }

        // Exports are written only once every record has minted
        if let Some(dir) = &self.options.export_dir {
            let exports: Vec<_> = minted.iter().flat_map(|card| &card.exports).collect();
            write_exports(dir, &exports).await?;
        }

        Ok(minted.into_iter().map(|card| card.record).collect())
    }

    /// Lay out minted records on paginated sheets and write the PDF.
    pub async fn render(
        &self,
        mut records: Vec<CardRecord>,
        output: impl AsRef<Path>,
    ) -> Result<RunSummary> {
        let layout = &self.options.layout;
        let stats = calculate_statistics(records.len(), layout)?;

        let images: Vec<SheetImage> = records
            .iter_mut()
            .filter_map(|record| record.composited.take())
            .collect();

        let grid = GridLayout::from_spec(layout)?;
        let sheet = SheetDocument::paginate(&grid, records.len(), layout.page_numbers)?;
        let output = output.as_ref().to_owned();
        write_sheet(sheet, grid, layout.marks(), images, &output).await?;

        Ok(RunSummary {
            cards: stats.cards,
            pages: stats.pages,
            output,
        })
    }

    /// Front sheets: one card per identifier.
    pub async fn front(
        &self,
        identifiers: Vec<String>,
        template: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RunSummary> {
        if identifiers.is_empty() {
            return Err(MintError::EmptyInput);
        }
        let template = load_template(template).await?;
        let records = self.mint(identifiers, template).await?;
        self.render(records, output).await
    }

    /// Back sheet: the template repeated into every cell of one mirrored page.
    pub async fn back(
        &self,
        template: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<RunSummary> {
        let template = load_template(template).await?;
        let (width, height) = self.options.cell_size_px();
        let transform = self.options.mint.color_transform;

        let image = tokio::task::spawn_blocking(move || {
            let flattened = flatten_on_white(&template);
            CardRaster::finish(flattened, transform.as_ref())
                .resample(width, height)
                .into_sheet_image()
        })
        .await??;

        let grid = GridLayout::from_spec(&self.options.layout)?.mirrored();
        let sheet = SheetDocument::repeated(&grid);
        let cards = sheet.card_count();
        let output = output.as_ref().to_owned();
        write_sheet(sheet, grid, self.options.layout.marks(), vec![image], &output).await?;

        Ok(RunSummary {
            cards,
            pages: 1,
            output,
        })
    }

    /// Cut-guide sheet: trim outlines for every cell, no artwork.
    pub async fn cut_guides(&self, output: impl AsRef<Path>) -> Result<RunSummary> {
        let layout = &self.options.layout;
        let mut marks = layout.marks();
        if !marks.any_enabled() {
            marks.trim_outlines = true;
        }

        let grid = GridLayout::from_spec(layout)?;
        let sheet = SheetDocument::marks_only(&grid);
        let cards = sheet.card_count();
        let output = output.as_ref().to_owned();
        write_sheet(sheet, grid, marks, Vec::new(), &output).await?;

        Ok(RunSummary {
            cards,
            pages: 1,
            output,
        })
    }
}

fn mint_card(context: &MintContext, index: usize, identifier: String) -> Result<MintedCard> {
    let options = &context.options;
    let derived_code = derive_code_or_placeholder(&identifier);
    let symbol = encode_symbol(index, &identifier, options.symbol_size)?;

    let compositor = Compositor::new(&context.template, &context.font, options)?;
    let card = compositor.compose(&symbol, &derived_code, options.counter.then_some(index));
    let flattened = flatten_on_white(&card);

    let mut exports = Vec::new();
    if context.export {
        exports.push((
            format!("QR_{}_{}.png", index, derived_code),
            encode_png(&symbol)?,
        ));
        exports.push((
            format!("card_{}_{}.png", index, derived_code),
            encode_png(&flattened)?,
        ));
    }

    let (width, height) = context.cell_size;
    let composited = CardRaster::finish(flattened, options.color_transform.as_ref())
        .resample(width, height)
        .into_sheet_image()?;

    log::debug!("Minted card {} ({})", index, derived_code);

    Ok(MintedCard {
        record: CardRecord {
            sequence_index: index,
            source_identifier: identifier,
            derived_code,
            symbol,
            composited: Some(composited),
        },
        exports,
    })
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Write every export file or none of them
async fn write_exports(dir: &Path, exports: &[&(String, Vec<u8>)]) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(exports.len());
    for (name, bytes) in exports.iter().copied() {
        let path = dir.join(name);
        if let Err(e) = tokio::fs::write(&path, bytes).await {
            for path in &written {
                if let Err(e) = tokio::fs::remove_file(path).await {
                    log::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
            return Err(e.into());
        }
        written.push(path);
    }

    log::info!("Exported {} file(s) to {}", written.len(), dir.display());
    Ok(())
}

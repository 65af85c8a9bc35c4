//! PDF rendering for card sheets
//!
//! This module handles all PDF-specific operations:
//! - Embedding card rasters as image XObjects
//! - Building output pages with placements, marks and page numbers
//! - Assembling and saving the final document

mod page;
mod xobject;

pub use page::*;
pub use xobject::{ImageCache, create_image_xobject};

use crate::layout::GridLayout;
use crate::marks::MarksConfig;
use crate::sheet::SheetDocument;
use crate::types::*;
use lopdf::{Dictionary, Document, Object};
use std::path::Path;

/// Render a paginated sheet document to PDF.
///
/// `images[i]` is the raster for every card whose image index is `i`.
pub fn render_document(
    sheet: &SheetDocument,
    grid: &GridLayout,
    marks: MarksConfig,
    images: &[SheetImage],
) -> Result<Document> {
    let expected = sheet.image_count();
    if images.len() < expected {
        return Err(SheetError::ImageCount {
            expected,
            actual: images.len(),
        });
    }

    let mut output = Document::with_version("1.5");
    let pages_tree_id = output.new_object_id();

    let number_font = sheet
        .pages
        .iter()
        .any(|page| page.stamp_number)
        .then(|| add_number_font(&mut output));

    let mut cache = ImageCache::new();
    let mut resources = PageResources {
        images,
        cache: &mut cache,
        marks,
        number_font,
    };

    let mut page_refs = Vec::with_capacity(sheet.pages.len());
    for page in &sheet.pages {
        let page_id = render_sheet_page(&mut output, page, grid, pages_tree_id, &mut resources)?;
        page_refs.push(Object::Reference(page_id));
    }

    log::debug!(
        "Rendered {} page(s) embedding {} image(s)",
        page_refs.len(),
        cache.image_count()
    );

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    output.compress();

    Ok(output)
}

/// Serialize a document to bytes
pub fn document_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Render a sheet document and write it to `path`.
///
/// Rendering and serialization happen in memory on a blocking thread. The
/// file is written only after the whole document rendered.
pub async fn write_sheet(
    sheet: SheetDocument,
    grid: GridLayout,
    marks: MarksConfig,
    images: Vec<SheetImage>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref().to_owned();

    let bytes = tokio::task::spawn_blocking(move || {
        let doc = render_document(&sheet, &grid, marks, &images)?;
        document_to_bytes(doc)
    })
    .await??;

    tokio::fs::write(&path, bytes).await?;
    log::info!("Wrote {}", path.display());

    Ok(())
}

//! Image XObject creation
//!
//! Each distinct card raster becomes one image XObject. A raster placed in
//! several cells (back sheets) is embedded once and referenced repeatedly.

use crate::types::SheetImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Add an image XObject for `image` to the output document.
pub fn create_image_xobject(output: &mut Document, image: &SheetImage) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(image.width() as i64));
    dict.set("Height", Object::Integer(image.height() as i64));
    dict.set(
        "ColorSpace",
        Object::Name(image.color().pdf_color_space().to_vec()),
    );
    dict.set("BitsPerComponent", Object::Integer(8));

    output.add_object(Stream::new(dict, image.samples().to_vec()))
}

/// XObjects keyed by image index, created on first use
#[derive(Debug, Default)]
pub struct ImageCache {
    ids: HashMap<usize, ObjectId>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object ID of the XObject for `index`, embedding it if needed
    pub fn get_or_create(
        &mut self,
        output: &mut Document,
        images: &[SheetImage],
        index: usize,
    ) -> Option<ObjectId> {
        if let Some(&id) = self.ids.get(&index) {
            return Some(id);
        }
        let image = images.get(index)?;
        let id = create_image_xobject(output, image);
        self.ids.insert(index, id);
        Some(id)
    }

    /// Number of embedded images
    pub fn image_count(&self) -> usize {
        self.ids.len()
    }
}

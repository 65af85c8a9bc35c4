//! Output page rendering for card sheets

use crate::constants::{
    HELVETICA_DIGIT_WIDTH_RATIO, PAGE_NUMBER_BOTTOM_MARGIN_MM, PAGE_NUMBER_FONT_SIZE,
    PAGE_NUMBER_RIGHT_MARGIN_MM, mm_to_pt,
};
use crate::layout::{GridLayout, Rect};
use crate::marks::{MarksConfig, generate_marks};
use crate::sheet::SheetPage;
use crate::types::{Result, SheetImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::ImageCache;

/// Shared per-document resources used while rendering pages
pub struct PageResources<'a> {
    pub images: &'a [SheetImage],
    pub cache: &'a mut ImageCache,
    pub marks: MarksConfig,
    /// Helvetica font object, present when any page stamps its number
    pub number_font: Option<ObjectId>,
}

/// Render one closed sheet page and return its object ID.
pub fn render_sheet_page(
    output: &mut Document,
    page: &SheetPage,
    grid: &GridLayout,
    parent_pages_id: ObjectId,
    resources: &mut PageResources<'_>,
) -> Result<ObjectId> {
    // Create page dictionary
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(grid.page_width_pt),
            Object::Real(grid.page_height_pt),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();
    let mut fonts = Dictionary::new();
    let mut trims: Vec<Rect> = Vec::new();

    for card in &page.cards {
        trims.push(card.placement.trim);

        let Some(image_index) = card.image else {
            continue;
        };
        let Some(xobject_id) =
            resources
                .cache
                .get_or_create(output, resources.images, image_index)
        else {
            continue;
        };

        let xobject_name = format!("Im{}", image_index);
        xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));
        content_ops.push(generate_placement_command(
            &xobject_name,
            &card.placement.cell,
        ));
    }

    content_ops.push(generate_marks(&resources.marks, &trims));

    if page.stamp_number {
        if let Some(font_id) = resources.number_font {
            content_ops.push(generate_page_number(page.number, grid.page_width_pt));
            fonts.set("F1", Object::Reference(font_id));
        }
    }

    // Set up resources
    let mut page_resources = Dictionary::new();
    page_resources.set("XObject", Object::Dictionary(xobjects));
    if !fonts.is_empty() {
        page_resources.set("Font", Object::Dictionary(fonts));
    }

    // Create content stream
    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(page_resources));

    Ok(output.add_object(page_dict))
}

/// Add the built-in Helvetica font used for page numbers
pub fn add_number_font(output: &mut Document) -> ObjectId {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    output.add_object(font_dict)
}

/// Content stream command drawing an image XObject into a cell.
///
/// Image space is the unit square, so the matrix scales it to the cell.
fn generate_placement_command(xobject_name: &str, cell: &Rect) -> String {
    format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        cell.width, cell.height, cell.x, cell.y, xobject_name
    )
}

/// Page number right-aligned against the bottom-right margin
fn generate_page_number(number: usize, page_width_pt: f32) -> String {
    let text = number.to_string();
    let text_width = text.len() as f32 * PAGE_NUMBER_FONT_SIZE * HELVETICA_DIGIT_WIDTH_RATIO;
    let right = page_width_pt - mm_to_pt(PAGE_NUMBER_RIGHT_MARGIN_MM);

    format!(
        "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
        PAGE_NUMBER_FONT_SIZE,
        right - text_width,
        mm_to_pt(PAGE_NUMBER_BOTTOM_MARGIN_MM),
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_is_right_aligned() {
        let page_width = 595.0;
        let one = generate_page_number(1, page_width);
        let twelve = generate_page_number(12, page_width);

        let x_of = |ops: &str| -> f32 {
            let parts: Vec<&str> = ops.split_whitespace().collect();
            let td = parts.iter().position(|p| *p == "Td").unwrap();
            parts[td - 2].parse().unwrap()
        };

        // Two digits start one digit-width further left
        let digit = PAGE_NUMBER_FONT_SIZE * HELVETICA_DIGIT_WIDTH_RATIO;
        assert!((x_of(&one) - x_of(&twelve) - digit).abs() < 1e-3);
        assert!(twelve.contains("(12) Tj"));
    }

    #[test]
    fn test_placement_scales_unit_square_to_cell() {
        let cmd = generate_placement_command("Im0", &Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(cmd, "q 30 0 0 40 10 20 cm /Im0 Do Q\n");
    }
}

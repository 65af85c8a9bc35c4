use card_mint::*;
use tempfile::{NamedTempFile, TempDir};

#[tokio::test]
async fn test_load_identifiers_preserves_order() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        "https://example.com/c\n\nhttps://example.com/a\n  https://example.com/b  \n",
    )
    .unwrap();

    let identifiers = load_identifiers(file.path()).await.unwrap();
    assert_eq!(
        identifiers,
        vec![
            "https://example.com/c",
            "https://example.com/a",
            "https://example.com/b"
        ]
    );
}

#[tokio::test]
async fn test_missing_identifier_list() {
    let dir = TempDir::new().unwrap();
    let result = load_identifiers(dir.path().join("links.txt")).await;
    assert!(matches!(result, Err(MintError::ResourceMissing { .. })));
}

#[tokio::test]
async fn test_blank_identifier_list() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "\n   \n\n").unwrap();

    let result = load_identifiers(file.path()).await;
    assert!(matches!(result, Err(MintError::EmptyInput)));
}

#[tokio::test]
async fn test_load_template_decodes_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.png");
    image::RgbImage::from_pixel(12, 7, image::Rgb([1, 2, 3]))
        .save(&path)
        .unwrap();

    let template = load_template(&path).await.unwrap();
    assert_eq!(template.dimensions(), (12, 7));
    assert_eq!(template.get_pixel(0, 0).0, [1, 2, 3, 255]);
}

#[tokio::test]
async fn test_unreadable_template() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"not an image").unwrap();

    let result = load_template(file.path()).await;
    assert!(matches!(result, Err(MintError::Image(_))));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    let file = NamedTempFile::new().unwrap();
    let mut options = PipelineOptions::back_cmyk();
    options.mint.color_transform = Some(ColorTransform::new(0.9).unwrap());
    options.workers = 2;

    options.save(file.path()).await.unwrap();
    let loaded = PipelineOptions::load(file.path()).await.unwrap();

    assert_eq!(loaded, options);
    assert!(loaded.layout.mirror_horizontal);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_bad_factor() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        r#"{ "mint": { "color_transform": { "magenta_factor": 0.0 } } }"#,
    )
    .unwrap();

    let result = PipelineOptions::load(file.path()).await;
    assert!(matches!(result, Err(MintError::InvalidColorTransform(_))));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_oversized_grid() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), r#"{ "layout": { "columns": 4 } }"#).unwrap();

    let result = PipelineOptions::load(file.path()).await;
    assert!(matches!(
        result,
        Err(MintError::Sheet(card_sheet::SheetError::Geometry(_)))
    ));
}

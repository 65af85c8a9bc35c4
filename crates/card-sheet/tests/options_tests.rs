use card_sheet::*;

#[test]
fn test_default_layout_is_valid() {
    let spec = LayoutSpec::default();
    assert!(spec.validate().is_ok());
    assert_eq!(spec.cards_per_page(), 9);
    assert!((spec.grid_width_mm() - 181.0).abs() < 1e-4);
    assert!((spec.grid_height_mm() - 265.0).abs() < 1e-4);
}

#[test]
fn test_validation_grid_too_tall() {
    let spec = LayoutSpec {
        rows: 4,
        ..Default::default()
    };
    match spec.validate() {
        Err(SheetError::Geometry(msg)) => assert!(msg.contains("tall")),
        other => panic!("Expected Geometry error, got {:?}", other),
    }
}

#[test]
fn test_validation_grid_exactly_fits() {
    // 2 × 100 + 10 = 210 mm, exactly the A4 width
    let spec = LayoutSpec {
        card_width_mm: 100.0,
        columns: 2,
        spacing_mm: 10.0,
        ..Default::default()
    };
    assert!(spec.validate().is_ok());
}

#[test]
fn test_validation_rejects_degenerate_values() {
    let zero_rows = LayoutSpec {
        rows: 0,
        ..Default::default()
    };
    assert!(matches!(zero_rows.validate(), Err(SheetError::Geometry(_))));

    let negative_spacing = LayoutSpec {
        spacing_mm: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        negative_spacing.validate(),
        Err(SheetError::Geometry(_))
    ));

    let huge_bleed = LayoutSpec {
        bleed_mm: 30.0,
        ..Default::default()
    };
    assert!(matches!(huge_bleed.validate(), Err(SheetError::Geometry(_))));

    let zero_card = LayoutSpec {
        card_width_mm: 0.0,
        ..Default::default()
    };
    assert!(matches!(zero_card.validate(), Err(SheetError::Geometry(_))));
}

#[test]
fn test_custom_paper_size() {
    let spec = LayoutSpec {
        paper_size: PaperSize::Custom {
            width_mm: 190.0,
            height_mm: 270.0,
        },
        ..Default::default()
    };
    assert!(spec.validate().is_ok());

    let too_small = LayoutSpec {
        paper_size: PaperSize::Custom {
            width_mm: 180.0,
            height_mm: 270.0,
        },
        ..Default::default()
    };
    assert!(too_small.validate().is_err());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_layout() {
    use tempfile::NamedTempFile;

    let spec = LayoutSpec {
        paper_size: PaperSize::Letter,
        bleed_mm: 3.0,
        mirror_horizontal: true,
        crop_marks: true,
        page_numbers: true,
        ..Default::default()
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    spec.save(path).await.unwrap();
    let loaded = LayoutSpec::load(path).await.unwrap();

    assert_eq!(loaded, spec);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_partial_layout_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), r#"{ "crop_marks": true }"#).unwrap();

    let loaded = LayoutSpec::load(temp_file.path()).await.unwrap();
    assert!(loaded.crop_marks);
    assert_eq!(loaded.rows, 3);
    assert_eq!(loaded.card_width_mm, 57.0);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_malformed_layout() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "not json").unwrap();

    match LayoutSpec::load(temp_file.path()).await {
        Err(SheetError::Config(msg)) => assert!(msg.contains("Failed to parse")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

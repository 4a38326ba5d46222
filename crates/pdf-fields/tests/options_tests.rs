use pdf_fields::*;
use std::ffi::OsString;
use std::path::PathBuf;

#[test]
fn test_default_font_sizes() {
    let options = InsertOptions::default();
    assert!(options.validate().is_ok());
    assert!(options.handwriting_font.is_none());

    assert_eq!(options.font_sizes(FieldType::Text), FontSizeRange { min: 8.0, max: 15.0 });
    assert_eq!(options.font_sizes(FieldType::Date), FontSizeRange::STANDARD);
    assert_eq!(
        options.font_sizes(FieldType::Signature),
        FontSizeRange { min: 20.0, max: 50.0 }
    );
    assert_eq!(
        options.font_sizes(FieldType::FreeSignature),
        FontSizeRange::HANDWRITING
    );
}

#[test]
fn test_validation_inverted_range() {
    let options = InsertOptions {
        handwriting_font_sizes: FontSizeRange { min: 60.0, max: 50.0 },
        ..Default::default()
    };
    match options.validate() {
        Err(FieldError::Config(msg)) => {
            assert!(msg.contains("handwriting"));
            assert!(msg.contains("exceeds"));
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_validation_non_positive_sizes() {
    for range in [
        FontSizeRange { min: 0.0, max: 15.0 },
        FontSizeRange { min: -1.0, max: 15.0 },
        FontSizeRange { min: 8.0, max: f32::INFINITY },
        FontSizeRange { min: f32::NAN, max: 15.0 },
    ] {
        let options = InsertOptions {
            standard_font_sizes: range,
            ..Default::default()
        };
        assert!(
            matches!(options.validate(), Err(FieldError::Config(_))),
            "{:?} should be rejected",
            range
        );
    }
}

#[test]
fn test_validation_empty_font_path() {
    let options = InsertOptions {
        handwriting_font: Some(PathBuf::new()),
        ..Default::default()
    };
    assert!(matches!(options.validate(), Err(FieldError::Config(_))));
}

#[test]
fn test_handwriting_font_override() {
    let options = InsertOptions {
        handwriting_font: Some(PathBuf::from("config.ttf")),
        ..Default::default()
    };

    let unchanged = options.clone().with_handwriting_font_override(None);
    assert_eq!(unchanged.handwriting_font, Some(PathBuf::from("config.ttf")));

    let empty = options
        .clone()
        .with_handwriting_font_override(Some(OsString::new()));
    assert_eq!(empty.handwriting_font, Some(PathBuf::from("config.ttf")));

    let overridden = options.with_handwriting_font_override(Some(OsString::from("env.ttf")));
    assert_eq!(overridden.handwriting_font, Some(PathBuf::from("env.ttf")));
}

#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = InsertOptions {
        handwriting_font: Some(PathBuf::from("/fonts/caveat.ttf")),
        standard_font_sizes: FontSizeRange { min: 6.0, max: 12.0 },
        ..Default::default()
    };

    let temp = NamedTempFile::new().unwrap();
    options.save(temp.path()).await.unwrap();

    let loaded = InsertOptions::load(temp.path()).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_load_partial_options() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    tokio::fs::write(temp.path(), r#"{ "handwriting_font": "sig.ttf" }"#)
        .await
        .unwrap();

    let loaded = InsertOptions::load(temp.path()).await.unwrap();
    assert_eq!(loaded.handwriting_font, Some(PathBuf::from("sig.ttf")));
    assert_eq!(loaded.standard_font_sizes, FontSizeRange::STANDARD);
    assert_eq!(loaded.handwriting_font_sizes, FontSizeRange::HANDWRITING);
}

#[tokio::test]
async fn test_load_invalid_options() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    tokio::fs::write(temp.path(), "not json").await.unwrap();

    assert!(matches!(
        InsertOptions::load(temp.path()).await,
        Err(FieldError::Config(_))
    ));
}

//! Upload validation at the public boundary.

use super::test_images::{gradient_png, png_upload};
use rstest::rstest;
use veriframe::error::{AppError, ValidationError};
use veriframe::upload::{
    load_upload, validate_upload, UploadConfig, UploadFile, MAX_UPLOAD_BYTES,
};

#[rstest]
#[case("image/png", true)]
#[case("image/jpeg", true)]
#[case("image/webp", true)]
#[case("IMAGE/GIF", true)]
#[case("text/plain", false)]
#[case("application/pdf", false)]
#[case("", false)]
fn test_content_type_gate(#[case] content_type: &str, #[case] accepted: bool) {
    let file = UploadFile::new("f", content_type, vec![0u8; 16]);
    assert_eq!(
        validate_upload(&file, &UploadConfig::default()).is_ok(),
        accepted
    );
}

#[test]
fn test_size_boundary() {
    assert_eq!(MAX_UPLOAD_BYTES, 5_242_880);
    let config = UploadConfig::default();

    let at_limit = UploadFile::new("big.png", "image/png", vec![0u8; 5_242_880]);
    assert!(validate_upload(&at_limit, &config).is_ok());

    let over_limit = UploadFile::new("big.png", "image/png", vec![0u8; 5_242_881]);
    assert_eq!(
        validate_upload(&over_limit, &config),
        Err(ValidationError::TooLarge {
            size: 5_242_881,
            max_size: 5_242_880,
        })
    );
}

#[tokio::test]
async fn test_load_from_disk_derives_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Photo.PNG");
    std::fs::write(&path, gradient_png(30, 20)).unwrap();

    let file = UploadFile::from_path(&path).unwrap();
    assert_eq!(file.content_type, "image/png");
    assert_eq!(file.name, "Photo.PNG");

    let mut loaded = None;
    load_upload(file, &UploadConfig::default(), |handle| loaded = Some(handle))
        .await
        .unwrap();

    let handle = loaded.unwrap();
    assert_eq!((handle.width(), handle.height()), (30, 20));
    assert_eq!(handle.fingerprint().len(), 64);
}

#[tokio::test]
async fn test_text_file_is_rejected_with_alert() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "just text").unwrap();

    let file = UploadFile::from_path(&path).unwrap();
    let mut called = false;
    let err = load_upload(file, &UploadConfig::default(), |_| called = true)
        .await
        .unwrap_err();

    assert!(!called);
    assert_eq!(err.alert_message(), "Please upload an image file");
}

#[tokio::test]
async fn test_image_typed_garbage_is_a_decode_error() {
    let file = UploadFile::new("broken.png", "image/png", b"\x89PNG but not really".to_vec());
    let err = load_upload(file, &UploadConfig::default(), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Decode(_)));
    assert_eq!(
        err.alert_message(),
        "Error processing image. Please try again."
    );
}

#[tokio::test]
async fn test_custom_limit_applies() {
    let config = UploadConfig { max_bytes: 64 };
    let err = load_upload(png_upload("a.png", 50, 50), &config, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::TooLarge { max_size: 64, .. })
    ));
}

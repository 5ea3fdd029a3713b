//! Watermark end-to-end tests: upload bytes in, PNG artifact out.

use super::test_images::{decode, encode, png_handle, png_upload, solid_jpeg};
use chrono::{TimeZone, Utc};
use image::{DynamicImage, ImageFormat, RgbaImage};
use regex::Regex;
use veriframe::export::{export_artifact, export_artifact_at, ExportConfig};
use veriframe::upload::{decode_upload, UploadConfig, UploadFile};
use veriframe::watermark::{Compositor, WatermarkRequest, WatermarkStyle, OUTPUT_CONTENT_TYPE};

fn compositor() -> Compositor {
    Compositor::new(WatermarkStyle::default()).unwrap()
}

#[tokio::test]
async fn test_400x300_png_with_short_text() {
    let handle = decode_upload(png_upload("input.png", 400, 300), &UploadConfig::default())
        .await
        .unwrap();
    let request = WatermarkRequest::new(handle.clone(), "TEST").unwrap();

    let result = compositor().compose(request).await.unwrap();

    assert_eq!((result.width(), result.height()), (400, 300));
    assert_eq!(result.font_size(), 40.0);
    assert_eq!(result.content_type(), OUTPUT_CONTENT_TYPE);

    let output = decode(result.data());
    let input = decode(handle.data());
    assert_eq!(output.dimensions(), (400, 300));
    assert_ne!(output, input);
}

#[tokio::test]
async fn test_narrow_image_uses_minimum_font_size() {
    let request = WatermarkRequest::new(png_handle(120, 90), "TEST").unwrap();
    let result = compositor().compose(request).await.unwrap();

    assert_eq!(result.font_size(), 30.0);
    assert_eq!((result.width(), result.height()), (120, 90));
}

#[tokio::test]
async fn test_output_dimensions_match_for_various_sizes() {
    let compositor = compositor();
    for (width, height) in [(1, 1), (17, 300), (640, 480), (1000, 40)] {
        let request = WatermarkRequest::new(png_handle(width, height), "VeriFrame").unwrap();
        let result = compositor.compose(request).await.unwrap();
        let output = decode(result.data());
        assert_eq!(output.dimensions(), (width, height), "for {}x{}", width, height);
    }
}

#[tokio::test]
async fn test_same_input_twice_is_byte_identical() {
    let compositor = compositor();
    let handle = png_handle(300, 200);

    let first = compositor
        .compose(WatermarkRequest::new(handle.clone(), "Protected").unwrap())
        .await
        .unwrap();
    let second = compositor
        .compose(WatermarkRequest::new(handle, "Protected").unwrap())
        .await
        .unwrap();

    assert_eq!(first.data(), second.data());
}

#[tokio::test]
async fn test_source_handle_is_untouched() {
    let handle = png_handle(200, 100);
    let before = handle.data().clone();

    let result = compositor()
        .compose(WatermarkRequest::new(handle.clone(), "TEST").unwrap())
        .await
        .unwrap();

    assert_eq!(handle.data(), &before);
    assert_ne!(result.data(), handle.data());
}

#[tokio::test]
async fn test_jpeg_source_produces_png() {
    let file = UploadFile::new("photo.jpg", "image/jpeg", solid_jpeg(320, 240, [40, 90, 160]));
    let handle = decode_upload(file, &UploadConfig::default()).await.unwrap();

    let result = compositor()
        .compose(WatermarkRequest::new(handle, "TEST").unwrap())
        .await
        .unwrap();

    assert!(result.data().starts_with(&[0x89, b'P', b'N', b'G']));
    assert!(result.data_uri().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_gif_source_is_accepted() {
    let img = RgbaImage::from_pixel(150, 100, image::Rgba([200, 30, 30, 255]));
    let data = encode(DynamicImage::ImageRgba8(img), ImageFormat::Gif);
    let file = UploadFile::new("anim.gif", "image/gif", data);
    let handle = decode_upload(file, &UploadConfig::default()).await.unwrap();

    let result = compositor()
        .compose(WatermarkRequest::new(handle, "TEST").unwrap())
        .await
        .unwrap();

    assert_eq!((result.width(), result.height()), (150, 100));
}

#[test]
fn test_empty_text_yields_no_request() {
    assert!(WatermarkRequest::new(png_handle(10, 10), "").is_none());
    assert!(WatermarkRequest::new(png_handle(10, 10), " \t ").is_none());
}

#[tokio::test]
async fn test_export_writes_timestamped_png() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig {
        output_dir: dir.path().join("nested").join("downloads"),
        ..Default::default()
    };
    let result = compositor()
        .compose(WatermarkRequest::new(png_handle(64, 64), "TEST").unwrap())
        .await
        .unwrap();

    let at = Utc.timestamp_millis_opt(1_712_345_678_901).unwrap();
    let artifact = export_artifact_at(&result, &config, at).unwrap();

    assert_eq!(artifact.file_name, "watermarked-1712345678901.png");
    assert_eq!(artifact.bytes, result.data().len());
    assert_eq!(std::fs::read(&artifact.path).unwrap(), result.data().to_vec());

    let artifact = export_artifact(&result, &config).unwrap();
    let re = Regex::new(r"^watermarked-\d+\.png$").unwrap();
    assert!(re.is_match(&artifact.file_name), "{}", artifact.file_name);
}

#[tokio::test]
async fn test_export_into_unwritable_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let config = ExportConfig {
        output_dir: blocker.join("downloads"),
        ..Default::default()
    };
    let result = compositor()
        .compose(WatermarkRequest::new(png_handle(32, 32), "TEST").unwrap())
        .await
        .unwrap();

    let err = export_artifact(&result, &config).unwrap_err();
    assert_eq!(err.kind(), "download");
    assert_eq!(
        err.alert_message(),
        "Failed to download image. Please try again."
    );
}

#[test]
fn test_blocking_core_matches_async_path() {
    let compositor = compositor();
    let handle = png_handle(100, 80);
    let request = WatermarkRequest::new(handle, "TEST").unwrap();

    let blocking = compositor.compose_blocking(&request).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let asynchronous = runtime.block_on(compositor.compose(request)).unwrap();

    assert_eq!(blocking, asynchronous);
}

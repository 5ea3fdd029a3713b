//! Full session flows against the simulated services.

use super::test_images::png_upload;
use std::time::Duration;
use veriframe::config::Config;
use veriframe::services::DetectionConfig;
use veriframe::session::{Session, Tab};

fn instant_config(output_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.detection = DetectionConfig {
        delay_ms: 0,
        seed: Some(2024),
        ..Default::default()
    };
    config.report.delay_ms = 0;
    config.export.output_dir = output_dir.to_path_buf();
    config
}

#[tokio::test]
async fn test_watermark_then_download() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::from_config(&instant_config(dir.path())).unwrap();
    let mut state = session.new_state();
    session.select_tab(&mut state, Tab::Watermark);

    session
        .upload_for_watermark(&mut state, png_upload("input.png", 400, 300))
        .await
        .unwrap();
    state.watermark.text = "TEST".to_string();
    let result = session.apply_watermark(&mut state).await.unwrap().unwrap();
    let artifact = session.download_watermarked(&state).unwrap();

    assert_eq!(result.font_size(), 40.0);
    assert!(artifact.path.starts_with(dir.path()));
    assert!(artifact.path.exists());
}

#[tokio::test]
async fn test_reupload_clears_watermark_result() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::from_config(&instant_config(dir.path())).unwrap();
    let mut state = session.new_state();

    session
        .upload_for_watermark(&mut state, png_upload("one.png", 80, 60))
        .await
        .unwrap();
    session.apply_watermark(&mut state).await.unwrap();
    assert!(state.watermark.result.is_some());

    session
        .upload_for_watermark(&mut state, png_upload("two.png", 90, 70))
        .await
        .unwrap();

    assert!(state.watermark.result.is_none());
    assert_eq!(state.watermark.image.as_ref().unwrap().width(), 90);
}

#[tokio::test]
async fn test_detection_confidence_in_range() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::from_config(&instant_config(dir.path())).unwrap();
    let mut state = session.new_state();
    session
        .upload_for_detection(&mut state, png_upload("face.png", 40, 40))
        .await
        .unwrap();

    for _ in 0..50 {
        let result = session.run_detection(&mut state).await.unwrap();
        assert!((70..=99).contains(&result.confidence));
        assert!(!result.details.is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_default_detection_delay_is_two_seconds() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = instant_config(dir.path());
    config.detection.delay_ms = 2000;
    let session = Session::from_config(&config).unwrap();
    let mut state = session.new_state();
    session
        .upload_for_detection(&mut state, png_upload("face.png", 8, 8))
        .await
        .unwrap();

    let started = tokio::time::Instant::now();
    session.run_detection(&mut state).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert!(!state.detect.analyzing);
}

#[tokio::test]
async fn test_report_submission_round() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::from_config(&instant_config(dir.path())).unwrap();
    let mut state = session.new_state();
    session.select_tab(&mut state, Tab::Report);

    let err = session.submit_report(&mut state).await.unwrap_err();
    assert_eq!(err.alert_message(), "Please provide the image");

    session
        .upload_for_report(&mut state, png_upload("fake.png", 16, 16))
        .await
        .unwrap();
    state.report.form.email = "reporter@example.com".to_string();
    state.report.form.description = "Audio and lips are out of sync".to_string();

    let ack = session.submit_report(&mut state).await.unwrap();

    assert_eq!(state.report.ack.as_ref(), Some(&ack));
    assert!(state.report.form.image.is_none());
    assert!(state.report.form.email.is_empty());
}

#[tokio::test]
async fn test_reset_discards_everything() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::from_config(&instant_config(dir.path())).unwrap();
    let mut state = session.new_state();
    session
        .upload_for_detection(&mut state, png_upload("a.png", 8, 8))
        .await
        .unwrap();
    session.run_detection(&mut state).await.unwrap();
    session.select_tab(&mut state, Tab::Report);

    session.reset(&mut state);

    assert_eq!(state, session.new_state());
    assert_eq!(state.active_tab, Tab::Detect);
}

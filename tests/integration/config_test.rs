//! Loading configuration files from disk.

use veriframe::config::Config;
use veriframe::logging::LogFormat;
use veriframe::session::Session;

fn write_temp_config(dir: &tempfile::TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join("veriframe.yaml");
    std::fs::write(&path, yaml).expect("Failed to write config");
    path
}

#[test]
fn test_full_config_file_builds_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        &dir,
        r##"
upload:
  max_bytes: 2097152
watermark:
  default_text: "Confidential"
  fill_color: "#FFF"
  fill_opacity: 0.6
  shadow_offset_x: 3
detection:
  delay_ms: 0
  manipulated_probability: 0.5
report:
  delay_ms: 0
export:
  filename_prefix: stamped
logging:
  level: warn
  format: json
"##,
    );

    let config = Config::from_file(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.upload.max_bytes, 2_097_152);
    assert_eq!(config.watermark.shadow_offset_x, 3);
    assert_eq!(config.watermark.shadow_offset_y, 2);
    assert_eq!(config.export.filename_prefix, "stamped");
    assert_eq!(config.logging.format, LogFormat::Json);

    let session = Session::from_config(&config).unwrap();
    assert_eq!(session.new_state().watermark.text, "Confidential");
}

#[test]
fn test_invalid_color_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "watermark:\n  fill_color: \"white\"\n");

    let config = Config::from_file(&path).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.contains("fill_color"), "unexpected error: {}", err);
}

#[test]
fn test_missing_font_file_fails_session_construction() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.watermark.font_path = Some(dir.path().join("no-such-font.ttf"));

    let err = Session::from_config(&config).err().unwrap();
    assert_eq!(err.kind(), "decode");
}

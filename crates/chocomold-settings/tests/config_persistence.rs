use chocomold_settings::{BaseStyle, Config, MoldParameters, SettingsError};
use std::path::PathBuf;
use tempfile::TempDir;

fn custom_config() -> Config {
    let mut config = Config::new();
    config.mold = MoldParameters {
        base_width: 30.0,
        base_length: 20.0,
        base_height: 2.0,
        pattern_margin: 1.5,
        engrave_depth: 0.6,
        user_scale: 1.2,
        invert: true,
        base_style: BaseStyle::Frustum { top_inset: 0.75 },
    };
    config.pattern.flatten_tolerance = 0.05;
    config.add_recent_file(PathBuf::from("/tmp/heart.svg"));
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let config = custom_config();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = custom_config();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded.mold, config.mold);
    assert_eq!(loaded.recent_files, config.recent_files);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[mold]\nengrave_depth = 0.5\ninvert = true\n").unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.mold.engrave_depth, 0.5);
    assert!(loaded.mold.invert);
    assert_eq!(loaded.mold.base_width, 10.0);
    assert_eq!(loaded.pattern.hard_shape_limit, 2000);
}

#[test]
fn test_invalid_file_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[mold]\nuser_scale = 4.0\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(_)));
}

#[test]
fn test_malformed_json_reports_json_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::JsonError(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::IoError(_)));
}

#[test]
fn test_default_path_ends_with_app_dir() {
    if let Ok(path) = Config::default_path() {
        assert!(path.ends_with("chocomold/config.toml"));
    }
}

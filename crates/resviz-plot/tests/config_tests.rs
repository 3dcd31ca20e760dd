//! Tests for plot configuration loading.

use resviz_common::CoordMode;
use resviz_plot::{Color, Colormap, PlotConfig};
use std::io::Write;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_yaml_config() {
    let yaml = r##"
coord_mode: absolute
figsize: [12, 10]
dpi: 72
max_panels: 6
panel_text_color: k
saturation_colormap:
  - { value: 0.0, color: "#0000ff" }
  - { value: 1.0, color: red }
"##;
    let config = PlotConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.coord_mode, CoordMode::Absolute);
    assert_eq!(config.figsize(), (12.0, 10.0));
    assert_eq!(config.max_panels, 6);
    assert_eq!(config.panel_text_color().unwrap(), Color::BLACK);
    let cmap = config.saturation_colormap().unwrap();
    assert_eq!(cmap.eval(0.0), Color::new(0, 0, 255, 255));
    assert_eq!(cmap.eval(1.0), Color::new(255, 0, 0, 255));
}

#[test]
fn test_defaults() {
    let config = PlotConfig::default();
    assert_eq!(config.coord_mode, CoordMode::Relative);
    assert_eq!(config.figsize(), (9.0, 7.0));
    assert_eq!(config.max_panels, 12);
    assert_eq!(config.frame_interval().as_millis(), 200);
    assert_eq!(config.panel_text_color().unwrap(), Color::WHITE);
    assert_eq!(config.saturation_colormap().unwrap(), Colormap::oil_water());
}

#[test]
fn test_coord_mode_by_prefix() {
    let config = PlotConfig::from_json(r#"{"coord_mode": "index"}"#).unwrap();
    assert_eq!(config.coord_mode, CoordMode::Index);
    assert_eq!("relative".parse::<CoordMode>().unwrap(), CoordMode::Relative);
    assert_eq!("abs".parse::<CoordMode>().unwrap(), CoordMode::Absolute);
    assert!("polar".parse::<CoordMode>().is_err());
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_values_rejected() {
    assert!(PlotConfig::from_json(r#"{"max_panels": 0}"#).is_err());
    assert!(PlotConfig::from_json(r#"{"figsize": [0, 7]}"#).is_err());
    assert!(PlotConfig::from_json(r#"{"panel_text_color": "chartreuse-ish"}"#).is_err());
    assert!(PlotConfig::from_json(r#"{"saturation_colormap": []}"#).is_err());
    assert!(PlotConfig::from_json("{not json").is_err());
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_from_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("plot.yaml");
    std::fs::File::create(&yaml_path)
        .unwrap()
        .write_all(b"dpi: 50\n")
        .unwrap();
    assert_eq!(PlotConfig::from_file(&yaml_path).unwrap().dpi, 50);

    let json_path = dir.path().join("plot.json");
    std::fs::write(&json_path, r#"{"frame_interval_ms": 40}"#).unwrap();
    assert_eq!(PlotConfig::from_file(&json_path).unwrap().frame_interval_ms, 40);

    let toml_path = dir.path().join("plot.toml");
    std::fs::write(&toml_path, "dpi = 50").unwrap();
    assert!(PlotConfig::from_file(&toml_path).is_err());

    assert!(PlotConfig::from_file(dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_env_overrides() {
    // Only test in this binary that touches RESVIZ_* variables
    std::env::set_var("RESVIZ_COORD_MODE", "index");
    std::env::set_var("RESVIZ_DPI", "not-a-number");
    std::env::set_var("RESVIZ_FRAME_INTERVAL_MS", "75");
    let config = PlotConfig::from_env();
    std::env::remove_var("RESVIZ_COORD_MODE");
    std::env::remove_var("RESVIZ_DPI");
    std::env::remove_var("RESVIZ_FRAME_INTERVAL_MS");

    assert_eq!(config.coord_mode, CoordMode::Index);
    assert_eq!(config.dpi, PlotConfig::default().dpi);
    assert_eq!(config.frame_interval_ms, 75);
}

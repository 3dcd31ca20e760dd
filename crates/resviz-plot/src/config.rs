//! Plot configuration.
//!
//! Replaces process-wide plotting state: every setting that used to be a
//! global (coordinate mode, default figure size, colormap) lives here and
//! is threaded explicitly through a [`crate::Plotter`].

use crate::color::{Color, Colormap};
use resviz_common::{CoordMode, ResvizError, ResvizResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Color stop for a configured colormap
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: String,
}

/// Plot configuration loaded from JSON or YAML
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Frame for axis extents and well positions
    pub coord_mode: CoordMode,
    /// Default figure size in inches `[width, height]`
    pub figsize: [f64; 2],
    /// Pixels per inch when rasterizing
    pub dpi: u32,
    /// Base font size in points
    pub font_size: f32,
    /// Panel cap for the panel grid composer
    pub max_panels: usize,
    /// Delay between animation frames
    pub frame_interval_ms: u64,
    /// Color of the index/key label drawn in each panel
    pub panel_text_color: String,
    /// Colormap for oil saturation maps
    pub saturation_colormap: Vec<ColorStop>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            coord_mode: CoordMode::Relative,
            figsize: [9.0, 7.0],
            dpi: 100,
            font_size: 13.0,
            max_panels: 12,
            frame_interval_ms: 200,
            panel_text_color: "w".to_string(),
            saturation_colormap: vec![
                ColorStop { value: 0.0, color: "#1d9e97".to_string() },
                ColorStop { value: 0.3, color: "#b2e0dc".to_string() },
                ColorStop { value: 1.0, color: "#f48974".to_string() },
            ],
        }
    }
}

impl PlotConfig {
    /// Load configuration from JSON string
    pub fn from_json(json_str: &str) -> ResvizResult<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml_str: &str) -> ResvizResult<Self> {
        let config: Self = serde_yaml::from_str(yaml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file, choosing the format by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ResvizResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            other => Err(ResvizError::invalid_config(format!(
                "unsupported config extension: {:?}",
                other
            ))),
        }
    }

    /// Defaults overridden from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override settings from `RESVIZ_*` environment variables.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("RESVIZ_COORD_MODE") {
            match val.parse() {
                Ok(mode) => self.coord_mode = mode,
                Err(e) => tracing::warn!(value = %val, error = %e, "ignoring RESVIZ_COORD_MODE"),
            }
        }

        if let Ok(val) = std::env::var("RESVIZ_DPI") {
            if let Ok(dpi) = val.parse() {
                self.dpi = dpi;
            } else {
                tracing::warn!(value = %val, "ignoring RESVIZ_DPI");
            }
        }

        if let Ok(val) = std::env::var("RESVIZ_FRAME_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                self.frame_interval_ms = ms;
            } else {
                tracing::warn!(value = %val, "ignoring RESVIZ_FRAME_INTERVAL_MS");
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ResvizResult<()> {
        if self.dpi == 0 {
            return Err(ResvizError::invalid_config("dpi must be positive"));
        }
        if self.max_panels == 0 {
            return Err(ResvizError::invalid_config("max_panels must be positive"));
        }
        if !(self.figsize[0] > 0.0 && self.figsize[1] > 0.0) {
            return Err(ResvizError::invalid_config(format!(
                "figsize must be positive, got {:?}",
                self.figsize
            )));
        }
        self.panel_text_color()?;
        self.saturation_colormap()?;
        Ok(())
    }

    /// Width/height ratio of the default figure.
    pub fn aspect_ratio(&self) -> f64 {
        self.figsize[0] / self.figsize[1]
    }

    pub fn figsize(&self) -> (f64, f64) {
        (self.figsize[0], self.figsize[1])
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn panel_text_color(&self) -> ResvizResult<Color> {
        parse_color(&self.panel_text_color)
    }

    /// The configured saturation colormap.
    pub fn saturation_colormap(&self) -> ResvizResult<Colormap> {
        if self.saturation_colormap.is_empty() {
            return Err(ResvizError::invalid_config("saturation_colormap has no stops"));
        }
        let stops = self
            .saturation_colormap
            .iter()
            .map(|s| Ok((s.value, parse_color(&s.color)?)))
            .collect::<ResvizResult<Vec<_>>>()?;
        Ok(Colormap::linear_segmented(stops))
    }
}

fn parse_color(spec: &str) -> ResvizResult<Color> {
    Color::parse(spec).ok_or_else(|| ResvizError::invalid_config(format!("unknown color '{}'", spec)))
}

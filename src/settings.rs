use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "whiteboard.json";
pub const SETTINGS_ENV: &str = "WHITEBOARD_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Initialise the logger at debug level. `RUST_LOG` is only honoured
    /// when this is set.
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default = "default_window_width")]
    pub window_width: i32,
    #[serde(default = "default_window_height")]
    pub window_height: i32,
    /// Width of the control panel on the left, in pixels.
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: f32,
    #[serde(default = "default_brush_color")]
    pub brush_color: [f32; 3],
    #[serde(default = "default_brush_size")]
    pub brush_size: f32,
    #[serde(default = "default_min_brush_size")]
    pub min_brush_size: f32,
    #[serde(default = "default_max_brush_size")]
    pub max_brush_size: f32,
    /// Eraser radius in world units.
    #[serde(default = "default_eraser_radius")]
    pub eraser_radius: f32,
    /// Pointer moves shorter than this (world units) are ignored.
    #[serde(default = "default_min_sample_distance")]
    pub min_sample_distance: f32,
    /// Longest gap between two discs of a stroke, in world units.
    #[serde(default = "default_interpolation_step")]
    pub interpolation_step: f32,
    /// evdev node of a pen tablet, e.g. `/dev/input/event15`. Mouse only
    /// when unset.
    #[serde(default)]
    pub stylus_device: Option<String>,
    #[serde(default = "default_pressure_max")]
    pub pressure_max: f32,
    /// Normalised pressure above which the pen counts as touching.
    #[serde(default = "default_pressure_threshold")]
    pub pressure_threshold: f32,
}

fn default_window_width() -> i32 {
    1280
}

fn default_window_height() -> i32 {
    600
}

fn default_sidebar_width() -> f32 {
    300.0
}

fn default_brush_color() -> [f32; 3] {
    [0.2, 0.3, 0.4]
}

fn default_brush_size() -> f32 {
    0.3
}

fn default_min_brush_size() -> f32 {
    0.15
}

fn default_max_brush_size() -> f32 {
    0.5
}

fn default_eraser_radius() -> f32 {
    0.1
}

fn default_min_sample_distance() -> f32 {
    0.01
}

fn default_interpolation_step() -> f32 {
    0.05
}

fn default_pressure_max() -> f32 {
    60000.0
}

fn default_pressure_threshold() -> f32 {
    0.1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
            sidebar_width: default_sidebar_width(),
            brush_color: default_brush_color(),
            brush_size: default_brush_size(),
            min_brush_size: default_min_brush_size(),
            max_brush_size: default_max_brush_size(),
            eraser_radius: default_eraser_radius(),
            min_sample_distance: default_min_sample_distance(),
            interpolation_step: default_interpolation_step(),
            stylus_device: None,
            pressure_max: default_pressure_max(),
            pressure_threshold: default_pressure_threshold(),
        }
    }
}

impl Settings {
    /// `$WHITEBOARD_SETTINGS` if set, otherwise `whiteboard.json`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// A missing file yields the defaults; a broken one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        Ok(settings.sanitized())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing settings {}", path.display()))?;
        Ok(())
    }

    pub fn brush_range(&self) -> (f32, f32) {
        let lo = self.min_brush_size.max(f32::EPSILON);
        (lo, self.max_brush_size.max(lo))
    }

    /// Pulls values that would break drawing back into a usable range.
    pub fn sanitized(mut self) -> Self {
        let (lo, hi) = self.brush_range();
        self.min_brush_size = lo;
        self.max_brush_size = hi;
        self.brush_size = self.brush_size.clamp(lo, hi);
        self.brush_color = self.brush_color.map(|c| c.clamp(0.0, 1.0));
        if self.min_sample_distance < 0.0 {
            self.min_sample_distance = default_min_sample_distance();
        }
        if self.interpolation_step <= 0.0 {
            self.interpolation_step = default_interpolation_step();
        }
        if self.eraser_radius <= 0.0 {
            self.eraser_radius = default_eraser_radius();
        }
        if self.pressure_max <= 0.0 {
            self.pressure_max = default_pressure_max();
        }
        self.sidebar_width = self.sidebar_width.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"brush_size": 0.4, "debug_logging": true}"#).unwrap();
        assert!(s.debug_logging);
        assert_eq!(s.brush_size, 0.4);
        assert_eq!(s.sidebar_width, 300.0);
        assert_eq!(s.stylus_device, None);
    }

    #[test]
    fn sanitize_clamps_brush_and_repairs_step() {
        let s = Settings {
            brush_size: 3.0,
            interpolation_step: 0.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.brush_size, 0.5);
        assert_eq!(s.interpolation_step, 0.05);
    }

    #[test]
    fn inverted_range_collapses() {
        let s = Settings {
            min_brush_size: 0.4,
            max_brush_size: 0.2,
            ..Settings::default()
        };
        assert_eq!(s.brush_range(), (0.4, 0.4));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let s = Settings {
            stylus_device: Some("/dev/input/event3".into()),
            ..Settings::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }
}

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::canvas::ToolMode;
use crate::geometry::{Rgb, Stroke};

pub const BOARD_FILE_VERSION: u32 = 1;

/// On-disk form of a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardFile {
    pub version: u32,
    pub strokes: Vec<Stroke>,
    pub color: Rgb,
    pub brush_size: f32,
    #[serde(default)]
    pub mode: ToolMode,
}

impl BoardFile {
    pub fn new(strokes: Vec<Stroke>, color: Rgb, brush_size: f32, mode: ToolMode) -> Self {
        Self {
            version: BOARD_FILE_VERSION,
            strokes,
            color,
            brush_size,
            mode,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("serialising board")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let file: BoardFile = serde_json::from_str(json).context("parsing board")?;
        if file.version != BOARD_FILE_VERSION {
            bail!("unsupported board version {}", file.version);
        }
        file.check_sizes()?;
        Ok(file)
    }

    /// Brush sizes and disc radii must be positive and finite.
    fn check_sizes(&self) -> anyhow::Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.brush_size) {
            bail!("invalid brush size {}", self.brush_size);
        }
        for (i, stroke) in self.strokes.iter().enumerate() {
            if !positive(stroke.brush_size()) {
                bail!("stroke {i}: invalid brush size {}", stroke.brush_size());
            }
            if let Some(disc) = stroke.discs().iter().find(|d| !positive(d.radius)) {
                bail!("stroke {i}: invalid disc radius {}", disc.radius);
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), strokes = self.strokes.len(), "board saved");
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let file = Self::from_json(&json).with_context(|| format!("loading {}", path.display()))?;
        info!(path = %path.display(), strokes = file.strokes.len(), "board loaded");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Disc;

    #[test]
    fn json_keeps_strokes_in_order() {
        let file = BoardFile::new(
            vec![
                Stroke::new(vec![Disc::new(0.0, 0.0, 0.2)], Rgb::new(1.0, 0.0, 0.0), 0.2),
                Stroke::new(vec![Disc::new(1.0, 1.0, 0.3)], Rgb::new(0.0, 0.0, 1.0), 0.3),
            ],
            Rgb::BLACK,
            0.25,
            ToolMode::Erase,
        );
        let back = BoardFile::from_json(&file.to_json().unwrap()).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn rejects_unknown_version() {
        let json = r#"{"version":99,"strokes":[],"color":{"r":0,"g":0,"b":0},"brush_size":0.1}"#;
        assert!(BoardFile::from_json(json).is_err());
    }

    #[test]
    fn out_of_range_color_is_clamped() {
        let json = r#"{"version":1,"strokes":[
            {"discs":[{"center_x":0,"center_y":0,"radius":0.1}],
             "color":{"r":4.0,"g":-0.5,"b":0.5},"brush_size":0.1}],
            "color":{"r":-1,"g":0.2,"b":9},"brush_size":0.1}"#;
        let file = BoardFile::from_json(json).unwrap();
        assert_eq!(file.color, Rgb::new(0.0, 0.2, 1.0));
        assert_eq!(file.strokes[0].color(), Rgb::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn rejects_non_positive_brush_size() {
        let json = r#"{"version":1,"strokes":[],"color":{"r":0,"g":0,"b":0},"brush_size":-0.1}"#;
        assert!(BoardFile::from_json(json).is_err());
        let json = r#"{"version":1,"strokes":[],"color":{"r":0,"g":0,"b":0},"brush_size":0}"#;
        assert!(BoardFile::from_json(json).is_err());
    }

    #[test]
    fn rejects_bad_stroke_sizes() {
        let negative_radius = r#"{"version":1,"strokes":[
            {"discs":[{"center_x":0,"center_y":0,"radius":-0.2}],
             "color":{"r":0,"g":0,"b":0},"brush_size":0.2}],
            "color":{"r":0,"g":0,"b":0},"brush_size":0.1}"#;
        assert!(BoardFile::from_json(negative_radius).is_err());

        let negative_brush = r#"{"version":1,"strokes":[
            {"discs":[{"center_x":0,"center_y":0,"radius":0.2}],
             "color":{"r":0,"g":0,"b":0},"brush_size":-0.2}],
            "color":{"r":0,"g":0,"b":0},"brush_size":0.1}"#;
        assert!(BoardFile::from_json(negative_brush).is_err());
    }

    #[test]
    fn mode_defaults_to_draw() {
        let json = r#"{"version":1,"strokes":[],"color":{"r":0,"g":0,"b":0},"brush_size":0.1}"#;
        assert_eq!(BoardFile::from_json(json).unwrap().mode, ToolMode::Draw);
    }
}

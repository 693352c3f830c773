use macroquad::{color::Color, math::{vec2, Vec2}};
use serde::{Deserialize, Serialize};

/// One circular paint stamp in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl Disc {
    pub fn new(center_x: f32, center_y: f32, radius: f32) -> Self {
        Self { center_x, center_y, radius }
    }

    pub fn at(center: Vec2, radius: f32) -> Self {
        Self::new(center.x, center.y, radius)
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.center_x, self.center_y)
    }
}

/// Stroke colour, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRgb")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    /// Channels outside `[0, 1]` are clamped.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn to_color(self, alpha: f32) -> Color {
        Color::new(self.r, self.g, self.b, alpha)
    }
}

/// Unchecked channels as read from a file.
#[derive(Deserialize)]
struct RawRgb {
    r: f32,
    g: f32,
    b: f32,
}

impl From<RawRgb> for Rgb {
    fn from(raw: RawRgb) -> Self {
        Rgb::new(raw.r, raw.g, raw.b)
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A finished gesture. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    discs: Vec<Disc>,
    color: Rgb,
    brush_size: f32,
}

impl Stroke {
    pub fn new(discs: Vec<Disc>, color: Rgb, brush_size: f32) -> Self {
        Self { discs, color, brush_size }
    }

    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }
}

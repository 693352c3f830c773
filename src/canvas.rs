use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::command::{Command, DrawCommand, EraseCommand};
use crate::geometry::{Disc, Rgb, Stroke};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Draw,
    Erase,
}

impl ToolMode {
    pub fn toggled(self) -> Self {
        match self {
            ToolMode::Draw => ToolMode::Erase,
            ToolMode::Erase => ToolMode::Draw,
        }
    }
}

pub const DEFAULT_BRUSH_SIZE: f32 = 0.05;

/// Committed strokes plus the gesture being drawn right now.
///
/// `in_progress` only holds discs while `drawing` is true.
#[derive(Debug, Clone)]
pub struct Canvas {
    strokes: Vec<Stroke>,
    in_progress: Vec<Disc>,
    color: Rgb,
    brush_size: f32,
    drawing: bool,
    mode: ToolMode,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
            in_progress: Vec::new(),
            color: Rgb::BLACK,
            brush_size: DEFAULT_BRUSH_SIZE,
            drawing: false,
            mode: ToolMode::Draw,
        }
    }

    /// Starts a gesture with one disc at `pos`. Ignored while already drawing.
    pub fn begin_stroke(&mut self, pos: Vec2) {
        if self.drawing {
            return;
        }
        self.drawing = true;
        self.in_progress.clear();
        self.in_progress.push(Disc::at(pos, self.brush_size));
    }

    pub fn extend_stroke(&mut self, pos: Vec2) {
        if !self.drawing {
            return;
        }
        self.in_progress.push(Disc::at(pos, self.brush_size));
    }

    /// Ends the gesture and hands back an unexecuted draw command for it.
    pub fn end_stroke(&mut self) -> Option<Command> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;
        if self.in_progress.is_empty() {
            return None;
        }
        let discs = std::mem::take(&mut self.in_progress);
        Some(DrawCommand::new(discs, self.color, self.brush_size).into())
    }

    /// Drops the current gesture without producing a command.
    pub fn cancel_stroke(&mut self) {
        self.drawing = false;
        self.in_progress.clear();
    }

    /// Builds an unexecuted erase command for strokes at `indices`.
    pub fn erase_strokes(&self, indices: impl IntoIterator<Item = usize>) -> Command {
        EraseCommand::new(indices).into()
    }

    /// Empties the stroke list. History is untouched; callers reset it too.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Swaps in a whole stroke list, e.g. from a loaded board.
    pub fn replace_strokes(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush_size = size;
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub(crate) fn strokes_mut(&mut self) -> &mut Vec<Stroke> {
        &mut self.strokes
    }

    pub fn in_progress_discs(&self) -> &[Disc] {
        &self.in_progress
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }
}

use std::collections::BTreeSet;

use macroquad::math::Vec2;
use tracing::debug;

use crate::canvas::{Canvas, ToolMode};
use crate::command::Command;
use crate::document::BoardFile;
use crate::geometry::Rgb;
use crate::history::History;
use crate::settings::Settings;
use crate::utility::{sample_segment, strokes_hit};

/// Pointer sampling and eraser parameters, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub min_distance: f32,
    pub step: f32,
    pub eraser_radius: f32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            min_distance: 0.01,
            step: 0.05,
            eraser_radius: 0.1,
        }
    }
}

impl From<&Settings> for Sampling {
    fn from(settings: &Settings) -> Self {
        Self {
            min_distance: settings.min_sample_distance,
            step: settings.interpolation_step,
            eraser_radius: settings.eraser_radius,
        }
    }
}

/// Canvas, history and the pointer gesture in flight, driven by input events.
#[derive(Debug, Default)]
pub struct Whiteboard {
    canvas: Canvas,
    history: History,
    sampling: Sampling,
    last_point: Option<Vec2>,
    erasing: bool,
    // indices into the stroke list as it stands during the gesture
    marked: BTreeSet<usize>,
}

impl Whiteboard {
    pub fn new(sampling: Sampling) -> Self {
        Self {
            sampling,
            ..Default::default()
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut board = Self::new(Sampling::from(settings));
        board.canvas.set_color(Rgb::from(settings.brush_color));
        board.canvas.set_brush_size(settings.brush_size);
        board
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        match self.canvas.mode() {
            ToolMode::Draw => {
                if self.canvas.is_drawing() {
                    return;
                }
                self.canvas.begin_stroke(pos);
                self.last_point = Some(pos);
            }
            ToolMode::Erase => {
                self.erasing = true;
                self.marked.clear();
                self.mark_hits(pos);
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.canvas.is_drawing() {
            let Some(last) = self.last_point else {
                return;
            };
            let points = sample_segment(last, pos, self.sampling.min_distance, self.sampling.step);
            if points.is_empty() {
                return;
            }
            for p in points {
                self.canvas.extend_stroke(p);
            }
            self.last_point = Some(pos);
        } else if self.erasing {
            self.mark_hits(pos);
        }
    }

    /// Finishes the gesture. Returns true when a command was executed and
    /// recorded.
    pub fn pointer_up(&mut self) -> bool {
        self.last_point = None;
        if self.canvas.is_drawing() {
            return match self.canvas.end_stroke() {
                Some(command) => {
                    self.commit(command);
                    true
                }
                None => false,
            };
        }
        if self.erasing {
            self.erasing = false;
            let marked = std::mem::take(&mut self.marked);
            if marked.is_empty() {
                return false;
            }
            let command = self.canvas.erase_strokes(marked);
            self.commit(command);
            return true;
        }
        false
    }

    fn commit(&mut self, mut command: Command) {
        command.execute(&mut self.canvas);
        self.history.record(command);
    }

    fn mark_hits(&mut self, pos: Vec2) {
        let hits = strokes_hit(self.canvas.strokes(), pos, self.sampling.eraser_radius);
        self.marked.extend(hits);
    }

    fn cancel_gesture(&mut self) {
        self.canvas.cancel_stroke();
        self.last_point = None;
        self.erasing = false;
        self.marked.clear();
    }

    pub fn undo(&mut self) -> bool {
        if self.erasing {
            self.cancel_gesture();
        }
        self.history.undo(&mut self.canvas)
    }

    pub fn redo(&mut self) -> bool {
        if self.erasing {
            self.cancel_gesture();
        }
        self.history.redo(&mut self.canvas)
    }

    /// Wipes the board together with its history.
    pub fn clear(&mut self) {
        self.cancel_gesture();
        self.canvas.clear();
        self.history.reset();
        debug!("board cleared");
    }

    /// Switching tools abandons whatever gesture is in flight.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode != self.canvas.mode() {
            self.cancel_gesture();
            self.canvas.set_mode(mode);
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.canvas.mode().toggled());
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.canvas.set_color(color);
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.canvas.set_brush_size(size);
    }

    pub fn set_sampling(&mut self, sampling: Sampling) {
        self.sampling = sampling;
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    pub fn marked(&self) -> impl Iterator<Item = usize> + '_ {
        self.marked.iter().copied()
    }

    /// Snapshot of the board for saving.
    pub fn board_file(&self) -> BoardFile {
        BoardFile::new(
            self.canvas.strokes().to_vec(),
            self.canvas.color(),
            self.canvas.brush_size(),
            self.canvas.mode(),
        )
    }

    /// Replaces the board with a loaded one. The undo chain does not survive.
    pub fn load_board(&mut self, file: BoardFile) {
        self.cancel_gesture();
        self.history.reset();
        self.canvas.replace_strokes(file.strokes);
        self.canvas.set_color(file.color);
        self.canvas.set_brush_size(file.brush_size);
        self.canvas.set_mode(file.mode);
    }
}

//! Freehand whiteboard: strokes made of discs, an eraser, and undo/redo.
//!
//! The edit engine (`canvas`, `command`, `history`, `whiteboard`) has no
//! window or GPU dependency and can be driven directly from tests. The
//! remaining modules are the pieces the macroquad front end plugs together.

pub mod canvas;
pub mod command;
pub mod document;
pub mod export;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod mesh;
pub mod read_stylus;
pub mod settings;
pub mod utility;
pub mod viewport;
pub mod whiteboard;

pub use canvas::{Canvas, ToolMode};
pub use command::{Command, DrawCommand, EraseCommand};
pub use geometry::{Disc, Rgb, Stroke};
pub use history::History;
pub use whiteboard::{Sampling, Whiteboard};

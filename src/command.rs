use tracing::{debug, trace};

use crate::canvas::Canvas;
use crate::geometry::{Disc, Rgb, Stroke};

/// A reversible edit of the canvas stroke list.
///
/// Commands never hold on to the canvas. It is handed in on every
/// `execute`/`undo`, so a command only owns its own captured data.
#[derive(Debug, Clone)]
pub enum Command {
    Draw(DrawCommand),
    Erase(EraseCommand),
}

impl Command {
    pub fn execute(&mut self, canvas: &mut Canvas) {
        match self {
            Command::Draw(cmd) => cmd.execute(canvas),
            Command::Erase(cmd) => cmd.execute(canvas),
        }
    }

    pub fn undo(&mut self, canvas: &mut Canvas) {
        match self {
            Command::Draw(cmd) => cmd.undo(canvas),
            Command::Erase(cmd) => cmd.undo(canvas),
        }
    }
}

impl From<DrawCommand> for Command {
    fn from(cmd: DrawCommand) -> Self {
        Command::Draw(cmd)
    }
}

impl From<EraseCommand> for Command {
    fn from(cmd: EraseCommand) -> Self {
        Command::Erase(cmd)
    }
}

/// Commits one finished stroke.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    discs: Vec<Disc>,
    color: Rgb,
    brush_size: f32,
    stroke_index: Option<usize>,
}

impl DrawCommand {
    pub fn new(discs: Vec<Disc>, color: Rgb, brush_size: f32) -> Self {
        Self {
            discs,
            color,
            brush_size,
            stroke_index: None,
        }
    }

    /// Index the stroke landed at on the last `execute`.
    pub fn stroke_index(&self) -> Option<usize> {
        self.stroke_index
    }

    /// Appends a new stroke. Calling this twice without an `undo` in between
    /// appends a duplicate; the history never does that.
    pub fn execute(&mut self, canvas: &mut Canvas) {
        let strokes = canvas.strokes_mut();
        strokes.push(Stroke::new(self.discs.clone(), self.color, self.brush_size));
        self.stroke_index = Some(strokes.len() - 1);
        debug!(index = strokes.len() - 1, discs = self.discs.len(), "draw executed");
    }

    /// Removes the stroke at the recorded index. A stale index (the list
    /// shrank behind our back) is silently ignored.
    pub fn undo(&mut self, canvas: &mut Canvas) {
        let strokes = canvas.strokes_mut();
        match self.stroke_index {
            Some(i) if i < strokes.len() => {
                strokes.remove(i);
                debug!(index = i, remaining = strokes.len(), "draw undone");
            }
            _ => debug!(index = ?self.stroke_index, "draw undo skipped, stale index"),
        }
    }
}

/// Removes a batch of strokes and puts them back on undo.
///
/// Indices refer to the stroke list as it is when the command is built.
/// They are kept sorted high to low so every removal leaves the positions of
/// the not yet visited (lower) indices untouched. Repeated indices are
/// dropped and indices out of range at execute time are skipped, so an erase
/// may remove fewer strokes than it was given.
#[derive(Debug, Clone)]
pub struct EraseCommand {
    indices: Vec<usize>,
    // (original index, stroke), highest index first
    removed: Vec<(usize, Stroke)>,
    executed: bool,
}

impl EraseCommand {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        Self {
            indices,
            removed: Vec::new(),
            executed: false,
        }
    }

    /// Target indices, descending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Number of strokes taken out by the last `execute`.
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn execute(&mut self, canvas: &mut Canvas) {
        if self.executed {
            return;
        }
        let strokes = canvas.strokes_mut();
        self.removed.clear();
        for &index in &self.indices {
            if index < strokes.len() {
                let stroke = strokes.remove(index);
                self.removed.push((index, stroke));
            } else {
                trace!(index, len = strokes.len(), "erase index out of range, skipped");
            }
        }
        self.executed = true;
        debug!(removed = self.removed.len(), requested = self.indices.len(), "erase executed");
    }

    /// Reinserts in ascending index order so each stroke lands at its
    /// original position. If the list has shrunk below an index the stroke
    /// is appended instead.
    pub fn undo(&mut self, canvas: &mut Canvas) {
        if !self.executed {
            return;
        }
        let strokes = canvas.strokes_mut();
        for (index, stroke) in self.removed.iter().rev() {
            if *index <= strokes.len() {
                strokes.insert(*index, stroke.clone());
            } else {
                strokes.push(stroke.clone());
            }
        }
        self.executed = false;
        debug!(restored = self.removed.len(), len = strokes.len(), "erase undone");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(tag: f32) -> Stroke {
        Stroke::new(vec![Disc::new(tag, tag, 0.1)], Rgb::BLACK, 0.1)
    }

    fn canvas_with(n: usize) -> (Canvas, Vec<Stroke>) {
        let mut canvas = Canvas::new();
        let strokes: Vec<Stroke> = (0..n).map(|i| stroke(i as f32)).collect();
        canvas.strokes_mut().extend(strokes.iter().cloned());
        (canvas, strokes)
    }

    #[test]
    fn draw_execute_then_undo_restores_list() {
        let (mut canvas, before) = canvas_with(2);
        let mut cmd = DrawCommand::new(vec![Disc::new(0.0, 0.0, 0.2)], Rgb::new(1.0, 0.0, 0.0), 0.2);
        cmd.execute(&mut canvas);
        assert_eq!(canvas.strokes().len(), 3);
        assert_eq!(cmd.stroke_index(), Some(2));
        assert_eq!(canvas.strokes()[2].color(), Rgb::new(1.0, 0.0, 0.0));

        cmd.undo(&mut canvas);
        assert_eq!(canvas.strokes(), &before[..]);
    }

    #[test]
    fn draw_undo_with_stale_index_is_noop() {
        let (mut canvas, _) = canvas_with(1);
        let mut cmd = DrawCommand::new(vec![Disc::new(0.0, 0.0, 0.2)], Rgb::BLACK, 0.2);
        cmd.execute(&mut canvas);
        canvas.clear();
        cmd.undo(&mut canvas);
        assert!(canvas.strokes().is_empty());
    }

    #[test]
    fn draw_undo_before_execute_is_noop() {
        let (mut canvas, before) = canvas_with(2);
        let mut cmd = DrawCommand::new(vec![Disc::new(0.0, 0.0, 0.2)], Rgb::BLACK, 0.2);
        cmd.undo(&mut canvas);
        assert_eq!(canvas.strokes(), &before[..]);
    }

    #[test]
    fn erase_sorts_descending_and_dedups() {
        let cmd = EraseCommand::new([1, 4, 1, 0]);
        assert_eq!(cmd.indices(), &[4, 1, 0]);
    }

    #[test]
    fn erase_first_and_last_of_three() {
        let (mut canvas, before) = canvas_with(3);
        let mut cmd = EraseCommand::new([0, 2]);
        cmd.execute(&mut canvas);
        assert_eq!(canvas.strokes(), &[before[1].clone()][..]);

        cmd.undo(&mut canvas);
        assert_eq!(canvas.strokes(), &before[..]);
    }

    #[test]
    fn erase_round_trip_for_many_index_sets() {
        let sets: &[&[usize]] = &[&[0], &[5], &[2, 3], &[0, 1, 2, 3, 4, 5], &[5, 0, 3], &[1, 3, 5]];
        for set in sets {
            let (mut canvas, before) = canvas_with(6);
            let mut cmd = EraseCommand::new(set.iter().copied());
            cmd.execute(&mut canvas);
            assert_eq!(canvas.strokes().len(), 6 - set.len(), "set {:?}", set);
            for i in set.iter() {
                assert!(!canvas.strokes().contains(&before[*i]), "set {:?}", set);
            }
            cmd.undo(&mut canvas);
            assert_eq!(canvas.strokes(), &before[..], "set {:?}", set);
        }
    }

    #[test]
    fn erase_skips_out_of_range_index() {
        let (mut canvas, before) = canvas_with(3);
        let mut cmd = EraseCommand::new([1, 3]);
        cmd.execute(&mut canvas);
        assert_eq!(cmd.removed_count(), 1);
        assert_eq!(canvas.strokes(), &[before[0].clone(), before[2].clone()][..]);

        cmd.undo(&mut canvas);
        assert_eq!(canvas.strokes(), &before[..]);
    }

    #[test]
    fn erase_execute_is_single_shot() {
        let (mut canvas, before) = canvas_with(3);
        let mut cmd = EraseCommand::new([0]);
        cmd.execute(&mut canvas);
        cmd.execute(&mut canvas);
        assert_eq!(canvas.strokes(), &before[1..]);
        assert!(cmd.is_executed());
    }

    #[test]
    fn erase_undo_without_execute_is_noop() {
        let (mut canvas, before) = canvas_with(3);
        let mut cmd = EraseCommand::new([0, 1]);
        cmd.undo(&mut canvas);
        assert_eq!(canvas.strokes(), &before[..]);
    }

    #[test]
    fn erase_can_be_replayed_after_undo() {
        let (mut canvas, _) = canvas_with(4);
        let mut cmd = EraseCommand::new([1, 2]);
        cmd.execute(&mut canvas);
        let after_first = canvas.strokes().to_vec();
        cmd.undo(&mut canvas);
        cmd.execute(&mut canvas);
        assert_eq!(canvas.strokes(), &after_first[..]);
    }

    #[test]
    fn erase_undo_appends_when_list_shrank() {
        let (mut canvas, before) = canvas_with(3);
        let mut cmd = EraseCommand::new([2]);
        cmd.execute(&mut canvas);
        canvas.clear();
        cmd.undo(&mut canvas);
        assert_eq!(canvas.strokes(), &[before[2].clone()][..]);
    }

    #[test]
    fn command_enum_dispatches() {
        let (mut canvas, before) = canvas_with(2);
        let mut cmd: Command = EraseCommand::new([0]).into();
        cmd.execute(&mut canvas);
        assert_eq!(canvas.strokes().len(), 1);
        cmd.undo(&mut canvas);
        assert_eq!(canvas.strokes(), &before[..]);
    }
}

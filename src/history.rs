use tracing::debug;

use crate::canvas::Canvas;
use crate::command::Command;

/// Undo and redo stacks, most recent command last.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
}

impl History {
    pub fn new() -> History {
        History {
            undo_stack: vec![],
            redo_stack: vec![],
        }
    }

    /// Pushes an already executed command. Any new action drops the redo chain.
    pub fn record(&mut self, command: Command) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
        debug!(undo = self.undo_stack.len(), "command recorded");
    }

    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(mut command) = self.undo_stack.pop() else {
            return false;
        };
        command.undo(canvas);
        self.redo_stack.push(command);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undo");
        true
    }

    /// Returns false when there was nothing to redo.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        command.execute(canvas);
        self.undo_stack.push(command);
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redo");
        true
    }

    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        debug!("history reset");
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

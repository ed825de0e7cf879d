//! Undo/redo snapshots for the source buffer.
//!
//! Ropes share structure on clone, so a snapshot per edit is cheap.

use ropey::Rope;

use super::buffer::Cursor;

/// Default cap on remembered undo steps.
const MAX_STEPS: usize = 100;

#[derive(Debug, Clone)]
struct Snapshot {
    rope: Rope,
    cursor: Cursor,
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone)]
pub(super) struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    max_steps: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_steps(MAX_STEPS)
    }
}

impl History {
    pub(super) const fn with_max_steps(max_steps: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_steps,
        }
    }

    /// Remember the state before an edit. Any redo branch is discarded.
    pub(super) fn record(&mut self, rope: &Rope, cursor: Cursor) {
        self.redo.clear();
        self.undo.push(Snapshot {
            rope: rope.clone(),
            cursor,
        });
        if self.undo.len() > self.max_steps {
            self.undo.remove(0);
        }
    }

    /// Step back, stashing the current state for redo.
    pub(super) fn undo(&mut self, rope: &Rope, cursor: Cursor) -> Option<(Rope, Cursor)> {
        let prev = self.undo.pop()?;
        self.redo.push(Snapshot {
            rope: rope.clone(),
            cursor,
        });
        Some((prev.rope, prev.cursor))
    }

    /// Step forward, stashing the current state for undo.
    pub(super) fn redo(&mut self, rope: &Rope, cursor: Cursor) -> Option<(Rope, Cursor)> {
        let next = self.redo.pop()?;
        self.undo.push(Snapshot {
            rope: rope.clone(),
            cursor,
        });
        Some((next.rope, next.cursor))
    }

    pub(super) fn undo_len(&self) -> usize {
        self.undo.len()
    }
}

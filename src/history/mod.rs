//! Linear undo history.
//!
//! History is a flat `Vec<GameState>` addressed by index, with a cursor
//! pointing at the snapshot on screen. Snapshots share their piles through
//! `im`, so keeping every state of a game costs little more than the cards
//! that actually moved.
//!
//! ## Semantics
//!
//! - `commit(from, next)` truncates everything after `from` and appends
//!   `next`. Undoing and then moving prunes the redo branch; there is no tree.
//! - `undo` / `redo` move the cursor inside the existing states only.
//! - `replace` rewrites one snapshot in place; clock ticks go through it.
//!
//! The elapsed time always follows the cursor forward: undoing to an earlier
//! snapshot stamps it with the current duration so the clock never rewinds.

use tracing::trace;

use crate::core::error::{EngineError, Result};
use crate::core::state::GameState;

/// Ordered snapshots plus a cursor.
///
/// Never empty; the cursor is always in `[0, len - 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    states: Vec<GameState>,
    cursor: usize,
}

impl History {
    /// Start a history at `initial`.
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        Self {
            states: vec![initial],
            cursor: 0,
        }
    }

    /// Rebuild a history from stored snapshots.
    pub fn from_parts(states: Vec<GameState>, cursor: usize) -> Result<Self> {
        if states.is_empty() {
            return Err(EngineError::CorruptSnapshot("history is empty".to_string()));
        }
        if cursor >= states.len() {
            return Err(EngineError::CursorOutOfRange {
                index: cursor,
                len: states.len(),
            });
        }
        Ok(Self { states, cursor })
    }

    /// The snapshot at the cursor.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &GameState {
        &self.states[self.cursor]
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never true for a constructed history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All snapshots, oldest first.
    #[must_use]
    pub fn states(&self) -> &[GameState] {
        &self.states
    }

    /// Snapshot by index.
    pub fn get(&self, index: usize) -> Result<&GameState> {
        self.states.get(index).ok_or(EngineError::CursorOutOfRange {
            index,
            len: self.states.len(),
        })
    }

    /// Elapsed seconds at the cursor.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.current().duration
    }

    /// Drop every snapshot after `from`, append `next`, and move the cursor
    /// onto it. Returns the new cursor (`from + 1`).
    pub fn commit(&mut self, from: usize, next: GameState) -> Result<usize> {
        self.get(from)?;
        let pruned = self.states.len() - (from + 1);
        if pruned > 0 {
            trace!(pruned, "discarding redo states");
        }
        self.states.truncate(from + 1);
        self.states.push(next);
        self.cursor = from + 1;
        Ok(self.cursor)
    }

    /// Overwrite the snapshot at `index` without touching any other.
    pub fn replace(&mut self, index: usize, state: GameState) -> Result<()> {
        let len = self.states.len();
        let slot = self
            .states
            .get_mut(index)
            .ok_or(EngineError::CursorOutOfRange { index, len })?;
        *slot = state;
        Ok(())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.states.len()
    }

    /// Step back one snapshot. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.move_cursor(self.cursor - 1);
        true
    }

    /// Step forward into a previously undone snapshot. Returns false when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.move_cursor(self.cursor + 1);
        true
    }

    fn move_cursor(&mut self, to: usize) {
        let elapsed = self.duration();
        self.cursor = to;
        let state = &mut self.states[to];
        state.duration = state.duration.max(elapsed);
        trace!(cursor = to, duration = state.duration, "cursor moved");
    }
}

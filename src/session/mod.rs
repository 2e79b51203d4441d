//! Game session: rules, history, clock and sinks behind one facade.
//!
//! ## Lifecycle
//!
//! ```text
//! new_game ──► Idle ──first move──► Running ──all foundations full──► Stopped
//!                                      ▲  │
//!                                      └──┘ tick (+1s), undo, redo
//! ```
//!
//! - Every player input is resolved against the cursor snapshot, applied,
//!   committed, and handed to the [`SnapshotSink`].
//! - Rejected moves are committed as `InvalidMove` no-ops.
//! - The clock starts on the first committed move and stops at game over.
//! - Once the game is won, moves, ticks, undo and redo are ignored and the
//!   [`StatsSink`] has been told exactly once.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, instrument};

use crate::core::action::Action;
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::state::GameState;
use crate::history::History;
use crate::persist::{restore_game, SnapshotSink};
use crate::rules::{
    resolve_action, resolve_auto_foundation, resolve_move, resolve_stock_click, GameResult,
    Klondike, RulesEngine, Selection,
};
use crate::stats::{GameRecord, StatsSink};
use crate::zones::PileId;

/// Elapsed-time clock state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clock {
    /// No move made yet.
    #[default]
    Idle,
    /// Ticks advance the duration.
    Running,
    /// Game over; ticks are ignored.
    Stopped,
}

/// What happened to one player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game is already over; nothing was recorded.
    Ignored,
    /// The move was illegal; a no-op snapshot was recorded.
    Rejected,
    /// The action was applied and committed.
    Applied(Action),
    /// The action was applied and finished the game.
    Won(GameResult),
}

impl MoveOutcome {
    /// Whether the table changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_) | MoveOutcome::Won(_))
    }
}

/// One game of Klondike in progress.
pub struct GameSession<P: SnapshotSink = (), S: StatsSink = ()> {
    rules: Klondike,
    history: History,
    clock: Clock,
    result: Option<GameResult>,
    snapshots: P,
    stats: S,
}

impl GameSession {
    /// Deal a new game with no sinks attached.
    #[must_use]
    #[instrument(skip_all, fields(draw_mode = %config.draw_mode))]
    pub fn new_game(config: GameConfig) -> Self {
        let rules = Klondike::new(config);
        let (_, history) = rules.new_game();
        Self {
            rules,
            history,
            clock: Clock::Idle,
            result: None,
            snapshots: (),
            stats: (),
        }
    }
}

impl<P: SnapshotSink, S: StatsSink> GameSession<P, S> {
    /// Deal a new game, report it to `stats`, and save the opening state.
    #[instrument(skip_all, fields(draw_mode = %config.draw_mode))]
    pub fn with_sinks(config: GameConfig, snapshots: P, mut stats: S) -> Result<Self> {
        let rules = Klondike::new(config);
        let (state, history) = rules.new_game();
        stats.record_started(state.draw_mode);

        let mut session = Self {
            rules,
            history,
            clock: Clock::Idle,
            result: None,
            snapshots,
            stats,
        };
        session.save()?;
        Ok(session)
    }

    /// Resume a saved game.
    ///
    /// The draw mode of the save wins over `config`. A resumed game keeps its
    /// clock idle until the next move; a save of a finished game comes back
    /// already stopped, without reporting the win again.
    #[instrument(skip_all)]
    pub fn restore(json: &str, config: GameConfig, snapshots: P, stats: S) -> Result<Self> {
        let restored = restore_game(json)?;
        let draw_mode = restored.history.current().draw_mode;
        let rules = Klondike::new(GameConfig { draw_mode, ..config });

        let result = rules.is_terminal(restored.history.current());
        let clock = if result.is_some() {
            Clock::Stopped
        } else {
            Clock::Idle
        };
        debug!(cursor = restored.cursor, ?clock, "session restored");

        Ok(Self {
            rules,
            history: restored.history,
            clock,
            result,
            snapshots,
            stats,
        })
    }

    /// Abandon the current game and deal a new one.
    #[instrument(skip(self, config), fields(draw_mode = %config.draw_mode))]
    pub fn restart(&mut self, config: GameConfig) -> Result<()> {
        self.rules = Klondike::new(config);
        let (state, history) = self.rules.new_game();
        self.stats.record_started(state.draw_mode);
        self.history = history;
        self.clock = Clock::Idle;
        self.result = None;
        self.save()
    }

    // === Accessors ===

    /// The snapshot on screen.
    #[must_use]
    pub fn state(&self) -> &GameState {
        self.history.current()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn rules(&self) -> &Klondike {
        &self.rules
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Result of the finished game.
    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn snapshots(&self) -> &P {
        &self.snapshots
    }

    #[must_use]
    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Every pile the selection could be dropped on.
    #[must_use]
    pub fn legal_destinations(&self, selection: Selection) -> SmallVec<[PileId; 11]> {
        self.rules.legal_destinations(self.state(), selection)
    }

    // === Player input ===

    /// Drop `selection` on `destination`.
    #[instrument(skip(self))]
    pub fn play(&mut self, selection: Selection, destination: PileId) -> Result<MoveOutcome> {
        if self.is_over() {
            return Ok(MoveOutcome::Ignored);
        }
        let action = resolve_move(self.state(), selection, destination);
        self.commit(action)
    }

    /// Draw, or turn the waste over when the stock is empty.
    #[instrument(skip(self))]
    pub fn click_stock(&mut self) -> Result<MoveOutcome> {
        if self.is_over() {
            return Ok(MoveOutcome::Ignored);
        }
        let action = resolve_stock_click(self.state());
        self.commit(action)
    }

    /// Send the selected card to the first foundation that takes it.
    #[instrument(skip(self))]
    pub fn auto_foundation(&mut self, selection: Selection) -> Result<MoveOutcome> {
        if self.is_over() {
            return Ok(MoveOutcome::Ignored);
        }
        let action = resolve_auto_foundation(self.state(), selection);
        self.commit(action)
    }

    /// Apply an action built elsewhere (for example from a wire name).
    ///
    /// The action is checked against the current state first; one that is
    /// not legal here is recorded as `InvalidMove`. A clock tick is handled
    /// like [`tick`](Self::tick) and ignored while the clock is not running.
    #[instrument(skip(self))]
    pub fn apply(&mut self, action: Action) -> Result<MoveOutcome> {
        if self.is_over() {
            return Ok(MoveOutcome::Ignored);
        }
        if action == Action::UpdateDuration {
            if self.clock != Clock::Running {
                return Ok(MoveOutcome::Ignored);
            }
            self.tick()?;
            return Ok(MoveOutcome::Applied(action));
        }
        let action = resolve_action(self.state(), action);
        self.commit(action)
    }

    /// Advance the clock by one second if it is running. Returns the
    /// duration afterwards.
    pub fn tick(&mut self) -> Result<u64> {
        if self.clock != Clock::Running {
            return Ok(self.history.duration());
        }
        let cursor = self.history.cursor();
        self.rules
            .apply_move(&mut self.history, cursor, &Action::UpdateDuration)?;
        self.save()?;
        Ok(self.history.duration())
    }

    /// Step back one snapshot. Returns false if there was nothing to undo.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<bool> {
        if self.is_over() || !self.history.undo() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Step forward again after an undo.
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> Result<bool> {
        if self.is_over() || !self.history.redo() {
            return Ok(false);
        }
        self.save()?;
        // Redoing into the winning move finishes the game.
        self.check_game_over();
        Ok(true)
    }

    // === Internals ===

    fn commit(&mut self, action: Action) -> Result<MoveOutcome> {
        let cursor = self.history.cursor();
        self.rules.apply_move(&mut self.history, cursor, &action)?;
        debug!(
            action = %action.kind(),
            cursor = self.history.cursor(),
            score = self.state().score,
            "committed"
        );

        if action == Action::InvalidMove {
            self.save()?;
            return Ok(MoveOutcome::Rejected);
        }
        if self.clock == Clock::Idle && action.is_move() {
            self.clock = Clock::Running;
        }
        self.save()?;

        Ok(match self.check_game_over() {
            Some(result) => MoveOutcome::Won(result),
            None => MoveOutcome::Applied(action),
        })
    }

    fn check_game_over(&mut self) -> Option<GameResult> {
        let result = self.rules.is_terminal(self.state())?;
        self.clock = Clock::Stopped;
        info!(
            score = result.score,
            final_score = result.final_score,
            duration = result.duration,
            "game won"
        );
        self.stats.record_win(&GameRecord::now(&result));
        self.result = Some(result.clone());
        Some(result)
    }

    fn save(&mut self) -> Result<()> {
        let history = &self.history;
        self.snapshots
            .save(history.states(), history.cursor(), history.duration())
    }
}

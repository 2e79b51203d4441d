//! # klondike-engine
//!
//! Rules and state engine for Klondike Solitaire.
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not mutation**: every transition produces a new
//!    `GameState`. Piles are `im` persistent vectors, so a snapshot shares
//!    everything it did not change with its predecessor.
//!
//! 2. **Resolve, then apply**: the resolver decides whether a player's move is
//!    legal and builds an `Action`; the transition engine applies it without
//!    second-guessing. Illegal moves become `Action::InvalidMove`, never
//!    errors.
//!
//! 3. **Cards by identity**: actions name cards by `CardId`, never by pile
//!    position.
//!
//! ## Architecture
//!
//! - **Linear history**: an arena of snapshots plus a cursor. Undo moves the
//!   cursor; committing after an undo prunes the redo branch.
//!
//! - **Collaborators as traits**: persistence (`SnapshotSink`) and statistics
//!   (`StatsSink`) are plugged into `GameSession`; the engine itself does no
//!   I/O.
//!
//! ## Modules
//!
//! - `core`: state, actions, RNG, configuration, errors
//! - `cards`: card model, deck construction, dealing
//! - `zones`: piles and pile identifiers
//! - `rules`: validation, move resolution, transitions, scoring
//! - `history`: undo/redo snapshot history
//! - `persist`: versioned save format and snapshot sinks
//! - `stats`: per-draw-mode statistics
//! - `session`: the facade a UI drives

pub mod core;
pub mod zones;
pub mod cards;
pub mod rules;
pub mod history;
pub mod persist;
pub mod stats;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionKind, MovePayload,
    DrawMode, GameConfig, ScoringRules,
    EngineError, Result,
    GameRng,
    GameState,
};

pub use crate::zones::{Pile, PileExt, PileId};

pub use crate::cards::{Card, CardId, Color, Rank, Suit};

pub use crate::rules::{GameResult, Klondike, RulesEngine, Selection};

pub use crate::history::History;

pub use crate::persist::{restore_game, MemorySink, Restored, SavedGame, SnapshotSink};

pub use crate::stats::{GameRecord, ModeStats, ScoreBoard, StatsSink};

pub use crate::session::{Clock, GameSession, MoveOutcome};

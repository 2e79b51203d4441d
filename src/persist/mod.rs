//! Saved-game schema and snapshot sinks.
//!
//! ## Schema
//!
//! The current save is a versioned object:
//!
//! ```json
//! { "version": 1, "gameState": [ ... ], "historyIndex": 4, "duration": 93 }
//! ```
//!
//! Older saves come in three other shapes, all still accepted by
//! [`restore_game`]:
//!
//! - a bare `GameState`
//! - an array of `GameState`
//! - `{ gameState, historyIndex, duration }` without a version
//!
//! Every shape is normalized into a `History`, and every restored snapshot is
//! checked against the 52-card invariant before it is handed out.
//!
//! ## Sinks
//!
//! The session calls a [`SnapshotSink`] after every committed change. Writes
//! overwrite: only the last save matters.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{EngineError, Result};
use crate::core::state::GameState;
use crate::history::History;

/// Version written by [`SavedGame::from_history`].
pub const SCHEMA_VERSION: u32 = 1;

/// Current save format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub version: u32,

    /// Every snapshot, oldest first.
    pub game_state: Vec<GameState>,

    /// Cursor into `game_state`.
    pub history_index: usize,

    /// Elapsed seconds.
    pub duration: u64,
}

impl SavedGame {
    /// Capture a history.
    #[must_use]
    pub fn from_history(history: &History) -> Self {
        Self::from_parts(history.states(), history.cursor(), history.duration())
    }

    /// Capture raw history parts.
    #[must_use]
    pub fn from_parts(states: &[GameState], cursor: usize, duration: u64) -> Self {
        Self {
            version: SCHEMA_VERSION,
            game_state: states.to_vec(),
            history_index: cursor,
            duration,
        }
    }
}

/// A history rebuilt from a save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Restored {
    pub history: History,

    /// Cursor after clamping; equal to `history.cursor()`.
    pub cursor: usize,

    pub duration: u64,
}

/// `gameState` in unversioned saves held either one state or the full list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<GameState>),
    One(Box<GameState>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Unversioned {
    game_state: OneOrMany,
    #[serde(default)]
    history_index: Option<usize>,
    #[serde(default)]
    duration: Option<u64>,
}

/// Every save shape ever written, newest first.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotShape {
    Versioned(SavedGame),
    Unversioned(Unversioned),
    Sequence(Vec<GameState>),
    Bare(Box<GameState>),
}

/// Normalized save contents before validation.
struct Migrated {
    states: Vec<GameState>,
    cursor: Option<usize>,
    duration: Option<u64>,
}

impl SnapshotShape {
    fn migrate(self) -> Result<Migrated> {
        Ok(match self {
            SnapshotShape::Versioned(saved) => {
                if saved.version > SCHEMA_VERSION {
                    return Err(EngineError::CorruptSnapshot(format!(
                        "save version {} is newer than supported version {}",
                        saved.version, SCHEMA_VERSION
                    )));
                }
                Migrated {
                    states: saved.game_state,
                    cursor: Some(saved.history_index),
                    duration: Some(saved.duration),
                }
            }
            SnapshotShape::Unversioned(legacy) => {
                warn!("migrating unversioned save");
                let states = match legacy.game_state {
                    OneOrMany::Many(states) => states,
                    OneOrMany::One(state) => vec![*state],
                };
                Migrated {
                    states,
                    cursor: legacy.history_index,
                    duration: legacy.duration,
                }
            }
            SnapshotShape::Sequence(states) => {
                warn!("migrating bare history array");
                Migrated {
                    states,
                    cursor: None,
                    duration: None,
                }
            }
            SnapshotShape::Bare(state) => {
                warn!("migrating single-state save");
                Migrated {
                    states: vec![*state],
                    cursor: None,
                    duration: None,
                }
            }
        })
    }
}

impl Migrated {
    fn into_restored(self) -> Result<Restored> {
        let Migrated {
            states,
            cursor,
            duration,
        } = self;

        if states.is_empty() {
            return Err(EngineError::CorruptSnapshot("save holds no states".to_string()));
        }
        let draw_mode = states[0].draw_mode;
        for (index, state) in states.iter().enumerate() {
            if state.draw_mode != draw_mode {
                return Err(EngineError::CorruptSnapshot(format!(
                    "snapshot {}: draw mode {} differs from the game's {}",
                    index, state.draw_mode, draw_mode
                )));
            }
            state
                .check_invariants()
                .and_then(|()| state.check_layout())
                .map_err(|err| {
                    EngineError::CorruptSnapshot(format!("snapshot {}: {}", index, err))
                })?;
        }

        let tip = states.len() - 1;
        let cursor = cursor.map_or(tip, |c| c.min(tip));
        let mut history = History::from_parts(states, cursor)?;

        let duration = duration.unwrap_or(0).max(history.duration());
        if duration != history.duration() {
            history.replace(cursor, history.current().with_duration(duration))?;
        }

        debug!(len = history.len(), cursor, duration, "restored game");
        Ok(Restored {
            history,
            cursor,
            duration,
        })
    }
}

/// Rebuild a history from any known save shape.
pub fn restore_game(json: &str) -> Result<Restored> {
    let shape: SnapshotShape = serde_json::from_str(json).map_err(|err| {
        EngineError::CorruptSnapshot(format!("unrecognized save format: {}", err))
    })?;
    shape.migrate()?.into_restored()
}

/// Rebuild a history from an already-parsed JSON value.
pub fn restore_value(value: serde_json::Value) -> Result<Restored> {
    let shape: SnapshotShape = serde_json::from_value(value).map_err(|err| {
        EngineError::CorruptSnapshot(format!("unrecognized save format: {}", err))
    })?;
    shape.migrate()?.into_restored()
}

/// Serialize a history as current-format JSON.
pub fn to_json(history: &History) -> Result<String> {
    Ok(serde_json::to_string(&SavedGame::from_history(history))?)
}

/// Alias for [`restore_game`].
pub fn from_json(json: &str) -> Result<Restored> {
    restore_game(json)
}

/// Serialize a history in the compact binary format.
pub fn to_bytes(history: &History) -> Result<Vec<u8>> {
    Ok(bincode::serialize(&SavedGame::from_history(history))?)
}

/// Inverse of [`to_bytes`]. Only the current schema exists in binary form.
pub fn from_bytes(bytes: &[u8]) -> Result<Restored> {
    let saved: SavedGame = bincode::deserialize(bytes)?;
    SnapshotShape::Versioned(saved).migrate()?.into_restored()
}

/// Receives the history after every committed change.
pub trait SnapshotSink {
    /// Store the latest history, replacing whatever was stored before.
    fn save(&mut self, states: &[GameState], cursor: usize, duration: u64) -> Result<()>;
}

/// Discards every save.
impl SnapshotSink for () {
    fn save(&mut self, _states: &[GameState], _cursor: usize, _duration: u64) -> Result<()> {
        Ok(())
    }
}

/// Keeps the last save as JSON in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    last: Option<String>,
    writes: usize,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent save.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Number of saves received.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotSink for MemorySink {
    fn save(&mut self, states: &[GameState], cursor: usize, duration: u64) -> Result<()> {
        let saved = SavedGame::from_parts(states, cursor, duration);
        self.last = Some(serde_json::to_string(&saved)?);
        self.writes += 1;
        Ok(())
    }
}

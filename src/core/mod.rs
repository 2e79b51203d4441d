//! Core engine types: state, actions, RNG, configuration, errors.
//!
//! This module contains the building blocks every other module shares.
//! Rules live in `rules`; nothing here decides whether a move is legal.

pub mod action;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use action::{Action, ActionKind, MovePayload};
pub use config::{DrawMode, GameConfig, ScoringRules};
pub use error::{EngineError, Result};
pub use rng::GameRng;
pub use state::GameState;

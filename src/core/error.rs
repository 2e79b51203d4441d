//! Engine error type.
//!
//! Illegal player moves are NOT errors: the resolver turns them into
//! `Action::InvalidMove`. Everything here is either a caller contract
//! violation (an action that skipped resolution, an unknown action name)
//! or a persistence failure.

use thiserror::Error;

use super::action::ActionKind;
use crate::cards::CardId;
use crate::zones::PileId;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An action name that does not correspond to any transition.
    #[error("unknown action kind `{0}`")]
    UnknownAction(String),

    /// A move action was built without its card/target payload.
    #[error("action `{0}` requires a card and a target pile")]
    MissingPayload(ActionKind),

    /// The action names a card that is not in the pile it claims.
    #[error("card {card} is not in {pile}")]
    CardNotFound { card: CardId, pile: PileId },

    /// The card is in the pile but cannot be picked up from there.
    #[error("card {card} is not exposed in {pile}")]
    CardNotExposed { card: CardId, pile: PileId },

    /// Pile index out of range.
    #[error("{0} does not exist")]
    InvalidPile(PileId),

    /// The transition's precondition does not hold for this state.
    #[error("cannot apply `{action}`: {reason}")]
    IllegalTransition {
        action: ActionKind,
        reason: &'static str,
    },

    /// History cursor outside `[0, len - 1]`.
    #[error("history index {index} out of range (len {len})")]
    CursorOutOfRange { index: usize, len: usize },

    /// Restored data violates a state invariant.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// JSON encode/decode failure.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encode/decode failure.
    #[error("bincode: {0}")]
    Binary(#[from] bincode::Error),
}

//! Transition actions.
//!
//! An `Action` is a fully resolved instruction for the transition engine:
//! which card moves (by identity) and to which pile index. Deciding whether
//! a move is legal happens before an action is built, in `rules::resolve`.
//!
//! Actions also have a wire name (`ActionKind`) so they can be built from
//! untyped input:
//!
//! ```
//! use klondike_engine::core::{Action, ActionKind, MovePayload};
//! use klondike_engine::cards::CardId;
//!
//! let draw = Action::from_parts("draw", None).unwrap();
//! assert_eq!(draw, Action::Draw);
//!
//! let payload = MovePayload { card: CardId::new(12), target: 2 };
//! let action = Action::from_parts("move_waste_to_tableau", Some(payload)).unwrap();
//! assert_eq!(action.kind(), ActionKind::MoveWasteToTableau);
//!
//! assert!(Action::from_parts("shuffle_foundations", None).is_err());
//! ```

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};
use crate::cards::CardId;

/// Name of a transition, independent of its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Draw,
    ResetWaste,
    MoveWasteToTableau,
    MoveTableauToTableau,
    MoveTableauToFoundation,
    MoveWasteToFoundation,
    MoveFoundationToTableau,
    MoveFoundationToFoundation,
    InvalidMove,
    UpdateDuration,
}

impl ActionKind {
    /// Wire name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Draw => "draw",
            ActionKind::ResetWaste => "reset_waste",
            ActionKind::MoveWasteToTableau => "move_waste_to_tableau",
            ActionKind::MoveTableauToTableau => "move_tableau_to_tableau",
            ActionKind::MoveTableauToFoundation => "move_tableau_to_foundation",
            ActionKind::MoveWasteToFoundation => "move_waste_to_foundation",
            ActionKind::MoveFoundationToTableau => "move_foundation_to_tableau",
            ActionKind::MoveFoundationToFoundation => "move_foundation_to_foundation",
            ActionKind::InvalidMove => "invalid_move",
            ActionKind::UpdateDuration => "update_duration",
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "draw" => ActionKind::Draw,
            "reset_waste" => ActionKind::ResetWaste,
            "move_waste_to_tableau" => ActionKind::MoveWasteToTableau,
            // older clients called a tableau run a "stack"
            "move_tableau_to_tableau" | "move_stack_to_tableau" => ActionKind::MoveTableauToTableau,
            "move_tableau_to_foundation" => ActionKind::MoveTableauToFoundation,
            "move_waste_to_foundation" => ActionKind::MoveWasteToFoundation,
            "move_foundation_to_tableau" => ActionKind::MoveFoundationToTableau,
            "move_foundation_to_foundation" => ActionKind::MoveFoundationToFoundation,
            "invalid_move" => ActionKind::InvalidMove,
            "update_duration" => ActionKind::UpdateDuration,
            other => return Err(EngineError::UnknownAction(other.to_string())),
        })
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Card and destination index for a move action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovePayload {
    /// The moving card (for tableau runs, the bottom card of the run).
    pub card: CardId,

    /// Destination tableau or foundation index (0-based).
    pub target: u8,
}

/// A resolved transition.
///
/// Move variants carry the moving card by id and the destination pile index;
/// the origin pile is found by identity when the action is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Move up to `draw_mode` cards from stock to waste.
    Draw,
    /// Turn the waste over to become the stock.
    ResetWaste,
    MoveWasteToTableau { card: CardId, target: u8 },
    /// Move the run starting at `card` onto another tableau.
    MoveTableauToTableau { card: CardId, target: u8 },
    MoveTableauToFoundation { card: CardId, target: u8 },
    MoveWasteToFoundation { card: CardId, target: u8 },
    MoveFoundationToTableau { card: CardId, target: u8 },
    MoveFoundationToFoundation { card: CardId, target: u8 },
    /// A rejected move; leaves the state unchanged.
    InvalidMove,
    /// One clock tick.
    UpdateDuration,
}

impl Action {
    /// Build an action from its wire name and optional payload.
    pub fn from_parts(kind: &str, payload: Option<MovePayload>) -> Result<Self> {
        Self::from_kind(kind.parse()?, payload)
    }

    /// Build an action from a kind and optional payload.
    ///
    /// The payload is ignored for kinds that do not move a card.
    pub fn from_kind(kind: ActionKind, payload: Option<MovePayload>) -> Result<Self> {
        let with_payload = |build: fn(CardId, u8) -> Action| {
            payload
                .map(|MovePayload { card, target }| build(card, target))
                .ok_or(EngineError::MissingPayload(kind))
        };

        match kind {
            ActionKind::Draw => Ok(Action::Draw),
            ActionKind::ResetWaste => Ok(Action::ResetWaste),
            ActionKind::InvalidMove => Ok(Action::InvalidMove),
            ActionKind::UpdateDuration => Ok(Action::UpdateDuration),
            ActionKind::MoveWasteToTableau => {
                with_payload(|card, target| Action::MoveWasteToTableau { card, target })
            }
            ActionKind::MoveTableauToTableau => {
                with_payload(|card, target| Action::MoveTableauToTableau { card, target })
            }
            ActionKind::MoveTableauToFoundation => {
                with_payload(|card, target| Action::MoveTableauToFoundation { card, target })
            }
            ActionKind::MoveWasteToFoundation => {
                with_payload(|card, target| Action::MoveWasteToFoundation { card, target })
            }
            ActionKind::MoveFoundationToTableau => {
                with_payload(|card, target| Action::MoveFoundationToTableau { card, target })
            }
            ActionKind::MoveFoundationToFoundation => {
                with_payload(|card, target| Action::MoveFoundationToFoundation { card, target })
            }
        }
    }

    /// Kind of this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Action::Draw => ActionKind::Draw,
            Action::ResetWaste => ActionKind::ResetWaste,
            Action::MoveWasteToTableau { .. } => ActionKind::MoveWasteToTableau,
            Action::MoveTableauToTableau { .. } => ActionKind::MoveTableauToTableau,
            Action::MoveTableauToFoundation { .. } => ActionKind::MoveTableauToFoundation,
            Action::MoveWasteToFoundation { .. } => ActionKind::MoveWasteToFoundation,
            Action::MoveFoundationToTableau { .. } => ActionKind::MoveFoundationToTableau,
            Action::MoveFoundationToFoundation { .. } => ActionKind::MoveFoundationToFoundation,
            Action::InvalidMove => ActionKind::InvalidMove,
            Action::UpdateDuration => ActionKind::UpdateDuration,
        }
    }

    /// Payload of a move action.
    #[must_use]
    pub const fn payload(&self) -> Option<MovePayload> {
        match *self {
            Action::MoveWasteToTableau { card, target }
            | Action::MoveTableauToTableau { card, target }
            | Action::MoveTableauToFoundation { card, target }
            | Action::MoveWasteToFoundation { card, target }
            | Action::MoveFoundationToTableau { card, target }
            | Action::MoveFoundationToFoundation { card, target } => {
                Some(MovePayload { card, target })
            }
            Action::Draw | Action::ResetWaste | Action::InvalidMove | Action::UpdateDuration => {
                None
            }
        }
    }

    /// Whether this action changes the table (anything but `InvalidMove`
    /// and clock ticks).
    #[must_use]
    pub const fn is_move(&self) -> bool {
        !matches!(self, Action::InvalidMove | Action::UpdateDuration)
    }
}

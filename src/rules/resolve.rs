//! Move resolution: turning a player's pick-and-drop into an action.
//!
//! The transition engine trusts its input. Everything that makes a move
//! *legal* is checked here, against the state the player is looking at:
//!
//! 1. The selected card is really in the claimed origin pile and face up.
//! 2. Single-card origins (waste, foundation) only give up their top card;
//!    a tableau gives up the run from the selected card to its end, which
//!    must itself be a valid descending, alternating run.
//! 3. The destination accepts the moving card (`validate`).
//!
//! A move failing any check resolves to `Action::InvalidMove`, which is
//! still recorded in history. Resolution never returns an error.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::validate::{is_valid_foundation_move, is_valid_run, is_valid_tableau_move};
use crate::cards::{Card, CardId};
use crate::core::action::Action;
use crate::core::state::GameState;
use crate::zones::{Pile, PileExt, PileId};

/// The card a player picked up and the pile they picked it from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub card: CardId,
    pub origin: PileId,
}

impl Selection {
    #[must_use]
    pub fn new(card: CardId, origin: PileId) -> Self {
        Self { card, origin }
    }
}

/// The run a player can pick up from `tableau` starting at `card`.
///
/// `None` if the card is not in that tableau, is face down, or the cards on
/// top of it do not form a valid run.
#[must_use]
pub fn movable_run(state: &GameState, tableau: u8, card: CardId) -> Option<Pile> {
    let pile = state.pile(PileId::Tableau(tableau)).ok()?;
    let pos = pile.position_of(card)?;
    if !pile[pos].face_up {
        return None;
    }
    let run = pile.skip(pos);
    is_valid_run(&run).then_some(run)
}

/// The card that would move for `selection`, if it may be picked up at all.
fn picked_card(state: &GameState, selection: Selection) -> Option<Card> {
    let Selection { card, origin } = selection;
    match origin {
        PileId::Stock => None,
        PileId::Waste | PileId::Foundation(_) => {
            let top = state.pile(origin).ok()?.top()?;
            (top.id == card && top.face_up).then_some(*top)
        }
        PileId::Tableau(index) => {
            let run = movable_run(state, index, card)?;
            run.front().copied()
        }
    }
}

/// Resolve a drop of `selection` onto `destination`.
#[must_use]
pub fn resolve_move(state: &GameState, selection: Selection, destination: PileId) -> Action {
    if destination == selection.origin || destination.checked().is_err() {
        return Action::InvalidMove;
    }
    let Some(moving) = picked_card(state, selection) else {
        return Action::InvalidMove;
    };
    let Ok(dest_pile) = state.pile(destination) else {
        return Action::InvalidMove;
    };
    let dest_top = dest_pile.top();
    let card = moving.id;

    match (selection.origin, destination) {
        (PileId::Waste, PileId::Tableau(target)) if is_valid_tableau_move(&moving, dest_top) => {
            Action::MoveWasteToTableau { card, target }
        }
        (PileId::Tableau(_), PileId::Tableau(target)) if is_valid_tableau_move(&moving, dest_top) => {
            Action::MoveTableauToTableau { card, target }
        }
        (PileId::Foundation(_), PileId::Tableau(target))
            if is_valid_tableau_move(&moving, dest_top) =>
        {
            Action::MoveFoundationToTableau { card, target }
        }
        (PileId::Waste, PileId::Foundation(target))
            if is_valid_foundation_move(&moving, dest_top) =>
        {
            Action::MoveWasteToFoundation { card, target }
        }
        // only the top card of a tableau may go to a foundation
        (PileId::Tableau(_), PileId::Foundation(target))
            if state.pile(selection.origin).is_ok_and(|p| p.is_top(card))
                && is_valid_foundation_move(&moving, dest_top) =>
        {
            Action::MoveTableauToFoundation { card, target }
        }
        (PileId::Foundation(_), PileId::Foundation(target))
            if is_valid_foundation_move(&moving, dest_top) =>
        {
            Action::MoveFoundationToFoundation { card, target }
        }
        _ => Action::InvalidMove,
    }
}

/// Resolve a click on the stock.
#[must_use]
pub fn resolve_stock_click(state: &GameState) -> Action {
    if !state.stock.is_empty() {
        Action::Draw
    } else if !state.waste.is_empty() {
        Action::ResetWaste
    } else {
        Action::InvalidMove
    }
}

/// Resolve the double-click shortcut: send the selected card to a foundation.
///
/// Only the top card of the waste or of a tableau is eligible. An ace goes to
/// the first empty foundation; anything else to the first foundation whose
/// top it continues.
#[must_use]
pub fn resolve_auto_foundation(state: &GameState, selection: Selection) -> Action {
    if !matches!(selection.origin, PileId::Waste | PileId::Tableau(_)) {
        return Action::InvalidMove;
    }
    let Ok(origin) = state.pile(selection.origin) else {
        return Action::InvalidMove;
    };
    let Some(&card) = origin.top().filter(|c| c.id == selection.card && c.face_up) else {
        return Action::InvalidMove;
    };

    let target = state
        .foundations
        .iter()
        .position(|f| is_valid_foundation_move(&card, f.top()));

    match (selection.origin, target) {
        (PileId::Waste, Some(target)) => Action::MoveWasteToFoundation {
            card: card.id,
            target: target as u8,
        },
        (PileId::Tableau(_), Some(target)) => Action::MoveTableauToFoundation {
            card: card.id,
            target: target as u8,
        },
        _ => Action::InvalidMove,
    }
}

/// Check an action that did not come from this module against `state`.
///
/// Returns the action unchanged if resolving the same pick-and-drop yields
/// it, otherwise `InvalidMove`.
#[must_use]
pub fn resolve_action(state: &GameState, action: Action) -> Action {
    let resolved = match action {
        Action::Draw | Action::ResetWaste => resolve_stock_click(state),
        Action::InvalidMove | Action::UpdateDuration => action,
        Action::MoveWasteToTableau { card, target }
        | Action::MoveTableauToTableau { card, target }
        | Action::MoveFoundationToTableau { card, target } => {
            resolve_located(state, card, PileId::Tableau(target))
        }
        Action::MoveTableauToFoundation { card, target }
        | Action::MoveWasteToFoundation { card, target }
        | Action::MoveFoundationToFoundation { card, target } => {
            resolve_located(state, card, PileId::Foundation(target))
        }
    };
    if resolved == action {
        action
    } else {
        Action::InvalidMove
    }
}

fn resolve_located(state: &GameState, card: CardId, destination: PileId) -> Action {
    match state.locate(card) {
        Some((origin, _)) => resolve_move(state, Selection::new(card, origin), destination),
        None => Action::InvalidMove,
    }
}

/// Every pile `selection` could be dropped on.
#[must_use]
pub fn legal_destinations(state: &GameState, selection: Selection) -> SmallVec<[PileId; 11]> {
    PileId::all()
        .filter(|&dest| resolve_move(state, selection, dest) != Action::InvalidMove)
        .collect()
}

//! Move legality predicates.
//!
//! Both predicates compare a moving card with the top card of the
//! destination (`None` when the destination is empty). They know nothing
//! about where the moving card comes from; checking that it is actually
//! exposed is the resolver's job.

use crate::cards::{Card, Rank};

/// Can `card` be placed on a tableau whose top is `dest_top`?
///
/// Empty tableau: kings only. Otherwise the colors must differ and the card
/// must be exactly one rank lower.
#[must_use]
pub fn is_valid_tableau_move(card: &Card, dest_top: Option<&Card>) -> bool {
    match dest_top {
        None => card.rank == Rank::King,
        Some(top) => card.color() != top.color() && card.rank.value() + 1 == top.rank.value(),
    }
}

/// Can `card` be placed on a foundation whose top is `dest_top`?
///
/// Empty foundation: aces only. Otherwise same suit, exactly one rank higher.
#[must_use]
pub fn is_valid_foundation_move(card: &Card, dest_top: Option<&Card>) -> bool {
    match dest_top {
        None => card.rank == Rank::Ace,
        Some(top) => card.suit == top.suit && card.rank.value() == top.rank.value() + 1,
    }
}

/// Whether `cards` (bottom first) form a descending, alternating-color run.
#[must_use]
pub fn is_valid_run<'a>(cards: impl IntoIterator<Item = &'a Card>) -> bool {
    let mut cards = cards.into_iter();
    let Some(mut below) = cards.next() else {
        return true;
    };
    for card in cards {
        if !is_valid_tableau_move(card, Some(below)) {
            return false;
        }
        below = card;
    }
    true
}

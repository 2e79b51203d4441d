//! Piles and pile identifiers.
//!
//! A pile is an `im::Vector<Card>`: index 0 is the bottom, the last element
//! is the exposed top. Cloning a pile is O(1) and shares structure with the
//! original, so every snapshot in history can keep its own piles cheaply.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::error::{EngineError, Result};

/// An ordered stack of cards, bottom first.
pub type Pile = Vector<Card>;

/// Number of tableau piles.
pub const TABLEAU_COUNT: usize = 7;

/// Number of foundation piles.
pub const FOUNDATION_COUNT: usize = 4;

/// Identifies one pile on the table.
///
/// Foundation and tableau indices are 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum PileId {
    Stock,
    Waste,
    Foundation(u8),
    Tableau(u8),
}

impl PileId {
    /// Foundation pile by index, checked.
    pub fn foundation(index: usize) -> Result<Self> {
        Self::Foundation(u8::try_from(index).unwrap_or(u8::MAX)).checked()
    }

    /// Tableau pile by index, checked.
    pub fn tableau(index: usize) -> Result<Self> {
        Self::Tableau(u8::try_from(index).unwrap_or(u8::MAX)).checked()
    }

    /// Every pile id, stock first.
    pub fn all() -> impl Iterator<Item = PileId> {
        [PileId::Stock, PileId::Waste]
            .into_iter()
            .chain((0..FOUNDATION_COUNT as u8).map(PileId::Foundation))
            .chain((0..TABLEAU_COUNT as u8).map(PileId::Tableau))
    }

    /// Return `self` if its index is in range.
    pub fn checked(self) -> Result<Self> {
        let in_range = match self {
            PileId::Stock | PileId::Waste => true,
            PileId::Foundation(i) => usize::from(i) < FOUNDATION_COUNT,
            PileId::Tableau(i) => usize::from(i) < TABLEAU_COUNT,
        };
        if in_range {
            Ok(self)
        } else {
            Err(EngineError::InvalidPile(self))
        }
    }

    #[must_use]
    pub fn is_tableau(self) -> bool {
        matches!(self, PileId::Tableau(_))
    }

    #[must_use]
    pub fn is_foundation(self) -> bool {
        matches!(self, PileId::Foundation(_))
    }
}

impl std::fmt::Display for PileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PileId::Stock => write!(f, "stock"),
            PileId::Waste => write!(f, "waste"),
            PileId::Foundation(i) => write!(f, "foundation {}", i),
            PileId::Tableau(i) => write!(f, "tableau {}", i),
        }
    }
}

/// Card lookups on a pile.
pub trait PileExt {
    /// Exposed card, if any.
    fn top(&self) -> Option<&Card>;

    /// Position of a card by identity.
    fn position_of(&self, card: CardId) -> Option<usize>;

    /// Whether `card` is the exposed top.
    fn is_top(&self, card: CardId) -> bool {
        self.top().is_some_and(|c| c.id == card)
    }
}

impl PileExt for Pile {
    fn top(&self) -> Option<&Card> {
        self.back()
    }

    fn position_of(&self, card: CardId) -> Option<usize> {
        self.iter().position(|c| c.id == card)
    }
}

/// Remove `card` from the top of `pile`.
pub(crate) fn take_top(pile: &mut Pile, card: CardId, id: PileId) -> Result<Card> {
    match pile.position_of(card) {
        None => Err(EngineError::CardNotFound { card, pile: id }),
        Some(pos) if pos + 1 != pile.len() => Err(EngineError::CardNotExposed { card, pile: id }),
        Some(_) => pile
            .pop_back()
            .ok_or(EngineError::CardNotFound { card, pile: id }),
    }
}

/// Turn the new top of `pile` face up. Returns true if a hidden card was revealed.
pub(crate) fn reveal_top(pile: &mut Pile) -> bool {
    match pile.back_mut() {
        Some(top) if !top.face_up => {
            *top = top.turned_up();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn card(id: u8, rank: Rank, suit: Suit) -> Card {
        Card::new(CardId::new(id), rank, suit)
    }

    #[test]
    fn test_pile_id_checked() {
        assert!(PileId::tableau(6).is_ok());
        assert!(matches!(
            PileId::tableau(7),
            Err(EngineError::InvalidPile(PileId::Tableau(7)))
        ));
        assert!(PileId::foundation(3).is_ok());
        assert!(PileId::foundation(4).is_err());
    }

    #[test]
    fn test_pile_id_all() {
        let all: Vec<_> = PileId::all().collect();
        assert_eq!(all.len(), 2 + FOUNDATION_COUNT + TABLEAU_COUNT);
        assert_eq!(all[0], PileId::Stock);
        assert_eq!(all[2], PileId::Foundation(0));
        assert_eq!(all[12], PileId::Tableau(6));
    }

    #[test]
    fn test_pile_id_display() {
        assert_eq!(format!("{}", PileId::Tableau(3)), "tableau 3");
        assert_eq!(format!("{}", PileId::Waste), "waste");
    }

    #[test]
    fn test_top_and_position() {
        let pile: Pile = vec![card(1, Rank::Ace, Suit::Spade), card(2, Rank::Two, Suit::Heart)].into();

        assert_eq!(pile.top().map(|c| c.id), Some(CardId::new(2)));
        assert_eq!(pile.position_of(CardId::new(1)), Some(0));
        assert_eq!(pile.position_of(CardId::new(9)), None);
        assert!(pile.is_top(CardId::new(2)));
        assert!(!pile.is_top(CardId::new(1)));
    }

    #[test]
    fn test_take_top() {
        let mut pile: Pile =
            vec![card(1, Rank::Ace, Suit::Spade), card(2, Rank::Two, Suit::Heart)].into();

        assert!(matches!(
            take_top(&mut pile, CardId::new(1), PileId::Waste),
            Err(EngineError::CardNotExposed { .. })
        ));
        assert!(matches!(
            take_top(&mut pile, CardId::new(5), PileId::Waste),
            Err(EngineError::CardNotFound { .. })
        ));

        let taken = take_top(&mut pile, CardId::new(2), PileId::Waste).unwrap();
        assert_eq!(taken.id, CardId::new(2));
        assert_eq!(pile.len(), 1);
    }

    #[test]
    fn test_reveal_top() {
        let mut pile: Pile = vec![card(1, Rank::Ace, Suit::Spade)].into();

        assert!(reveal_top(&mut pile));
        assert!(pile.top().unwrap().face_up);
        assert!(!reveal_top(&mut pile));

        let mut empty = Pile::new();
        assert!(!reveal_top(&mut empty));
    }
}

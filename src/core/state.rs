//! Game state: one immutable snapshot of the table.
//!
//! ## GameState
//!
//! - Draw mode (fixed for the game)
//! - Score (never below 0)
//! - Stock, waste, four foundations, seven tableaux
//! - Elapsed duration in seconds
//!
//! Piles are `im` persistent vectors, so `clone()` is O(1) per pile and a new
//! snapshot shares every untouched pile with its predecessor. The transition
//! engine never mutates a stored snapshot; it clones and edits the copy.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::config::DrawMode;
use super::error::{EngineError, Result};
use crate::cards::{Card, CardId, Deal, DECK_SIZE};
use crate::zones::{Pile, PileId, FOUNDATION_COUNT, TABLEAU_COUNT};

/// Complete table state.
///
/// Serialized with the field names older saves use (`drawMode`, `faceUp`, ...).
/// Saves written before draw mode and duration were stored get `Three` and 0.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Cards per draw.
    #[serde(default)]
    pub draw_mode: DrawMode,

    pub score: u32,

    /// Face-down reserve; the back is the next card drawn.
    pub stock: Pile,

    /// Face-up drawn cards; the back is playable.
    pub waste: Pile,

    pub foundations: [Pile; FOUNDATION_COUNT],

    pub tableaux: [Pile; TABLEAU_COUNT],

    /// Elapsed seconds, advanced by clock ticks.
    #[serde(default)]
    pub duration: u64,
}

impl GameState {
    /// Build the opening state from a deal.
    #[must_use]
    pub fn from_deal(deal: Deal, draw_mode: DrawMode) -> Self {
        Self {
            draw_mode,
            score: 0,
            stock: deal.stock,
            waste: Pile::new(),
            foundations: std::array::from_fn(|_| Pile::new()),
            tableaux: deal.tableaux,
            duration: 0,
        }
    }

    /// Get a pile.
    pub fn pile(&self, id: PileId) -> Result<&Pile> {
        Ok(match id.checked()? {
            PileId::Stock => &self.stock,
            PileId::Waste => &self.waste,
            PileId::Foundation(i) => &self.foundations[usize::from(i)],
            PileId::Tableau(i) => &self.tableaux[usize::from(i)],
        })
    }

    /// Get a mutable pile.
    pub fn pile_mut(&mut self, id: PileId) -> Result<&mut Pile> {
        Ok(match id.checked()? {
            PileId::Stock => &mut self.stock,
            PileId::Waste => &mut self.waste,
            PileId::Foundation(i) => &mut self.foundations[usize::from(i)],
            PileId::Tableau(i) => &mut self.tableaux[usize::from(i)],
        })
    }

    /// Iterate over `(PileId, &Pile)` pairs, stock first.
    pub fn piles(&self) -> impl Iterator<Item = (PileId, &Pile)> {
        let fixed = [(PileId::Stock, &self.stock), (PileId::Waste, &self.waste)];
        let foundations = self
            .foundations
            .iter()
            .enumerate()
            .map(|(i, p)| (PileId::Foundation(i as u8), p));
        let tableaux = self
            .tableaux
            .iter()
            .enumerate()
            .map(|(i, p)| (PileId::Tableau(i as u8), p));
        fixed.into_iter().chain(foundations).chain(tableaux)
    }

    /// Find a card by identity: its pile and position in that pile.
    #[must_use]
    pub fn locate(&self, card: CardId) -> Option<(PileId, usize)> {
        self.piles().find_map(|(id, pile)| {
            pile.iter()
                .position(|c| c.id == card)
                .map(|pos| (id, pos))
        })
    }

    /// Look up a card by identity.
    #[must_use]
    pub fn card(&self, card: CardId) -> Option<&Card> {
        let (pile, pos) = self.locate(card)?;
        self.pile(pile).ok()?.get(pos)
    }

    /// Total cards on the table.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.piles().map(|(_, p)| p.len()).sum()
    }

    /// Copy with a different duration.
    #[must_use]
    pub fn with_duration(&self, duration: u64) -> Self {
        Self {
            duration,
            ..self.clone()
        }
    }

    /// Verify the deck invariant: 52 cards, distinct ids, distinct values.
    pub fn check_invariants(&self) -> Result<()> {
        let count = self.card_count();
        if count != DECK_SIZE {
            return Err(EngineError::CorruptSnapshot(format!(
                "expected {} cards, found {}",
                DECK_SIZE, count
            )));
        }

        let mut ids = FxHashSet::default();
        let mut values = FxHashSet::default();
        for (_, pile) in self.piles() {
            for card in pile {
                if !ids.insert(card.id) {
                    return Err(EngineError::CorruptSnapshot(format!(
                        "card id {} appears twice",
                        card.id
                    )));
                }
                if !values.insert((card.rank, card.suit)) {
                    return Err(EngineError::CorruptSnapshot(format!(
                        "card {} appears twice",
                        card
                    )));
                }
            }
        }
        Ok(())
    }

    /// Verify face orientation: stock face down, waste and foundations face
    /// up, and every tableau a face-down prefix under a face-up run.
    pub fn check_layout(&self) -> Result<()> {
        let misturned = |pile: PileId, card: &Card| {
            EngineError::CorruptSnapshot(format!("card {} in {} is turned the wrong way", card, pile))
        };

        if let Some(card) = self.stock.iter().find(|c| c.face_up) {
            return Err(misturned(PileId::Stock, card));
        }
        if let Some(card) = self.waste.iter().find(|c| !c.face_up) {
            return Err(misturned(PileId::Waste, card));
        }
        for (index, foundation) in self.foundations.iter().enumerate() {
            if let Some(card) = foundation.iter().find(|c| !c.face_up) {
                return Err(misturned(PileId::Foundation(index as u8), card));
            }
        }
        for (index, tableau) in self.tableaux.iter().enumerate() {
            let pile = PileId::Tableau(index as u8);
            let first_up = tableau.iter().position(|c| c.face_up).unwrap_or(tableau.len());
            if let Some(card) = tableau.iter().skip(first_up).find(|c| !c.face_up) {
                return Err(misturned(pile, card));
            }
            if let Some(card) = tableau.back().filter(|c| !c.face_up) {
                return Err(misturned(pile, card));
            }
        }
        Ok(())
    }
}

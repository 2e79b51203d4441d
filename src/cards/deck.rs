//! Deck construction, shuffling and the opening deal.

use super::card::{Card, CardId, Rank, Suit};
use crate::core::GameRng;
use crate::zones::{Pile, TABLEAU_COUNT};

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Build the 52-card deck, face down, ranks outer and suits inner.
///
/// Ids run `c1..=c52` in that order.
#[must_use]
pub fn build_deck() -> Vec<Card> {
    Rank::ALL
        .iter()
        .flat_map(|&rank| Suit::ALL.iter().map(move |&suit| (rank, suit)))
        .zip(1u8..)
        .map(|((rank, suit), id)| Card::new(CardId::new(id), rank, suit))
        .collect()
}

/// Shuffle the deck in place with an unbiased Fisher–Yates pass.
pub fn shuffle(deck: &mut [Card], rng: &mut GameRng) {
    rng.shuffle(deck);
}

/// Piles produced by the opening deal.
#[derive(Clone, Debug)]
pub struct Deal {
    pub stock: Pile,
    pub tableaux: [Pile; TABLEAU_COUNT],
}

/// Deal a shuffled deck.
///
/// Tableau `i` (1-based) takes the last `i` cards off the end of the deck,
/// with only its topmost card face up. The 24 leftover cards become the
/// stock, face down.
#[must_use]
pub fn deal(mut deck: Vec<Card>) -> Deal {
    let tableaux = std::array::from_fn(|index| {
        let take = (index + 1).min(deck.len());
        let mut cards = deck.split_off(deck.len() - take);
        if let Some(top) = cards.last_mut() {
            *top = top.turned_up();
        }
        Pile::from(cards)
    });

    let stock = deck.into_iter().map(Card::turned_down).collect();

    Deal { stock, tableaux }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_build_deck_unique() {
        let deck = build_deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let ids: FxHashSet<_> = deck.iter().map(|c| c.id).collect();
        let values: FxHashSet<_> = deck.iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(ids.len(), DECK_SIZE);
        assert_eq!(values.len(), DECK_SIZE);
        assert!(deck.iter().all(|c| !c.face_up));
    }

    #[test]
    fn test_build_deck_order() {
        let deck = build_deck();

        assert_eq!(deck[0].id, CardId::new(1));
        assert_eq!((deck[0].rank, deck[0].suit), (Rank::Ace, Suit::Spade));
        assert_eq!((deck[3].rank, deck[3].suit), (Rank::Ace, Suit::Heart));
        assert_eq!((deck[51].rank, deck[51].suit), (Rank::King, Suit::Heart));
        assert_eq!(deck[51].id, CardId::new(52));
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut rng = GameRng::new(42);
        let mut deck = build_deck();
        shuffle(&mut deck, &mut rng);

        let mut ids: Vec<_> = deck.iter().map(|c| c.id.raw()).collect();
        assert_ne!(ids, (1..=52).collect::<Vec<_>>());
        ids.sort_unstable();
        assert_eq!(ids, (1..=52).collect::<Vec<_>>());
    }

    #[test]
    fn test_deal_layout() {
        let mut rng = GameRng::new(7);
        let mut deck = build_deck();
        shuffle(&mut deck, &mut rng);

        let Deal { stock, tableaux } = deal(deck);

        assert_eq!(stock.len(), 24);
        assert!(stock.iter().all(|c| !c.face_up));

        for (i, tableau) in tableaux.iter().enumerate() {
            assert_eq!(tableau.len(), i + 1);
            let (top, rest) = (tableau.back().unwrap(), tableau.take(i));
            assert!(top.face_up);
            assert!(rest.iter().all(|c| !c.face_up));
        }
    }

    #[test]
    fn test_deal_takes_from_deck_end() {
        let deck = build_deck();
        let Deal { stock, tableaux } = deal(deck);

        // Tableau 1 is the last card of the unshuffled deck.
        assert_eq!(tableaux[0].back().unwrap().id, CardId::new(52));
        // Tableau 2 is the two cards before it.
        let second: Vec<_> = tableaux[1].iter().map(|c| c.id.raw()).collect();
        assert_eq!(second, vec![50, 51]);
        assert_eq!(stock.back().unwrap().id, CardId::new(24));
    }
}
